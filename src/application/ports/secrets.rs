//! Secret Provider Port - 凭据读取抽象

/// Secret Provider Port
///
/// 每次请求时解析，空字符串视为未配置
pub trait SecretProviderPort: Send + Sync {
    fn secret(&self, key: &str) -> Option<String>;
}
