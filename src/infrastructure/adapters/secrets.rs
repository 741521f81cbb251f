//! Secret Providers - 凭据读取实现

use std::collections::HashMap;

use crate::application::ports::SecretProviderPort;

/// 环境变量凭据
///
/// 每次调用时读取进程环境，非空的显式覆盖值优先
#[derive(Debug, Clone, Default)]
pub struct EnvSecretProvider {
    overrides: HashMap<String, String>,
}

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }
}

impl SecretProviderPort for EnvSecretProvider {
    fn secret(&self, key: &str) -> Option<String> {
        self.overrides
            .get(key)
            .filter(|v| !v.is_empty())
            .cloned()
            .or_else(|| std::env::var(key).ok().filter(|v| !v.is_empty()))
    }
}

/// 固定凭据表
#[derive(Debug, Clone, Default)]
pub struct StaticSecretProvider {
    values: HashMap<String, String>,
}

impl StaticSecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl SecretProviderPort for StaticSecretProvider {
    fn secret(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.is_empty()).cloned()
    }
}
