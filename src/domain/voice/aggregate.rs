//! Voice Context - Aggregates

use serde_json::{Map, Value};

use super::{RecordPath, SourceUrl, VoiceError, VoiceName};

/// 克隆请求
///
/// 不变量:
/// - name 与 url 均为非空字符串
/// - name 可作为记录路径的一段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneRequest {
    name: VoiceName,
    url: SourceUrl,
}

impl CloneRequest {
    pub fn new(name: VoiceName, url: SourceUrl) -> Self {
        Self { name, url }
    }

    /// 从请求体 JSON 构造
    ///
    /// 请求体可以是对象，也可以是内容为 JSON 对象的字符串（会再解析一次）
    pub fn from_json(body: &Value) -> Result<Self, VoiceError> {
        let decoded;
        let body = match body {
            Value::String(raw) => {
                decoded = serde_json::from_str::<Value>(raw).map_err(|_| VoiceError::MissingField)?;
                &decoded
            }
            other => other,
        };

        let object = body.as_object().ok_or(VoiceError::MissingField)?;
        let name = non_empty_str(object, "name").ok_or(VoiceError::MissingField)?;
        let url = non_empty_str(object, "url").ok_or(VoiceError::MissingField)?;

        Ok(Self {
            name: VoiceName::new(name)?,
            url: SourceUrl::parse(url)?,
        })
    }

    pub fn name(&self) -> &VoiceName {
        &self.name
    }

    pub fn url(&self) -> &SourceUrl {
        &self.url
    }
}

fn non_empty_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// 角色音色设置
///
/// 存储于 `preference/<name>/character_settings`，只合并写入 `voiceId` 字段，
/// 同一路径下的其它字段保持不变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterVoiceSetting {
    owner: VoiceName,
    voice_id: String,
}

impl CharacterVoiceSetting {
    pub const ROOT: &'static str = "preference";
    pub const NODE: &'static str = "character_settings";
    pub const VOICE_ID_FIELD: &'static str = "voiceId";

    /// voice_id 必须非空，空值不允许落库
    pub fn new(owner: VoiceName, voice_id: impl Into<String>) -> Result<Self, VoiceError> {
        let voice_id = voice_id.into();
        if voice_id.is_empty() {
            return Err(VoiceError::EmptyVoiceId(owner.to_string()));
        }
        Ok(Self { owner, voice_id })
    }

    /// 某个名称对应的记录路径
    pub fn record_path(owner: &VoiceName) -> RecordPath {
        RecordPath::from_segments(vec![
            Self::ROOT.to_string(),
            owner.as_str().to_string(),
            Self::NODE.to_string(),
        ])
    }

    pub fn path(&self) -> RecordPath {
        Self::record_path(&self.owner)
    }

    pub fn voice_id(&self) -> &str {
        &self.voice_id
    }

    /// 需要合并写入的字段
    pub fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(
            Self::VOICE_ID_FIELD.to_string(),
            Value::String(self.voice_id.clone()),
        );
        fields
    }
}
