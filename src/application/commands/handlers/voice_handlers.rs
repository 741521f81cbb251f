//! Voice Command Handlers

use std::sync::Arc;

use crate::application::commands::CloneVoice;
use crate::application::error::CloneVoiceError;
use crate::application::ports::{
    AudioFetcherPort, CloningError, RecordStorePort, SecretProviderPort, VoiceCloningPort,
};
use crate::domain::voice::CharacterVoiceSetting;

// ============================================================================
// CloneVoice
// ============================================================================

/// 克隆音色响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneVoiceResponse {
    pub voice_id: String,
}

/// CloneVoice Handler
///
/// 顺序执行：校验凭据 -> 下载参考音频 -> 上传克隆 -> 合并写入 voiceId。
/// 任一步失败即终止；克隆成功后写入失败不会回滚外部音色。
pub struct CloneVoiceHandler {
    secrets: Arc<dyn SecretProviderPort>,
    fetcher: Arc<dyn AudioFetcherPort>,
    cloner: Arc<dyn VoiceCloningPort>,
    store: Arc<dyn RecordStorePort>,
    api_key_secret: String,
}

impl CloneVoiceHandler {
    pub fn new(
        secrets: Arc<dyn SecretProviderPort>,
        fetcher: Arc<dyn AudioFetcherPort>,
        cloner: Arc<dyn VoiceCloningPort>,
        store: Arc<dyn RecordStorePort>,
        api_key_secret: impl Into<String>,
    ) -> Self {
        Self {
            secrets,
            fetcher,
            cloner,
            store,
            api_key_secret: api_key_secret.into(),
        }
    }

    pub async fn handle(&self, command: CloneVoice) -> Result<CloneVoiceResponse, CloneVoiceError> {
        let name = command.request.name();
        let url = command.request.url();

        let api_key = self
            .secrets
            .secret(&self.api_key_secret)
            .ok_or_else(|| CloneVoiceError::Configuration(self.api_key_secret.clone()))?;

        tracing::info!(name = %name, url = %url, "Voice clone requested");

        let sample = self.fetcher.fetch(url, name).await?;

        tracing::debug!(
            name = %name,
            bytes = sample.len(),
            file_name = %sample.file_name(),
            "Reference audio downloaded"
        );

        let cloned = self.cloner.add_voice(&api_key, name, &sample).await?;
        drop(sample);

        tracing::info!(
            name = %name,
            response = %cloned.raw,
            "Cloning service responded"
        );

        let setting = CharacterVoiceSetting::new(name.clone(), cloned.voice_id.clone()).map_err(
            |e| CloningError::InvalidResponse {
                message: e.to_string(),
                payload: cloned.raw.clone(),
            },
        )?;

        self.store
            .update(&setting.path(), setting.fields())
            .await
            .map_err(|source| CloneVoiceError::Persistence {
                voice_id: setting.voice_id().to_string(),
                source,
            })?;

        tracing::info!(
            name = %name,
            voice_id = %setting.voice_id(),
            path = %setting.path(),
            "Voice cloned successfully"
        );

        Ok(CloneVoiceResponse {
            voice_id: setting.voice_id().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Map, Value};
    use std::collections::{HashMap, VecDeque};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::application::ports::{AudioSample, ClonedVoice, FetchError, StoreError};
    use crate::domain::voice::{RecordPath, SourceUrl, VoiceName};
    use crate::infrastructure::adapters::StaticSecretProvider;

    const KEY: &str = "ELEVEN_API_KEY";

    struct FakeFetcher {
        calls: AtomicUsize,
        fail: bool,
        paths: Mutex<Vec<PathBuf>>,
    }

    impl FakeFetcher {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
                paths: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AudioFetcherPort for FakeFetcher {
        async fn fetch(&self, _url: &SourceUrl, name: &VoiceName) -> Result<AudioSample, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FetchError::UpstreamStatus {
                    status: 404,
                    body: "not found".into(),
                });
            }
            let file = tempfile::NamedTempFile::new().unwrap();
            std::fs::write(file.path(), b"audio").unwrap();
            let path = file.into_temp_path();
            self.paths.lock().unwrap().push(path.to_path_buf());
            Ok(AudioSample::new(path, 5, format!("{}.m4a", name), None))
        }
    }

    struct FakeCloner {
        calls: AtomicUsize,
        responses: Mutex<VecDeque<Result<ClonedVoice, CloningError>>>,
        seen_keys: Mutex<Vec<String>>,
    }

    impl FakeCloner {
        fn returning(responses: Vec<Result<ClonedVoice, CloningError>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                responses: Mutex::new(responses.into()),
                seen_keys: Mutex::new(Vec::new()),
            }
        }
    }

    fn cloned(voice_id: &str) -> Result<ClonedVoice, CloningError> {
        Ok(ClonedVoice {
            voice_id: voice_id.to_string(),
            requires_verification: false,
            raw: json!({ "voice_id": voice_id }),
        })
    }

    #[async_trait]
    impl VoiceCloningPort for FakeCloner {
        async fn add_voice(
            &self,
            api_key: &str,
            _name: &VoiceName,
            sample: &AudioSample,
        ) -> Result<ClonedVoice, CloningError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_keys.lock().unwrap().push(api_key.to_string());
            assert!(sample.path().exists());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| cloned("default"))
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<HashMap<String, Map<String, Value>>>,
        writes: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl RecordStorePort for MemoryStore {
        async fn update(
            &self,
            path: &RecordPath,
            fields: Map<String, Value>,
        ) -> Result<(), StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::DatabaseError("permission denied".into()));
            }
            let mut records = self.records.lock().unwrap();
            records.entry(path.to_string()).or_default().extend(fields);
            Ok(())
        }

        async fn get(&self, path: &RecordPath) -> Result<Option<Value>, StoreError> {
            let records = self.records.lock().unwrap();
            Ok(records.get(&path.to_string()).cloned().map(Value::Object))
        }
    }

    struct Fixture {
        fetcher: Arc<FakeFetcher>,
        cloner: Arc<FakeCloner>,
        store: Arc<MemoryStore>,
        handler: CloneVoiceHandler,
    }

    fn fixture(
        api_key: Option<&str>,
        fetcher: FakeFetcher,
        cloner: FakeCloner,
        store: MemoryStore,
    ) -> Fixture {
        let mut secrets = StaticSecretProvider::new();
        if let Some(key) = api_key {
            secrets = secrets.with(KEY, key);
        }
        let fetcher = Arc::new(fetcher);
        let cloner = Arc::new(cloner);
        let store = Arc::new(store);
        let handler = CloneVoiceHandler::new(
            Arc::new(secrets),
            fetcher.clone(),
            cloner.clone(),
            store.clone(),
            KEY,
        );
        Fixture {
            fetcher,
            cloner,
            store,
            handler,
        }
    }

    fn command(name: &str) -> CloneVoice {
        CloneVoice::from_json(&json!({
            "name": name,
            "url": "https://cdn.example.com/sample.m4a"
        }))
        .unwrap()
    }

    fn alice_path() -> RecordPath {
        RecordPath::new(["preference", "alice", "character_settings"]).unwrap()
    }

    #[tokio::test]
    async fn test_clone_voice_persists_voice_id() {
        let store = MemoryStore::default();
        store.records.lock().unwrap().insert(
            alice_path().to_string(),
            json!({"voiceId": "old", "pitch": 3}).as_object().unwrap().clone(),
        );
        let f = fixture(
            Some("secret"),
            FakeFetcher::new(false),
            FakeCloner::returning(vec![cloned("v123")]),
            store,
        );

        let response = f.handler.handle(command("alice")).await.unwrap();

        assert_eq!(response.voice_id, "v123");
        let record = f.store.get(&alice_path()).await.unwrap().unwrap();
        assert_eq!(record, json!({"voiceId": "v123", "pitch": 3}));
        assert_eq!(f.cloner.seen_keys.lock().unwrap().as_slice(), ["secret"]);
    }

    #[tokio::test]
    async fn test_clone_voice_creates_missing_record() {
        let f = fixture(
            Some("secret"),
            FakeFetcher::new(false),
            FakeCloner::returning(vec![cloned("v1")]),
            MemoryStore::default(),
        );

        f.handler.handle(command("alice")).await.unwrap();

        let record = f.store.get(&alice_path()).await.unwrap();
        assert_eq!(record, Some(json!({"voiceId": "v1"})));
    }

    #[tokio::test]
    async fn test_missing_api_key_makes_no_calls() {
        let f = fixture(
            None,
            FakeFetcher::new(false),
            FakeCloner::returning(vec![]),
            MemoryStore::default(),
        );

        let err = f.handler.handle(command("alice")).await.unwrap_err();

        assert!(matches!(err, CloneVoiceError::Configuration(ref k) if k == KEY));
        assert_eq!(f.fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.cloner.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_upload_and_write() {
        let f = fixture(
            Some("secret"),
            FakeFetcher::new(true),
            FakeCloner::returning(vec![]),
            MemoryStore::default(),
        );

        let err = f.handler.handle(command("alice")).await.unwrap_err();

        assert_eq!(err.stage(), "fetch");
        assert_eq!(f.cloner.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_voice_id_is_cloning_error() {
        let f = fixture(
            Some("secret"),
            FakeFetcher::new(false),
            FakeCloner::returning(vec![cloned("")]),
            MemoryStore::default(),
        );

        let err = f.handler.handle(command("alice")).await.unwrap_err();

        match err {
            CloneVoiceError::CloningService(inner) => {
                assert_eq!(inner.payload(), Some(&json!({"voice_id": ""})));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(f.store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cloning_failure_skips_write_and_keeps_payload() {
        let payload = json!({"detail": {"status": "invalid_api_key"}});
        let f = fixture(
            Some("secret"),
            FakeFetcher::new(false),
            FakeCloner::returning(vec![Err(CloningError::ServiceError {
                status: 401,
                payload: payload.clone(),
            })]),
            MemoryStore::default(),
        );

        let err = f.handler.handle(command("alice")).await.unwrap_err();

        assert_eq!(err.stage(), "clone");
        if let CloneVoiceError::CloningService(inner) = &err {
            assert_eq!(inner.payload(), Some(&payload));
        }
        assert_eq!(f.store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_persistence_failure_reports_created_voice() {
        let f = fixture(
            Some("secret"),
            FakeFetcher::new(false),
            FakeCloner::returning(vec![cloned("v9")]),
            MemoryStore {
                fail: true,
                ..Default::default()
            },
        );

        let err = f.handler.handle(command("alice")).await.unwrap_err();

        match err {
            CloneVoiceError::Persistence { voice_id, .. } => assert_eq!(voice_id, "v9"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(f.cloner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_repeated_requests_overwrite_voice_id() {
        let f = fixture(
            Some("secret"),
            FakeFetcher::new(false),
            FakeCloner::returning(vec![cloned("first"), cloned("second")]),
            MemoryStore::default(),
        );

        f.handler.handle(command("alice")).await.unwrap();
        let second = f.handler.handle(command("alice")).await.unwrap();

        assert_eq!(second.voice_id, "second");
        assert_eq!(f.cloner.calls.load(Ordering::SeqCst), 2);
        let record = f.store.get(&alice_path()).await.unwrap();
        assert_eq!(record, Some(json!({"voiceId": "second"})));
    }

    #[tokio::test]
    async fn test_temp_file_released_on_every_path() {
        let ok = fixture(
            Some("secret"),
            FakeFetcher::new(false),
            FakeCloner::returning(vec![cloned("v1")]),
            MemoryStore::default(),
        );
        ok.handler.handle(command("alice")).await.unwrap();

        let failing = fixture(
            Some("secret"),
            FakeFetcher::new(false),
            FakeCloner::returning(vec![Err(CloningError::Timeout)]),
            MemoryStore::default(),
        );
        failing.handler.handle(command("alice")).await.unwrap_err();

        for f in [&ok, &failing] {
            let paths = f.fetcher.paths.lock().unwrap();
            assert_eq!(paths.len(), 1);
            assert!(!paths[0].exists());
        }
    }
}
