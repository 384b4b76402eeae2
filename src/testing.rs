//! Test doubles for the outbound collaborators.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::assistant::{Assistant, Framing};
use crate::bot::api::{ChatApi, Restriction};
use crate::bot::dispatcher::AppState;
use crate::config::Config;
use crate::database::{KvStore, MemoryStore};

/// Memory store with injectable faults.
#[derive(Default)]
pub struct TestStore {
    inner: MemoryStore,
    fail_deletes: bool,
    read_delay: Option<Duration>,
}

impl TestStore {
    /// Every `delete` fails; reads and writes work.
    pub fn failing_deletes() -> Self {
        Self {
            fail_deletes: true,
            ..Self::default()
        }
    }

    /// Every `get` waits `delay` after reading, so concurrent
    /// read-modify-write sequences overlap unless something serializes them.
    pub fn slow_reads(delay: Duration) -> Self {
        Self {
            read_delay: Some(delay),
            ..Self::default()
        }
    }
}

#[async_trait]
impl KvStore for TestStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let value = self.inner.get(key).await?;
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        if self.fail_deletes {
            anyhow::bail!("delete failed");
        }
        self.inner.delete(key).await
    }
}

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Delete { chat_id: i64, message_id: i32 },
    Ban { chat_id: i64, user_id: u64 },
    Restrict { chat_id: i64, user_id: u64, restriction: Restriction },
    Send { chat_id: i64, text: String, reply_to: Option<i32> },
}

/// `ChatApi` that records calls, optionally failing each of them.
#[derive(Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<Call>>,
    fail: bool,
}

impl RecordingApi {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::default(),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Texts of all sent messages.
    pub fn sent(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> anyhow::Result<()> {
        self.calls.lock().push(call);
        if self.fail {
            anyhow::bail!("telegram unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl ChatApi for RecordingApi {
    async fn delete_message(&self, chat_id: i64, message_id: i32) -> anyhow::Result<()> {
        self.record(Call::Delete { chat_id, message_id })
    }

    async fn ban_chat_member(&self, chat_id: i64, user_id: u64) -> anyhow::Result<()> {
        self.record(Call::Ban { chat_id, user_id })
    }

    async fn restrict_chat_member(
        &self,
        chat_id: i64,
        user_id: u64,
        restriction: Restriction,
    ) -> anyhow::Result<()> {
        self.record(Call::Restrict { chat_id, user_id, restriction })
    }

    async fn send_message(&self, chat_id: i64, text: &str, reply_to: Option<i32>) -> anyhow::Result<()> {
        self.record(Call::Send { chat_id, text: text.to_string(), reply_to })
    }
}

/// `Assistant` that echoes its input and remembers every request.
#[derive(Default)]
pub struct StubAssistant {
    requests: Mutex<Vec<(String, Framing)>>,
}

impl StubAssistant {
    pub fn requests(&self) -> Vec<(String, Framing)> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Assistant for StubAssistant {
    async fn complete(&self, query: &str, framing: Framing) -> String {
        self.requests.lock().push((query.to_string(), framing));
        format!("answer: {}", query)
    }
}

pub const BOT_HANDLE: &str = "AquaWorldir_bot";
pub const GLOBAL_ADMIN: u64 = 1;

/// Everything a dispatcher test needs to inspect.
pub struct Harness {
    pub state: AppState,
    pub store: Arc<TestStore>,
    pub api: Arc<RecordingApi>,
    pub assistant: Arc<StubAssistant>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(TestStore::default())
    }

    pub fn with_store(store: TestStore) -> Self {
        let config = Config::from_lookup(|key| match key {
            "BOT_TOKEN" => Some("test".to_string()),
            "STORE_BACKEND" => Some("memory".to_string()),
            "ADMIN_IDS" => Some(GLOBAL_ADMIN.to_string()),
            _ => None,
        })
        .expect("test config");

        let store = Arc::new(store);
        let api = Arc::new(RecordingApi::default());
        let assistant = Arc::new(StubAssistant::default());

        let state = AppState::new(
            &config,
            store.clone() as Arc<dyn KvStore>,
            api.clone(),
            assistant.clone(),
            BOT_HANDLE.to_string(),
        )
        .expect("test state");

        Self { state, store, api, assistant }
    }
}
