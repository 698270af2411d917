use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::interview::session::Session;
use crate::llm_client::LlmClient;
use crate::profiler::PromptProfiler;

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Pluggable profiler. `HttpProfiler` in production; stubs in tests.
    pub profiler: Arc<dyn PromptProfiler>,
    /// TTL cache over profiler replies, keyed on (raw prompt, job title).
    pub cache: Arc<TtlCache<Value>>,
    /// Live sessions. In-memory only; a restart returns every client to Idle.
    pub sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    pub config: Config,
}

impl AppState {
    pub fn profile_ttl(&self) -> Duration {
        Duration::from_secs(self.config.cache_ttl_secs)
    }
}
