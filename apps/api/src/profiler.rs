//! Intelligence-profiler client and response parsing.
//!
//! The profiler is an opaque external service that rewrites a raw prompt into
//! an "optimized" one, presumed better tuned for the downstream model. Its
//! contract is fixed: the reply is an object with a `response` field whose
//! value is either an object or a JSON-encoded string, carrying an
//! `optimized_response` field. Anything off-contract parses to `None` and the
//! caller degrades.
//!
//! The trait seam exists so the question/feedback pipelines can be exercised
//! in tests without the network; `AppState` carries an
//! `Arc<dyn PromptProfiler>`.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

/// Request timeout for profiler calls.
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ProfilerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("profiler returned status {status}: {message}")]
    Api { status: u16, message: String },
}

#[async_trait]
pub trait PromptProfiler: Send + Sync {
    /// Profiles a raw prompt for the given job title, returning the raw
    /// profiler reply.
    async fn profile(&self, raw_prompt: &str, job_title: &str) -> Result<Value, ProfilerError>;
}

/// HTTP-backed profiler pointed at the configured endpoint.
pub struct HttpProfiler {
    client: Client,
    url: String,
    model_provider: String,
    model_name: String,
}

impl HttpProfiler {
    pub fn new(url: String, model_provider: String, model_name: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            url,
            model_provider,
            model_name,
        }
    }
}

#[async_trait]
impl PromptProfiler for HttpProfiler {
    async fn profile(&self, raw_prompt: &str, job_title: &str) -> Result<Value, ProfilerError> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({
                "prompt": raw_prompt,
                "role": job_title,
                "model_provider": self.model_provider,
                "model_name": self.model_name,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProfilerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Cache key for a profiler call: both arguments participate, so the same
/// prompt for two job titles is profiled twice.
pub fn profile_cache_key(raw_prompt: &str, job_title: &str) -> String {
    format!("{raw_prompt}\u{1f}{job_title}")
}

/// Extracts the optimized prompt from a profiler reply.
///
/// The `response` value may be a JSON-encoded string or already an object.
/// Returns `None` on any parse error or shape mismatch; the caller treats
/// that as a failed profiler round, not a hard error.
pub fn extract_optimized_prompt(profile: &Value) -> Option<String> {
    let response_value = profile.as_object()?.get("response")?;

    let parsed;
    let response_data = match response_value {
        // String response: attempt JSON parsing
        Value::String(encoded) => {
            parsed = serde_json::from_str::<Value>(encoded).ok()?;
            parsed.as_object()?
        }
        Value::Object(map) => map,
        _ => return None,
    };

    response_data
        .get("optimized_response")
        .and_then(|v| v.as_str())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_string_encoded_response() {
        let profile = json!({"response": "{\"optimized_response\": \"X\"}"});
        assert_eq!(extract_optimized_prompt(&profile), Some("X".to_string()));
    }

    #[test]
    fn test_extract_from_object_response() {
        let profile = json!({"response": {"optimized_response": "X"}});
        assert_eq!(extract_optimized_prompt(&profile), Some("X".to_string()));
    }

    #[test]
    fn test_extract_missing_response_key() {
        let profile = json!({"nope": 1});
        assert_eq!(extract_optimized_prompt(&profile), None);
    }

    #[test]
    fn test_extract_unparseable_string_response() {
        let profile = json!({"response": "not json at all"});
        assert_eq!(extract_optimized_prompt(&profile), None);
    }

    #[test]
    fn test_extract_string_response_parsing_to_non_object() {
        let profile = json!({"response": "[1, 2, 3]"});
        assert_eq!(extract_optimized_prompt(&profile), None);
    }

    #[test]
    fn test_extract_response_of_wrong_type() {
        let profile = json!({"response": 42});
        assert_eq!(extract_optimized_prompt(&profile), None);
    }

    #[test]
    fn test_extract_object_without_optimized_response() {
        let profile = json!({"response": {"other": "field"}});
        assert_eq!(extract_optimized_prompt(&profile), None);
    }

    #[test]
    fn test_cache_key_distinguishes_job_titles() {
        let a = profile_cache_key("same prompt", "Backend Engineer");
        let b = profile_cache_key("same prompt", "Data Scientist");
        assert_ne!(a, b);
    }
}
