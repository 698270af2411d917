//! Feedback pipeline: profiles the question/answer pair, requests a JSON-mode
//! completion, and parses the reply defensively.
//!
//! The model is asked for `{"feedback": ..., "recommendation": ...}` but is
//! not trusted to comply: an off-enum recommendation is coerced to the
//! default with a warning, and a non-JSON reply is demoted to raw feedback
//! text with a keyword scan to recover the recommendation.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::cache::TtlCache;
use crate::interview::prompts::{feedback_raw_prompt, feedback_system};
use crate::interview::session::Recommendation;
use crate::interview::CoachError;
use crate::llm_client::{strip_json_fences, ChatOptions, LlmClient};
use crate::profiler::{extract_optimized_prompt, profile_cache_key, PromptProfiler};

const NO_FEEDBACK_PLACEHOLDER: &str = "No feedback provided.";

/// Parsed outcome of one feedback round. `warning` is non-fatal and shown to
/// the user alongside the feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackOutcome {
    pub feedback: String,
    pub recommendation: Recommendation,
    pub warning: Option<String>,
}

/// Wire shape the model is instructed to produce.
#[derive(Debug, Deserialize)]
struct FeedbackReply {
    feedback: Option<String>,
    recommendation: Option<String>,
}

/// Generates feedback for an answered question and recommends the next
/// difficulty move.
pub async fn generate_feedback(
    profiler: &dyn PromptProfiler,
    cache: &TtlCache<Value>,
    profile_ttl: Duration,
    llm: &LlmClient,
    job_title: &str,
    question: &str,
    answer: &str,
) -> Result<FeedbackOutcome, CoachError> {
    let raw_prompt = feedback_raw_prompt(question, answer);
    let key = profile_cache_key(&raw_prompt, job_title);

    let profile = cache
        .get_or_compute(&key, profile_ttl, || {
            profiler.profile(&raw_prompt, job_title)
        })
        .await?;

    let optimized_prompt =
        extract_optimized_prompt(&profile).ok_or(CoachError::PromptExtraction)?;

    let reply = llm
        .chat(
            &feedback_system(job_title),
            &optimized_prompt,
            &ChatOptions {
                json_response: true,
                ..ChatOptions::default()
            },
        )
        .await?;

    Ok(parse_feedback(&reply))
}

/// Parses the model's feedback reply. Never fails: every malformed input
/// degrades to usable feedback plus a warning.
pub fn parse_feedback(reply: &str) -> FeedbackOutcome {
    let text = strip_json_fences(reply);

    match serde_json::from_str::<FeedbackReply>(text) {
        Ok(parsed) => {
            let feedback = parsed
                .feedback
                .unwrap_or_else(|| NO_FEEDBACK_PLACEHOLDER.to_string());

            let (recommendation, warning) = match parsed.recommendation {
                Some(value) => match Recommendation::parse(&value) {
                    Some(recommendation) => (recommendation, None),
                    None => {
                        let warning = format!(
                            "Invalid recommendation value: '{value}'. Keeping the current difficulty."
                        );
                        warn!("{warning}");
                        (Recommendation::default(), Some(warning))
                    }
                },
                None => (
                    Recommendation::default(),
                    Some("No recommendation provided. Keeping the current difficulty.".to_string()),
                ),
            };

            FeedbackOutcome {
                feedback,
                recommendation,
                warning,
            }
        }
        Err(e) => {
            warn!("Failed to parse feedback JSON: {e}. Falling back to raw text.");
            // The raw reply becomes the feedback; scan it for a level keyword.
            FeedbackOutcome {
                feedback: reply.trim().to_string(),
                recommendation: Recommendation::scan(reply).unwrap_or_default(),
                warning: Some("The model reply was not valid JSON; showing it as-is.".to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_json_reply_normalizes_recommendation_case() {
        let outcome =
            parse_feedback(r#"{"feedback": "Good answer.", "recommendation": "HARDER"}"#);
        assert_eq!(outcome.feedback, "Good answer.");
        assert_eq!(outcome.recommendation, Recommendation::Harder);
        assert!(outcome.warning.is_none());
    }

    #[test]
    fn test_invalid_recommendation_coerced_to_default_with_warning() {
        let outcome =
            parse_feedback(r#"{"feedback": "Decent.", "recommendation": "maybe"}"#);
        assert_eq!(outcome.recommendation, Recommendation::Same);
        let warning = outcome.warning.expect("warning expected");
        assert!(warning.contains("maybe"));
    }

    #[test]
    fn test_missing_recommendation_defaults_with_warning() {
        let outcome = parse_feedback(r#"{"feedback": "Fine."}"#);
        assert_eq!(outcome.recommendation, Recommendation::Same);
        assert!(outcome.warning.is_some());
    }

    #[test]
    fn test_missing_feedback_uses_placeholder() {
        let outcome = parse_feedback(r#"{"recommendation": "same"}"#);
        assert_eq!(outcome.feedback, NO_FEEDBACK_PLACEHOLDER);
        assert_eq!(outcome.recommendation, Recommendation::Same);
    }

    #[test]
    fn test_non_json_reply_recovers_recommendation_from_text() {
        let outcome = parse_feedback("Solid answer overall, but try an easier pace next.");
        assert_eq!(outcome.recommendation, Recommendation::Easier);
        assert!(outcome.feedback.contains("Solid answer overall"));
        assert!(outcome.warning.is_some());
    }

    #[test]
    fn test_non_json_reply_without_keywords_defaults() {
        let outcome = parse_feedback("An unstructured remark.");
        assert_eq!(outcome.recommendation, Recommendation::Same);
        assert_eq!(outcome.feedback, "An unstructured remark.");
    }

    #[test]
    fn test_fenced_json_reply_is_unwrapped() {
        let outcome = parse_feedback(
            "```json\n{\"feedback\": \"Good.\", \"recommendation\": \"harder\"}\n```",
        );
        assert_eq!(outcome.feedback, "Good.");
        assert_eq!(outcome.recommendation, Recommendation::Harder);
    }
}
