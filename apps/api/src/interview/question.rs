//! Question generation pipeline: raw prompt -> cached profiler call ->
//! optimized prompt -> completion -> boilerplate strip.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::TtlCache;
use crate::interview::prompts::{question_raw_prompt, question_system, strip_boilerplate};
use crate::interview::session::Difficulty;
use crate::interview::CoachError;
use crate::llm_client::{ChatOptions, LlmClient};
use crate::profiler::{extract_optimized_prompt, profile_cache_key, PromptProfiler};

/// Questions are short; the original flow caps generation at 70 tokens.
const QUESTION_MAX_TOKENS: u32 = 70;

/// Generates one interview question for the job title at the given
/// difficulty. Every failure is a tagged [`CoachError`]; the handler layer
/// turns it into a placeholder so the session continues.
pub async fn generate_question(
    profiler: &dyn PromptProfiler,
    cache: &TtlCache<Value>,
    profile_ttl: Duration,
    llm: &LlmClient,
    job_title: &str,
    difficulty: Difficulty,
) -> Result<String, CoachError> {
    let raw_prompt = question_raw_prompt(job_title, difficulty);
    let key = profile_cache_key(&raw_prompt, job_title);

    let profile = cache
        .get_or_compute(&key, profile_ttl, || {
            profiler.profile(&raw_prompt, job_title)
        })
        .await?;

    let optimized_prompt =
        extract_optimized_prompt(&profile).ok_or(CoachError::PromptExtraction)?;
    debug!("optimized question prompt: {} chars", optimized_prompt.len());

    let question = llm
        .chat(
            &question_system(job_title),
            &optimized_prompt,
            &ChatOptions {
                max_tokens: QUESTION_MAX_TOKENS,
                ..ChatOptions::default()
            },
        )
        .await?;

    Ok(strip_boilerplate(&question).to_string())
}
