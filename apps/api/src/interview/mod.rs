//! The coaching flow: session state machine, question generation, and
//! answer feedback.

pub mod feedback;
pub mod handlers;
pub mod prompts;
pub mod question;
pub mod session;

use thiserror::Error;

use crate::llm_client::LlmError;
use crate::profiler::ProfilerError;

/// Failure points of the question/feedback pipelines. Each variant maps to a
/// distinct user-facing placeholder at the handler layer; none of them ends
/// the session.
#[derive(Debug, Error)]
pub enum CoachError {
    #[error("intelligence profiler unavailable: {0}")]
    ProfilerUnavailable(#[from] ProfilerError),

    #[error("could not extract an optimized prompt from the profiler reply")]
    PromptExtraction,

    #[error("completion call failed: {0}")]
    Completion(#[from] LlmError),
}
