// All LLM prompt constants and builders for the interview module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::interview::session::Difficulty;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// Raw prompt sent to the profiler before generating a question.
pub fn question_raw_prompt(job_title: &str, difficulty: Difficulty) -> String {
    format!(
        "Generate one interview question suitable to ask a candidate applying \
         for a {}-level {} position.",
        difficulty.label(),
        job_title
    )
}

/// System message for the question completion call.
pub fn question_system(job_title: &str) -> String {
    format!(
        "You are an AI simulating an interview for a {job_title} role. \
         Ask one relevant interview question based on the user prompt."
    )
}

/// Raw prompt sent to the profiler before generating feedback. Requests a
/// strict two-field JSON reply.
pub fn feedback_raw_prompt(question: &str, answer: &str) -> String {
    format!(
        "Question asked: '{question}'. Candidate's answer: '{answer}'. \
         Provide feedback for the candidate's answer and recommend the next \
         question difficulty. Respond in JSON format with two fields: \
         'feedback' (a one-sentence evaluation) and 'recommendation' \
         (must be one of: easier, same, harder)."
    )
}

/// System message for the feedback completion call.
pub fn feedback_system(job_title: &str) -> String {
    format!(
        "You are an AI providing feedback on a candidate's interview answer \
         for a {job_title} role. Respond with a JSON object containing two \
         fields: 'feedback' (a concise sentence evaluating their answer) and \
         'recommendation' (which must be exactly one of: 'easier', 'same', \
         or 'harder'). {JSON_ONLY_SYSTEM}"
    )
}

/// Leading boilerplate the model prepends to questions despite instructions.
const BOILERPLATE_PREFIXES: &[&str] = &[
    "Okay, here's a question:",
    "Here's one:",
    "Here's a question:",
];

/// Strips known boilerplate prefixes from a generated question.
pub fn strip_boilerplate(question: &str) -> &str {
    for prefix in BOILERPLATE_PREFIXES {
        if let Some(stripped) = question.strip_prefix(prefix) {
            return stripped.trim_start();
        }
    }
    question
}
