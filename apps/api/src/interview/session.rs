//! Session state and pure transition functions.
//!
//! The session lifecycle is Idle -> Active(q = 1..5) -> Complete. Idle means
//! no session exists in the store; an explicit "start over" deletes the
//! session and returns the client to Idle. All transitions are pure methods
//! on [`Session`] so the flow is testable without an HTTP harness.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A coaching session always asks exactly five questions.
pub const QUESTIONS_PER_SESSION: usize = 5;

/// Question difficulty. Moves at most one notch per answer, clamped at the
/// boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    fn one_easier(self) -> Self {
        match self {
            Difficulty::Easy | Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }

    fn one_harder(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Hard => Difficulty::Hard,
        }
    }

    /// Applies a feedback recommendation, moving one notch in the requested
    /// direction.
    pub fn apply(self, recommendation: Recommendation) -> Self {
        match recommendation {
            Recommendation::Easier => self.one_easier(),
            Recommendation::Same => self,
            Recommendation::Harder => self.one_harder(),
        }
    }
}

/// Seniority as chosen at session start. Distinct from [`Difficulty`]: the
/// choice seeds the starting difficulty and is not tracked afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seniority {
    Junior,
    Mid,
    Senior,
}

impl Seniority {
    pub fn starting_difficulty(self) -> Difficulty {
        match self {
            Seniority::Junior => Difficulty::Easy,
            Seniority::Mid => Difficulty::Medium,
            Seniority::Senior => Difficulty::Hard,
        }
    }
}

/// The model's difficulty recommendation for the next question.
///
/// Kept separate from [`Difficulty`] on purpose: a recommendation is a
/// relative move, not a level. The default is `Same`, so an invalid or
/// missing value leaves the difficulty untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Easier,
    #[default]
    Same,
    Harder,
}

impl Recommendation {
    pub const ALL: [Recommendation; 3] = [
        Recommendation::Easier,
        Recommendation::Same,
        Recommendation::Harder,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Easier => "easier",
            Recommendation::Same => "same",
            Recommendation::Harder => "harder",
        }
    }

    /// Parses a recommendation case-insensitively. `None` for anything
    /// outside the closed enum.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "easier" => Some(Recommendation::Easier),
            "same" => Some(Recommendation::Same),
            "harder" => Some(Recommendation::Harder),
            _ => None,
        }
    }

    /// Recovers a recommendation from free text by scanning for any of the
    /// level keywords, first match wins. Used when the model ignores the
    /// JSON instruction.
    pub fn scan(text: &str) -> Option<Self> {
        let lowered = text.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| lowered.contains(level.label()))
    }
}

/// Where the session is in its five-question flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Active,
    Complete,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session is already complete")]
    AlreadyComplete,

    #[error("no question is pending for this round")]
    NoPendingQuestion,
}

/// One full answered round, as shown in the final summary.
#[derive(Debug, Clone, Serialize)]
pub struct Round {
    pub question: String,
    pub answer: String,
    pub feedback: String,
}

/// In-memory session state. Never persisted; dropped with the store.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub job_title: String,
    pub difficulty: Difficulty,
    /// 1-based index of the current question. Stays at 5 once complete.
    pub question_num: usize,
    pub phase: Phase,
    pub rounds: Vec<Round>,
    /// The question generated for the current round, awaiting an answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_question: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn start(job_title: impl Into<String>, seniority: Seniority) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_title: job_title.into(),
            difficulty: seniority.starting_difficulty(),
            question_num: 1,
            phase: Phase::Active,
            rounds: Vec::with_capacity(QUESTIONS_PER_SESSION),
            pending_question: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Records the answered round: appends the Q/A/feedback triple, applies
    /// the difficulty move, and advances the counter or completes the
    /// session after round five.
    pub fn record_round(
        &mut self,
        answer: String,
        feedback: String,
        recommendation: Recommendation,
    ) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::AlreadyComplete);
        }
        let question = self
            .pending_question
            .take()
            .ok_or(SessionError::NoPendingQuestion)?;

        self.rounds.push(Round {
            question,
            answer,
            feedback,
        });
        self.difficulty = self.difficulty.apply(recommendation);

        if self.rounds.len() >= QUESTIONS_PER_SESSION {
            self.phase = Phase::Complete;
        } else {
            self.question_num += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seniority_maps_to_starting_difficulty() {
        assert_eq!(Seniority::Junior.starting_difficulty(), Difficulty::Easy);
        assert_eq!(Seniority::Mid.starting_difficulty(), Difficulty::Medium);
        assert_eq!(Seniority::Senior.starting_difficulty(), Difficulty::Hard);
    }

    #[test]
    fn test_harder_from_medium_then_clamped_at_hard() {
        let d = Difficulty::Medium.apply(Recommendation::Harder);
        assert_eq!(d, Difficulty::Hard);
        assert_eq!(d.apply(Recommendation::Harder), Difficulty::Hard);
    }

    #[test]
    fn test_easier_clamped_at_easy() {
        let d = Difficulty::Easy.apply(Recommendation::Easier);
        assert_eq!(d, Difficulty::Easy);
    }

    #[test]
    fn test_same_leaves_difficulty_untouched() {
        assert_eq!(
            Difficulty::Medium.apply(Recommendation::Same),
            Difficulty::Medium
        );
    }

    #[test]
    fn test_recommendation_parse_is_case_insensitive() {
        assert_eq!(Recommendation::parse("HARDER"), Some(Recommendation::Harder));
        assert_eq!(Recommendation::parse(" easier "), Some(Recommendation::Easier));
        assert_eq!(Recommendation::parse("maybe"), None);
    }

    #[test]
    fn test_recommendation_scan_finds_keyword_anywhere() {
        let text = "Overall fine, but I would go easier next time.";
        assert_eq!(Recommendation::scan(text), Some(Recommendation::Easier));
        assert_eq!(Recommendation::scan("no keywords here"), None);
    }

    #[test]
    fn test_start_resets_counter_and_seeds_difficulty() {
        let session = Session::start("Backend Engineer", Seniority::Junior);
        assert_eq!(session.difficulty, Difficulty::Easy);
        assert_eq!(session.question_num, 1);
        assert_eq!(session.phase, Phase::Active);
        assert!(session.rounds.is_empty());
    }

    #[test]
    fn test_five_rounds_complete_the_session() {
        let mut session = Session::start("Backend Engineer", Seniority::Mid);
        for i in 1..=QUESTIONS_PER_SESSION {
            session.pending_question = Some(format!("Q{i}"));
            session
                .record_round(format!("A{i}"), format!("F{i}"), Recommendation::Same)
                .unwrap();
        }
        assert!(session.is_complete());
        assert_eq!(session.rounds.len(), QUESTIONS_PER_SESSION);
        assert_eq!(session.question_num, QUESTIONS_PER_SESSION);

        session.pending_question = Some("Q6".to_string());
        assert_eq!(
            session.record_round("A6".into(), "F6".into(), Recommendation::Same),
            Err(SessionError::AlreadyComplete)
        );
    }

    #[test]
    fn test_record_round_requires_pending_question() {
        let mut session = Session::start("Backend Engineer", Seniority::Mid);
        assert_eq!(
            session.record_round("A".into(), "F".into(), Recommendation::Same),
            Err(SessionError::NoPendingQuestion)
        );
    }

    #[test]
    fn test_record_round_applies_recommendation() {
        let mut session = Session::start("Backend Engineer", Seniority::Mid);
        session.pending_question = Some("Q1".to_string());
        session
            .record_round("A1".into(), "F1".into(), Recommendation::Harder)
            .unwrap();
        assert_eq!(session.difficulty, Difficulty::Hard);
        assert_eq!(session.question_num, 2);
    }
}
