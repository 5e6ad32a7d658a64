//! XP award table, learning event payloads, and event validation (PRD-06).
//!
//! Award values are product tuning knobs; keep them as named constants
//! rather than inlining the numbers at call sites.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Award constants
// ---------------------------------------------------------------------------

/// XP for one requested explanation.
pub const XP_EXPLANATION: i32 = 10;
/// XP for completing a quiz, pass or fail.
pub const XP_QUIZ_COMPLETED: i32 = 20;
/// Additional XP when a completed quiz is passed.
pub const XP_QUIZ_PASSED_BONUS: i32 = 10;
/// XP per flashcard studied.
pub const XP_FLASHCARD_PER_CARD: i32 = 2;
/// Lowest XP a focus session may award.
pub const FOCUS_XP_MIN: i32 = 1;
/// Highest XP a focus session may award.
pub const FOCUS_XP_MAX: i32 = 60;

// ---------------------------------------------------------------------------
// Validation constants
// ---------------------------------------------------------------------------

/// Lower bound for quiz scores.
pub const SCORE_MIN: f64 = 0.0;
/// Upper bound for quiz scores.
pub const SCORE_MAX: f64 = 100.0;

// ---------------------------------------------------------------------------
// Event payloads
// ---------------------------------------------------------------------------

/// A discrete learning event reported by a collaborator service.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LearningEvent {
    /// The user requested an AI explanation.
    Explanation {
        topic: Option<String>,
        subject: Option<String>,
    },
    /// The user submitted a quiz. Score fields are optional; when present
    /// they feed per-topic progress tracking.
    QuizCompleted {
        passed: bool,
        topic: Option<String>,
        subject: Option<String>,
        score: Option<f64>,
        total_questions: Option<i32>,
        correct_answers: Option<i32>,
    },
    /// The user studied a batch of flashcards.
    FlashcardsStudied {
        card_count: i32,
        mastered_count: i32,
    },
    /// The user finished a focus session. The caller converts the session
    /// duration into an XP amount, bounded by [`FOCUS_XP_MIN`]..=[`FOCUS_XP_MAX`].
    FocusSession {
        duration_minutes: i32,
        xp_to_award: i32,
    },
}

/// Stable event-kind labels carried on [`XpEventResult`] payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Explanation,
    Quiz,
    Flashcard,
    FocusSession,
}

impl LearningEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Explanation { .. } => EventKind::Explanation,
            Self::QuizCompleted { .. } => EventKind::Quiz,
            Self::FlashcardsStudied { .. } => EventKind::Flashcard,
            Self::FocusSession { .. } => EventKind::FocusSession,
        }
    }

    /// Base XP award for this event, excluding badge bonuses.
    pub fn base_award(&self) -> i32 {
        match self {
            Self::Explanation { .. } => XP_EXPLANATION,
            Self::QuizCompleted { passed, .. } => {
                XP_QUIZ_COMPLETED + if *passed { XP_QUIZ_PASSED_BONUS } else { 0 }
            }
            Self::FlashcardsStudied { card_count, .. } => XP_FLASHCARD_PER_CARD * card_count,
            Self::FocusSession { xp_to_award, .. } => *xp_to_award,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an incoming event before it mutates any state.
///
/// Impossible counters (negative counts, more correct answers than
/// questions) are [`CoreError::InvalidEvent`]; inputs merely outside their
/// expected range (scores, focus XP) are [`CoreError::Validation`].
pub fn validate(event: &LearningEvent) -> Result<(), CoreError> {
    match event {
        LearningEvent::Explanation { .. } => Ok(()),
        LearningEvent::QuizCompleted {
            score,
            total_questions,
            correct_answers,
            ..
        } => {
            if let Some(s) = score {
                if !(SCORE_MIN..=SCORE_MAX).contains(s) {
                    return Err(CoreError::Validation(format!(
                        "Quiz score {s} outside {SCORE_MIN}-{SCORE_MAX}"
                    )));
                }
            }
            if total_questions.is_some_and(|q| q < 0) || correct_answers.is_some_and(|c| c < 0) {
                return Err(CoreError::InvalidEvent(
                    "Quiz question counters cannot be negative".into(),
                ));
            }
            if let (Some(q), Some(c)) = (total_questions, correct_answers) {
                if c > q {
                    return Err(CoreError::InvalidEvent(format!(
                        "Quiz reports {c} correct answers out of {q} questions"
                    )));
                }
            }
            Ok(())
        }
        LearningEvent::FlashcardsStudied {
            card_count,
            mastered_count,
        } => {
            if *card_count < 0 || *mastered_count < 0 {
                return Err(CoreError::InvalidEvent(
                    "Flashcard counters cannot be negative".into(),
                ));
            }
            if mastered_count > card_count {
                return Err(CoreError::InvalidEvent(format!(
                    "Cannot master {mastered_count} of {card_count} studied cards"
                )));
            }
            Ok(())
        }
        LearningEvent::FocusSession {
            duration_minutes,
            xp_to_award,
        } => {
            if *duration_minutes <= 0 {
                return Err(CoreError::InvalidEvent(format!(
                    "Focus session duration must be positive, got {duration_minutes}"
                )));
            }
            if !(FOCUS_XP_MIN..=FOCUS_XP_MAX).contains(xp_to_award) {
                return Err(CoreError::Validation(format!(
                    "Focus session XP {xp_to_award} outside {FOCUS_XP_MIN}-{FOCUS_XP_MAX}"
                )));
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
