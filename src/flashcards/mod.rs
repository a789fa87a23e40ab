//! Flashcard study for studydeck
//!
//! This module provides:
//! - Card and grade models
//! - Due-card selection for building a session
//! - The study session engine with same-session re-study of failed cards
//! - Review submission to the backend scheduler

pub mod due;
pub mod models;
pub mod session;
pub mod submitter;

pub use due::due_cards;
pub use models::*;
pub use session::{Progress, SessionError, SessionState, StartOutcome, StudySession};
pub use submitter::{
    Acknowledgment, HttpReviewSubmitter, LoggingSubmitter, ReviewSubmitter, SubmissionError,
    SubmissionWarning,
};
