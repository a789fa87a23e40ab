//! Data models for the flashcard system

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A flashcard as handed out by the backend.
///
/// Only `id` matters to session sequencing; the content fields are carried
/// through untouched for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// When the backend scheduler wants this card reviewed next.
    /// `None` for cards that have never been scheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Card {
    pub fn new(deck_id: Uuid, front: String, back: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            deck_id,
            front,
            back,
            tags: Vec::new(),
            next_review: None,
            created_at: Utc::now(),
        }
    }

    /// Check if the card is due at `now`
    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        self.next_review.map_or(true, |due| due <= now)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GradeError {
    #[error("Grade out of range: {0} (expected 0-5)")]
    OutOfRange(u8),
}

/// Quality rating on the SM-2 scale (0-5)
///
/// - 0: Complete blackout, no recall
/// - 1: Incorrect, but upon seeing answer, remembered ("Again")
/// - 2: Incorrect, but answer seemed easy to recall
/// - 3: Correct response with serious difficulty
/// - 4: Correct response after hesitation
/// - 5: Perfect response with no hesitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const MAX: u8 = 5;

    /// The only grade that sends a card back into the current session.
    pub const AGAIN: Grade = Grade(1);

    pub fn new(value: u8) -> Result<Self, GradeError> {
        if value > Self::MAX {
            return Err(GradeError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_again(self) -> bool {
        self == Self::AGAIN
    }
}

impl TryFrom<u8> for Grade {
    type Error = GradeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four answer buttons shown while studying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// Map a UI button (1-4: Again, Hard, Good, Easy) to a rating.
    /// Anything else is treated as Good.
    pub fn from_ui(button: u8) -> Self {
        match button {
            1 => Self::Again,
            2 => Self::Hard,
            3 => Self::Good,
            4 => Self::Easy,
            _ => Self::Good,
        }
    }

    pub fn grade(self) -> Grade {
        match self {
            Self::Again => Grade::AGAIN, // incorrect but recognized
            Self::Hard => Grade(3),      // correct with difficulty
            Self::Good => Grade(4),      // correct with hesitation
            Self::Easy => Grade(5),      // perfect
        }
    }
}

impl From<Rating> for Grade {
    fn from(rating: Rating) -> Self {
        rating.grade()
    }
}

/// A record of a single grade given during a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub card_id: Uuid,
    pub grade: Grade,
    /// Whether the card was put back into the session queue
    pub reinserted: bool,
    pub reviewed_at: DateTime<Utc>,
}

impl ReviewRecord {
    pub fn new(card_id: Uuid, grade: Grade, reinserted: bool) -> Self {
        Self {
            card_id,
            grade,
            reinserted,
            reviewed_at: Utc::now(),
        }
    }
}

/// Statistics for a finished or abandoned session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Total grades given, including repeats of failed cards
    pub reviews: usize,
    /// Number of "Again" grades
    pub again_count: usize,
    /// Distinct cards seen
    pub unique_cards: usize,
    /// Whether the queue was exhausted before the session was closed
    pub finished: bool,
    pub records: Vec<ReviewRecord>,
}

impl SessionSummary {
    /// Share of grades that were not "Again" (0.0 - 1.0)
    pub fn accuracy(&self) -> f64 {
        if self.reviews == 0 {
            return 0.0;
        }
        (self.reviews - self.again_count) as f64 / self.reviews as f64
    }
}
