//! Due-card selection
//!
//! This is the caller's policy for building a session queue. The session
//! engine itself never filters by due date.

use chrono::{DateTime, Utc};

use super::models::Card;

/// Get all cards due at `now`, oldest first.
///
/// Cards that were never scheduled come first; ties keep their input order.
/// `limit` caps the result, like a deck's reviews-per-day setting.
pub fn due_cards(cards: &[Card], now: DateTime<Utc>, limit: Option<usize>) -> Vec<Card> {
    let mut due: Vec<Card> = cards
        .iter()
        .filter(|card| card.is_due_at(now))
        .cloned()
        .collect();

    // None sorts before Some, so unscheduled cards lead
    due.sort_by(|a, b| a.next_review.cmp(&b.next_review));

    if let Some(limit) = limit {
        due.truncate(limit);
    }

    due
}
