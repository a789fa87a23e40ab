//! Study session engine
//!
//! Sequences the cards shown in one sitting. A card graded "Again" is put
//! back into the queue at a random later position so it comes round again
//! before the session ends; every other grade retires the card for this
//! session. Scheduling the next due date is left to the backend.

use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::models::{Card, Grade, ReviewRecord, SessionSummary};
use super::submitter::{Acknowledgment, ReviewSubmitter};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No current card: position {position} of {length}")]
    OutOfRange { position: usize, length: usize },
    #[error("Session can only be restarted once finished")]
    NotFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No cards were supplied, or `start` was never called
    NotStarted,
    InProgress,
    Finished,
}

/// Result of starting a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started { total: usize },
    /// The due list was empty; the session never enters `InProgress`
    NothingDue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub position: usize,
    pub length: usize,
}

/// One study sitting over a list of due cards
pub struct StudySession<R = StdRng> {
    submitter: Arc<dyn ReviewSubmitter>,
    rng: R,
    original: Vec<Card>,
    queue: Vec<Card>,
    position: usize,
    state: SessionState,
    records: Vec<ReviewRecord>,
}

impl StudySession<StdRng> {
    pub fn new(submitter: Arc<dyn ReviewSubmitter>) -> Self {
        Self::with_rng(submitter, StdRng::from_entropy())
    }
}

impl<R: Rng> StudySession<R> {
    /// Create a session drawing re-insertion offsets from `rng`
    pub fn with_rng(submitter: Arc<dyn ReviewSubmitter>, rng: R) -> Self {
        Self {
            submitter,
            rng,
            original: Vec::new(),
            queue: Vec::new(),
            position: 0,
            state: SessionState::NotStarted,
            records: Vec::new(),
        }
    }

    /// Begin studying `cards` in the given order
    pub fn start(&mut self, cards: Vec<Card>) -> StartOutcome {
        self.records.clear();
        self.position = 0;

        if cards.is_empty() {
            self.original.clear();
            self.queue.clear();
            self.state = SessionState::NotStarted;
            log::info!("No cards due, session not started");
            return StartOutcome::NothingDue;
        }

        let total = cards.len();
        self.queue = cards.clone();
        self.original = cards;
        self.state = SessionState::InProgress;
        log::info!("Study session started with {} cards", total);

        StartOutcome::Started { total }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    pub fn progress(&self) -> Progress {
        Progress {
            position: self.position,
            length: self.queue.len(),
        }
    }

    /// The card to show now
    pub fn current_card(&self) -> Result<&Card, SessionError> {
        if self.state != SessionState::InProgress {
            return Err(self.out_of_range());
        }
        self.queue
            .get(self.position)
            .ok_or_else(|| self.out_of_range())
    }

    /// Grade the current card.
    ///
    /// The queue change is committed before this returns. The returned
    /// acknowledgment carries the submission to the backend; its failure
    /// does not undo anything here.
    pub fn grade(&mut self, grade: Grade) -> Result<Acknowledgment, SessionError> {
        let card_id = self.current_card()?.id;

        let reinserted = grade.is_again();
        if reinserted {
            self.reinsert_current();
            self.position += 1;
        } else if self.position + 1 < self.queue.len() {
            self.position += 1;
        } else {
            self.position = self.queue.len();
            self.state = SessionState::Finished;
            log::info!("Study session finished after {} reviews", self.records.len() + 1);
        }

        log::debug!(
            "Graded card {} with {} (position {}/{})",
            card_id,
            grade,
            self.position,
            self.queue.len()
        );
        self.records.push(ReviewRecord::new(card_id, grade, reinserted));

        Ok(Acknowledgment::new(Arc::clone(&self.submitter), card_id, grade))
    }

    /// Study the original card list again. Re-inserted repeats from the
    /// previous pass are discarded.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Finished {
            return Err(SessionError::NotFinished);
        }

        self.queue = self.original.clone();
        self.position = 0;
        self.records.clear();
        self.state = SessionState::InProgress;
        log::info!("Study session restarted with {} cards", self.queue.len());
        Ok(())
    }

    /// Leave the session, whatever its state
    pub fn complete(self) -> SessionSummary {
        let unique_cards = self
            .records
            .iter()
            .map(|r| r.card_id)
            .collect::<HashSet<_>>()
            .len();

        SessionSummary {
            reviews: self.records.len(),
            again_count: self.records.iter().filter(|r| r.reinserted).count(),
            unique_cards,
            finished: self.state == SessionState::Finished,
            records: self.records,
        }
    }

    /// Splice a copy of the current card back in after it.
    ///
    /// The offset skips at least one other card whenever two or more follow,
    /// and never reaches past the end of the current queue.
    fn reinsert_current(&mut self) {
        let remaining = self.queue.len() - (self.position + 1);

        let offset = if remaining == 0 {
            1
        } else {
            let min_offset = remaining.min(2);
            self.rng.gen_range(min_offset..=remaining)
        };

        let card = self.queue[self.position].clone();
        self.queue.insert(self.position + offset, card);
    }

    fn out_of_range(&self) -> SessionError {
        SessionError::OutOfRange {
            position: self.position,
            length: self.queue.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::submitter::{LoggingSubmitter, SubmissionError};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    fn cards(fronts: &[&str]) -> Vec<Card> {
        fronts
            .iter()
            .map(|f| Card::new(Uuid::nil(), f.to_string(), String::new()))
            .collect()
    }

    fn session(seed: u64) -> StudySession {
        StudySession::with_rng(Arc::new(LoggingSubmitter), StdRng::seed_from_u64(seed))
    }

    fn fronts(session: &StudySession) -> Vec<String> {
        session.queue.iter().map(|c| c.front.clone()).collect()
    }

    fn good() -> Grade {
        Grade::new(4).unwrap()
    }

    #[test]
    fn test_empty_input_never_starts() {
        let mut s = session(1);
        assert_eq!(s.start(Vec::new()), StartOutcome::NothingDue);
        assert_eq!(s.state(), SessionState::NotStarted);
        assert!(!s.is_finished());
        assert!(matches!(s.current_card(), Err(SessionError::OutOfRange { .. })));
        assert!(s.grade(good()).is_err());
    }

    #[test]
    fn test_again_example_is_deterministic() {
        // remaining = 2 forces offset 2 regardless of seed
        for seed in 0..20 {
            let mut s = session(seed);
            s.start(cards(&["A", "B", "C"]));

            let _ = s.grade(Grade::AGAIN).unwrap();
            assert_eq!(fronts(&s), vec!["A", "B", "A", "C"]);
            assert_eq!(s.current_card().unwrap().front, "B");

            let _ = s.grade(Grade::new(5).unwrap()).unwrap();
            assert_eq!(s.current_card().unwrap().front, "A");
            assert_eq!(s.progress(), Progress { position: 2, length: 4 });
        }
    }

    #[test]
    fn test_no_immediate_repeat() {
        for seed in 0..50 {
            let mut s = session(seed);
            s.start(cards(&["A", "B", "C", "D", "E", "F"]));

            let before = s.progress().length;
            let _ = s.grade(Grade::AGAIN).unwrap();
            assert_eq!(s.progress().length, before + 1);
            assert_ne!(s.current_card().unwrap().front, "A");

            let reinserted = s.queue.iter().rposition(|c| c.front == "A").unwrap();
            assert!((2..=5).contains(&reinserted));
        }
    }

    #[test]
    fn test_last_card_again_comes_next() {
        let mut s = session(7);
        s.start(cards(&["A", "B"]));
        let _ = s.grade(good()).unwrap();

        let _ = s.grade(Grade::AGAIN).unwrap();
        assert_eq!(fronts(&s), vec!["A", "B", "B"]);
        assert_eq!(s.state(), SessionState::InProgress);
        assert_eq!(s.current_card().unwrap().front, "B");
    }

    #[test]
    fn test_one_remaining_also_comes_next() {
        let mut s = session(3);
        s.start(cards(&["A", "B"]));

        let _ = s.grade(Grade::AGAIN).unwrap();
        assert_eq!(fronts(&s), vec!["A", "A", "B"]);
        assert_eq!(s.current_card().unwrap().front, "A");
    }

    #[test]
    fn test_terminates_after_length_grades() {
        let mut s = session(0);
        s.start(cards(&["A", "B", "C", "D"]));

        for i in 0..4 {
            assert!(!s.is_finished(), "finished early at {}", i);
            let _ = s.grade(Grade::new(3).unwrap()).unwrap();
        }

        assert!(s.is_finished());
        assert_eq!(s.progress(), Progress { position: 4, length: 4 });
        assert!(matches!(s.current_card(), Err(SessionError::OutOfRange { position: 4, length: 4 })));
        assert!(s.grade(good()).is_err());
    }

    #[test]
    fn test_queue_never_shrinks() {
        let mut s = session(11);
        s.start(cards(&["A", "B", "C", "D", "E"]));

        let grades = [1, 4, 1, 0, 1, 5, 1, 2, 3, 1, 4, 4, 5, 5, 3, 4, 4, 4, 4, 4];
        for value in grades {
            if s.is_finished() {
                break;
            }
            let grade = Grade::new(value).unwrap();
            let before = s.progress();
            let _ = s.grade(grade).unwrap();
            let after = s.progress();

            if grade.is_again() {
                assert_eq!(after.length, before.length + 1);
                assert_eq!(after.position, before.position + 1);
            } else {
                assert_eq!(after.length, before.length);
            }
            assert!(after.position <= after.length);
        }
    }

    #[test]
    fn test_restart_restores_original_list() {
        let mut s = session(5);
        let input = cards(&["A", "B", "C"]);
        s.start(input.clone());

        assert_eq!(s.restart(), Err(SessionError::NotFinished));

        let _ = s.grade(Grade::AGAIN).unwrap();
        while !s.is_finished() {
            let _ = s.grade(good()).unwrap();
        }
        assert_eq!(s.progress().length, 4);

        s.restart().unwrap();
        assert_eq!(s.queue, input);
        assert_eq!(s.progress(), Progress { position: 0, length: 3 });
        assert_eq!(s.state(), SessionState::InProgress);
    }

    #[test]
    fn test_complete_summarizes() {
        let mut s = session(9);
        s.start(cards(&["A", "B"]));
        let _ = s.grade(Grade::AGAIN).unwrap();
        let _ = s.grade(good()).unwrap();

        let summary = s.complete();
        assert_eq!(summary.reviews, 2);
        assert_eq!(summary.again_count, 1);
        assert!(!summary.finished);
        assert_eq!(summary.records.len(), 2);
    }

    struct Recording {
        seen: Mutex<Vec<(Uuid, u8)>>,
        fail: bool,
    }

    #[async_trait]
    impl ReviewSubmitter for Recording {
        async fn submit(&self, card_id: Uuid, grade: Grade) -> Result<(), SubmissionError> {
            self.seen.lock().unwrap().push((card_id, grade.value()));
            if self.fail {
                return Err(SubmissionError::Server {
                    status: 500,
                    message: "down".to_string(),
                });
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_grade_commits_before_submission() {
        let submitter = Arc::new(Recording {
            seen: Mutex::new(Vec::new()),
            fail: true,
        });
        let mut s = StudySession::with_rng(submitter.clone(), StdRng::seed_from_u64(1));
        let input = cards(&["A", "B"]);
        let first = input[0].id;
        s.start(input);

        let ack = s.grade(good()).unwrap();
        // Local state already advanced
        assert_eq!(s.progress().position, 1);

        let warning = ack.outcome().await.unwrap_err();
        assert_eq!(warning.card_id, first);
        assert_eq!(submitter.seen.lock().unwrap().as_slice(), &[(first, 4)]);

        // Failure leaves the session where it was
        assert_eq!(s.progress().position, 1);
        assert_eq!(s.current_card().unwrap().front, "B");
    }

    #[tokio::test]
    async fn test_discarded_acknowledgment_still_submits() {
        let submitter = Arc::new(Recording {
            seen: Mutex::new(Vec::new()),
            fail: false,
        });
        let mut s = StudySession::with_rng(submitter.clone(), StdRng::seed_from_u64(1));
        let input = cards(&["A"]);
        let only = input[0].id;
        s.start(input);

        let _ = s.grade(good()).unwrap();
        assert!(s.is_finished());

        for _ in 0..10 {
            if !submitter.seen.lock().unwrap().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(submitter.seen.lock().unwrap().as_slice(), &[(only, 4)]);
    }
}
