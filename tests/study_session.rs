use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use uuid::Uuid;

use studydeck_lib::flashcards::{
    Card, Grade, Rating, ReviewSubmitter, SessionState, StartOutcome, StudySession,
    SubmissionError,
};

/// Records every submission; fails those for cards in `failing`
struct FlakyBackend {
    received: Mutex<Vec<(Uuid, Grade)>>,
    failing: Vec<Uuid>,
}

#[async_trait]
impl ReviewSubmitter for FlakyBackend {
    async fn submit(&self, card_id: Uuid, grade: Grade) -> Result<(), SubmissionError> {
        self.received.lock().unwrap().push((card_id, grade));
        if self.failing.contains(&card_id) {
            return Err(SubmissionError::Server {
                status: 503,
                message: "try later".to_string(),
            });
        }
        Ok(())
    }
}

fn deck(fronts: &[&str]) -> Vec<Card> {
    let deck_id = Uuid::new_v4();
    fronts
        .iter()
        .map(|f| Card::new(deck_id, f.to_string(), format!("answer to {}", f)))
        .collect()
}

#[tokio::test]
async fn test_session_survives_failed_submissions() {
    let cards = deck(&["A", "B", "C"]);
    let backend = Arc::new(FlakyBackend {
        received: Mutex::new(Vec::new()),
        failing: vec![cards[1].id],
    });
    let mut session = StudySession::with_rng(backend.clone(), StdRng::seed_from_u64(42));
    assert_eq!(session.start(cards.clone()), StartOutcome::Started { total: 3 });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut handles = Vec::new();
    let mut shown = Vec::new();

    // A: again, then everything good
    let mut first = true;
    while !session.is_finished() {
        shown.push(session.current_card().unwrap().front.clone());
        let rating = if first { Rating::Again } else { Rating::Good };
        first = false;
        handles.push(session.grade(rating.grade()).unwrap().detach(tx.clone()));
    }
    drop(tx);

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(shown, vec!["A", "B", "A", "C"]);
    assert_eq!(session.state(), SessionState::Finished);

    let warning = rx.recv().await.unwrap();
    assert_eq!(warning.card_id, cards[1].id);
    assert!(rx.recv().await.is_none());
    assert_eq!(backend.received.lock().unwrap().len(), 4);

    // Restart goes back to the three original cards only
    session.restart().unwrap();
    let mut second_pass = Vec::new();
    while !session.is_finished() {
        second_pass.push(session.current_card().unwrap().id);
        let _ = session.grade(Rating::Easy.grade()).unwrap();
    }
    let original: Vec<Uuid> = cards.iter().map(|c| c.id).collect();
    assert_eq!(second_pass, original);

    let summary = session.complete();
    assert!(summary.finished);
    assert_eq!(summary.reviews, 3);
    assert_eq!(summary.again_count, 0);

    // Grades whose acknowledgments were discarded still reach the backend
    for _ in 0..20 {
        if backend.received.lock().unwrap().len() == 7 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(backend.received.lock().unwrap().len(), 7);
}

#[test]
fn test_same_seed_same_order() {
    let cards = deck(&["A", "B", "C", "D", "E", "F", "G"]);

    let run = |seed: u64| {
        let mut session = StudySession::with_rng(
            Arc::new(studydeck_lib::flashcards::LoggingSubmitter),
            StdRng::seed_from_u64(seed),
        );
        session.start(cards.clone());

        let mut shown = Vec::new();
        let mut agains = 0;
        while !session.is_finished() {
            let front = session.current_card().unwrap().front.clone();
            // Fail the first three cards once each
            let grade = if agains < 3 && ["A", "B", "C"].contains(&front.as_str()) && !shown.contains(&front) {
                agains += 1;
                Grade::AGAIN
            } else {
                Grade::new(4).unwrap()
            };
            shown.push(front);
            let _ = session.grade(grade).unwrap();
        }
        shown
    };

    let first = run(2024);
    assert_eq!(first, run(2024));
    assert_eq!(first.len(), 10);
    // Every failed card was repeated within the same sitting
    for front in ["A", "B", "C"] {
        assert_eq!(first.iter().filter(|f| f.as_str() == front).count(), 2);
    }
}
