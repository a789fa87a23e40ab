use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;

use studydeck_lib::flashcards::{
    due_cards, Card, HttpReviewSubmitter, LoggingSubmitter, Rating, ReviewSubmitter,
    SessionSummary, StartOutcome, StudySession, SubmissionWarning,
};

use crate::app::App;
use crate::render::terminal::{paint, render_progress, render_summary, Color};
use crate::OutputFormat;

pub struct StudyOptions {
    pub cards: PathBuf,
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub seed: Option<u64>,
    pub all: bool,
    pub limit: Option<usize>,
}

pub fn run(app: &App, options: StudyOptions, format: &OutputFormat, use_color: bool) -> Result<()> {
    let cards: Vec<Card> = app.read_json(&options.cards)?;
    let queue = if options.all {
        let mut cards = cards;
        if let Some(limit) = options.limit {
            cards.truncate(limit);
        }
        cards
    } else {
        due_cards(&cards, Utc::now(), options.limit)
    };

    let submitter: Arc<dyn ReviewSubmitter> = match options.api_url {
        Some(url) => Arc::new(
            HttpReviewSubmitter::new(url, options.token).context("Failed to create API client")?,
        ),
        None => Arc::new(LoggingSubmitter),
    };

    let session = match options.seed {
        Some(seed) => StudySession::with_rng(submitter, StdRng::seed_from_u64(seed)),
        None => StudySession::new(submitter),
    };

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let summary = runtime.block_on(study_loop(session, queue, use_color))?;

    let Some(summary) = summary else {
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Plain => println!("{}", render_summary(&summary, use_color)),
    }

    Ok(())
}

async fn study_loop(
    mut session: StudySession,
    queue: Vec<Card>,
    use_color: bool,
) -> Result<Option<SessionSummary>> {
    if session.start(queue) == StartOutcome::NothingDue {
        println!("No cards due.");
        return Ok(None);
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut pending = Vec::new();
    let stdin = io::stdin();
    let mut input = stdin.lock();

    'session: loop {
        while !session.is_finished() {
            let card = session.current_card()?.clone();

            println!();
            println!("{} {}", render_progress(session.progress(), use_color), card.front);
            if prompt(&mut input, "Enter to show answer, q to quit: ")?.as_deref() == Some("q") {
                break 'session;
            }
            println!("{}", paint(&card.back, Color::CYAN, use_color));

            let rating = loop {
                match prompt(&mut input, "1 Again  2 Hard  3 Good  4 Easy: ")?.as_deref() {
                    None | Some("q") => break 'session,
                    Some(answer) => match answer.parse::<u8>() {
                        Ok(button @ 1..=4) => break Rating::from_ui(button),
                        _ => println!("Enter 1-4"),
                    },
                }
            };

            let ack = session.grade(rating.grade())?;
            pending.push(ack.detach(tx.clone()));

            while let Ok(warning) = rx.try_recv() {
                print_warning(&warning, use_color);
            }
        }

        match prompt(&mut input, "All done. Review again? [y/N]: ")?.as_deref() {
            Some("y") | Some("Y") => session.restart()?,
            _ => break,
        }
    }

    // Let in-flight submissions land before reporting
    drop(tx);
    for handle in pending {
        let _ = handle.await;
    }
    while let Some(warning) = rx.recv().await {
        print_warning(&warning, use_color);
    }

    Ok(Some(session.complete()))
}

/// Print `message` and read one trimmed line; `None` on end of input
fn prompt(input: &mut impl BufRead, message: &str) -> Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn print_warning(warning: &SubmissionWarning, use_color: bool) {
    eprintln!("{}", paint(&format!("warning: {}", warning), Color::YELLOW, use_color));
}
