//! Review submission to the remote scheduler
//!
//! Grading is a two-phase contract: the session commits its queue change
//! immediately and hands back an [`Acknowledgment`] for the network half.
//! A failed acknowledgment becomes a [`SubmissionWarning`] and never rolls
//! back the session.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::models::Grade;

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Submission task failed: {0}")]
    Task(String),
}

/// Sends a grade for a card to the backend scheduler.
#[async_trait]
pub trait ReviewSubmitter: Send + Sync {
    async fn submit(&self, card_id: Uuid, grade: Grade) -> Result<(), SubmissionError>;
}

#[derive(Serialize)]
struct ReviewPayload {
    rating: u8,
}

/// Submits reviews to the studydeck REST API
pub struct HttpReviewSubmitter {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpReviewSubmitter {
    /// Create a new submitter for the API at `base_url`
    pub fn new(base_url: String, token: Option<String>) -> Result<Self, SubmissionError> {
        // Normalize URL - ensure no trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(SubmissionError::InvalidUrl(
                "URL must start with http:// or https://".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn review_url(&self, card_id: Uuid) -> String {
        format!("{}/cards/{}/review", self.base_url, card_id)
    }
}

#[async_trait]
impl ReviewSubmitter for HttpReviewSubmitter {
    async fn submit(&self, card_id: Uuid, grade: Grade) -> Result<(), SubmissionError> {
        let mut request = self
            .client
            .post(self.review_url(card_id))
            .json(&ReviewPayload {
                rating: grade.value(),
            });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmissionError::Server {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        log::debug!("Review for card {} accepted (grade {})", card_id, grade);
        Ok(())
    }
}

/// Accepts every review without sending it anywhere. Used for offline study.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSubmitter;

#[async_trait]
impl ReviewSubmitter for LoggingSubmitter {
    async fn submit(&self, card_id: Uuid, grade: Grade) -> Result<(), SubmissionError> {
        log::info!("Offline review: card {} graded {}", card_id, grade);
        Ok(())
    }
}

/// A review submission that failed after the session had already moved on
#[derive(Error, Debug)]
#[error("Review for card {card_id} (grade {grade}) was not saved: {error}")]
pub struct SubmissionWarning {
    pub card_id: Uuid,
    pub grade: Grade,
    #[source]
    pub error: SubmissionError,
}

impl SubmissionWarning {
    /// Send the same grade again
    pub async fn retry(&self, submitter: &dyn ReviewSubmitter) -> Result<(), SubmissionError> {
        submitter.submit(self.card_id, self.grade).await
    }
}

/// The network half of a grade.
///
/// Inside a tokio runtime the submission is spawned as soon as the grade is
/// committed, so dropping the acknowledgment still sends the review. Outside
/// a runtime it waits to be awaited via [`Acknowledgment::outcome`] or
/// spawned via [`Acknowledgment::detach`], and dropping it unsent is logged.
#[must_use = "await or detach the acknowledgment to learn whether the review was saved"]
pub struct Acknowledgment {
    card_id: Uuid,
    grade: Grade,
    submission: Submission,
}

enum Submission {
    Running(JoinHandle<Result<(), SubmissionError>>),
    Deferred(Option<BoxFuture<'static, Result<(), SubmissionError>>>),
}

async fn send(
    submitter: Arc<dyn ReviewSubmitter>,
    card_id: Uuid,
    grade: Grade,
) -> Result<(), SubmissionError> {
    let result = submitter.submit(card_id, grade).await;
    if let Err(e) = &result {
        log::warn!("Review for card {} (grade {}) failed: {}", card_id, grade, e);
    }
    result
}

impl Acknowledgment {
    pub(crate) fn new(submitter: Arc<dyn ReviewSubmitter>, card_id: Uuid, grade: Grade) -> Self {
        let future = send(submitter, card_id, grade).boxed();
        let submission = match tokio::runtime::Handle::try_current() {
            Ok(handle) => Submission::Running(handle.spawn(future)),
            Err(_) => Submission::Deferred(Some(future)),
        };

        Self {
            card_id,
            grade,
            submission,
        }
    }

    pub fn card_id(&self) -> Uuid {
        self.card_id
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    /// Wait for the backend to acknowledge the review
    pub async fn outcome(mut self) -> Result<(), SubmissionWarning> {
        let result = match &mut self.submission {
            Submission::Running(handle) => match handle.await {
                Ok(result) => result,
                Err(e) => Err(SubmissionError::Task(e.to_string())),
            },
            Submission::Deferred(future) => match future.take() {
                Some(future) => future.await,
                None => Ok(()),
            },
        };

        result.map_err(|error| SubmissionWarning {
            card_id: self.card_id,
            grade: self.grade,
            error,
        })
    }

    /// Finish the submission in the background, forwarding a failure to
    /// `warnings`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn detach(self, warnings: mpsc::UnboundedSender<SubmissionWarning>) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(warning) = self.outcome().await {
                let _ = warnings.send(warning);
            }
        })
    }
}

impl Drop for Acknowledgment {
    fn drop(&mut self) {
        if let Submission::Deferred(Some(_)) = self.submission {
            log::warn!(
                "Review for card {} (grade {}) dropped before it was submitted",
                self.card_id,
                self.grade
            );
        }
    }
}

impl fmt::Debug for Acknowledgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Acknowledgment")
            .field("card_id", &self.card_id)
            .field("grade", &self.grade)
            .finish_non_exhaustive()
    }
}
