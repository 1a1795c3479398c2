use std::sync::Arc;
use tracing::{debug, error, info, warn};
use redfinger_common::models::{RedeemRecord, SubmissionRequest};
use redfinger_common::traits::repository_traits::RedeemSubmissionRepository;
use crate::Error;
use crate::validation::validate_submission;

/// How many submissions `GET /redeem` returns when no limit is asked for,
/// and the most it will ever return unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;

/// Validates redeem submissions and hands them to the submission store.
///
/// Holds no mutable state of its own; all shared state lives in the
/// repository it was built with.
pub struct RedeemService {
    repo: Arc<dyn RedeemSubmissionRepository + Send + Sync>,
    history_limit: i64,
}

impl RedeemService {
    pub fn new(repo: Arc<dyn RedeemSubmissionRepository + Send + Sync>) -> Self {
        Self::with_history_limit(repo, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(
        repo: Arc<dyn RedeemSubmissionRepository + Send + Sync>,
        history_limit: i64,
    ) -> Self {
        Self {
            repo,
            history_limit: history_limit.max(1),
        }
    }

    pub fn history_limit(&self) -> i64 {
        self.history_limit
    }

    /// Validate `request` and, if it passes, record it as `processing`.
    ///
    /// A reused code comes back as `Error::Conflict`; nothing is retried.
    pub async fn submit(&self, request: &SubmissionRequest) -> Result<RedeemRecord, Error> {
        let submission = match validate_submission(request) {
            Ok(s) => s,
            Err(e) => {
                info!("Rejected redeem submission: {}", e);
                return Err(e.into());
            }
        };

        match self.repo.create_submission(&submission).await {
            Ok(record) => {
                info!(
                    "Accepted redeem code {} (id={}, server={}, cloud_type={}, duration={})",
                    record.redeem_code, record.id, record.server, record.cloud_type, record.duration
                );
                Ok(record)
            }
            Err(Error::Conflict(code)) => {
                warn!("Redeem code {} was already used", code);
                Err(Error::Conflict(code))
            }
            Err(e) => {
                error!("Failed to store redeem code {}: {}", submission.redeem_code, e);
                Err(e)
            }
        }
    }

    /// Clamp a caller-supplied limit into `1..=history_limit`.
    pub fn effective_limit(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.history_limit)
            .clamp(1, self.history_limit)
    }

    /// Most recent submissions first, never more than the configured bound.
    pub async fn history(&self, requested: Option<i64>) -> Result<Vec<RedeemRecord>, Error> {
        let limit = self.effective_limit(requested);
        debug!("Listing up to {} redeem submissions", limit);

        self.repo.list_submissions(limit).await.map_err(|e| {
            error!("Failed to list redeem submissions: {}", e);
            e
        })
    }
}
