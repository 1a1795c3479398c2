use async_trait::async_trait;
use crate::error::Error;
use crate::models::{NewRedeemSubmission, RedeemRecord};

/// The single writer of redeem submissions and the only authority on whether
/// a code has been consumed.
#[async_trait]
pub trait RedeemSubmissionRepository: Send + Sync {
    /// Atomically inserts the submission unless its code is already stored.
    ///
    /// Returns `Error::Conflict` (and writes nothing) for a reused code, and
    /// `Error::Storage` if the code is not in canonical form.
    async fn create_submission(
        &self,
        submission: &NewRedeemSubmission,
    ) -> Result<RedeemRecord, Error>;

    /// Up to `limit` most recent submissions, newest first.
    async fn list_submissions(&self, limit: i64) -> Result<Vec<RedeemRecord>, Error>;
}
