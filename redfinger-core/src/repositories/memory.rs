// File: redfinger-core/src/repositories/memory.rs

use std::collections::HashMap;
use async_trait::async_trait;
use tokio::sync::Mutex;
use redfinger_common::error::Error;
use redfinger_common::models::{NewRedeemSubmission, RedeemRecord};
use redfinger_common::traits::repository_traits::RedeemSubmissionRepository;
use crate::validation::is_well_formed;

struct StoredSubmission {
    record: RedeemRecord,
    password: String,
}

#[derive(Default)]
struct MemoryState {
    rows: Vec<StoredSubmission>,
    /// redeem_code -> index into `rows`
    by_code: HashMap<String, usize>,
}

/// Process-local submission store for `--in-memory` runs and tests.
///
/// The code lookup and the insert happen under one lock, which gives the
/// same single-winner guarantee as the unique index in Postgres.
#[derive(Default)]
pub struct InMemoryRedeemSubmissionRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryRedeemSubmissionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored submissions.
    pub async fn len(&self) -> usize {
        self.state.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// The password stored alongside `redeem_code`, if that code was accepted.
    pub async fn stored_password(&self, redeem_code: &str) -> Option<String> {
        let state = self.state.lock().await;
        state
            .by_code
            .get(redeem_code)
            .and_then(|&i| state.rows.get(i))
            .map(|s| s.password.clone())
    }
}

#[async_trait]
impl RedeemSubmissionRepository for InMemoryRedeemSubmissionRepository {
    async fn create_submission(
        &self,
        submission: &NewRedeemSubmission,
    ) -> Result<RedeemRecord, Error> {
        if !is_well_formed(&submission.redeem_code) {
            return Err(Error::Storage(format!(
                "refusing to store malformed redeem code '{}'",
                submission.redeem_code
            )));
        }

        let mut state = self.state.lock().await;
        if state.by_code.contains_key(&submission.redeem_code) {
            return Err(Error::Conflict(submission.redeem_code.clone()));
        }

        let record = RedeemRecord::from_new(submission);
        let index = state.rows.len();
        state.rows.push(StoredSubmission {
            record: record.clone(),
            password: submission.password.clone(),
        });
        state.by_code.insert(submission.redeem_code.clone(), index);

        Ok(record)
    }

    async fn list_submissions(&self, limit: i64) -> Result<Vec<RedeemRecord>, Error> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let state = self.state.lock().await;

        let mut records: Vec<RedeemRecord> = state.rows.iter().map(|s| s.record.clone()).collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        records.truncate(limit);
        Ok(records)
    }
}
