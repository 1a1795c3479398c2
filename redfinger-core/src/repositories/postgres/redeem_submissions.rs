// File: redfinger-core/src/repositories/postgres/redeem_submissions.rs

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use redfinger_common::error::Error;
use redfinger_common::models::{NewRedeemSubmission, RedeemRecord};
use redfinger_common::traits::repository_traits::RedeemSubmissionRepository;
use crate::validation::is_well_formed;

/// SQLSTATE raised by the unique constraint on `redeem_code`.
const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE raised by the code-format / status CHECK constraints.
const CHECK_VIOLATION: &str = "23514";

pub struct PostgresRedeemSubmissionRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresRedeemSubmissionRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_record(r: &PgRow) -> Result<RedeemRecord, Error> {
    Ok(RedeemRecord {
        id: r.try_get("id")?,
        email: r.try_get("email")?,
        redeem_code: r.try_get("redeem_code")?,
        server: r.try_get::<String, _>("server")?.parse()?,
        system_version: r.try_get::<String, _>("system_version")?.parse()?,
        cloud_type: r.try_get::<String, _>("cloud_type")?.parse()?,
        duration: r.try_get::<String, _>("duration")?.parse()?,
        status: r.try_get::<String, _>("status")?.parse()?,
        created_at: r.try_get("created_at")?,
    })
}

/// Translates constraint violations into the store's own error kinds.
fn map_insert_error(redeem_code: &str, err: sqlx::Error) -> Error {
    if let Some(db_err) = err.as_database_error() {
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return Error::Conflict(redeem_code.to_string()),
            Some(CHECK_VIOLATION) => {
                return Error::Storage(format!("row rejected by constraint: {}", db_err.message()));
            }
            _ => {}
        }
    }
    Error::Database(err)
}

#[async_trait]
impl RedeemSubmissionRepository for PostgresRedeemSubmissionRepository {
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

        let fresh = RedeemRecord::from_new(submission);

        // ON CONFLICT makes the uniqueness check and the write one statement;
        // a losing racer gets no row back instead of a second insert.
        let row_opt = sqlx::query(
            r#"
            INSERT INTO redeem_submissions (
                id,
                email,
                password,
                redeem_code,
                server,
                system_version,
                cloud_type,
                duration,
                status,
                created_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)
            ON CONFLICT (redeem_code) DO NOTHING
            RETURNING
                id,
                email,
                redeem_code,
                server,
                system_version,
                cloud_type,
                duration,
                status,
                created_at
            "#,
        )
            .bind(fresh.id)
            .bind(&submission.email)
            .bind(&submission.password)
            .bind(&submission.redeem_code)
            .bind(submission.server.as_str())
            .bind(submission.system_version.as_str())
            .bind(submission.cloud_type.as_str())
            .bind(submission.duration.as_str())
            .bind(fresh.status.as_str())
            .bind(fresh.created_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_insert_error(&submission.redeem_code, e))?;

        match row_opt {
            Some(r) => row_to_record(&r),
            None => {
                debug!("Insert skipped, redeem code {} already stored", submission.redeem_code);
                Err(Error::Conflict(submission.redeem_code.clone()))
            }
        }
    }

    async fn list_submissions(&self, limit: i64) -> Result<Vec<RedeemRecord>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                id,
                email,
                redeem_code,
                server,
                system_version,
                cloud_type,
                duration,
                status,
                created_at
            FROM redeem_submissions
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::with_capacity(rows.len());
        for r in rows {
            list.push(row_to_record(&r)?);
        }
        Ok(list)
    }
}
