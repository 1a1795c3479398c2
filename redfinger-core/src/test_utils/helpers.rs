// File: redfinger-core/src/test_utils/helpers.rs

use once_cell::sync::Lazy;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgConnection, Pool, Postgres};
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;
use redfinger_common::models::SubmissionRequest;
use crate::Error;
use crate::db::Database;

const TEST_DB_NAME: &str = "redfinger_test";

/// Tests that truncate the shared test database hold this for their whole run.
static TEST_DB_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// A fully filled-in submission (scenario values from the web form) for `code`.
pub fn sample_request(code: &str) -> SubmissionRequest {
    SubmissionRequest {
        email: Some("a@b.com".into()),
        password: Some("x".into()),
        redeem_code: Some(code.into()),
        server: Some("Thailand".into()),
        system_version: Some("Android 10".into()),
        cloud_type: Some("VIP".into()),
        duration: Some("30 Hari".into()),
    }
}

/// `TEST_DATABASE_URL`, if Postgres-backed tests should run at all.
pub fn test_database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL").ok().filter(|u| !u.is_empty())
}

/// Create the test database if it does not exist yet. Only attempted when
/// `DATABASE_ADMIN_URL` points at a server we may run `CREATE DATABASE` on.
pub async fn ensure_test_database_exists() -> Result<(), Error> {
    let Ok(admin_url) = std::env::var("DATABASE_ADMIN_URL") else {
        return Ok(());
    };

    let mut conn = PgConnection::connect(&admin_url).await?;

    let create_db_sql = format!("CREATE DATABASE {TEST_DB_NAME};");
    match sqlx::query(&create_db_sql).execute(&mut conn).await {
        Ok(_) => info!("Created test DB '{TEST_DB_NAME}'."),
        Err(e) => {
            // 42P04 => "duplicate_database"
            let duplicate = e
                .as_database_error()
                .and_then(|db_err| db_err.code())
                .is_some_and(|code| code == "42P04");
            if !duplicate {
                return Err(Error::Database(e));
            }
        }
    }

    Ok(())
}

/// Create a connection pool to the test DB.
pub async fn create_test_db_pool(url: &str) -> Result<Pool<Postgres>, Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(url)
        .await?;

    Ok(pool)
}

/// Wipes out test data so each test can start fresh.
pub async fn clean_database(pool: &Pool<Postgres>) -> Result<(), Error> {
    sqlx::query("TRUNCATE TABLE redeem_submissions;")
        .execute(pool)
        .await?;

    Ok(())
}

/// Returns a migrated, empty test DB handle plus the guard serializing access
/// to it, or `None` when `TEST_DATABASE_URL` is unset.
pub async fn setup_test_database() -> Result<Option<(Database, MutexGuard<'static, ()>)>, Error> {
    let Some(url) = test_database_url() else {
        return Ok(None);
    };
    let guard = TEST_DB_LOCK.lock().await;

    ensure_test_database_exists().await?;

    let pool = create_test_db_pool(&url).await?;
    let db = Database::from_pool(pool);
    db.migrate().await?;
    clean_database(db.pool()).await?;

    Ok(Some((db, guard)))
}
