// File: redfinger-core/tests/postgres_repository_tests.rs
//
// Needs a reachable Postgres: set TEST_DATABASE_URL (and optionally
// DATABASE_ADMIN_URL so the test database gets created). Without it every
// test here returns early.

use std::sync::Arc;
use sqlx::Row;
use redfinger_common::models::{
    CloudType, CodeDuration, NewRedeemSubmission, Server, SubmissionStatus, SystemVersion,
};
use redfinger_core::Error;
use redfinger_core::repositories::{PostgresRedeemSubmissionRepository, RedeemSubmissionRepository};
use redfinger_core::services::RedeemService;
use redfinger_core::test_utils::helpers::*;

fn submission(code: &str) -> NewRedeemSubmission {
    NewRedeemSubmission {
        email: "a@b.com".to_string(),
        password: "x".to_string(),
        redeem_code: code.to_string(),
        server: Server::HongKong2,
        system_version: SystemVersion::Android12,
        cloud_type: CloudType::Svip,
        duration: CodeDuration::SevenDays,
    }
}

#[tokio::test]
async fn test_create_and_list_submissions() -> Result<(), Error> {
    let Some((db, _guard)) = setup_test_database().await? else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return Ok(());
    };
    let repo = PostgresRedeemSubmissionRepository::new(db.pool().clone());

    let created = repo.create_submission(&submission("APY3-GP9Z-KVC4")).await?;
    assert_eq!(created.status, SubmissionStatus::Processing);
    assert_eq!(created.server, Server::HongKong2);

    let stored_password: String =
        sqlx::query("SELECT password FROM redeem_submissions WHERE id = $1")
            .bind(created.id)
            .fetch_one(db.pool())
            .await?
            .try_get("password")?;
    assert_eq!(stored_password, "x");

    let second = repo.create_submission(&submission("ZZZZ-0000-1111")).await?;

    let listed = repo.list_submissions(10).await?;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id, "newest first");
    assert_eq!(listed[1], created);

    assert_eq!(repo.list_submissions(10).await?, listed);
    assert_eq!(repo.list_submissions(1).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_duplicate_code_is_a_conflict() -> Result<(), Error> {
    let Some((db, _guard)) = setup_test_database().await? else {
        return Ok(());
    };
    let repo = PostgresRedeemSubmissionRepository::new(db.pool().clone());

    repo.create_submission(&submission("APY3-GP9Z-KVC4")).await?;
    let err = repo.create_submission(&submission("APY3-GP9Z-KVC4")).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(repo.list_submissions(10).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_concurrent_creates_resolve_to_one_row() -> Result<(), Error> {
    let Some((db, _guard)) = setup_test_database().await? else {
        return Ok(());
    };
    let repo = Arc::new(PostgresRedeemSubmissionRepository::new(db.pool().clone()));

    let mut handles = Vec::new();
    for _ in 0..6 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.create_submission(&submission("RACE-0000-0001")).await
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(Error::Conflict(_)) => conflicts += 1,
            Err(e) => return Err(e),
        }
    }
    assert_eq!((created, conflicts), (1, 5));

    let count: i64 =
        sqlx::query("SELECT COUNT(*) AS n FROM redeem_submissions WHERE redeem_code = $1")
            .bind("RACE-0000-0001")
            .fetch_one(db.pool())
            .await?
            .try_get("n")?;
    assert_eq!(count, 1);

    Ok(())
}

#[tokio::test]
async fn test_malformed_code_is_never_persisted() -> Result<(), Error> {
    let Some((db, _guard)) = setup_test_database().await? else {
        return Ok(());
    };
    let repo = PostgresRedeemSubmissionRepository::new(db.pool().clone());

    let err = repo.create_submission(&submission("abcd-efg")).await.unwrap_err();
    assert!(matches!(err, Error::Storage(_)));

    // The table enforces the format even for writes that bypass the repository.
    let raw = sqlx::query(
        "INSERT INTO redeem_submissions
             (id, email, password, redeem_code, server, system_version, cloud_type, duration)
         VALUES
             (gen_random_uuid(), 'a@b.com', 'x', 'ABCD-EFG', 'Taiwan', 'Android 10', 'VIP', '7 Hari')",
    )
        .execute(db.pool())
        .await;
    assert!(raw.is_err());
    assert!(repo.list_submissions(10).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_service_over_postgres() -> Result<(), Error> {
    let Some((db, _guard)) = setup_test_database().await? else {
        return Ok(());
    };
    let repo = PostgresRedeemSubmissionRepository::new(db.pool().clone());
    let service = RedeemService::new(Arc::new(repo));

    let record = service.submit(&sample_request("apy3gp9zkvc4")).await?;
    assert_eq!(record.redeem_code, "APY3-GP9Z-KVC4");
    assert!(matches!(
        service.submit(&sample_request("APY3-GP9Z-KVC4")).await,
        Err(Error::Conflict(_))
    ));
    assert!(matches!(
        service.submit(&sample_request("ABCD-EFG")).await,
        Err(Error::Validation(_))
    ));

    let history = service.history(None).await?;
    assert_eq!(history, vec![record]);

    Ok(())
}
