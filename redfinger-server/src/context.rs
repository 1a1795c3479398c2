//! redfinger-server/src/context.rs
//!
//! Builds the submission store and service the HTTP API runs on.

use std::sync::Arc;
use tracing::{info, warn};

use redfinger_core::Error;
use redfinger_core::db::Database;
use redfinger_core::repositories::{
    InMemoryRedeemSubmissionRepository, PostgresRedeemSubmissionRepository,
    RedeemSubmissionRepository,
};
use redfinger_core::services::RedeemService;

use crate::Args;

type SharedRepository = Arc<dyn RedeemSubmissionRepository + Send + Sync>;

pub struct ServerContext {
    pub redeem_service: Arc<RedeemService>,
    /// `None` when running with `--in-memory`.
    pub db: Option<Database>,
}

impl ServerContext {
    pub async fn new(args: &Args) -> Result<Self, Error> {
        let (repo, db): (SharedRepository, Option<Database>) = if args.in_memory {
            warn!("Using the in-memory submission store; submissions are lost on restart.");
            let repo: SharedRepository = Arc::new(InMemoryRedeemSubmissionRepository::new());
            (repo, None)
        } else {
            let db =
                Database::with_max_connections(&args.db_url, args.db_max_connections).await?;
            db.migrate().await?;
            let repo: SharedRepository =
                Arc::new(PostgresRedeemSubmissionRepository::new(db.pool().clone()));
            (repo, Some(db))
        };

        let redeem_service = Arc::new(RedeemService::with_history_limit(repo, args.history_limit));
        info!("Redeem service ready (history limit {}).", redeem_service.history_limit());

        Ok(Self { redeem_service, db })
    }
}
