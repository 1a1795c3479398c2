//! redfinger-server/src/server.rs
//!
//! Resolves the bind address, builds the context and serves until shutdown.

use std::net::SocketAddr;
use tracing::info;

use redfinger_core::Error;
use redfinger_core::api::start_api_server;

use crate::Args;
use crate::context::ServerContext;

pub async fn run_server(args: Args) -> Result<(), Error> {
    let addr: SocketAddr = args.server_addr.parse()?;

    let ctx = ServerContext::new(&args).await?;
    start_api_server(addr, ctx.redeem_service.clone()).await?;

    if let Some(db) = ctx.db {
        db.pool().close().await;
        info!("Postgres pool closed.");
    }
    Ok(())
}
