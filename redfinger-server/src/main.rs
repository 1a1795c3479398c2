use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use redfinger_core::db::DEFAULT_MAX_CONNECTIONS;
use redfinger_core::services::DEFAULT_HISTORY_LIMIT;

mod context;
mod server;

#[derive(Parser, Debug, Clone)]
#[command(name = "redfinger")]
#[command(author, version, about = "Redfinger redeem-code submission service")]
pub struct Args {
    /// Address to which the HTTP API will bind
    #[arg(long, env = "REDFINGER_ADDR", default_value = "0.0.0.0:3000")]
    server_addr: String,

    /// Postgres connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://redfinger@localhost:5432/redfinger"
    )]
    db_url: String,

    /// Upper bound on pooled Postgres connections
    #[arg(long, env = "REDFINGER_DB_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    db_max_connections: u32,

    /// Most submissions `GET /redeem` will ever return
    #[arg(
        long,
        env = "REDFINGER_HISTORY_LIMIT",
        default_value_t = DEFAULT_HISTORY_LIMIT,
        value_parser = clap::value_parser!(i64).range(1..=100)
    )]
    history_limit: i64,

    /// Keep submissions in process memory instead of Postgres. Everything is
    /// lost on exit; meant for local development.
    #[arg(long, default_value = "false")]
    in_memory: bool,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("redfinger=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine; real deployments set the environment directly.
    dotenv::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    info!("Redfinger redeem service starting. addr={}, in_memory={}, history_limit={}",
          args.server_addr, args.in_memory, args.history_limit);

    if let Err(e) = server::run_server(args).await {
        error!("Server error: {:?}", e);
        return Err(e.into());
    }

    info!("Main finished. Goodbye!");
    Ok(())
}
