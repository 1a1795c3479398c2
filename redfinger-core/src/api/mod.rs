//! HTTP boundary for redeem submissions.
//!
//! `POST /redeem` submits a code, `GET /redeem` lists recent submissions.
//! Both are also served under `/api`, which is where the web form posts.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::post,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::RedeemService;

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use routes::{history_handler, submit_handler};
pub use server::start_api_server;

/// Shared state for the redeem routes.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RedeemService>,
}

pub fn router(service: Arc<RedeemService>) -> Router {
    let redeem = Router::new().route("/redeem", post(submit_handler).get(history_handler));

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .merge(redeem.clone())
        .nest("/api", redeem)
        .with_state(AppState { service })
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
}
