// src/lib.rs

pub mod db;
pub mod validation;
pub mod repositories;
pub mod services;
pub mod api;
pub mod test_utils;

pub use db::Database;
pub use redfinger_common::error::Error;
pub use services::redeem_service::RedeemService;
