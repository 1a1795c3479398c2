pub mod redeem_service;

pub use redeem_service::{RedeemService, DEFAULT_HISTORY_LIMIT};
