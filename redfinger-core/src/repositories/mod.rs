// src/repositories/mod.rs

pub use redfinger_common::traits::repository_traits::RedeemSubmissionRepository;

pub use memory::InMemoryRedeemSubmissionRepository;
pub use postgres::redeem_submissions::PostgresRedeemSubmissionRepository;

pub mod memory;
pub mod postgres;
