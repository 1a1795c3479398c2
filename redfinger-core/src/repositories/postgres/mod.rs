pub mod redeem_submissions;

pub use redeem_submissions::PostgresRedeemSubmissionRepository;
