// File: redfinger-common/src/models/mod.rs
pub mod redeem;

pub use redeem::{
    CloudType, CodeDuration, NewRedeemSubmission, RedeemRecord, Server, SubmissionRequest,
    SubmissionStatus, SystemVersion,
};
