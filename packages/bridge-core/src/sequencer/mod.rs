//! Transaction sequencers
//!
//! - `approval` - allowance check, allowance-increase submission, confirmation
//! - `transfer` - deposit/withdraw submission and confirmation tracking

pub mod approval;
pub mod transfer;

pub use approval::{ApprovalOutcome, ApprovalRequest, ApprovalSequencer};
pub use transfer::{TransferRequest, TransferSequencer};
