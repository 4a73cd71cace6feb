//! One-time passcode issuance and verification.
//!
//! The manager owns the policy (validity window, generation attempt cap) and
//! drives a constructor-injected [`OtpStore`]. Records are keyed by subject
//! (a normalized email address); at most one record is active per subject.

pub mod error;
pub mod manager;
pub mod models;
pub mod store;

pub use error::{GenerateError, VerifyError};
pub use manager::{OtpConfig, OtpManager};
pub use models::{IssuedOtp, OtpRecord};
pub use store::{MemoryOtpStore, OtpStore};
