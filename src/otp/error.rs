//! Typed outcomes for the OTP manager.
//!
//! All variants are client-correctable conditions surfaced to the caller;
//! none are retried internally and none are fatal to the process.

/// Failure issuing a new code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// Too many generation requests within one validity window.
    #[error("Too many codes requested: retry in {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },
}

/// Failure verifying a submitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// No code was ever issued for the subject, or it was already consumed.
    #[error("No code issued for this subject")]
    NotFound,
    /// The validity window lapsed; the record has been removed.
    #[error("Code expired")]
    Expired,
    /// The submitted code does not match; the record remains valid.
    #[error("Invalid code")]
    InvalidCode,
}
