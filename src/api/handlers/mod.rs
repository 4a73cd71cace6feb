pub mod health;
pub mod otp_generate;
pub mod otp_verify;

// common state and helpers for the handlers
use crate::otp::OtpManager;
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use regex::Regex;

/// Shared per-process state handed to handlers via `Extension`.
pub struct OtpState {
    manager: OtpManager,
}

impl OtpState {
    #[must_use]
    pub fn new(manager: OtpManager) -> Self {
        Self { manager }
    }

    #[must_use]
    pub fn manager(&self) -> &OtpManager {
        &self.manager
    }
}

/// Normalize an email for lookup/uniqueness checks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
#[must_use]
pub fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Mint a random session token returned after a successful verification.
///
/// The raw value is only handed to the caller; nothing is persisted
/// server-side, so there is no hash to store.
#[must_use]
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    Base64UrlUnpadded::encode_string(&bytes)
}
