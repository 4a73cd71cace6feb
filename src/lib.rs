//! # Dayflow OTP Service
//!
//! `dayflow-otp` issues and verifies email-bound one-time passcodes for the
//! Dayflow HRMS login and signup flows.
//!
//! ## Passcode lifecycle
//!
//! A subject (email address) requests a code via `POST /v1/auth/otp/generate`.
//! The service samples a 6-digit numeric code, stores it with a validity
//! window (default 10 minutes), and returns it to the caller. Real delivery
//! (email/SMS) is a frontend concern; the returned code stands in for it.
//!
//! Codes are single-use: a successful `POST /v1/auth/otp/verify` consumes the
//! record and mints a random session token. Expired codes never verify, and
//! repeated generation requests inside one validity window are capped.
//!
//! ## Storage
//!
//! The OTP store is volatile, process-lifetime state behind the
//! [`otp::OtpStore`] trait. The in-memory implementation is a mutex-guarded
//! map; a shared store can be swapped in without touching the manager.

pub mod api;
pub mod cli;
pub mod otp;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
