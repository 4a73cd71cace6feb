use crate::cli::{
    actions::{server::Args, Action},
    commands::otp::{ARG_OTP_MAX_ATTEMPTS, ARG_OTP_TTL},
};
use anyhow::{Context, Result};

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);

    let otp_ttl_seconds = matches
        .get_one::<u64>(ARG_OTP_TTL)
        .copied()
        .context("missing required argument: --otp-ttl")?;

    let otp_max_attempts = matches
        .get_one::<u32>(ARG_OTP_MAX_ATTEMPTS)
        .copied()
        .context("missing required argument: --otp-max-attempts")?;

    Ok(Action::Server(Args {
        port,
        otp_ttl_seconds,
        otp_max_attempts,
    }))
}
