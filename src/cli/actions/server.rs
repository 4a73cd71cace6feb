use crate::{api, otp::OtpConfig};
use anyhow::Result;
use std::time::Duration;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub otp_ttl_seconds: u64,
    pub otp_max_attempts: u32,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let config = OtpConfig::default()
        .with_validity_window(Duration::from_secs(args.otp_ttl_seconds))
        .with_max_attempts(args.otp_max_attempts);

    api::new(args.port, config).await
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("otp_ttl_seconds", args.otp_ttl_seconds.to_string()),
        ("otp_max_attempts", args.otp_max_attempts.to_string()),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!("{} {}\n\nStartup configuration:", banner(), short_commit());
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ = std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn banner() -> String {
    format!("{} - {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn short_commit() -> String {
    let trimmed = crate::GIT_COMMIT_HASH.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_names_the_service() {
        assert!(banner().starts_with(env!("CARGO_PKG_NAME")));
    }

    #[test]
    fn short_commit_is_at_most_seven_chars() {
        assert!(short_commit().len() <= 7 || short_commit() == "unknown");
    }
}
