use clap::{Arg, Command};

pub const ARG_OTP_TTL: &str = "otp-ttl";
pub const ARG_OTP_MAX_ATTEMPTS: &str = "otp-max-attempts";

/// Passcode policy arguments.
#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_OTP_TTL)
                .long("otp-ttl")
                .help("Validity window for issued codes, in seconds")
                .default_value("600")
                .env("DAYFLOW_OTP_TTL")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_OTP_MAX_ATTEMPTS)
                .long("otp-max-attempts")
                .help("Generation requests allowed per subject within one validity window")
                .default_value("3")
                .env("DAYFLOW_OTP_MAX_ATTEMPTS")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
}
