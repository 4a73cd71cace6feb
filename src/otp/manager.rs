use crate::otp::{
    error::{GenerateError, VerifyError},
    models::{IssuedOtp, OtpRecord},
    store::OtpStore,
};
use rand::{rngs::OsRng, Rng};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

const DEFAULT_VALIDITY_WINDOW_SECONDS: u64 = 600;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Policy knobs for passcode issuance.
#[derive(Debug, Clone, Copy)]
pub struct OtpConfig {
    validity_window: Duration,
    max_attempts: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            validity_window: Duration::from_secs(DEFAULT_VALIDITY_WINDOW_SECONDS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl OtpConfig {
    #[must_use]
    pub fn with_validity_window(mut self, window: Duration) -> Self {
        self.validity_window = window;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn validity_window(&self) -> Duration {
        self.validity_window
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

/// Issues and verifies single-use passcodes over an injected store.
#[derive(Clone)]
pub struct OtpManager {
    store: Arc<dyn OtpStore>,
    config: OtpConfig,
}

impl OtpManager {
    #[must_use]
    pub fn new(store: Arc<dyn OtpStore>, config: OtpConfig) -> Self {
        Self { store, config }
    }

    #[must_use]
    pub fn config(&self) -> &OtpConfig {
        &self.config
    }

    /// Issue a fresh 6-digit code for the subject.
    ///
    /// Repeated requests inside one validity window bump the attempt counter
    /// and overwrite the stored code; an expired prior record resets the
    /// counter. The returned code stands in for the email delivery side
    /// effect, which is out of scope for this service.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::RateLimited`] once the attempt cap is reached
    /// within the current validity window.
    pub fn generate(&self, subject: &str) -> Result<IssuedOtp, GenerateError> {
        let now = Instant::now();
        let config = self.config;
        // Placeholder only: the store invokes the closure exactly once, so
        // `outcome` is always overwritten before it is returned.
        let mut outcome: Result<IssuedOtp, GenerateError> = Err(GenerateError::RateLimited {
            retry_after_seconds: 0,
        });

        // The attempt-counter read and the record write happen under one
        // store lock, so racing generates cannot both pass the cap check.
        self.store.update(subject, &mut |current| {
            let prior = current.filter(|r| !r.is_expired(now));

            if let Some(record) = &prior {
                if record.attempts >= config.max_attempts {
                    debug!("Generation rate limit hit for subject");
                    outcome = Err(GenerateError::RateLimited {
                        retry_after_seconds: record.expires_in_seconds(now),
                    });
                    return prior;
                }
            }

            let mut record = OtpRecord::new(sample_code(), config.validity_window);
            record.attempts = prior.map_or(1, |r| r.attempts + 1);
            outcome = Ok(IssuedOtp {
                code: record.code.clone(),
                expires_in: config.validity_window,
            });
            Some(record)
        });

        outcome
    }

    /// Check a submitted code and consume the record on success.
    ///
    /// # Errors
    ///
    /// - [`VerifyError::NotFound`] when no code was issued or it was already
    ///   consumed.
    /// - [`VerifyError::Expired`] when the validity window lapsed; the record
    ///   is removed.
    /// - [`VerifyError::InvalidCode`] on mismatch; the record stays in place
    ///   so the caller may retry.
    pub fn verify(&self, subject: &str, submitted_code: &str) -> Result<(), VerifyError> {
        let record = self.store.get(subject).ok_or(VerifyError::NotFound)?;

        if record.is_expired(Instant::now()) {
            self.store.remove(subject);
            return Err(VerifyError::Expired);
        }

        if record.code != submitted_code {
            return Err(VerifyError::InvalidCode);
        }

        // Codes are single-use.
        self.store.remove(subject);
        Ok(())
    }
}

/// Uniformly sampled 6-digit numeric code.
fn sample_code() -> String {
    OsRng.gen_range(100_000..=999_999).to_string()
}
