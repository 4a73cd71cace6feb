use std::time::{Duration, Instant};

/// A stored passcode bound to one subject.
///
/// The record is created on a generate request, its attempt counter is bumped
/// by repeated generate requests inside the validity window, and it is
/// removed on successful verification or once expired.
#[derive(Clone)]
pub struct OtpRecord {
    pub code: String,
    pub issued_at: Instant,
    pub expires_at: Instant,
    pub attempts: u32,
}

impl OtpRecord {
    #[must_use]
    pub fn new(code: String, validity_window: Duration) -> Self {
        let issued_at = Instant::now();
        Self {
            code,
            issued_at,
            expires_at: issued_at + validity_window,
            attempts: 1,
        }
    }

    /// An expired record must never verify and no longer counts toward the
    /// generation rate limit.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }

    /// Seconds until the record expires, saturating at zero.
    #[must_use]
    pub fn expires_in_seconds(&self, now: Instant) -> u64 {
        self.expires_at.saturating_duration_since(now).as_secs()
    }
}

impl std::fmt::Debug for OtpRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpRecord")
            .field("code", &"***")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .field("attempts", &self.attempts)
            .finish()
    }
}

/// A freshly issued passcode handed back to the caller.
///
/// The code is returned in place of the email delivery side effect, which is
/// an external collaborator of this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedOtp {
    pub code: String,
    pub expires_in: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_record_is_not_expired() {
        let record = OtpRecord::new("123456".to_string(), Duration::from_secs(600));
        assert!(!record.is_expired(Instant::now()));
        assert_eq!(record.attempts, 1);
    }

    #[test]
    fn record_expires_after_window() {
        let record = OtpRecord::new("123456".to_string(), Duration::from_secs(0));
        let later = Instant::now() + Duration::from_millis(10);
        assert!(record.is_expired(later));
    }

    #[test]
    fn expires_in_seconds_saturates() {
        let record = OtpRecord::new("123456".to_string(), Duration::from_secs(0));
        let later = Instant::now() + Duration::from_secs(5);
        assert_eq!(record.expires_in_seconds(later), 0);
    }

    #[test]
    fn debug_redacts_code() {
        let record = OtpRecord::new("482913".to_string(), Duration::from_secs(600));
        let output = format!("{record:?}");
        assert!(!output.contains("482913"));
        assert!(output.contains("***"));
    }
}
