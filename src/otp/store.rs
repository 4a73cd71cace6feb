use crate::otp::models::OtpRecord;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Storage seam for OTP records, keyed by subject.
///
/// The unit of mutation is a single subject's record. `update` holds the
/// subject's slot for the whole read-modify-write, so concurrent generates
/// cannot interleave between reading the attempt counter and writing the new
/// record.
pub trait OtpStore: Send + Sync {
    fn get(&self, subject: &str) -> Option<OtpRecord>;

    /// Atomically replace the subject's record.
    ///
    /// `apply` is invoked exactly once with the current record (if any);
    /// returning `Some` stores the new record, returning `None` leaves the
    /// subject without one.
    fn update(
        &self,
        subject: &str,
        apply: &mut dyn FnMut(Option<OtpRecord>) -> Option<OtpRecord>,
    );

    fn remove(&self, subject: &str) -> Option<OtpRecord>;
}

/// Volatile in-process store: a mutex-guarded map with no persistence.
///
/// Expired records are dropped on every write, so subjects that generate a
/// code and never come back do not accumulate for the process lifetime.
#[derive(Default)]
pub struct MemoryOtpStore {
    records: Mutex<HashMap<String, OtpRecord>>,
}

impl MemoryOtpStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, OtpRecord>> {
        // A poisoned lock only means another thread panicked mid-mutation;
        // the map itself is still usable.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OtpStore for MemoryOtpStore {
    fn get(&self, subject: &str) -> Option<OtpRecord> {
        self.lock().get(subject).cloned()
    }

    fn update(
        &self,
        subject: &str,
        apply: &mut dyn FnMut(Option<OtpRecord>) -> Option<OtpRecord>,
    ) {
        let now = Instant::now();
        let mut records = self.lock();
        records.retain(|_, record| !record.is_expired(now));

        let current = records.remove(subject);
        if let Some(next) = apply(current) {
            records.insert(subject.to_string(), next);
        }
    }

    fn remove(&self, subject: &str) -> Option<OtpRecord> {
        self.lock().remove(subject)
    }
}
