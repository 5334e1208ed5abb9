//! Monotonic wall-clock source for `updated_at` values.
//!
//! Lists are sorted by recency, so two mutations landing in the same
//! millisecond must still produce distinct, increasing timestamps.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static LAST_ISSUED_MS: AtomicI64 = AtomicI64::new(0);

/// Returns Unix epoch milliseconds, strictly increasing within the process.
pub fn now_epoch_ms() -> i64 {
    let wall = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0);

    let mut last = LAST_ISSUED_MS.load(Ordering::Relaxed);
    loop {
        let next = wall.max(last + 1);
        match LAST_ISSUED_MS.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(observed) => last = observed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::now_epoch_ms;

    #[test]
    fn timestamps_strictly_increase() {
        let first = now_epoch_ms();
        let second = now_epoch_ms();
        let third = now_epoch_ms();
        assert!(first < second);
        assert!(second < third);
    }
}
