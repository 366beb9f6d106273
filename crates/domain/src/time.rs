//! Time and timestamp helpers.

use chrono::{DateTime, SubsecRound, Utc};

/// UTC timestamp used for `creation_time` and `update_time`.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time, truncated to microseconds.
///
/// `TIMESTAMPTZ` keeps microsecond precision, so truncating here makes a
/// freshly stored record compare equal to the same record read back.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now().trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now().trunc_subsecs(6);
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_drop_sub_microsecond_precision() {
        let ts = now();
        assert_eq!(ts.nanosecond() % 1_000, 0);
    }
}
