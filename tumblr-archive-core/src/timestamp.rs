// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// An instant with millisecond precision, stored as milliseconds since the
/// Unix epoch.
///
/// Milliseconds are what Tumblr reports and what the store persists, so a
/// `Timestamp` survives a round trip through the database unchanged. Use
/// [`Timestamp::from`] to truncate a [`SystemTime`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[display("{_0}ms")]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// The current time, truncated to milliseconds.
    pub fn now() -> Self {
        SystemTime::now().into()
    }

    pub fn to_system_time(&self) -> SystemTime {
        if self.0 >= 0 {
            UNIX_EPOCH + Duration::from_millis(self.0 as u64)
        } else {
            UNIX_EPOCH - Duration::from_millis(self.0.unsigned_abs())
        }
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(duration) => Timestamp(i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)),
            Err(e) => Timestamp(
                i64::try_from(e.duration().as_millis()).map_or(i64::MIN, |millis| -millis),
            ),
        }
    }
}

impl From<Timestamp> for SystemTime {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.to_system_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_time_roundtrip() {
        let now = SystemTime::now();
        let back = Timestamp::from(now).to_system_time();
        let diff = now.duration_since(back).unwrap_or_default();
        assert!(diff < Duration::from_millis(1));
    }

    #[test]
    fn test_before_epoch() {
        let time = UNIX_EPOCH - Duration::from_millis(1500);
        let timestamp = Timestamp::from(time);
        assert_eq!(timestamp.as_millis(), -1500);
        assert_eq!(timestamp.to_system_time(), time);
    }

    #[test]
    fn test_out_of_range_saturates() {
        let far = Duration::from_secs(i64::MAX as u64 / 2);
        let future = UNIX_EPOCH.checked_add(far).unwrap();
        let past = UNIX_EPOCH.checked_sub(far).unwrap();
        assert_eq!(Timestamp::from(future).as_millis(), i64::MAX);
        assert_eq!(Timestamp::from(past).as_millis(), i64::MIN);
    }

    #[test]
    fn test_ordering_follows_millis() {
        assert!(Timestamp::from_millis(5000) < Timestamp::from_millis(5001));
        assert_eq!(Timestamp::from_millis(42).to_string(), "42ms");
    }
}
