//! Countdown field decomposition.

use std::fmt;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_DAY: i64 = 86_400_000;

/// Whole days, hours, minutes and seconds remaining until a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountdownFields {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl CountdownFields {
    /// Decomposes a remaining duration in milliseconds.
    ///
    /// Sub-second remainders are truncated. Negative input is clamped to
    /// zero; callers only ask for a countdown while the target is ahead.
    #[must_use]
    pub const fn from_millis(remaining_ms: i64) -> Self {
        let ms = if remaining_ms < 0 { 0 } else { remaining_ms };
        Self {
            days: ms / MS_PER_DAY,
            hours: (ms % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (ms % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }

    /// The four display fields, each zero-padded to at least two digits.
    #[must_use]
    pub fn padded(&self) -> [String; 4] {
        [
            format!("{:02}", self.days),
            format!("{:02}", self.hours),
            format!("{:02}", self.minutes),
            format!("{:02}", self.seconds),
        ]
    }

    /// Total milliseconds represented by the fields.
    #[must_use]
    pub const fn total_millis(&self) -> i64 {
        self.days * MS_PER_DAY
            + self.hours * MS_PER_HOUR
            + self.minutes * MS_PER_MINUTE
            + self.seconds * MS_PER_SECOND
    }
}

impl fmt::Display for CountdownFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [d, h, m, s] = self.padded();
        write!(f, "{d}d {h}h {m}m {s}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decomposes_mixed_duration() {
        // 3d 4h 5m 6s 789ms
        let ms = 3 * MS_PER_DAY + 4 * MS_PER_HOUR + 5 * MS_PER_MINUTE + 6 * MS_PER_SECOND + 789;
        let fields = CountdownFields::from_millis(ms);
        assert_eq!(
            fields,
            CountdownFields {
                days: 3,
                hours: 4,
                minutes: 5,
                seconds: 6,
            }
        );
        assert_eq!(fields.padded(), ["03", "04", "05", "06"]);
        assert_eq!(fields.to_string(), "03d 04h 05m 06s");
    }

    #[test]
    fn pads_zero_and_keeps_wide_days() {
        assert_eq!(CountdownFields::from_millis(0).padded(), ["00", "00", "00", "00"]);
        assert_eq!(CountdownFields::from_millis(999).seconds, 0);
        assert_eq!(CountdownFields::from_millis(123 * MS_PER_DAY).padded()[0], "123");
    }

    #[test]
    fn negative_is_clamped() {
        assert_eq!(CountdownFields::from_millis(-5_000), CountdownFields::default());
    }

    proptest! {
        #[test]
        fn fields_are_exact_decomposition(ms in 0i64..(400 * MS_PER_DAY)) {
            let f = CountdownFields::from_millis(ms);
            prop_assert!(f.hours < 24);
            prop_assert!(f.minutes < 60);
            prop_assert!(f.seconds < 60);
            prop_assert_eq!(f.total_millis(), ms - ms % MS_PER_SECOND);
        }
    }
}
