//! Calendar date/time value type for the DS3231's 2000--2099 window.
//!
//! [`DateTime`] is an immutable point in time stored as a year offset from
//! 2000 plus month, day, hour, minute and second. It is pure value logic:
//! no allocation, no hardware coupling, safe to use without any device
//! attached.
//!
//! # Construction contract
//!
//! None of the constructors fail. Out-of-range or malformed input produces
//! a `DateTime` that [`DateTime::is_valid`] rejects, so callers construct
//! first and check afterwards:
//!
//! ```
//! use ds3231_clock::DateTime;
//!
//! let dt = DateTime::new(2024, 4, 31, 12, 0, 0);
//! assert!(!dt.is_valid()); // April has 30 days
//! ```
//!
//! # Epoch
//!
//! The crate epoch is 2000-01-01 00:00:00. [`DateTime::unix_time`] bridges
//! to the Unix epoch with a fixed offset; there is no time-zone handling.

/// Seconds between 1970-01-01 00:00:00 and 2000-01-01 00:00:00.
pub const SECONDS_FROM_1970_TO_2000: u32 = 946_684_800;

/// Days in each month from January to November. December is never consulted
/// because month 12 terminates the accumulation loops first.
const DAYS_IN_MONTH: [u8; 11] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30];

/// Converts two ASCII digits to a number, e.g. `b"09"` to 9.
///
/// Total over arbitrary bytes: a non-digit first byte counts as 0 and the
/// second byte wraps, producing a value that `is_valid` later rejects.
fn conv2d(p: &[u8]) -> u8 {
    let mut v = 0;
    if p[0].is_ascii_digit() {
        v = p[0] - b'0';
    }
    (10 * v).wrapping_add(p[1].wrapping_sub(b'0'))
}

/// Number of days since 2000-01-01 for a (year offset, month, day) triple.
///
/// Arithmetic wraps on out-of-range input; such values never pass
/// `is_valid`.
fn date_to_days(year_offset: u8, month: u8, day: u8) -> u16 {
    let y = u16::from(year_offset);
    let mut days = u16::from(day);
    for m in 1..month.min(12) {
        days += u16::from(DAYS_IN_MONTH[usize::from(m) - 1]);
    }
    if month > 2 && year_offset % 4 == 0 {
        days += 1;
    }
    days.wrapping_add(365u16.wrapping_mul(y))
        .wrapping_add((y + 3) / 4)
        .wrapping_sub(1)
}

/// Combines a day count with hours, minutes and seconds into total seconds.
///
/// Wraps like `date_to_days`: a wrapped day count times 86400 exceeds
/// `u32`, and such values must come out as ordinary invalid tuples.
fn time_to_seconds(days: u16, hour: u8, minute: u8, second: u8) -> u32 {
    u32::from(days)
        .wrapping_mul(24)
        .wrapping_add(u32::from(hour))
        .wrapping_mul(60)
        .wrapping_add(u32::from(minute))
        .wrapping_mul(60)
        .wrapping_add(u32::from(second))
}

/// A calendar date and time in the years 2000--2099.
///
/// Ordering is chronological. Copies are independent values.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    year_offset: u8,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl Default for DateTime {
    /// The earliest representable instant, 2000-01-01 00:00:00.
    fn default() -> Self {
        DateTime {
            year_offset: 0,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

impl DateTime {
    /// Creates a `DateTime` from seconds since the Unix epoch.
    ///
    /// The subtraction of the 1970-to-2000 offset wraps on underflow;
    /// timestamps before 2000-01-01 therefore decode to nonsense that
    /// [`is_valid`](Self::is_valid) rejects.
    pub fn from_unix(timestamp: u32) -> Self {
        let mut t = timestamp.wrapping_sub(SECONDS_FROM_1970_TO_2000);

        let second = (t % 60) as u8;
        t /= 60;
        let minute = (t % 60) as u8;
        t /= 60;
        let hour = (t % 24) as u8;
        let mut days = (t / 24) as u16;

        let mut year_offset: u8 = 0;
        let mut leap;
        loop {
            leap = year_offset % 4 == 0;
            let year_days = 365 + u16::from(leap);
            if days < year_days {
                break;
            }
            days -= year_days;
            year_offset = year_offset.wrapping_add(1);
        }

        let mut month = 1u8;
        while month < 12 {
            let mut month_days = u16::from(DAYS_IN_MONTH[usize::from(month) - 1]);
            if leap && month == 2 {
                month_days += 1;
            }
            if days < month_days {
                break;
            }
            days -= month_days;
            month += 1;
        }

        DateTime {
            year_offset,
            month,
            day: (days + 1) as u8,
            hour,
            minute,
            second,
        }
    }

    /// Creates a `DateTime` from explicit fields without validation.
    ///
    /// `year` may be either a full year (2000--2099, normalized by
    /// subtracting 2000) or a raw offset (0--99). Impossible combinations
    /// such as 31 February are accepted here and rejected by
    /// [`is_valid`](Self::is_valid).
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        let year_offset = if year >= 2000 { year - 2000 } else { year } as u8;
        DateTime {
            year_offset,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Creates a `DateTime` from compiler build strings.
    ///
    /// Expects the formats produced by the standard `__DATE__` and
    /// `__TIME__` style macros: `"Apr 16 2020"` and `"18:34:56"`. Short
    /// input falls back to template defaults byte-for-byte.
    pub fn from_build_time(date: &str, time: &str) -> Self {
        let mut d = *b"Jan 01 2000";
        let n = date.len().min(d.len());
        d[..n].copy_from_slice(&date.as_bytes()[..n]);

        let mut t = *b"00:00:00";
        let n = time.len().min(t.len());
        t[..n].copy_from_slice(&time.as_bytes()[..n]);

        // Jan Feb Mar Apr May Jun Jul Aug Sep Oct Nov Dec
        let month = match d[0] {
            b'J' => {
                if d[1] == b'a' {
                    1
                } else if d[2] == b'n' {
                    6
                } else {
                    7
                }
            }
            b'F' => 2,
            b'A' => {
                if d[2] == b'r' {
                    4
                } else {
                    8
                }
            }
            b'M' => {
                if d[2] == b'r' {
                    3
                } else {
                    5
                }
            }
            b'S' => 9,
            b'O' => 10,
            b'N' => 11,
            b'D' => 12,
            _ => 1,
        };

        DateTime {
            year_offset: conv2d(&d[9..]),
            month,
            day: conv2d(&d[4..]),
            hour: conv2d(&t[0..]),
            minute: conv2d(&t[3..]),
            second: conv2d(&t[6..]),
        }
    }

    /// Creates a `DateTime` from an ISO 8601 string such as
    /// `"2020-06-25T15:29:37"`.
    ///
    /// The input is overlaid onto the template `"2000-01-01T00:00:00"`;
    /// positions a short input does not cover keep their template
    /// defaults. Only the last two digits of the year are read, so the
    /// year must be in 2000--2099.
    pub fn from_iso8601(s: &str) -> Self {
        let mut buf = *b"2000-01-01T00:00:00";
        let n = s.len().min(buf.len());
        buf[..n].copy_from_slice(&s.as_bytes()[..n]);

        DateTime {
            year_offset: conv2d(&buf[2..]),
            month: conv2d(&buf[5..]),
            day: conv2d(&buf[8..]),
            hour: conv2d(&buf[11..]),
            minute: conv2d(&buf[14..]),
            second: conv2d(&buf[17..]),
        }
    }

    /// Checks whether this `DateTime` denotes a real calendar instant.
    ///
    /// Defined operationally: the year offset must be below 100 and the
    /// tuple must survive a round trip through the Unix-time conversion.
    /// This rejects impossible field combinations such as 31 April or
    /// 29 February of a non-leap year.
    pub fn is_valid(&self) -> bool {
        if self.year_offset >= 100 {
            return false;
        }
        Self::from_unix(self.unix_time()) == *self
    }

    /// Seconds since 1970-01-01 00:00:00.
    pub fn unix_time(&self) -> u32 {
        self.seconds_since_2000()
            .wrapping_add(SECONDS_FROM_1970_TO_2000)
    }

    /// Seconds since 2000-01-01 00:00:00.
    pub fn seconds_since_2000(&self) -> u32 {
        let days = date_to_days(self.year_offset, self.month, self.day);
        time_to_seconds(days, self.hour, self.minute, self.second)
    }

    /// Day of the week, 0 (Sunday) through 6 (Saturday).
    pub fn day_of_week(&self) -> u8 {
        let days = date_to_days(self.year_offset, self.month, self.day);
        // 2000-01-01 was a Saturday, hence the +6 calibration.
        ((days + 6) % 7) as u8
    }

    /// The hour in 12-hour format (1--12). Midnight and noon both map
    /// to 12.
    pub fn twelve_hour(&self) -> u8 {
        match self.hour {
            0 | 12 => 12,
            h if h > 12 => h - 12,
            h => h,
        }
    }

    /// Full year, 2000--2099.
    pub fn year(&self) -> u16 {
        2000 + u16::from(self.year_offset)
    }

    /// Years since 2000, 0--99.
    pub fn year_offset(&self) -> u8 {
        self.year_offset
    }

    /// Month, 1--12.
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Day of the month, 1--31.
    pub fn day(&self) -> u8 {
        self.day
    }

    /// Hour, 0--23.
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute, 0--59.
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Second, 0--59.
    pub fn second(&self) -> u8 {
        self.second
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_is_saturday() {
        let dt = DateTime::new(2000, 1, 1, 0, 0, 0);
        assert_eq!(dt.day_of_week(), 6);
        assert_eq!(dt.seconds_since_2000(), 0);
        assert_eq!(dt.unix_time(), SECONDS_FROM_1970_TO_2000);
    }

    #[test]
    fn test_from_unix_roundtrip() {
        let samples = [
            DateTime::new(2000, 1, 1, 0, 0, 0),
            DateTime::new(2000, 2, 29, 12, 0, 0), // leap day, first year
            DateTime::new(2000, 12, 31, 23, 59, 59),
            DateTime::new(2001, 1, 1, 0, 0, 0),
            DateTime::new(2004, 2, 29, 6, 30, 15),
            DateTime::new(2020, 4, 16, 18, 34, 56),
            DateTime::new(2063, 8, 5, 4, 3, 2),
            DateTime::new(2096, 2, 29, 23, 59, 59), // last leap year in range
            DateTime::new(2099, 12, 31, 23, 59, 59),
        ];
        for dt in samples {
            assert_eq!(DateTime::from_unix(dt.unix_time()), dt, "{:?}", dt);
        }
    }

    #[test]
    fn test_unix_time_monotonic_over_rollovers() {
        // Each pair is one second apart across a boundary.
        let pairs = [
            (
                DateTime::new(2000, 1, 31, 23, 59, 59),
                DateTime::new(2000, 2, 1, 0, 0, 0),
            ),
            (
                DateTime::new(2000, 2, 29, 23, 59, 59),
                DateTime::new(2000, 3, 1, 0, 0, 0),
            ),
            (
                DateTime::new(2001, 2, 28, 23, 59, 59),
                DateTime::new(2001, 3, 1, 0, 0, 0),
            ),
            (
                DateTime::new(2020, 12, 31, 23, 59, 59),
                DateTime::new(2021, 1, 1, 0, 0, 0),
            ),
            (
                DateTime::new(2096, 2, 28, 23, 59, 59),
                DateTime::new(2096, 2, 29, 0, 0, 0),
            ),
        ];
        for (before, after) in pairs {
            assert_eq!(
                before.unix_time() + 1,
                after.unix_time(),
                "{:?} -> {:?}",
                before,
                after
            );
            assert!(before < after);
        }
    }

    #[test]
    fn test_is_valid_rejects_short_months() {
        for month in [4, 6, 9, 11] {
            let dt = DateTime::new(2020, month, 31, 0, 0, 0);
            assert!(!dt.is_valid(), "month {} has no 31st", month);
        }
        let dt = DateTime::new(2020, 1, 31, 0, 0, 0);
        assert!(dt.is_valid());
    }

    #[test]
    fn test_is_valid_leap_day() {
        assert!(DateTime::new(2000, 2, 29, 0, 0, 0).is_valid());
        assert!(!DateTime::new(2001, 2, 29, 0, 0, 0).is_valid());
        assert!(DateTime::new(2004, 2, 29, 0, 0, 0).is_valid());
    }

    #[test]
    fn test_is_valid_rejects_year_2100_and_later() {
        let dt = DateTime::new(150, 1, 1, 0, 0, 0); // raw offset form
        assert!(!dt.is_valid());
    }

    #[test]
    fn test_is_valid_rejects_out_of_range_time_fields() {
        assert!(!DateTime::new(2020, 1, 1, 24, 0, 0).is_valid());
        assert!(!DateTime::new(2020, 1, 1, 0, 60, 0).is_valid());
        assert!(!DateTime::new(2020, 1, 1, 0, 0, 60).is_valid());
        assert!(!DateTime::new(2020, 13, 1, 0, 0, 0).is_valid());
        assert!(!DateTime::new(2020, 0, 1, 0, 0, 0).is_valid());
    }

    #[test]
    fn test_is_valid_rejects_day_zero_without_panicking() {
        // Day 0 wraps the day count to 65535, whose second count exceeds
        // u32; the tuple must come out invalid, never overflow.
        assert!(!DateTime::new(2000, 1, 0, 0, 0, 0).is_valid());
        assert!(!DateTime::from_iso8601("2000-01-00T00:00:00").is_valid());
    }

    #[test]
    fn test_is_valid_rejects_large_raw_offset_without_panicking() {
        // Offsets past ~136 years overflow a u32 of seconds.
        for offset in [136, 150, 200, 255] {
            let dt = DateTime::new(offset, 1, 1, 0, 0, 0);
            let _ = dt.unix_time();
            assert!(!dt.is_valid(), "offset {}", offset);
        }
    }

    #[test]
    fn test_from_unix_before_2000_is_invalid() {
        // Underflow wraps rather than failing; the result must simply
        // never pass validation.
        let dt = DateTime::from_unix(SECONDS_FROM_1970_TO_2000 - 1);
        assert!(!dt.is_valid());
    }

    #[test]
    fn test_new_accepts_offset_or_full_year() {
        assert_eq!(
            DateTime::new(2024, 3, 14, 1, 2, 3),
            DateTime::new(24, 3, 14, 1, 2, 3)
        );
    }

    #[test]
    fn test_from_build_time() {
        let dt = DateTime::from_build_time("Apr 16 2020", "18:34:56");
        assert_eq!(dt, DateTime::new(2020, 4, 16, 18, 34, 56));
    }

    #[test]
    fn test_from_build_time_month_disambiguation() {
        let cases = [
            ("Jan 01 2020", 1),
            ("Feb 01 2020", 2),
            ("Mar 01 2020", 3),
            ("Apr 01 2020", 4),
            ("May 01 2020", 5),
            ("Jun 01 2020", 6),
            ("Jul 01 2020", 7),
            ("Aug 01 2020", 8),
            ("Sep 01 2020", 9),
            ("Oct 01 2020", 10),
            ("Nov 01 2020", 11),
            ("Dec 01 2020", 12),
        ];
        for (date, month) in cases {
            let dt = DateTime::from_build_time(date, "00:00:00");
            assert_eq!(dt.month(), month, "{}", date);
        }
    }

    #[test]
    fn test_from_iso8601() {
        let dt = DateTime::from_iso8601("2020-06-25T15:29:37");
        assert_eq!(dt, DateTime::new(2020, 6, 25, 15, 29, 37));
        assert!(dt.is_valid());
    }

    #[test]
    fn test_from_iso8601_short_input_keeps_defaults() {
        // Only the date portion is supplied; the time stays at the
        // template's midnight.
        let dt = DateTime::from_iso8601("2020-06-25");
        assert_eq!(dt, DateTime::new(2020, 6, 25, 0, 0, 0));

        // Empty input decodes the template itself.
        let dt = DateTime::from_iso8601("");
        assert_eq!(dt, DateTime::default());
    }

    #[test]
    fn test_from_iso8601_garbage_is_invalid_not_panicking() {
        let dt = DateTime::from_iso8601("not a timestamp at all!");
        assert!(!dt.is_valid());
    }

    #[test]
    fn test_twelve_hour() {
        assert_eq!(DateTime::new(2020, 1, 1, 0, 0, 0).twelve_hour(), 12);
        assert_eq!(DateTime::new(2020, 1, 1, 12, 0, 0).twelve_hour(), 12);
        assert_eq!(DateTime::new(2020, 1, 1, 7, 0, 0).twelve_hour(), 7);
        assert_eq!(DateTime::new(2020, 1, 1, 18, 0, 0).twelve_hour(), 6);
        assert_eq!(DateTime::new(2020, 1, 1, 23, 0, 0).twelve_hour(), 11);
    }

    #[test]
    fn test_day_of_week_sequence() {
        // 2000-01-01 Saturday, then successive days wrap through Sunday.
        for (offset, expected) in [(0, 6), (1, 0), (2, 1), (3, 2), (4, 3), (5, 4), (6, 5)] {
            let dt = DateTime::from_unix(SECONDS_FROM_1970_TO_2000 + offset * 86_400);
            assert_eq!(dt.day_of_week(), expected);
        }
        // A known fixed point: 2020-04-16 was a Thursday.
        assert_eq!(DateTime::new(2020, 4, 16, 0, 0, 0).day_of_week(), 4);
    }

    #[test]
    fn test_ordering_is_chronological() {
        let mut v = [
            DateTime::new(2021, 1, 1, 0, 0, 0),
            DateTime::new(2020, 12, 31, 23, 59, 59),
            DateTime::new(2020, 12, 31, 23, 59, 58),
        ];
        v.sort();
        assert!(v[0] < v[1] && v[1] < v[2]);
        assert_eq!(v[2], DateTime::new(2021, 1, 1, 0, 0, 0));
    }
}
