//! Text rendering for [`DateTime`] values.
//!
//! Two surfaces, both allocation-free:
//!
//! - [`DateTime::format_in_place`], a token-substitution engine that
//!   rewrites a caller buffer holding a pattern such as
//!   `"DDD, DD MMM YYYY hh:mm:ss"` into the concrete date/time. Every
//!   token is replaced by exactly as many bytes as it occupies, so the
//!   rewrite can never run past the buffer.
//! - [`DateTime::timestamp`], fixed ISO 8601 style output in one of three
//!   predefined shapes, always 24-hour and zero-padded.
//!
//! # Tokens
//!
//! | token | output                                             |
//! |-------|----------------------------------------------------|
//! | YYYY  | year as a 4-digit number (2000--2099)              |
//! | YY    | year as a 2-digit number (00--99)                  |
//! | MM    | month as a 2-digit number (01--12)                 |
//! | MMM   | abbreviated English month name ("Jan"--"Dec")      |
//! | DD    | day as a 2-digit number (01--31)                   |
//! | DDD   | abbreviated English weekday name ("Sun"--"Sat")    |
//! | AP    | either "AM" or "PM"                                |
//! | ap    | either "am" or "pm"                                |
//! | hh    | hour as a 2-digit number (00--23 or 01--12)        |
//! | mm    | minute as a 2-digit number (00--59)                |
//! | ss    | second as a 2-digit number (00--59)                |
//!
//! If `AP` or `ap` appears anywhere in the pattern, `hh` renders in
//! 12-hour mode (01--12); otherwise in 24-hour mode (00--23). Bytes not
//! belonging to a token pass through unchanged.

use crate::datetime::DateTime;

const WEEKDAY_NAMES: &[u8; 21] = b"SunMonTueWedThuFriSat";
const MONTH_NAMES: &[u8; 36] = b"JanFebMarAprMayJunJulAugSepOctNovDec";

/// Length of the longest [`DateTime::timestamp`] output,
/// `"yyyy-mm-ddThh:mm:ss"`.
pub const TIMESTAMP_LEN: usize = 19;

/// Selects one of the predefined [`DateTime::timestamp`] shapes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimestampKind {
    /// Time only, `"hh:mm:ss"`.
    Time,
    /// Date only, `"yyyy-mm-dd"`.
    Date,
    /// Date and time, `"yyyy-mm-ddThh:mm:ss"`.
    Full,
}

/// Writes `value` as two ASCII digits at `buffer[i]` and `buffer[i + 1]`.
/// The tens digit is taken modulo 10 so garbage field values stay within
/// ASCII digits instead of overflowing.
fn put2(buffer: &mut [u8], i: usize, value: u8) {
    buffer[i] = b'0' + (value / 10) % 10;
    buffer[i + 1] = b'0' + value % 10;
}

fn contains(haystack: &[u8], needle: &[u8; 2]) -> bool {
    haystack.windows(2).any(|w| w == needle)
}

impl DateTime {
    /// Renders this `DateTime` through a pattern held in `buffer`,
    /// overwriting the tokens in place, and returns the result as `&str`.
    ///
    /// The caller fills `buffer` with the pattern before the call; the
    /// output occupies exactly the same bytes. See the [module
    /// docs](self) for the token table.
    ///
    /// ```
    /// use ds3231_clock::DateTime;
    ///
    /// let dt = DateTime::new(2020, 4, 16, 18, 34, 56);
    /// let mut buf = *b"DDD, DD MMM YYYY hh:mm:ss";
    /// assert_eq!(dt.format_in_place(&mut buf), "Thu, 16 Apr 2020 18:34:56");
    /// ```
    pub fn format_in_place<'a>(&self, buffer: &'a mut [u8]) -> &'a str {
        // 12-hour mode is decided once, from the whole pattern.
        let twelve_hour_mode = contains(buffer, b"AP") || contains(buffer, b"ap");
        let is_pm = self.hour() >= 12;
        let hour12 = self.twelve_hour();

        let len = buffer.len();
        for i in 0..len.saturating_sub(1) {
            if buffer[i] == b'h' && buffer[i + 1] == b'h' {
                if twelve_hour_mode {
                    put2(buffer, i, hour12);
                } else {
                    put2(buffer, i, self.hour());
                }
            }
            if buffer[i] == b'm' && buffer[i + 1] == b'm' {
                put2(buffer, i, self.minute());
            }
            if buffer[i] == b's' && buffer[i + 1] == b's' {
                put2(buffer, i, self.second());
            }
            if i + 2 < len && buffer[i] == b'D' && buffer[i + 1] == b'D' && buffer[i + 2] == b'D' {
                let name = &WEEKDAY_NAMES[3 * usize::from(self.day_of_week())..];
                buffer[i] = name[0];
                buffer[i + 1] = name[1];
                buffer[i + 2] = name[2];
            } else if buffer[i] == b'D' && buffer[i + 1] == b'D' {
                put2(buffer, i, self.day());
            }
            if i + 2 < len && buffer[i] == b'M' && buffer[i + 1] == b'M' && buffer[i + 2] == b'M' {
                let idx = 3 * usize::from(self.month().saturating_sub(1).min(11));
                let name = &MONTH_NAMES[idx..];
                buffer[i] = name[0];
                buffer[i + 1] = name[1];
                buffer[i + 2] = name[2];
            } else if buffer[i] == b'M' && buffer[i + 1] == b'M' {
                put2(buffer, i, self.month());
            }
            if i + 3 < len
                && buffer[i] == b'Y'
                && buffer[i + 1] == b'Y'
                && buffer[i + 2] == b'Y'
                && buffer[i + 3] == b'Y'
            {
                buffer[i] = b'2';
                buffer[i + 1] = b'0';
                put2(buffer, i + 2, self.year_offset());
            } else if buffer[i] == b'Y' && buffer[i + 1] == b'Y' {
                put2(buffer, i, self.year_offset());
            }
            if buffer[i] == b'A' && buffer[i + 1] == b'P' {
                buffer[i] = if is_pm { b'P' } else { b'A' };
                buffer[i + 1] = b'M';
            } else if buffer[i] == b'a' && buffer[i + 1] == b'p' {
                buffer[i] = if is_pm { b'p' } else { b'a' };
                buffer[i + 1] = b'm';
            }
        }

        // Tokens only ever write ASCII over ASCII, so a pattern that was
        // valid UTF-8 stays valid UTF-8.
        core::str::from_utf8(buffer).unwrap_or("")
    }

    /// Writes one of the predefined ISO 8601 style timestamps into
    /// `buffer` and returns it as `&str`.
    ///
    /// ```
    /// use ds3231_clock::{DateTime, TimestampKind, TIMESTAMP_LEN};
    ///
    /// let dt = DateTime::new(2020, 4, 16, 18, 34, 56);
    /// let mut buf = [0u8; TIMESTAMP_LEN];
    /// assert_eq!(
    ///     dt.timestamp(TimestampKind::Full, &mut buf),
    ///     "2020-04-16T18:34:56"
    /// );
    /// ```
    pub fn timestamp<'a>(
        &self,
        kind: TimestampKind,
        buffer: &'a mut [u8; TIMESTAMP_LEN],
    ) -> &'a str {
        let len = match kind {
            TimestampKind::Time => {
                put2(buffer, 0, self.hour());
                buffer[2] = b':';
                put2(buffer, 3, self.minute());
                buffer[5] = b':';
                put2(buffer, 6, self.second());
                8
            }
            TimestampKind::Date => {
                self.put_date(buffer);
                10
            }
            TimestampKind::Full => {
                self.put_date(buffer);
                buffer[10] = b'T';
                put2(buffer, 11, self.hour());
                buffer[13] = b':';
                put2(buffer, 14, self.minute());
                buffer[16] = b':';
                put2(buffer, 17, self.second());
                19
            }
        };
        core::str::from_utf8(&buffer[..len]).unwrap_or("")
    }

    fn put_date(&self, buffer: &mut [u8]) {
        buffer[0] = b'2';
        buffer[1] = b'0';
        put2(buffer, 2, self.year_offset());
        buffer[4] = b'-';
        put2(buffer, 5, self.month());
        buffer[7] = b'-';
        put2(buffer, 8, self.day());
    }
}

impl core::fmt::Display for DateTime {
    /// Formats as the full timestamp shape, `"yyyy-mm-ddThh:mm:ss"`.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut buf = [0u8; TIMESTAMP_LEN];
        f.write_str(self.timestamp(TimestampKind::Full, &mut buf))
    }
}
