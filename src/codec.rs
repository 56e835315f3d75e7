//! Pure conversions between [`DateTime`] values and the DS3231's
//! BCD-encoded register bytes.
//!
//! Everything here is a total function over bytes; no bus access, no
//! state. The driver in [`crate`] feeds these images to the device as
//! single block transactions.
//!
//! # Layouts
//!
//! The clock occupies seven consecutive registers starting at 0x00:
//! seconds, minutes, hours, day-of-week, date, month, year, all BCD.
//! Alarm 1 occupies four registers (seconds through day/date), alarm 2
//! three (no seconds); bit 7 of each alarm byte is a match-mask bit and
//! bit 6 of the day/date byte selects day-of-week against date-of-month
//! matching.

use crate::datetime::DateTime;

/// Converts a BCD register byte to binary. Valid for 0--99.
pub fn bcd_to_bin(value: u8) -> u8 {
    value.wrapping_sub(6 * (value >> 4))
}

/// Converts a binary value to BCD for the registers. Valid for 0--99.
pub fn bin_to_bcd(value: u8) -> u8 {
    value.wrapping_add(6 * (value / 10))
}

/// Remaps a 0 (Sunday) -- 6 (Saturday) weekday to the device's
/// 1 (Monday) -- 7 (Sunday) numbering.
pub fn dow_to_device(day_of_week: u8) -> u8 {
    if day_of_week == 0 {
        7
    } else {
        day_of_week
    }
}

/// Match-field selector for alarm 1.
///
/// The low four bits are the A1M1--A1M4 mask bits (1 = ignore that
/// field); bit 4 selects day-of-week matching instead of date-of-month.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alarm1Mode {
    /// Fire once per second.
    PerSecond = 0x0F,
    /// Fire when seconds match.
    Seconds = 0x0E,
    /// Fire when minutes and seconds match.
    Minutes = 0x0C,
    /// Fire when hours, minutes and seconds match.
    Hours = 0x08,
    /// Fire when date, hours, minutes and seconds match.
    Date = 0x00,
    /// Fire when day of week, hours, minutes and seconds match.
    Day = 0x10,
}

/// Match-field selector for alarm 2, which has no seconds register and
/// fires at second 00 of the matching minute.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alarm2Mode {
    /// Fire once per minute.
    PerMinute = 0x07,
    /// Fire when minutes match.
    Minutes = 0x06,
    /// Fire when hours and minutes match.
    Hours = 0x04,
    /// Fire when date, hours and minutes match.
    Date = 0x00,
    /// Fire when day of week, hours and minutes match.
    Day = 0x08,
}

/// Packs a `DateTime` into the seven clock register bytes.
///
/// The day-of-week byte is derived from the date; the device needs it for
/// weekly alarms to work.
pub fn encode_clock(dt: &DateTime) -> [u8; 7] {
    [
        bin_to_bcd(dt.second()),
        bin_to_bcd(dt.minute()),
        bin_to_bcd(dt.hour()),
        bin_to_bcd(dow_to_device(dt.day_of_week())),
        bin_to_bcd(dt.day()),
        bin_to_bcd(dt.month()),
        bin_to_bcd(dt.year_offset()),
    ]
}

/// Unpacks the seven clock register bytes into a `DateTime`.
///
/// Bit 7 of the seconds byte is masked off (it doubles as an oscillator
/// control on related parts). The stored weekday is ignored; it is
/// derivable from the date.
pub fn decode_clock(data: [u8; 7]) -> DateTime {
    DateTime::new(
        2000 + u16::from(bcd_to_bin(data[6])),
        bcd_to_bin(data[5]),
        bcd_to_bin(data[4]),
        bcd_to_bin(data[2]),
        bcd_to_bin(data[1]),
        bcd_to_bin(data[0] & 0x7F),
    )
}

/// Packs a `DateTime` and a mode selector into the four alarm 1 register
/// bytes (seconds, minutes, hours, day/date).
///
/// In [`Alarm1Mode::Day`] the fourth byte carries the device-remapped
/// weekday (1--7) with the DY/DT bit set; in every other mode it carries
/// the date of the month with the bit clear.
pub fn encode_alarm1(dt: &DateTime, mode: Alarm1Mode) -> [u8; 4] {
    let selector = mode as u8;
    let a1m1 = (selector & 0x01) << 7; // seconds mask, bit 7
    let a1m2 = (selector & 0x02) << 6; // minutes mask, bit 7
    let a1m3 = (selector & 0x04) << 5; // hours mask, bit 7
    let a1m4 = (selector & 0x08) << 4; // day/date mask, bit 7
    let dy_dt = (selector & 0x10) << 2; // day/date select, bit 6

    let day_date = if dy_dt != 0 {
        bin_to_bcd(dow_to_device(dt.day_of_week())) | a1m4 | dy_dt
    } else {
        bin_to_bcd(dt.day()) | a1m4 | dy_dt
    };

    [
        bin_to_bcd(dt.second()) | a1m1,
        bin_to_bcd(dt.minute()) | a1m2,
        bin_to_bcd(dt.hour()) | a1m3,
        day_date,
    ]
}

/// Packs a `DateTime` and a mode selector into the three alarm 2 register
/// bytes (minutes, hours, day/date).
pub fn encode_alarm2(dt: &DateTime, mode: Alarm2Mode) -> [u8; 3] {
    let selector = mode as u8;
    let a2m2 = (selector & 0x01) << 7; // minutes mask, bit 7
    let a2m3 = (selector & 0x02) << 6; // hours mask, bit 7
    let a2m4 = (selector & 0x04) << 5; // day/date mask, bit 7
    let dy_dt = (selector & 0x08) << 3; // day/date select, bit 6

    let day_date = if dy_dt != 0 {
        bin_to_bcd(dow_to_device(dt.day_of_week())) | a2m4 | dy_dt
    } else {
        bin_to_bcd(dt.day()) | a2m4 | dy_dt
    };

    [
        bin_to_bcd(dt.minute()) | a2m2,
        bin_to_bcd(dt.hour()) | a2m3,
        day_date,
    ]
}

/// Decodes the two temperature registers into degrees Celsius: a signed
/// integer part plus quarter degrees from the top two bits of the LSB.
pub fn temperature_from_raw(msb: u8, lsb: u8) -> f32 {
    f32::from(msb as i8) + f32::from(lsb >> 6) * 0.25
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcd_roundtrip() {
        for n in 0..=99u8 {
            assert_eq!(bcd_to_bin(bin_to_bcd(n)), n);
        }
        assert_eq!(bin_to_bcd(0), 0x00);
        assert_eq!(bin_to_bcd(59), 0x59);
        assert_eq!(bcd_to_bin(0x59), 59);
        assert_eq!(bcd_to_bin(0x31), 31);
    }

    #[test]
    fn test_dow_to_device() {
        assert_eq!(dow_to_device(0), 7); // Sunday
        for d in 1..=6 {
            assert_eq!(dow_to_device(d), d);
        }
    }

    #[test]
    fn test_encode_clock() {
        // 2020-04-16 (a Thursday) 18:34:56.
        let dt = DateTime::new(2020, 4, 16, 18, 34, 56);
        assert_eq!(
            encode_clock(&dt),
            [0x56, 0x34, 0x18, 0x04, 0x16, 0x04, 0x20]
        );
    }

    #[test]
    fn test_encode_clock_sunday_weekday() {
        // 2020-04-19 was a Sunday; the device numbers Sunday as 7.
        let dt = DateTime::new(2020, 4, 19, 0, 0, 0);
        assert_eq!(encode_clock(&dt)[3], 0x07);
    }

    #[test]
    fn test_decode_clock_masks_seconds_high_bit() {
        let data = [0x80 | 0x56, 0x34, 0x18, 0x04, 0x16, 0x04, 0x20];
        assert_eq!(decode_clock(data), DateTime::new(2020, 4, 16, 18, 34, 56));
    }

    #[test]
    fn test_clock_roundtrip() {
        let samples = [
            DateTime::new(2000, 1, 1, 0, 0, 0),
            DateTime::new(2024, 2, 29, 23, 59, 59),
            DateTime::new(2099, 12, 31, 12, 30, 45),
        ];
        for dt in samples {
            assert_eq!(decode_clock(encode_clock(&dt)), dt, "{:?}", dt);
        }
    }

    #[test]
    fn test_alarm1_mask_bits() {
        let dt = DateTime::new(2020, 4, 16, 18, 34, 56);

        // PerSecond masks every field.
        let bytes = encode_alarm1(&dt, Alarm1Mode::PerSecond);
        assert_eq!(bytes, [0x80 | 0x56, 0x80 | 0x34, 0x80 | 0x18, 0x80 | 0x16]);

        // Date mode clears all mask bits and uses the date of month.
        let bytes = encode_alarm1(&dt, Alarm1Mode::Date);
        assert_eq!(bytes, [0x56, 0x34, 0x18, 0x16]);

        // Hours mode masks only the day/date byte.
        let bytes = encode_alarm1(&dt, Alarm1Mode::Hours);
        assert_eq!(bytes, [0x56, 0x34, 0x18, 0x80 | 0x16]);
    }

    #[test]
    fn test_alarm1_day_mode_encodes_device_weekday() {
        // 2020-04-16 was a Thursday: library weekday 4, device weekday 4.
        let dt = DateTime::new(2020, 4, 16, 18, 34, 56);
        let bytes = encode_alarm1(&dt, Alarm1Mode::Day);
        assert_eq!(bytes[3] & 0x40, 0x40, "DY/DT bit must be set");
        assert_eq!(bytes[3] & 0x3F, 0x04, "device weekday, not the date");

        // Sunday maps to 7 on the device.
        let sunday = DateTime::new(2020, 4, 19, 6, 0, 0);
        let bytes = encode_alarm1(&sunday, Alarm1Mode::Day);
        assert_eq!(bytes[3] & 0x3F, 0x07);
        assert_eq!(bytes[3] & 0x80, 0, "day mode leaves the mask bit clear");
    }

    #[test]
    fn test_alarm2_mask_bits() {
        let dt = DateTime::new(2020, 4, 16, 18, 34, 56);

        let bytes = encode_alarm2(&dt, Alarm2Mode::PerMinute);
        assert_eq!(bytes, [0x80 | 0x34, 0x80 | 0x18, 0x80 | 0x16]);

        let bytes = encode_alarm2(&dt, Alarm2Mode::Date);
        assert_eq!(bytes, [0x34, 0x18, 0x16]);

        let bytes = encode_alarm2(&dt, Alarm2Mode::Minutes);
        assert_eq!(bytes, [0x34, 0x80 | 0x18, 0x80 | 0x16]);
    }

    #[test]
    fn test_alarm2_day_mode() {
        let dt = DateTime::new(2020, 4, 19, 6, 0, 0); // Sunday
        let bytes = encode_alarm2(&dt, Alarm2Mode::Day);
        assert_eq!(bytes[2] & 0x40, 0x40);
        assert_eq!(bytes[2] & 0x3F, 0x07);
    }

    #[test]
    fn test_temperature_decode() {
        assert_eq!(temperature_from_raw(0x19, 0x00), 25.0);
        assert_eq!(temperature_from_raw(0x19, 0x40), 25.25);
        assert_eq!(temperature_from_raw(0x19, 0x80), 25.5);
        assert_eq!(temperature_from_raw(0x19, 0xC0), 25.75);
        // Negative integer part is two's complement.
        assert_eq!(temperature_from_raw(0xF6, 0x00), -10.0);
        // Low six bits of the LSB are ignored.
        assert_eq!(temperature_from_raw(0x00, 0x3F), 0.0);
    }
}
