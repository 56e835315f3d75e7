//! Register map and bitfield images for the DS3231 RTC.
//!
//! The chip's control and status bytes carry independent single-bit flags
//! and small multi-bit fields; modelling them as [`bitfield`] wrappers
//! keeps the protocol self-documenting and testable without a bus. The
//! seven BCD time registers are handled as a plain byte image by
//! [`crate::codec`].

use bitfield::bitfield;

/// Register addresses of the DS3231.
#[allow(unused)]
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegAddr {
    /// Seconds register (BCD, 0-59; bit 7 shared with the oscillator on
    /// some parts)
    Seconds = 0x00,
    /// Minutes register (BCD, 0-59)
    Minutes = 0x01,
    /// Hours register (BCD, 0-23)
    Hours = 0x02,
    /// Day-of-week register (1-7, Monday=1)
    Day = 0x03,
    /// Date register (BCD, 1-31)
    Date = 0x04,
    /// Month register (BCD, 1-12)
    Month = 0x05,
    /// Year register (BCD, 0-99)
    Year = 0x06,
    /// Alarm 1 seconds register
    Alarm1Seconds = 0x07,
    /// Alarm 1 minutes register
    Alarm1Minutes = 0x08,
    /// Alarm 1 hours register
    Alarm1Hours = 0x09,
    /// Alarm 1 day/date register
    Alarm1DayDate = 0x0A,
    /// Alarm 2 minutes register
    Alarm2Minutes = 0x0B,
    /// Alarm 2 hours register
    Alarm2Hours = 0x0C,
    /// Alarm 2 day/date register
    Alarm2DayDate = 0x0D,
    /// Control register
    Control = 0x0E,
    /// Control/Status register
    Status = 0x0F,
    /// Aging offset register
    AgingOffset = 0x10,
    /// Temperature MSB register (signed integer degrees)
    TempMsb = 0x11,
    /// Temperature LSB register (quarter degrees in bits 7-6)
    TempLsb = 0x12,
}

/// One of the two alarm subsystems.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alarm {
    /// Alarm 1, seconds precision.
    One = 1,
    /// Alarm 2, minute precision.
    Two = 2,
}

/// INT/SQW pin function control.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptControl {
    /// Output a square wave on the INT/SQW pin
    SquareWave = 0,
    /// Output alarm interrupts on the INT/SQW pin
    Interrupt = 1,
}
impl From<u8> for InterruptControl {
    /// Creates an `InterruptControl` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => InterruptControl::SquareWave,
            1 => InterruptControl::Interrupt,
            _ => panic!("Invalid value for InterruptControl: {}", v),
        }
    }
}
impl From<InterruptControl> for u8 {
    fn from(v: InterruptControl) -> Self {
        v as u8
    }
}

/// Square wave output frequency options.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SquareWaveFrequency {
    /// 1 Hz square wave output
    Hz1 = 0b00,
    /// 1.024 kHz square wave output
    Hz1024 = 0b01,
    /// 4.096 kHz square wave output
    Hz4096 = 0b10,
    /// 8.192 kHz square wave output
    Hz8192 = 0b11,
}
impl From<u8> for SquareWaveFrequency {
    /// Creates a `SquareWaveFrequency` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not a two-bit rate selector.
    fn from(v: u8) -> Self {
        match v {
            0b00 => SquareWaveFrequency::Hz1,
            0b01 => SquareWaveFrequency::Hz1024,
            0b10 => SquareWaveFrequency::Hz4096,
            0b11 => SquareWaveFrequency::Hz8192,
            _ => panic!("Invalid value for SquareWaveFrequency: {}", v),
        }
    }
}
impl From<SquareWaveFrequency> for u8 {
    fn from(v: SquareWaveFrequency) -> Self {
        v as u8
    }
}

/// Mode of the INT/SQW pin as exposed by the driver: either an alarm
/// interrupt line, or a square wave at one of the four rates.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SqwPinMode {
    /// Square wave output disabled; the pin serves the alarm interrupts.
    Off,
    /// 1 Hz square wave.
    Hz1,
    /// 1.024 kHz square wave.
    Hz1024,
    /// 4.096 kHz square wave.
    Hz4096,
    /// 8.192 kHz square wave.
    Hz8192,
}

impl From<SqwPinMode> for SquareWaveFrequency {
    /// Frequency selector for a rate mode. `Off` maps to the power-on
    /// default rate; the INTCN bit decides whether it is ever emitted.
    fn from(v: SqwPinMode) -> Self {
        match v {
            SqwPinMode::Off | SqwPinMode::Hz1 => SquareWaveFrequency::Hz1,
            SqwPinMode::Hz1024 => SquareWaveFrequency::Hz1024,
            SqwPinMode::Hz4096 => SquareWaveFrequency::Hz4096,
            SqwPinMode::Hz8192 => SquareWaveFrequency::Hz8192,
        }
    }
}

// This macro generates the From<u8> and Into<u8> implementations for the
// register type
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

bitfield! {
    /// Control register (0x0E) for device configuration.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Control(u8);
    impl Debug;
    /// Disable the oscillator on battery power (EOSC, active high)
    pub disable_oscillator, set_disable_oscillator: 7;
    /// Enable square wave output on battery power (BBSQW)
    pub battery_backed_square_wave, set_battery_backed_square_wave: 6;
    /// Force a temperature conversion (CONV)
    pub convert_temperature, set_convert_temperature: 5;
    /// Square wave output frequency selection (RS2/RS1)
    pub from into SquareWaveFrequency, square_wave_frequency, set_square_wave_frequency: 4, 3;
    /// INT/SQW pin function control (INTCN)
    pub from into InterruptControl, interrupt_control, set_interrupt_control: 2, 2;
    /// Enable alarm 2 interrupt (A2IE)
    pub alarm2_interrupt_enable, set_alarm2_interrupt_enable: 1;
    /// Enable alarm 1 interrupt (A1IE)
    pub alarm1_interrupt_enable, set_alarm1_interrupt_enable: 0;
}
from_register_u8!(Control);

impl Control {
    /// Reads the interrupt-enable flag of the given alarm (bit `n - 1`).
    pub fn alarm_interrupt_enabled(&self, alarm: Alarm) -> bool {
        match alarm {
            Alarm::One => self.alarm1_interrupt_enable(),
            Alarm::Two => self.alarm2_interrupt_enable(),
        }
    }

    /// Sets the interrupt-enable flag of the given alarm.
    pub fn set_alarm_interrupt_enabled(&mut self, alarm: Alarm, enabled: bool) {
        match alarm {
            Alarm::One => self.set_alarm1_interrupt_enable(enabled),
            Alarm::Two => self.set_alarm2_interrupt_enable(enabled),
        }
    }
}

bitfield! {
    /// Status register (0x0F) for device state and flags.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Status(u8);
    impl Debug;
    /// Oscillator stop flag (OSF); set after power loss
    pub oscillator_stop_flag, set_oscillator_stop_flag: 7;
    /// Enable 32kHz output (EN32kHz)
    pub enable_32khz_output, set_enable_32khz_output: 3;
    /// Device busy flag (BSY)
    pub busy, set_busy: 2;
    /// Alarm 2 triggered flag (A2F)
    pub alarm2_flag, set_alarm2_flag: 1;
    /// Alarm 1 triggered flag (A1F)
    pub alarm1_flag, set_alarm1_flag: 0;
}
from_register_u8!(Status);

impl Status {
    /// Reads the fired flag of the given alarm (bit `n - 1`).
    pub fn alarm_fired(&self, alarm: Alarm) -> bool {
        match alarm {
            Alarm::One => self.alarm1_flag(),
            Alarm::Two => self.alarm2_flag(),
        }
    }

    /// Sets the fired flag of the given alarm. Writing `false` clears a
    /// pending alarm on the device.
    pub fn set_alarm_fired(&mut self, alarm: Alarm, fired: bool) {
        match alarm {
            Alarm::One => self.set_alarm1_flag(fired),
            Alarm::Two => self.set_alarm2_flag(fired),
        }
    }
}
