#![no_std]
//! Driver for the DS3231 extremely accurate I2C real-time clock, with a
//! self-contained 2000--2099 calendar type and in-place text formatting
//! suitable for `no_std` targets.
//!
//! The device side covers the clock registers, both alarms, the INT/SQW
//! pin, the 32 kHz output and the temperature sensor. The calendar side
//! lives in [`datetime`] and [`format`] and needs no bus at all.

pub mod codec;
pub mod datetime;
pub mod format;
pub mod registers;

pub use codec::{Alarm1Mode, Alarm2Mode};
pub use datetime::{DateTime, SECONDS_FROM_1970_TO_2000};
pub use format::{TimestampKind, TIMESTAMP_LEN};
pub use registers::{
    Alarm, Control, InterruptControl, RegAddr, SqwPinMode, SquareWaveFrequency, Status,
};

use embedded_hal::i2c::I2c;

#[cfg(all(feature = "defmt", not(feature = "log")))]
use defmt::debug;
#[cfg(feature = "log")]
use log::debug;

/// Fixed I2C address of the DS3231.
pub const DS3231_ADDRESS: u8 = 0x68;

#[derive(Debug)]
pub enum Error<I2CE> {
    /// Bus error from the underlying I2C implementation.
    I2c(I2CE),
    /// The device has not been probed yet; call [`Ds3231::begin`] first.
    NotReady,
    /// The INT/SQW pin is in square-wave mode, so alarm interrupts
    /// cannot fire. Switch it with [`Ds3231::write_sqw_pin_mode`].
    AlarmInterruptsDisabled,
}

impl<I2CE> From<I2CE> for Error<I2CE> {
    fn from(e: I2CE) -> Self {
        Error::I2c(e)
    }
}

macro_rules! set_and_get_register {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        $(
            paste::item!{
                pub fn [< set_ $name >](&mut self, value: $typ) -> Result<(), Error<I2C::Error>> {
                    self.ensure_ready()?;
                    self.i2c.write(
                        self.address,
                        &[$regaddr as u8, value.into()],
                        )?;
                    Ok(())
                }
            }

            pub fn $name(&mut self) -> Result<$typ, Error<I2C::Error>> {
                self.ensure_ready()?;
                let mut data = [0];
                self.i2c
                    .write_read(self.address, &[$regaddr as u8], &mut data)?;
                Ok(<$typ>::from(data[0]))
            }
        )+
    }
}

pub struct Ds3231<I2C: I2c> {
    i2c: I2C,
    address: u8,
    ready: bool,
}

impl<I2C: I2c> Ds3231<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            ready: false,
        }
    }

    /// Probes the device with an empty write. Every other operation
    /// fails with [`Error::NotReady`] until this succeeds; a failed
    /// probe leaves the driver unready and may be retried.
    pub fn begin(&mut self) -> Result<(), Error<I2C::Error>> {
        self.i2c.write(self.address, &[])?;
        self.ready = true;
        #[cfg(any(feature = "log", feature = "defmt"))]
        debug!("ds3231 present at {}", self.address);
        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), Error<I2C::Error>> {
        if self.ready {
            Ok(())
        } else {
            Err(Error::NotReady)
        }
    }

    /// Reads the current date and time from the clock registers.
    pub fn now(&mut self) -> Result<DateTime, Error<I2C::Error>> {
        self.ensure_ready()?;
        let mut data = [0; 7];
        self.i2c
            .write_read(self.address, &[RegAddr::Seconds as u8], &mut data)?;
        Ok(codec::decode_clock(data))
    }

    /// Sets the clock registers and clears the oscillator-stop flag, so
    /// a subsequent [`lost_power`](Self::lost_power) reports false.
    pub fn adjust(&mut self, datetime: &DateTime) -> Result<(), Error<I2C::Error>> {
        self.ensure_ready()?;
        let clock = codec::encode_clock(datetime);
        self.i2c.write(
            self.address,
            &[
                RegAddr::Seconds as u8,
                clock[0],
                clock[1],
                clock[2],
                clock[3],
                clock[4],
                clock[5],
                clock[6],
            ],
        )?;
        let mut status = self.status()?;
        status.set_oscillator_stop_flag(false);
        self.set_status(status)
    }

    /// True if the oscillator has stopped since the last
    /// [`adjust`](Self::adjust), meaning the time is not trustworthy.
    pub fn lost_power(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.status()?.oscillator_stop_flag())
    }

    /// Programs alarm 1 from `datetime` and enables its interrupt.
    ///
    /// Fails with [`Error::AlarmInterruptsDisabled`] without touching
    /// the device if the INT/SQW pin is in square-wave mode.
    pub fn set_alarm1(
        &mut self,
        datetime: &DateTime,
        mode: Alarm1Mode,
    ) -> Result<(), Error<I2C::Error>> {
        let mut control = self.control()?;
        if control.interrupt_control() != InterruptControl::Interrupt {
            return Err(Error::AlarmInterruptsDisabled);
        }
        let bytes = codec::encode_alarm1(datetime, mode);
        self.i2c.write(
            self.address,
            &[
                RegAddr::Alarm1Seconds as u8,
                bytes[0],
                bytes[1],
                bytes[2],
                bytes[3],
            ],
        )?;
        control.set_alarm_interrupt_enabled(Alarm::One, true);
        self.set_control(control)
    }

    /// Programs alarm 2 from `datetime` and enables its interrupt.
    ///
    /// Alarm 2 has no seconds register; it fires at second 00 of the
    /// matching minute. The same square-wave-mode precondition as
    /// [`set_alarm1`](Self::set_alarm1) applies.
    pub fn set_alarm2(
        &mut self,
        datetime: &DateTime,
        mode: Alarm2Mode,
    ) -> Result<(), Error<I2C::Error>> {
        let mut control = self.control()?;
        if control.interrupt_control() != InterruptControl::Interrupt {
            return Err(Error::AlarmInterruptsDisabled);
        }
        let bytes = codec::encode_alarm2(datetime, mode);
        self.i2c.write(
            self.address,
            &[
                RegAddr::Alarm2Minutes as u8,
                bytes[0],
                bytes[1],
                bytes[2],
            ],
        )?;
        control.set_alarm_interrupt_enabled(Alarm::Two, true);
        self.set_control(control)
    }

    /// Disables the given alarm's interrupt. The alarm registers keep
    /// their values.
    pub fn disable_alarm(&mut self, alarm: Alarm) -> Result<(), Error<I2C::Error>> {
        let mut control = self.control()?;
        control.set_alarm_interrupt_enabled(alarm, false);
        self.set_control(control)
    }

    /// Clears the given alarm's fired flag so it can fire again.
    pub fn clear_alarm(&mut self, alarm: Alarm) -> Result<(), Error<I2C::Error>> {
        let mut status = self.status()?;
        status.set_alarm_fired(alarm, false);
        self.set_status(status)
    }

    /// True if the given alarm has fired since it was last cleared.
    pub fn alarm_fired(&mut self, alarm: Alarm) -> Result<bool, Error<I2C::Error>> {
        Ok(self.status()?.alarm_fired(alarm))
    }

    /// Enables the battery-backed 32.768 kHz output pin.
    pub fn enable_32k(&mut self) -> Result<(), Error<I2C::Error>> {
        let mut status = self.status()?;
        status.set_enable_32khz_output(true);
        self.set_status(status)
    }

    /// Disables the 32.768 kHz output pin.
    pub fn disable_32k(&mut self) -> Result<(), Error<I2C::Error>> {
        let mut status = self.status()?;
        status.set_enable_32khz_output(false);
        self.set_status(status)
    }

    pub fn is_enabled_32k(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.status()?.enable_32khz_output())
    }

    /// Reads the die temperature in degrees Celsius, 0.25 degree
    /// resolution. Updated by the device every 64 seconds.
    pub fn temperature(&mut self) -> Result<f32, Error<I2C::Error>> {
        self.ensure_ready()?;
        let mut data = [0; 2];
        self.i2c
            .write_read(self.address, &[RegAddr::TempMsb as u8], &mut data)?;
        Ok(codec::temperature_from_raw(data[0], data[1]))
    }

    /// Current mode of the INT/SQW pin, decoded from the control
    /// register. The rate bits are only meaningful when the pin is in
    /// square-wave mode.
    pub fn read_sqw_pin_mode(&mut self) -> Result<SqwPinMode, Error<I2C::Error>> {
        let control = self.control()?;
        if control.interrupt_control() == InterruptControl::Interrupt {
            return Ok(SqwPinMode::Off);
        }
        Ok(match control.square_wave_frequency() {
            SquareWaveFrequency::Hz1 => SqwPinMode::Hz1,
            SquareWaveFrequency::Hz1024 => SqwPinMode::Hz1024,
            SquareWaveFrequency::Hz4096 => SqwPinMode::Hz4096,
            SquareWaveFrequency::Hz8192 => SqwPinMode::Hz8192,
        })
    }

    /// Routes the INT/SQW pin: `Off` selects alarm-interrupt mode, the
    /// rate variants select square-wave mode at that rate.
    pub fn write_sqw_pin_mode(&mut self, mode: SqwPinMode) -> Result<(), Error<I2C::Error>> {
        let mut control = self.control()?;
        match mode {
            SqwPinMode::Off => {
                control.set_interrupt_control(InterruptControl::Interrupt);
            }
            rate => {
                control.set_square_wave_frequency(rate.into());
                control.set_interrupt_control(InterruptControl::SquareWave);
            }
        }
        #[cfg(any(feature = "log", feature = "defmt"))]
        debug!("sqw control: {}", u8::from(control));
        self.set_control(control)
    }

    set_and_get_register!(
        (control, RegAddr::Control, Control),
        (status, RegAddr::Status, Status)
    );
}
