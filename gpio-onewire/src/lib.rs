#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

/*! # gpio-onewire
 *
 * A software 1-Wire bus master that bit-bangs the protocol on a single
 * open-drain GPIO pin.
 *
 * The pin must implement both [`InputPin`] and [`OutputPin`]: driving it high
 * releases the line to the external pull-up, driving it low pulls the bus
 * down. Time slots are generated with a [`DelayNs`] timer, and every byte,
 * bit pair and reset runs inside a [`CriticalSection`] of the injected
 * [`Interrupts`] implementation.
 *
 * ```ignore
 * let mut bus = GpioOneWire::new(pin, delay, GlobalInterrupts::new())?;
 * bus.reset()?;
 * bus.write_byte(ONEWIRE_SKIP_ROM_CMD)?;
 * ```
 */

pub use embedded_onewire::{OneWire, OneWireError, OneWireResult};
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

mod error;
mod interrupts;
mod onewire;
mod status;
mod timing;

pub use error::GpioError;
pub use interrupts::{CriticalSection, GlobalInterrupts, Interrupts};
pub use status::BusStatus;
pub use timing::Timing;

/// Polls of the line, 2 µs apart, before giving up on the pull-up at start.
const RELEASE_POLLS: u16 = 125;

/// A bit-banged 1-Wire bus master.
///
/// Owns the bus pin, a delay provider and an interrupt controller. The
/// timing profile in use is switched with
/// [`OneWire::set_overdrive_mode`] and starts out at standard speed.
pub struct GpioOneWire<P, D, I> {
    pub(crate) line: Line<P, D>,
    pub(crate) irq: I,
    pub(crate) timing: &'static Timing,
}

impl<P: InputPin + OutputPin, D: DelayNs, I: Interrupts> GpioOneWire<P, D, I> {
    /// Take ownership of the bus resources and release the line.
    ///
    /// # Errors
    /// [`GpioError::LineStuckLow`] if the pull-up does not raise the line,
    /// [`GpioError::Pin`] if the pin reports an error.
    pub fn new(pin: P, delay: D, irq: I) -> Result<Self, GpioError<P::Error>> {
        let mut line = Line { pin, delay };
        line.release()?;
        if !line.wait_for(true, RELEASE_POLLS, 2)? {
            log::warn!("onewire: line stuck low after release");
            return Err(GpioError::LineStuckLow);
        }
        log::debug!("onewire: bus initialized");
        Ok(Self {
            line,
            irq,
            timing: &Timing::STANDARD,
        })
    }

    /// Release the line and return the pin, delay and interrupt controller.
    ///
    /// # Errors
    /// [`GpioError::Pin`] if the line cannot be released.
    pub fn release(self) -> Result<(P, D, I), GpioError<P::Error>> {
        let Self { mut line, irq, .. } = self;
        line.release()?;
        log::debug!("onewire: bus released");
        Ok((line.pin, line.delay, irq))
    }

    /// The timing profile currently in use.
    pub fn timing(&self) -> &'static Timing {
        self.timing
    }
}

/// The raw line: one open-drain pin and a timer.
pub(crate) struct Line<P, D> {
    pub(crate) pin: P,
    pub(crate) delay: D,
}

impl<P: InputPin + OutputPin, D: DelayNs> Line<P, D> {
    pub(crate) fn release(&mut self) -> Result<(), GpioError<P::Error>> {
        Ok(self.pin.set_high()?)
    }

    pub(crate) fn pull_low(&mut self) -> Result<(), GpioError<P::Error>> {
        Ok(self.pin.set_low()?)
    }

    pub(crate) fn sample(&mut self) -> Result<bool, GpioError<P::Error>> {
        Ok(self.pin.is_high()?)
    }

    /// Poll until the line reads `level`, at most `polls` times.
    pub(crate) fn wait_for(
        &mut self,
        level: bool,
        polls: u16,
        interval_us: u32,
    ) -> Result<bool, GpioError<P::Error>> {
        for _ in 0..polls {
            if self.sample()? == level {
                return Ok(true);
            }
            self.delay.delay_us(interval_us);
        }
        Ok(false)
    }

    /// Drive low for `low_us`, then release for `high_us`.
    pub(crate) fn pulse(&mut self, low_us: u32, high_us: u32) -> Result<(), GpioError<P::Error>> {
        self.pull_low()?;
        self.delay.delay_us(low_us);
        self.release()?;
        self.delay.delay_us(high_us);
        Ok(())
    }

    pub(crate) fn write_slot(&mut self, bit: bool, t: &Timing) -> Result<(), GpioError<P::Error>> {
        if bit {
            self.pulse(t.write_one_low_us, t.write_one_high_us)
        } else {
            self.pulse(t.write_zero_low_us, t.write_zero_high_us)
        }
    }

    pub(crate) fn read_slot(&mut self, t: &Timing) -> Result<bool, GpioError<P::Error>> {
        self.pulse(t.read_low_us, t.read_sample_us)?;
        let bit = self.sample()?;
        self.delay.delay_us(t.read_recovery_us);
        Ok(bit)
    }
}
