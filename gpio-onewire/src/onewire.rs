use crate::{BusStatus, CriticalSection, GpioError, GpioOneWire, Interrupts, Timing};
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};
use embedded_onewire::{OneWire, OneWireError, OneWireResult};

impl<P: InputPin + OutputPin, D: DelayNs, I: Interrupts> OneWire for GpioOneWire<P, D, I> {
    type Status = BusStatus;

    type BusError = GpioError<P::Error>;

    fn reset(&mut self) -> OneWireResult<Self::Status, Self::BusError> {
        let t = self.timing;
        let status = BusStatus::new().with_overdrive(t.overdrive);
        let _cs = CriticalSection::enter(&mut self.irq);
        if !self.line.sample()? {
            log::warn!("onewire: line held low before reset");
            return Err(OneWireError::ShortCircuit);
        }
        self.line.pulse(t.reset_low_us, t.reset_release_us)?;
        if !self.line.wait_for(false, t.presence_low_polls, 1)? {
            log::debug!("onewire: no presence pulse");
            return Err(OneWireError::NoDevicePresent);
        }
        if !self.line.wait_for(true, t.presence_high_polls, 1)? {
            log::warn!("onewire: presence pulse did not end");
            return Err(OneWireError::NoDevicePresent);
        }
        Ok(status.with_presence_detect(true))
    }

    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError> {
        let t = self.timing;
        let _cs = CriticalSection::enter(&mut self.irq);
        for i in 0..8 {
            self.line
                .write_slot((byte >> i) & 0x1 == 0x1, t)
                .inspect_err(|_| log::warn!("onewire: write byte failed at bit {i}"))?;
        }
        Ok(())
    }

    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError> {
        let t = self.timing;
        let _cs = CriticalSection::enter(&mut self.irq);
        let mut byte = 0u8;
        for i in 0..8 {
            let bit = self
                .line
                .read_slot(t)
                .inspect_err(|_| log::warn!("onewire: read byte failed at bit {i}"))?;
            byte = ((bit as u8) << 7) | (byte >> 1);
        }
        Ok(byte)
    }

    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError> {
        let t = self.timing;
        let _cs = CriticalSection::enter(&mut self.irq);
        let line = &mut self.line;
        line.pull_low()?;
        line.delay.delay_us(t.bit_low_us);
        if bit {
            line.release()?;
        }
        line.delay.delay_us(t.bit_hold_us);
        line.release()?;
        line.delay.delay_us(t.bit_recovery_us);
        Ok(())
    }

    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError> {
        let t = self.timing;
        let _cs = CriticalSection::enter(&mut self.irq);
        Ok(self.line.read_slot(t)?)
    }

    fn read_bit_pair(&mut self) -> OneWireResult<(bool, bool), Self::BusError> {
        let t = self.timing;
        let _cs = CriticalSection::enter(&mut self.irq);
        let id_bit = self.line.read_slot(t)?;
        let complement_bit = self.line.read_slot(t)?;
        Ok((id_bit, complement_bit))
    }

    fn get_overdrive_mode(&mut self) -> OneWireResult<bool, Self::BusError> {
        Ok(self.timing.overdrive)
    }

    fn set_overdrive_mode(&mut self, enable: bool) -> OneWireResult<(), Self::BusError> {
        if self.timing.overdrive != enable {
            log::debug!("onewire: overdrive timing {}", if enable { "on" } else { "off" });
        }
        self.timing = Timing::for_speed(enable);
        Ok(())
    }
}
