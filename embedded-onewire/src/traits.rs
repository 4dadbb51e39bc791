use crate::{OneWireError, OneWireResult};

/// Outcome of a bus reset, as reported by the bus master.
pub trait OneWireStatus {
    /// Whether at least one device answered the reset with a presence pulse.
    fn presence(&self) -> bool;

    /// Whether the line was found shorted to ground during the reset.
    fn shortcircuit(&self) -> bool;
}

/// Trait for 1-Wire communication.
/// This trait defines the basic operations required for 1-Wire communication, such as resetting the bus,
/// writing and reading bytes, and writing and reading bits.
///
/// All operations are blocking: they return once the time slots on the wire are complete.
pub trait OneWire {
    /// The status type returned by the reset operation.
    /// This type must implement the [OneWireStatus] trait.
    type Status: OneWireStatus;
    /// The error type returned by the operations of this trait.
    /// This type is used to indicate errors in the underlying hardware or communication.
    type BusError;

    /// Resets the 1-Wire bus and returns the status of the bus.
    ///
    /// The reset pulse is generated with the timing of the current speed
    /// (see [`OneWire::set_overdrive_mode`]). A standard-speed reset returns
    /// every device on the bus to standard speed.
    ///
    /// # Returns
    /// A result containing the status of the bus after the reset operation.
    ///
    /// # Errors
    /// This method returns an error if the reset operation fails, or
    /// [`OneWireError::NoDevicePresent`] if no presence pulse was seen.
    fn reset(&mut self) -> OneWireResult<Self::Status, Self::BusError>;

    /// Writes a byte to the 1-Wire bus, least significant bit first.
    /// # Arguments
    /// * `byte` - The byte to write to the bus.
    ///
    /// # Errors
    /// This method returns an error if the write operation fails.
    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError>;

    /// Reads a byte from the 1-Wire bus, least significant bit first.
    /// # Returns
    /// Byte read from the bus.
    ///
    /// # Errors
    /// This method returns an error if the read operation fails.
    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError>;

    /// Writes a single bit to the 1-Wire bus.
    /// # Arguments
    ///
    /// * `bit` - The bit to write.
    ///
    /// # Errors
    /// This method returns an error if the write operation fails.
    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError>;

    /// Reads a single bit from the 1-Wire bus.
    /// # Returns
    /// The bit read from the bus.
    /// # Errors
    /// This method returns an error if the read operation fails.
    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError>;

    /// Reads two consecutive bits, as done for every ROM bit of a
    /// [search](https://www.analog.com/en/resources/app-notes/1wire-search-algorithm.html):
    /// the id bit followed by its complement.
    ///
    /// Masters that bit-bang the line should override this to keep both
    /// time slots inside a single critical section.
    ///
    /// # Returns
    /// A tuple `(id_bit, complement_bit)`.
    ///
    /// # Errors
    /// This method returns an error if either read fails.
    fn read_bit_pair(&mut self) -> OneWireResult<(bool, bool), Self::BusError> {
        let id_bit = self.read_bit()?;
        let complement_bit = self.read_bit()?;
        Ok((id_bit, complement_bit))
    }

    /// Writes a sequence of bytes.
    fn write_bytes(&mut self, bytes: &[u8]) -> OneWireResult<(), Self::BusError> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Fills `bytes` with bytes read from the bus.
    fn read_bytes(&mut self, bytes: &mut [u8]) -> OneWireResult<(), Self::BusError> {
        for byte in bytes.iter_mut() {
            *byte = self.read_byte()?;
        }
        Ok(())
    }

    /// Check if the 1-Wire bus is in overdrive mode.
    /// # Returns
    /// A result containing a boolean indicating whether the bus is in overdrive mode.
    fn get_overdrive_mode(&mut self) -> OneWireResult<bool, Self::BusError>;

    /// Select the time-slot timing used by subsequent operations.
    ///
    /// This only changes the master side. Devices enter overdrive through an
    /// Overdrive-Skip ROM or Overdrive-Match ROM command sent at standard
    /// speed, and leave it at the next standard-speed reset.
    /// # Arguments
    /// * `enable` - A boolean indicating whether to enable or disable overdrive mode.
    /// # Returns
    /// A result indicating the success or failure of the operation.
    fn set_overdrive_mode(&mut self, _enable: bool) -> OneWireResult<(), Self::BusError> {
        Err(OneWireError::Unimplemented)
    }
}
