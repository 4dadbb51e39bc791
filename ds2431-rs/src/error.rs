use embedded_onewire::OneWireError;

/// Errors of the DS2431 driver.
#[derive(Debug, PartialEq, Eq)]
pub enum Ds2431Error<E> {
    /// The bus master failed, or no device answered the reset.
    Bus(OneWireError<E>),
    /// Address (plus length) does not fit the 128-byte memory array.
    AddressOutOfRange,
    /// Scratchpad address is not a multiple of 8.
    UnalignedAddress,
    /// The CRC-16 sent by the device does not match the transferred bytes.
    CrcMismatch,
    /// The device answered with an unexpected status byte.
    UnexpectedStatus {
        /// Status byte the protocol requires.
        expected: u8,
        /// Status byte read from the bus.
        found: u8,
    },
    /// A page write was not confirmed by the device.
    WriteFailed,
    /// Raw value does not name an addressing mode.
    InvalidMode(u8),
    /// Search capacity above [`SEARCH_MAX`](crate::SEARCH_MAX).
    SearchCapacity(usize),
}

impl<E> From<OneWireError<E>> for Ds2431Error<E> {
    fn from(value: OneWireError<E>) -> Self {
        Ds2431Error::Bus(value)
    }
}

/// A raw byte that is not a valid [`Mode`](crate::Mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMode(pub u8);

impl<E> From<InvalidMode> for Ds2431Error<E> {
    fn from(value: InvalidMode) -> Self {
        Ds2431Error::InvalidMode(value.0)
    }
}
