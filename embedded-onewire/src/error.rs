use core::fmt;

/// Failure of a 1-Wire bus operation.
///
/// `E` is the transport error of the bus master, for example a GPIO pin
/// error or an I2C error of a bridge chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneWireError<E> {
    /// The bus master itself failed.
    Other(E),
    /// No presence pulse followed the reset pulse.
    NoDevicePresent,
    /// The line is held low.
    ShortCircuit,
    /// The operation is only defined at standard speed, but the bus is in
    /// overdrive.
    ///
    /// [`OneWireSearch`](crate::OneWireSearch) reports this.
    BusInvalidSpeed,
    /// The bus master does not support the operation, e.g. switching to
    /// overdrive.
    Unimplemented,
    /// The CRC-8 of a ROM did not check out.
    InvalidRomCrc,
}

impl<E> From<E> for OneWireError<E> {
    fn from(other: E) -> Self {
        Self::Other(other)
    }
}

impl<E: fmt::Debug> fmt::Display for OneWireError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(e) => write!(f, "bus master error: {e:?}"),
            Self::NoDevicePresent => f.write_str("no device present"),
            Self::ShortCircuit => f.write_str("bus short circuit"),
            Self::BusInvalidSpeed => f.write_str("operation not allowed in overdrive"),
            Self::Unimplemented => f.write_str("not supported by the bus master"),
            Self::InvalidRomCrc => f.write_str("invalid ROM CRC"),
        }
    }
}
