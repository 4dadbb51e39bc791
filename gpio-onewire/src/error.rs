#[derive(Debug, PartialEq, Eq)]
/// Errors of the bit-banged bus master.
pub enum GpioError<E> {
    /// The pin reported a failure while driving or sampling the line.
    Pin(E),
    /// The line did not return high after being released; missing pull-up or short to ground.
    LineStuckLow,
}

impl<E> From<E> for GpioError<E> {
    fn from(value: E) -> Self {
        Self::Pin(value)
    }
}
