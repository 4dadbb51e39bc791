use bitfield_struct::bitfield;
use embedded_onewire::OneWireStatus;

#[bitfield(u8)]
/// Outcome of a successful bus reset.
///
/// A line held low before the reset pulse is reported as
/// [`OneWireError::ShortCircuit`](embedded_onewire::OneWireError::ShortCircuit)
/// instead of a status, so [`OneWireStatus::shortcircuit`] is always `false`.
pub struct BusStatus {
    /// A device pulled the line low after the reset pulse and released it again
    /// within the polling budget.
    pub presence_detect: bool,
    /// The reset was issued with overdrive timing.
    pub overdrive: bool,
    #[bits(6)]
    __: u8,
}

impl OneWireStatus for BusStatus {
    fn presence(&self) -> bool {
        self.presence_detect()
    }

    fn shortcircuit(&self) -> bool {
        false
    }
}
