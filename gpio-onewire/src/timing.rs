/// Time-slot durations for one bus speed, in microseconds.
///
/// A write-byte slot always starts with the master pulling the line low;
/// a short low phase encodes a 1 and a long one encodes a 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Whether this is the overdrive profile.
    pub overdrive: bool,
    /// Length of the reset pulse.
    pub reset_low_us: u32,
    /// Wait after releasing the reset pulse before sampling for presence.
    pub reset_release_us: u32,
    /// Number of 1 µs polls waiting for a device to pull the line low.
    pub presence_low_polls: u16,
    /// Number of 1 µs polls waiting for the presence pulse to end.
    pub presence_high_polls: u16,
    /// Low phase of a write-1 slot.
    pub write_one_low_us: u32,
    /// High phase of a write-1 slot.
    pub write_one_high_us: u32,
    /// Low phase of a write-0 slot.
    pub write_zero_low_us: u32,
    /// High phase of a write-0 slot.
    pub write_zero_high_us: u32,
    /// Low phase opening a read slot.
    pub read_low_us: u32,
    /// Wait after release before sampling a read slot.
    pub read_sample_us: u32,
    /// Remainder of a read slot after sampling.
    pub read_recovery_us: u32,
    /// Low phase opening a single-bit write slot.
    pub bit_low_us: u32,
    /// Time the bit value is held on the line.
    pub bit_hold_us: u32,
    /// Recovery after a single-bit write slot.
    pub bit_recovery_us: u32,
}

impl Timing {
    /// Standard speed.
    pub const STANDARD: Timing = Timing {
        overdrive: false,
        reset_low_us: 550,
        reset_release_us: 15,
        presence_low_polls: 200,
        presence_high_polls: 240,
        write_one_low_us: 2,
        write_one_high_us: 65,
        write_zero_low_us: 65,
        write_zero_high_us: 2,
        read_low_us: 2,
        read_sample_us: 12,
        read_recovery_us: 50,
        bit_low_us: 12,
        bit_hold_us: 30,
        bit_recovery_us: 5,
    };

    /// Overdrive speed.
    pub const OVERDRIVE: Timing = Timing {
        overdrive: true,
        reset_low_us: 70,
        reset_release_us: 2,
        presence_low_polls: 20,
        presence_high_polls: 20,
        write_one_low_us: 1,
        write_one_high_us: 10,
        write_zero_low_us: 10,
        write_zero_high_us: 2,
        read_low_us: 1,
        read_sample_us: 0,
        read_recovery_us: 10,
        bit_low_us: 1,
        bit_hold_us: 8,
        bit_recovery_us: 2,
    };

    /// Profile for the requested speed.
    pub const fn for_speed(overdrive: bool) -> &'static Timing {
        if overdrive {
            &Self::OVERDRIVE
        } else {
            &Self::STANDARD
        }
    }
}
