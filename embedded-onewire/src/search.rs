use crate::{
    ONEWIRE_CONDITIONAL_SEARCH_CMD, ONEWIRE_SEARCH_CMD, OneWire, OneWireStatus,
    error::OneWireError,
};

/// Number of ROM bits walked per search pass.
const ROM_BITS: u8 = 64;

/// A structure for searching devices on a 1-Wire bus.
/// This structure implements the search algorithm for discovering devices on the 1-Wire bus.
/// It maintains the state of the search.
///
/// Discrepancies (bit positions where devices disagreed) are kept on a stack
/// keyed by their 1-based position. The top of the stack is the branch to
/// flip on the next pass: positions below it replay the previous pass,
/// the top itself takes the 1-branch and is popped, and any new discrepancy
/// past it takes the 0-branch and is pushed. The search ends once a pass
/// leaves the stack empty.
pub struct OneWireSearch<'a, T> {
    onewire: &'a mut T,
    cmd: u8,
    finished: bool,
    // discrepancies[0] is a sentinel 0; discrepancies[depth] is the top
    discrepancies: [u8; ROM_BITS as usize + 1],
    depth: usize,
    rom: [u8; 8],
}

#[repr(u8)]
/// Type of search performed using [`OneWireSearch`].
pub enum OneWireSearchKind {
    /// Normal search
    Normal = ONEWIRE_SEARCH_CMD,
    /// Search only for devicess with alarm
    Alarmed = ONEWIRE_CONDITIONAL_SEARCH_CMD,
}

impl<'a, T> OneWireSearch<'a, T> {
    /// Creates a new [`OneWireSearch`] instance.
    ///
    /// # Arguments
    /// * `onewire` - A mutable reference to a type that implements the `OneWire` trait.
    /// * `cmd` - The command to use for the search operation (e.g., `0xf0` for normal search, `0xec` for search in alarm state).
    pub fn new(onewire: &'a mut T, cmd: OneWireSearchKind) -> Self {
        Self {
            onewire,
            cmd: cmd as _,
            finished: false,
            discrepancies: [0; ROM_BITS as usize + 1],
            depth: 0,
            rom: [0; 8],
        }
    }

    /// Position of the discrepancy that the next pass will flip, 0 if none is left.
    fn last_discrepancy(&self) -> u8 {
        self.discrepancies[self.depth]
    }
}

impl<T: OneWire> OneWireSearch<'_, T> {
    /// Searches for devices on the 1-Wire bus.
    /// This method implements the [1-Wire search algorithm](https://www.analog.com/en/resources/app-notes/1wire-search-algorithm.html) to discover devices connected to the bus.
    /// The [next](OneWireSearch::next) method can be called repeatedly to find all devices on the bus.
    /// At the end of the search, calling this method will return `None` to indicate that no more devices are present.
    /// A pass in which no device answers a bit position (both bits read back as 1)
    /// also ends the search with `None`; devices found before that stay valid.
    ///
    /// The ROMs are returned as read; their CRC-8 is not checked here
    /// (see [`OneWireCrc::validate`](crate::OneWireCrc::validate)).
    ///
    /// # Returns
    /// A result containing the ROM code of the found device as a `u64` value.
    ///
    /// | Bit | Description |
    /// |-----|-------------|
    /// | 0-7 | Family code (e.g., 0x2d for DS2431) |
    /// | 8-15 | Serial number (first byte) |
    /// | 16-23 | Serial number (second byte) |
    /// | 24-31 | Serial number (third byte) |
    /// | 32-39 | Serial number (fourth byte) |
    /// | 40-47 | Serial number (fifth byte) |
    /// | 48-55 | Serial number (sixth byte) |
    /// | 56-63 | CRC-8 (`0b1_0001_1001` poly) |
    ///
    /// # Errors
    /// Any bus failure aborts the search. [`OneWireError::BusInvalidSpeed`] is
    /// returned if the master is in overdrive mode.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<u64>, OneWireError<T::BusError>> {
        if self.onewire.get_overdrive_mode()? {
            return Err(OneWireError::BusInvalidSpeed);
        }
        if self.finished {
            return Ok(None); // If the last device was found, return None
        }
        let status = self.onewire.reset()?;
        if !status.presence() {
            return Err(OneWireError::NoDevicePresent);
        }
        if status.shortcircuit() {
            return Err(OneWireError::ShortCircuit);
        }
        self.onewire.write_byte(self.cmd)?; // Search ROM command
        for position in 1..=ROM_BITS {
            let idx = ((position - 1) / 8) as usize; // Index in the ROM array
            let rom_mask = 1u8 << ((position - 1) % 8); // Mask for the current bit in the ROM byte
            let (id_bit, complement_bit) = self.onewire.read_bit_pair()?;
            let set = match (id_bit, complement_bit) {
                // All remaining devices have the false bit set
                (false, true) => false,
                // All remaining devices have the true bit set
                (true, false) => true,
                // Discrepancy, multiple values reported
                (false, false) => {
                    let last = self.last_discrepancy();
                    if position > last {
                        // new branch: take 0 now, come back for 1 later
                        self.depth += 1;
                        self.discrepancies[self.depth] = position;
                        false
                    } else if position < last {
                        // replay the branch taken on the previous pass
                        self.rom[idx] & rom_mask > 0
                    } else {
                        self.depth -= 1;
                        true
                    }
                }
                (true, true) => {
                    // No device answered this slot; stop with what was found
                    self.finished = true;
                    return Ok(None);
                }
            };
            if set {
                self.rom[idx] |= rom_mask; // Set the bit in the ROM
            } else {
                self.rom[idx] &= !rom_mask; // Clear the bit in the ROM
            }
            self.onewire.write_bit(set)?; // Deselect devices that disagree
        }
        self.finished = self.last_discrepancy() == 0;
        Ok(Some(u64::from_le_bytes(self.rom)))
    }
}
