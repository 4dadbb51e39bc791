#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

/*! # DS2431
 *
 * Driver for the Maxim Integrated DS2431, a 1024-bit 1-Wire EEPROM
 * organized as four 32-byte pages (sixteen 8-byte rows) plus an 8-byte
 * control page at `0x80`.
 *
 * The driver works with any bus master implementing
 * [`OneWire`](embedded_onewire::OneWire). [`Ds2431`] holds how the device
 * is addressed; the bus, and a [`DelayNs`](embedded_hal::delay::DelayNs)
 * for operations that program the EEPROM, are passed to every call.
 *
 * ```ignore
 * let eeprom = Ds2431::new().with_mode(Mode::MatchRom).with_rom(rom);
 * eeprom.write(&mut bus, &mut delay, 0x10, b"hello")?;
 * let mut buf = [0; 5];
 * eeprom.read(&mut bus, 0x10, &mut buf)?;
 * ```
 */

pub use embedded_onewire::{OneWire, OneWireError, OneWireResult};
use embedded_onewire::{
    ONEWIRE_READ_ROM_CMD, OneWireCrc, OneWireSearch, OneWireSearchKind, OneWireStatus,
};

mod addressing;
mod config;
mod error;
mod info;
mod memory;
mod scratchpad;

pub use addressing::{MatchKind, Mode};
pub use config::{MemoryConfig, Protection};
pub use error::{Ds2431Error, InvalidMode};
pub use info::{DeviceInfo, info};
pub use scratchpad::{EndingStatus, Scratchpad};

/// Results of DS2431-specific function calls.
pub type Ds2431Result<T, E> = Result<T, Ds2431Error<E>>;

/// Largest number of ROMs [`Ds2431::search_rom`] collects in one call.
pub const SEARCH_MAX: usize = 64;

/// Addressing configuration of one DS2431.
///
/// The value is cheap to copy and holds no bus resources, so several devices
/// on the same bus are handled by keeping one `Ds2431` per device.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Ds2431 {
    mode: Mode,
    rom: u64,
}

impl Ds2431 {
    /// Family code of the DS2431.
    #[inline]
    pub const fn family() -> u8 {
        0x2d
    }

    /// Skip ROM addressing, ROM unset.
    pub const fn new() -> Self {
        Self {
            mode: Mode::SkipRom,
            rom: 0,
        }
    }

    /// Set the addressing mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the ROM used by [`Mode::MatchRom`] and [`Mode::OverdriveMatchRom`].
    pub fn with_rom(mut self, rom: u64) -> Self {
        self.rom = rom;
        self
    }

    /// Set the addressing mode.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// The addressing mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Set the target ROM.
    pub fn set_rom(&mut self, rom: u64) {
        self.rom = rom;
    }

    /// The target ROM.
    pub fn rom(&self) -> u64 {
        self.rom
    }

    /// Issue a standard-speed reset and report whether any device answered.
    ///
    /// # Errors
    /// [`Ds2431Error::Bus`] on a bus failure or a shorted line.
    pub fn probe<O: OneWire>(bus: &mut O) -> Ds2431Result<bool, O::BusError> {
        addressing::set_speed(bus, false)
            .inspect_err(|_| log::warn!("ds2431: set speed failed"))?;
        match bus.reset() {
            Ok(status) if status.shortcircuit() => {
                log::warn!("ds2431: bus short circuit");
                Err(Ds2431Error::Bus(OneWireError::ShortCircuit))
            }
            Ok(status) => Ok(status.presence()),
            Err(OneWireError::NoDevicePresent) => Ok(false),
            Err(e) => {
                log::warn!("ds2431: bus reset failed");
                Err(e.into())
            }
        }
    }

    /// Read the ROM of the only device on the bus.
    ///
    /// # Errors
    /// - [`OneWireError::InvalidRomCrc`] (as [`Ds2431Error::Bus`]) if the CRC-8
    ///   does not match, which is also what several devices answering at once
    ///   look like.
    /// - [`Ds2431Error::Bus`] on a bus failure or if no device is present.
    pub fn read_rom<O: OneWire>(bus: &mut O) -> Ds2431Result<u64, O::BusError> {
        addressing::reset(bus, false).inspect_err(|_| log::warn!("ds2431: bus reset failed"))?;
        bus.write_byte(ONEWIRE_READ_ROM_CMD)
            .inspect_err(|_| log::warn!("ds2431: write command failed"))?;
        let mut rom = [0; 8];
        bus.read_bytes(&mut rom)
            .inspect_err(|_| log::warn!("ds2431: read rom failed"))?;
        if !OneWireCrc::validate(&rom) {
            log::warn!("ds2431: rom crc check error");
            return Err(Ds2431Error::Bus(OneWireError::InvalidRomCrc));
        }
        Ok(u64::from_le_bytes(rom))
    }

    /// Enumerate the devices on the bus into `roms`.
    ///
    /// The search runs at standard speed and stops once every device has been
    /// found or `roms` is full.
    ///
    /// # Returns
    /// The number of ROMs written to the front of `roms`.
    ///
    /// # Errors
    /// - [`Ds2431Error::SearchCapacity`] if `roms` is longer than [`SEARCH_MAX`].
    /// - [`Ds2431Error::Bus`] on a bus failure or if no device is present.
    pub fn search_rom<O: OneWire>(bus: &mut O, roms: &mut [u64]) -> Ds2431Result<usize, O::BusError> {
        if roms.len() > SEARCH_MAX {
            log::warn!("ds2431: search capacity {} is over {SEARCH_MAX}", roms.len());
            return Err(Ds2431Error::SearchCapacity(roms.len()));
        }
        if roms.is_empty() {
            return Ok(0);
        }
        addressing::set_speed(bus, false)
            .inspect_err(|_| log::warn!("ds2431: set speed failed"))?;
        let mut search = OneWireSearch::new(bus, OneWireSearchKind::Normal);
        let mut found = 0;
        while found < roms.len() {
            match search
                .next()
                .inspect_err(|_| log::warn!("ds2431: search rom failed"))?
            {
                Some(rom) => {
                    roms[found] = rom;
                    found += 1;
                }
                None => break,
            }
        }
        log::debug!("ds2431: search found {found} devices");
        Ok(found)
    }
}

pub(crate) const DS2431_WRITE_SCRATCHPAD: u8 = 0x0f;
pub(crate) const DS2431_READ_SCRATCHPAD: u8 = 0xaa;
pub(crate) const DS2431_COPY_SCRATCHPAD: u8 = 0x55;
pub(crate) const DS2431_READ_MEMORY: u8 = 0xf0;
/// E/S byte of a fully written page, also the copy authorization byte.
pub(crate) const DS2431_AUTH_ES: u8 = 0x07;
/// Answer to a successful Copy Scratchpad.
pub(crate) const DS2431_COPY_DONE: u8 = 0xaa;
pub(crate) const DS2431_PROGRAM_TIME_MS: u32 = 10;
pub(crate) const DS2431_MEMORY_SIZE: u16 = 0x80;
pub(crate) const DS2431_CONFIG_ADDRESS: u16 = 0x80;
pub(crate) const DS2431_PAGE_SIZE: usize = 8;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        let dev = Ds2431::new()
            .with_mode(Mode::OverdriveMatchRom)
            .with_rom(0xef00_0000_1234_562d);
        assert_eq!(dev.mode(), Mode::OverdriveMatchRom);
        assert_eq!(dev.rom() as u8, Ds2431::family());
        assert_eq!(Ds2431::default(), Ds2431::new());
    }

    #[test]
    fn setters() {
        let mut dev = Ds2431::new();
        dev.set_mode(Mode::try_from(4).unwrap());
        dev.set_rom(42);
        assert_eq!(dev.mode(), Mode::Resume);
        assert_eq!(dev.rom(), 42);
    }

    #[test]
    fn invalid_mode_converts() {
        fn parse(raw: u8) -> Ds2431Result<Mode, ()> {
            Ok(Mode::try_from(raw)?)
        }
        assert_eq!(parse(9), Err(Ds2431Error::InvalidMode(9)));
        assert_eq!(parse(1), Ok(Mode::OverdriveSkipRom));
    }

    #[test]
    fn device_info() {
        let info = info();
        assert_eq!(info.chip_name, "Maxim Integrated DS2431");
        assert_eq!(info.interface, "GPIO");
        assert_eq!(info.driver_version, 1000);
        assert!(info.supply_voltage_min_v < info.supply_voltage_max_v);
    }
}
