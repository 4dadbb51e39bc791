use crate::{Ds2431, Ds2431Result, error::InvalidMode};
use embedded_onewire::{
    ONEWIRE_MATCH_ROM_CMD, ONEWIRE_MATCH_ROM_CMD_OD, ONEWIRE_RESUME_CMD, ONEWIRE_SKIP_ROM_CMD,
    ONEWIRE_SKIP_ROM_CMD_OD, OneWire, OneWireError, OneWireResult, OneWireStatus,
};

/// How the device is selected before every memory function command.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Skip ROM: every device on the bus is addressed.
    #[default]
    SkipRom = 0x00,
    /// Overdrive-Skip ROM: every device is addressed and switched to overdrive.
    OverdriveSkipRom = 0x01,
    /// Match ROM: only the device with the configured ROM is addressed.
    MatchRom = 0x02,
    /// Overdrive-Match ROM: the configured ROM is sent at overdrive speed and
    /// the matching device switches to overdrive.
    OverdriveMatchRom = 0x03,
    /// Resume: re-addresses the device selected by the last successful match.
    ///
    /// Without a prior match every device still answers the reset but none
    /// is selected, so reads return `0xff` and writes fail verification.
    Resume = 0x04,
    /// Resume at overdrive speed. The device must already be in overdrive,
    /// see [`Ds2431::rom_match`].
    OverdriveResume = 0x05,
}

impl TryFrom<u8> for Mode {
    type Error = InvalidMode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use Mode::*;
        match value {
            0x00 => Ok(SkipRom),
            0x01 => Ok(OverdriveSkipRom),
            0x02 => Ok(MatchRom),
            0x03 => Ok(OverdriveMatchRom),
            0x04 => Ok(Resume),
            0x05 => Ok(OverdriveResume),
            _ => Err(InvalidMode(value)),
        }
    }
}

/// ROM match flavour used by [`Ds2431::rom_match`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Match ROM at standard speed.
    MatchRom = 0x00,
    /// Overdrive-Match ROM: leaves the matched device in overdrive.
    OverdriveMatchRom = 0x01,
}

/// Bus speeds and commands of one addressing mode.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Profile {
    /// Speed of the reset pulse and of the ROM command.
    reset_overdrive: bool,
    command: u8,
    send_rom: bool,
    /// Speed of the ROM bytes and everything after them.
    payload_overdrive: bool,
}

impl Mode {
    pub(crate) const fn profile(self) -> Profile {
        use Mode::*;
        let (reset_overdrive, command, send_rom, payload_overdrive) = match self {
            SkipRom => (false, ONEWIRE_SKIP_ROM_CMD, false, false),
            OverdriveSkipRom => (false, ONEWIRE_SKIP_ROM_CMD_OD, false, true),
            MatchRom => (false, ONEWIRE_MATCH_ROM_CMD, true, false),
            OverdriveMatchRom => (false, ONEWIRE_MATCH_ROM_CMD_OD, true, true),
            Resume => (false, ONEWIRE_RESUME_CMD, false, false),
            OverdriveResume => (true, ONEWIRE_RESUME_CMD, false, true),
        };
        Profile {
            reset_overdrive,
            command,
            send_rom,
            payload_overdrive,
        }
    }
}

/// Switch the master's slot timing, leaving it alone if it already matches.
pub(crate) fn set_speed<O: OneWire>(bus: &mut O, overdrive: bool) -> OneWireResult<(), O::BusError> {
    if bus.get_overdrive_mode()? != overdrive {
        bus.set_overdrive_mode(overdrive)?;
    }
    Ok(())
}

/// Reset the bus at the given speed and require a presence pulse.
pub(crate) fn reset<O: OneWire>(bus: &mut O, overdrive: bool) -> OneWireResult<(), O::BusError> {
    set_speed(bus, overdrive)?;
    let status = bus.reset()?;
    if status.shortcircuit() {
        return Err(OneWireError::ShortCircuit);
    }
    if !status.presence() {
        return Err(OneWireError::NoDevicePresent);
    }
    Ok(())
}

impl Ds2431 {
    /// Address the device according to the configured [`Mode`], leaving the
    /// master at the speed of the following function command.
    pub(crate) fn select<O: OneWire>(&self, bus: &mut O) -> Ds2431Result<(), O::BusError> {
        let profile = self.mode.profile();
        reset(bus, profile.reset_overdrive)
            .inspect_err(|_| log::warn!("ds2431: bus reset failed"))?;
        bus.write_byte(profile.command)
            .inspect_err(|_| log::warn!("ds2431: write command failed"))?;
        set_speed(bus, profile.payload_overdrive)
            .inspect_err(|_| log::warn!("ds2431: set speed failed"))?;
        if profile.send_rom {
            bus.write_bytes(&self.rom.to_le_bytes())
                .inspect_err(|_| log::warn!("ds2431: write rom failed"))?;
        }
        Ok(())
    }

    /// Select the device with `rom` and end with a reset, so that a following
    /// [`Mode::Resume`] or [`Mode::OverdriveResume`] transaction re-addresses it.
    ///
    /// With [`MatchKind::OverdriveMatchRom`] the ROM is sent at overdrive
    /// speed and the final reset is an overdrive reset, leaving both the
    /// device and the master in overdrive. This has to precede any
    /// [`Mode::OverdriveResume`] transaction; it is not checked by the driver.
    ///
    /// # Errors
    /// [`Ds2431Error::Bus`](crate::Ds2431Error::Bus) on a bus failure or if
    /// no device answers either reset.
    pub fn rom_match<O: OneWire>(
        bus: &mut O,
        kind: MatchKind,
        rom: u64,
    ) -> Ds2431Result<(), O::BusError> {
        let overdrive = kind == MatchKind::OverdriveMatchRom;
        let command = if overdrive {
            ONEWIRE_MATCH_ROM_CMD_OD
        } else {
            ONEWIRE_MATCH_ROM_CMD
        };
        reset(bus, false).inspect_err(|_| log::warn!("ds2431: bus reset failed"))?;
        bus.write_byte(command)
            .inspect_err(|_| log::warn!("ds2431: write command failed"))?;
        set_speed(bus, overdrive)
            .inspect_err(|_| log::warn!("ds2431: set speed failed"))?;
        bus.write_bytes(&rom.to_le_bytes())
            .inspect_err(|_| log::warn!("ds2431: write rom failed"))?;
        reset(bus, overdrive).inspect_err(|_| log::warn!("ds2431: bus reset failed"))?;
        Ok(())
    }
}
