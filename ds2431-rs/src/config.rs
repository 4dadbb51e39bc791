use crate::{DS2431_CONFIG_ADDRESS, Ds2431, Ds2431Result};
use embedded_hal::delay::DelayNs;
use embedded_onewire::OneWire;

/// Protection setting of a memory page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protection {
    /// The page is read-only.
    WriteProtected,
    /// Bits can only be changed from 1 to 0.
    EpromMode,
    /// Any other control byte value: the page is freely writable.
    Unprotected(u8),
}

impl Protection {
    /// Control byte selecting write protection.
    pub const WRITE_PROTECT: u8 = 0x55;
    /// Control byte selecting EPROM mode.
    pub const EPROM_MODE: u8 = 0xaa;
}

impl From<u8> for Protection {
    fn from(value: u8) -> Self {
        match value {
            Self::WRITE_PROTECT => Protection::WriteProtected,
            Self::EPROM_MODE => Protection::EpromMode,
            other => Protection::Unprotected(other),
        }
    }
}

impl From<Protection> for u8 {
    fn from(value: Protection) -> Self {
        match value {
            Protection::WriteProtected => Protection::WRITE_PROTECT,
            Protection::EpromMode => Protection::EPROM_MODE,
            Protection::Unprotected(raw) => raw,
        }
    }
}

/// The memory control page at `0x80..0x88`.
///
/// Fields hold the raw register bytes so a read configuration can be written
/// back unchanged. Protection settings take effect when written and some of
/// them cannot be undone.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Protection control bytes of pages 0 to 3.
    pub page_controls: [u8; 4],
    /// Copy protection control.
    pub copy_protection: u8,
    /// Factory byte.
    pub factory_byte: u8,
    /// First user byte.
    pub user_byte_0: u8,
    /// Second user byte.
    pub user_byte_1: u8,
}

impl MemoryConfig {
    /// Decode the 8 bytes read from the control page.
    pub const fn from_bytes(bytes: [u8; 8]) -> Self {
        Self {
            page_controls: [bytes[0], bytes[1], bytes[2], bytes[3]],
            copy_protection: bytes[4],
            factory_byte: bytes[5],
            user_byte_0: bytes[6],
            user_byte_1: bytes[7],
        }
    }

    /// The 8 bytes as laid out in the control page.
    pub const fn to_bytes(&self) -> [u8; 8] {
        [
            self.page_controls[0],
            self.page_controls[1],
            self.page_controls[2],
            self.page_controls[3],
            self.copy_protection,
            self.factory_byte,
            self.user_byte_0,
            self.user_byte_1,
        ]
    }

    /// Protection of `page` (0 to 3), `None` for other page numbers.
    pub fn page_protection(&self, page: u8) -> Option<Protection> {
        self.page_controls
            .get(page as usize)
            .map(|&control| control.into())
    }

    /// Set the protection of `page` (0 to 3). Returns `false` for other page numbers.
    pub fn set_page_protection(&mut self, page: u8, protection: Protection) -> bool {
        match self.page_controls.get_mut(page as usize) {
            Some(control) => {
                *control = protection.into();
                true
            }
            None => false,
        }
    }
}

impl Ds2431 {
    /// Read the memory control page.
    ///
    /// # Errors
    /// [`Ds2431Error::Bus`](crate::Ds2431Error::Bus) on a bus failure.
    pub fn read_memory_config<O: OneWire>(
        &self,
        bus: &mut O,
    ) -> Ds2431Result<MemoryConfig, O::BusError> {
        let mut bytes = [0; 8];
        self.read_raw(bus, DS2431_CONFIG_ADDRESS, &mut bytes)?;
        Ok(MemoryConfig::from_bytes(bytes))
    }

    /// Write the memory control page.
    ///
    /// # Errors
    /// - [`Ds2431Error::WriteFailed`](crate::Ds2431Error::WriteFailed) if the
    ///   device did not confirm the write.
    /// - [`Ds2431Error::Bus`](crate::Ds2431Error::Bus) on a bus failure.
    pub fn write_memory_config<O: OneWire, D: DelayNs>(
        &self,
        bus: &mut O,
        delay: &mut D,
        config: &MemoryConfig,
    ) -> Ds2431Result<(), O::BusError> {
        self.write_page(bus, delay, DS2431_CONFIG_ADDRESS, &config.to_bytes())
    }
}
