use crate::{
    DS2431_COPY_DONE, DS2431_MEMORY_SIZE, DS2431_PAGE_SIZE, DS2431_READ_MEMORY, Ds2431,
    Ds2431Error, Ds2431Result,
    scratchpad::{IDLE_STATUS, copy_frame, write_frame},
};
use embedded_hal::delay::DelayNs;
use embedded_onewire::OneWire;

/// Reject ranges that run past the end of the memory array.
fn check_range<E>(address: u16, len: usize) -> Ds2431Result<(), E> {
    if address as usize + len > DS2431_MEMORY_SIZE as usize {
        log::warn!("ds2431: address and len are invalid");
        return Err(Ds2431Error::AddressOutOfRange);
    }
    Ok(())
}

impl Ds2431 {
    /// Read Memory from `address`, streaming `buf.len()` bytes.
    pub(crate) fn read_raw<O: OneWire>(
        &self,
        bus: &mut O,
        address: u16,
        buf: &mut [u8],
    ) -> Ds2431Result<(), O::BusError> {
        self.select(bus)?;
        let [lo, hi] = address.to_le_bytes();
        bus.write_bytes(&[DS2431_READ_MEMORY, lo, hi])
            .inspect_err(|_| log::warn!("ds2431: write command failed"))?;
        bus.read_bytes(buf)
            .inspect_err(|_| log::warn!("ds2431: read data failed"))?;
        Ok(())
    }

    /// Program one page: Write Scratchpad, check the echo, then Copy Scratchpad.
    ///
    /// Any verification failure is reported as [`Ds2431Error::WriteFailed`].
    pub(crate) fn write_page<O: OneWire, D: DelayNs>(
        &self,
        bus: &mut O,
        delay: &mut D,
        address: u16,
        data: &[u8; 8],
    ) -> Ds2431Result<(), O::BusError> {
        self.select(bus)?;
        let echo = write_frame(bus, address, data)
            .inspect_err(|_| log::warn!("ds2431: write scratchpad failed"))?;
        if echo.status != IDLE_STATUS {
            log::warn!("ds2431: response error");
            return Err(Ds2431Error::WriteFailed);
        }
        if !echo.crc.is_residue() {
            log::warn!("ds2431: crc16 check error");
            return Err(Ds2431Error::WriteFailed);
        }
        self.select(bus)?;
        let response = copy_frame(bus, delay, address)
            .inspect_err(|_| log::warn!("ds2431: copy scratchpad failed"))?;
        if response != DS2431_COPY_DONE {
            log::warn!("ds2431: copy not confirmed, got 0x{response:02x}");
            return Err(Ds2431Error::WriteFailed);
        }
        Ok(())
    }

    /// Read `buf.len()` bytes starting at `address`.
    ///
    /// # Errors
    /// - [`Ds2431Error::AddressOutOfRange`] if the range ends past `0x80`,
    ///   before any bus activity.
    /// - [`Ds2431Error::Bus`] on a bus failure.
    pub fn read<O: OneWire>(
        &self,
        bus: &mut O,
        address: u8,
        buf: &mut [u8],
    ) -> Ds2431Result<(), O::BusError> {
        check_range(address as u16, buf.len())?;
        self.read_raw(bus, address as u16, buf)
    }

    /// Write `data` starting at `address`.
    ///
    /// The range is programmed page by page. Pages only partly covered by
    /// `data` are read first so the bytes outside the range keep their value.
    /// Each page takes the 10 ms programming time on `delay`.
    ///
    /// # Errors
    /// - [`Ds2431Error::AddressOutOfRange`] if the range ends past `0x80`,
    ///   before any bus activity.
    /// - [`Ds2431Error::WriteFailed`] if a page was not confirmed. Pages before
    ///   it have been written.
    /// - [`Ds2431Error::Bus`] on a bus failure.
    pub fn write<O: OneWire, D: DelayNs>(
        &self,
        bus: &mut O,
        delay: &mut D,
        address: u8,
        data: &[u8],
    ) -> Ds2431Result<(), O::BusError> {
        check_range(address as u16, data.len())?;
        let mut address = address as u16;
        let mut data = data;
        while !data.is_empty() {
            let offset = address as usize % DS2431_PAGE_SIZE;
            let page = address - offset as u16;
            let len = (DS2431_PAGE_SIZE - offset).min(data.len());
            let mut buf = [0; DS2431_PAGE_SIZE];
            if len != DS2431_PAGE_SIZE {
                self.read_raw(bus, page, &mut buf)?;
            }
            buf[offset..offset + len].copy_from_slice(&data[..len]);
            self.write_page(bus, delay, page, &buf)?;
            address += len as u16;
            data = &data[len..];
        }
        Ok(())
    }

    /// Read `buf.len()` bytes of memory starting at a 16-bit `address`.
    ///
    /// # Errors
    /// - [`Ds2431Error::AddressOutOfRange`] if the range ends past `0x80`,
    ///   before any bus activity.
    /// - [`Ds2431Error::Bus`] on a bus failure.
    pub fn read_memory<O: OneWire>(
        &self,
        bus: &mut O,
        address: u16,
        buf: &mut [u8],
    ) -> Ds2431Result<(), O::BusError> {
        check_range(address, buf.len())?;
        self.read_raw(bus, address, buf)
    }
}
