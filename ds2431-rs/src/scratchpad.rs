use crate::{
    DS2431_AUTH_ES, DS2431_COPY_DONE, DS2431_COPY_SCRATCHPAD, DS2431_MEMORY_SIZE,
    DS2431_PAGE_SIZE, DS2431_PROGRAM_TIME_MS, DS2431_READ_SCRATCHPAD, DS2431_WRITE_SCRATCHPAD,
    Ds2431, Ds2431Error, Ds2431Result,
};
use bitfield_struct::bitfield;
use embedded_hal::delay::DelayNs;
use embedded_onewire::{OneWire, OneWireCrc16, OneWireResult};

/// Trailer the device sends once it has nothing left to say.
pub(crate) const IDLE_STATUS: u8 = 0xff;

#[bitfield(u8)]
#[derive(PartialEq, Eq)]
/// Ending offset and status register (E/S) reported by Read Scratchpad.
pub struct EndingStatus {
    /// E2:E0, offset within the page of the last byte written to the scratchpad.
    #[bits(3)]
    pub ending_offset: u8,
    #[bits(2)]
    __: u8,
    /// PF, set when the last write to the scratchpad ended with a partial byte.
    pub partial: bool,
    #[bits(1)]
    __: u8,
    /// AA, set once a Copy Scratchpad command has been accepted.
    pub authorization_accepted: bool,
}

/// Contents of the scratchpad as returned by [`Ds2431::read_scratchpad`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scratchpad {
    /// Target address (TA2:TA1) of the last Write Scratchpad.
    pub address: u16,
    /// Ending offset and status byte.
    pub status: EndingStatus,
    /// The 8 scratchpad bytes.
    pub data: [u8; 8],
    /// CRC-16 reported by the device, already un-inverted.
    pub crc: u16,
}

/// What the device sent back after a Write Scratchpad frame.
pub(crate) struct WriteEcho {
    /// Running CRC over the frame and the device's inverted CRC.
    pub crc: OneWireCrc16,
    /// The device's CRC, un-inverted.
    pub device_crc: u16,
    pub status: u8,
}

/// Send Write Scratchpad for one page to an already selected device.
pub(crate) fn write_frame<O: OneWire>(
    bus: &mut O,
    address: u16,
    data: &[u8; 8],
) -> OneWireResult<WriteEcho, O::BusError> {
    let [lo, hi] = address.to_le_bytes();
    let header = [DS2431_WRITE_SCRATCHPAD, lo, hi];
    let mut crc = OneWireCrc16::new();
    bus.write_bytes(&header)?;
    crc.update_all(&header);
    bus.write_bytes(data)?;
    crc.update_all(data);
    let mut echo = [0; 2];
    bus.read_bytes(&mut echo)?;
    crc.update_all(&echo);
    let status = bus.read_byte()?;
    Ok(WriteEcho {
        crc,
        device_crc: !u16::from_le_bytes(echo),
        status,
    })
}

/// Send Copy Scratchpad to an already selected device and return its answer
/// after the programming time.
pub(crate) fn copy_frame<O: OneWire, D: DelayNs>(
    bus: &mut O,
    delay: &mut D,
    address: u16,
) -> OneWireResult<u8, O::BusError> {
    let [lo, hi] = address.to_le_bytes();
    bus.write_bytes(&[DS2431_COPY_SCRATCHPAD, lo, hi, DS2431_AUTH_ES])?;
    delay.delay_ms(DS2431_PROGRAM_TIME_MS);
    bus.read_byte()
}

/// Scratchpad target addresses are page starts inside the memory array.
fn check_page_address<E>(address: u16) -> Ds2431Result<(), E> {
    if address >= DS2431_MEMORY_SIZE {
        log::warn!("ds2431: address >= 0x{DS2431_MEMORY_SIZE:04x}");
        return Err(Ds2431Error::AddressOutOfRange);
    }
    if address % DS2431_PAGE_SIZE as u16 != 0 {
        log::warn!("ds2431: address 0x{address:04x} is not page aligned");
        return Err(Ds2431Error::UnalignedAddress);
    }
    Ok(())
}

fn expect_status<E>(expected: u8, found: u8) -> Ds2431Result<(), E> {
    if found != expected {
        log::warn!("ds2431: response error, expected 0x{expected:02x}, got 0x{found:02x}");
        return Err(Ds2431Error::UnexpectedStatus { expected, found });
    }
    Ok(())
}

impl Ds2431 {
    /// Write one page of data to the scratchpad.
    ///
    /// The device echoes an inverted CRC-16 over the command, the address and
    /// the data; it is checked before returning.
    ///
    /// # Returns
    /// The CRC-16 computed by the device.
    ///
    /// # Errors
    /// - [`Ds2431Error::AddressOutOfRange`] if `address >= 0x80`,
    ///   [`Ds2431Error::UnalignedAddress`] if it is not a multiple of 8.
    ///   Both are reported before any bus activity.
    /// - [`Ds2431Error::UnexpectedStatus`] if the byte after the CRC is not `0xff`.
    /// - [`Ds2431Error::CrcMismatch`] if the CRC does not verify.
    /// - [`Ds2431Error::Bus`] on a bus failure.
    pub fn write_scratchpad<O: OneWire>(
        &self,
        bus: &mut O,
        address: u16,
        data: &[u8; 8],
    ) -> Ds2431Result<u16, O::BusError> {
        check_page_address(address)?;
        self.select(bus)?;
        let echo = write_frame(bus, address, data)
            .inspect_err(|_| log::warn!("ds2431: write scratchpad failed"))?;
        expect_status(IDLE_STATUS, echo.status)?;
        if !echo.crc.is_residue() {
            log::warn!("ds2431: crc16 check error");
            return Err(Ds2431Error::CrcMismatch);
        }
        Ok(echo.device_crc)
    }

    /// Read back the scratchpad, its target address and the E/S byte.
    ///
    /// The E/S byte must read `0x07`, i.e. a complete page written and no copy
    /// performed since.
    ///
    /// # Errors
    /// - [`Ds2431Error::UnexpectedStatus`] if E/S is not `0x07` or the byte
    ///   after the CRC is not `0xff`.
    /// - [`Ds2431Error::CrcMismatch`] if the CRC does not verify.
    /// - [`Ds2431Error::Bus`] on a bus failure.
    pub fn read_scratchpad<O: OneWire>(&self, bus: &mut O) -> Ds2431Result<Scratchpad, O::BusError> {
        self.select(bus)?;
        let mut crc = OneWireCrc16::new();
        bus.write_byte(DS2431_READ_SCRATCHPAD)
            .inspect_err(|_| log::warn!("ds2431: write command failed"))?;
        crc.update(DS2431_READ_SCRATCHPAD);
        let mut header = [0; 3];
        bus.read_bytes(&mut header)
            .inspect_err(|_| log::warn!("ds2431: read data failed"))?;
        crc.update_all(&header);
        expect_status(DS2431_AUTH_ES, header[2])?;
        let mut data = [0; 8];
        bus.read_bytes(&mut data)
            .inspect_err(|_| log::warn!("ds2431: read data failed"))?;
        crc.update_all(&data);
        let mut echo = [0; 2];
        bus.read_bytes(&mut echo)
            .inspect_err(|_| log::warn!("ds2431: read data failed"))?;
        crc.update_all(&echo);
        let trailer = bus
            .read_byte()
            .inspect_err(|_| log::warn!("ds2431: read data failed"))?;
        expect_status(IDLE_STATUS, trailer)?;
        if !crc.is_residue() {
            log::warn!("ds2431: crc16 check error");
            return Err(Ds2431Error::CrcMismatch);
        }
        Ok(Scratchpad {
            address: u16::from_le_bytes([header[0], header[1]]),
            status: EndingStatus::from_bits(header[2]),
            data,
            crc: !u16::from_le_bytes(echo),
        })
    }

    /// Commit the scratchpad to the page at `address`.
    ///
    /// Sends the authorization pattern (address and E/S `0x07`), waits the
    /// 10 ms programming time on `delay` and checks the `0xaa` confirmation.
    ///
    /// # Errors
    /// - [`Ds2431Error::AddressOutOfRange`] / [`Ds2431Error::UnalignedAddress`]
    ///   as for [`Ds2431::write_scratchpad`], before any bus activity.
    /// - [`Ds2431Error::UnexpectedStatus`] if the device does not confirm.
    /// - [`Ds2431Error::Bus`] on a bus failure.
    pub fn copy_scratchpad<O: OneWire, D: DelayNs>(
        &self,
        bus: &mut O,
        delay: &mut D,
        address: u16,
    ) -> Ds2431Result<(), O::BusError> {
        check_page_address(address)?;
        self.select(bus)?;
        let response = copy_frame(bus, delay, address)
            .inspect_err(|_| log::warn!("ds2431: copy scratchpad failed"))?;
        expect_status(DS2431_COPY_DONE, response)
    }
}
