const CRC8_POLY: u8 = 0x8c;
const CRC16_POLY: u16 = 0xa001;

#[cfg(feature = "crc-table")]
static CRC8_TABLE: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = crc8_bitwise(0, i as u8);
        i += 1;
    }
    table
};

#[cfg(feature = "crc-table")]
static CRC16_TABLE: [u16; 256] = {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = crc16_bitwise(0, i as u8);
        i += 1;
    }
    table
};

const fn crc8_bitwise(crc: u8, byte: u8) -> u8 {
    let mut crc = crc ^ byte; // XOR the byte with the current CRC value
    let mut i = 0;
    while i < 8 {
        if crc & 0x1 == 0x1 {
            crc = (crc >> 1) ^ CRC8_POLY; // Polynomial for CRC-8
        } else {
            crc >>= 1;
        }
        i += 1;
    }
    crc
}

const fn crc16_bitwise(crc: u16, byte: u8) -> u16 {
    let mut crc = crc ^ byte as u16;
    let mut i = 0;
    while i < 8 {
        if crc & 0x1 == 0x1 {
            crc = (crc >> 1) ^ CRC16_POLY;
        } else {
            crc >>= 1;
        }
        i += 1;
    }
    crc
}

#[derive(Debug, Default)]
/// Calculate CRC-8 used in 1-Wire communications.
pub struct OneWireCrc(u8);

impl OneWireCrc {
    /// Get the current CRC value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Update the CRC with the incoming byte.
    pub fn update(&mut self, byte: u8) {
        #[cfg(feature = "crc-table")]
        {
            self.0 = CRC8_TABLE[(self.0 ^ byte) as usize];
        }
        #[cfg(not(feature = "crc-table"))]
        {
            self.0 = crc8_bitwise(self.0, byte);
        }
    }

    /// Compute the CRC-8 of a sequence of bytes.
    pub fn compute(sequence: &[u8]) -> u8 {
        let mut crc = OneWireCrc(0);
        for &byte in sequence.iter() {
            crc.update(byte);
        }
        crc.0
    }

    /// Valudate a sequence of bytes where the last byte is the 1-Wire CRC of
    /// the previous bytes.
    pub fn validate(sequence: &[u8]) -> bool {
        Self::compute(sequence) == 0x0 // If the last byte of the ROM is the CRC, the result should be 0
    }
}

/// Calculate the CRC-16 (CRC-16/ARC, reflected polynomial `0xa001`, initial value 0)
/// that 1-Wire memory devices use to protect command, address and data transfers.
///
/// Devices transmit the CRC inverted, least significant byte first. Running the
/// received bytes through the accumulator after the protected data therefore
/// leaves the fixed residue [`OneWireCrc16::RESIDUE`] when the transfer is intact.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OneWireCrc16(u16);

impl OneWireCrc16 {
    /// Value of the accumulator after a correct, inverted CRC has been fed in.
    pub const RESIDUE: u16 = 0xb001;

    /// Create an accumulator starting from zero.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Get the current CRC value
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Update the CRC with the incoming byte.
    pub fn update(&mut self, byte: u8) {
        #[cfg(feature = "crc-table")]
        {
            self.0 = (self.0 >> 8) ^ CRC16_TABLE[((self.0 ^ byte as u16) & 0xff) as usize];
        }
        #[cfg(not(feature = "crc-table"))]
        {
            self.0 = crc16_bitwise(self.0, byte);
        }
    }

    /// Update the CRC with every byte of `bytes`.
    pub fn update_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.update(byte);
        }
    }

    /// Whether the accumulator holds [`OneWireCrc16::RESIDUE`].
    pub fn is_residue(&self) -> bool {
        self.0 == Self::RESIDUE
    }
}
