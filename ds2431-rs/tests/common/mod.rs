#![allow(dead_code)]

//! A simulated 1-Wire bus populated with DS2431 devices.
//!
//! Every byte is moved as eight time slots. Each slot is offered to every
//! device that listens at the master's current speed, and read slots are the
//! wired-AND of what the devices drive, so collisions and search behave as
//! on a real line.

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use embedded_onewire::{OneWire, OneWireCrc, OneWireCrc16, OneWireError, OneWireResult, OneWireStatus};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Memory array plus control page and reserved bytes.
pub const MEMORY_SIZE: usize = 0x90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimError;

#[derive(Debug, Clone, Copy)]
pub struct SimStatus {
    presence: bool,
}

impl OneWireStatus for SimStatus {
    fn presence(&self) -> bool {
        self.presence
    }

    fn shortcircuit(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    /// Waiting for a ROM command.
    Idle,
    /// Not addressed; ignores everything until the next reset.
    Deselected,
    MatchRom { received: Vec<u8>, overdrive: bool },
    /// `phase` 0 sends the ROM bit, 1 its complement, 2 waits for the direction.
    Search { bit: u32, phase: u8 },
    /// Waiting for a memory function command.
    Function,
    WriteScratchpad { received: Vec<u8> },
    CopyScratchpad { received: Vec<u8> },
    ReadMemoryAddress { received: Vec<u8> },
    ReadMemory { address: usize },
    /// Sending queued bits, then idle high.
    Talking,
}

/// One virtual DS2431.
pub struct Ds2431Sim {
    pub rom: u64,
    pub memory: [u8; MEMORY_SIZE],
    pub scratchpad: [u8; 8],
    pub target: u16,
    pub es: u8,
    pub overdrive: bool,
    /// RC flag, set by a successful match or search.
    pub resume: bool,
    /// Flip a bit of every CRC the device sends.
    pub corrupt_crc: bool,
    /// Completed Copy Scratchpad commands.
    pub copies: usize,
    /// Read Memory commands received.
    pub memory_reads: usize,
    state: State,
    shift: u8,
    bits: u8,
    out: VecDeque<bool>,
}

impl Ds2431Sim {
    pub fn new(rom: u64, rng: &mut StdRng) -> Self {
        let mut memory = [0xff; MEMORY_SIZE];
        rng.fill(&mut memory[..0x80]);
        memory[0x80..0x88].fill(0);
        Self {
            rom,
            memory,
            scratchpad: [0xff; 8],
            target: 0,
            es: 0,
            overdrive: false,
            resume: false,
            corrupt_crc: false,
            copies: 0,
            memory_reads: 0,
            state: State::Idle,
            shift: 0,
            bits: 0,
            out: VecDeque::new(),
        }
    }

    fn listens_overdrive(&self) -> bool {
        match self.state {
            State::MatchRom { overdrive: true, .. } => true,
            _ => self.overdrive,
        }
    }

    fn queue_byte(&mut self, byte: u8) {
        for i in 0..8 {
            self.out.push_back((byte >> i) & 0x1 == 0x1);
        }
    }

    fn queue_crc(&mut self, crc: OneWireCrc16) {
        let mut echo = (!crc.value()).to_le_bytes();
        if self.corrupt_crc {
            echo[0] ^= 0x01;
        }
        self.queue_byte(echo[0]);
        self.queue_byte(echo[1]);
    }

    /// Returns whether the device answers with a presence pulse.
    fn on_reset(&mut self, overdrive_pulse: bool) -> bool {
        if overdrive_pulse && !self.overdrive {
            // too short to be seen as a reset at standard speed
            return false;
        }
        if !overdrive_pulse {
            self.overdrive = false;
        }
        self.state = State::Idle;
        self.shift = 0;
        self.bits = 0;
        self.out.clear();
        true
    }

    fn write_slot(&mut self, bit: bool, overdrive: bool) {
        if overdrive != self.listens_overdrive() {
            return;
        }
        match &mut self.state {
            State::Search { bit: n, phase } => {
                if *phase != 2 {
                    return;
                }
                if ((self.rom >> *n) & 0x1 == 0x1) != bit {
                    self.state = State::Deselected;
                } else if *n == 63 {
                    self.resume = true;
                    self.state = State::Function;
                } else {
                    *n += 1;
                    *phase = 0;
                }
            }
            State::Deselected | State::Talking | State::ReadMemory { .. } => {}
            _ => {
                self.shift = (self.shift >> 1) | ((bit as u8) << 7);
                self.bits += 1;
                if self.bits == 8 {
                    self.bits = 0;
                    self.on_byte(self.shift);
                }
            }
        }
    }

    fn read_slot(&mut self, overdrive: bool) -> bool {
        if overdrive != self.listens_overdrive() {
            return true;
        }
        if let State::Search { bit, phase } = &mut self.state {
            let id = (self.rom >> *bit) & 0x1 == 0x1;
            return match *phase {
                0 => {
                    *phase = 1;
                    id
                }
                1 => {
                    *phase = 2;
                    !id
                }
                _ => true,
            };
        }
        if self.out.is_empty() {
            if let State::ReadMemory { address } = &mut self.state {
                if *address < MEMORY_SIZE {
                    let byte = self.memory[*address];
                    *address += 1;
                    self.queue_byte(byte);
                }
            }
        }
        self.out.pop_front().unwrap_or(true)
    }

    fn on_byte(&mut self, byte: u8) {
        let state = std::mem::replace(&mut self.state, State::Deselected);
        self.state = match state {
            State::Idle => self.rom_command(byte),
            State::MatchRom {
                mut received,
                overdrive,
            } => {
                received.push(byte);
                if received.len() < 8 {
                    State::MatchRom {
                        received,
                        overdrive,
                    }
                } else if received == self.rom.to_le_bytes() {
                    self.resume = true;
                    self.overdrive |= overdrive;
                    State::Function
                } else {
                    self.resume = false;
                    State::Deselected
                }
            }
            State::Function => self.function_command(byte),
            State::WriteScratchpad { mut received } => {
                received.push(byte);
                if received.len() < 10 {
                    State::WriteScratchpad { received }
                } else {
                    self.finish_write(&received);
                    State::Talking
                }
            }
            State::CopyScratchpad { mut received } => {
                received.push(byte);
                if received.len() < 3 {
                    State::CopyScratchpad { received }
                } else {
                    self.finish_copy(&received);
                    State::Talking
                }
            }
            State::ReadMemoryAddress { mut received } => {
                received.push(byte);
                if received.len() < 2 {
                    State::ReadMemoryAddress { received }
                } else {
                    self.memory_reads += 1;
                    State::ReadMemory {
                        address: u16::from_le_bytes([received[0], received[1]]) as usize,
                    }
                }
            }
            other => other,
        };
    }

    fn rom_command(&mut self, command: u8) -> State {
        match command {
            0x33 => {
                self.resume = false;
                for byte in self.rom.to_le_bytes() {
                    self.queue_byte(byte);
                }
                State::Talking
            }
            0xcc => {
                self.resume = false;
                State::Function
            }
            0x3c => {
                self.resume = false;
                self.overdrive = true;
                State::Function
            }
            0x55 => State::MatchRom {
                received: Vec::new(),
                overdrive: false,
            },
            0x69 => State::MatchRom {
                received: Vec::new(),
                overdrive: true,
            },
            0xa5 if self.resume => State::Function,
            0xf0 => State::Search { bit: 0, phase: 0 },
            _ => State::Deselected,
        }
    }

    fn function_command(&mut self, command: u8) -> State {
        match command {
            0x0f => State::WriteScratchpad {
                received: Vec::new(),
            },
            0xaa => {
                let [lo, hi] = self.target.to_le_bytes();
                let mut frame = vec![0xaa, lo, hi, self.es];
                frame.extend_from_slice(&self.scratchpad);
                let mut crc = OneWireCrc16::new();
                crc.update_all(&frame);
                for &byte in &frame[1..] {
                    self.queue_byte(byte);
                }
                self.queue_crc(crc);
                State::Talking
            }
            0x55 => State::CopyScratchpad {
                received: Vec::new(),
            },
            0xf0 => State::ReadMemoryAddress {
                received: Vec::new(),
            },
            _ => State::Deselected,
        }
    }

    fn finish_write(&mut self, received: &[u8]) {
        self.target = u16::from_le_bytes([received[0], received[1]]);
        self.scratchpad.copy_from_slice(&received[2..10]);
        self.es = 0x07;
        let mut crc = OneWireCrc16::new();
        crc.update(0x0f);
        crc.update_all(received);
        self.queue_crc(crc);
    }

    fn finish_copy(&mut self, received: &[u8]) {
        let [lo, hi] = self.target.to_le_bytes();
        if received != [lo, hi, self.es] {
            return;
        }
        let base = (self.target & !0x7) as usize;
        if base + 8 <= MEMORY_SIZE {
            self.memory[base..base + 8].copy_from_slice(&self.scratchpad);
        }
        self.es |= 0x80;
        self.copies += 1;
        for _ in 0..4 {
            self.queue_byte(0xaa);
        }
    }
}

/// The bus master side of the simulation.
pub struct SimBus {
    pub devices: Vec<Ds2431Sim>,
    overdrive: bool,
    ops: usize,
    /// Fail the n-th bus operation (1-based) with [`SimError`].
    pub fail_at: Option<usize>,
}

impl SimBus {
    pub fn new(devices: Vec<Ds2431Sim>) -> Self {
        Self {
            devices,
            overdrive: false,
            ops: 0,
            fail_at: None,
        }
    }

    /// A bus with `count` devices with random ROMs and memory.
    pub fn populated(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let devices = random_roms(count, &mut rng)
            .into_iter()
            .map(|rom| Ds2431Sim::new(rom, &mut rng))
            .collect();
        Self::new(devices)
    }

    /// Resets, bytes and bits moved so far.
    pub fn ops(&self) -> usize {
        self.ops
    }

    pub fn device(&self, rom: u64) -> &Ds2431Sim {
        self.devices
            .iter()
            .find(|d| d.rom == rom)
            .expect("no such device")
    }

    fn tick(&mut self) -> OneWireResult<(), SimError> {
        self.ops += 1;
        if self.fail_at == Some(self.ops) {
            return Err(OneWireError::Other(SimError));
        }
        Ok(())
    }

    fn write_slot(&mut self, bit: bool) {
        let overdrive = self.overdrive;
        for device in self.devices.iter_mut() {
            device.write_slot(bit, overdrive);
        }
    }

    fn read_slot(&mut self) -> bool {
        let overdrive = self.overdrive;
        let mut level = true;
        for device in self.devices.iter_mut() {
            level &= device.read_slot(overdrive);
        }
        level
    }
}

impl OneWire for SimBus {
    type Status = SimStatus;
    type BusError = SimError;

    fn reset(&mut self) -> OneWireResult<SimStatus, SimError> {
        self.tick()?;
        let overdrive = self.overdrive;
        let mut presence = false;
        for device in self.devices.iter_mut() {
            presence |= device.on_reset(overdrive);
        }
        Ok(SimStatus { presence })
    }

    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), SimError> {
        self.tick()?;
        for i in 0..8 {
            self.write_slot((byte >> i) & 0x1 == 0x1);
        }
        Ok(())
    }

    fn read_byte(&mut self) -> OneWireResult<u8, SimError> {
        self.tick()?;
        let mut byte = 0;
        for i in 0..8 {
            byte |= (self.read_slot() as u8) << i;
        }
        Ok(byte)
    }

    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), SimError> {
        self.tick()?;
        self.write_slot(bit);
        Ok(())
    }

    fn read_bit(&mut self) -> OneWireResult<bool, SimError> {
        self.tick()?;
        Ok(self.read_slot())
    }

    fn get_overdrive_mode(&mut self) -> OneWireResult<bool, SimError> {
        Ok(self.overdrive)
    }

    fn set_overdrive_mode(&mut self, enable: bool) -> OneWireResult<(), SimError> {
        self.overdrive = enable;
        Ok(())
    }
}

/// Sums every delay, in nanoseconds.
#[derive(Default)]
pub struct TotalDelay(pub u64);

impl DelayNs for TotalDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0 += ns as u64;
    }
}

/// Distinct DS2431 ROMs with valid CRC-8.
pub fn random_roms(count: usize, rng: &mut StdRng) -> Vec<u64> {
    let mut roms: Vec<u64> = Vec::with_capacity(count);
    while roms.len() < count {
        let mut bytes = [0u8; 8];
        bytes[0] = 0x2d;
        rng.fill(&mut bytes[1..7]);
        bytes[7] = OneWireCrc::compute(&bytes[..7]);
        let rom = u64::from_le_bytes(bytes);
        if !roms.contains(&rom) {
            roms.push(rom);
        }
    }
    roms
}
