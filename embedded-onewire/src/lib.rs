#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
//! # embedded-onewire
//! A no-std implementation of the 1-Wire protocol.
//!
//! This crate provides a trait-based interface for 1-Wire communication, allowing you to implement the protocol on various platforms.
//! [OneWire] trait defines the basic operations required for 1-Wire communication, such as resetting the bus, writing and reading bytes, and writing and reading bits.
//! Bus masters (a bit-banged GPIO line, an I2C bridge, ...) implement [OneWire]; device drivers are written against it.
//!
//! The crate also provides a search algorithm for discovering devices on the 1-Wire bus, implemented in the [OneWireSearch] struct,
//! and the two checksums used on the bus: the ROM CRC-8 ([OneWireCrc]) and the CRC-16 guarding memory transfers ([OneWireCrc16]).

pub mod consts;
mod error;
mod search;
mod traits;
mod utils;
pub use consts::*;
pub use error::OneWireError;
pub use search::{OneWireSearch, OneWireSearchKind};
pub use traits::{OneWire, OneWireStatus};
pub use utils::{OneWireCrc, OneWireCrc16};

/// Error type for 1-Wire operations.
pub type OneWireResult<T, E> = Result<T, OneWireError<E>>;
