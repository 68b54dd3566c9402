//! Serial peripheral drivers for Halyard nodes
//!
//! Built on the register-level traits in halyard-hal:
//!
//! - RS-485 half-duplex transport with an interrupt-fed receive buffer
//! - I2C bus master with bounded waits and address scan
//! - Display board wrapper (register map, control lines)
//! - Piezo buzzer tone generator

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bus;
pub mod display;
pub mod tone;
pub mod transport;

#[cfg(test)]
mod mock;
