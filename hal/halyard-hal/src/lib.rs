//! Halyard Hardware Abstraction Layer
//!
//! This crate defines the capability traits the Halyard drivers are built
//! on. Each trait exposes the raw, register-level primitives one protocol
//! needs and nothing more; a board crate maps them onto its peripheral
//! access crate.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Control loop (board firmware)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  halyard-drivers (RS-485, I2C, buzzer)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  halyard-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  Board binding (registers, clocks, pins)│
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Direction-control and auxiliary output lines
//! - [`clock::TimeoutClock`] - Millisecond tick source for bounded waits
//! - [`uart::HalfDuplexUart`], [`uart::UartRxIrq`] - Serial transmit/receive primitives
//! - [`i2c::I2cMasterRegs`] - Two-wire bus master primitives
//! - [`pwm::PwmChannel`] - Tone timer channel

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod i2c;
pub mod pwm;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use clock::{TickCounter, TimeoutClock};
pub use gpio::OutputPin;
pub use i2c::{I2cDirection, I2cEvent, I2cFlag, I2cMasterRegs};
pub use pwm::PwmChannel;
pub use uart::{HalfDuplexUart, UartRxIrq};
