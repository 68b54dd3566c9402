//! I2C bus abstractions
//!
//! Register-level primitives of an I2C master peripheral in the classic
//! SR1/SR2 style: software raises start/stop, writes address and data
//! bytes, and polls status flags or composite events to pace each phase.
//! The transaction sequencing lives in the drivers crate.

/// Direction bit of an address byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cDirection {
    /// Master writes to the slave (R/W bit = 0)
    Transmit,
    /// Master reads from the slave (R/W bit = 1)
    Receive,
}

/// Individual status flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cFlag {
    /// Data register holds a received byte
    RxNotEmpty,
    /// Bus busy (SDA or SCL held low)
    Busy,
}

/// Composite master-mode events
///
/// Each event is a combination of status flags that must all be set at
/// once; implementations read both status registers and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cEvent {
    /// Start generated, bus owned in master mode
    MasterStartGenerated,
    /// Slave acknowledged its address for a write
    MasterTransmitAddressMatched,
    /// Slave acknowledged its address for a read
    MasterReceiveAddressMatched,
    /// Data byte shifted out and acknowledged
    MasterDataTransmitComplete,
}

/// I2C master register primitives
///
/// None of these block; waiting is the caller's job.
pub trait I2cMasterRegs {
    /// Request a start (or repeated start) condition
    fn generate_start(&mut self);

    /// Request a stop condition
    fn generate_stop(&mut self);

    /// Send a 7-bit slave address with the direction bit
    fn send_address(&mut self, address: u8, direction: I2cDirection);

    /// Write one data byte
    fn send_data(&mut self, byte: u8);

    /// Read the received data byte
    fn receive_data(&mut self) -> u8;

    /// Sample a single status flag
    fn flag(&self, flag: I2cFlag) -> bool;

    /// Check whether a composite event is currently satisfied
    fn check_event(&self, event: I2cEvent) -> bool;

    /// Enable or disable acknowledgment of received bytes
    fn set_ack(&mut self, enabled: bool);
}

impl<B: I2cMasterRegs + ?Sized> I2cMasterRegs for &mut B {
    fn generate_start(&mut self) {
        (**self).generate_start();
    }

    fn generate_stop(&mut self) {
        (**self).generate_stop();
    }

    fn send_address(&mut self, address: u8, direction: I2cDirection) {
        (**self).send_address(address, direction);
    }

    fn send_data(&mut self, byte: u8) {
        (**self).send_data(byte);
    }

    fn receive_data(&mut self) -> u8 {
        (**self).receive_data()
    }

    fn flag(&self, flag: I2cFlag) -> bool {
        (**self).flag(flag)
    }

    fn check_event(&self, event: I2cEvent) -> bool {
        (**self).check_event(event)
    }

    fn set_ack(&mut self, enabled: bool) {
        (**self).set_ack(enabled);
    }
}

/// Highest valid 7-bit address
pub const MAX_ADDRESS: u8 = 0x7F;

/// Build the on-wire address byte: address in bits 7..1, R/W in bit 0
pub fn address_byte(address: u8, direction: I2cDirection) -> u8 {
    let rw = match direction {
        I2cDirection::Transmit => 0,
        I2cDirection::Receive => 1,
    };
    ((address & MAX_ADDRESS) << 1) | rw
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::FAST
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz), used for the display bus
    pub const FAST: Self = Self { frequency: 400_000 };

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self {
        frequency: 1_000_000,
    };
}
