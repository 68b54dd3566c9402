//! Auxiliary display board
//!
//! The display board sits on the I2C bus at a fixed address and exposes a
//! small register map. Two GPIO control lines run alongside the bus.

use embedded_hal::delay::DelayNs;
use halyard_hal::{I2cMasterRegs, OutputPin, TimeoutClock};

use crate::bus::{BusError, I2cMaster, ScanResult};

/// Common display module addresses
pub mod address {
    /// SSD1306/SH1106-class OLED
    pub const OLED: u8 = 0x3C;
    /// HD44780 LCD behind a PCF8574 backpack
    pub const LCD: u8 = 0x27;
    /// HT16K33 LED matrix
    pub const LED_MATRIX: u8 = 0x70;
}

/// Display board registers
pub mod reg {
    /// Control register
    pub const CTRL: u8 = 0x00;
    /// Data register
    pub const DATA: u8 = 0x01;
    /// Status register
    pub const STATUS: u8 = 0x02;
    /// Configuration register
    pub const CONFIG: u8 = 0x03;
}

/// Address the board answers on unless told otherwise
pub const DISPLAY_ADDRESS: u8 = address::OLED;

/// Time the board needs after power-up before it answers (ms)
pub const STARTUP_DELAY_MS: u32 = 100;

/// Control lines between the node and the display board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlLine {
    Ctrl1,
    Ctrl2,
}

impl ControlLine {
    fn index(self) -> usize {
        match self {
            ControlLine::Ctrl1 => 0,
            ControlLine::Ctrl2 => 1,
        }
    }
}

/// Display board on the I2C bus
pub struct DisplayBoard<B, C, D, P> {
    master: I2cMaster<B, C, D>,
    address: u8,
    ctrl: [P; 2],
}

impl<B, C, D, P> DisplayBoard<B, C, D, P>
where
    B: I2cMasterRegs,
    C: TimeoutClock,
    D: DelayNs,
    P: OutputPin,
{
    /// Create a board handle at [`DISPLAY_ADDRESS`]
    pub fn new(master: I2cMaster<B, C, D>, ctrl1: P, ctrl2: P) -> Self {
        Self::with_address(master, DISPLAY_ADDRESS, ctrl1, ctrl2)
    }

    /// Create a board handle at a custom address
    pub fn with_address(master: I2cMaster<B, C, D>, address: u8, ctrl1: P, ctrl2: P) -> Self {
        Self {
            master,
            address,
            ctrl: [ctrl1, ctrl2],
        }
    }

    /// Drive both control lines low and wait for the board to come up
    pub fn init(&mut self) {
        for line in self.ctrl.iter_mut() {
            line.set_low();
        }
        self.master.pause_ms(STARTUP_DELAY_MS);
    }

    /// Board address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Bus master, for other devices sharing the bus
    pub fn master(&mut self) -> &mut I2cMaster<B, C, D> {
        &mut self.master
    }

    /// Write one board register
    pub fn send_data(&mut self, reg: u8, value: u8) -> Result<(), BusError> {
        self.master.write_byte(self.address, reg, value)
    }

    /// Read one board register
    pub fn read_data(&mut self, reg: u8) -> Result<u8, BusError> {
        self.master.read_byte(self.address, reg)
    }

    /// Write consecutive board registers
    pub fn send_buffer(&mut self, reg: u8, data: &[u8]) -> Result<(), BusError> {
        self.master.write_buffer(self.address, reg, data)
    }

    /// Read consecutive board registers
    pub fn read_buffer_data(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), BusError> {
        self.master.read_buffer(self.address, reg, buf)
    }

    /// Set a control line level
    pub fn set_ctrl(&mut self, line: ControlLine, high: bool) {
        self.ctrl[line.index()].set_state(high);
    }

    /// Read back a control line level
    pub fn ctrl(&self, line: ControlLine) -> bool {
        self.ctrl[line.index()].is_set_high()
    }

    /// Flip a control line
    pub fn toggle_ctrl(&mut self, line: ControlLine) {
        self.ctrl[line.index()].toggle();
    }

    /// Scan the whole bus
    pub fn scan(&mut self) -> ScanResult {
        self.master.scan_bus()
    }
}
