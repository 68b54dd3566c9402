//! Host-side stand-ins for the peripheral capabilities

use core::cell::Cell;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use halyard_hal::{I2cDirection, I2cEvent, I2cFlag, I2cMasterRegs, OutputPin, TimeoutClock};

/// Clock that moves forward by `step` ms every time it is read
///
/// Polling loops therefore see time pass without a real timer.
pub struct MockClock {
    now: Cell<u32>,
    step: u32,
}

impl MockClock {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(ms: u32) -> Self {
        Self {
            now: Cell::new(ms),
            step: 1,
        }
    }

    /// Peek without advancing
    pub fn now(&self) -> u32 {
        self.now.get()
    }
}

impl TimeoutClock for MockClock {
    fn now_ms(&self) -> u32 {
        let t = self.now.get();
        self.now.set(t.wrapping_add(self.step));
        t
    }
}

/// Delay that only records what it was asked for
#[derive(Default)]
pub struct MockDelay {
    calls_ns: Vec<u32>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls_us(&self) -> Vec<u32> {
        self.calls_ns.iter().map(|ns| ns / 1_000).collect()
    }

    pub fn calls_ms(&self) -> Vec<u32> {
        self.calls_ns.iter().map(|ns| ns / 1_000_000).collect()
    }

    pub fn total_ms(&self) -> u64 {
        self.calls_ns.iter().map(|&ns| ns as u64).sum::<u64>() / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls_ns.push(ns);
    }
}

/// Output latch
#[derive(Default)]
pub struct MockPin {
    pub high: bool,
    pub writes: u32,
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.high = true;
        self.writes += 1;
    }

    fn set_low(&mut self) {
        self.high = false;
        self.writes += 1;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// One bus primitive as issued by the master
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    Start,
    Stop,
    Address(u8, I2cDirection),
    Write(u8),
    /// Byte read, with the ACK setting in force when it was sampled
    Read { value: u8, ack: bool },
    Ack(bool),
}

/// Where the simulated slave is in the current transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlaveState {
    Idle,
    Started,
    AwaitRegister,
    Writing,
    Reading,
    Nacked,
}

/// I2C master register block with register-file slaves behind it
///
/// Every slave keeps 256 registers and auto-increments its pointer, so
/// what is written to a register reads back unchanged. Faults are
/// injected by naming an event or flag that never becomes true.
pub struct MockI2c {
    pub ops: Vec<BusOp>,
    devices: Vec<(u8, [u8; 256])>,
    active: Option<usize>,
    pointer: u8,
    state: SlaveState,
    data_pending: bool,
    ack: bool,
    pub stuck_event: Option<I2cEvent>,
    pub stuck_rx: bool,
}

impl MockI2c {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            devices: Vec::new(),
            active: None,
            pointer: 0,
            state: SlaveState::Idle,
            data_pending: false,
            ack: true,
            stuck_event: None,
            stuck_rx: false,
        }
    }

    pub fn with_devices(addresses: &[u8]) -> Self {
        let mut bus = Self::new();
        for &address in addresses {
            bus.devices.push((address, [0; 256]));
        }
        bus
    }

    pub fn register(&self, address: u8, reg: u8) -> Option<u8> {
        self.devices
            .iter()
            .find(|(a, _)| *a == address)
            .map(|(_, regs)| regs[reg as usize])
    }

    pub fn ack_enabled(&self) -> bool {
        self.ack
    }

    pub fn count(&self, op: BusOp) -> usize {
        self.ops.iter().filter(|o| **o == op).count()
    }

    fn device(&mut self) -> Option<&mut [u8; 256]> {
        let index = self.active?;
        Some(&mut self.devices[index].1)
    }

    fn stuck(&self, event: I2cEvent) -> bool {
        self.stuck_event == Some(event)
    }
}

impl I2cMasterRegs for MockI2c {
    fn generate_start(&mut self) {
        self.ops.push(BusOp::Start);
        self.state = SlaveState::Started;
    }

    fn generate_stop(&mut self) {
        self.ops.push(BusOp::Stop);
        // A stop requested mid-read lands after the byte in flight
        if self.state == SlaveState::Reading {
            self.data_pending = true;
        } else {
            self.active = None;
        }
        self.state = SlaveState::Idle;
    }

    fn send_address(&mut self, address: u8, direction: I2cDirection) {
        self.ops.push(BusOp::Address(address, direction));
        self.active = self.devices.iter().position(|(a, _)| *a == address);
        self.state = match (self.active, direction) {
            (None, _) => SlaveState::Nacked,
            (Some(_), I2cDirection::Transmit) => SlaveState::AwaitRegister,
            (Some(_), I2cDirection::Receive) => SlaveState::Reading,
        };
        self.data_pending = false;
    }

    fn send_data(&mut self, byte: u8) {
        self.ops.push(BusOp::Write(byte));
        match self.state {
            SlaveState::AwaitRegister => {
                self.pointer = byte;
                self.state = SlaveState::Writing;
            }
            SlaveState::Writing => {
                let pointer = self.pointer;
                if let Some(regs) = self.device() {
                    regs[pointer as usize] = byte;
                }
                self.pointer = pointer.wrapping_add(1);
            }
            _ => {}
        }
    }

    fn receive_data(&mut self) -> u8 {
        let pointer = self.pointer;
        let value = self.device().map(|regs| regs[pointer as usize]).unwrap_or(0xFF);
        self.pointer = pointer.wrapping_add(1);
        self.data_pending = false;
        if self.state == SlaveState::Idle {
            self.active = None;
        }
        let ack = self.ack;
        self.ops.push(BusOp::Read { value, ack });
        value
    }

    fn flag(&self, flag: I2cFlag) -> bool {
        match flag {
            I2cFlag::RxNotEmpty => {
                !self.stuck_rx
                    && (self.state == SlaveState::Reading
                        || (self.state == SlaveState::Idle && self.data_pending))
            }
            I2cFlag::Busy => self.state != SlaveState::Idle,
        }
    }

    fn check_event(&self, event: I2cEvent) -> bool {
        if self.stuck(event) {
            return false;
        }
        match event {
            I2cEvent::MasterStartGenerated => self.state == SlaveState::Started,
            I2cEvent::MasterTransmitAddressMatched => self.state == SlaveState::AwaitRegister,
            I2cEvent::MasterReceiveAddressMatched => self.state == SlaveState::Reading,
            I2cEvent::MasterDataTransmitComplete => self.state == SlaveState::Writing,
        }
    }

    fn set_ack(&mut self, enabled: bool) {
        self.ops.push(BusOp::Ack(enabled));
        self.ack = enabled;
    }
}
