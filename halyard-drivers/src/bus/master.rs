//! Transaction engine
//!
//! Write: START, SLA+W, REG, DATA..., STOP
//!
//! Read:  START, SLA+W, REG, START, SLA+R, DATA..., with ACK on for every
//! byte but the last. Before the last byte is sampled ACK is disabled and
//! STOP requested, so the slave sees a NACK on it. ACK is switched back on
//! after every read, whether it succeeded or not.

use embedded_hal::delay::DelayNs;
use halyard_hal::{I2cDirection, I2cEvent, I2cFlag, I2cMasterRegs, TimeoutClock};

use super::{BusConfig, BusError, Phase};

/// I2C master over raw register primitives
pub struct I2cMaster<B, C, D> {
    pub(super) bus: B,
    pub(super) clock: C,
    pub(super) delay: D,
    pub(super) config: BusConfig,
}

impl<B, C, D> I2cMaster<B, C, D>
where
    B: I2cMasterRegs,
    C: TimeoutClock,
    D: DelayNs,
{
    /// Create a bus master
    ///
    /// The peripheral must already be enabled in master mode with 7-bit
    /// addressing (see [`halyard_hal::i2c::I2cConfig::FAST`]).
    pub fn new(bus: B, clock: C, delay: D, config: BusConfig) -> Self {
        Self {
            bus,
            clock,
            delay,
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Access the underlying peripheral
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Give back the peripheral, clock and delay
    pub fn release(self) -> (B, C, D) {
        (self.bus, self.clock, self.delay)
    }

    /// Busy-wait on the master's delay provider
    pub fn pause_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Write one register
    pub fn write_byte(&mut self, address: u8, reg: u8, value: u8) -> Result<(), BusError> {
        self.write_buffer(address, reg, &[value])
    }

    /// Write consecutive registers starting at `reg`
    ///
    /// The register pointer is sent once; the device is expected to
    /// auto-increment. An empty `data` only sets the pointer.
    pub fn write_buffer(&mut self, address: u8, reg: u8, data: &[u8]) -> Result<(), BusError> {
        let result = self.write_sequence(address, reg, data);
        result.map_err(|phase| self.abort(address, phase))
    }

    /// Read one register
    pub fn read_byte(&mut self, address: u8, reg: u8) -> Result<u8, BusError> {
        let mut value = [0u8; 1];
        self.read_buffer(address, reg, &mut value)?;
        Ok(value[0])
    }

    /// Read consecutive registers starting at `reg` into `buf`
    ///
    /// An empty `buf` succeeds without touching the bus.
    pub fn read_buffer(&mut self, address: u8, reg: u8, buf: &mut [u8]) -> Result<(), BusError> {
        if buf.is_empty() {
            return Ok(());
        }

        let result = self
            .read_sequence(address, reg, buf)
            .map_err(|phase| self.abort(address, phase));
        self.bus.set_ack(true);
        result
    }

    fn write_sequence(&mut self, address: u8, reg: u8, data: &[u8]) -> Result<(), Phase> {
        let budget = self.config.timeout_ms;
        self.select_register(address, reg, budget)?;

        for &byte in data {
            self.bus.send_data(byte);
            self.wait_event(I2cEvent::MasterDataTransmitComplete, budget)
                .map_err(|_| Phase::DataByte)?;
        }

        self.bus.generate_stop();
        Ok(())
    }

    fn read_sequence(&mut self, address: u8, reg: u8, buf: &mut [u8]) -> Result<(), Phase> {
        let budget = self.config.timeout_ms;
        self.select_register(address, reg, budget)?;

        self.bus.generate_start();
        self.wait_event(I2cEvent::MasterStartGenerated, budget)
            .map_err(|_| Phase::RepeatedStart)?;

        self.bus.send_address(address, I2cDirection::Receive);
        self.wait_event(I2cEvent::MasterReceiveAddressMatched, budget)
            .map_err(|_| Phase::AddressRead)?;

        let last = buf.len() - 1;
        if last > 0 {
            // ACK state left by earlier traffic is not trusted
            self.bus.set_ack(true);
        }
        for (i, slot) in buf.iter_mut().enumerate() {
            let phase = if i == last {
                // NACK the last byte and release the bus behind it
                self.bus.set_ack(false);
                self.bus.generate_stop();
                Phase::FinalByte
            } else {
                Phase::ReceiveByte
            };

            self.wait_flag(I2cFlag::RxNotEmpty, true, budget)
                .map_err(|_| phase)?;
            *slot = self.bus.receive_data();
        }

        Ok(())
    }

    /// START, SLA+W, register pointer
    fn select_register(&mut self, address: u8, reg: u8, budget: u32) -> Result<(), Phase> {
        self.bus.generate_start();
        self.wait_event(I2cEvent::MasterStartGenerated, budget)
            .map_err(|_| Phase::Start)?;

        self.bus.send_address(address, I2cDirection::Transmit);
        self.wait_event(I2cEvent::MasterTransmitAddressMatched, budget)
            .map_err(|_| Phase::AddressWrite)?;

        self.bus.send_data(reg);
        self.wait_event(I2cEvent::MasterDataTransmitComplete, budget)
            .map_err(|_| Phase::RegisterAddress)
    }

    fn abort(&mut self, address: u8, phase: Phase) -> BusError {
        #[cfg(feature = "defmt")]
        defmt::warn!("I2C timeout in {} (slave {=u8:#x})", phase, address);
        #[cfg(not(feature = "defmt"))]
        let _ = address;

        if self.config.stop_on_abort && phase.owes_stop() {
            self.bus.generate_stop();
        }
        BusError::Timeout
    }

    /// Poll a status flag until it reads `expected` or `budget_ms` elapses
    pub(super) fn wait_flag(
        &self,
        flag: I2cFlag,
        expected: bool,
        budget_ms: u32,
    ) -> Result<(), BusError> {
        let start = self.clock.now_ms();
        while self.bus.flag(flag) != expected {
            if self.clock.elapsed_since(start) > budget_ms {
                return Err(BusError::Timeout);
            }
        }
        Ok(())
    }

    /// Poll a composite event until it is satisfied or `budget_ms` elapses
    pub(super) fn wait_event(&self, event: I2cEvent, budget_ms: u32) -> Result<(), BusError> {
        let start = self.clock.now_ms();
        while !self.bus.check_event(event) {
            if self.clock.elapsed_since(start) > budget_ms {
                return Err(BusError::Timeout);
            }
        }
        Ok(())
    }
}
