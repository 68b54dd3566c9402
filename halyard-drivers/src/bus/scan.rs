//! Bus scan
//!
//! Probes each address with START + SLA+W and nothing else. A device that
//! acknowledges its address is recorded; either way a STOP follows and the
//! master pauses briefly before the next probe.

use core::ops::Range;

use embedded_hal::delay::DelayNs;
use halyard_hal::{I2cDirection, I2cEvent, I2cMasterRegs, TimeoutClock};
use heapless::Vec;

use super::master::I2cMaster;

/// Addresses visited by a scan
pub const SCAN_ADDRESSES: Range<u8> = 1..127;

/// Addresses that acknowledged, in ascending order
pub type ScanResult = Vec<u8, 127>;

impl<B, C, D> I2cMaster<B, C, D>
where
    B: I2cMasterRegs,
    C: TimeoutClock,
    D: DelayNs,
{
    /// Probe every address in [`SCAN_ADDRESSES`]
    ///
    /// Never fails: an address that does not answer within the probe
    /// budget is simply left out.
    pub fn scan_bus(&mut self) -> ScanResult {
        let mut found = ScanResult::new();

        for address in SCAN_ADDRESSES {
            if self.probe_address(address) {
                #[cfg(feature = "defmt")]
                defmt::debug!("I2C device at {=u8:#x}", address);
                let stored = found.push(address).is_ok();
                debug_assert!(stored, "scan result holds every address");
            }
            self.bus.generate_stop();
            self.delay.delay_ms(self.config.probe_delay_ms);
        }

        #[cfg(feature = "defmt")]
        defmt::info!("I2C scan found {} device(s)", found.len());

        found
    }

    /// Check whether a single address acknowledges
    pub fn probe(&mut self, address: u8) -> bool {
        let present = self.probe_address(address);
        self.bus.generate_stop();
        present
    }

    fn probe_address(&mut self, address: u8) -> bool {
        let budget = self.config.probe_timeout_ms;

        self.bus.generate_start();
        if self
            .wait_event(I2cEvent::MasterStartGenerated, budget)
            .is_err()
        {
            return false;
        }

        self.bus.send_address(address, I2cDirection::Transmit);
        self.wait_event(I2cEvent::MasterTransmitAddressMatched, budget)
            .is_ok()
    }
}
