//! I2C bus master
//!
//! Register-level I2C master sequencing for single-register and
//! auto-increment buffer transfers, plus address discovery:
//!
//! - [`I2cMaster`]: write/read transactions and bus scan
//! - [`BusConfig`]: timeout budgets and abort policy
//!
//! Every phase transition waits on a flag or event under a millisecond
//! budget measured with the timeout clock. A wait that runs out aborts the
//! transaction with [`BusError::Timeout`]; nothing is retried.

mod master;
mod scan;

pub use master::I2cMaster;
pub use scan::{ScanResult, SCAN_ADDRESSES};

/// Bus master errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// A flag or event did not appear within the budget
    Timeout,
}

/// Bus master configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Budget for every wait inside a transaction (ms)
    pub timeout_ms: u32,
    /// Budget for each wait while probing an address during a scan (ms)
    pub probe_timeout_ms: u32,
    /// Pause between scan probes (ms)
    pub probe_delay_ms: u32,
    /// Assert a stop condition when a transaction times out
    ///
    /// Off by default: an aborted transaction then leaves the bus in
    /// whatever state the peripheral reached.
    pub stop_on_abort: bool,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 1000,
            probe_timeout_ms: 100,
            probe_delay_ms: 1,
            stop_on_abort: false,
        }
    }
}

/// Protocol phase a wait belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum Phase {
    Start,
    AddressWrite,
    RegisterAddress,
    DataByte,
    RepeatedStart,
    AddressRead,
    ReceiveByte,
    /// Last byte of a read; stop has already been requested
    FinalByte,
}

impl Phase {
    /// A stop condition is still owed when aborting in this phase
    pub(crate) fn owes_stop(self) -> bool {
        self != Phase::FinalByte
    }
}
