//! RS-485 half-duplex transport
//!
//! Drives a USART through an RS-485 line transceiver whose driver-enable
//! (DE) pin selects the direction of the shared pair. Outbound bytes are
//! polled out with the line in transmit; the line is handed back to
//! receive as soon as the last stop bit has left, so the interrupt-fed
//! [`SharedRxBuffer`] can pick up the reply.
//!
//! # Transmit waits
//!
//! By default the transmit-empty and transmit-complete waits have no
//! bound: a USART that never raises them hangs the caller, which is
//! treated as a hardware liveness assumption. Setting
//! [`Rs485Config::tx_timeout_ms`] bounds every wait with the timeout clock
//! instead and surfaces [`TransportError::Timeout`].

use embedded_hal::delay::DelayNs;
use halyard_hal::{HalfDuplexUart, OutputPin, TimeoutClock};

use super::rx_buffer::SharedRxBuffer;

/// Transceiver direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkDirection {
    /// DE high: we drive the pair
    Transmit,
    /// DE low: the pair is released and the receiver listens
    Receive,
}

/// Transport errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// A bounded transmit wait expired
    Timeout,
}

/// Transport configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rs485Config {
    /// Settling time after every direction change, in microseconds
    pub settle_us: u32,
    /// Bound for each transmit wait in milliseconds (`None` = wait forever)
    pub tx_timeout_ms: Option<u32>,
}

impl Default for Rs485Config {
    fn default() -> Self {
        Self {
            settle_us: 10,
            tx_timeout_ms: None,
        }
    }
}

/// Transmit-side condition to poll for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum TxCondition {
    RegisterEmpty,
    Complete,
}

/// RS-485 transport over a USART and a DE pin
pub struct Rs485Transport<'a, U, P, D, C> {
    uart: U,
    de: P,
    delay: D,
    clock: C,
    rx: &'a SharedRxBuffer,
    config: Rs485Config,
    direction: LinkDirection,
}

impl<'a, U, P, D, C> Rs485Transport<'a, U, P, D, C>
where
    U: HalfDuplexUart,
    P: OutputPin,
    D: DelayNs,
    C: TimeoutClock,
{
    /// Create the transport and put the line into receive
    ///
    /// The USART must already be configured (see
    /// [`halyard_hal::uart::UartConfig::RS485`]) with its receive interrupt
    /// routed to [`SharedRxBuffer::on_interrupt`] on `rx`.
    pub fn new(
        uart: U,
        de: P,
        delay: D,
        clock: C,
        rx: &'a SharedRxBuffer,
        config: Rs485Config,
    ) -> Self {
        let mut transport = Self {
            uart,
            de,
            delay,
            clock,
            rx,
            config,
            direction: LinkDirection::Receive,
        };
        transport.set_direction(LinkDirection::Receive);
        transport
    }

    /// Get the configuration
    pub fn config(&self) -> &Rs485Config {
        &self.config
    }

    /// Current transceiver direction
    pub fn direction(&self) -> LinkDirection {
        self.direction
    }

    /// Drive the DE pin and wait for the transceiver to settle
    pub fn set_direction(&mut self, direction: LinkDirection) {
        match direction {
            LinkDirection::Transmit => self.de.set_high(),
            LinkDirection::Receive => self.de.set_low(),
        }
        self.delay.delay_us(self.config.settle_us);
        self.direction = direction;

        #[cfg(feature = "defmt")]
        defmt::trace!("RS485 direction: {}", direction);
    }

    /// Send a single byte
    pub fn send_byte(&mut self, byte: u8) -> Result<(), TransportError> {
        self.send_buffer(&[byte])
    }

    /// Send the bytes of a string
    pub fn send_string(&mut self, s: &str) -> Result<(), TransportError> {
        self.send_buffer(s.as_bytes())
    }

    /// Send a buffer, returning the line to receive afterwards
    ///
    /// The line goes back to receive even when a bounded wait expires.
    pub fn send_buffer(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.set_direction(LinkDirection::Transmit);
        let result = self.transmit(data);
        self.set_direction(LinkDirection::Receive);
        result
    }

    fn transmit(&mut self, data: &[u8]) -> Result<(), TransportError> {
        for &byte in data {
            self.wait_tx(TxCondition::RegisterEmpty)?;
            self.uart.write_data(byte);
        }
        self.wait_tx(TxCondition::Complete)
    }

    fn wait_tx(&self, condition: TxCondition) -> Result<(), TransportError> {
        let start = self.clock.now_ms();

        loop {
            let ready = match condition {
                TxCondition::RegisterEmpty => self.uart.is_tx_empty(),
                TxCondition::Complete => self.uart.is_tx_complete(),
            };
            if ready {
                return Ok(());
            }

            if let Some(budget) = self.config.tx_timeout_ms {
                if self.clock.elapsed_since(start) > budget {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("RS485 TX timeout waiting for {}", condition);
                    return Err(TransportError::Timeout);
                }
            }
        }
    }

    /// Drain received bytes into `out`; returns the number copied
    ///
    /// See [`SharedRxBuffer::receive`]: whatever does not fit is dropped.
    pub fn receive(&mut self, out: &mut [u8]) -> usize {
        self.rx.receive(out)
    }

    /// Received data is waiting
    pub fn data_available(&self) -> bool {
        self.rx.data_available()
    }

    /// Number of bytes waiting
    pub fn rx_length(&self) -> usize {
        self.rx.len()
    }

    /// Discard everything received so far
    pub fn clear_rx_buffer(&mut self) {
        self.rx.clear();
    }
}
