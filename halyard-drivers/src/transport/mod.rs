//! Half-duplex serial transport
//!
//! - [`Rs485Transport`]: direction control and polled transmit
//! - [`SharedRxBuffer`]: interrupt-fed receive buffer

mod rs485;
mod rx_buffer;

pub use rs485::{LinkDirection, Rs485Config, Rs485Transport, TransportError};
pub use rx_buffer::{RxBuffer, SharedRxBuffer, RX_BUFFER_SIZE};
