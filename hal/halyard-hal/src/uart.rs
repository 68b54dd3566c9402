//! UART serial communication abstractions
//!
//! Register-level primitives for a USART driving a half-duplex line
//! transceiver. The transmit side is polled; the receive side is fed from
//! the USART's receive interrupt.

/// Transmit primitives of a USART
pub trait HalfDuplexUart {
    /// Transmit data register is empty and can accept the next byte
    fn is_tx_empty(&self) -> bool;

    /// Last frame has fully left the shift register
    fn is_tx_complete(&self) -> bool;

    /// Write one byte to the transmit data register
    fn write_data(&mut self, byte: u8);
}

/// Receive-interrupt primitives of a USART
pub trait UartRxIrq {
    /// A received byte is waiting in the data register
    fn is_rx_pending(&self) -> bool;

    /// Read the received byte from the data register
    fn read_data(&mut self) -> u8;

    /// Acknowledge the receive interrupt
    fn clear_rx_pending(&mut self);
}

impl<U: HalfDuplexUart + ?Sized> HalfDuplexUart for &mut U {
    fn is_tx_empty(&self) -> bool {
        (**self).is_tx_empty()
    }

    fn is_tx_complete(&self) -> bool {
        (**self).is_tx_complete()
    }

    fn write_data(&mut self, byte: u8) {
        (**self).write_data(byte);
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::RS485
    }
}

impl UartConfig {
    /// RS-485 link settings: 115200 baud, 8N1
    pub const RS485: Self = Self {
        baudrate: 115_200,
        data_bits: DataBits::Eight,
        parity: Parity::None,
        stop_bits: StopBits::One,
    };

    /// Bits on the wire for one frame, including start and stop bits
    pub fn frame_bits(&self) -> u32 {
        let data = match self.data_bits {
            DataBits::Seven => 7,
            DataBits::Eight => 8,
            DataBits::Nine => 9,
        };
        let parity = match self.parity {
            Parity::None => 0,
            Parity::Even | Parity::Odd => 1,
        };
        let stop = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        1 + data + parity + stop
    }

    /// Time one frame occupies the line, in microseconds (rounded up)
    pub fn frame_time_us(&self) -> u32 {
        (self.frame_bits() * 1_000_000).div_ceil(self.baudrate)
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
