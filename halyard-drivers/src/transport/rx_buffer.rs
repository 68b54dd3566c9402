//! Interrupt-fed receive buffer
//!
//! The USART receive interrupt is the only producer, the foreground
//! `receive()` call the only consumer. Every access goes through a
//! critical section, so a byte arriving mid-drain is either copied out by
//! that drain or kept for the next one; it is never half-cleared.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use halyard_hal::UartRxIrq;
use heapless::Vec;

/// Receive buffer capacity in bytes
pub const RX_BUFFER_SIZE: usize = 256;

/// Received bytes plus the data-ready flag
///
/// Overflow policy is drop-newest: once full, further bytes are discarded
/// but still raise the ready flag, so a consumer sees "data pending" even
/// when the content was lost.
#[derive(Debug, Clone)]
pub struct RxBuffer {
    data: Vec<u8, RX_BUFFER_SIZE>,
    ready: bool,
}

impl Default for RxBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl RxBuffer {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            ready: false,
        }
    }

    /// Append a received byte
    ///
    /// Returns `false` if the byte was dropped because the buffer is full.
    /// The ready flag is set either way.
    pub fn push(&mut self, byte: u8) -> bool {
        let stored = self.data.push(byte).is_ok();
        self.ready = true;
        stored
    }

    /// Copy out up to `out.len()` bytes and reset to empty
    ///
    /// Bytes that do not fit in `out` are discarded along with the rest of
    /// the buffer. Returns 0 without touching anything if no data is ready.
    pub fn drain_into(&mut self, out: &mut [u8]) -> usize {
        if !self.ready {
            return 0;
        }

        let len = self.data.len().min(out.len());
        out[..len].copy_from_slice(&self.data[..len]);
        self.clear();
        len
    }

    /// Discard all bytes and lower the ready flag
    pub fn clear(&mut self) {
        self.data.clear();
        self.ready = false;
    }

    /// Ready flag
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Number of stored bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// No bytes stored
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Buffer has reached capacity
    pub fn is_full(&self) -> bool {
        self.data.is_full()
    }

    /// Stored bytes in arrival order
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

/// [`RxBuffer`] shared between the receive interrupt and the foreground
///
/// Designed to live in a `static`:
///
/// ```ignore
/// static RS485_RX: SharedRxBuffer = SharedRxBuffer::new();
///
/// #[interrupt]
/// fn USART2() {
///     with_uart(|uart| RS485_RX.on_interrupt(uart));
/// }
/// ```
pub struct SharedRxBuffer {
    inner: Mutex<CriticalSectionRawMutex, RefCell<RxBuffer>>,
}

impl Default for SharedRxBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedRxBuffer {
    /// Create an empty shared buffer
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(RxBuffer::new())),
        }
    }

    /// Receive-interrupt entry point
    ///
    /// Reads the pending byte (if any) from the USART, stores it and
    /// acknowledges the interrupt. Returns `false` for a spurious entry.
    pub fn on_interrupt<U: UartRxIrq + ?Sized>(&self, uart: &mut U) -> bool {
        if !uart.is_rx_pending() {
            return false;
        }

        let byte = uart.read_data();
        self.append(byte);
        uart.clear_rx_pending();
        true
    }

    /// Store one byte, returning `false` if it was dropped
    pub fn append(&self, byte: u8) -> bool {
        let stored = self.inner.lock(|cell| cell.borrow_mut().push(byte));
        if !stored {
            #[cfg(feature = "defmt")]
            defmt::trace!("RS485 RX buffer full, dropped {=u8:#x}", byte);
        }
        stored
    }

    /// Drain into `out`; see [`RxBuffer::drain_into`]
    pub fn receive(&self, out: &mut [u8]) -> usize {
        self.inner.lock(|cell| cell.borrow_mut().drain_into(out))
    }

    /// Data-ready flag
    pub fn data_available(&self) -> bool {
        self.inner.lock(|cell| cell.borrow().is_ready())
    }

    /// Number of buffered bytes
    pub fn len(&self) -> usize {
        self.inner.lock(|cell| cell.borrow().len())
    }

    /// No bytes buffered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard buffered bytes and lower the ready flag
    pub fn clear(&self) {
        self.inner.lock(|cell| cell.borrow_mut().clear());
    }

    /// Run `f` on a snapshot-consistent view of the buffer
    pub fn inspect<R>(&self, f: impl FnOnce(&RxBuffer) -> R) -> R {
        self.inner.lock(|cell| f(&cell.borrow()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// USART receive side with a queue of bytes waiting
    struct MockRx {
        pending: Vec<u8, 8>,
        cleared: u32,
    }

    impl MockRx {
        fn with(bytes: &[u8]) -> Self {
            let mut pending = Vec::new();
            pending.extend_from_slice(bytes).unwrap();
            pending.reverse();
            Self {
                pending,
                cleared: 0,
            }
        }
    }

    impl UartRxIrq for MockRx {
        fn is_rx_pending(&self) -> bool {
            !self.pending.is_empty()
        }

        fn read_data(&mut self) -> u8 {
            self.pending.pop().unwrap()
        }

        fn clear_rx_pending(&mut self) {
            self.cleared += 1;
        }
    }

    #[test]
    fn test_empty_buffer() {
        let rx = SharedRxBuffer::new();
        assert!(!rx.data_available());
        assert_eq!(rx.len(), 0);
        assert!(rx.is_empty());
    }

    #[test]
    fn test_receive_without_data_is_noop() {
        let rx = SharedRxBuffer::new();
        let mut out = [0xEEu8; 4];

        assert_eq!(rx.receive(&mut out), 0);
        assert_eq!(out, [0xEE; 4]);
        assert!(!rx.data_available());
    }

    #[test]
    fn test_drain_returns_data_once() {
        let rx = SharedRxBuffer::new();
        for &b in b"ping" {
            assert!(rx.append(b));
        }
        assert!(rx.data_available());
        assert_eq!(rx.len(), 4);

        let mut out = [0u8; 16];
        assert_eq!(rx.receive(&mut out), 4);
        assert_eq!(&out[..4], b"ping");

        // Nothing new arrived
        assert_eq!(rx.receive(&mut out), 0);
        assert!(!rx.data_available());
    }

    #[test]
    fn test_short_drain_discards_remainder() {
        let rx = SharedRxBuffer::new();
        for b in 1..=10u8 {
            rx.append(b);
        }

        let mut out = [0u8; 3];
        assert_eq!(rx.receive(&mut out), 3);
        assert_eq!(out, [1, 2, 3]);
        assert_eq!(rx.len(), 0);
        assert!(!rx.data_available());
    }

    #[test]
    fn test_overflow_drops_newest() {
        let rx = SharedRxBuffer::new();
        for i in 0..300u32 {
            let stored = rx.append(i as u8);
            assert_eq!(stored, i < RX_BUFFER_SIZE as u32);
        }

        assert_eq!(rx.len(), RX_BUFFER_SIZE);
        assert!(rx.data_available());
        rx.inspect(|buf| {
            assert!(buf.is_full());
            // Bytes 257..300 never made it in; storage holds 0..=255 in order
            for (i, &b) in buf.as_slice().iter().enumerate() {
                assert_eq!(b, i as u8);
            }
        });
    }

    #[test]
    fn test_dropped_byte_still_signals_ready() {
        let rx = SharedRxBuffer::new();
        for _ in 0..RX_BUFFER_SIZE {
            rx.append(0);
        }

        let mut out = [0u8; 0];
        // Zero-length drain empties the buffer and lowers the flag
        assert_eq!(rx.receive(&mut out), 0);
        assert!(!rx.data_available());

        let mut inner = RxBuffer::new();
        for _ in 0..RX_BUFFER_SIZE {
            inner.push(1);
        }
        inner.ready = false;
        assert!(!inner.push(2));
        assert!(inner.is_ready());
        assert_eq!(inner.len(), RX_BUFFER_SIZE);
    }

    #[test]
    fn test_clear() {
        let rx = SharedRxBuffer::new();
        rx.append(0x42);
        rx.clear();
        assert!(!rx.data_available());
        assert_eq!(rx.len(), 0);
    }

    #[test]
    fn test_interrupt_reads_and_acknowledges() {
        let rx = SharedRxBuffer::new();
        let mut uart = MockRx::with(&[0x10, 0x20]);

        assert!(rx.on_interrupt(&mut uart));
        assert!(rx.on_interrupt(&mut uart));
        // Spurious entry: nothing pending, nothing acknowledged
        assert!(!rx.on_interrupt(&mut uart));

        assert_eq!(uart.cleared, 2);
        rx.inspect(|buf| assert_eq!(buf.as_slice(), &[0x10, 0x20]));
    }

    #[test]
    fn test_static_placement() {
        static RX: SharedRxBuffer = SharedRxBuffer::new();

        RX.append(7);
        let mut out = [0u8; 1];
        assert_eq!(RX.receive(&mut out), 1);
        assert_eq!(out[0], 7);
    }

    proptest! {
        #[test]
        fn prop_count_never_exceeds_capacity(bytes in proptest::collection::vec(any::<u8>(), 0..600)) {
            let mut buf = RxBuffer::new();
            for &b in &bytes {
                buf.push(b);
            }

            let kept = bytes.len().min(RX_BUFFER_SIZE);
            prop_assert_eq!(buf.len(), kept);
            prop_assert_eq!(buf.as_slice(), &bytes[..kept]);
            prop_assert_eq!(buf.is_ready(), !bytes.is_empty());
        }

        #[test]
        fn prop_drain_is_bounded_by_both_lengths(count in 1usize..400, max_len in 0usize..300) {
            let mut buf = RxBuffer::new();
            for i in 0..count {
                buf.push(i as u8);
            }

            let mut out = [0u8; 300];
            let n = buf.drain_into(&mut out[..max_len]);
            prop_assert_eq!(n, count.min(RX_BUFFER_SIZE).min(max_len));
            prop_assert!(buf.is_empty());
            prop_assert!(!buf.is_ready());
            for (i, &b) in out[..n].iter().enumerate() {
                prop_assert_eq!(b, i as u8);
            }
        }
    }
}
