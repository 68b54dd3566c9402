//! Timeout clock
//!
//! A free-running millisecond counter used only to measure elapsed time
//! inside bounded waits. The counter wraps after ~49 days; callers must
//! compare with [`elapsed_since`] rather than subtracting directly.

use portable_atomic::{AtomicU32, Ordering};

/// Millisecond tick source
pub trait TimeoutClock {
    /// Current tick count in milliseconds
    fn now_ms(&self) -> u32;

    /// Milliseconds elapsed since `start`, tolerant of counter wrap
    fn elapsed_since(&self, start: u32) -> u32 {
        elapsed_since(start, self.now_ms())
    }
}

impl<C: TimeoutClock + ?Sized> TimeoutClock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Wrapping difference between two tick readings
#[inline]
pub fn elapsed_since(start: u32, now: u32) -> u32 {
    now.wrapping_sub(start)
}

/// Tick counter incremented from a periodic timer interrupt
///
/// Place one in a `static` and call [`TickCounter::tick`] from the 1 kHz
/// timer handler; hand `&TICKS` to the drivers as their clock.
///
/// ```ignore
/// static TICKS: TickCounter = TickCounter::new();
///
/// #[interrupt]
/// fn SysTick() {
///     TICKS.tick();
/// }
/// ```
pub struct TickCounter {
    ticks: AtomicU32,
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TickCounter {
    /// Create a counter starting at zero
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU32::new(0),
        }
    }

    /// Advance the counter by one millisecond
    pub fn tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Advance the counter by `ms` milliseconds
    pub fn advance(&self, ms: u32) {
        self.ticks.fetch_add(ms, Ordering::Relaxed);
    }
}

impl TimeoutClock for TickCounter {
    fn now_ms(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }
}
