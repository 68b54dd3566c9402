//! GPIO output abstractions
//!
//! Output lines used by the drivers: the RS-485 driver-enable pin and the
//! display board's control lines.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip. Reading back the output latch must not touch the
/// line itself.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Invert the current output level
    fn toggle(&mut self) {
        let high = self.is_set_high();
        self.set_state(!high);
    }

    /// Check if the output latch is currently high
    fn is_set_high(&self) -> bool;

    /// Check if the output latch is currently low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

impl<P: OutputPin + ?Sized> OutputPin for &mut P {
    fn set_high(&mut self) {
        (**self).set_high();
    }

    fn set_low(&mut self) {
        (**self).set_low();
    }

    fn is_set_high(&self) -> bool {
        (**self).is_set_high()
    }
}
