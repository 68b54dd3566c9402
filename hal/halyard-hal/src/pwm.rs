//! PWM timer channel abstraction
//!
//! The tone generator drives one output-compare channel of a timer whose
//! counter runs at a fixed rate. Period and compare values are in counter
//! ticks, written as raw register values.

/// One output-compare channel and its timer's period register
pub trait PwmChannel {
    /// Write the auto-reload (period) register
    fn set_period(&mut self, value: u32);

    /// Read back the auto-reload (period) register
    fn period(&self) -> u32;

    /// Write the channel compare register
    fn set_compare(&mut self, value: u32);
}
