//! Piezo buzzer tone generator
//!
//! Drives one PWM channel of a timer counting at [`COUNTER_HZ`]. Pitch is set
//! through the period register, loudness through the compare value as a
//! percentage of the period.
//!
//! ```ignore
//! let mut buzzer = Buzzer::new(pwm, delay);
//! buzzer.beep(BEEP_FREQ_NORMAL, 100);
//! buzzer.play_melody(&[Note::new(note::C4, 200), Note::new(note::REST, 100)]);
//! ```

use embedded_hal::delay::DelayNs;
use halyard_hal::PwmChannel;

/// Timer counter rate (Hz)
pub const COUNTER_HZ: u32 = 1_000_000;

/// Shortest period the timer accepts (ticks)
pub const MIN_PERIOD: u32 = 2;

/// Longest period the 16-bit timer holds (ticks)
pub const MAX_PERIOD: u32 = 65_535;

/// Period programmed at construction (1 kHz)
pub const IDLE_PERIOD: u32 = 1_000;

/// Duty cycle used by [`Buzzer::start`] (%)
pub const DEFAULT_DUTY: u8 = 50;

/// Note frequencies (Hz)
pub mod note {
    pub const C4: u32 = 262;
    pub const D4: u32 = 294;
    pub const E4: u32 = 330;
    pub const F4: u32 = 349;
    pub const G4: u32 = 392;
    pub const A4: u32 = 440;
    pub const B4: u32 = 494;
    pub const C5: u32 = 523;
    /// Silence
    pub const REST: u32 = 0;
}

pub const ALARM_FREQ_LOW: u32 = 800;
pub const ALARM_FREQ_HIGH: u32 = 1200;
pub const BEEP_FREQ_NORMAL: u32 = 1000;
pub const BEEP_FREQ_HIGH: u32 = 2000;

/// Alarm pattern tones (Hz)
const ALARM_TONES: [u32; 2] = [1000, 1500];
/// Length of each alarm tone and of the gap after it (ms)
const ALARM_STEP_MS: u32 = 200;

/// One melody entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Note {
    /// Pitch (Hz), [`note::REST`] for silence
    pub frequency: u32,
    /// How long the note lasts (ms)
    pub duration_ms: u32,
}

impl Note {
    pub const fn new(frequency: u32, duration_ms: u32) -> Self {
        Self {
            frequency,
            duration_ms,
        }
    }

    pub const fn rest(duration_ms: u32) -> Self {
        Self::new(note::REST, duration_ms)
    }

    pub fn is_rest(&self) -> bool {
        self.frequency == note::REST
    }
}

/// Timer period (ticks) for a tone, clamped to what the timer can hold
pub fn period_for(frequency: u32) -> u32 {
    (COUNTER_HZ / frequency.max(1)).clamp(MIN_PERIOD, MAX_PERIOD)
}

/// Compare value for a duty cycle over a given period register value
pub fn compare_for(period_reg: u32, duty: u8) -> u32 {
    (period_reg + 1) * u32::from(duty.min(100)) / 100
}

/// Buzzer on a PWM channel
pub struct Buzzer<P, D> {
    pwm: P,
    delay: D,
    /// Current tone (Hz), 0 while silent
    frequency: u32,
    /// Duty cycle (%)
    duty: u8,
}

impl<P: PwmChannel, D: DelayNs> Buzzer<P, D> {
    /// Program the idle period and leave the output silent
    pub fn new(mut pwm: P, delay: D) -> Self {
        pwm.set_period(IDLE_PERIOD - 1);
        pwm.set_compare(0);
        Self {
            pwm,
            delay,
            frequency: 0,
            duty: DEFAULT_DUTY,
        }
    }

    /// Current tone (Hz), 0 while silent
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Current duty cycle (%)
    pub fn duty(&self) -> u8 {
        self.duty
    }

    pub fn is_sounding(&self) -> bool {
        self.frequency != 0
    }

    /// Change pitch, keeping the duty cycle
    ///
    /// A frequency of 0 silences the buzzer.
    pub fn set_frequency(&mut self, frequency: u32) {
        if frequency == 0 {
            self.stop();
            return;
        }

        self.pwm.set_period(period_for(frequency) - 1);
        self.frequency = frequency;
        self.apply_duty();

        #[cfg(feature = "defmt")]
        defmt::trace!("buzzer {} Hz", frequency);
    }

    /// Change the duty cycle, clamped to 100 %
    ///
    /// While silent the value is only stored and takes effect on the next tone.
    pub fn set_duty(&mut self, duty: u8) {
        self.duty = duty.min(100);
        if self.is_sounding() {
            self.apply_duty();
        }
    }

    /// Start a tone at [`DEFAULT_DUTY`]
    pub fn start(&mut self, frequency: u32) {
        self.set_frequency(frequency);
        self.set_duty(DEFAULT_DUTY);
    }

    /// Silence the output
    pub fn stop(&mut self) {
        self.pwm.set_compare(0);
        self.frequency = 0;

        #[cfg(feature = "defmt")]
        defmt::trace!("buzzer off");
    }

    /// Sound a tone for `duration_ms`, then stop
    pub fn beep(&mut self, frequency: u32, duration_ms: u32) {
        self.start(frequency);
        self.delay.delay_ms(duration_ms);
        self.stop();
    }

    /// Play notes in order, silent on rests, and stop at the end
    pub fn play_melody(&mut self, melody: &[Note]) {
        for note in melody {
            if note.is_rest() {
                self.stop();
            } else {
                self.start(note.frequency);
            }
            self.delay.delay_ms(note.duration_ms);
        }
        self.stop();
    }

    /// Two-tone alarm, repeated `cycles` times
    pub fn alarm(&mut self, cycles: u32) {
        for _ in 0..cycles {
            for tone in ALARM_TONES {
                self.beep(tone, ALARM_STEP_MS);
                self.delay.delay_ms(ALARM_STEP_MS);
            }
        }
    }

    /// Give back the PWM channel and delay
    pub fn release(self) -> (P, D) {
        (self.pwm, self.delay)
    }

    fn apply_duty(&mut self) {
        let compare = compare_for(self.pwm.period(), self.duty);
        self.pwm.set_compare(compare);
    }
}
