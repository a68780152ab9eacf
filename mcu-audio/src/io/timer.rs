//! Drain-side timing source.
//!
//! The platform layer owns the actual interrupt vector. Arming the timer means
//! "start calling `Drain::drain()` at `audio_rate_hz`", or, for a self-paced
//! I2S/DMA peripheral, "start pulling frames via `Drain::fill()`".

use core::convert::Infallible;

/// A hardware timer (or self-paced peripheral) driving the drain step.
pub trait AudioTimer {
    /// Error type for setup and teardown.
    type Error;

    /// Start invoking the drain step at `audio_rate_hz`.
    fn arm(&mut self, audio_rate_hz: u32) -> Result<(), Self::Error>;

    /// Stop invoking the drain step and restore any peripheral state that
    /// `arm()` overrode.
    fn disarm(&mut self) -> Result<(), Self::Error>;
}

/// Timer with no hardware behind it: the application calls the drain step itself.
///
/// Useful in tests and on hosts, and for outputs whose pacing lives
/// elsewhere (e.g. a codec that pulls blocks on its own schedule).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ManualTimer {
    rate: Option<u32>,
}

impl ManualTimer {
    pub const fn new() -> Self {
        ManualTimer { rate: None }
    }

    /// Whether `arm()` has been called without a matching `disarm()`.
    pub fn is_armed(&self) -> bool {
        self.rate.is_some()
    }

    /// The rate passed to the last `arm()`, while armed.
    pub fn rate(&self) -> Option<u32> {
        self.rate
    }
}

impl AudioTimer for ManualTimer {
    type Error = Infallible;

    fn arm(&mut self, audio_rate_hz: u32) -> Result<(), Self::Error> {
        self.rate = Some(audio_rate_hz);
        Ok(())
    }

    fn disarm(&mut self) -> Result<(), Self::Error> {
        self.rate = None;
        Ok(())
    }
}
