//! Engine configuration and setup-time validation.
//!
//! Everything here is checked outside the real-time contexts. The engine
//! itself never fails on a bad rate: it degrades (see
//! [`RateScheduler::new`](crate::scheduler::RateScheduler::new)) and logs a
//! warning from `start()`. Call [`EngineConfig::validate`] from setup code if
//! you would rather fail fast.

use thiserror::Error;

use crate::constants::AUDIO_RATE;

/// What the drain step hands to the sink when the producer has starved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnderrunPolicy {
    /// Re-send the last frame that was delivered (silence before the first one).
    #[default]
    RepeatLast,
    /// Send [`AudioFrame::SILENCE`](crate::frame::AudioFrame::SILENCE).
    Silence,
}

/// Rate configuration problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("control rate must be non-zero")]
    ZeroControlRate,
    #[error("control rate {control_rate} Hz exceeds audio rate {audio_rate} Hz")]
    ControlRateAboveAudioRate { audio_rate: u32, control_rate: u32 },
    #[error("audio rate {0} Hz is not a power of two")]
    AudioRateNotPowerOfTwo(u32),
    #[error("control rate {0} Hz is not a power of two")]
    ControlRateNotPowerOfTwo(u32),
    #[error("audio rate {audio_rate} Hz is not a multiple of control rate {control_rate} Hz")]
    NonIntegerRatio { audio_rate: u32, control_rate: u32 },
}

/// Runtime configuration of an [`AudioEngine`](crate::engine::AudioEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Frames per second requested from the sink.
    pub audio_rate: u32,
    /// Latch captured audio input samples for `update_audio()`.
    pub audio_input: bool,
    /// Fallback used by the drain step on an empty buffer.
    pub underrun: UnderrunPolicy,
}

impl EngineConfig {
    /// Default configuration: 16 384 Hz, no audio input, repeat last frame on underrun.
    pub const fn new() -> Self {
        EngineConfig {
            audio_rate: AUDIO_RATE,
            audio_input: false,
            underrun: UnderrunPolicy::RepeatLast,
        }
    }

    /// Set the audio rate.
    pub const fn with_audio_rate(mut self, audio_rate: u32) -> Self {
        self.audio_rate = audio_rate;
        self
    }

    /// Enable or disable audio input latching.
    pub const fn with_audio_input(mut self, enabled: bool) -> Self {
        self.audio_input = enabled;
        self
    }

    /// Choose the underrun fallback.
    pub const fn with_underrun(mut self, policy: UnderrunPolicy) -> Self {
        self.underrun = policy;
        self
    }

    /// Check that `control_rate` pairs cleanly with the configured audio rate.
    ///
    /// Both rates must be powers of two, so the ratio is an exact integer and
    /// elapsed-time arithmetic stays shift-friendly.
    pub fn validate(&self, control_rate: u32) -> Result<(), ConfigError> {
        if !self.audio_rate.is_power_of_two() {
            return Err(ConfigError::AudioRateNotPowerOfTwo(self.audio_rate));
        }
        if control_rate != 0 && !control_rate.is_power_of_two() {
            return Err(ConfigError::ControlRateNotPowerOfTwo(control_rate));
        }
        crate::scheduler::RateScheduler::check(self.audio_rate, control_rate).map(|_| ())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
