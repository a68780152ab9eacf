//! # mcu-audio
//!
//! A `no_std`, zero-allocation real-time audio runtime for microcontrollers.
//! It keeps a continuous, glitch-free stream of frames flowing to an output
//! while a slower control update (envelopes, LFOs, knob reading) runs at a
//! fixed sub-multiple of the audio rate, and analog sensor channels are
//! sampled without ever waiting on the ADC.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Buffer | [`io::ring_buffer`] | Lock-free SPSC ring between foreground and interrupt |
//! | Timing | [`scheduler`] | Control-rate countdown |
//! | Sensors | [`analog`] | Two-phase round-robin ADC queue |
//! | Engine | [`engine`] | `tick()` producer, `drain()` consumer, start/stop |
//! | Callbacks | [`synth`] | [`Synth`](synth::Synth) trait and its contexts |
//! | Output | [`frame`] / [`io`] | Frame types, sink/timer traits, PWM sinks |
//!
//! ## Quick start
//!
//! ```ignore
//! use mcu_audio::prelude::*;
//!
//! struct Drone { phase: u16, step: u16 }
//!
//! impl Synth for Drone {
//!     type Frame = MonoFrame;
//!
//!     fn update_control(&mut self, cx: &mut ControlContext<'_>) {
//!         self.step = 100 + cx.analog_read(0);
//!     }
//!
//!     fn update_audio(&mut self, _cx: &AudioContext) -> MonoFrame {
//!         self.phase = self.phase.wrapping_add(self.step);
//!         MonoFrame::from_16bit(self.phase as i16)
//!     }
//! }
//!
//! let mut engine = AudioEngine::<_, _, _, _>::new(
//!     EngineConfig::new(), Drone { phase: 0, step: 0 }, PwmSink::new(pwm), adc, timer,
//! );
//! engine.start(CONTROL_RATE)?;
//! let (mut fg, drain) = engine.split();
//! // move `drain` into the timer interrupt: `drain.drain()` at AUDIO_RATE
//! loop {
//!     fg.tick();
//! }
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `pwm` | yes | PWM sinks over `embedded_hal::pwm::SetDutyCycle` |
//!
//! ## Audio parameters
//!
//! - **Audio rate:** 16 384 Hz default ([`constants::AUDIO_RATE`])
//! - **Control rate:** 64 Hz default ([`constants::CONTROL_RATE`])
//! - **Output buffer:** 256 frames ([`constants::OUTPUT_BUFFER_SIZE`])
//! - **Sample format:** signed, 16-bit range in an `i32`

#![no_std]

#[cfg(test)]
extern crate std;

pub mod analog;
pub mod config;
pub mod constants;
pub mod engine;
pub mod frame;
pub mod io;
pub mod scheduler;
pub mod synth;

/// The types most programs need.
pub mod prelude {
    pub use crate::analog::{AdcDriver, NoAdc};
    pub use crate::config::{EngineConfig, UnderrunPolicy};
    pub use crate::constants::{AUDIO_RATE, CONTROL_RATE};
    pub use crate::engine::{AudioEngine, Drain, EngineState, Foreground};
    pub use crate::frame::{AudioFrame, MonoFrame, StereoFrame};
    pub use crate::io::{AudioSink, AudioTimer, ManualTimer};
    pub use crate::synth::{AudioContext, ControlContext, Synth};

    #[cfg(feature = "pwm")]
    pub use crate::io::{PwmSink, StereoPwmSink};
}
