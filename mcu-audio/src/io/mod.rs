//! Cross-context buffering and the hardware-facing interfaces.
//!
//! ## Components
//!
//! | Item | Context | Description |
//! |------|---------|-------------|
//! | [`RingBuffer`] | both | Lock-free SPSC frame buffer, split into [`Writer`] / [`Reader`] |
//! | [`AudioSink`] | drain | Where drained frames go (PWM, DAC, I2S queue, closure) |
//! | [`AudioTimer`] | setup | Arms / disarms the audio-rate drain interrupt |
//! | [`PwmSink`] / [`StereoPwmSink`] | drain | `embedded-hal` PWM outputs (feature `pwm`) |
//!
//! ## Contexts
//!
//! - **Foreground**: the main loop calling `tick()`. Owns the [`Writer`].
//! - **Drain**: the timer interrupt (or DMA refill handler) calling
//!   `drain()`. Owns the [`Reader`] and the sink. May preempt the foreground
//!   at any instruction.

pub mod ring_buffer;
pub mod sink;
pub mod timer;

#[cfg(feature = "pwm")]
pub mod pwm;

pub use ring_buffer::{Reader, RingBuffer, Writer};
pub use sink::AudioSink;
pub use timer::{AudioTimer, ManualTimer};

#[cfg(feature = "pwm")]
pub use pwm::{PwmSink, StereoPwmSink};
