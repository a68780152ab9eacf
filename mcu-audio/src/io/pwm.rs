//! PWM audio output.
//!
//! Maps signed frames onto a PWM duty cycle biased at mid-scale, the classic
//! way to get audio out of a microcontroller with nothing but an RC filter on
//! the pin. Works with any [`embedded_hal::pwm::SetDutyCycle`] channel; the
//! channel's own `max_duty_cycle()` sets the effective output resolution.
//!
//! ```ignore
//! let sink = PwmSink::new(pwm_channel);
//! let mut engine = AudioEngine::new(config, synth, sink, NoAdc, timer);
//! ```

use embedded_hal::pwm::SetDutyCycle;

use super::sink::AudioSink;
use crate::frame::{MonoFrame, StereoFrame};

/// Duty cycle for a signed [`AUDIO_BITS`](crate::constants::AUDIO_BITS) sample.
#[inline(always)]
fn duty_for(sample: i32, max_duty: u16) -> u16 {
    let biased = (sample.clamp(-32768, 32767) + 32768) as u32;
    ((biased * max_duty as u32) / 0xFFFF) as u16
}

/// Single-channel PWM sink.
pub struct PwmSink<P> {
    pin: P,
    max_duty: u16,
}

impl<P: SetDutyCycle> PwmSink<P> {
    /// Wrap a PWM channel. Caches its maximum duty cycle.
    pub fn new(pin: P) -> Self {
        let max_duty = pin.max_duty_cycle();
        PwmSink { pin, max_duty }
    }

    /// Give the PWM channel back.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: SetDutyCycle> AudioSink<MonoFrame> for PwmSink<P> {
    #[inline]
    fn write(&mut self, frame: MonoFrame) {
        // No way to report from the drain context; a failed update just keeps the old duty.
        let _ = self.pin.set_duty_cycle(duty_for(frame.sample(), self.max_duty));
    }
}

/// Two-channel PWM sink.
pub struct StereoPwmSink<L, R> {
    left: L,
    right: R,
    max_left: u16,
    max_right: u16,
}

impl<L: SetDutyCycle, R: SetDutyCycle> StereoPwmSink<L, R> {
    pub fn new(left: L, right: R) -> Self {
        let max_left = left.max_duty_cycle();
        let max_right = right.max_duty_cycle();
        StereoPwmSink { left, right, max_left, max_right }
    }

    pub fn release(self) -> (L, R) {
        (self.left, self.right)
    }
}

impl<L: SetDutyCycle, R: SetDutyCycle> AudioSink<StereoFrame> for StereoPwmSink<L, R> {
    #[inline]
    fn write(&mut self, frame: StereoFrame) {
        let _ = self.left.set_duty_cycle(duty_for(frame.l(), self.max_left));
        let _ = self.right.set_duty_cycle(duty_for(frame.r(), self.max_right));
    }
}
