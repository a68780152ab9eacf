use crate::analog::{rescale, AnalogPort};
use crate::constants::ADC_RESOLUTION_BITS;
use crate::frame::AudioFrame;

/// User callbacks driven by the engine.
///
/// Both methods run in the foreground context, inside `tick()`. When the
/// control rate fires, `update_control()` runs immediately before the
/// `update_audio()` call of the same tick.
pub trait Synth {
    /// Frame type produced for the sink.
    type Frame: AudioFrame;

    /// Slow-rate update: envelopes, LFOs, reading knobs.
    fn update_control(&mut self, cx: &mut ControlContext<'_>);

    /// Produce the next output frame. Called once per generated audio tick.
    fn update_audio(&mut self, cx: &AudioContext) -> Self::Frame;
}

/// What `update_control()` may touch besides the synth itself.
pub struct ControlContext<'a> {
    analog: &'a mut dyn AnalogPort,
    elapsed_ticks: u32,
    audio_rate: u32,
}

impl<'a> ControlContext<'a> {
    pub(crate) fn new(analog: &'a mut dyn AnalogPort, elapsed_ticks: u32, audio_rate: u32) -> Self {
        ControlContext { analog, elapsed_ticks, audio_rate }
    }

    /// Queue a conversion of `pin`.
    pub fn request_analog_read(&mut self, pin: u8) {
        self.analog.request(pin);
    }

    /// Last completed reading of `pin` at the ADC's native resolution.
    ///
    /// May be up to one full round-robin period old.
    pub fn latest_analog_reading(&self, pin: u8) -> u16 {
        self.analog.latest(pin)
    }

    /// Last completed reading of `pin`, shifted to `BITS` of resolution.
    pub fn latest_analog_reading_bits<const BITS: u8>(&self, pin: u8) -> u16 {
        rescale(self.analog.latest(pin), self.analog.resolution_bits(), BITS)
    }

    /// Queue `pin` and return its last completed reading.
    pub fn analog_read(&mut self, pin: u8) -> u16 {
        self.analog.request(pin);
        self.analog.latest(pin)
    }

    /// Frames delivered to the sink so far.
    pub fn elapsed_audio_ticks(&self) -> u32 {
        self.elapsed_ticks
    }

    /// Microseconds of audio delivered to the sink so far.
    pub fn elapsed_micros(&self) -> u64 {
        micros_for(self.elapsed_ticks, self.audio_rate)
    }
}

/// What `update_audio()` may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AudioContext {
    pub(crate) audio_input: u16,
}

impl AudioContext {
    /// Latest latched audio input sample at the ADC's native resolution
    /// (0 when audio input is disabled).
    pub fn audio_input(&self) -> u16 {
        self.audio_input
    }

    /// Latest latched audio input sample, shifted from the default ADC
    /// resolution to `BITS`.
    pub fn audio_input_bits<const BITS: u8>(&self) -> u16 {
        rescale(self.audio_input, ADC_RESOLUTION_BITS, BITS)
    }
}

/// `ticks * 1e6 / audio_rate`, 0 for a zero rate.
pub(crate) fn micros_for(ticks: u32, audio_rate: u32) -> u64 {
    if audio_rate == 0 {
        return 0;
    }
    ticks as u64 * 1_000_000 / audio_rate as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPort {
        requests: u32,
    }

    impl AnalogPort for FixedPort {
        fn request(&mut self, _pin: u8) {
            self.requests += 1;
        }

        fn latest(&self, pin: u8) -> u16 {
            pin as u16 * 1000
        }

        fn resolution_bits(&self) -> u8 {
            12
        }
    }

    #[test]
    fn control_context_forwards_to_port() {
        let mut port = FixedPort { requests: 0 };
        {
            let mut cx = ControlContext::new(&mut port, 16_384, 16_384);
            assert_eq!(cx.analog_read(2), 2000);
            cx.request_analog_read(1);
            assert_eq!(cx.latest_analog_reading(3), 3000);
            assert_eq!(cx.latest_analog_reading_bits::<8>(4), 4000 >> 4);
            assert_eq!(cx.elapsed_audio_ticks(), 16_384);
            assert_eq!(cx.elapsed_micros(), 1_000_000);
        }
        assert_eq!(port.requests, 2);
    }

    #[test]
    fn micros_are_exact() {
        assert_eq!(micros_for(256, 16_384), 15_625);
        assert_eq!(micros_for(1, 16_384), 61);
        assert_eq!(micros_for(u32::MAX, 16_384), u32::MAX as u64 * 1_000_000 / 16_384);
        assert_eq!(micros_for(100, 0), 0);
    }

    #[test]
    fn audio_input_rescales() {
        let cx = AudioContext { audio_input: 1023 };
        assert_eq!(cx.audio_input(), 1023);
        assert_eq!(cx.audio_input_bits::<8>(), 255);
    }
}
