//! Output frame types.
//!
//! A frame is one unit handed to the sink per audio tick: a single sample
//! ([`MonoFrame`]) or a left/right pair ([`StereoFrame`]). Samples are stored
//! as signed values centred on zero at [`AUDIO_BITS`] resolution; sinks add
//! their own bias and scaling.
//!
//! Synthesis code rarely produces exactly 16-bit values, so the constructors
//! shift from whatever depth the generator works in:
//!
//! ```ignore
//! let f = MonoFrame::from_8bit(osc.next());          // int8 oscillator
//! let f = MonoFrame::from_nbit(10, (a * b) >> 6);    // 10-bit product
//! let f = StereoFrame::from_f32(0.5, -0.25);
//! ```

use crate::constants::AUDIO_BITS;

/// Frame types the engine can buffer and deliver.
pub trait AudioFrame: Copy + Send + 'static {
    /// The zero-amplitude frame.
    const SILENCE: Self;
}

/// Shift `value` from `bits` of resolution to [`AUDIO_BITS`].
///
/// Above 47 bits nothing but the sign of an `i32` is left.
#[inline(always)]
const fn scale_to_audio_bits(bits: u8, value: i32) -> i32 {
    if bits > AUDIO_BITS {
        let shift = bits - AUDIO_BITS;
        value >> (if shift > 31 { 31 } else { shift })
    } else {
        value << (AUDIO_BITS - bits)
    }
}

const MAX_SAMPLE: i32 = (1 << (AUDIO_BITS - 1)) - 1;
const MIN_SAMPLE: i32 = -(1 << (AUDIO_BITS - 1));

#[inline(always)]
fn sample_from_f32(value: f32) -> i32 {
    let clamped = value.clamp(-1.0, 1.0);
    libm::roundf(clamped * MAX_SAMPLE as f32) as i32
}

/// One mono output sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonoFrame(pub i32);

impl MonoFrame {
    /// Frame from a signed 8-bit value.
    pub const fn from_8bit(value: i8) -> Self {
        MonoFrame(scale_to_audio_bits(8, value as i32))
    }

    /// Frame from a signed 16-bit value.
    pub const fn from_16bit(value: i16) -> Self {
        MonoFrame(scale_to_audio_bits(16, value as i32))
    }

    /// Frame from a value with `bits` of signed resolution.
    pub const fn from_nbit(bits: u8, value: i32) -> Self {
        MonoFrame(scale_to_audio_bits(bits, value))
    }

    /// Like [`from_nbit`](Self::from_nbit), for values that may slightly
    /// overshoot the nominal range (e.g. a sum of two `bits`-wide signals).
    /// The overshoot is kept; call [`clip`](Self::clip) if the sink cannot take it.
    pub const fn from_almost_nbit(bits: u8, value: i32) -> Self {
        MonoFrame(scale_to_audio_bits(bits, value))
    }

    /// Frame from a float in `-1.0..=1.0` (clamped, rounded to nearest).
    pub fn from_f32(value: f32) -> Self {
        MonoFrame(sample_from_f32(value))
    }

    /// Clamp to the signed [`AUDIO_BITS`] range.
    pub const fn clip(self) -> Self {
        MonoFrame(clamp_sample(self.0))
    }

    /// The sample value.
    pub const fn sample(self) -> i32 {
        self.0
    }
}

impl AudioFrame for MonoFrame {
    const SILENCE: Self = MonoFrame(0);
}

/// One stereo output frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StereoFrame {
    pub l: i32,
    pub r: i32,
}

impl StereoFrame {
    /// Frame from raw samples already at [`AUDIO_BITS`].
    pub const fn new(l: i32, r: i32) -> Self {
        StereoFrame { l, r }
    }

    /// Same sample on both channels.
    pub const fn from_mono(frame: MonoFrame) -> Self {
        StereoFrame { l: frame.0, r: frame.0 }
    }

    /// Frame from signed 8-bit values.
    pub const fn from_8bit(l: i8, r: i8) -> Self {
        StereoFrame {
            l: scale_to_audio_bits(8, l as i32),
            r: scale_to_audio_bits(8, r as i32),
        }
    }

    /// Frame from signed 16-bit values.
    pub const fn from_16bit(l: i16, r: i16) -> Self {
        StereoFrame {
            l: scale_to_audio_bits(16, l as i32),
            r: scale_to_audio_bits(16, r as i32),
        }
    }

    /// Frame from values with `bits` of signed resolution.
    pub const fn from_nbit(bits: u8, l: i32, r: i32) -> Self {
        StereoFrame {
            l: scale_to_audio_bits(bits, l),
            r: scale_to_audio_bits(bits, r),
        }
    }

    /// See [`MonoFrame::from_almost_nbit`].
    pub const fn from_almost_nbit(bits: u8, l: i32, r: i32) -> Self {
        Self::from_nbit(bits, l, r)
    }

    /// Frame from floats in `-1.0..=1.0` (clamped, rounded to nearest).
    pub fn from_f32(l: f32, r: f32) -> Self {
        StereoFrame {
            l: sample_from_f32(l),
            r: sample_from_f32(r),
        }
    }

    /// Clamp both channels to the signed [`AUDIO_BITS`] range.
    pub const fn clip(self) -> Self {
        StereoFrame {
            l: clamp_sample(self.l),
            r: clamp_sample(self.r),
        }
    }

    /// Left channel.
    pub const fn l(self) -> i32 {
        self.l
    }

    /// Right channel.
    pub const fn r(self) -> i32 {
        self.r
    }
}

impl AudioFrame for StereoFrame {
    const SILENCE: Self = StereoFrame { l: 0, r: 0 };
}

const fn clamp_sample(value: i32) -> i32 {
    if value > MAX_SAMPLE {
        MAX_SAMPLE
    } else if value < MIN_SAMPLE {
        MIN_SAMPLE
    } else {
        value
    }
}
