//! Non-blocking multi-channel analog input.
//!
//! The [`AnalogChannelQueue`] services any number of requested channels
//! through a single ADC without ever waiting on a conversion. Each channel
//! gets two back-to-back conversions and only the second is kept: the first
//! reading after the multiplexer switches channels is disturbed by the
//! switching transient.
//!
//! ```text
//!            control tick          control tick          control tick
//!   Idle ──pop ch, start #1──► Discard(ch) ──start #2──► Keep(ch) ──store #2, pop next──► …
//! ```
//!
//! One phase advances per control-rate firing, so the transient always has
//! one control period to settle. Requests made while a read cycle is running
//! wait for the next cycle, and a channel is queued at most once per cycle, so
//! with `k` channels in use a reading is at most `4k` control periods old.

mod adc;
mod queue;
mod reader;

pub use adc::{AdcDriver, NoAdc};
pub use queue::{AnalogChannelQueue, ConversionPhase};
pub use reader::AnalogReader;
pub(crate) use reader::AnalogPort;

/// Shift a reading from `from_bits` to `to_bits` of resolution.
///
/// Both widths are capped at 16 bits, the most a `u16` reading can carry.
#[inline(always)]
pub const fn rescale(value: u16, from_bits: u8, to_bits: u8) -> u16 {
    let from_bits = if from_bits > 16 { 16 } else { from_bits };
    let to_bits = if to_bits > 16 { 16 } else { to_bits };
    if from_bits > to_bits {
        value >> (from_bits - to_bits)
    } else {
        value << (to_bits - from_bits)
    }
}
