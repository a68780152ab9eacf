//! ADC driver interface.

use crate::constants::ADC_RESOLUTION_BITS;

/// Asynchronous ADC used by the analog queue.
///
/// Both conversion methods are called from the foreground context, at the
/// control rate. Neither may block: `start_conversion()` only triggers the
/// hardware, and `read_latest()` returns whatever the last finished conversion
/// produced.
///
/// # Pins, channels and indices
///
/// - A *pin* is what the user names (board pin number).
/// - A *channel* is the ADC's own input number for that pin.
/// - An *index* is the slot in the readings table, `0..CH`.
///
/// On many parts all three are the same number, which is what the default
/// mapping methods assume.
pub trait AdcDriver {
    /// Native resolution of `read_latest()` results.
    const RESOLUTION_BITS: u8 = ADC_RESOLUTION_BITS;

    /// `false` for drivers that stand in for "no analog input".
    const ENABLED: bool = true;

    /// Switch to `channel` and start a conversion.
    fn start_conversion(&mut self, channel: u8);

    /// Result of the most recently completed conversion.
    fn read_latest(&mut self) -> u16;

    /// Map a board pin to an ADC channel.
    fn pin_to_channel(&self, pin: u8) -> u8 {
        pin
    }

    /// Map an ADC channel to its slot in the readings table.
    fn channel_to_index(&self, channel: u8) -> usize {
        channel as usize
    }
}

/// Placeholder driver for builds without analog input.
///
/// Read requests are ignored and every reading stays 0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoAdc;

impl AdcDriver for NoAdc {
    const ENABLED: bool = false;

    fn start_conversion(&mut self, _channel: u8) {}

    fn read_latest(&mut self) -> u16 {
        0
    }
}
