/// Default audio rate in Hz (frames delivered to the sink per second).
pub const AUDIO_RATE: u32 = 16_384;

/// Default control rate in Hz (`update_control()` calls per second).
pub const CONTROL_RATE: u32 = 64;

/// Default capacity of the output ring buffer, in frames. Must be a power of two.
pub const OUTPUT_BUFFER_SIZE: usize = 256;

/// Default number of analog channels serviced by the analog queue.
pub const NUM_ANALOG_INPUTS: usize = 8;

/// Bit depth of samples stored in [`MonoFrame`](crate::frame::MonoFrame) and
/// [`StereoFrame`](crate::frame::StereoFrame).
pub const AUDIO_BITS: u8 = 16;

/// Native resolution of ADC readings unless the driver says otherwise.
pub const ADC_RESOLUTION_BITS: u8 = 10;

