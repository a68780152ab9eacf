//! Audio output sink interface.

/// Destination for frames leaving the output buffer.
///
/// `write()` is called from the drain context (usually the audio-rate timer
/// interrupt) once per frame. It must accept the frame immediately and never
/// block: a PWM compare register write, a DAC write, or a push into an I2S/DMA
/// queue that the platform keeps from overflowing.
pub trait AudioSink<F> {
    /// Deliver one frame.
    fn write(&mut self, frame: F);
}

impl<F, T> AudioSink<F> for T
where
    T: FnMut(F),
{
    #[inline]
    fn write(&mut self, frame: F) {
        self(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::MonoFrame;

    #[test]
    fn closures_are_sinks() {
        let mut last = MonoFrame(0);
        {
            let mut sink = |f: MonoFrame| last = f;
            sink.write(MonoFrame(9));
        }
        assert_eq!(last, MonoFrame(9));
    }
}
