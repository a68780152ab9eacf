use super::adc::AdcDriver;
use super::queue::AnalogChannelQueue;
use super::rescale;

/// An ADC bundled with the queue that services it, addressed by board pin.
pub struct AnalogReader<A, const CH: usize> {
    adc: A,
    queue: AnalogChannelQueue<CH>,
}

impl<A: AdcDriver, const CH: usize> AnalogReader<A, CH> {
    pub const fn new(adc: A) -> Self {
        AnalogReader {
            adc,
            queue: AnalogChannelQueue::new(),
        }
    }

    /// Queue a conversion of `pin`. Ignored when the driver is disabled.
    pub fn request(&mut self, pin: u8) {
        if A::ENABLED {
            let channel = self.adc.pin_to_channel(pin);
            self.queue.request_read(channel);
        }
    }

    /// Last completed reading of `pin` at the ADC's native resolution.
    pub fn latest(&self, pin: u8) -> u16 {
        let channel = self.adc.pin_to_channel(pin);
        self.queue.latest_reading(self.adc.channel_to_index(channel))
    }

    /// Last completed reading of `pin`, shifted to `BITS` of resolution.
    pub fn latest_bits<const BITS: u8>(&self, pin: u8) -> u16 {
        rescale(self.latest(pin), A::RESOLUTION_BITS, BITS)
    }

    /// Queue `pin` and return its last completed reading.
    pub fn read(&mut self, pin: u8) -> u16 {
        self.request(pin);
        self.latest(pin)
    }

    /// Advance the conversion state machine by one phase.
    pub fn advance(&mut self) {
        if A::ENABLED {
            self.queue.advance(&mut self.adc);
        }
    }

    pub fn reset(&mut self) {
        self.queue.reset();
    }

    pub fn queue(&self) -> &AnalogChannelQueue<CH> {
        &self.queue
    }

    pub fn adc(&self) -> &A {
        &self.adc
    }

    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }
}

/// Object-safe view of an [`AnalogReader`], so control callbacks need not be
/// generic over the driver type.
pub(crate) trait AnalogPort {
    fn request(&mut self, pin: u8);
    fn latest(&self, pin: u8) -> u16;
    fn resolution_bits(&self) -> u8;
}

impl<A: AdcDriver, const CH: usize> AnalogPort for AnalogReader<A, CH> {
    fn request(&mut self, pin: u8) {
        AnalogReader::request(self, pin)
    }

    fn latest(&self, pin: u8) -> u16 {
        AnalogReader::latest(self, pin)
    }

    fn resolution_bits(&self) -> u8 {
        A::RESOLUTION_BITS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analog::NoAdc;

    /// 12-bit ADC on a part where pin `p` is channel `p + 10`, stored at index `p`.
    struct OffsetAdc {
        channel: u8,
    }

    impl AdcDriver for OffsetAdc {
        const RESOLUTION_BITS: u8 = 12;

        fn start_conversion(&mut self, channel: u8) {
            self.channel = channel;
        }

        fn read_latest(&mut self) -> u16 {
            0x0F00 | self.channel as u16
        }

        fn pin_to_channel(&self, pin: u8) -> u8 {
            pin + 10
        }

        fn channel_to_index(&self, channel: u8) -> usize {
            (channel - 10) as usize
        }
    }

    #[test]
    fn maps_pins_through_channels_to_indices() {
        let mut reader: AnalogReader<OffsetAdc, 4> = AnalogReader::new(OffsetAdc { channel: 0 });
        assert_eq!(reader.read(3), 0);
        assert_eq!(reader.queue().pending(), 1);

        reader.advance();
        assert_eq!(reader.queue().current_channel(), Some(13));
        reader.advance();
        reader.advance();

        assert_eq!(reader.latest(3), 0x0F0D);
        assert_eq!(reader.latest_bits::<8>(3), 0xF0);
        assert_eq!(reader.latest(2), 0);
    }

    #[test]
    fn disabled_driver_ignores_requests() {
        let mut reader: AnalogReader<NoAdc, 4> = AnalogReader::new(NoAdc);
        reader.request(1);
        reader.advance();
        assert_eq!(reader.queue().pending(), 0);
        assert!(reader.queue().is_idle());
        assert_eq!(reader.latest(1), 0);
    }
}
