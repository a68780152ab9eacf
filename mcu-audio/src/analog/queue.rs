use heapless::Vec;

use super::adc::AdcDriver;

/// Where the conversion state machine stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionPhase {
    /// No channel is being converted.
    Idle,
    /// First conversion on this channel is running; its result will be thrown away.
    Discard(u8),
    /// Second conversion on this channel is running; its result will be stored.
    Keep(u8),
}

/// Bounded queue of pending analog channels plus the two-phase conversion
/// state machine that services them.
///
/// Work proceeds in read cycles. Requests collect in a next-cycle set; a
/// channel already in that set is not added twice. When the current cycle's
/// stack runs empty the whole set becomes the new stack, served last-in
/// first-out. Every requested channel is therefore converted within two
/// cycles, however often the same channels are requested in between.
///
/// `CH` bounds the number of distinct channels per cycle and is the size of
/// the readings table.
pub struct AnalogChannelQueue<const CH: usize> {
    pending: Vec<u8, CH>,
    requested: Vec<u8, CH>,
    phase: ConversionPhase,
    readings: [u16; CH],
    dropped: u32,
}

impl<const CH: usize> AnalogChannelQueue<CH> {
    pub const fn new() -> Self {
        AnalogChannelQueue {
            pending: Vec::new(),
            requested: Vec::new(),
            phase: ConversionPhase::Idle,
            readings: [0; CH],
            dropped: 0,
        }
    }

    /// Queue `channel` for the next read cycle.
    ///
    /// A channel already queued for that cycle is left as it is. When `CH`
    /// distinct channels are already queued the request is dropped silently
    /// (and counted in [`dropped_requests`](Self::dropped_requests)).
    pub fn request_read(&mut self, channel: u8) {
        if self.requested.contains(&channel) {
            return;
        }
        if self.requested.push(channel).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
        }
    }

    /// Last completed reading stored at `index` (0 before the first one, or if
    /// `index` is out of range).
    pub fn latest_reading(&self, index: usize) -> u16 {
        self.readings.get(index).copied().unwrap_or(0)
    }

    /// Advance the state machine by one phase.
    ///
    /// Must be called at a fast, regular cadence (the engine uses the
    /// control-rate firing): the discard phase relies on the two conversions
    /// of a channel following each other closely.
    pub fn advance<A: AdcDriver>(&mut self, adc: &mut A) {
        self.phase = match self.phase {
            ConversionPhase::Idle => self.start_next(adc),
            ConversionPhase::Discard(channel) => {
                adc.start_conversion(channel);
                ConversionPhase::Keep(channel)
            }
            ConversionPhase::Keep(channel) => {
                let value = adc.read_latest();
                if let Some(slot) = self.readings.get_mut(adc.channel_to_index(channel)) {
                    *slot = value;
                }
                self.start_next(adc)
            }
        };
    }

    fn start_next<A: AdcDriver>(&mut self, adc: &mut A) -> ConversionPhase {
        if self.pending.is_empty() {
            core::mem::swap(&mut self.pending, &mut self.requested);
        }
        match self.pending.pop() {
            Some(channel) => {
                adc.start_conversion(channel);
                ConversionPhase::Discard(channel)
            }
            None => ConversionPhase::Idle,
        }
    }

    /// Forget pending requests, abandon the current conversion and zero all readings.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.requested.clear();
        self.phase = ConversionPhase::Idle;
        self.readings = [0; CH];
        self.dropped = 0;
    }

    pub fn phase(&self) -> ConversionPhase {
        self.phase
    }

    /// Channel currently being converted, if any.
    pub fn current_channel(&self) -> Option<u8> {
        match self.phase {
            ConversionPhase::Idle => None,
            ConversionPhase::Discard(channel) | ConversionPhase::Keep(channel) => Some(channel),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == ConversionPhase::Idle
    }

    /// Number of queued requests not yet started, in this cycle and the next.
    pub fn pending(&self) -> usize {
        self.pending.len() + self.requested.len()
    }

    /// Requests dropped because the pending stack was full.
    pub fn dropped_requests(&self) -> u32 {
        self.dropped
    }
}

impl<const CH: usize> Default for AnalogChannelQueue<CH> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum AdcEvent {
        Start(u8),
        Read(u8),
    }

    /// ADC whose n-th conversion on channel `c` yields `c * 100 + n`.
    struct ScriptedAdc {
        channel: u8,
        conversions: [u16; 16],
        log: Vec<AdcEvent, 64>,
    }

    impl ScriptedAdc {
        fn new() -> Self {
            ScriptedAdc {
                channel: 0,
                conversions: [0; 16],
                log: Vec::new(),
            }
        }
    }

    impl AdcDriver for ScriptedAdc {
        fn start_conversion(&mut self, channel: u8) {
            self.channel = channel;
            self.conversions[channel as usize] += 1;
            self.log.push(AdcEvent::Start(channel)).unwrap();
        }

        fn read_latest(&mut self) -> u16 {
            self.log.push(AdcEvent::Read(self.channel)).unwrap();
            self.channel as u16 * 100 + self.conversions[self.channel as usize]
        }
    }

    #[test]
    fn idle_queue_does_nothing() {
        let mut q: AnalogChannelQueue<4> = AnalogChannelQueue::new();
        let mut adc = ScriptedAdc::new();
        for _ in 0..5 {
            q.advance(&mut adc);
        }
        assert!(q.is_idle());
        assert!(adc.log.is_empty());
    }

    #[test]
    fn single_channel_takes_three_steps() {
        let mut q: AnalogChannelQueue<4> = AnalogChannelQueue::new();
        let mut adc = ScriptedAdc::new();
        q.request_read(2);

        q.advance(&mut adc);
        assert_eq!(q.phase(), ConversionPhase::Discard(2));
        assert_eq!(q.latest_reading(2), 0);

        q.advance(&mut adc);
        assert_eq!(q.phase(), ConversionPhase::Keep(2));
        assert_eq!(q.latest_reading(2), 0);

        q.advance(&mut adc);
        assert!(q.is_idle());
        assert_eq!(q.latest_reading(2), 202);
        assert_eq!(q.current_channel(), None);
    }

    #[test]
    fn each_channel_discards_first_conversion() {
        let mut q: AnalogChannelQueue<4> = AnalogChannelQueue::new();
        let mut adc = ScriptedAdc::new();
        q.request_read(3);
        q.request_read(1);
        q.request_read(2);
        assert_eq!(q.pending(), 3);

        for _ in 0..10 {
            q.advance(&mut adc);
        }
        assert!(q.is_idle());

        // Last-in first-out; one Read per channel, after its second Start.
        use AdcEvent::*;
        assert_eq!(
            &adc.log[..],
            &[
                Start(2), Start(2), Read(2),
                Start(1), Start(1), Read(1),
                Start(3), Start(3), Read(3),
            ]
        );
        for ch in [1u8, 2, 3] {
            assert_eq!(adc.conversions[ch as usize], 2);
            assert_eq!(q.latest_reading(ch as usize), ch as u16 * 100 + 2);
        }
    }

    #[test]
    fn overflow_drops_silently() {
        let mut q: AnalogChannelQueue<2> = AnalogChannelQueue::new();
        q.request_read(0);
        q.request_read(1);
        q.request_read(2);
        assert_eq!(q.pending(), 2);
        assert_eq!(q.dropped_requests(), 1);
    }

    #[test]
    fn repeated_request_is_queued_once() {
        let mut q: AnalogChannelQueue<4> = AnalogChannelQueue::new();
        let mut adc = ScriptedAdc::new();
        q.request_read(1);
        q.request_read(1);
        assert_eq!(q.pending(), 1);
        assert_eq!(q.dropped_requests(), 0);

        for _ in 0..5 {
            q.advance(&mut adc);
        }
        assert!(q.is_idle());
        assert_eq!(adc.conversions[1], 2);
        assert_eq!(q.latest_reading(1), 102);
    }

    #[test]
    fn requests_during_a_cycle_wait_for_the_next() {
        let mut q: AnalogChannelQueue<4> = AnalogChannelQueue::new();
        let mut adc = ScriptedAdc::new();
        q.request_read(0);
        q.request_read(1);
        q.advance(&mut adc);
        assert_eq!(q.phase(), ConversionPhase::Discard(1));

        // Re-requesting 1 mid-cycle must not push it ahead of 0.
        q.request_read(1);
        q.advance(&mut adc);
        q.advance(&mut adc);
        assert_eq!(q.phase(), ConversionPhase::Discard(0));
        q.advance(&mut adc);
        q.advance(&mut adc);
        assert_eq!(q.phase(), ConversionPhase::Discard(1));
        assert_eq!(q.pending(), 0);
    }

    #[test]
    fn every_channel_served_when_requested_each_step() {
        let mut q: AnalogChannelQueue<4> = AnalogChannelQueue::new();
        let mut adc = ScriptedAdc::new();
        // Two conversions per channel per cycle; keep the log small.
        for _ in 0..24 {
            for ch in [0, 1, 2] {
                q.request_read(ch);
            }
            q.advance(&mut adc);
            adc.log.clear();
        }
        assert_eq!(q.dropped_requests(), 0);
        for ch in 0..3 {
            assert!(adc.conversions[ch] >= 6, "channel {ch}: {}", adc.conversions[ch]);
        }
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut q: AnalogChannelQueue<2> = AnalogChannelQueue::new();
        let mut adc = ScriptedAdc::new();
        q.request_read(5);
        for _ in 0..3 {
            q.advance(&mut adc);
        }
        assert!(q.is_idle());
        assert_eq!(q.latest_reading(5), 0);
        assert_eq!(q.latest_reading(0), 0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut q: AnalogChannelQueue<4> = AnalogChannelQueue::new();
        let mut adc = ScriptedAdc::new();
        q.request_read(0);
        q.request_read(1);
        for _ in 0..4 {
            q.advance(&mut adc);
        }
        assert!(!q.is_idle());

        q.reset();
        assert!(q.is_idle());
        assert_eq!(q.pending(), 0);
        assert_eq!(q.latest_reading(1), 0);
    }
}
