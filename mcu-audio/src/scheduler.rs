//! Control-rate scheduling.
//!
//! [`RateScheduler`] counts audio ticks down and fires once every
//! `audio_rate / control_rate` ticks. The engine calls `update_control()` and
//! advances the analog queue on each firing.

use crate::config::ConfigError;

/// Countdown that fires at a fixed integer sub-multiple of the audio rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateScheduler {
    /// Value the countdown is reloaded with after firing (`period - 1`).
    reload: u32,
    counter: u32,
}

impl RateScheduler {
    /// Create a scheduler firing every `audio_rate / control_rate` ticks.
    ///
    /// A non-integer ratio truncates, so control timing drifts slightly. A
    /// zero control rate or one above the audio rate degrades to firing on
    /// every tick. Use [`check`](Self::check) to detect either case.
    pub const fn new(audio_rate: u32, control_rate: u32) -> Self {
        let reload = Self::period_for(audio_rate, control_rate) - 1;
        RateScheduler { reload, counter: reload }
    }

    const fn period_for(audio_rate: u32, control_rate: u32) -> u32 {
        if control_rate == 0 || control_rate > audio_rate {
            1
        } else {
            audio_rate / control_rate
        }
    }

    /// Report the exact tick period for a pair of rates, or why it is not exact.
    pub const fn check(audio_rate: u32, control_rate: u32) -> Result<u32, ConfigError> {
        if control_rate == 0 {
            return Err(ConfigError::ZeroControlRate);
        }
        if control_rate > audio_rate {
            return Err(ConfigError::ControlRateAboveAudioRate { audio_rate, control_rate });
        }
        if audio_rate % control_rate != 0 {
            return Err(ConfigError::NonIntegerRatio { audio_rate, control_rate });
        }
        Ok(audio_rate / control_rate)
    }

    /// Change the rates and restart the countdown.
    pub fn reconfigure(&mut self, audio_rate: u32, control_rate: u32) {
        *self = Self::new(audio_rate, control_rate);
    }

    /// Restart the countdown without changing the period.
    pub fn reset(&mut self) {
        self.counter = self.reload;
    }

    /// Number of audio ticks between two firings.
    pub const fn period(&self) -> u32 {
        self.reload + 1
    }

    /// Count one audio tick. Returns `true` on every `period()`-th call.
    #[inline]
    pub fn tick(&mut self) -> bool {
        if self.counter == 0 {
            self.counter = self.reload;
            true
        } else {
            self.counter -= 1;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_every_256th_tick() {
        let mut sched = RateScheduler::new(16_384, 64);
        assert_eq!(sched.period(), 256);

        for call in 1..=256 * 4 {
            let fired = sched.tick();
            assert_eq!(fired, call % 256 == 0, "unexpected result on call {call}");
        }
    }

    #[test]
    fn period_of_one_fires_every_tick() {
        let mut sched = RateScheduler::new(64, 64);
        assert_eq!(sched.period(), 1);
        for _ in 0..10 {
            assert!(sched.tick());
        }
    }

    #[test]
    fn non_integer_ratio_truncates() {
        // 16384 / 100 = 163.84 -> fires every 163 ticks
        let mut sched = RateScheduler::new(16_384, 100);
        assert_eq!(sched.period(), 163);
        let fired = (0..163 * 3).filter(|_| sched.tick()).count();
        assert_eq!(fired, 3);
        assert_eq!(
            RateScheduler::check(16_384, 100),
            Err(ConfigError::NonIntegerRatio { audio_rate: 16_384, control_rate: 100 })
        );
    }

    #[test]
    fn degenerate_rates_fire_every_tick() {
        assert_eq!(RateScheduler::new(16_384, 0).period(), 1);
        assert_eq!(RateScheduler::new(64, 128).period(), 1);
    }

    #[test]
    fn check_reports_exact_ratio() {
        assert_eq!(RateScheduler::check(16_384, 64), Ok(256));
        assert_eq!(RateScheduler::check(32_768, 128), Ok(256));
        assert_eq!(RateScheduler::check(16_384, 0), Err(ConfigError::ZeroControlRate));
    }

    #[test]
    fn reset_restarts_countdown() {
        let mut sched = RateScheduler::new(8, 2); // period 4
        sched.tick();
        sched.tick();
        sched.reset();
        assert!(!sched.tick());
        assert!(!sched.tick());
        assert!(!sched.tick());
        assert!(sched.tick());
    }

    #[test]
    fn reconfigure_changes_period() {
        let mut sched = RateScheduler::new(16_384, 64);
        sched.reconfigure(16_384, 128);
        assert_eq!(sched.period(), 128);
        let fired = (0..128).filter(|_| sched.tick()).count();
        assert_eq!(fired, 1);
    }
}
