//! Swept sawtooth: the engine running on a desktop.
//!
//! A sawtooth oscillator whose pitch is swept up and down by a triangle LFO
//! updated at the control rate. The main thread plays the foreground role and
//! calls `tick()` in a loop; a second thread plays the timer interrupt and
//! drains frames in 1 ms bursts, the way a DMA half-buffer refill would.
//!
//! ```text
//!   main thread                         drain thread
//!   loop { fg.tick() } ──RingBuffer──►  every 1 ms: drain() × due frames ──► Meter
//! ```

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::info;
use mcu_audio::prelude::*;

/// Lowest and highest phase increment of the sweep (16.16 phase per frame).
const STEP_MIN: u32 = 110 * (1 << 16) / AUDIO_RATE * (1 << 16);
const STEP_MAX: u32 = 880 * (1 << 16) / AUDIO_RATE * (1 << 16);

/// LFO increment per control tick: one full up-down sweep every 4 s.
const LFO_STEP: u32 = u32::MAX / (CONTROL_RATE * 4);

const RUN_FOR: Duration = Duration::from_secs(2);

struct SweptSaw {
    phase: u32,
    step: u32,
    lfo: u32,
}

impl Synth for SweptSaw {
    type Frame = MonoFrame;

    fn update_control(&mut self, _cx: &mut ControlContext<'_>) {
        self.lfo = self.lfo.wrapping_add(LFO_STEP);
        // Fold the ramp into a triangle, 0..=u16::MAX.
        let tri = if self.lfo & 0x8000_0000 == 0 {
            self.lfo >> 15
        } else {
            !self.lfo >> 15
        };
        self.step = STEP_MIN + (((STEP_MAX - STEP_MIN) as u64 * tri as u64) >> 16) as u32;
    }

    fn update_audio(&mut self, _cx: &AudioContext) -> MonoFrame {
        self.phase = self.phase.wrapping_add(self.step);
        MonoFrame::from_16bit((self.phase >> 16) as i16)
    }
}

/// Sink that keeps level statistics instead of making sound.
#[derive(Default)]
struct Meter {
    frames: u64,
    peak: i32,
    sum_sq: u64,
}

impl Meter {
    fn rms(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        (self.sum_sq as f64 / self.frames as f64).sqrt()
    }
}

impl AudioSink<MonoFrame> for Meter {
    fn write(&mut self, frame: MonoFrame) {
        let s = frame.sample();
        self.frames += 1;
        self.peak = self.peak.max(s.abs());
        self.sum_sq += (s as i64 * s as i64) as u64;
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut engine: AudioEngine<SweptSaw, Meter, NoAdc, ManualTimer> = AudioEngine::new(
        EngineConfig::new(),
        SweptSaw { phase: 0, step: STEP_MIN, lfo: 0 },
        Meter::default(),
        NoAdc,
        ManualTimer::new(),
    );
    engine.start(CONTROL_RATE).unwrap_or_else(|never: Infallible| match never {});

    let done = AtomicBool::new(false);
    let mut generated = 0u64;
    {
        let (mut fg, mut drain) = engine.split();
        std::thread::scope(|s| {
            s.spawn(|| {
                let start = Instant::now();
                let mut delivered = 0u64;
                while start.elapsed() < RUN_FOR {
                    let due = start.elapsed().as_nanos() * AUDIO_RATE as u128 / 1_000_000_000;
                    while (delivered as u128) < due {
                        drain.drain();
                        delivered += 1;
                    }
                    std::thread::sleep(Duration::from_millis(1));
                }
                done.store(true, Ordering::Release);
            });

            while !done.load(Ordering::Acquire) {
                if fg.is_full() {
                    std::thread::yield_now();
                } else {
                    fg.tick();
                    generated += 1;
                }
            }
        });
    }

    engine.stop().unwrap_or_else(|never: Infallible| match never {});

    let meter = engine.sink();
    info!(
        "delivered {} frames ({} ms of audio), generated {}, {} underruns",
        meter.frames,
        engine.elapsed_micros() / 1000,
        generated,
        engine.underruns()
    );
    info!("peak {} rms {:.0}", meter.peak, meter.rms());
}
