//! The audio engine: producer step, drain step, and their lifecycle.
//!
//! ## Execution contexts
//!
//! ```text
//!  foreground (cooperative)                     timer ISR (audio rate)
//! ┌────────────────────────────┐              ┌───────────────────────┐
//! │ tick():                    │              │ drain():              │
//! │   buffer full? ── yes ─► return           │   read one frame      │
//! │   RateScheduler fires?     │  RingBuffer  │   (underrun fallback) │
//! │     update_control()       │ ───────────► │   sink.write(frame)   │
//! │     analog queue advance   │              │                       │
//! │   update_audio() ─► write  │ ◄─────────── │ capture_input(sample) │
//! └────────────────────────────┘  input ring  └───────────────────────┘
//! ```
//!
//! Backpressure is the whole flow control: `tick()` does nothing while the
//! output buffer is full, so it can be called as often as the main loop
//! likes. Only the drain rate sets the pace.
//!
//! ## Usage
//!
//! ```ignore
//! static mut ENGINE: Option<AudioEngine<MySynth, PwmSink<Pwm>, Adc1, Tc1>> = None;
//!
//! // setup
//! let engine = AudioEngine::new(EngineConfig::new(), MySynth::new(), sink, adc, timer);
//! engine.start(64)?;
//! let (mut fg, drain) = engine.split();
//! // hand `drain` to the timer interrupt, then in the main loop:
//! loop { fg.tick(); }
//! ```

use log::{info, warn};

use crate::analog::{AdcDriver, AnalogReader};
use crate::config::{EngineConfig, UnderrunPolicy};
use crate::constants::{NUM_ANALOG_INPUTS, OUTPUT_BUFFER_SIZE};
use crate::frame::AudioFrame;
use crate::io::ring_buffer::{Reader, RingBuffer, Writer};
use crate::io::sink::AudioSink;
use crate::io::timer::AudioTimer;
use crate::scheduler::RateScheduler;
use crate::synth::{micros_for, AudioContext, ControlContext, Synth};

/// Lifecycle state of an [`AudioEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Stopped,
    Running,
}

/// State owned by the foreground context.
struct ProducerState<S, A, const CH: usize> {
    synth: S,
    analog: AnalogReader<A, CH>,
    scheduler: RateScheduler,
    audio_input: u16,
}

/// State owned by the drain context.
struct DrainState<F, O> {
    sink: O,
    last: F,
    underruns: u32,
}

/// Audio engine owning the output buffer, control scheduler and analog queue.
///
/// # Type Parameters
///
/// - `S`: user callbacks ([`Synth`]).
/// - `O`: output sink, fed from the drain context.
/// - `A`: ADC driver for analog reads ([`NoAdc`](crate::analog::NoAdc) to disable).
/// - `T`: timer driving the drain step.
/// - `N`: output buffer capacity in frames (power of two).
/// - `CH`: number of analog channels (pending-stack depth and readings table size).
pub struct AudioEngine<
    S,
    O,
    A,
    T,
    const N: usize = { OUTPUT_BUFFER_SIZE },
    const CH: usize = { NUM_ANALOG_INPUTS },
> where
    S: Synth,
{
    config: EngineConfig,
    state: EngineState,
    output: RingBuffer<S::Frame, N>,
    input: RingBuffer<u16, N>,
    producer: ProducerState<S, A, CH>,
    drain: DrainState<S::Frame, O>,
    timer: T,
}

impl<S, O, A, T, const N: usize, const CH: usize> AudioEngine<S, O, A, T, N, CH>
where
    S: Synth,
    O: AudioSink<S::Frame>,
    A: AdcDriver,
    T: AudioTimer,
{
    /// Create a stopped engine.
    pub const fn new(config: EngineConfig, synth: S, sink: O, adc: A, timer: T) -> Self {
        AudioEngine {
            state: EngineState::Stopped,
            output: RingBuffer::new(),
            input: RingBuffer::new(),
            producer: ProducerState {
                synth,
                analog: AnalogReader::new(adc),
                scheduler: RateScheduler::new(config.audio_rate, crate::constants::CONTROL_RATE),
                audio_input: 0,
            },
            drain: DrainState {
                sink,
                last: <S::Frame as AudioFrame>::SILENCE,
                underruns: 0,
            },
            timer,
            config,
        }
    }

    /// Reset buffers and analog queue, set the control rate, arm the timer.
    ///
    /// A control rate that does not divide the audio rate exactly is accepted
    /// with a warning (control timing drifts); a zero or too-high rate makes
    /// the control callback run on every tick. On a timer error the engine
    /// stays stopped.
    pub fn start(&mut self, control_rate: u32) -> Result<(), T::Error> {
        if let Err(err) = self.config.validate(control_rate) {
            warn!("degraded rate configuration: {}", err);
        }

        self.output.reset();
        self.input.reset();
        self.producer.analog.reset();
        self.producer.scheduler.reconfigure(self.config.audio_rate, control_rate);
        self.producer.audio_input = 0;
        self.drain.last = <S::Frame as AudioFrame>::SILENCE;
        self.drain.underruns = 0;

        self.timer.arm(self.config.audio_rate)?;
        self.state = EngineState::Running;

        info!(
            "audio engine started: {} Hz audio, control every {} ticks, {} frame buffer",
            self.config.audio_rate,
            self.producer.scheduler.period(),
            N
        );
        Ok(())
    }

    /// Disarm the timer. Buffer and analog queue contents are left as they are.
    pub fn stop(&mut self) -> Result<(), T::Error> {
        if self.state == EngineState::Stopped {
            return Ok(());
        }
        self.timer.disarm()?;
        self.state = EngineState::Stopped;
        info!(
            "audio engine stopped after {} ticks ({} underruns)",
            self.output.count(),
            self.drain.underruns
        );
        Ok(())
    }

    /// Split into the foreground handle (producer) and the drain handle (ISR side).
    pub fn split(&mut self) -> (Foreground<'_, S, A, N, CH>, Drain<'_, S::Frame, O, N>) {
        let (output_writer, output_reader) = self.output.split();
        let (input_writer, input_reader) = self.input.split();
        let foreground = Foreground {
            running: self.state == EngineState::Running,
            input_enabled: self.config.audio_input,
            audio_rate: self.config.audio_rate,
            output: output_writer,
            input: input_reader,
            state: &mut self.producer,
        };
        let drain = Drain {
            input_enabled: self.config.audio_input,
            policy: self.config.underrun,
            output: output_reader,
            input: input_writer,
            state: &mut self.drain,
        };
        (foreground, drain)
    }

    /// Producer step, when both contexts are driven from one place.
    pub fn tick(&mut self) {
        self.split().0.tick();
    }

    /// Drain step, when both contexts are driven from one place.
    pub fn drain(&mut self) {
        self.split().1.drain();
    }

    /// Queue an analog read of `pin`.
    pub fn request_analog_read(&mut self, pin: u8) {
        self.producer.analog.request(pin);
    }

    /// Last completed reading of `pin`.
    pub fn latest_analog_reading(&self, pin: u8) -> u16 {
        self.producer.analog.latest(pin)
    }

    /// Queue `pin` and return its last completed reading.
    pub fn analog_read(&mut self, pin: u8) -> u16 {
        self.producer.analog.read(pin)
    }

    /// Latest latched audio input sample.
    pub fn audio_input(&self) -> u16 {
        self.producer.audio_input
    }

    /// Frames delivered to the sink since `start()`, wrapping at `u32::MAX`.
    pub fn elapsed_audio_ticks(&self) -> u32 {
        self.output.count()
    }

    /// Microseconds of audio delivered since `start()`.
    pub fn elapsed_micros(&self) -> u64 {
        micros_for(self.output.count(), self.config.audio_rate)
    }

    /// Drain steps that found the buffer empty since `start()`.
    pub fn underruns(&self) -> u32 {
        self.drain.underruns
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Audio ticks between two `update_control()` calls.
    pub fn control_period(&self) -> u32 {
        self.producer.scheduler.period()
    }

    pub fn output_buffer(&self) -> &RingBuffer<S::Frame, N> {
        &self.output
    }

    pub fn analog(&self) -> &AnalogReader<A, CH> {
        &self.producer.analog
    }

    pub fn synth(&self) -> &S {
        &self.producer.synth
    }

    pub fn synth_mut(&mut self) -> &mut S {
        &mut self.producer.synth
    }

    pub fn sink(&self) -> &O {
        &self.drain.sink
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }
}

/// Foreground half of a split engine. Call [`tick()`](Self::tick) from the main loop.
pub struct Foreground<'e, S: Synth, A, const N: usize, const CH: usize> {
    running: bool,
    input_enabled: bool,
    audio_rate: u32,
    output: Writer<'e, S::Frame, N>,
    input: Reader<'e, u16, N>,
    state: &'e mut ProducerState<S, A, CH>,
}

impl<S: Synth, A: AdcDriver, const N: usize, const CH: usize> Foreground<'_, S, A, N, CH> {
    /// Generate one frame unless the output buffer is full.
    ///
    /// Never blocks. Does nothing while the engine is stopped.
    pub fn tick(&mut self) {
        if !self.running || self.output.is_full() {
            return;
        }

        let state = &mut *self.state;

        // One input sample per generated frame keeps input and output in step.
        if self.input_enabled {
            if let Some(sample) = self.input.read() {
                state.audio_input = sample;
            }
        }

        if state.scheduler.tick() {
            let mut cx = ControlContext::new(&mut state.analog, self.output.count(), self.audio_rate);
            state.synth.update_control(&mut cx);
            state.analog.advance();
        }

        let cx = AudioContext { audio_input: state.audio_input };
        let frame = state.synth.update_audio(&cx);
        self.output.write(frame);
    }

    /// `true` when the next `tick()` would be skipped for backpressure.
    pub fn is_full(&self) -> bool {
        self.output.is_full()
    }

    pub fn request_analog_read(&mut self, pin: u8) {
        self.state.analog.request(pin);
    }

    pub fn latest_analog_reading(&self, pin: u8) -> u16 {
        self.state.analog.latest(pin)
    }

    pub fn analog_read(&mut self, pin: u8) -> u16 {
        self.state.analog.read(pin)
    }

    pub fn elapsed_audio_ticks(&self) -> u32 {
        self.output.count()
    }

    pub fn elapsed_micros(&self) -> u64 {
        micros_for(self.output.count(), self.audio_rate)
    }

    pub fn synth(&self) -> &S {
        &self.state.synth
    }

    pub fn synth_mut(&mut self) -> &mut S {
        &mut self.state.synth
    }
}

/// Drain half of a split engine. Call [`drain()`](Self::drain) from the
/// audio-rate interrupt, or [`fill()`](Self::fill) from a DMA/I2S refill handler.
pub struct Drain<'e, F, O, const N: usize> {
    input_enabled: bool,
    policy: UnderrunPolicy,
    output: Reader<'e, F, N>,
    input: Writer<'e, u16, N>,
    state: &'e mut DrainState<F, O>,
}

impl<F: AudioFrame, O: AudioSink<F>, const N: usize> Drain<'_, F, O, N> {
    /// Hand one frame to the sink, applying the underrun policy if the buffer is empty.
    #[inline]
    pub fn drain(&mut self) {
        let frame = self.next_frame().unwrap_or_else(|fallback| fallback);
        self.state.sink.write(frame);
    }

    /// Fill `frames` for a self-paced peripheral, bypassing the sink.
    ///
    /// Slots with no buffered frame get the underrun fallback. Returns how many
    /// slots were filled from the buffer.
    pub fn fill(&mut self, frames: &mut [F]) -> usize {
        let mut filled = 0;
        for slot in frames.iter_mut() {
            *slot = match self.next_frame() {
                Ok(frame) => {
                    filled += 1;
                    frame
                }
                Err(fallback) => fallback,
            };
        }
        filled
    }

    /// `Ok` with the next buffered frame, or `Err` with the fallback frame.
    #[inline(always)]
    fn next_frame(&mut self) -> Result<F, F> {
        match self.output.read() {
            Some(frame) => {
                self.state.last = frame;
                Ok(frame)
            }
            None => {
                self.state.underruns = self.state.underruns.wrapping_add(1);
                Err(match self.policy {
                    UnderrunPolicy::RepeatLast => self.state.last,
                    UnderrunPolicy::Silence => F::SILENCE,
                })
            }
        }
    }

    /// Queue a captured audio input sample for the foreground to latch.
    ///
    /// Dropped when audio input is disabled or the input buffer is full.
    #[inline]
    pub fn capture_input(&mut self, sample: u16) {
        if self.input_enabled && !self.input.is_full() {
            self.input.write(sample);
        }
    }

    pub fn underruns(&self) -> u32 {
        self.state.underruns
    }

    pub fn sink(&self) -> &O {
        &self.state.sink
    }

    pub fn sink_mut(&mut self) -> &mut O {
        &mut self.state.sink
    }
}
