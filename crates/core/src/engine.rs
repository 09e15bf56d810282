//! A speech engine that paces through an utterance word by word.
//!
//! [`PacedEngine`] does not produce audio. It walks each utterance on a
//! worker thread at a fixed interval per word (scaled by the rate) and
//! reports word boundaries and completion exactly as a synthesizer would,
//! so the reader can run anywhere a platform voice is unavailable.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crate::{EngineEvent, SpeechEngine, Utterance, Voice};

/// Callback receiving engine notifications from worker threads.
pub type EventSink = Arc<dyn Fn(EngineEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Running,
    Paused,
    Cancelled,
}

/// Pause/cancel signal shared with one worker.
#[derive(Debug)]
struct Control {
    state: Mutex<RunState>,
    changed: Condvar,
}

impl Control {
    fn new() -> Self {
        Self {
            state: Mutex::new(RunState::Running),
            changed: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RunState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set(&self, next: RunState) {
        let mut state = self.lock();
        if *state != RunState::Cancelled {
            *state = next;
        }
        self.changed.notify_all();
    }

    /// Block while paused. Returns `false` once cancelled.
    fn wait_running(&self) -> bool {
        let state = self
            .changed
            .wait_while(self.lock(), |s| *s == RunState::Paused)
            .unwrap_or_else(PoisonError::into_inner);
        *state == RunState::Running
    }

    /// Sleep for `interval` of running time. Time spent paused does not
    /// count. Returns `false` once cancelled.
    fn sleep(&self, interval: Duration) -> bool {
        let mut remaining = interval;
        let mut state = self.lock();

        loop {
            let started = Instant::now();
            let (guard, wait) = self
                .changed
                .wait_timeout_while(state, remaining, |s| *s == RunState::Running)
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;

            match *state {
                RunState::Cancelled => return false,
                RunState::Running if wait.timed_out() => return true,
                _ => {}
            }

            remaining = remaining.saturating_sub(started.elapsed());
            state = self
                .changed
                .wait_while(state, |s| *s == RunState::Paused)
                .unwrap_or_else(PoisonError::into_inner);

            if *state == RunState::Cancelled {
                return false;
            }
            if remaining.is_zero() {
                return true;
            }
        }
    }
}

/// Timer-driven engine that emits boundary and end events.
pub struct PacedEngine {
    voices: Vec<Voice>,
    word_interval: Duration,
    sink: EventSink,
    current: Option<Arc<Control>>,
}

impl PacedEngine {
    /// Create an engine that spends `word_interval` on each word at rate 1.0.
    pub fn new<F>(word_interval: Duration, sink: F) -> Self
    where
        F: Fn(EngineEvent) + Send + Sync + 'static,
    {
        Self {
            voices: vec![Voice::new("Paced", "en-US")],
            word_interval,
            sink: Arc::new(sink),
            current: None,
        }
    }

    /// Replace the advertised voices.
    pub fn with_voices(mut self, voices: Vec<Voice>) -> Self {
        self.voices = voices;
        self
    }

    fn interval_for(&self, rate: f32) -> Duration {
        let rate = f64::from(rate).max(f64::EPSILON);
        Duration::from_secs_f64(self.word_interval.as_secs_f64() / rate)
    }
}

impl SpeechEngine for PacedEngine {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&mut self, utterance: Utterance) {
        self.cancel();

        let control = Arc::new(Control::new());
        let interval = self.interval_for(utterance.rate);
        let sink = Arc::clone(&self.sink);
        let worker_control = Arc::clone(&control);

        log::debug!(
            "Paced engine speaking utterance {} ({} chars, {:?} per word, voice {:?})",
            utterance.id,
            utterance.text.chars().count(),
            interval,
            utterance.voice.as_ref().map(Voice::label)
        );

        let spawned = thread::Builder::new()
            .name(format!("paced-utterance-{}", utterance.id))
            .spawn(move || run_utterance(&utterance, interval, &worker_control, sink.as_ref()));

        match spawned {
            Ok(_) => self.current = Some(control),
            Err(e) => log::error!("Failed to start speech worker: {}", e),
        }
    }

    fn pause(&mut self) {
        if let Some(control) = &self.current {
            control.set(RunState::Paused);
        }
    }

    fn resume(&mut self) {
        if let Some(control) = &self.current {
            control.set(RunState::Running);
        }
    }

    fn cancel(&mut self) {
        if let Some(control) = self.current.take() {
            control.set(RunState::Cancelled);
        }
    }
}

impl Drop for PacedEngine {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn run_utterance(
    utterance: &Utterance,
    interval: Duration,
    control: &Control,
    sink: &(dyn Fn(EngineEvent) + Send + Sync),
) {
    let mut offset = 0;
    for word in utterance.text.split(' ').filter(|w| !w.is_empty()) {
        if !control.wait_running() {
            return;
        }
        sink(EngineEvent::Boundary {
            utterance: utterance.id,
            char_index: offset,
        });
        offset += word.chars().count() + 1;

        if !control.sleep(interval) {
            return;
        }
    }

    if control.wait_running() {
        sink(EngineEvent::End {
            utterance: utterance.id,
        });
    }
}
