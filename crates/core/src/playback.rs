//! Playback control and word highlighting.
//!
//! [`PlaybackController`] owns everything that changes while a deck is being
//! read: the playback position, the state machine, the speaking rate and
//! the voice selection. A [`SpeechEngine`] speaks utterances and reports
//! progress back as [`EngineEvent`]s, which the caller feeds into
//! [`PlaybackController::handle_event`] from the same thread that issues
//! user commands.

use crate::{
    Document, EngineEvent, Error, PlaybackState, ReaderConfig, Renderer, Result, Utterance,
    Voice, VoiceRegistry, MAX_RATE, MIN_RATE,
};

/// A text-to-speech backend.
///
/// Engines speak asynchronously and report progress out of band. After
/// `cancel` returns, the engine must not start speaking the cancelled
/// utterance again; events it still delivers for it are discarded by id.
pub trait SpeechEngine {
    /// Voices the engine currently offers.
    fn voices(&self) -> Vec<Voice>;

    /// Start speaking an utterance.
    fn speak(&mut self, utterance: Utterance);

    /// Pause the current utterance.
    fn pause(&mut self);

    /// Resume a paused utterance.
    fn resume(&mut self);

    /// Drop the current utterance, if any.
    fn cancel(&mut self);
}

/// Reject rates outside `MIN_RATE..=MAX_RATE`, including NaN.
pub fn check_rate(rate: f32) -> Result<()> {
    if (MIN_RATE..=MAX_RATE).contains(&rate) {
        Ok(())
    } else {
        Err(Error::InvalidRate(rate))
    }
}

/// The utterance the engine is working on, where it began, and the
/// bindings it was spoken with.
#[derive(Debug, Clone)]
struct ActiveUtterance {
    id: u64,
    start: usize,
    rate: f32,
    voice: Option<Voice>,
}

/// Drives a speech engine over a loaded document.
pub struct PlaybackController<E: SpeechEngine> {
    engine: E,
    document: Document,
    renderer: Renderer,
    voices: VoiceRegistry,
    rate: f32,
    step: usize,
    position: usize,
    state: PlaybackState,
    active: Option<ActiveUtterance>,
    next_id: u64,
}

impl<E: SpeechEngine> PlaybackController<E> {
    /// Create a controller for `document`, idle at position 0.
    pub fn new(engine: E, document: Document, config: &ReaderConfig) -> Self {
        let renderer = Renderer::new(&document)
            .with_markers(config.highlight_open.as_str(), config.highlight_close.as_str());

        let mut voices = VoiceRegistry::new();
        voices.refresh(engine.voices());

        Self {
            engine,
            document,
            renderer,
            voices,
            rate: config.default_rate,
            step: config.step_words.max(1),
            position: 0,
            state: PlaybackState::Idle,
            active: None,
            next_id: 1,
        }
    }

    /// Start or resume reading from the current position.
    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Playing => {}
            PlaybackState::Paused if self.bindings_changed() => {
                log::debug!(
                    "Rate or voice changed while paused; restarting at word {}",
                    self.position
                );
                self.restart_from(self.position);
            }
            PlaybackState::Paused => {
                log::debug!("Resuming at word {}", self.position);
                self.engine.resume();
                self.state = PlaybackState::Playing;
            }
            PlaybackState::Idle => self.start(),
        }
    }

    /// Pause reading. Does nothing unless playing.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            log::debug!("Pausing at word {}", self.position);
            self.engine.pause();
            self.state = PlaybackState::Paused;
        }
    }

    /// Cancel reading and return to the start of the document.
    pub fn stop(&mut self) {
        self.engine.cancel();
        self.reset();
    }

    /// Jump back one step and read from there.
    pub fn rewind(&mut self) {
        self.restart_from(self.position.saturating_sub(self.step));
    }

    /// Jump forward one step and read from there.
    ///
    /// The position is capped at the word count, one past the last word, in
    /// which case the engine is handed an empty utterance and playback ends.
    pub fn fast_forward(&mut self) {
        let target = self
            .position
            .saturating_add(self.step)
            .min(self.document.word_count());
        self.restart_from(target);
    }

    /// Read from the word at `index`.
    pub fn seek(&mut self, index: usize) {
        self.restart_from(index.min(self.document.word_count()));
    }

    /// Change the speaking rate, restarting playback if it is running.
    ///
    /// While paused the new rate takes effect on the next `play`.
    pub fn set_rate(&mut self, rate: f32) -> Result<()> {
        check_rate(rate)?;
        self.rate = rate;
        if self.state == PlaybackState::Playing {
            self.restart_from(self.position);
        }
        Ok(())
    }

    /// Select the voice at `index`, restarting playback if it is running.
    ///
    /// While paused the new voice takes effect on the next `play`.
    pub fn set_voice(&mut self, index: usize) -> Result<()> {
        let label = self.voices.select(index)?.label();
        log::debug!("Selected voice {}", label);
        if self.state == PlaybackState::Playing {
            self.restart_from(self.position);
        }
        Ok(())
    }

    /// Re-enumerate the engine's voices.
    pub fn refresh_voices(&mut self) {
        let voices = self.engine.voices();
        self.voices.refresh(voices);
    }

    /// Apply an engine notification.
    ///
    /// Returns `true` if the event belonged to the current utterance and was
    /// applied.
    pub fn handle_event(&mut self, event: EngineEvent) -> bool {
        let Some((id, start)) = self
            .active
            .as_ref()
            .filter(|a| a.id == event.utterance())
            .map(|a| (a.id, a.start))
        else {
            log::debug!("Ignoring event for superseded utterance: {:?}", event);
            return false;
        };

        match event {
            EngineEvent::Boundary { char_index, .. } => {
                match self.document.word_at_offset(start, char_index) {
                    Some(index) => {
                        self.position = index;
                        self.renderer.highlight(index);
                    }
                    None => log::warn!(
                        "Boundary offset {} is past the end of utterance {}",
                        char_index,
                        id
                    ),
                }
            }
            EngineEvent::End { .. } => {
                log::debug!("Utterance {} finished", id);
                self.reset();
            }
        }
        true
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current word index, between 0 and the word count inclusive.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn voices(&self) -> &VoiceRegistry {
        &self.voices
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Submit an utterance from the current position.
    fn start(&mut self) {
        let id = self.next_id;
        self.next_id += 1;

        let utterance = Utterance {
            id,
            text: self.document.utterance_text(self.position),
            rate: self.rate,
            voice: self.voices.selected().cloned(),
        };

        log::debug!(
            "Speaking utterance {} from word {} at rate {}",
            id,
            self.position,
            self.rate
        );

        self.active = Some(ActiveUtterance {
            id,
            start: self.position,
            rate: utterance.rate,
            voice: utterance.voice.clone(),
        });
        self.renderer.highlight(self.position);
        self.state = PlaybackState::Playing;
        self.engine.speak(utterance);
    }

    /// Whether the rate or voice differs from what the paused utterance
    /// was spoken with.
    fn bindings_changed(&self) -> bool {
        self.active.as_ref().is_some_and(|a| {
            a.rate != self.rate || a.voice.as_ref() != self.voices.selected()
        })
    }

    /// Cancel whatever is in flight and start again at `position`.
    fn restart_from(&mut self, position: usize) {
        self.engine.cancel();
        self.active = None;
        self.renderer.clear();
        self.state = PlaybackState::Idle;
        self.position = position;
        self.start();
    }

    fn reset(&mut self) {
        self.active = None;
        self.position = 0;
        self.state = PlaybackState::Idle;
        self.renderer.clear();
    }
}
