//! Voice enumeration and selection.

use crate::{Error, Result, Voice};

/// The voices an engine currently offers, plus the user's selection.
///
/// Engines may report voices late or change them during a session, so the
/// list is rebuilt wholesale on every [`refresh`](Self::refresh).
#[derive(Debug, Clone, Default)]
pub struct VoiceRegistry {
    voices: Vec<Voice>,
    selected: Option<usize>,
}

impl VoiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the voice list.
    ///
    /// A selected voice that is still offered stays selected. Otherwise the
    /// first voice becomes the selection.
    pub fn refresh(&mut self, voices: Vec<Voice>) {
        let previous = self.selected().cloned();
        self.voices = voices;
        self.selected = previous
            .and_then(|voice| self.voices.iter().position(|v| *v == voice))
            .or(if self.voices.is_empty() { None } else { Some(0) });

        log::debug!(
            "Voice list refreshed: {} voices, selected {:?}",
            self.voices.len(),
            self.selected().map(Voice::label)
        );
    }

    /// All voices in engine order.
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// `name (lang)` labels in engine order.
    pub fn labels(&self) -> Vec<String> {
        self.voices.iter().map(Voice::label).collect()
    }

    /// The selected voice, if the engine offers any.
    pub fn selected(&self) -> Option<&Voice> {
        self.selected.and_then(|i| self.voices.get(i))
    }

    /// Index of the selected voice.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Select the voice at `index`.
    pub fn select(&mut self, index: usize) -> Result<&Voice> {
        let voice = self.voices.get(index).ok_or(Error::UnknownVoice(index))?;
        self.selected = Some(index);
        Ok(voice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_voices() -> Vec<Voice> {
        vec![
            Voice::new("Alex", "en-US"),
            Voice::new("Amelie", "fr-CA"),
            Voice::new("Anna", "de-DE"),
        ]
    }

    #[test]
    fn test_empty_registry_has_no_selection() {
        let registry = VoiceRegistry::new();
        assert!(registry.selected().is_none());
        assert!(registry.labels().is_empty());
    }

    #[test]
    fn test_refresh_defaults_to_first() {
        let mut registry = VoiceRegistry::new();
        registry.refresh(sample_voices());
        assert_eq!(registry.selected_index(), Some(0));
        assert_eq!(registry.selected().map(|v| v.name.as_str()), Some("Alex"));
    }

    #[test]
    fn test_labels() {
        let mut registry = VoiceRegistry::new();
        registry.refresh(sample_voices());
        assert_eq!(
            registry.labels(),
            vec!["Alex (en-US)", "Amelie (fr-CA)", "Anna (de-DE)"]
        );
    }

    #[test]
    fn test_select_out_of_range() {
        let mut registry = VoiceRegistry::new();
        registry.refresh(sample_voices());
        assert!(matches!(registry.select(3), Err(Error::UnknownVoice(3))));
        assert_eq!(registry.selected_index(), Some(0));
    }

    #[test]
    fn test_refresh_keeps_existing_selection() {
        let mut registry = VoiceRegistry::new();
        registry.refresh(sample_voices());
        registry.select(2).unwrap();

        // Anna moves to the front of the new list
        registry.refresh(vec![Voice::new("Anna", "de-DE"), Voice::new("Alex", "en-US")]);
        assert_eq!(registry.selected_index(), Some(0));
        assert_eq!(registry.selected().map(|v| v.name.as_str()), Some("Anna"));
    }

    #[test]
    fn test_refresh_falls_back_when_selection_vanishes() {
        let mut registry = VoiceRegistry::new();
        registry.refresh(sample_voices());
        registry.select(1).unwrap();

        registry.refresh(vec![Voice::new("Daniel", "en-GB")]);
        assert_eq!(registry.selected().map(|v| v.name.as_str()), Some("Daniel"));

        registry.refresh(Vec::new());
        assert!(registry.selected().is_none());
    }
}
