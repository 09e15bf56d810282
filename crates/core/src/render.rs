//! Display units and exclusive word highlighting.

use crate::Document;

/// One addressable word on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayUnit {
    /// Word index in the document.
    pub index: usize,

    /// The word followed by a single space.
    pub text: String,
}

/// Projects a document into display units and tracks which one is highlighted.
#[derive(Debug, Clone)]
pub struct Renderer {
    units: Vec<DisplayUnit>,
    highlighted: Option<usize>,
    open_marker: String,
    close_marker: String,
}

impl Renderer {
    /// Build one unit per word, in word order.
    pub fn new(document: &Document) -> Self {
        let units = document
            .words()
            .iter()
            .enumerate()
            .map(|(index, word)| DisplayUnit {
                index,
                text: format!("{} ", word),
            })
            .collect();

        Self {
            units,
            highlighted: None,
            open_marker: "[".to_string(),
            close_marker: "]".to_string(),
        }
    }

    /// Set the markers placed around the highlighted word.
    pub fn with_markers(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.open_marker = open.into();
        self.close_marker = close.into();
        self
    }

    pub fn units(&self) -> &[DisplayUnit] {
        &self.units
    }

    /// Index of the highlighted unit, if any.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Highlight the unit at `index`, clearing any other highlight.
    ///
    /// An index without a unit clears the highlight.
    pub fn highlight(&mut self, index: usize) {
        self.highlighted = (index < self.units.len()).then_some(index);
    }

    /// Remove the highlight.
    pub fn clear(&mut self) {
        self.highlighted = None;
    }

    /// Render the whole document with the highlighted word marked.
    pub fn render(&self) -> String {
        self.render_range(0, self.units.len())
    }

    /// Render up to `radius` units either side of `center`.
    pub fn window(&self, center: usize, radius: usize) -> String {
        let start = center.saturating_sub(radius);
        let end = center.saturating_add(radius).saturating_add(1);
        self.render_range(start, end.min(self.units.len()))
    }

    fn render_range(&self, start: usize, end: usize) -> String {
        let mut out = String::new();
        for unit in self.units.get(start..end).unwrap_or_default() {
            if self.highlighted == Some(unit.index) {
                out.push_str(&self.open_marker);
                out.push_str(unit.text.trim_end());
                out.push_str(&self.close_marker);
                out.push(' ');
            } else {
                out.push_str(&unit.text);
            }
        }
        out.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> Renderer {
        Renderer::new(&Document::from_text("Hello world from slides"))
    }

    #[test]
    fn test_one_unit_per_word() {
        let r = renderer();
        assert_eq!(r.units().len(), 4);
        assert_eq!(
            r.units()[1],
            DisplayUnit {
                index: 1,
                text: "world ".to_string()
            }
        );
    }

    #[test]
    fn test_highlight_is_exclusive() {
        let mut r = renderer();
        r.highlight(1);
        r.highlight(3);
        assert_eq!(r.highlighted(), Some(3));
        assert_eq!(r.render(), "Hello world from [slides]");
    }

    #[test]
    fn test_highlight_past_end_clears() {
        let mut r = renderer();
        r.highlight(2);
        r.highlight(4);
        assert_eq!(r.highlighted(), None);
    }

    #[test]
    fn test_clear() {
        let mut r = renderer();
        r.highlight(0);
        r.clear();
        assert_eq!(r.render(), "Hello world from slides");
    }

    #[test]
    fn test_window() {
        let mut r = renderer().with_markers("<<", ">>");
        r.highlight(2);
        assert_eq!(r.window(2, 1), "world <<from>> slides");
        assert_eq!(r.window(0, 1), "Hello world");
        assert_eq!(r.window(10, 1), "");
    }
}
