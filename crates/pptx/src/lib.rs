//! PPTX (Office Open XML) text extraction for the slide deck reader.
//!
//! A `.pptx` is a ZIP archive; slide content lives in
//! `ppt/slides/slideN.xml`, with visible text in DrawingML `a:t` runs.

pub mod parser;
pub mod text;

pub use parser::{PptxParser, SlideArchive, SlidePart};
pub use text::extract_run_text;
