//! PPTX archive reading and document assembly.

use deck_core::{DeckFormat, Document, Error, Result, SlideOrder};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use std::sync::LazyLock;
use zip::ZipArchive;

use crate::text::extract_run_text;

/// Archive paths holding slide content.
static SLIDE_PART_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ppt/slides/slide\d+\.xml$").unwrap());

const PRESENTATION_PATH: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";

/// One slide part's raw XML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidePart {
    /// Path inside the archive, e.g. `ppt/slides/slide1.xml`.
    pub path: String,

    /// Decoded XML text.
    pub xml: String,
}

/// An opened `.pptx` container.
pub struct SlideArchive<R> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> SlideArchive<R> {
    /// Open a ZIP container.
    pub fn open(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;
        Ok(Self { archive })
    }

    /// Read every slide part.
    ///
    /// With [`SlideOrder::Discovery`] parts come back in archive entry
    /// order, which is not guaranteed to match the order slides are shown.
    pub fn slide_parts(&mut self, order: SlideOrder) -> Result<Vec<SlidePart>> {
        let parts = self.discover_slide_parts()?;
        log::debug!("Found {} slide parts", parts.len());

        match order {
            SlideOrder::Discovery => Ok(parts),
            SlideOrder::Presentation => match self.presentation_order() {
                Ok(paths) => Ok(order_parts(parts, &paths)),
                Err(e) => {
                    log::warn!("Falling back to archive order: {}", e);
                    Ok(parts)
                }
            },
        }
    }

    fn discover_slide_parts(&mut self) -> Result<Vec<SlidePart>> {
        let mut parts = Vec::new();

        for index in 0..self.archive.len() {
            let mut file = self
                .archive
                .by_index(index)
                .map_err(|e| Error::ZipError(format!("Failed to read entry {}: {}", index, e)))?;

            if !SLIDE_PART_REGEX.is_match(file.name()) {
                continue;
            }

            let path = file.name().to_string();
            let mut xml = String::new();
            file.read_to_string(&mut xml)
                .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;
            parts.push(SlidePart { path, xml });
        }

        Ok(parts)
    }

    /// Slide paths in the order `presentation.xml` lists them.
    fn presentation_order(&mut self) -> Result<Vec<String>> {
        let presentation = self.read_file_from_archive(PRESENTATION_PATH)?;
        let rels = self.read_file_from_archive(PRESENTATION_RELS_PATH)?;

        let targets = parse_relationship_targets(&rels)?;
        let ids = parse_slide_id_list(&presentation)?;

        Ok(ids
            .iter()
            .filter_map(|id| match targets.get(id) {
                Some(path) => Some(path.clone()),
                None => {
                    log::warn!("Slide relationship '{}' has no target", id);
                    None
                }
            })
            .collect())
    }

    fn read_file_from_archive(&mut self, path: &str) -> Result<String> {
        let mut file = self
            .archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

/// Turns `.pptx` files into documents.
#[derive(Debug, Clone, Default)]
pub struct PptxParser {
    slide_order: SlideOrder,
}

impl PptxParser {
    /// Create a parser that reads slides in archive order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose how slide parts are ordered.
    pub fn with_slide_order(mut self, order: SlideOrder) -> Self {
        self.slide_order = order;
        self
    }

    /// Check the file name, read the file, and parse it.
    pub fn open(&self, path: &Path) -> Result<Document> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        DeckFormat::check_filename(&filename)?;

        let bytes = std::fs::read(path)?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());
        self.parse_bytes(&bytes)
    }

    /// Parse an in-memory `.pptx` blob.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Document> {
        DeckFormat::check_magic(bytes)?;
        self.parse(Cursor::new(bytes))
    }

    /// Parse a `.pptx` from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<Document> {
        let mut archive = SlideArchive::open(reader)?;
        let parts = archive.slide_parts(self.slide_order)?;

        let fragments = parts
            .iter()
            .map(|part| {
                extract_run_text(&part.xml).map_err(|e| match e {
                    Error::XmlError(msg) => Error::XmlError(format!("{}: {}", part.path, msg)),
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let document = Document::from_fragments(&fragments);
        log::debug!(
            "Assembled {} words from {} slides",
            document.word_count(),
            fragments.len()
        );
        Ok(document)
    }
}

/// Arrange `parts` to follow `paths`, keeping unlisted parts at the end in
/// their original order.
fn order_parts(parts: Vec<SlidePart>, paths: &[String]) -> Vec<SlidePart> {
    let mut remaining: Vec<Option<SlidePart>> = parts.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(remaining.len());

    for path in paths {
        if let Some(slot) = remaining
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|p| &p.path == path))
        {
            ordered.extend(slot.take());
        }
    }
    ordered.extend(remaining.into_iter().flatten());
    ordered
}

/// Map relationship ids to archive paths for slide relationships.
fn parse_relationship_targets(rels: &str) -> Result<HashMap<String, String>> {
    let mut targets = HashMap::new();
    let mut reader = Reader::from_str(rels);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut rel_type = String::new();
                let mut target = String::new();
                let mut id = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Type" => rel_type = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                        _ => {}
                    }
                }

                if rel_type.ends_with("/slide") {
                    targets.insert(id, resolve_target(&target));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(targets)
}

/// Relationship ids of `p:sldId` entries, in presentation order.
fn parse_slide_id_list(presentation: &str) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(presentation);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                let rel_id = e
                    .attributes()
                    .flatten()
                    .find(|attr| attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id")
                    .map(|attr| String::from_utf8_lossy(&attr.value).to_string());

                if let Some(rel_id) = rel_id {
                    ids.push(rel_id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Resolve a relationship target against the `ppt/` directory.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{}", target),
    }
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}
