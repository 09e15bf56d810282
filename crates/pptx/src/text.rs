//! Run-text extraction from slide XML.

use deck_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Qualified name of a DrawingML run-text element.
const RUN_TEXT: &[u8] = b"a:t";

/// Collect the content of every `a:t` element in document order.
///
/// Each element's text is followed by a single space, so adjacent runs
/// never merge into one word. Empty elements still contribute the space.
pub fn extract_run_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == RUN_TEXT => {
                in_run_text = true;
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == RUN_TEXT => {
                in_run_text = false;
                text.push(' ');
            }
            Ok(Event::Empty(ref e)) if e.name().as_ref() == RUN_TEXT => {
                text.push(' ');
            }
            Ok(Event::Text(ref e)) if in_run_text => {
                let unescaped = e
                    .unescape()
                    .map_err(|e| Error::XmlError(format!("Bad entity in run text: {}", e)))?;
                text.push_str(&unescaped);
            }
            Ok(Event::CData(e)) if in_run_text => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>
    <p:sp><p:txBody>
      <a:p><a:r><a:rPr lang="en-US"/><a:t>Quarterly</a:t></a:r><a:r><a:t>Review</a:t></a:r></a:p>
    </p:txBody></p:sp>
    <p:sp><p:txBody>
      <a:p><a:r><a:t>Revenue &amp; growth</a:t></a:r></a:p>
      <a:p><a:fld type="slidenum"><a:t>3</a:t></a:fld></a:p>
    </p:txBody></p:sp>
  </p:spTree></p:cSld>
</p:sld>"#;

    #[test]
    fn test_collects_runs_in_order() {
        let text = extract_run_text(SLIDE).unwrap();
        assert_eq!(text, "Quarterly Review Revenue & growth 3 ");
    }

    #[test]
    fn test_split_runs_stay_separate_words() {
        let xml = r#"<a:p><a:r><a:t>Hel</a:t></a:r><a:r><a:t>lo</a:t></a:r></a:p>"#;
        assert_eq!(extract_run_text(xml).unwrap(), "Hel lo ");
    }

    #[test]
    fn test_ignores_text_outside_runs() {
        let xml = r#"<p:sp><p:nvSpPr><p:cNvPr name="Title 1"/></p:nvSpPr>stray<a:t>kept</a:t></p:sp>"#;
        assert_eq!(extract_run_text(xml).unwrap(), "kept ");
    }

    #[test]
    fn test_empty_and_self_closing_runs() {
        let xml = r#"<a:p><a:t></a:t><a:t/><a:t>x</a:t></a:p>"#;
        assert_eq!(extract_run_text(xml).unwrap(), "  x ");
    }

    #[test]
    fn test_other_namespaces_are_not_run_text() {
        let xml = r#"<root><m:t>math</m:t><a:t>text</a:t></root>"#;
        assert_eq!(extract_run_text(xml).unwrap(), "text ");
    }

    #[test]
    fn test_cdata() {
        let xml = r#"<a:t><![CDATA[a < b]]></a:t>"#;
        assert_eq!(extract_run_text(xml).unwrap(), "a < b ");
    }

    #[test]
    fn test_no_run_text() {
        assert_eq!(extract_run_text("<p:sld/>").unwrap(), "");
    }

    #[test]
    fn test_malformed_xml() {
        let result = extract_run_text("<a:p><a:t>open</a:p>");
        assert!(matches!(result, Err(Error::XmlError(_))));
    }
}
