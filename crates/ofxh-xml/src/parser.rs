use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::XmlError;

/// Receives the three incremental parse events the original `expat`-backed
/// reader dispatches: element start (with its attributes already decoded),
/// character data, and element end (§4.C: "parsing is incremental").
pub trait XmlVisitor {
    fn element_begin(&mut self, name: &str, attrs: &[(String, String)]);
    fn characters(&mut self, text: &str);
    fn element_end(&mut self, name: &str);
}

/// Drives `visitor` over `xml`. A malformed document stops parsing
/// immediately and returns an error; per §4.C the caller discards the
/// whole cache rather than salvaging a partial parse.
pub fn parse_incremental(xml: &[u8], visitor: &mut dyn XmlVisitor) -> Result<(), XmlError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let attrs = decode_attrs(&e, &reader)?;
                visitor.element_begin(&name, &attrs);
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let attrs = decode_attrs(&e, &reader)?;
                visitor.element_begin(&name, &attrs);
                visitor.element_end(&name);
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(XmlError::Malformed)?;
                if !text.is_empty() {
                    visitor.characters(&text);
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                visitor.element_end(&name);
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(XmlError::Malformed(err)),
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}

fn decode_attrs(
    start: &quick_xml::events::BytesStart<'_>,
    reader: &Reader<&[u8]>,
) -> Result<Vec<(String, String)>, XmlError> {
    let mut out = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::Malformed(quick_xml::Error::from(e)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(XmlError::Malformed)?
            .into_owned();
        out.push((key, value));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl XmlVisitor for Recorder {
        fn element_begin(&mut self, name: &str, attrs: &[(String, String)]) {
            self.events
                .push(format!("begin {name} {:?}", attrs));
        }
        fn characters(&mut self, text: &str) {
            if !text.trim().is_empty() {
                self.events.push(format!("chars {text}"));
            }
        }
        fn element_end(&mut self, name: &str) {
            self.events.push(format!("end {name}"));
        }
    }

    #[test]
    fn parses_nested_elements_with_attributes() {
        let xml = br#"<cache version="1"><bundle><binary path="a" bundle_path="b" mtime="0" size="0"/></bundle></cache>"#;
        let mut rec = Recorder::default();
        parse_incremental(xml, &mut rec).unwrap();
        assert_eq!(rec.events[0], "begin cache [(\"version\", \"1\")]");
        assert!(rec.events.iter().any(|e| e.starts_with("begin binary")));
        assert!(rec.events.iter().any(|e| e == "end binary"));
        assert_eq!(*rec.events.last().unwrap(), "end cache");
    }

    #[test]
    fn decodes_escaped_attribute_values() {
        let xml = br#"<property value="a &amp; b"/>"#;
        let mut rec = Recorder::default();
        parse_incremental(xml, &mut rec).unwrap();
        assert!(rec.events[0].contains("a & b"));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let xml = br#"<cache><unterminated"#;
        let mut rec = Recorder::default();
        assert!(parse_incremental(xml, &mut rec).is_err());
    }
}
