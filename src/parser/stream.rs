use std::io::BufRead;

use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::classify::{classify, is_record_tag, ElementKind};
use super::tree::Element;
use crate::error::{ExtractError, Result};

/// Receives every closed record element (`room`, `class`, `constraint`,
/// `student`) together with its classification.
pub trait Visitor {
    fn visit(&mut self, kind: ElementKind, el: &Element) -> Result<()>;
}

/// Walk the document once in document order.
///
/// A record tag seen outside any open scope starts a scope; its subtree is
/// built as an owned [`Element`] tree. Each element closed inside a scope is
/// classified: definitions are visited and then cleared in place, references
/// are kept intact in their parent so the enclosing definition can read them
/// when it closes. The tree is dropped when the scope root closes.
///
/// Names and values are decoded with the encoding the document declares.
pub fn walk<R: BufRead, V: Visitor>(source: R, visitor: &mut V) -> Result<()> {
    let mut reader = Reader::from_reader(source);
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut scope: Vec<Element> = Vec::new();

    loop {
        let position = reader.buffer_position() as u64;
        let decoder = reader.decoder();
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|source| ExtractError::Xml {
                position: reader.error_position() as u64,
                source,
            })?;

        match event {
            Event::Start(e) => {
                depth += 1;
                let name = local_name(&e, decoder, position)?;
                if !scope.is_empty() || is_record_tag(&name) {
                    scope.push(open(name, &e, decoder, position)?);
                }
            }
            Event::Empty(e) => {
                let name = local_name(&e, decoder, position)?;
                if !scope.is_empty() || is_record_tag(&name) {
                    let el = open(name, &e, decoder, position)?;
                    close(el, &mut scope, visitor)?;
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if let Some(el) = scope.pop() {
                    close(el, &mut scope, visitor)?;
                }
            }
            Event::Text(t) => {
                if let Some(top) = scope.last_mut() {
                    let text = t
                        .unescape()
                        .map_err(|source| ExtractError::Xml { position, source })?;
                    top.push_text(&text);
                }
            }
            Event::CData(c) => {
                if let Some(top) = scope.last_mut() {
                    let text = c
                        .decode()
                        .map_err(|e| ExtractError::Xml { position, source: e.into() })?;
                    top.push_text(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if depth > 0 {
        return Err(ExtractError::Truncated { depth });
    }
    Ok(())
}

fn decode(decoder: Decoder, bytes: &[u8], position: u64) -> Result<String> {
    decoder
        .decode(bytes)
        .map(|s| s.into_owned())
        .map_err(|e| ExtractError::Xml { position, source: e.into() })
}

fn local_name(e: &BytesStart, decoder: Decoder, position: u64) -> Result<String> {
    decode(decoder, e.local_name().as_ref(), position)
}

fn open(name: String, start: &BytesStart, decoder: Decoder, position: u64) -> Result<Element> {
    let mut el = Element::new(name);
    for attr in start.attributes() {
        let attr = attr?;
        let key = decode(decoder, attr.key.as_ref(), position)?;
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|source| ExtractError::Xml { position, source })?
            .into_owned();
        el.attrs.push((key, value));
    }
    Ok(el)
}

fn close<V: Visitor>(mut el: Element, scope: &mut [Element], visitor: &mut V) -> Result<()> {
    let kind = classify(&el);
    if kind != ElementKind::Other {
        visitor.visit(kind, &el)?;
    }
    if kind.is_definition() {
        el.clear();
    }
    if let Some(parent) = scope.last_mut() {
        parent.children.push(el);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records what each visit saw, including the children present at that
    /// moment.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<(ElementKind, Option<String>, usize)>,
    }

    impl Visitor for Recorder {
        fn visit(&mut self, kind: ElementKind, el: &Element) -> Result<()> {
            self.seen
                .push((kind, el.attr("id").map(str::to_string), el.children.len()));
            Ok(())
        }
    }

    fn record(xml: &str) -> Vec<(ElementKind, Option<String>, usize)> {
        let mut rec = Recorder::default();
        walk(xml.as_bytes(), &mut rec).unwrap();
        rec.seen
    }

    #[test]
    fn references_reach_their_parent() {
        let seen = record(
            r#"<problem><classes>
                 <class id="C1" classLimit="10">
                   <room id="R1" pref="0"/>
                   <room id="R2" pref="1"/>
                   <time days="1" start="1" length="1"/>
                 </class>
               </classes></problem>"#,
        );
        assert_eq!(
            seen,
            vec![
                (ElementKind::RoomReference, Some("R1".into()), 0),
                (ElementKind::RoomReference, Some("R2".into()), 0),
                (ElementKind::ClassDefinition, Some("C1".into()), 3),
            ]
        );
    }

    #[test]
    fn nested_definition_is_cleared_before_parent_reads_it() {
        struct StudentChildren(Vec<Element>);
        impl Visitor for StudentChildren {
            fn visit(&mut self, kind: ElementKind, el: &Element) -> Result<()> {
                if kind == ElementKind::Student {
                    self.0 = el.children.clone();
                }
                Ok(())
            }
        }

        let xml = r#"<student id="S1"><class id="C1" classLimit="5"/><class id="C2"/></student>"#;
        assert_eq!(record(xml)[0].0, ElementKind::ClassDefinition);

        let mut children = StudentChildren(Vec::new());
        walk(xml.as_bytes(), &mut children).unwrap();
        assert_eq!(children.0[0], Element::new("class"));
        assert_eq!(children.0[1].attr("id"), Some("C2"));
    }

    #[test]
    fn namespace_prefix_is_stripped() {
        let seen = record(
            r#"<t:problem xmlns:t="urn:tt"><t:rooms><t:room id="R1" capacity="3"/></t:rooms></t:problem>"#,
        );
        assert_eq!(seen, vec![(ElementKind::RoomDefinition, Some("R1".into()), 0)]);
    }

    #[test]
    fn text_and_entities() {
        struct Pattern(Option<String>);
        impl Visitor for Pattern {
            fn visit(&mut self, _: ElementKind, el: &Element) -> Result<()> {
                self.0 = el
                    .first_child("sharing")
                    .and_then(|s| s.first_child("pattern"))
                    .and_then(|p| p.text.clone());
                Ok(())
            }
        }
        let mut p = Pattern(None);
        let xml = r#"<room id="R&amp;D" capacity="1"><sharing><pattern unit="6"> 10&lt;01 </pattern></sharing></room>"#;
        walk(xml.as_bytes(), &mut p).unwrap();
        assert_eq!(p.0.as_deref(), Some(" 10<01 "));
    }

    #[test]
    fn latin1_document_is_decoded() {
        struct Seen(Vec<(Option<String>, Option<String>)>);
        impl Visitor for Seen {
            fn visit(&mut self, _: ElementKind, el: &Element) -> Result<()> {
                let pattern = el
                    .first_child("sharing")
                    .and_then(|s| s.first_child("pattern"))
                    .and_then(|p| p.text.clone());
                self.0.push((el.attr("id").map(str::to_string), pattern));
                Ok(())
            }
        }

        let xml: &[u8] = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\
            <t><room id=\"R\xE9\" capacity=\"3\"><sharing><pattern>\xE0b</pattern></sharing></room></t>";
        let mut seen = Seen(Vec::new());
        walk(xml, &mut seen).unwrap();
        assert_eq!(seen.0, vec![(Some("R\u{e9}".into()), Some("\u{e0}b".into()))]);
    }

    #[test]
    fn elements_outside_records_are_ignored() {
        let seen = record(r#"<problem><offerings><offering id="O1"><config/></offering></offerings></problem>"#);
        assert!(seen.is_empty());
    }

    #[test]
    fn malformed_document_aborts() {
        let mut rec = Recorder::default();
        let err = walk(r#"<problem><room capacity="1"></class></problem>"#.as_bytes(), &mut rec);
        assert!(matches!(err, Err(ExtractError::Xml { .. })));
    }

    #[test]
    fn truncated_document_aborts() {
        let mut rec = Recorder::default();
        let err = walk(r#"<problem><rooms><room id="R1" capacity="1"/>"#.as_bytes(), &mut rec);
        assert!(err.is_err());
    }
}
