//! Streaming token source backed by quick-xml.

use std::collections::VecDeque;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use super::{QName, Token, TokenSource};
use crate::error::MalformedDocumentError;

/// Tokenizes XML from any buffered reader without building a DOM.
///
/// Element names are namespace-resolved. Namespace declarations are
/// consumed here and never surface as attributes; prefixed attributes are
/// named in Clark notation (see [`Token::Attribute`]). CDATA sections are
/// reported as text, line endings are normalized to `\n`, and entity and
/// character references are resolved.
pub struct XmlTokenSource<R: BufRead> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    pending: VecDeque<Token>,
    finished: bool,
}

impl<R: BufRead> XmlTokenSource<R> {
    /// Create a source reading from `input`.
    ///
    /// Pass `xml.as_bytes()` to tokenize an in-memory string.
    pub fn new(input: R) -> Self {
        let mut reader = NsReader::from_reader(input);
        let config = reader.config_mut();
        // Keep whitespace; the builder decides what is blank
        config.trim_text_start = false;
        config.trim_text_end = false;
        config.expand_empty_elements = true;
        // End-tag matching is the builder's job so every source reports it the same way
        config.check_end_names = false;

        Self {
            reader,
            buf: Vec::new(),
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// Read events until at least one token is queued or input ends.
    fn fill(&mut self) -> Result<(), MalformedDocumentError> {
        while self.pending.is_empty() && !self.finished {
            self.buf.clear();
            let position = self.reader.buffer_position();

            let (resolved, event) = self
                .reader
                .read_resolved_event_into(&mut self.buf)
                .map_err(|err| MalformedDocumentError::Syntax {
                    position,
                    message: err.to_string(),
                })?;

            match event {
                Event::Start(ref e) => {
                    let name = qualified_name(resolved, e, position)?;
                    self.pending.push_back(Token::Start(name));
                    push_attributes(&self.reader, e, position, &mut self.pending)?;
                }
                Event::Empty(ref e) => {
                    let name = qualified_name(resolved, e, position)?;
                    self.pending.push_back(Token::Start(name.clone()));
                    push_attributes(&self.reader, e, position, &mut self.pending)?;
                    self.pending.push_back(Token::End(name));
                }
                Event::End(ref e) => {
                    let namespace = namespace_of(resolved, position)?;
                    let local_name = e.local_name();
                    let local = utf8(local_name.as_ref(), position)?;
                    self.pending.push_back(Token::End(QName::new(namespace, local)));
                }
                Event::Text(ref e) => {
                    let text = utf8(e.as_ref(), position)?;
                    if !text.is_empty() {
                        self.pending.push_back(Token::Text(normalize_newlines(text)));
                    }
                }
                Event::CData(ref e) => {
                    let text = utf8(e.as_ref(), position)?;
                    if !text.is_empty() {
                        self.pending.push_back(Token::Text(normalize_newlines(text)));
                    }
                }
                Event::GeneralRef(ref e) => {
                    let name = utf8(e.as_ref(), position)?;
                    let text = resolve_reference(name)?;
                    self.pending.push_back(Token::Text(text));
                }
                Event::Eof => self.finished = true,
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
        }
        Ok(())
    }
}

impl<R: BufRead> TokenSource for XmlTokenSource<R> {
    fn next_token(&mut self) -> Result<Option<Token>, MalformedDocumentError> {
        self.fill()?;
        Ok(self.pending.pop_front())
    }
}

fn utf8(bytes: &[u8], position: u64) -> Result<&str, MalformedDocumentError> {
    std::str::from_utf8(bytes).map_err(|err| MalformedDocumentError::Syntax {
        position,
        message: format!("invalid UTF-8: {err}"),
    })
}

/// Map `\r\n` and lone `\r` to `\n`.
fn normalize_newlines(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}

fn namespace_of(
    resolved: ResolveResult<'_>,
    position: u64,
) -> Result<String, MalformedDocumentError> {
    match resolved {
        ResolveResult::Bound(namespace) => Ok(utf8(namespace.as_ref(), position)?.to_string()),
        ResolveResult::Unbound => Ok(String::new()),
        ResolveResult::Unknown(prefix) => Err(MalformedDocumentError::UndeclaredPrefix(
            String::from_utf8_lossy(&prefix).into_owned(),
        )),
    }
}

fn qualified_name(
    resolved: ResolveResult<'_>,
    start: &BytesStart<'_>,
    position: u64,
) -> Result<QName, MalformedDocumentError> {
    let namespace = namespace_of(resolved, position)?;
    let local_name = start.local_name();
    let local = utf8(local_name.as_ref(), position)?;
    Ok(QName::new(namespace, local))
}

fn push_attributes<R>(
    reader: &NsReader<R>,
    start: &BytesStart<'_>,
    position: u64,
    pending: &mut VecDeque<Token>,
) -> Result<(), MalformedDocumentError> {
    for attr in start.attributes() {
        let attr = attr.map_err(|err| MalformedDocumentError::InvalidAttribute(err.to_string()))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }

        let (resolved, local_name) = reader.resolve_attribute(attr.key);
        let namespace = namespace_of(resolved, position)?;
        let local = utf8(local_name.as_ref(), position)?;
        let name = QName::new(namespace, local).to_string();

        let value = attr
            .unescape_value()
            .map_err(|err| MalformedDocumentError::InvalidAttribute(format!("{name}: {err}")))?
            .into_owned();
        pending.push_back(Token::Attribute { name, value });
    }
    Ok(())
}

/// Expand a general entity or character reference (the text between `&` and `;`).
fn resolve_reference(name: &str) -> Result<String, MalformedDocumentError> {
    let predefined = match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => None,
    };
    if let Some(c) = predefined {
        return Ok(c.to_string());
    }

    let code = if let Some(hex) = name.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(decimal) = name.strip_prefix('#') {
        decimal.parse().ok()
    } else {
        return Err(MalformedDocumentError::UnknownEntity(name.to_string()));
    };

    code.and_then(char::from_u32)
        .filter(|c| is_xml_char(*c))
        .map(|c| c.to_string())
        .ok_or_else(|| MalformedDocumentError::InvalidCharReference(name.to_string()))
}

/// The XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(xml: &str) -> Result<Vec<Token>, MalformedDocumentError> {
        tokens_from_bytes(xml.as_bytes())
    }

    fn tokens_from_bytes(xml: &[u8]) -> Result<Vec<Token>, MalformedDocumentError> {
        let mut source = XmlTokenSource::new(xml);
        let mut tokens = Vec::new();
        while let Some(token) = source.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn attr(name: &str, value: &str) -> Token {
        Token::Attribute {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_start_attribute_text_end() {
        let tokens = tokens(r#"<newparam sid="p1">tex</newparam>"#).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Start(QName::local("newparam")),
                attr("sid", "p1"),
                Token::Text("tex".to_string()),
                Token::End(QName::local("newparam")),
            ]
        );
    }

    #[test]
    fn test_empty_element_expands() {
        let tokens = tokens(r#"<a><b c="1"/></a>"#).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Start(QName::local("a")),
                Token::Start(QName::local("b")),
                attr("c", "1"),
                Token::End(QName::local("b")),
                Token::End(QName::local("a")),
            ]
        );
    }

    #[test]
    fn test_default_namespace_resolved() {
        let xml = r#"<COLLADA xmlns="http://www.collada.org/2005/11/COLLADASchema" version="1.4.1"><asset/></COLLADA>"#;
        let tokens = tokens(xml).unwrap();
        let ns = "http://www.collada.org/2005/11/COLLADASchema";
        assert_eq!(
            tokens,
            vec![
                Token::Start(QName::new(ns, "COLLADA")),
                attr("version", "1.4.1"),
                Token::Start(QName::new(ns, "asset")),
                Token::End(QName::new(ns, "asset")),
                Token::End(QName::new(ns, "COLLADA")),
            ]
        );
    }

    #[test]
    fn test_prefixed_namespace_resolved() {
        let xml = r#"<x:a xmlns:x="urn:x"><x:b/></x:a>"#;
        let tokens = tokens(xml).unwrap();
        assert_eq!(tokens[0], Token::Start(QName::new("urn:x", "a")));
        assert_eq!(tokens[1], Token::Start(QName::new("urn:x", "b")));
    }

    #[test]
    fn test_undeclared_prefix() {
        let err = tokens("<y:a/>").unwrap_err();
        assert_eq!(err, MalformedDocumentError::UndeclaredPrefix("y".to_string()));
    }

    #[test]
    fn test_entities_and_cdata_become_text() {
        let tokens = tokens("<a>1 &lt; 2 &#x41;<![CDATA[<raw>]]></a>").unwrap();
        let text: String = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Text(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(text, "1 < 2 A<raw>");
    }

    #[test]
    fn test_attribute_entities_unescaped() {
        let tokens = tokens(r#"<a name="x &amp; y"/>"#).unwrap();
        assert_eq!(tokens[1], attr("name", "x & y"));
    }

    #[test]
    fn test_comments_and_declaration_skipped() {
        let tokens = tokens("<?xml version=\"1.0\"?><!-- hi --><a/>").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Start(QName::local("a")),
                Token::End(QName::local("a")),
            ]
        );
    }

    #[test]
    fn test_mismatched_end_passes_through() {
        // Matching is checked by the builder, not the tokenizer
        let tokens = tokens("<a></b>").unwrap();
        assert_eq!(tokens[1], Token::End(QName::local("b")));
    }

    #[test]
    fn test_invalid_attribute_syntax() {
        let err = tokens("<a b=1/>").unwrap_err();
        assert!(matches!(err, MalformedDocumentError::InvalidAttribute(_)));
    }

    #[test]
    fn test_resolve_reference() {
        assert_eq!(resolve_reference("amp").unwrap(), "&");
        assert_eq!(resolve_reference("#65").unwrap(), "A");
        assert_eq!(resolve_reference("#x263A").unwrap(), "\u{263A}");
        assert_eq!(
            resolve_reference("nbsp").unwrap_err(),
            MalformedDocumentError::UnknownEntity("nbsp".to_string())
        );
    }

    #[test]
    fn test_disallowed_char_reference() {
        for xml in ["<a>&#0;</a>", "<a>&#x1F;</a>", "<a>&#xFFFE;</a>", "<a>&#xD800;</a>"] {
            assert!(
                matches!(
                    tokens(xml),
                    Err(MalformedDocumentError::InvalidCharReference(_))
                ),
                "{xml}"
            );
        }
        assert_eq!(resolve_reference("#9").unwrap(), "\t");
        assert_eq!(resolve_reference("#x10FFFF").unwrap(), "\u{10FFFF}");
    }

    #[test]
    fn test_line_endings_normalized() {
        let tokens = tokens("<a>x\r\ny\rz</a>").unwrap();
        assert_eq!(tokens[1], Token::Text("x\ny\nz".to_string()));
    }

    #[test]
    fn test_char_reference_carriage_return_kept() {
        let tokens = tokens("<a>x&#13;</a>").unwrap();
        let text: String = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Text(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(text, "x\r");
    }

    #[test]
    fn test_invalid_utf8_reports_position() {
        let err = tokens_from_bytes(b"<a>\xff</a>").unwrap_err();
        assert!(
            matches!(err, MalformedDocumentError::Syntax { position: 3, .. }),
            "{err:?}"
        );
    }

    #[test]
    fn test_prefixed_attribute_uses_clark_name() {
        let xml = r#"<a xmlns:xlink="http://www.w3.org/1999/xlink" href="local" xlink:href="linked"/>"#;
        let tokens = tokens(xml).unwrap();
        assert_eq!(tokens[1], attr("href", "local"));
        assert_eq!(
            tokens[2],
            attr("{http://www.w3.org/1999/xlink}href", "linked")
        );
    }

    #[test]
    fn test_undeclared_attribute_prefix() {
        let err = tokens(r#"<a q:k="v"/>"#).unwrap_err();
        assert_eq!(err, MalformedDocumentError::UndeclaredPrefix("q".to_string()));
    }
}
