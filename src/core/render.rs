//! Parse an article buffer and compose its HTML preview
//!
//! Articles are a flat `<blog>` element whose `title`, `date`, `category`
//! and `html` children drive the preview; other children are skipped.

use std::borrow::Cow;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::error::RenderError;

/// Stylesheet prepended to every preview
pub const STYLE: &str = "
body {
    font-family: Arial, Helvetica, sans-serif;
}
li{ margin-top: 8px; }
";

/// Fields pulled out of an article
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDocument {
    pub title: String,
    pub date: String,
    pub category: Option<String>,
    /// Inner markup of `<html>`, untouched
    pub body: String,
}

impl RenderedDocument {
    /// Category, if present and non-empty
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// Compose the preview page
    pub fn to_html(&self) -> String {
        let category = self
            .category()
            .map(|c| format!("| Category: {}", escape(c)))
            .unwrap_or_default();

        format!(
            "<style>{STYLE}</style><h1>{}</h1><h3>Published on {} {}</h3><hr>{}",
            escape(&self.title),
            escape(&self.date),
            category,
            self.body
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Date,
    Category,
    Html,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"date" => Some(Self::Date),
            b"category" => Some(Self::Category),
            b"html" => Some(Self::Html),
            _ => None,
        }
    }
}

/// Field being read and where its content started
struct Capture {
    field: Field,
    start: usize,
    text: String,
}

#[derive(Default)]
struct Fields {
    title: Option<String>,
    date: Option<String>,
    category: Option<String>,
    html: Option<String>,
}

impl Fields {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Date => &mut self.date,
            Field::Category => &mut self.category,
            Field::Html => &mut self.html,
        }
    }

    /// First occurrence wins
    fn fill(&mut self, field: Field, value: String) {
        self.slot(field).get_or_insert(value);
    }

    fn has(&mut self, field: Field) -> bool {
        self.slot(field).is_some()
    }

    fn into_document(self) -> RenderedDocument {
        RenderedDocument {
            title: self.title.unwrap_or_default(),
            date: self.date.unwrap_or_default(),
            category: self.category,
            body: self.html.unwrap_or_default(),
        }
    }
}

fn position(reader: &Reader<&[u8]>) -> usize {
    usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX)
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// Reject unquoted, duplicate or badly escaped attributes
fn check_attributes(e: &BytesStart<'_>, at: usize) -> Result<(), RenderError> {
    for attr in e.attributes().with_checks(true) {
        let attr = attr.map_err(|err| RenderError::at(err.to_string(), at))?;
        attr.unescape_value()
            .map_err(|err| RenderError::at(err.to_string(), at))?;
    }
    Ok(())
}

/// Parse `text` into its preview fields.
///
/// Missing fields come back empty (`category` as `None`). Malformed markup
/// yields a [`RenderError`] with the parser's message.
pub fn render(text: &str) -> Result<RenderedDocument, RenderError> {
    let mut reader = Reader::from_str(text);
    let mut fields = Fields::default();
    let mut capture: Option<Capture> = None;
    let mut depth = 0usize;
    let mut root_closed = false;

    loop {
        let before = position(&reader);
        let event = reader
            .read_event()
            .map_err(|e| RenderError::at(e.to_string(), position(&reader)))?;

        match event {
            Event::Start(e) => {
                if root_closed {
                    return Err(RenderError::at("extra content after the root element", before));
                }
                check_attributes(&e, before)?;
                depth += 1;
                if depth == 2 && capture.is_none() {
                    if let Some(field) = Field::from_name(e.name().as_ref()) {
                        if !fields.has(field) {
                            capture = Some(Capture {
                                field,
                                start: position(&reader),
                                text: String::new(),
                            });
                        }
                    }
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                match depth {
                    0 => root_closed = true,
                    1 => {
                        if let Some(done) = capture.take() {
                            let value = match done.field {
                                Field::Html => {
                                    let end = position(&reader);
                                    let close = text[..end].rfind("</").unwrap_or(end);
                                    text[done.start..close].to_string()
                                }
                                _ => done.text,
                            };
                            fields.fill(done.field, value);
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if root_closed {
                    return Err(RenderError::at("extra content after the root element", before));
                }
                check_attributes(&e, before)?;
                match depth {
                    0 => root_closed = true,
                    1 => {
                        if let Some(field) = Field::from_name(e.name().as_ref()) {
                            fields.fill(field, String::new());
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(e) => {
                if depth == 0 {
                    if !is_blank(&e) {
                        return Err(RenderError::at("text outside the root element", before));
                    }
                } else {
                    // Entities are checked everywhere, including the raw body
                    let unescaped: Cow<'_, str> = e
                        .unescape()
                        .map_err(|err| RenderError::at(err.to_string(), before))?;
                    if let Some(open) = capture.as_mut().filter(|c| c.field != Field::Html) {
                        open.text.push_str(&unescaped);
                    }
                }
            }
            Event::CData(e) => {
                if depth == 0 {
                    return Err(RenderError::at("text outside the root element", before));
                }
                if let Some(open) = capture.as_mut().filter(|c| c.field != Field::Html) {
                    open.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(RenderError::at(
            "unexpected end of document: unclosed element",
            text.len(),
        ));
    }
    if !root_closed {
        return Err(RenderError::at("document is empty", 0));
    }

    Ok(fields.into_document())
}
