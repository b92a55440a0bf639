//! Document identifiers, the editing buffer and the new-article skeleton

use std::fmt;
use std::sync::LazyLock;

use quick_xml::escape::escape;
use regex_lite::Regex;

/// Extension every article file carries
pub const EXTENSION: &str = ".xml";

/// Token used when a title has no usable word
pub const FALLBACK_SLUG: &str = "untitled";

static CANONICAL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2,})-[a-z0-9]+\.xml$").expect("static pattern compiles")
});

/// Filename-shaped identifier of one article, e.g. `07-rust.xml`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wrap a remote entry name. Any name ending in [`EXTENSION`] is accepted,
    /// since the remote directory may hold hand-made files.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        name.ends_with(EXTENSION).then_some(Self(name))
    }

    /// Build the identifier for sequence number `seq` and a title
    pub fn allocate(seq: usize, title: &str) -> Self {
        Self(format!("{seq:02}-{}{EXTENSION}", slugify(title)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name follows the `NN-word.xml` shape
    pub fn is_canonical(&self) -> bool {
        CANONICAL_NAME.is_match(&self.0)
    }

    /// Numeric prefix of a canonical name
    pub fn sequence(&self) -> Option<usize> {
        CANONICAL_NAME
            .captures(&self.0)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// First whitespace-delimited word of the title, lower-cased, reduced to `[a-z0-9]`
fn slugify(title: &str) -> String {
    let slug: String = title
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Text of the open document plus the caret, as a byte offset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    text: String,
    caret: usize,
}

impl Buffer {
    /// Create a buffer with the caret at the start
    pub fn new(text: String) -> Self {
        Self { text, caret: 0 }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Move the caret, clamping to the text and to a char boundary
    pub fn set_caret(&mut self, offset: usize) {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        self.caret = offset;
    }

    /// Insert at the caret and advance past the inserted text
    pub fn insert(&mut self, s: &str) {
        self.text.insert_str(self.caret, s);
        self.caret += s.len();
    }
}

/// Skeleton of a freshly created article and where the caret goes in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skeleton {
    pub text: String,
    /// Offset right after the `<html>` line
    pub body_offset: usize,
}

impl Skeleton {
    pub fn new(title: &str, date: &str, category: &str) -> Self {
        let mut text = String::new();
        text.push_str("<blog>\n");
        text.push_str(&format!("    <title>{}</title>\n", escape(title)));
        text.push_str(&format!("    <date>{}</date>\n", escape(date)));
        text.push_str(&format!("    <category>{}</category>\n", escape(category)));
        text.push_str("    <enclosure></enclosure>\n");
        text.push_str("    <html>\n");
        let body_offset = text.len();
        text.push_str("    </html>\n");
        text.push_str("</blog>\n");

        Self { text, body_offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_allocate_shape() {
        let titles = ["Hello World", "  Rust   tips", "", "   ", "C++ & me", "Über alles", "2024 recap"];
        for (seq, title) in titles.iter().enumerate() {
            let id = DocumentId::allocate(seq, title);
            assert!(id.is_canonical(), "{id} from {title:?}");
            assert_eq!(id.sequence(), Some(seq));
        }
        assert_eq!(DocumentId::allocate(3, "Hello World").as_str(), "03-hello.xml");
        assert_eq!(DocumentId::allocate(0, "   ").as_str(), "00-untitled.xml");
        assert_eq!(DocumentId::allocate(123, "Big").as_str(), "123-big.xml");
    }

    #[test]
    fn test_new_requires_extension() {
        assert!(DocumentId::new("notes.xml").is_some());
        assert!(DocumentId::new("notes.txt").is_none());
        assert!(!DocumentId::new("notes.xml").unwrap().is_canonical());
        assert_eq!(DocumentId::new("notes.xml").unwrap().sequence(), None);
    }

    #[test]
    fn test_buffer_caret_clamps_to_char_boundary() {
        let mut buffer = Buffer::new("aé".to_string());
        buffer.set_caret(2);
        assert_eq!(buffer.caret(), 1);
        buffer.set_caret(100);
        assert_eq!(buffer.caret(), 3);
        buffer.insert("!");
        assert_eq!(buffer.text(), "aé!");
        assert_eq!(buffer.caret(), 4);
    }

    #[test]
    fn test_skeleton_body_offset() {
        let date = "Mon, 01 Jan 2024 00:00:00 +0000";
        let skeleton = Skeleton::new("Hello", date, "General");
        let expected = format!(
            "<blog>\n    <title>Hello</title>\n    <date>{date}</date>\n    <category>General</category>\n    <enclosure></enclosure>\n    <html>\n    </html>\n</blog>\n"
        );
        assert_eq!(skeleton.text, expected);
        assert!(skeleton.text[..skeleton.body_offset].ends_with("<html>\n"));
        assert_eq!(skeleton.body_offset, 117 + "Hello".len() + date.len());
    }

    #[test]
    fn test_skeleton_escapes_title() {
        let skeleton = Skeleton::new("A <b> & c", "d", "General");
        assert!(skeleton.text.contains("<title>A &lt;b&gt; &amp; c</title>"));
    }
}
