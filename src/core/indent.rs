//! Auto-indentation applied right after a line break is typed
//!
//! The rule only looks at the character left of the caret at the moment the
//! key was pressed; it does not parse the markup.
//!
//! - after `>` the new line gets the broken line's leading whitespace plus
//!   one indent step;
//! - after a space the new line gets as many spaces as there were characters
//!   from the start of the broken line up to and including that space.

/// Key events the indenter cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Return,
    Char(char),
}

impl Key {
    pub fn is_line_break(&self) -> bool {
        matches!(self, Key::Enter | Key::Return)
    }
}

/// Text to insert into the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub offset: usize,
    pub insert: String,
}

/// Structure-blind indenter
#[derive(Debug, Clone, Copy)]
pub struct IndentEngine {
    step: usize,
}

impl Default for IndentEngine {
    fn default() -> Self {
        Self::new(4)
    }
}

impl IndentEngine {
    pub fn new(step: usize) -> Self {
        Self { step }
    }

    /// Compute the indentation to insert after `key` was applied to `text`.
    ///
    /// `prior_offset` is the offset of the character that was left of the
    /// caret before the key (`None` when the caret was at the start), and
    /// `caret` is where the caret sits now, after the inserted line break.
    pub fn on_key(
        &self,
        text: &str,
        prior_offset: Option<usize>,
        caret: usize,
        key: &Key,
    ) -> Option<Mutation> {
        if !key.is_line_break() {
            return None;
        }
        let count = self.indent_width(text, prior_offset?)?;
        tracing::debug!("Auto-indent {} columns at {}", count, caret);
        (count > 0).then(|| Mutation {
            offset: caret,
            insert: " ".repeat(count),
        })
    }

    /// Number of spaces the new line should start with, if any rule applies
    pub fn indent_width(&self, text: &str, prior_offset: usize) -> Option<usize> {
        match text.as_bytes().get(prior_offset)? {
            b'>' => {
                let leading = line_rest(text, prior_offset)
                    .chars()
                    .take_while(|c| c.is_whitespace())
                    .count();
                Some(leading + self.step)
            }
            b' ' => Some(continuation_width(
                line_rest(text, prior_offset).chars().count(),
                text.chars().count(),
                text[..prior_offset].chars().count(),
            )),
            _ => None,
        }
    }
}

/// Text from the start of the line holding `offset` to the end of `text`.
/// `offset` must sit on an ASCII byte.
fn line_rest(text: &str, offset: usize) -> &str {
    let line_start = text[..=offset].rfind('\n').map_or(0, |nl| nl + 1);
    &text[line_start..]
}

/// `line_len - (text_len - prior) + 1`, clamped at zero.
///
/// `line_len` counts from the start of the broken line to the end of the
/// text, so for consistent inputs this is the column after `prior`.
pub fn continuation_width(line_len: usize, text_len: usize, prior: usize) -> usize {
    (line_len + prior + 1).saturating_sub(text_len)
}
