//! Trigger detection: find an active `@query` next to the caret

use crate::display;
use crate::token::{byte_offset, Token, TokenSequence};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Character that opens a mention trigger.
pub const TRIGGER_CHAR: char = '@';

/// An `@query` being typed: where its `@` sits and what follows it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trigger {
    /// Display offset of the `@`.
    pub start: usize,

    /// Text between the `@` and the caret (may be empty).
    pub query: String,
}

impl Trigger {
    /// Display offset just past the query.
    pub fn end(&self) -> usize {
        self.start + 1 + self.query.chars().count()
    }

    /// Display range covering `@query`.
    pub fn span(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Find the trigger the caret is currently completing.
///
/// Scans backward from the caret, within the text run holding it, for the
/// nearest `@`. There is no trigger when no `@` precedes the caret in that
/// run or when whitespace separates it from the caret. The `@` of an
/// existing mention never counts, since it is not literal text.
///
/// # Example
///
/// ```rust
/// use mentionkit_core::protocol::decode;
/// use mentionkit_core::suggest::find_trigger;
///
/// let seq = decode("hey @mar");
/// let trigger = find_trigger(&seq, 8).unwrap();
/// assert_eq!(trigger.start, 4);
/// assert_eq!(trigger.query, "mar");
///
/// assert!(find_trigger(&decode("hey @mar and"), 12).is_none());
/// ```
pub fn find_trigger(seq: &TokenSequence, caret: usize) -> Option<Trigger> {
    let caret = display::clamp_offset(seq, caret);

    let (run_start, text) = seq.spans().find_map(|(span, token)| match token {
        Token::Text(text) if span.start < caret && caret <= span.end => Some((span.start, text)),
        _ => None,
    })?;

    let before_caret = &text[..byte_offset(text, caret - run_start)];
    let at = before_caret.rfind(TRIGGER_CHAR)?;
    let query = &before_caret[at + TRIGGER_CHAR.len_utf8()..];

    if query.chars().any(char::is_whitespace) {
        return None;
    }

    Some(Trigger {
        start: run_start + before_caret[..at].chars().count(),
        query: query.to_string(),
    })
}
