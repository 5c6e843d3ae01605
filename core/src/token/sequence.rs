//! TokenSequence: the owned source of truth for mention-aware text
//!
//! The canonical string and the display string are both projections of this
//! sequence. Every constructor normalizes: empty text runs are dropped and
//! adjacent text runs are merged, so downstream code can rely on
//! [`TokenSequence::is_normalized`] holding.

use super::item::Token;
use super::mention::{Mention, RefType};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Merge adjacent text tokens and drop empty ones.
///
/// Mentions without an id are dropped too, since they have no canonical
/// marker to persist as. Malformed input is healed rather than rejected;
/// this runs on every keystroke.
///
/// # Example
///
/// ```rust
/// use mentionkit_core::token::{merge_adjacent_text, Mention, Token};
///
/// let merged = merge_adjacent_text(vec![
///     Token::text("hi "),
///     Token::text(""),
///     Token::text("there "),
///     Token::from(Mention::user("7", "Ana")),
/// ]);
/// assert_eq!(merged.len(), 2);
/// assert_eq!(merged[0], Token::text("hi there "));
/// ```
pub fn merge_adjacent_text(tokens: Vec<Token>) -> Vec<Token> {
    let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token {
            Token::Text(text) if text.is_empty() => {}
            Token::Text(text) => {
                if let Some(Token::Text(last)) = merged.last_mut() {
                    last.push_str(&text);
                } else {
                    merged.push(Token::Text(text));
                }
            }
            Token::Mention(mention) if mention.ref_id().is_empty() => {
                tracing::debug!(label = mention.label(), "dropping mention without an id");
            }
            mention @ Token::Mention(_) => merged.push(mention),
        }
    }

    merged
}

/// Byte index of the `chars`-th char of `text`, clamped to the end.
pub(crate) fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// Ordered, normalized list of tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Token>", into = "Vec<Token>")]
pub struct TokenSequence {
    tokens: Vec<Token>,
}

impl TokenSequence {
    /// Create an empty sequence (new content).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence, normalizing the input.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            tokens: merge_adjacent_text(tokens),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Number of tokens (not display chars, see [`TokenSequence::display_len`]).
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Sum of the tokens' display lengths.
    pub fn display_len(&self) -> usize {
        self.tokens.iter().map(Token::len).sum()
    }

    /// No empty text runs, no id-less mentions and no two text runs side by side.
    pub fn is_normalized(&self) -> bool {
        let no_empty = self.tokens.iter().all(|t| match t {
            Token::Text(text) => !text.is_empty(),
            Token::Mention(mention) => !mention.ref_id().is_empty(),
        });
        let no_adjacent = self
            .tokens
            .windows(2)
            .all(|pair| !(pair[0].is_text() && pair[1].is_text()));
        no_empty && no_adjacent
    }

    /// Tokens paired with their display span.
    pub fn spans(&self) -> impl Iterator<Item = (Range<usize>, &Token)> + '_ {
        self.tokens.iter().scan(0usize, |pos, token| {
            let start = *pos;
            *pos += token.len();
            Some((start..*pos, token))
        })
    }

    /// Mentions in document order.
    pub fn mentions(&self) -> impl Iterator<Item = &Mention> + '_ {
        self.tokens.iter().filter_map(Token::as_mention)
    }

    /// Ids of mentions whose type is in `ref_types`, deduplicated, in order
    /// of first occurrence.
    pub fn referenced_ids(&self, ref_types: &[RefType]) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for mention in self.mentions() {
            if ref_types.contains(&mention.ref_type())
                && !mention.ref_id().is_empty()
                && !ids.iter().any(|id| id == mention.ref_id())
            {
                ids.push(mention.ref_id().to_string());
            }
        }
        ids
    }

    /// Split into the tokens before and after a display offset.
    ///
    /// Text runs straddling the offset are cut in two. A mention that
    /// strictly contains the offset stays whole and goes to the right-hand
    /// side; callers that need other behaviour move the offset first.
    pub(crate) fn split_at_display(&self, offset: usize) -> (Vec<Token>, Vec<Token>) {
        let mut left = Vec::new();
        let mut right = Vec::new();

        for (span, token) in self.spans() {
            if span.end <= offset {
                left.push(token.clone());
            } else if span.start >= offset {
                right.push(token.clone());
            } else {
                match token {
                    Token::Text(text) => {
                        let at = byte_offset(text, offset - span.start);
                        left.push(Token::text(&text[..at]));
                        right.push(Token::text(&text[at..]));
                    }
                    Token::Mention(_) => right.push(token.clone()),
                }
            }
        }

        (left, right)
    }
}

impl From<Vec<Token>> for TokenSequence {
    fn from(tokens: Vec<Token>) -> Self {
        Self::from_tokens(tokens)
    }
}

impl From<TokenSequence> for Vec<Token> {
    fn from(seq: TokenSequence) -> Self {
        seq.tokens
    }
}

impl FromIterator<Token> for TokenSequence {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::from_tokens(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TokenSequence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
