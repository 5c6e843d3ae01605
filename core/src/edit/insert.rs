//! Mention insertion: place an atomic mention at a display offset

use super::reconcile::apply_edit;
use crate::display;
use crate::token::{Mention, Token, TokenSequence};
use std::ops::Range;

/// Result of inserting a mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inserted {
    pub tokens: TokenSequence,

    /// Display offset just past the space that follows the mention.
    pub caret: usize,
}

/// Insert `mention` at `display_offset`, followed by a single space.
///
/// A text run at the offset is split; an offset strictly inside another
/// mention moves to just after it. The returned caret sits after the
/// trailing space, where the user can keep typing. A mention without an id
/// cannot be stored, so the sequence is returned unchanged.
///
/// # Example
///
/// ```rust
/// use mentionkit_core::display::to_display;
/// use mentionkit_core::edit::insert_mention_at;
/// use mentionkit_core::token::{Mention, Token, TokenSequence};
///
/// let seq = TokenSequence::from_tokens(vec![Token::text("hi ")]);
/// let out = insert_mention_at(&seq, 3, Mention::user("42", "Marcos"));
///
/// assert_eq!(to_display(&out.tokens), "hi @Marcos ");
/// assert_eq!(out.caret, 11);
/// ```
pub fn insert_mention_at(seq: &TokenSequence, display_offset: usize, mention: Mention) -> Inserted {
    let mut offset = display::clamp_offset(seq, display_offset);
    if mention.ref_id().is_empty() {
        tracing::warn!(label = mention.label(), "refusing to insert a mention without an id");
        return Inserted {
            tokens: seq.clone(),
            caret: offset,
        };
    }

    if let Some(span) = display::mention_span_containing(seq, offset) {
        offset = span.end;
    }

    let caret = offset + mention.len() + 1;

    let (mut tokens, tail) = seq.split_at_display(offset);
    tokens.push(Token::Mention(mention));
    tokens.push(Token::text(" "));
    tokens.extend(tail);

    let tokens = TokenSequence::from_tokens(tokens);
    debug_assert!(tokens.is_normalized(), "sequence after insertion must be normalized");

    Inserted { tokens, caret }
}

/// Replace the display range (typically an `@query` trigger) with a mention.
///
/// The range is deleted first through the regular edit path, then the
/// mention is inserted where the range started. A mention without an id
/// leaves the range in place.
pub fn replace_with_mention(seq: &TokenSequence, range: Range<usize>, mention: Mention) -> Inserted {
    if mention.ref_id().is_empty() {
        return insert_mention_at(seq, range.end, mention);
    }

    let deleted = apply_edit(seq, range, "");
    // A range that clipped a mention is widened by apply_edit; the caret it
    // returns is the true start of the removed region.
    insert_mention_at(&deleted.tokens, deleted.caret, mention)
}
