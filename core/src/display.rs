//! Display projection: the plain string shown in the editable surface
//!
//! Each mention renders as `@label`. The projection is lossy (two mentions can
//! share a label), so it is always recomputed from the token sequence and
//! never parsed back.
//!
//! Offsets here are display offsets counted in chars.

use crate::token::{RefType, Token, TokenSequence};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A point in token coordinates: token index plus char offset inside it.
///
/// `index == seq.len()` addresses the end of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TokenPosition {
    pub index: usize,
    pub offset: usize,
}

impl TokenPosition {
    pub fn new(index: usize, offset: usize) -> Self {
        Self { index, offset }
    }
}

/// A styled run of the overlay: literal text, or a mention with its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ref_type: Option<RefType>,
}

/// Render a sequence as its display string.
///
/// # Example
///
/// ```rust
/// use mentionkit_core::display::to_display;
/// use mentionkit_core::protocol::decode;
///
/// assert_eq!(to_display(&decode("hi @[Ana](user:7) bye")), "hi @Ana bye");
/// ```
pub fn to_display(seq: &TokenSequence) -> String {
    let mut out = String::with_capacity(seq.display_len());
    for token in seq {
        token.write_display(&mut out);
    }
    out
}

/// Translate a display offset into a token position.
///
/// An offset strictly inside a mention reports the mention's start, since a
/// mention has no interior edit targets. Offsets past the end clamp to the end
/// of the sequence.
pub fn offset_to_position(seq: &TokenSequence, display_offset: usize) -> TokenPosition {
    for (index, (span, token)) in seq.spans().enumerate() {
        if display_offset < span.end {
            let offset = match token {
                Token::Text(_) => display_offset - span.start,
                Token::Mention(_) => 0,
            };
            return TokenPosition { index, offset };
        }
    }

    if display_offset > seq.display_len() {
        tracing::trace!(display_offset, "offset past end of sequence, clamping");
    }
    TokenPosition {
        index: seq.len(),
        offset: 0,
    }
}

/// Translate a token position back into a display offset.
///
/// Out-of-range indices clamp to the end; an in-token offset clamps to the
/// token's length.
pub fn position_to_offset(seq: &TokenSequence, position: TokenPosition) -> usize {
    let tokens = seq.tokens();
    let index = position.index.min(tokens.len());
    let before: usize = tokens[..index].iter().map(Token::len).sum();

    match tokens.get(index) {
        Some(token) => before + position.offset.min(token.len()),
        None => before,
    }
}

/// Clamp an offset to `0..=display_len`.
pub fn clamp_offset(seq: &TokenSequence, display_offset: usize) -> usize {
    display_offset.min(seq.display_len())
}

/// Span of the mention strictly containing `display_offset`, if any.
///
/// Offsets on a mention's boundary are not inside it.
pub fn mention_span_containing(seq: &TokenSequence, display_offset: usize) -> Option<Range<usize>> {
    seq.spans()
        .find(|(span, token)| {
            !token.is_text() && span.start < display_offset && display_offset < span.end
        })
        .map(|(span, _)| span)
}

/// Styled runs for rendering an overlay over the editable surface.
pub fn segments(seq: &TokenSequence) -> Vec<Segment> {
    seq.iter()
        .map(|token| {
            let mut text = String::new();
            token.write_display(&mut text);
            Segment {
                text,
                ref_type: token.ref_type(),
            }
        })
        .collect()
}

/// Convert a UTF-16 code unit offset in `text` to a char offset.
///
/// Browser text surfaces report carets in UTF-16 units. An offset in the
/// middle of a surrogate pair maps to the char it splits; offsets past the
/// end clamp to the char count.
pub fn utf16_to_char_offset(text: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (chars, c) in text.chars().enumerate() {
        units += c.len_utf16();
        if units > utf16_offset {
            return chars;
        }
    }
    text.chars().count()
}

/// Convert a char offset in `text` to a UTF-16 code unit offset.
pub fn char_to_utf16_offset(text: &str, char_offset: usize) -> usize {
    text.chars().take(char_offset).map(char::len_utf16).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Mention;

    fn hi_ana_bye() -> TokenSequence {
        TokenSequence::from_tokens(vec![
            Token::text("hi "),
            Token::from(Mention::user("7", "Ana")),
            Token::text(" bye"),
        ])
    }

    #[test]
    fn test_to_display() {
        assert_eq!(to_display(&hi_ana_bye()), "hi @Ana bye");
        assert_eq!(to_display(&TokenSequence::new()), "");
    }

    #[test]
    fn test_display_length_consistency() {
        let seq = hi_ana_bye();
        assert_eq!(to_display(&seq).chars().count(), seq.display_len());
    }

    #[test]
    fn test_offset_to_position_in_text() {
        let seq = hi_ana_bye();
        assert_eq!(offset_to_position(&seq, 0), TokenPosition::new(0, 0));
        assert_eq!(offset_to_position(&seq, 2), TokenPosition::new(0, 2));
        assert_eq!(offset_to_position(&seq, 8), TokenPosition::new(2, 1));
    }

    #[test]
    fn test_offset_inside_mention_reports_start() {
        let seq = hi_ana_bye();
        assert_eq!(offset_to_position(&seq, 3), TokenPosition::new(1, 0));
        assert_eq!(offset_to_position(&seq, 5), TokenPosition::new(1, 0));
        assert_eq!(offset_to_position(&seq, 6), TokenPosition::new(1, 0));
        assert_eq!(offset_to_position(&seq, 7), TokenPosition::new(2, 0));
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let seq = hi_ana_bye();
        assert_eq!(offset_to_position(&seq, 11), TokenPosition::new(3, 0));
        assert_eq!(offset_to_position(&seq, 99), TokenPosition::new(3, 0));
        assert_eq!(
            offset_to_position(&TokenSequence::new(), 4),
            TokenPosition::new(0, 0)
        );
    }

    #[test]
    fn test_position_round_trip_for_text_offsets() {
        let seq = hi_ana_bye();
        for offset in [0, 1, 2, 7, 8, 10, 11] {
            let position = offset_to_position(&seq, offset);
            assert_eq!(position_to_offset(&seq, position), offset);
        }
    }

    #[test]
    fn test_position_to_offset_clamps() {
        let seq = hi_ana_bye();
        assert_eq!(position_to_offset(&seq, TokenPosition::new(0, 50)), 3);
        assert_eq!(position_to_offset(&seq, TokenPosition::new(9, 0)), 11);
    }

    #[test]
    fn test_mention_span_containing() {
        let seq = hi_ana_bye();
        assert_eq!(mention_span_containing(&seq, 3), None);
        assert_eq!(mention_span_containing(&seq, 4), Some(3..7));
        assert_eq!(mention_span_containing(&seq, 6), Some(3..7));
        assert_eq!(mention_span_containing(&seq, 7), None);
    }

    #[test]
    fn test_segments() {
        let segments = segments(&hi_ana_bye());
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].text, "@Ana");
        assert_eq!(segments[1].ref_type, Some(RefType::User));
        assert_eq!(segments[2].ref_type, None);
    }

    #[test]
    fn test_utf16_offsets() {
        let text = "a😀b";
        assert_eq!(utf16_to_char_offset(text, 0), 0);
        assert_eq!(utf16_to_char_offset(text, 1), 1);
        // Inside the surrogate pair
        assert_eq!(utf16_to_char_offset(text, 2), 1);
        assert_eq!(utf16_to_char_offset(text, 3), 2);
        assert_eq!(utf16_to_char_offset(text, 4), 3);
        assert_eq!(utf16_to_char_offset(text, 99), 3);

        assert_eq!(char_to_utf16_offset(text, 2), 3);
        assert_eq!(char_to_utf16_offset(text, 3), 4);
        assert_eq!(char_to_utf16_offset("olá", 3), 3);
    }
}
