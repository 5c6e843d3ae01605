//! Edit reconciliation: fold a raw display-string change back into tokens
//!
//! The host's editable surface only knows the display string. After each
//! input event we diff the previous and new display strings, map the changed
//! region onto the token sequence and splice. Mentions are atomic: an edit
//! that touches the inside of a mention removes the whole mention.

use super::diff;
use crate::display;
use crate::token::{Token, TokenSequence};
use std::ops::Range;

/// Result of applying one edit: the new sequence and where the caret goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub tokens: TokenSequence,

    /// Display offset just after the inserted text.
    pub caret: usize,
}

/// Reconcile one host change (`prev` -> `next`) against `seq`.
///
/// Never fails. `prev` is expected to be the display projection of `seq`;
/// offsets that fall outside the sequence are clamped.
///
/// # Example
///
/// ```rust
/// use mentionkit_core::display::to_display;
/// use mentionkit_core::edit::reconcile;
/// use mentionkit_core::protocol::decode;
///
/// let seq = decode("hi @[Ana](user:7) bye");
///
/// // Backspace inside "@Ana" removes the whole mention
/// let out = reconcile("hi @Ana bye", "hi @An bye", &seq);
/// assert_eq!(to_display(&out.tokens), "hi  bye");
/// assert_eq!(out.caret, 3);
/// ```
pub fn reconcile(prev: &str, next: &str, seq: &TokenSequence) -> Reconciled {
    let hunk = diff::single_hunk(prev, next);

    tracing::trace!(
        start = hunk.start,
        removed_end = hunk.removed_end,
        inserted_chars = hunk.inserted.chars().count(),
        "reconciling display change"
    );

    apply_edit(seq, hunk.removed(), &hunk.inserted)
}

/// Reconcile one host change, using the host caret to place the edit.
///
/// Same as [`reconcile`] except that a pure insertion or deletion next to
/// repeated chars is placed where the caret shows it happened (see
/// [`diff::single_hunk_at_caret`]). `caret` is in `next` coordinates.
pub fn reconcile_at_caret(prev: &str, next: &str, caret: usize, seq: &TokenSequence) -> Reconciled {
    let hunk = diff::single_hunk_at_caret(prev, next, caret);

    tracing::trace!(
        start = hunk.start,
        removed_end = hunk.removed_end,
        caret,
        "reconciling display change at caret"
    );

    apply_edit(seq, hunk.removed(), &hunk.inserted)
}

/// Replace the display range `range` of `seq` with literal `replacement`.
///
/// Range ends strictly inside a mention are widened to the mention's
/// boundaries, so the mention is removed whole. Ends exactly on a boundary
/// leave the neighbouring mention untouched.
pub fn apply_edit(seq: &TokenSequence, range: Range<usize>, replacement: &str) -> Reconciled {
    let len = seq.display_len();
    let mut start = range.start.min(len);
    let mut end = range.end.clamp(start, len);

    if let Some(span) = display::mention_span_containing(seq, start) {
        tracing::trace!(?span, "edit starts inside a mention, removing it whole");
        start = span.start;
    }
    if let Some(span) = display::mention_span_containing(seq, end) {
        tracing::trace!(?span, "edit ends inside a mention, removing it whole");
        end = span.end;
    }

    let (mut tokens, _) = seq.split_at_display(start);
    let (_, tail) = seq.split_at_display(end);

    tokens.push(Token::text(replacement));
    tokens.extend(tail);

    let tokens = TokenSequence::from_tokens(tokens);
    debug_assert!(tokens.is_normalized(), "reconciled sequence must be normalized");

    Reconciled {
        tokens,
        caret: start + replacement.chars().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::to_display;
    use crate::token::Mention;

    fn hi_ana_bye() -> TokenSequence {
        TokenSequence::from_tokens(vec![
            Token::text("hi "),
            Token::from(Mention::user("7", "Ana")),
            Token::text(" bye"),
        ])
    }

    #[test]
    fn test_noop_edit_keeps_sequence() {
        let seq = hi_ana_bye();
        let out = reconcile("hi @Ana bye", "hi @Ana bye", &seq);
        assert_eq!(out.tokens, seq);
    }

    #[test]
    fn test_typing_into_text() {
        let seq = TokenSequence::from_tokens(vec![Token::text("hello world")]);
        let out = reconcile("hello world", "hello there world", &seq);

        assert_eq!(out.tokens.tokens(), &[Token::text("hello there world")]);
        assert_eq!(out.caret, 12);
    }

    #[test]
    fn test_insert_before_mention_leaves_it() {
        let seq = hi_ana_bye();
        // Insert "x" right before '@' (offset 3, mention boundary)
        let out = reconcile("hi @Ana bye", "hi x@Ana bye", &seq);

        assert_eq!(
            out.tokens.tokens(),
            &[
                Token::text("hi x"),
                Token::from(Mention::user("7", "Ana")),
                Token::text(" bye"),
            ]
        );
        assert_eq!(out.caret, 4);
    }

    #[test]
    fn test_insert_after_mention_leaves_it() {
        let seq = hi_ana_bye();
        let out = reconcile("hi @Ana bye", "hi @Ana, bye", &seq);

        assert_eq!(to_display(&out.tokens), "hi @Ana, bye");
        assert_eq!(out.tokens.mentions().count(), 1);
    }

    #[test]
    fn test_backspace_inside_mention_removes_it() {
        let seq = hi_ana_bye();
        let out = reconcile("hi @Ana bye", "hi @An bye", &seq);

        assert_eq!(out.tokens.tokens(), &[Token::text("hi  bye")]);
        assert_eq!(to_display(&out.tokens), "hi  bye");
        assert!(out.tokens.is_normalized());
    }

    #[test]
    fn test_backspace_right_after_mention_removes_it() {
        // Caret after "@Ana", backspace deletes the 'a' at offset 6.
        let seq = TokenSequence::from_tokens(vec![
            Token::text("hi "),
            Token::from(Mention::user("7", "Ana")),
        ]);
        let out = reconcile("hi @Ana", "hi @An", &seq);

        assert_eq!(out.tokens.tokens(), &[Token::text("hi ")]);
        assert_eq!(out.caret, 3);
    }

    #[test]
    fn test_deleting_the_at_sign_removes_mention() {
        let seq = hi_ana_bye();
        let out = reconcile("hi @Ana bye", "hi Ana bye", &seq);

        assert_eq!(out.tokens.tokens(), &[Token::text("hi  bye")]);
    }

    #[test]
    fn test_typing_inside_mention_replaces_it() {
        let seq = hi_ana_bye();
        let out = reconcile("hi @Ana bye", "hi @Anxa bye", &seq);

        assert_eq!(out.tokens.tokens(), &[Token::text("hi x bye")]);
        assert_eq!(out.caret, 4);
    }

    #[test]
    fn test_selection_across_two_mentions() {
        let seq = TokenSequence::from_tokens(vec![
            Token::from(Mention::user("1", "Ana")),
            Token::text(" & "),
            Token::from(Mention::user("2", "Bo")),
            Token::text("!"),
        ]);
        // Select "na & @B" and type "-"
        let out = reconcile("@Ana & @Bo!", "@A-o!", &seq);

        assert_eq!(out.tokens.tokens(), &[Token::text("-!")]);
        assert_eq!(out.caret, 1);
    }

    #[test]
    fn test_delete_everything() {
        let seq = hi_ana_bye();
        let out = reconcile("hi @Ana bye", "", &seq);

        assert!(out.tokens.is_empty());
        assert_eq!(out.caret, 0);
    }

    #[test]
    fn test_apply_edit_clamps_out_of_range() {
        let seq = TokenSequence::from_tokens(vec![Token::text("abc")]);
        let out = apply_edit(&seq, 10..20, "!");

        assert_eq!(out.tokens.tokens(), &[Token::text("abc!")]);
        assert_eq!(out.caret, 4);

        let out = apply_edit(&seq, 2..1, "");
        assert_eq!(out.tokens.tokens(), &[Token::text("abc")]);
    }

    #[test]
    fn test_adjacent_mentions_boundary_insert() {
        let seq = TokenSequence::from_tokens(vec![
            Token::from(Mention::user("1", "A")),
            Token::from(Mention::user("2", "B")),
        ]);
        let out = reconcile("@A@B", "@A @B", &seq);

        assert_eq!(out.tokens.len(), 3);
        assert_eq!(out.tokens.mentions().count(), 2);
    }

    #[test]
    fn test_typing_at_sign_before_mention_keeps_it() {
        let seq = TokenSequence::from_tokens(vec![
            Token::text("x"),
            Token::from(Mention::user("7", "Ana")),
        ]);

        let out = reconcile_at_caret("x@Ana", "x@@Ana", 2, &seq);
        assert_eq!(
            out.tokens.tokens(),
            &[Token::text("x@"), Token::from(Mention::user("7", "Ana"))]
        );
        assert_eq!(out.caret, 2);

        // Without the caret the greedy diff lands inside the mention
        let greedy = reconcile("x@Ana", "x@@Ana", &seq);
        assert_eq!(greedy.tokens.tokens(), &[Token::text("x@")]);
    }

    #[test]
    fn test_deleting_at_sign_before_mention_keeps_it() {
        let seq = TokenSequence::from_tokens(vec![
            Token::text("x@"),
            Token::from(Mention::user("7", "Ana")),
        ]);

        let out = reconcile_at_caret("x@@Ana", "x@Ana", 1, &seq);
        assert_eq!(
            out.tokens.tokens(),
            &[Token::text("x"), Token::from(Mention::user("7", "Ana"))]
        );
        assert_eq!(out.caret, 1);
    }
}
