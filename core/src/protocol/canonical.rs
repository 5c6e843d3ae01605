//! Canonical codec - Convert token sequences to/from the stored string form
//!
//! The canonical string interleaves literal text with mention markers of the
//! form `@[label](type:id)`. It is the only representation persisted or sent
//! to the backend.
//!
//! Decoding never fails. Anything that is not a complete, well-formed marker
//! stays literal text, so corrupted content still renders.

use crate::display;
use crate::token::{Mention, RefType, Token, TokenSequence};

/// Opening of every mention marker.
pub const MARKER_OPEN: &str = "@[";

/// Decode a canonical string into a token sequence.
///
/// Markers are matched leftmost-first and never overlap. A marker is only
/// recognised when its label is non-empty, `](` follows the label directly,
/// its type is a known [`RefType`] and its id is non-empty.
///
/// # Example
///
/// ```rust
/// use mentionkit_core::protocol::canonical::decode;
/// use mentionkit_core::token::{Mention, Token};
///
/// let seq = decode("hi @[Ana](user:7) bye");
/// assert_eq!(
///     seq.tokens(),
///     &[
///         Token::text("hi "),
///         Token::from(Mention::user("7", "Ana")),
///         Token::text(" bye"),
///     ]
/// );
///
/// // Broken markers are kept verbatim
/// let broken = decode("hi @[Ana](user:7");
/// assert_eq!(broken.tokens(), &[Token::text("hi @[Ana](user:7")]);
/// ```
pub fn decode(canonical: &str) -> TokenSequence {
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(found) = canonical[cursor..].find(MARKER_OPEN) {
        let at = cursor + found;

        match parse_marker(&canonical[at..]) {
            Some((mention, consumed)) => {
                if at > literal_start {
                    tokens.push(Token::text(&canonical[literal_start..at]));
                }
                tokens.push(Token::Mention(mention));
                cursor = at + consumed;
                literal_start = cursor;
            }
            None => {
                tracing::debug!(offset = at, "malformed mention marker kept as text");
                // '@' is one byte, so this stays on a char boundary
                cursor = at + 1;
            }
        }
    }

    if literal_start < canonical.len() {
        tokens.push(Token::text(&canonical[literal_start..]));
    }

    TokenSequence::from_tokens(tokens)
}

/// Parse one marker at the start of `input` (which begins with `@[`).
///
/// Returns the mention and the number of bytes consumed.
fn parse_marker(input: &str) -> Option<(Mention, usize)> {
    let after_open = input.strip_prefix(MARKER_OPEN)?;

    let label_len = after_open.find(']')?;
    if label_len == 0 {
        return None;
    }
    let label = &after_open[..label_len];

    let after_label = after_open[label_len..].strip_prefix("](")?;

    let type_len = after_label.find(':')?;
    let ref_type = RefType::parse(&after_label[..type_len]).ok()?;

    let after_colon = &after_label[type_len + 1..];
    let id_len = after_colon.find(')')?;
    if id_len == 0 {
        return None;
    }
    let ref_id = &after_colon[..id_len];

    let consumed = MARKER_OPEN.len() + label_len + 2 + type_len + 1 + id_len + 1;
    Some((Mention::new(ref_type, ref_id, label), consumed))
}

/// Encode a token sequence as a canonical string.
///
/// Text is emitted verbatim; each mention becomes `@[label](type:id)`.
///
/// # Example
///
/// ```rust
/// use mentionkit_core::protocol::canonical::{decode, encode};
///
/// let canonical = "see @[Milonga](event:12) with @[Ana](user:7)";
/// assert_eq!(encode(&decode(canonical)), canonical);
/// ```
pub fn encode(seq: &TokenSequence) -> String {
    let mut out = String::with_capacity(seq.display_len() + seq.len() * 16);

    for token in seq {
        match token {
            Token::Text(text) => out.push_str(text),
            Token::Mention(mention) => write_marker(&mut out, mention),
        }
    }

    out
}

/// Append the canonical marker for one mention.
pub fn write_marker(out: &mut String, mention: &Mention) {
    out.push_str(MARKER_OPEN);
    out.push_str(mention.label());
    out.push_str("](");
    out.push_str(mention.ref_type().as_str());
    out.push(':');
    out.push_str(mention.ref_id());
    out.push(')');
}

/// Ids of one mention type in a stored canonical string, deduplicated in
/// order of first occurrence.
///
/// This is what the storage side uses to decide whom to notify.
pub fn extract_ids(canonical: &str, ref_type: RefType) -> Vec<String> {
    decode(canonical).referenced_ids(&[ref_type])
}

/// Human-readable form of a canonical string (`@label` for each mention).
pub fn to_plain_text(canonical: &str) -> String {
    display::to_display(&decode(canonical))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_empty() {
        assert!(decode("").is_empty());
    }

    #[test]
    fn test_decode_plain_text() {
        assert_eq!(decode("just text").tokens(), &[Token::text("just text")]);
    }

    #[test]
    fn test_decode_all_ref_types() {
        let seq = decode("@[A](user:1)@[B](event:2)@[C](group:tango-ba)@[D](city:bsas)");
        let types: Vec<RefType> = seq.mentions().map(|m| m.ref_type()).collect();

        assert_eq!(
            types,
            vec![RefType::User, RefType::Event, RefType::Group, RefType::City]
        );
        assert_eq!(seq.len(), 4);
    }

    #[test]
    fn test_malformed_markers_stay_literal() {
        let cases = [
            "@[Ana](user:7",
            "@[](user:7)",
            "@[Ana](venue:7)",
            "@[Ana](User:7)",
            "@[Ana] (user:7)",
            "@[Ana](user:)",
            "@[Ana](user7)",
            "@[Ana",
            "@",
            "@[",
        ];

        for case in cases {
            assert_eq!(decode(case).tokens(), &[Token::text(case)], "case {case:?}");
            assert_eq!(encode(&decode(case)), case);
        }
    }

    #[test]
    fn test_broken_marker_then_valid_one() {
        let seq = decode("@[oops @[Ana](user:7)!");
        // The label of the first '@[' runs up to the first ']', swallowing the
        // second opener.
        assert_eq!(
            seq.tokens(),
            &[Token::from(Mention::user("7", "oops @[Ana")), Token::text("!")]
        );
    }

    #[test]
    fn test_recovers_after_failed_marker() {
        let seq = decode("@[x](nope:1) @[Ana](user:7)");
        assert_eq!(
            seq.tokens(),
            &[
                Token::text("@[x](nope:1) "),
                Token::from(Mention::user("7", "Ana"))
            ]
        );
    }

    #[test]
    fn test_id_keeps_colons_and_label_keeps_parens() {
        let seq = decode("@[Ana (BA)](user:a:b)");
        let mention = seq.mentions().next().unwrap();

        assert_eq!(mention.label(), "Ana (BA)");
        assert_eq!(mention.ref_id(), "a:b");
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let cases = [
            "",
            "hello",
            "@[Ana](user:7)",
            "hi @[Ana](user:7) bye",
            "@[Ana](user:7)@[Bo](user:8)",
            "multi\nline @[Tango Night](event:42)\n",
            "emoji 🎉 @[Zoë](user:é) @ not a mention @[",
            "@[a@[b](user:1)",
        ];

        for case in cases {
            assert_eq!(encode(&decode(case)), case, "case {case:?}");
        }
    }

    #[test]
    fn test_encode_after_sanitised_mention() {
        let seq = TokenSequence::from_tokens(vec![Token::from(Mention::user("7)", "A]na"))]);
        let canonical = encode(&seq);

        assert_eq!(canonical, "@[Ana](user:7)");
        assert_eq!(decode(&canonical), seq);
    }

    #[test]
    fn test_extract_ids() {
        let canonical = "@[Ana](user:7) and @[Bo](user:8) at @[Milonga](event:3) cc @[Ana](user:7)";
        assert_eq!(extract_ids(canonical, RefType::User), vec!["7", "8"]);
        assert_eq!(extract_ids(canonical, RefType::Event), vec!["3"]);
    }

    #[test]
    fn test_to_plain_text() {
        assert_eq!(
            to_plain_text("hi @[Ana](user:7), see @[Milonga](event:3)"),
            "hi @Ana, see @Milonga"
        );
    }
}
