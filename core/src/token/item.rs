//! Token: the unit of content in a mention-aware text
//!
//! A token is either a run of literal text or an atomic mention. Text runs can
//! be split and merged freely; mentions never are.

use super::mention::{Mention, RefType};
use serde::{Deserialize, Serialize};

/// A run of literal text or an atomic mention.
///
/// Serializes to the tagged shape hosts already use:
/// `{"kind":"text","text":"hi "}` and
/// `{"kind":"mention","type":"user","id":"7","name":"Ana"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "TokenRepr", from = "TokenRepr")]
pub enum Token {
    /// Literal text. Never empty and never next to another text token once a
    /// sequence has been normalized.
    Text(String),

    /// Atomic reference, rendered as `@label`.
    Mention(Mention),
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum TokenRepr {
    Text { text: String },
    Mention(Mention),
}

impl From<Token> for TokenRepr {
    fn from(token: Token) -> Self {
        match token {
            Token::Text(text) => TokenRepr::Text { text },
            Token::Mention(mention) => TokenRepr::Mention(mention),
        }
    }
}

impl From<TokenRepr> for Token {
    fn from(repr: TokenRepr) -> Self {
        match repr {
            TokenRepr::Text { text } => Token::Text(text),
            TokenRepr::Mention(mention) => Token::Mention(mention),
        }
    }
}

impl Token {
    /// Create a text token.
    pub fn text(text: impl Into<String>) -> Self {
        Token::Text(text.into())
    }

    /// Display length in chars.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mentionkit_core::token::{Mention, Token};
    ///
    /// assert_eq!(Token::text("hi ").len(), 3);
    /// assert_eq!(Token::Mention(Mention::user("7", "Ana")).len(), 4);
    /// ```
    pub fn len(&self) -> usize {
        match self {
            Token::Text(text) => text.chars().count(),
            Token::Mention(mention) => mention.len(),
        }
    }

    /// Only an empty text run is empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Token::Text(text) => text.is_empty(),
            Token::Mention(_) => false,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Token::Text(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Token::Text(text) => Some(text),
            Token::Mention(_) => None,
        }
    }

    pub fn as_mention(&self) -> Option<&Mention> {
        match self {
            Token::Mention(mention) => Some(mention),
            Token::Text(_) => None,
        }
    }

    /// Ref type of a mention token, `None` for text.
    pub fn ref_type(&self) -> Option<RefType> {
        self.as_mention().map(Mention::ref_type)
    }

    /// Append this token's display rendering to `out`.
    pub(crate) fn write_display(&self, out: &mut String) {
        match self {
            Token::Text(text) => out.push_str(text),
            Token::Mention(mention) => {
                out.push('@');
                out.push_str(mention.label());
            }
        }
    }
}

impl From<Mention> for Token {
    fn from(mention: Mention) -> Self {
        Token::Mention(mention)
    }
}
