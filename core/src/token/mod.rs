//! Token model: mention-aware text as an ordered sequence of atomic units
//!
//! Content is held as a [`TokenSequence`] of [`Token`]s, each either a run of
//! literal text or a [`Mention`] of a user, event, group or city. The sequence
//! is the single source of truth; the stored canonical string
//! ([`crate::protocol::canonical`]) and the editable display string
//! ([`crate::display`]) are derived from it on demand.
//!
//! # Invariants
//!
//! - **Normalization**: no empty text runs, no two text runs side by side.
//! - **Atomicity**: a mention is present whole or not at all.
//! - **Length consistency**: the tokens' display lengths sum to the length of
//!   the display string.
//!
//! # Example
//!
//! ```rust
//! use mentionkit_core::token::{Mention, Token, TokenSequence};
//!
//! let seq = TokenSequence::from_tokens(vec![
//!     Token::text("hi "),
//!     Token::from(Mention::user("7", "Ana")),
//!     Token::text(" bye"),
//! ]);
//!
//! assert_eq!(seq.display_len(), 11); // "hi @Ana bye"
//! assert!(seq.is_normalized());
//! ```

mod item;
mod mention;
mod sequence;

pub use item::Token;
pub use mention::{Mention, RefType};
pub use sequence::{merge_adjacent_text, TokenSequence};

pub(crate) use sequence::byte_offset;
