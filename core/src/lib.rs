//! MentionKit Core - Mention-aware text model for rich inputs
//!
//! This is the Rust core of MentionKit, compiled to both native and WASM.
//! It keeps one token sequence per input and derives everything else from it:
//! - Token model: literal text runs and atomic mentions
//! - Canonical codec: the persisted `@[label](type:id)` form
//! - Display projection and offset mapping
//! - Edit reconciliation with atomic mention deletion
//! - Mention insertion and `@query` suggestions with stale-lookup rejection
//!
//! # Examples
//!
//! ```rust
//! use mentionkit_core::{EditorConfig, MentionEditor};
//! use mentionkit_core::token::Mention;
//!
//! let mut editor = MentionEditor::new(EditorConfig::default());
//! editor.on_display_change("hi ", 3);
//!
//! let update = editor.insert_mention(3, Mention::user("42", "Marcos"));
//! assert_eq!(update.canonical, "hi @[Marcos](user:42) ");
//! assert_eq!(update.display, "hi @Marcos ");
//! assert_eq!(update.caret, 11);
//! ```

pub mod config;
pub mod display;
pub mod edit;
pub mod editor;
pub mod error;
pub mod protocol;
pub mod suggest;
pub mod token;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use config::EditorConfig;
pub use editor::{EditorUpdate, KeyResult, MentionEditor};
pub use error::{MentionError, Result, SearchError};
pub use token::{Mention, RefType, Token, TokenSequence};

/// Identifier of a mentioned entity
pub type RefId = String;
