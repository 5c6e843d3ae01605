//! Editing the token sequence in response to input events
//!
//! - [`diff`]: single-hunk prefix/suffix diff of two display strings
//! - [`reconcile`]: apply a display change to the tokens, keeping mentions atomic
//! - [`insert_mention_at`] / [`replace_with_mention`]: mention insertion
//!
//! All operations are pure: they take the current sequence by reference and
//! return a new one along with the caret offset to restore.

pub mod diff;
mod insert;
mod reconcile;

pub use diff::{single_hunk, single_hunk_at_caret, Hunk};
pub use insert::{insert_mention_at, replace_with_mention, Inserted};
pub use reconcile::{apply_edit, reconcile, reconcile_at_caret, Reconciled};
