//! WASM bindings for MentionKit
//!
//! This module provides JavaScript-friendly bindings for the mention editor.

pub mod bindings;
pub mod utils;

// Re-export main types
pub use bindings::{extract_ids, to_plain_text, WasmMentionEditor};
pub use utils::init_panic_hook;
