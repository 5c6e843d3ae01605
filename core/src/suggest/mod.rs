//! Mention suggestions
//!
//! Detects the `@query` being typed, drives lookups against the search
//! collaborator and keeps only the freshest answer.

mod controller;
pub mod generation;
mod lookup;
mod trigger;

pub use controller::{Key, KeyOutcome, SuggestionController, SuggestionState};
pub use generation::GenerationCounter;
pub use lookup::{lookup, LookupRequest, LookupResponse, MentionSearch};
pub use trigger::{find_trigger, Trigger, TRIGGER_CHAR};
