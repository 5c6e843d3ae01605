//! Wire formats crossing the system boundary
//!
//! - [`canonical`]: the stored `@[label](type:id)` string form of a token sequence
//! - [`search`]: the search collaborator's response shape

pub mod canonical;
pub mod search;

pub use canonical::{decode, encode};
pub use search::{parse_multi_search, Candidate};
