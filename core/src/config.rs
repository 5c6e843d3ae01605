//! Editor configuration
//!
//! Hosts pass configuration as JSON; every field is optional and falls back
//! to its default.

use crate::error::{MentionError, Result};
use crate::token::RefType;
use serde::{Deserialize, Serialize};

/// Queries shorter than this (in chars) do not start a lookup.
pub const DEFAULT_MIN_QUERY_LEN: usize = 1;

/// Upper bound on suggestions shown at once.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Minimum query length before a lookup is issued. 0 looks up on a bare `@`.
    pub min_query_len: usize,

    /// Maximum number of suggestions requested and kept. Must be at least 1.
    pub max_suggestions: usize,

    /// Mention types whose ids are reported to the host after each change.
    pub notify_ref_types: Vec<RefType>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            notify_ref_types: vec![RefType::User],
        }
    }
}

impl EditorConfig {
    /// Parse and validate configuration from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_suggestions == 0 {
            return Err(MentionError::Config(
                "max_suggestions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
