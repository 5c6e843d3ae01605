//! Mention: an atomic reference to another entity
//!
//! A mention snapshots the entity's display name at insertion time. It is
//! never re-resolved, so renaming a user does not rewrite old posts.

use crate::error::{MentionError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::EnumString;

/// Kind of entity a mention points at.
///
/// Names are matched case-sensitively, the same way stored canonical markers
/// are parsed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RefType {
    User,
    Event,
    Group,
    City,
}

impl RefType {
    /// All known ref types, in canonical order.
    pub const ALL: [RefType; 4] = [RefType::User, RefType::Event, RefType::Group, RefType::City];

    /// Parse a ref type name.
    pub fn parse(s: &str) -> Result<Self> {
        <Self as FromStr>::from_str(s).map_err(|_| MentionError::UnknownRefType(s.to_string()))
    }

    /// Name used in canonical markers and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            RefType::User => "user",
            RefType::Event => "event",
            RefType::Group => "group",
            RefType::City => "city",
        }
    }

    /// Label used when an entity has no usable display name.
    pub fn placeholder_label(&self) -> &'static str {
        match self {
            RefType::User => "Unknown User",
            RefType::Event => "Unknown Event",
            RefType::Group => "Unknown Group",
            RefType::City => "Unknown City",
        }
    }
}

impl std::fmt::Display for RefType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An atomic reference rendered as `@label`.
///
/// Construction strips the characters that would break the canonical marker
/// (`]` in the label, `)` in the id), so every mention encodes to a marker the
/// decoder recognises again. An empty label falls back to the ref type's
/// placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "MentionFields")]
pub struct Mention {
    #[serde(rename = "type")]
    ref_type: RefType,

    #[serde(rename = "id")]
    ref_id: String,

    #[serde(rename = "name")]
    label: String,
}

/// Unvalidated wire shape, routed through [`Mention::new`] on deserialization.
#[derive(Deserialize)]
struct MentionFields {
    #[serde(rename = "type")]
    ref_type: RefType,
    #[serde(rename = "id")]
    ref_id: String,
    #[serde(rename = "name")]
    label: String,
}

impl From<MentionFields> for Mention {
    fn from(fields: MentionFields) -> Self {
        Mention::new(fields.ref_type, fields.ref_id, fields.label)
    }
}

impl Mention {
    /// Create a mention, sanitising label and id for the canonical encoding.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mentionkit_core::token::{Mention, RefType};
    ///
    /// let m = Mention::new(RefType::User, "42", "Marcos");
    /// assert_eq!(m.len(), 7); // "@Marcos"
    ///
    /// let odd = Mention::new(RefType::Event, "7)", "Tango ]Night");
    /// assert_eq!(odd.ref_id(), "7");
    /// assert_eq!(odd.label(), "Tango Night");
    /// ```
    pub fn new(ref_type: RefType, ref_id: impl Into<String>, label: impl Into<String>) -> Self {
        let mut ref_id = ref_id.into();
        ref_id.retain(|c| c != ')');

        let mut label = label.into();
        label.retain(|c| c != ']');
        if label.is_empty() {
            label = ref_type.placeholder_label().to_string();
        }

        Self {
            ref_type,
            ref_id,
            label,
        }
    }

    /// Shorthand for a user mention.
    pub fn user(ref_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(RefType::User, ref_id, label)
    }

    /// Shorthand for an event mention.
    pub fn event(ref_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(RefType::Event, ref_id, label)
    }

    pub fn ref_type(&self) -> RefType {
        self.ref_type
    }

    pub fn ref_id(&self) -> &str {
        &self.ref_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Display length in chars: the `@` plus the label.
    pub fn len(&self) -> usize {
        1 + self.label.chars().count()
    }

    /// A mention always renders at least the `@`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Display rendering, `@label`.
    pub fn display(&self) -> String {
        format!("@{}", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_type_parse() {
        assert_eq!(RefType::parse("user").unwrap(), RefType::User);
        assert_eq!(RefType::parse("city").unwrap(), RefType::City);
        assert_eq!(
            RefType::parse("User"),
            Err(MentionError::UnknownRefType("User".to_string()))
        );
        assert!(RefType::parse("venue").is_err());
    }

    #[test]
    fn test_ref_type_names_round_trip() {
        for ref_type in RefType::ALL {
            assert_eq!(RefType::parse(ref_type.as_str()).unwrap(), ref_type);
            assert_eq!(ref_type.to_string(), ref_type.as_str());
        }
    }

    #[test]
    fn test_mention_len_counts_chars() {
        assert_eq!(Mention::user("1", "Ana").len(), 4);
        assert_eq!(Mention::user("1", "Zoë").len(), 4);
        assert_eq!(Mention::user("1", "Ana").display(), "@Ana");
    }

    #[test]
    fn test_mention_sanitises_marker_breakers() {
        let m = Mention::new(RefType::Group, "tango-(ba)", "Ba]]res");
        assert_eq!(m.ref_id(), "tango-(ba");
        assert_eq!(m.label(), "Bares");
    }

    #[test]
    fn test_empty_label_uses_placeholder() {
        assert_eq!(Mention::user("1", "").label(), "Unknown User");
        assert_eq!(Mention::event("1", "]").label(), "Unknown Event");
    }

    #[test]
    fn test_mention_json_shape() {
        let m = Mention::user("42", "Marcos");
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "user", "id": "42", "name": "Marcos"})
        );

        let back: Mention =
            serde_json::from_str(r#"{"type":"event","id":"9)","name":""}"#).unwrap();
        assert_eq!(back, Mention::event("9", "Unknown Event"));
    }
}
