//! Search payloads - Decode the multi-search response into mention candidates
//!
//! The search collaborator is external; this module only knows the shape of
//! its answer:
//!
//! ```json
//! {"results": [
//!   {"type": "users", "id": 7, "name": "Ana", "profileImage": "..."},
//!   {"type": "events", "id": "12", "title": "Milonga", "startDate": "2025-03-01T20:00:00Z"}
//! ]}
//! ```
//!
//! Result order is the collaborator's ranking and is preserved.

use crate::error::SearchError;
use crate::token::{Mention, RefType};
use serde::{Deserialize, Serialize};

/// A ranked suggestion: the mention it would insert plus rendering hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub mention: Mention,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Secondary line, e.g. an event's start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Candidate {
    pub fn new(mention: Mention) -> Self {
        Self {
            mention,
            avatar: None,
            detail: None,
        }
    }
}

impl From<Mention> for Candidate {
    fn from(mention: Mention) -> Self {
        Self::new(mention)
    }
}

#[derive(Deserialize)]
struct MultiSearchResponse {
    #[serde(default)]
    results: serde_json::Value,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct SearchHit {
    #[serde(rename = "type")]
    kind: String,
    id: serde_json::Value,
    name: Option<String>,
    username: Option<String>,
    title: Option<String>,
    profile_image: Option<String>,
    avatar: Option<String>,
    image: Option<String>,
    image_url: Option<String>,
    start_date: Option<String>,
}

/// Decode a multi-search response body into candidates.
///
/// Hits of unknown type, without an id, or with unexpected field types are
/// skipped. A body that is not a JSON object is [`SearchError::Malformed`].
///
/// # Example
///
/// ```rust
/// use mentionkit_core::protocol::search::parse_multi_search;
///
/// let body = r#"{"results":[{"type":"users","id":7,"name":"Ana"}]}"#;
/// let candidates = parse_multi_search(body).unwrap();
/// assert_eq!(candidates[0].mention.label(), "Ana");
/// assert_eq!(candidates[0].mention.ref_id(), "7");
/// ```
pub fn parse_multi_search(body: &str) -> Result<Vec<Candidate>, SearchError> {
    let response: MultiSearchResponse =
        serde_json::from_str(body).map_err(|e| SearchError::Malformed(e.to_string()))?;

    let Some(items) = response.results.as_array() else {
        return Ok(Vec::new());
    };

    let candidates = items
        .iter()
        .filter_map(|item| match serde_json::from_value::<SearchHit>(item.clone()) {
            Ok(hit) => candidate_from_hit(hit),
            Err(e) => {
                tracing::debug!(error = %e, "skipping undecodable search hit");
                None
            }
        })
        .collect();

    Ok(candidates)
}

fn candidate_from_hit(hit: SearchHit) -> Option<Candidate> {
    let ref_id = match &hit.id {
        serde_json::Value::String(s) if !s.is_empty() => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };

    let candidate = match hit.kind.as_str() {
        "users" => Candidate {
            mention: Mention::new(
                RefType::User,
                ref_id,
                first_non_empty([hit.name, hit.username]).unwrap_or_default(),
            ),
            avatar: first_non_empty([hit.profile_image, hit.avatar]),
            detail: None,
        },
        "events" => Candidate {
            mention: Mention::new(
                RefType::Event,
                ref_id,
                first_non_empty([hit.title, hit.name]).unwrap_or_default(),
            ),
            avatar: first_non_empty([hit.image, hit.image_url]),
            detail: hit.start_date.as_deref().and_then(format_start_date),
        },
        other => {
            tracing::debug!(kind = other, "skipping search hit of unsupported type");
            return None;
        }
    };

    Some(candidate)
}

fn first_non_empty<const N: usize>(values: [Option<String>; N]) -> Option<String> {
    values.into_iter().flatten().find(|v| !v.is_empty())
}

/// Date part (`YYYY-MM-DD`) of an event start timestamp.
#[cfg(feature = "datetime")]
fn format_start_date(raw: &str) -> Option<String> {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()?;

    Some(date.format("%Y-%m-%d").to_string())
}

/// Date part (`YYYY-MM-DD`) of an event start timestamp.
#[cfg(not(feature = "datetime"))]
fn format_start_date(raw: &str) -> Option<String> {
    raw.split('T')
        .next()
        .filter(|date| !date.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_and_events() {
        let body = r#"{"results":[
            {"type":"users","id":7,"name":"Ana","profileImage":"/a.png"},
            {"type":"events","id":"12","title":"Milonga","image":"/m.png","startDate":"2025-03-01T20:00:00Z"}
        ]}"#;

        let candidates = parse_multi_search(body).unwrap();
        assert_eq!(candidates.len(), 2);

        assert_eq!(candidates[0].mention, Mention::user("7", "Ana"));
        assert_eq!(candidates[0].avatar.as_deref(), Some("/a.png"));
        assert_eq!(candidates[0].detail, None);

        assert_eq!(candidates[1].mention, Mention::event("12", "Milonga"));
        assert_eq!(candidates[1].avatar.as_deref(), Some("/m.png"));
        assert_eq!(candidates[1].detail.as_deref(), Some("2025-03-01"));
    }

    #[test]
    fn test_label_fallbacks() {
        let body = r#"{"results":[
            {"type":"users","id":1,"name":"","username":"ana_t"},
            {"type":"users","id":2},
            {"type":"events","id":3,"name":"Practica"},
            {"type":"events","id":4,"title":null}
        ]}"#;

        let labels: Vec<String> = parse_multi_search(body)
            .unwrap()
            .into_iter()
            .map(|c| c.mention.label().to_string())
            .collect();

        assert_eq!(labels, vec!["ana_t", "Unknown User", "Practica", "Unknown Event"]);
    }

    #[test]
    fn test_skips_unusable_hits() {
        let body = r#"{"results":[
            {"type":"posts","id":1,"title":"nope"},
            {"type":"users","name":"no id"},
            {"type":"users","id":"","name":"empty id"},
            {"type":"users","id":5,"name":42},
            {"type":"users","id":6,"name":"Bo"}
        ]}"#;

        let candidates = parse_multi_search(body).unwrap();
        assert_eq!(candidates, vec![Candidate::new(Mention::user("6", "Bo"))]);
    }

    #[test]
    fn test_missing_or_odd_results() {
        assert!(parse_multi_search("{}").unwrap().is_empty());
        assert!(parse_multi_search(r#"{"results":{"users":[]}}"#).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            parse_multi_search("<html>"),
            Err(SearchError::Malformed(_))
        ));
    }

    #[test]
    fn test_candidate_json_is_flat() {
        let candidate = Candidate {
            mention: Mention::event("3", "Milonga"),
            avatar: None,
            detail: Some("2025-03-01".to_string()),
        };
        let json = serde_json::to_value(&candidate).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"type": "event", "id": "3", "name": "Milonga", "detail": "2025-03-01"})
        );
        let back: Candidate = serde_json::from_value(json).unwrap();
        assert_eq!(back, candidate);
    }
}
