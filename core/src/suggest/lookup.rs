//! Lookup plumbing between the suggestion controller and the search collaborator
//!
//! The controller never awaits anything itself. It hands out a
//! [`LookupRequest`] and later receives a [`LookupResponse`]; how the
//! request travels (HTTP, worker, in-memory fixture) is the host's business.

use crate::error::SearchError;
use crate::protocol::Candidate;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// A lookup the host should perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    /// Tag that must come back on the response.
    pub generation: u64,
    pub query: String,
    pub limit: usize,
}

/// Outcome of a lookup, tagged with the generation of its request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResponse {
    pub generation: u64,
    pub result: Result<Vec<Candidate>, SearchError>,
}

impl LookupResponse {
    pub fn ok(generation: u64, candidates: Vec<Candidate>) -> Self {
        Self {
            generation,
            result: Ok(candidates),
        }
    }

    pub fn err(generation: u64, error: SearchError) -> Self {
        Self {
            generation,
            result: Err(error),
        }
    }
}

/// Search collaborator: ranked candidates for a query.
///
/// The returned future must not borrow the searcher, so it can be spawned
/// or polled after the editor has moved on.
pub trait MentionSearch {
    fn search(&self, query: &str, limit: usize)
        -> BoxFuture<'static, Result<Vec<Candidate>, SearchError>>;
}

impl<F> MentionSearch for F
where
    F: Fn(&str, usize) -> BoxFuture<'static, Result<Vec<Candidate>, SearchError>>,
{
    fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> BoxFuture<'static, Result<Vec<Candidate>, SearchError>> {
        self(query, limit)
    }
}

/// Run `request` against `search`, producing a response tagged with the
/// request's generation.
pub fn lookup<S>(search: &S, request: LookupRequest) -> impl Future<Output = LookupResponse> + Send
where
    S: MentionSearch + ?Sized,
{
    let generation = request.generation;
    let pending = search.search(&request.query, request.limit);

    async move {
        let result = pending.await;
        if let Err(err) = &result {
            tracing::debug!(generation, error = %err, "lookup failed");
        }
        LookupResponse { generation, result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Mention;
    use futures::executor::block_on;
    use futures::FutureExt;

    fn fixture(query: &str, limit: usize) -> BoxFuture<'static, Result<Vec<Candidate>, SearchError>> {
        let all = vec![
            Candidate::from(Mention::user("1", "Marcos")),
            Candidate::from(Mention::user("2", "Marta")),
            Candidate::from(Mention::user("3", "Ana")),
        ];
        let query = query.to_lowercase();
        let hits: Vec<_> = all
            .into_iter()
            .filter(|c| c.mention.label().to_lowercase().starts_with(&query))
            .take(limit)
            .collect();
        futures::future::ready(Ok(hits)).boxed()
    }

    #[test]
    fn test_lookup_tags_generation() {
        let request = LookupRequest {
            generation: 4,
            query: "mar".to_string(),
            limit: 10,
        };
        let response = block_on(lookup(&fixture, request));

        assert_eq!(response.generation, 4);
        let labels: Vec<_> = response
            .result
            .unwrap()
            .into_iter()
            .map(|c| c.mention.label().to_string())
            .collect();
        assert_eq!(labels, vec!["Marcos", "Marta"]);
    }

    #[test]
    fn test_lookup_respects_limit() {
        let request = LookupRequest {
            generation: 1,
            query: String::new(),
            limit: 2,
        };
        let response = block_on(lookup(&fixture, request));
        assert_eq!(response.result.unwrap().len(), 2);
    }

    #[test]
    fn test_lookup_error_passes_through() {
        let failing = |_: &str, _: usize| -> BoxFuture<'static, Result<Vec<Candidate>, SearchError>> {
            futures::future::ready(Err(SearchError::Transport("offline".to_string()))).boxed()
        };
        let request = LookupRequest {
            generation: 2,
            query: "a".to_string(),
            limit: 10,
        };
        let response = block_on(lookup(&failing, request));

        assert_eq!(
            response,
            LookupResponse::err(2, SearchError::Transport("offline".to_string()))
        );
    }
}
