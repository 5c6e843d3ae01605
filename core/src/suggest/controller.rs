/// Suggestion Controller
///
/// Tracks the `@query` the user is typing and the lookup it drives:
///
/// ```text
/// Idle -> Triggered -> Searching -> Suggesting -> (selection) -> Idle
/// ```
///
/// Any change that removes the trigger (caret moved away, whitespace typed,
/// `@` deleted) returns to Idle. Typing more of the query issues a fresh
/// lookup under a new generation; responses from older generations are
/// dropped on arrival.
use super::generation::GenerationCounter;
use super::lookup::{LookupRequest, LookupResponse};
use super::trigger::{find_trigger, Trigger};
use crate::config::EditorConfig;
use crate::protocol::Candidate;
use crate::token::TokenSequence;
use serde::{Deserialize, Serialize};
use strum::EnumString;

/// Where the controller is in the suggestion lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SuggestionState {
    /// No active trigger
    Idle,

    /// Trigger present but the query is too short to look up
    Triggered { trigger: Trigger },

    /// Lookup in flight
    Searching { trigger: Trigger, generation: u64 },

    /// Results available (possibly empty)
    Suggesting {
        trigger: Trigger,
        candidates: Vec<Candidate>,
        selected: usize,
    },
}

impl SuggestionState {
    pub fn trigger(&self) -> Option<&Trigger> {
        match self {
            SuggestionState::Idle => None,
            SuggestionState::Triggered { trigger }
            | SuggestionState::Searching { trigger, .. }
            | SuggestionState::Suggesting { trigger, .. } => Some(trigger),
        }
    }
}

/// Keys the suggestion list reacts to, named as hosts report them
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum Key {
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
}

/// What the host should do with a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not ours; let the editable surface have it
    Ignored,

    /// Consumed; suppress the default action
    Handled,

    /// Consumed; insert this candidate
    Select(Candidate),
}

#[derive(Debug, Clone)]
pub struct SuggestionController {
    state: SuggestionState,
    generations: GenerationCounter,
    min_query_len: usize,
    max_suggestions: usize,
}

impl SuggestionController {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            state: SuggestionState::Idle,
            generations: GenerationCounter::new(),
            min_query_len: config.min_query_len,
            max_suggestions: config.max_suggestions.max(1),
        }
    }

    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    /// Active trigger, if any
    pub fn trigger(&self) -> Option<&Trigger> {
        self.state.trigger()
    }

    /// Suggestions currently shown (empty unless results have arrived)
    pub fn suggestions(&self) -> &[Candidate] {
        match &self.state {
            SuggestionState::Suggesting { candidates, .. } => candidates.as_slice(),
            _ => &[],
        }
    }

    /// Highlighted suggestion
    pub fn selected(&self) -> Option<&Candidate> {
        match &self.state {
            SuggestionState::Suggesting {
                candidates,
                selected,
                ..
            } => candidates.get(*selected),
            _ => None,
        }
    }

    /// Whether a non-empty suggestion list is showing
    pub fn is_open(&self) -> bool {
        !self.suggestions().is_empty()
    }

    /// Generation of the most recently issued lookup (0 if none)
    pub fn latest_generation(&self) -> u64 {
        self.generations.current()
    }

    /// Re-evaluate the trigger after the sequence or caret changed.
    ///
    /// Returns a lookup to perform when the query changed and is long
    /// enough. Issuing it supersedes any lookup still in flight.
    pub fn on_change(&mut self, seq: &TokenSequence, caret: usize) -> Option<LookupRequest> {
        let Some(trigger) = find_trigger(seq, caret) else {
            if self.state != SuggestionState::Idle {
                tracing::debug!("trigger gone, closing suggestions");
            }
            self.state = SuggestionState::Idle;
            return None;
        };

        let unchanged = self.trigger() == Some(&trigger);
        if unchanged && !matches!(self.state, SuggestionState::Triggered { .. }) {
            return None;
        }

        if trigger.query.chars().count() < self.min_query_len {
            self.state = SuggestionState::Triggered { trigger };
            return None;
        }

        let generation = self.generations.next();
        tracing::debug!(generation, query = %trigger.query, "issuing mention lookup");

        let request = LookupRequest {
            generation,
            query: trigger.query.clone(),
            limit: self.max_suggestions,
        };
        self.state = SuggestionState::Searching {
            trigger,
            generation,
        };
        Some(request)
    }

    /// Apply a lookup response. Returns `false` if it was stale and dropped.
    ///
    /// A failed lookup is shown as an empty list.
    pub fn accept(&mut self, response: LookupResponse) -> bool {
        let trigger = match &self.state {
            SuggestionState::Searching {
                trigger,
                generation,
            } if *generation == response.generation
                && self.generations.is_current(response.generation) =>
            {
                trigger.clone()
            }
            _ => {
                tracing::debug!(
                    generation = response.generation,
                    latest = self.generations.current(),
                    "dropping stale lookup response"
                );
                return false;
            }
        };

        let mut candidates = match response.result {
            Ok(candidates) => candidates,
            Err(err) => {
                tracing::warn!(query = %trigger.query, error = %err, "mention search failed");
                Vec::new()
            }
        };
        candidates.truncate(self.max_suggestions);

        self.state = SuggestionState::Suggesting {
            trigger,
            candidates,
            selected: 0,
        };
        true
    }

    /// Handle navigation keys while suggestions are showing.
    ///
    /// Arrow keys wrap around the list. Escape closes any active trigger,
    /// including one whose lookup is still in flight, but is only reported
    /// as handled when a list was showing. Other keys are ignored while the
    /// list is empty or closed.
    pub fn on_key(&mut self, key: Key) -> KeyOutcome {
        if key == Key::Escape {
            let was_open = self.is_open();
            self.dismiss();
            return if was_open {
                KeyOutcome::Handled
            } else {
                KeyOutcome::Ignored
            };
        }

        let SuggestionState::Suggesting {
            candidates,
            selected,
            ..
        } = &mut self.state
        else {
            return KeyOutcome::Ignored;
        };
        if candidates.is_empty() {
            return KeyOutcome::Ignored;
        }

        let len = candidates.len();
        match key {
            Key::Enter => KeyOutcome::Select(candidates[*selected].clone()),
            Key::ArrowDown => {
                *selected = (*selected + 1) % len;
                KeyOutcome::Handled
            }
            Key::ArrowUp => {
                *selected = (*selected + len - 1) % len;
                KeyOutcome::Handled
            }
            Key::Escape => KeyOutcome::Ignored,
        }
    }

    /// Close the list for the trigger being selected, handing it back so the
    /// caller can replace its span. `None` when there is no active trigger.
    pub fn select(&mut self) -> Option<Trigger> {
        match std::mem::replace(&mut self.state, SuggestionState::Idle) {
            SuggestionState::Idle => None,
            SuggestionState::Triggered { trigger }
            | SuggestionState::Searching { trigger, .. }
            | SuggestionState::Suggesting { trigger, .. } => Some(trigger),
        }
    }

    /// Close the list until the next change re-detects a trigger
    pub fn dismiss(&mut self) {
        if self.state != SuggestionState::Idle {
            tracing::debug!("suggestions dismissed");
        }
        self.state = SuggestionState::Idle;
    }
}
