/// Mention Editor
///
/// Owns the token sequence of one input surface and turns host events into
/// explicit updates. The host reports raw display changes, key presses,
/// suggestion picks and lookup answers; every mutation returns an
/// [`EditorUpdate`] carrying the new canonical string, the display string
/// and caret to restore, changed referenced ids, and any lookup to start.
///
/// The canonical and display strings are projections of the sequence and
/// are recomputed on every commit, never edited directly.
use crate::config::EditorConfig;
use crate::display::{self, Segment};
use crate::edit;
use crate::protocol::{self, Candidate};
use crate::suggest::{
    Key, KeyOutcome, LookupRequest, LookupResponse, SuggestionController, SuggestionState,
};
use crate::token::{Mention, TokenSequence};
use serde::Serialize;

/// Outcome of one editor mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorUpdate {
    /// Canonical string to hand to the parent
    pub canonical: String,

    /// Display string the editable surface should show
    pub display: String,

    /// Caret offset (chars) to restore in the display string
    pub caret: usize,

    /// Referenced ids, present only when they changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referenced_ids: Option<Vec<String>>,

    /// Lookup the host should run and report back through `apply_lookup`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup: Option<LookupRequest>,
}

/// Outcome of a key press
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyResult {
    /// Whether the host should suppress the key's default action
    pub handled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<EditorUpdate>,
}

#[derive(Debug, Clone)]
pub struct MentionEditor {
    tokens: TokenSequence,
    display: String,
    caret: usize,
    last_canonical: String,
    referenced: Vec<String>,
    controller: SuggestionController,
    config: EditorConfig,
}

impl MentionEditor {
    /// Create an empty editor
    pub fn new(config: EditorConfig) -> Self {
        Self::from_tokens(TokenSequence::new(), String::new(), config)
    }

    /// Create an editor over existing content
    pub fn from_canonical(canonical: &str, config: EditorConfig) -> Self {
        Self::from_tokens(protocol::decode(canonical), canonical.to_string(), config)
    }

    fn from_tokens(tokens: TokenSequence, canonical: String, config: EditorConfig) -> Self {
        let display = display::to_display(&tokens);
        let referenced = tokens.referenced_ids(&config.notify_ref_types);
        Self {
            caret: tokens.display_len(),
            tokens,
            display,
            last_canonical: canonical,
            referenced,
            controller: SuggestionController::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenSequence {
        &self.tokens
    }

    /// Canonical string last emitted (or loaded)
    pub fn canonical(&self) -> &str {
        &self.last_canonical
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn referenced_ids(&self) -> &[String] {
        &self.referenced
    }

    pub fn suggestion_state(&self) -> &SuggestionState {
        self.controller.state()
    }

    pub fn suggestions(&self) -> &[Candidate] {
        self.controller.suggestions()
    }

    /// Highlighted suggestion, if the list is showing
    pub fn selected_suggestion(&self) -> Option<&Candidate> {
        self.controller.selected()
    }

    /// Styled runs for an overlay renderer
    pub fn segments(&self) -> Vec<Segment> {
        display::segments(&self.tokens)
    }

    /// Replace the content from outside (e.g. the parent's value changed).
    ///
    /// Ignored when `canonical` is what this editor last emitted, so the
    /// parent echoing our own change back does not reset anything. Returns
    /// whether the content was replaced.
    pub fn set_canonical(&mut self, canonical: &str) -> bool {
        if canonical == self.last_canonical {
            return false;
        }

        tracing::debug!("external value replaced editor content");
        self.tokens = protocol::decode(canonical);
        self.display = display::to_display(&self.tokens);
        self.caret = self.tokens.display_len();
        self.last_canonical = canonical.to_string();
        self.referenced = self.tokens.referenced_ids(&self.config.notify_ref_types);
        self.controller.dismiss();
        true
    }

    /// Fold one raw change of the editable surface into the tokens.
    ///
    /// `next` is the surface's new display string and `caret` its reported
    /// caret (chars). When the reconciled display differs from `next` (a
    /// mention was removed whole) the surface must be reset to the returned
    /// display and caret.
    pub fn on_display_change(&mut self, next: &str, caret: usize) -> EditorUpdate {
        let reconciled = edit::reconcile_at_caret(&self.display, next, caret, &self.tokens);
        let display = display::to_display(&reconciled.tokens);

        let caret = if display == next {
            caret.min(reconciled.tokens.display_len())
        } else {
            tracing::trace!(caret = reconciled.caret, "surface diverged from tokens, moving caret");
            reconciled.caret
        };

        let lookup = self.controller.on_change(&reconciled.tokens, caret);
        self.commit(reconciled.tokens, display, caret, lookup)
    }

    /// Insert a picked suggestion in place of the active `@query`.
    ///
    /// Without an active trigger the mention goes in at the caret.
    pub fn on_suggestion_selected(&mut self, mention: Mention) -> EditorUpdate {
        let inserted = match self.controller.select() {
            Some(trigger) => {
                tracing::debug!(query = %trigger.query, ref_id = mention.ref_id(), "replacing trigger with mention");
                edit::replace_with_mention(&self.tokens, trigger.span(), mention)
            }
            None => edit::insert_mention_at(&self.tokens, self.caret, mention),
        };

        let display = display::to_display(&inserted.tokens);
        self.commit(inserted.tokens, display, inserted.caret, None)
    }

    /// Insert a mention at a display offset, outside the suggestion flow
    pub fn insert_mention(&mut self, display_offset: usize, mention: Mention) -> EditorUpdate {
        self.controller.dismiss();
        let inserted = edit::insert_mention_at(&self.tokens, display_offset, mention);
        let display = display::to_display(&inserted.tokens);
        self.commit(inserted.tokens, display, inserted.caret, None)
    }

    /// Route a key press to the suggestion list
    pub fn on_key(&mut self, key: Key) -> KeyResult {
        match self.controller.on_key(key) {
            KeyOutcome::Ignored => KeyResult {
                handled: false,
                update: None,
            },
            KeyOutcome::Handled => KeyResult {
                handled: true,
                update: None,
            },
            KeyOutcome::Select(candidate) => KeyResult {
                handled: true,
                update: Some(self.on_suggestion_selected(candidate.mention)),
            },
        }
    }

    /// Deliver a lookup answer. Returns whether the suggestion list changed.
    pub fn apply_lookup(&mut self, response: LookupResponse) -> bool {
        self.controller.accept(response)
    }

    fn commit(
        &mut self,
        tokens: TokenSequence,
        display: String,
        caret: usize,
        lookup: Option<LookupRequest>,
    ) -> EditorUpdate {
        debug_assert!(tokens.is_normalized(), "editor tokens must stay normalized");

        let canonical = protocol::encode(&tokens);
        let ids = tokens.referenced_ids(&self.config.notify_ref_types);
        let referenced_ids = if ids != self.referenced {
            tracing::debug!(count = ids.len(), "referenced ids changed");
            self.referenced = ids.clone();
            Some(ids)
        } else {
            None
        };

        self.tokens = tokens;
        self.display = display.clone();
        self.caret = caret;
        self.last_canonical = canonical.clone();

        EditorUpdate {
            canonical,
            display,
            caret,
            referenced_ids,
            lookup,
        }
    }
}

impl Default for MentionEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
