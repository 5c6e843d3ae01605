//! JavaScript bindings for MentionKit core types
//!
//! Structured values cross the boundary as JSON strings. Carets and offsets
//! cross as UTF-16 code units, which is what browser text surfaces report.

use crate::config::EditorConfig;
use crate::display::{char_to_utf16_offset, utf16_to_char_offset};
use crate::editor::{EditorUpdate, KeyResult, MentionEditor};
use crate::error::SearchError;
use crate::protocol::{self, canonical};
use crate::suggest::{Key, LookupResponse};
use crate::token::{Mention, RefType};
use serde::Serialize;
use std::str::FromStr;
use wasm_bindgen::prelude::*;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization failed: {}", e)))
}

fn parse_mention(mention_json: &str) -> Result<Mention, JsValue> {
    serde_json::from_str(mention_json).map_err(|e| {
        tracing::warn!(error = %e, "rejected mention payload");
        JsValue::from_str(&format!("Invalid mention: {}", e))
    })
}

/// Re-express an update's caret in UTF-16 units of its display string
fn update_to_json(mut update: EditorUpdate) -> Result<String, JsValue> {
    update.caret = char_to_utf16_offset(&update.display, update.caret);
    to_json(&update)
}

fn key_result_to_json(mut result: KeyResult) -> Result<String, JsValue> {
    if let Some(update) = result.update.as_mut() {
        update.caret = char_to_utf16_offset(&update.display, update.caret);
    }
    to_json(&result)
}

/// JavaScript-friendly wrapper for MentionEditor
#[wasm_bindgen]
pub struct WasmMentionEditor {
    inner: MentionEditor,
}

#[wasm_bindgen]
impl WasmMentionEditor {
    /// Create an editor over `canonical` (pass "" for new content).
    /// `config_json` is an optional JSON object of editor settings.
    #[wasm_bindgen(constructor)]
    pub fn new(canonical: String, config_json: Option<String>) -> Result<WasmMentionEditor, JsValue> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json).map_err(|e| {
                tracing::warn!(error = %e, "rejected editor configuration");
                JsValue::from_str(&format!("Invalid configuration: {}", e))
            })?,
            None => EditorConfig::default(),
        };

        Ok(Self {
            inner: MentionEditor::from_canonical(&canonical, config),
        })
    }

    /// Replace content from the parent's value; a no-op for our own echo
    #[wasm_bindgen(js_name = setCanonical)]
    pub fn set_canonical(&mut self, canonical: String) -> bool {
        self.inner.set_canonical(&canonical)
    }

    /// Report the surface's new value and caret (returns update JSON)
    #[wasm_bindgen(js_name = onDisplayChange)]
    pub fn on_display_change(&mut self, next: String, caret: usize) -> Result<String, JsValue> {
        let caret = utf16_to_char_offset(&next, caret);
        update_to_json(self.inner.on_display_change(&next, caret))
    }

    /// Insert a picked mention (`{"type","id","name"}` JSON) over the active trigger
    #[wasm_bindgen(js_name = onSuggestionSelected)]
    pub fn on_suggestion_selected(&mut self, mention_json: String) -> Result<String, JsValue> {
        let mention = parse_mention(&mention_json)?;
        update_to_json(self.inner.on_suggestion_selected(mention))
    }

    /// Insert the suggestion at `index` of the current list (pointer pick)
    #[wasm_bindgen(js_name = selectSuggestion)]
    pub fn select_suggestion(&mut self, index: usize) -> Result<Option<String>, JsValue> {
        let Some(candidate) = self.inner.suggestions().get(index).cloned() else {
            return Ok(None);
        };
        update_to_json(self.inner.on_suggestion_selected(candidate.mention)).map(Some)
    }

    /// Insert a mention at a UTF-16 offset, outside the suggestion flow
    #[wasm_bindgen(js_name = insertMention)]
    pub fn insert_mention(&mut self, offset: usize, mention_json: String) -> Result<String, JsValue> {
        let mention = parse_mention(&mention_json)?;
        let offset = utf16_to_char_offset(self.inner.display(), offset);
        update_to_json(self.inner.insert_mention(offset, mention))
    }

    /// Route a key press (`KeyboardEvent.key`); returns `{"handled", "update"?}` JSON
    #[wasm_bindgen(js_name = onKey)]
    pub fn on_key(&mut self, key: String) -> Result<String, JsValue> {
        let result = match Key::from_str(&key) {
            Ok(key) => self.inner.on_key(key),
            Err(_) => KeyResult {
                handled: false,
                update: None,
            },
        };
        key_result_to_json(result)
    }

    /// Deliver a multi-search response body for lookup `generation`
    #[wasm_bindgen(js_name = applyLookup)]
    pub fn apply_lookup(&mut self, generation: u64, body: String) -> bool {
        let result = protocol::parse_multi_search(&body);
        if let Err(e) = &result {
            tracing::warn!(generation, error = %e, "rejected search payload");
        }
        self.inner.apply_lookup(LookupResponse { generation, result })
    }

    /// Report that lookup `generation` failed
    #[wasm_bindgen(js_name = applyLookupError)]
    pub fn apply_lookup_error(&mut self, generation: u64, message: String) -> bool {
        self.inner
            .apply_lookup(LookupResponse::err(generation, SearchError::Transport(message)))
    }

    /// Get the canonical string
    #[wasm_bindgen(js_name = getCanonical)]
    pub fn get_canonical(&self) -> String {
        self.inner.canonical().to_string()
    }

    /// Get the display string
    #[wasm_bindgen(js_name = getDisplay)]
    pub fn get_display(&self) -> String {
        self.inner.display().to_string()
    }

    /// Get the caret in UTF-16 units
    #[wasm_bindgen(js_name = getCaret)]
    pub fn get_caret(&self) -> usize {
        char_to_utf16_offset(self.inner.display(), self.inner.caret())
    }

    /// Get referenced ids as a JSON array
    #[wasm_bindgen(js_name = getReferencedIds)]
    pub fn get_referenced_ids(&self) -> Result<String, JsValue> {
        to_json(self.inner.referenced_ids())
    }

    /// Get the current suggestion list as JSON
    #[wasm_bindgen(js_name = getSuggestions)]
    pub fn get_suggestions(&self) -> Result<String, JsValue> {
        to_json(self.inner.suggestions())
    }

    /// Get the suggestion state (`{"state": ...}`) as JSON
    #[wasm_bindgen(js_name = getSuggestionState)]
    pub fn get_suggestion_state(&self) -> Result<String, JsValue> {
        to_json(self.inner.suggestion_state())
    }

    /// Get styled overlay runs as JSON
    #[wasm_bindgen(js_name = getSegments)]
    pub fn get_segments(&self) -> Result<String, JsValue> {
        to_json(&self.inner.segments())
    }
}

/// Ids of one mention type in a canonical string, as a JSON array
#[wasm_bindgen(js_name = extractIds)]
pub fn extract_ids(canonical_text: String, ref_type: String) -> Result<String, JsValue> {
    let ref_type = RefType::parse(&ref_type).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_json(&canonical::extract_ids(&canonical_text, ref_type))
}

/// Display projection of a canonical string
#[wasm_bindgen(js_name = toPlainText)]
pub fn to_plain_text(canonical_text: String) -> String {
    canonical::to_plain_text(&canonical_text)
}
