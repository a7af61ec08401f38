//! # Draft Controller
//!
//! Stages an isolated edit session over exactly one target: a node in the
//! tree, or the collection root itself. The draft is a deep copy, never a
//! reference into the store, so half-edited state cannot leak into list
//! views while the user types, and discarding is just dropping the copy.
//!
//! Transitions that would lose unsaved edits do not prompt; they return
//! [`SelectOutcome::ConfirmationRequired`] and the caller re-issues the
//! discarding variant once the user has decided.

use crate::collection::node::{Collection, Node, NodeId};
use anyhow::{bail, Result};

/// What the current draft is a copy of.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftTarget {
    /// Editing the collection root (name/description, dashboard view).
    Root(Collection),
    /// Editing a single node.
    Node(Node),
}

/// Outcome of a guarded selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The draft now holds a fresh copy of the new target.
    Selected,
    /// Unsaved edits would be lost; nothing changed. Re-issue with
    /// [`DraftController::select_discarding`] after confirmation.
    ConfirmationRequired,
}

/// JSON-bearing request fields that can be reformatted in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonField {
    Body,
    ResponseExample,
}

/// Editing state machine: no draft (clean), a viewing draft (`dirty ==
/// false`), or an editing draft (`dirty == true`).
#[derive(Debug, Clone, Default)]
pub struct DraftController {
    draft: Option<DraftTarget>,
    dirty: bool,
    selected: Option<NodeId>,
}

impl DraftController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_draft(&self) -> bool {
        self.draft.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn draft(&self) -> Option<&DraftTarget> {
        self.draft.as_ref()
    }

    /// Select a new target, guarded against losing unsaved edits.
    pub fn select(&mut self, id: Option<NodeId>, collection: &Collection) -> SelectOutcome {
        if self.dirty {
            return SelectOutcome::ConfirmationRequired;
        }
        self.select_discarding(id, collection);
        SelectOutcome::Selected
    }

    /// Select a new target, dropping any dirty draft. This is the resume
    /// path after the user confirmed the discard.
    ///
    /// An id that no longer resolves (stale selection after a reload) falls
    /// back to a copy of the root.
    pub fn select_discarding(&mut self, id: Option<NodeId>, collection: &Collection) {
        let target = id
            .as_ref()
            .and_then(|node_id| collection.find(node_id))
            .map(|node| DraftTarget::Node(node.clone()))
            .unwrap_or_else(|| DraftTarget::Root(collection.clone()));

        tracing::debug!(selected = ?id, "draft target selected");
        self.draft = Some(target);
        self.selected = id;
        self.dirty = false;
    }

    /// Apply an edit to the draft and mark it dirty. Returns `false` when
    /// there is no draft to edit.
    pub fn edit(&mut self, apply: impl FnOnce(&mut DraftTarget)) -> bool {
        match self.draft.as_mut() {
            Some(target) => {
                apply(target);
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Reformat a JSON field of a request draft in place. An empty field is
    /// left alone; invalid JSON is a validation error and the draft is not
    /// touched.
    pub fn prettify(&mut self, field: JsonField) -> Result<()> {
        let request = match self.draft.as_mut() {
            Some(DraftTarget::Node(Node::Request(request))) => request,
            _ => bail!("no request selected"),
        };
        let value = match field {
            JsonField::Body => &mut request.body,
            JsonField::ResponseExample => &mut request.response_example,
        };
        if value.is_empty() {
            return Ok(());
        }
        let parsed: serde_json::Value = match serde_json::from_str(value) {
            Ok(parsed) => parsed,
            Err(_) => bail!("invalid JSON"),
        };
        *value = serde_json::to_string_pretty(&parsed)?;
        self.dirty = true;
        Ok(())
    }

    /// Mark the draft as committed; it stays selected for further viewing.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// The user confirmed the pending edits may be lost: they stop counting
    /// as unsaved. The draft copy itself is replaced by whatever transition
    /// follows.
    pub fn discard_edits(&mut self) {
        self.dirty = false;
    }

    /// Drop everything: back to the clean, unselected state.
    pub fn clear(&mut self) {
        self.draft = None;
        self.selected = None;
        self.dirty = false;
    }
}
