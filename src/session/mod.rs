// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editing session over one loaded batch.
//!
//! A [`Session`] owns the [`RecordStore`], the active record index and the [`EditBuffer`] for the
//! active record. Every structural action (navigate, add, refresh, save, export) first folds the
//! buffer into the store through [`ops::reconcile`], so in-progress edits are never lost.
//! [`Editor`] owns the session lifecycle (open, load original, close).

use tracing::{debug, error, info};

use crate::model::{PiiType, Record, Relevance};
use crate::ops::{self, ValidationError};
use crate::store::{IndexError, ParseError, RecordStore};

mod edit_buffer;
mod lifecycle;

pub use edit_buffer::EditBuffer;
pub use lifecycle::{Editor, LifecycleError, LifecycleWarning};

pub const MSG_EDITS_SAVED: &str = "Edits saved (in memory).";
pub const MSG_PIIS_REFRESHED: &str = "PIIs updated to match context.";
pub const MSG_ORIGINAL_RELOADED: &str = "Original data reloaded.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    store: RecordStore,
    active_index: usize,
    edits: EditBuffer,
}

impl Session {
    pub fn new(store: RecordStore) -> Self {
        Self { store, active_index: 0, edits: EditBuffer::default() }
    }

    pub fn load<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Self, ParseError> {
        RecordStore::load(lines).map(Self::new)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn edits(&self) -> &EditBuffer {
        &self.edits
    }

    /// The stored active record, without pending edits.
    pub fn active_record(&self) -> &Record {
        // The index is kept within bounds by every mutation and the store is never empty.
        &self.store.records()[self.active_index]
    }

    /// The active record as the user currently sees it: stored record plus pending edits.
    pub fn current_view(&self) -> Record {
        let record = self.active_record();
        ops::reconcile(
            record,
            self.edits.context(),
            self.edits.question(),
            self.edits.edited_annotations(record),
        )
    }

    pub fn set_context(&mut self, context: impl Into<String>) {
        self.edits.set_context(context);
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.edits.set_question(question);
    }

    pub fn set_annotation_type(&mut self, key: &str, pii_type: PiiType) {
        self.edits.set_pii_type(key, pii_type);
    }

    pub fn set_annotation_relevance(&mut self, key: &str, relevance: Relevance) {
        self.edits.set_relevance(key, relevance);
    }

    /// Moves the buffered type of `key` one step through the selector order.
    pub fn cycle_annotation_type(&mut self, key: &str, forward: bool) -> Option<PiiType> {
        let current = self.current_view().piis().get(key)?.pii_type();
        let next = if forward { current.next() } else { current.prev() };
        self.edits.set_pii_type(key, next);
        Some(next)
    }

    pub fn toggle_annotation_relevance(&mut self, key: &str) -> Option<Relevance> {
        let next = self.current_view().piis().get(key)?.relevance().toggle();
        self.edits.set_relevance(key, next);
        Some(next)
    }

    /// Folds pending edits into the active record and clears the buffer.
    fn fold_edits(&mut self) {
        if self.edits.is_empty() {
            return;
        }
        let view = self.current_view();
        self.store_active(view);
    }

    fn store_active(&mut self, record: Record) {
        let idx = self.active_index;
        if let Err(err) = self.store.replace(idx, record) {
            error!(%err, "active index out of range; edits dropped");
        }
        self.edits.clear();
    }

    pub fn save_edits(&mut self) {
        self.fold_edits();
        debug!(index = self.active_index, "saved edits");
    }

    /// Reconciles, then drops annotations no longer present in the passage.
    ///
    /// Returns the removed keys.
    pub fn refresh_annotations(&mut self) -> Vec<String> {
        let view = self.current_view();
        let removed = ops::stale_keys(&view);
        self.store_active(ops::prune_to_context(&view));
        info!(index = self.active_index, removed = removed.len(), "refreshed annotations");
        removed
    }

    /// Adds an annotation to the active record.
    ///
    /// Validation runs against the current view; on error nothing changes. On success the
    /// trimmed key is returned.
    pub fn add_annotation(
        &mut self,
        value: &str,
        pii_type: PiiType,
        relevance: Relevance,
    ) -> Result<String, ValidationError> {
        let view = self.current_view();
        let next = ops::add_annotation(&view, value, pii_type, relevance).map_err(|err| {
            debug!(index = self.active_index, code = err.code(), "rejected annotation");
            err
        })?;
        let key = value.trim().to_owned();
        self.store_active(next);
        info!(
            index = self.active_index,
            key_len = key.len(),
            pii_type = %pii_type,
            "added annotation"
        );
        Ok(key)
    }

    pub fn can_go_previous(&self) -> bool {
        self.active_index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.active_index + 1 < self.len()
    }

    pub fn go_previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.fold_edits();
        self.active_index -= 1;
        debug!(index = self.active_index, "moved to previous record");
        true
    }

    pub fn go_next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.fold_edits();
        self.active_index += 1;
        debug!(index = self.active_index, "moved to next record");
        true
    }

    /// Jumps to the 1-based record `target`.
    ///
    /// Targets outside `1..=len` are rejected without reconciling; the error carries the rejected
    /// 1-based target.
    pub fn go_to(&mut self, target: usize) -> Result<(), IndexError> {
        let len = self.len();
        if target == 0 || target > len {
            return Err(IndexError { index: target, len });
        }
        self.fold_edits();
        self.active_index = target - 1;
        debug!(index = self.active_index, "jumped to record");
        Ok(())
    }

    /// Reconciles the active record and serializes the whole batch.
    pub fn export_lines(&mut self) -> Result<Vec<String>, serde_json::Error> {
        self.fold_edits();
        self.store.export()
    }

    /// Drops pending edits and returns every record to its loaded state.
    pub fn restore_original(&mut self) {
        self.edits.clear();
        self.store.restore();
        self.active_index = 0;
        info!(records = self.len(), "restored original records");
    }
}

#[cfg(test)]
mod tests;
