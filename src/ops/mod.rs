// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Annotation reconciliation.
//!
//! These are the only places where in-progress edits are folded into a [`Record`] and where the
//! annotation set is checked against the passage. Annotations are keyed by literal text, so editing
//! the passage can leave stale keys behind; [`prune_to_context`] is the explicit repair step and is
//! never run implicitly by [`reconcile`].

use std::fmt;

use crate::model::{Annotation, Annotations, PiiType, Record, Relevance};

/// Folds edited field values into `record`.
///
/// `None` keeps the record's current passage/question. `edited_annotations` replaces the annotation
/// set verbatim, without any substring check.
pub fn reconcile(
    record: &Record,
    edited_context: Option<&str>,
    edited_question: Option<&str>,
    edited_annotations: Annotations,
) -> Record {
    let mut next = record.clone();
    if let Some(context) = edited_context {
        next.set_context(context);
    }
    if let Some(question) = edited_question {
        next.set_question(question);
    }
    next.set_piis(edited_annotations);
    next
}

/// Drops every annotation whose key no longer occurs in the record's passage.
pub fn prune_to_context(record: &Record) -> Record {
    let mut next = record.clone();
    let context = record.context();
    next.piis_mut().retain(|key, _| context.contains(key.as_str()));
    next
}

/// Keys of `record` that [`prune_to_context`] would remove, in display order.
pub fn stale_keys(record: &Record) -> Vec<String> {
    let context = record.context();
    record.piis().keys().filter(|key| !context.contains(key.as_str())).cloned().collect()
}

/// Checks a candidate annotation value against `record` and returns the trimmed key.
pub fn validate_annotation_value<'a>(
    record: &Record,
    value: &'a str,
) -> Result<&'a str, ValidationError> {
    let key = value.trim();
    if key.is_empty() {
        return Err(ValidationError::Empty);
    }
    if !record.context().contains(key) {
        return Err(ValidationError::NotInContext { value: key.to_owned() });
    }
    Ok(key)
}

/// Inserts (or overwrites) the trimmed `value` as an annotation, then prunes.
///
/// The new key survives the prune because it was just checked to be part of the passage.
pub fn add_annotation(
    record: &Record,
    value: &str,
    pii_type: PiiType,
    relevance: Relevance,
) -> Result<Record, ValidationError> {
    let key = validate_annotation_value(record, value)?;
    let mut next = record.clone();
    next.piis_mut().insert(key.to_owned(), Annotation::new(pii_type, relevance));
    Ok(prune_to_context(&next))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty,
    NotInContext { value: String },
}

impl ValidationError {
    /// Short machine-readable tag, used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::NotInContext { .. } => "not-in-context",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Please enter a PII value before adding."),
            Self::NotInContext { .. } => f.write_str(
                "The PII value does not appear in the context. Add it to the text first.",
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
