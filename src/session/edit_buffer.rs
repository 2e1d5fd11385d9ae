// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use crate::model::{Annotations, PiiType, Record, Relevance};

/// Pending field edits for the active record.
///
/// Nothing in here is visible in the record store until the session folds it in with
/// [`crate::ops::reconcile`]; the buffer is cleared after every fold and on navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    context: Option<String>,
    question: Option<String>,
    types: HashMap<String, PiiType>,
    relevances: HashMap<String, Relevance>,
}

impl EditBuffer {
    pub fn is_empty(&self) -> bool {
        self.context.is_none()
            && self.question.is_none()
            && self.types.is_empty()
            && self.relevances.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = Some(context.into());
    }

    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = Some(question.into());
    }

    pub fn pii_type(&self, key: &str) -> Option<PiiType> {
        self.types.get(key).copied()
    }

    pub fn set_pii_type(&mut self, key: impl Into<String>, pii_type: PiiType) {
        self.types.insert(key.into(), pii_type);
    }

    pub fn relevance(&self, key: &str) -> Option<Relevance> {
        self.relevances.get(key).copied()
    }

    pub fn set_relevance(&mut self, key: impl Into<String>, relevance: Relevance) {
        self.relevances.insert(key.into(), relevance);
    }

    /// The record's annotations with buffered type/relevance overrides applied.
    ///
    /// Overrides for keys the record does not carry are ignored.
    pub fn edited_annotations(&self, record: &Record) -> Annotations {
        record
            .piis()
            .iter()
            .map(|(key, annotation)| {
                let mut annotation = *annotation;
                if let Some(pii_type) = self.pii_type(key) {
                    annotation.set_pii_type(pii_type);
                }
                if let Some(relevance) = self.relevance(key) {
                    annotation.set_relevance(relevance);
                }
                (key.clone(), annotation)
            })
            .collect()
    }
}
