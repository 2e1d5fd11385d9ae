// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use tracing::{info, warn};

use super::Session;
use crate::store::RecordStore;

/// Owns at most one [`Session`] for the running editor.
#[derive(Debug, Default)]
pub struct Editor {
    session: Option<Session>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: RecordStore) -> Self {
        Self { session: Some(Session::new(store)) }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a session over `store`. An active session must be closed first.
    pub fn open(&mut self, store: RecordStore) -> Result<&mut Session, LifecycleError> {
        if self.session.is_some() {
            return Err(LifecycleError::AlreadyOpen);
        }
        info!(records = store.len(), "opened session");
        Ok(self.session.insert(Session::new(store)))
    }

    /// Resets the active session to the records as originally loaded.
    pub fn load_original(&mut self) -> Result<(), LifecycleWarning> {
        let Some(session) = self.session.as_mut() else {
            warn!("load original requested without a session");
            return Err(LifecycleWarning::NoOriginal);
        };
        session.restore_original();
        Ok(())
    }

    /// Tears down the active session, returning it.
    pub fn close(&mut self) -> Option<Session> {
        let closed = self.session.take();
        if closed.is_some() {
            info!("closed session");
        }
        closed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    AlreadyOpen,
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyOpen => {
                f.write_str("A batch is already loaded; close it before opening another.")
            }
        }
    }
}

impl std::error::Error for LifecycleError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleWarning {
    NoOriginal,
}

impl fmt::Display for LifecycleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOriginal => f.write_str("No original data found to restore."),
        }
    }
}

impl std::error::Error for LifecycleWarning {}
