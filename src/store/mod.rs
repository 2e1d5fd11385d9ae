// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Record storage.
//!
//! [`RecordStore`] owns the working list of records plus an independently owned pristine copy
//! taken at load time. The `file` module reads batches from disk and writes exports.

use std::fmt;

use crate::model::Record;

pub mod file;

pub use file::{read_batch, write_export, FileError};

/// Working records plus the untouched snapshot used for a full reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStore {
    working: Vec<Record>,
    pristine: Vec<Record>,
}

impl RecordStore {
    /// Parses one JSON record per line. Any malformed line aborts the whole load.
    pub fn load<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Self, ParseError> {
        let mut records = Vec::new();
        for (idx, line) in lines.into_iter().enumerate() {
            let record = serde_json::from_str::<Record>(line)
                .map_err(|source| ParseError::Malformed { line: idx + 1, source })?;
            records.push(record);
        }
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<Record>) -> Result<Self, ParseError> {
        if records.is_empty() {
            return Err(ParseError::Empty);
        }
        let pristine = records.clone();
        Ok(Self { working: records, pristine })
    }

    pub fn len(&self) -> usize {
        self.working.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.working
    }

    pub fn pristine(&self) -> &[Record] {
        &self.pristine
    }

    pub fn get(&self, idx: usize) -> Result<&Record, IndexError> {
        self.working.get(idx).ok_or(IndexError { index: idx, len: self.working.len() })
    }

    /// Overwrites the record at `idx`. Only bounds are checked.
    pub fn replace(&mut self, idx: usize, record: Record) -> Result<(), IndexError> {
        let len = self.working.len();
        let slot = self.working.get_mut(idx).ok_or(IndexError { index: idx, len })?;
        *slot = record;
        Ok(())
    }

    /// A fresh deep copy of the pristine list.
    pub fn reset_to_original(&self) -> Vec<Record> {
        self.pristine.clone()
    }

    /// Replaces the working list with a fresh copy of the pristine list, and the pristine list
    /// with another fresh copy of itself.
    pub fn restore(&mut self) {
        self.working = self.reset_to_original();
        self.pristine = self.reset_to_original();
    }

    /// One JSON line per working record, in batch order.
    pub fn export(&self) -> Result<Vec<String>, serde_json::Error> {
        self.working.iter().map(serde_json::to_string).collect()
    }
}

#[derive(Debug)]
pub enum ParseError {
    Empty,
    Malformed { line: usize, source: serde_json::Error },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("batch contains no records"),
            Self::Malformed { line, source } => {
                write!(f, "invalid record on line {line}: {source}")
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Empty => None,
            Self::Malformed { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record index {} out of range (len={})", self.index, self.len)
    }
}

impl std::error::Error for IndexError {}
