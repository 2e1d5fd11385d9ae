// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Deterministic benchmark fixtures (no RNG).

use piimark::model::{PiiType, Record, Relevance};

const WORDS: &[&str] = &[
    "the", "patient", "visited", "clinic", "on", "tuesday", "after", "work", "and", "met", "with",
    "staff", "about", "billing", "records",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    /// Filler words in the passage.
    pub words: usize,
    /// Distinct annotated names inserted into the passage.
    pub annotations: usize,
    /// Adds a shorter key nested inside every annotated name.
    pub nested: bool,
}

impl Params {
    pub const fn new(words: usize, annotations: usize, nested: bool) -> Self {
        Self { words, annotations, nested }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Small,
    MediumNested,
    LargeDense,
}

impl Case {
    pub const fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::MediumNested => "medium_nested",
            Self::LargeDense => "large_dense",
        }
    }

    pub const fn params(self) -> Params {
        match self {
            Self::Small => Params::new(60, 4, false),
            Self::MediumNested => Params::new(600, 24, true),
            Self::LargeDense => Params::new(6000, 200, true),
        }
    }

    pub const ALL: [Case; 3] = [Self::Small, Self::MediumNested, Self::LargeDense];
}

fn person_name(idx: usize) -> (String, String) {
    let surname = format!("Surname{idx:04}");
    (format!("Given{idx:04} {surname}"), surname)
}

pub fn record(params: Params) -> Record {
    let mut context = String::new();
    let stride = (params.words / params.annotations.max(1)).max(1);
    let mut names = Vec::with_capacity(params.annotations);
    for idx in 0..params.words {
        if !context.is_empty() {
            context.push(' ');
        }
        if idx % stride == 0 && names.len() < params.annotations {
            let (full, surname) = person_name(names.len());
            context.push_str(&full);
            names.push((full, surname));
            context.push(' ');
        }
        context.push_str(WORDS[idx % WORDS.len()]);
    }

    let mut record = Record::new(context, "Who is mentioned?");
    for (idx, (full, surname)) in names.into_iter().enumerate() {
        let relevance = if idx % 2 == 0 { Relevance::High } else { Relevance::Low };
        record = record.with_annotation(full, PiiType::Name, relevance);
        if params.nested {
            record = record.with_annotation(surname, PiiType::Family, Relevance::Low);
        }
    }
    record
}

pub fn fixture(case: Case) -> Record {
    record(case.params())
}

/// A batch of `len` records cycling through the fixture cases.
pub fn batch(len: usize) -> Vec<Record> {
    (0..len).map(|idx| fixture(Case::ALL[idx % 2])).collect()
}
