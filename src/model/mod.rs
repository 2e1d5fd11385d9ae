// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A batch is an ordered list of [`Record`]s; each record carries its passage, question, and the
//! [`Annotations`] marking sensitive spans inside the passage.

pub mod record;

pub use record::{Annotation, Annotations, ParseLabelError, PiiType, Record, Relevance};
