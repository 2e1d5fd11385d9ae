// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Piimark: a terminal editor for PII span annotations over JSONL record batches.
//!
//! Records are loaded into a [`store::RecordStore`], edited through a [`session::Session`] and
//! exported back to JSONL. Annotations are keyed by the literal text they mark.

pub mod config;
pub mod logging;
pub mod model;
pub mod ops;
pub mod render;
pub mod session;
pub mod store;
pub mod tui;
