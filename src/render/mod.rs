// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Passage highlighting.
//!
//! Renderers are read-only over `(context, piis)`: they resolve which ranges of the passage are
//! marked and produce display output. Nothing rendered here ever feeds back into a record.

pub mod highlight;
pub(crate) mod text;

pub use highlight::{highlight_segments, render_html, HighlightPalette, Mark, Segment};
