// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over a labeling session.
//!
//! Queries provide the derived views (search hits, hover highlights, per-token coverage) that
//! power the UI.

pub mod occurrences;

pub use occurrences::{
    enriched_tokens, hover_targets, occurrence_search, relations_of, EnrichedToken,
    OccurrenceSearchMode,
};
