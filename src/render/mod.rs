// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Plain-text projections of a labeling session.
//!
//! The rendering layer redraws from these after every state change: relation views carry the
//! `(occurrence_a, occurrence_b, label)` triples, the text renderers produce the lines the CLI
//! prints.

use crate::model::{LabelingSession, OccurrenceId, RelationView};

pub mod segment;
pub mod span_editor;
mod text;

pub use segment::{render_segment_text, SegmentRenderError};
pub use span_editor::render_span_editor;

use text::truncate_with_ellipsis;

const ALIAS_WIDTH: usize = 24;

/// One view per relation, in relation order, with the current form value.
pub fn relation_views(session: &LabelingSession) -> Vec<RelationView> {
    session
        .relations()
        .iter()
        .map(|relation| RelationView::new(relation, session.form_value(relation.form_id())))
        .collect()
}

/// One line per relation: form id, both aliases and the label code (`--` when unset).
pub fn render_relation_lines(session: &LabelingSession) -> String {
    let alias_of = |occurrence_id: &OccurrenceId| {
        session
            .occurrence(occurrence_id)
            .map(|occurrence| truncate_with_ellipsis(occurrence.alias(), ALIAS_WIDTH))
            .unwrap_or_default()
    };

    relation_views(session)
        .iter()
        .map(|view| {
            let label = view.label.map_or("--", |label| label.code());
            format!(
                "{label}  {}  {} ({}) -- {} ({})",
                view.form_id,
                alias_of(&view.occurrence_a),
                view.occurrence_a,
                alias_of(&view.occurrence_b),
                view.occurrence_b,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
