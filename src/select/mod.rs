// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Relation selection state machine.
//!
//! A labeler arms one occurrence with a first click; only occurrences that share a candidate
//! relation with it stay clickable. A second click on a partner toggles the form slot of every
//! relation that pairs the two, and a second click on the armed occurrence disarms it.
//!
//! Clicks on unknown or non-selectable occurrences are silent no-ops.

use std::collections::BTreeSet;

use crate::model::{Label, LabelingSession, OccurrenceId, RelationView};

/// What a click did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Unknown or non-selectable occurrence; nothing changed.
    Ignored,
    /// The occurrence is now armed; `eligible` lists the partners that became selectable.
    Armed {
        occurrence_id: OccurrenceId,
        eligible: Vec<OccurrenceId>,
    },
    /// The armed occurrence was clicked again and is no longer armed.
    Deselected { occurrence_id: OccurrenceId },
    /// A pair was completed. `toggled` holds one entry per relation whose form slot flipped;
    /// it is empty when the pair order did not match any relation.
    Paired {
        armed: OccurrenceId,
        clicked: OccurrenceId,
        toggled: Vec<RelationView>,
    },
}

impl ClickOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

pub fn set_all_selectable(session: &mut LabelingSession, value: bool) {
    for occurrence in session.occurrences_mut().values_mut() {
        occurrence.set_selectable(value);
    }
}

/// Entry point for a labeler clicking an occurrence.
pub fn click(session: &mut LabelingSession, occurrence_id: &OccurrenceId) -> ClickOutcome {
    let Some(occurrence) = session.occurrence(occurrence_id) else {
        return ClickOutcome::Ignored;
    };
    if !occurrence.selectable() {
        return ClickOutcome::Ignored;
    }

    match session.selected_id().cloned() {
        None => first_click(session, occurrence_id),
        Some(armed) => second_click(session, armed, occurrence_id),
    }
}

fn first_click(session: &mut LabelingSession, occurrence_id: &OccurrenceId) -> ClickOutcome {
    session.set_selected_id(Some(occurrence_id.clone()));

    // Clear globally first so eligibility is never broader than the armed occurrence's partners.
    set_all_selectable(session, false);
    if let Some(occurrence) = session.occurrences_mut().get_mut(occurrence_id) {
        occurrence.set_selectable(true);
        occurrence.set_selected(true);
    }

    let partners = session
        .relations()
        .iter()
        .filter_map(|relation| relation.partner_of(occurrence_id))
        .cloned()
        .collect::<BTreeSet<_>>();

    let mut eligible = Vec::with_capacity(partners.len());
    for partner in partners {
        if let Some(occurrence) = session.occurrences_mut().get_mut(&partner) {
            occurrence.set_selectable(true);
            eligible.push(partner);
        }
    }

    ClickOutcome::Armed {
        occurrence_id: occurrence_id.clone(),
        eligible,
    }
}

fn second_click(
    session: &mut LabelingSession,
    armed: OccurrenceId,
    clicked: &OccurrenceId,
) -> ClickOutcome {
    let outcome = if &armed == clicked {
        ClickOutcome::Deselected {
            occurrence_id: armed.clone(),
        }
    } else {
        let tool = session.current_tool();
        let matching = session
            .relations()
            .iter()
            .filter(|relation| relation.is_completed_by(&armed, clicked))
            .cloned()
            .collect::<Vec<_>>();

        // Every matching entry toggles on its own, duplicates included.
        let mut toggled = Vec::with_capacity(matching.len());
        for relation in matching {
            let next = match session.form_value(relation.form_id()) {
                None => Some(tool),
                Some(_) => None,
            };
            session.set_form_value(relation.form_id(), next);
            toggled.push(RelationView::new(&relation, next));
        }

        ClickOutcome::Paired {
            armed: armed.clone(),
            clicked: clicked.clone(),
            toggled,
        }
    };

    for occurrence_id in [&armed, clicked] {
        if let Some(occurrence) = session.occurrences_mut().get_mut(occurrence_id) {
            occurrence.set_selected(false);
        }
    }
    set_all_selectable(session, true);
    session.set_selected_id(None);

    outcome
}

/// Tool-selection input: the label applied to the next empty relation that gets completed.
pub fn select_tool(session: &mut LabelingSession, tool: Label) {
    session.set_current_tool(tool);
}

/// Drops any armed occurrence and makes every occurrence clickable again.
pub fn reset_selection(session: &mut LabelingSession) {
    for occurrence in session.occurrences_mut().values_mut() {
        occurrence.set_selected(false);
        occurrence.set_selectable(true);
    }
    session.set_selected_id(None);
}

/// Occurrences a click would currently act on.
pub fn selectable_ids(session: &LabelingSession) -> BTreeSet<OccurrenceId> {
    session
        .occurrences()
        .iter()
        .filter(|(_, occurrence)| occurrence.selectable())
        .map(|(occurrence_id, _)| occurrence_id.clone())
        .collect()
}
