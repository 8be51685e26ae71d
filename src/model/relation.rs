// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{FormId, OccurrenceId};
use super::label::FormValue;

/// How the clicked order of two occurrences must relate to a relation's declared pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PairOrder {
    /// Either occurrence may be armed first.
    #[default]
    Symmetric,
    /// The armed occurrence must be the relation's first occurrence.
    Ordered,
}

impl PairOrder {
    /// Order policy for a relation whose endpoints are (or are not) of different entity kinds.
    ///
    /// Different kinds already tell the two ends apart, so any order is accepted. Same-kind
    /// pairs only accept the declared order so a relation is never completed in reverse.
    pub fn from_kinds(different_kind: bool) -> Self {
        if different_kind {
            Self::Symmetric
        } else {
            Self::Ordered
        }
    }

    /// Whether arming `armed` and then clicking `clicked` completes the pair `(first, second)`.
    pub fn matches(
        self,
        first: &OccurrenceId,
        second: &OccurrenceId,
        armed: &OccurrenceId,
        clicked: &OccurrenceId,
    ) -> bool {
        let forward = first == armed && second == clicked;
        match self {
            Self::Ordered => forward,
            Self::Symmetric => forward || (first == clicked && second == armed),
        }
    }
}

/// A candidate semantic link between two occurrences, judged through its form slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    occurrence_a: OccurrenceId,
    occurrence_b: OccurrenceId,
    form_id: FormId,
    info: Option<String>,
    order: PairOrder,
}

impl Relation {
    pub fn new(occurrence_a: OccurrenceId, occurrence_b: OccurrenceId, form_id: FormId) -> Self {
        Self {
            occurrence_a,
            occurrence_b,
            form_id,
            info: None,
            order: PairOrder::default(),
        }
    }

    pub fn with_order(mut self, order: PairOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn occurrence_a(&self) -> &OccurrenceId {
        &self.occurrence_a
    }

    pub fn occurrence_b(&self) -> &OccurrenceId {
        &self.occurrence_b
    }

    pub fn form_id(&self) -> &FormId {
        &self.form_id
    }

    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    pub fn order(&self) -> PairOrder {
        self.order
    }

    pub fn set_order(&mut self, order: PairOrder) {
        self.order = order;
    }

    pub fn contains(&self, occurrence_id: &OccurrenceId) -> bool {
        &self.occurrence_a == occurrence_id || &self.occurrence_b == occurrence_id
    }

    /// The other end of the pair, if `occurrence_id` is one of its ends.
    pub fn partner_of(&self, occurrence_id: &OccurrenceId) -> Option<&OccurrenceId> {
        if &self.occurrence_a == occurrence_id {
            Some(&self.occurrence_b)
        } else if &self.occurrence_b == occurrence_id {
            Some(&self.occurrence_a)
        } else {
            None
        }
    }

    pub fn is_completed_by(&self, armed: &OccurrenceId, clicked: &OccurrenceId) -> bool {
        self.order
            .matches(&self.occurrence_a, &self.occurrence_b, armed, clicked)
    }
}

/// What the rendering layer needs to redraw one relation: its ends and current judgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationView {
    pub occurrence_a: OccurrenceId,
    pub occurrence_b: OccurrenceId,
    pub form_id: FormId,
    pub label: FormValue,
}

impl RelationView {
    pub fn new(relation: &Relation, label: FormValue) -> Self {
        Self {
            occurrence_a: relation.occurrence_a().clone(),
            occurrence_b: relation.occurrence_b().clone(),
            form_id: relation.form_id().clone(),
            label,
        }
    }
}
