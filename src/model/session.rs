// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use super::entity::Entity;
use super::ids::{DocumentId, EntityId, FormId, OccurrenceId, SegmentId};
use super::label::{FormValue, Label};
use super::occurrence::EntityOccurrence;
use super::relation::{PairOrder, Relation};
use super::segment::TextSegment;

/// Everything one labeling session of a document works against.
///
/// The session is owned by the caller (the UI controller) and passed into every operation;
/// nothing in the crate keeps ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelingSession {
    document_id: DocumentId,
    rev: u64,
    entities: BTreeMap<EntityId, Entity>,
    occurrences: BTreeMap<OccurrenceId, EntityOccurrence>,
    segments: BTreeMap<SegmentId, TextSegment>,
    relations: Vec<Relation>,
    forms: BTreeMap<FormId, FormValue>,
    selected_id: Option<OccurrenceId>,
    current_tool: Label,
    order_check: bool,
}

impl LabelingSession {
    pub fn new(document_id: DocumentId) -> Self {
        Self {
            document_id,
            rev: 0,
            entities: BTreeMap::new(),
            occurrences: BTreeMap::new(),
            segments: BTreeMap::new(),
            relations: Vec::new(),
            forms: BTreeMap::new(),
            selected_id: None,
            current_tool: Label::default(),
            order_check: false,
        }
    }

    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }

    pub fn entities(&self) -> &BTreeMap<EntityId, Entity> {
        &self.entities
    }

    pub fn add_entity(&mut self, entity: Entity) -> Result<(), SessionError> {
        let entity_id = entity.entity_id().clone();
        if self.entities.contains_key(&entity_id) {
            return Err(SessionError::DuplicateEntity { entity_id });
        }
        self.entities.insert(entity_id, entity);
        Ok(())
    }

    /// Finds the entity registered under `(key, kind)`.
    pub fn find_entity(&self, key: &str, kind: &str) -> Option<&Entity> {
        self.entities
            .values()
            .find(|entity| entity.key() == key && entity.kind().as_str() == kind)
    }

    pub fn occurrences(&self) -> &BTreeMap<OccurrenceId, EntityOccurrence> {
        &self.occurrences
    }

    pub fn occurrences_mut(&mut self) -> &mut BTreeMap<OccurrenceId, EntityOccurrence> {
        &mut self.occurrences
    }

    pub fn occurrence(&self, occurrence_id: &OccurrenceId) -> Option<&EntityOccurrence> {
        self.occurrences.get(occurrence_id)
    }

    pub fn add_occurrence(
        &mut self,
        occurrence_id: OccurrenceId,
        occurrence: EntityOccurrence,
    ) -> Result<(), SessionError> {
        if !self.entities.contains_key(occurrence.entity_id()) {
            return Err(SessionError::UnknownEntity {
                entity_id: occurrence.entity_id().clone(),
            });
        }
        if self.occurrences.contains_key(&occurrence_id) {
            return Err(SessionError::DuplicateOccurrence { occurrence_id });
        }
        self.occurrences.insert(occurrence_id, occurrence);
        Ok(())
    }

    /// Removes an occurrence along with every relation (and form slot) that references it.
    pub fn remove_occurrence(&mut self, occurrence_id: &OccurrenceId) -> Option<EntityOccurrence> {
        let removed = self.occurrences.remove(occurrence_id)?;

        let forms = &mut self.forms;
        self.relations.retain(|relation| {
            if relation.contains(occurrence_id) {
                forms.remove(relation.form_id());
                false
            } else {
                true
            }
        });

        if self.selected_id.as_ref() == Some(occurrence_id) {
            self.selected_id = None;
        }
        Some(removed)
    }

    /// Removes an entity and all of its occurrences, returning the removed occurrence ids.
    pub fn remove_entity(&mut self, entity_id: &EntityId) -> Option<Vec<OccurrenceId>> {
        self.entities.remove(entity_id)?;
        let occurrence_ids = self
            .occurrences
            .iter()
            .filter(|(_, occurrence)| occurrence.entity_id() == entity_id)
            .map(|(occurrence_id, _)| occurrence_id.clone())
            .collect::<Vec<_>>();
        for occurrence_id in &occurrence_ids {
            self.remove_occurrence(occurrence_id);
        }
        Some(occurrence_ids)
    }

    pub fn segments(&self) -> &BTreeMap<SegmentId, TextSegment> {
        &self.segments
    }

    pub fn segment(&self, segment_id: &SegmentId) -> Option<&TextSegment> {
        self.segments.get(segment_id)
    }

    pub fn add_segment(&mut self, segment: TextSegment) -> Result<(), SessionError> {
        let segment_id = segment.segment_id().clone();
        if self.segments.contains_key(&segment_id) {
            return Err(SessionError::DuplicateSegment { segment_id });
        }
        self.segments.insert(segment_id, segment);
        Ok(())
    }

    /// The first segment (in id order) that fully contains the occurrence's span.
    pub fn segment_of(&self, occurrence_id: &OccurrenceId) -> Option<&TextSegment> {
        let occurrence = self.occurrences.get(occurrence_id)?;
        self.segments
            .values()
            .find(|segment| segment.contains_span(occurrence.offset(), occurrence.offset_end()))
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Registers a candidate relation and its (initially unset) form slot.
    ///
    /// Both ends must be distinct, known occurrences, and the form id must not belong to another
    /// relation: every relation owns exactly one slot. With `order_check` enabled the relation's
    /// pair order is derived from the entity kinds of its ends.
    pub fn add_relation(&mut self, mut relation: Relation) -> Result<(), SessionError> {
        if relation.occurrence_a() == relation.occurrence_b() {
            return Err(SessionError::SameOccurrence {
                occurrence_id: relation.occurrence_a().clone(),
            });
        }
        for occurrence_id in [relation.occurrence_a(), relation.occurrence_b()] {
            if !self.occurrences.contains_key(occurrence_id) {
                return Err(SessionError::UnknownOccurrence {
                    occurrence_id: occurrence_id.clone(),
                });
            }
        }

        if self.forms.contains_key(relation.form_id()) {
            return Err(SessionError::DuplicateForm {
                form_id: relation.form_id().clone(),
            });
        }

        if self.order_check {
            relation.set_order(self.derived_order(&relation));
        }
        self.forms.insert(relation.form_id().clone(), None);
        self.relations.push(relation);
        Ok(())
    }

    pub fn forms(&self) -> &BTreeMap<FormId, FormValue> {
        &self.forms
    }

    pub fn form_value(&self, form_id: &FormId) -> FormValue {
        self.forms.get(form_id).copied().flatten()
    }

    pub fn set_form_value(&mut self, form_id: &FormId, value: FormValue) {
        self.forms.insert(form_id.clone(), value);
    }

    pub fn selected_id(&self) -> Option<&OccurrenceId> {
        self.selected_id.as_ref()
    }

    pub fn set_selected_id(&mut self, selected_id: Option<OccurrenceId>) {
        self.selected_id = selected_id;
    }

    pub fn current_tool(&self) -> Label {
        self.current_tool
    }

    pub fn set_current_tool(&mut self, tool: Label) {
        self.current_tool = tool;
    }

    pub fn order_check(&self) -> bool {
        self.order_check
    }

    /// Switches the same-kind order check on or off and re-derives every relation's order.
    pub fn set_order_check(&mut self, order_check: bool) {
        self.order_check = order_check;
        let orders = self
            .relations
            .iter()
            .map(|relation| {
                if order_check {
                    self.derived_order(relation)
                } else {
                    PairOrder::Symmetric
                }
            })
            .collect::<Vec<_>>();
        for (relation, order) in self.relations.iter_mut().zip(orders) {
            relation.set_order(order);
        }
    }

    fn derived_order(&self, relation: &Relation) -> PairOrder {
        let kind_a = self.occurrences.get(relation.occurrence_a()).map(|o| o.kind());
        let kind_b = self.occurrences.get(relation.occurrence_b()).map(|o| o.kind());
        PairOrder::from_kinds(kind_a != kind_b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    SameOccurrence { occurrence_id: OccurrenceId },
    UnknownOccurrence { occurrence_id: OccurrenceId },
    UnknownEntity { entity_id: EntityId },
    DuplicateOccurrence { occurrence_id: OccurrenceId },
    DuplicateEntity { entity_id: EntityId },
    DuplicateSegment { segment_id: SegmentId },
    DuplicateForm { form_id: FormId },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SameOccurrence { occurrence_id } => {
                write!(f, "relation pairs occurrence {occurrence_id} with itself")
            }
            Self::UnknownOccurrence { occurrence_id } => {
                write!(f, "occurrence not found (id={occurrence_id})")
            }
            Self::UnknownEntity { entity_id } => write!(f, "entity not found (id={entity_id})"),
            Self::DuplicateOccurrence { occurrence_id } => {
                write!(f, "occurrence already exists (id={occurrence_id})")
            }
            Self::DuplicateEntity { entity_id } => {
                write!(f, "entity already exists (id={entity_id})")
            }
            Self::DuplicateSegment { segment_id } => {
                write!(f, "segment already exists (id={segment_id})")
            }
            Self::DuplicateForm { form_id } => {
                write!(f, "form slot already belongs to another relation (id={form_id})")
            }
        }
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use super::{LabelingSession, SessionError};
    use crate::model::fixtures::{fid, oid, two_people_and_a_place};
    use crate::model::{PairOrder, Relation};

    #[test]
    fn add_relation_rejects_self_pairs_and_unknown_ends() {
        let mut session = two_people_and_a_place();

        let err = session
            .add_relation(Relation::new(oid("eo:ada"), oid("eo:ada"), fid("f:x")))
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::SameOccurrence {
                occurrence_id: oid("eo:ada")
            }
        );

        let err = session
            .add_relation(Relation::new(oid("eo:ada"), oid("eo:nobody"), fid("f:x")))
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::UnknownOccurrence {
                occurrence_id: oid("eo:nobody")
            }
        );
        assert!(session.forms().get(&fid("f:x")).is_none());
    }

    #[test]
    fn add_relation_rejects_a_form_slot_owned_by_another_relation() {
        let mut session = two_people_and_a_place();

        let err = session
            .add_relation(Relation::new(
                oid("eo:charles"),
                oid("eo:ada"),
                fid("f:ada-charles"),
            ))
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::DuplicateForm {
                form_id: fid("f:ada-charles")
            }
        );
        assert_eq!(session.relations().len(), 2);
        assert_eq!(session.forms().len(), 2);
    }

    #[test]
    fn order_check_derives_order_from_entity_kinds() {
        let mut session = two_people_and_a_place();
        session.set_order_check(true);

        let orders = session
            .relations()
            .iter()
            .map(|relation| (relation.form_id().as_str().to_owned(), relation.order()))
            .collect::<Vec<_>>();
        assert_eq!(
            orders,
            vec![
                ("f:ada-charles".to_owned(), PairOrder::Ordered),
                ("f:ada-london".to_owned(), PairOrder::Symmetric),
            ]
        );

        session.set_order_check(false);
        assert!(session
            .relations()
            .iter()
            .all(|relation| relation.order() == PairOrder::Symmetric));
    }

    #[test]
    fn remove_occurrence_drops_its_relations_forms_and_armed_slot() {
        let mut session = two_people_and_a_place();
        session.set_selected_id(Some(oid("eo:london")));

        let removed = session.remove_occurrence(&oid("eo:london"));
        assert!(removed.is_some());
        assert_eq!(session.relations().len(), 1);
        assert!(session.forms().get(&fid("f:ada-london")).is_none());
        assert!(session.forms().contains_key(&fid("f:ada-charles")));
        assert_eq!(session.selected_id(), None);
    }

    #[test]
    fn new_session_starts_unarmed_with_default_tool() {
        let session = LabelingSession::new("doc".parse().expect("document id"));
        assert_eq!(session.selected_id(), None);
        assert_eq!(session.current_tool(), crate::model::Label::Yes);
        assert_eq!(session.rev(), 0);
    }
}
