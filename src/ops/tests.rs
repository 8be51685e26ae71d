// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::fixtures::{fid, oid, two_people_and_a_place};
use crate::model::{EntityId, EntityKind, OccurrenceId, SegmentId, SessionError};
use crate::select::{click, selectable_ids};
use crate::span::{MarkerEnd, Span, SpanEditor};
use crate::store::{CreatedOccurrence, NewOccurrence, OccurrenceResource};

use super::{apply_span_op, editor_op, save_editor, ApplyError, NewEntity, ObjectKind, SpanOp};

/// Records every call and answers with a fixed id sequence, or fails when told to.
#[derive(Debug, Default)]
struct RecordingResource {
    calls: Vec<String>,
    fail_with: Option<String>,
    /// Occurrence id handed back by `create_occurrence` instead of the next `eo:new-N`.
    occurrence_id_override: Option<OccurrenceId>,
    next_id: usize,
}

impl RecordingResource {
    fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_owned()),
            ..Self::default()
        }
    }

    fn outcome(&self) -> Result<(), String> {
        match &self.fail_with {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }
}

impl OccurrenceResource for RecordingResource {
    fn create_occurrence(&mut self, request: &NewOccurrence) -> Result<CreatedOccurrence, String> {
        self.calls.push(format!(
            "create {} {} {}..{} {:?}",
            request.entity_key,
            request.kind,
            request.span.offset,
            request.span.offset_end,
            request.alias
        ));
        self.outcome()?;
        self.next_id += 1;
        Ok(CreatedOccurrence {
            occurrence_id: self
                .occurrence_id_override
                .clone()
                .unwrap_or_else(|| oid(&format!("eo:new-{}", self.next_id))),
            entity_id: EntityId::new(format!("e:new-{}", self.next_id)).expect("entity id"),
            created_entity: true,
        })
    }

    fn update_span(
        &mut self,
        occurrence_id: &OccurrenceId,
        span: Span,
        alias: &str,
    ) -> Result<(), String> {
        self.calls.push(format!(
            "update {occurrence_id} {}..{} {alias:?}",
            span.offset, span.offset_end
        ));
        self.outcome()
    }

    fn delete_occurrence(&mut self, occurrence_id: &OccurrenceId) -> Result<(), String> {
        self.calls.push(format!("delete {occurrence_id}"));
        self.outcome()
    }

    fn delete_entity(&mut self, entity_id: &EntityId) -> Result<(), String> {
        self.calls.push(format!("delete-entity {entity_id}"));
        self.outcome()
    }
}

#[test]
fn update_span_recomputes_alias_and_bumps_rev() {
    let mut session = two_people_and_a_place();
    let mut resource = RecordingResource::default();

    let result = apply_span_op(
        &mut session,
        &mut resource,
        &SpanOp::UpdateSpan {
            occurrence_id: oid("eo:charles"),
            offset: 4,
            offset_end: 5,
        },
    )
    .expect("apply");

    assert_eq!(result.new_rev, 1);
    assert_eq!(session.rev(), 1);
    assert_eq!(result.delta.updated, vec![oid("eo:charles")]);
    assert!(result.delta.added.is_empty());
    assert!(result.delta.removed.is_empty());
    assert_eq!(resource.calls, vec![r#"update eo:charles 4..5 "Charles""#]);

    let occurrence = session.occurrence(&oid("eo:charles")).expect("occurrence");
    assert_eq!((occurrence.offset(), occurrence.offset_end()), (4, 5));
    assert_eq!(occurrence.alias(), "Charles");
}

#[test]
fn empty_span_is_rejected_before_the_resource_is_called() {
    let mut session = two_people_and_a_place();
    let before = session.clone();
    let mut resource = RecordingResource::default();

    let err = apply_span_op(
        &mut session,
        &mut resource,
        &SpanOp::UpdateSpan {
            occurrence_id: oid("eo:ada"),
            offset: 3,
            offset_end: 3,
        },
    )
    .unwrap_err();

    assert_eq!(
        err,
        ApplyError::EmptySpan {
            offset: 3,
            offset_end: 3
        }
    );
    assert!(resource.calls.is_empty());
    assert_eq!(session, before);
}

#[test]
fn resource_failure_leaves_the_session_unchanged() {
    let mut session = two_people_and_a_place();
    let before = session.clone();
    let mut resource = RecordingResource::failing("server said no");

    let err = apply_span_op(
        &mut session,
        &mut resource,
        &SpanOp::DeleteOccurrence {
            occurrence_id: oid("eo:london"),
        },
    )
    .unwrap_err();

    assert_eq!(
        err,
        ApplyError::Rejected {
            reason: "server said no".to_owned()
        }
    );
    assert_eq!(resource.calls, vec!["delete eo:london"]);
    assert_eq!(session, before);
}

#[test]
fn unknown_ids_are_rejected_without_a_resource_call() {
    let mut session = two_people_and_a_place();
    let mut resource = RecordingResource::default();

    let err = apply_span_op(
        &mut session,
        &mut resource,
        &SpanOp::DeleteOccurrence {
            occurrence_id: oid("eo:ghost"),
        },
    )
    .unwrap_err();
    assert_eq!(
        err,
        ApplyError::NotFound {
            kind: ObjectKind::Occurrence,
            id: "eo:ghost".to_owned()
        }
    );

    let err = apply_span_op(
        &mut session,
        &mut resource,
        &SpanOp::DeleteEntity {
            entity_id: EntityId::new("e:ghost").expect("entity id"),
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ApplyError::NotFound {
            kind: ObjectKind::Entity,
            ..
        }
    ));
    assert!(resource.calls.is_empty());
}

#[test]
fn span_outside_every_segment_is_rejected() {
    let mut session = two_people_and_a_place();
    let mut resource = RecordingResource::default();

    let err = apply_span_op(
        &mut session,
        &mut resource,
        &SpanOp::UpdateSpan {
            occurrence_id: oid("eo:ada"),
            offset: 8,
            offset_end: 12,
        },
    )
    .unwrap_err();
    assert_eq!(
        err,
        ApplyError::OutsideSegments {
            offset: 8,
            offset_end: 12
        }
    );
    assert!(resource.calls.is_empty());
}

#[test]
fn create_occurrence_adds_entity_and_occurrence() {
    let mut session = two_people_and_a_place();
    let mut resource = RecordingResource::default();

    let result = apply_span_op(
        &mut session,
        &mut resource,
        &SpanOp::CreateOccurrence {
            entity_key: "letter".to_owned(),
            kind: EntityKind::new("WORK"),
            offset: 2,
            offset_end: 4,
        },
    )
    .expect("apply");

    assert_eq!(result.delta.added, vec![oid("eo:new-1")]);
    assert_eq!(resource.calls, vec![r#"create letter WORK 2..4 "wrote to""#]);

    let occurrence = session.occurrence(&oid("eo:new-1")).expect("occurrence");
    assert_eq!(occurrence.alias(), "wrote to");
    assert_eq!(occurrence.kind().as_str(), "WORK");
    let entity = session
        .entities()
        .get(&EntityId::new("e:new-1").expect("entity id"))
        .expect("entity");
    assert_eq!(entity.key(), "letter");
}

#[test]
fn create_answered_with_a_taken_occurrence_id_leaves_the_session_untouched() {
    let mut session = two_people_and_a_place();
    let before = session.clone();
    let mut resource = RecordingResource {
        occurrence_id_override: Some(oid("eo:ada")),
        ..RecordingResource::default()
    };

    let err = apply_span_op(
        &mut session,
        &mut resource,
        &SpanOp::CreateOccurrence {
            entity_key: "letter".to_owned(),
            kind: EntityKind::new("WORK"),
            offset: 2,
            offset_end: 4,
        },
    )
    .unwrap_err();

    assert_eq!(
        err,
        ApplyError::Session(SessionError::DuplicateOccurrence {
            occurrence_id: oid("eo:ada")
        })
    );
    assert_eq!(resource.calls.len(), 1);
    assert_eq!(session.entities(), before.entities());
    assert_eq!(session, before);
}

#[test]
fn occurrence_created_while_another_is_armed_is_not_clickable() {
    let mut session = two_people_and_a_place();
    let mut resource = RecordingResource::default();
    click(&mut session, &oid("eo:london"));

    apply_span_op(
        &mut session,
        &mut resource,
        &SpanOp::CreateOccurrence {
            entity_key: "Lovelace".to_owned(),
            kind: EntityKind::new("PERSON"),
            offset: 1,
            offset_end: 2,
        },
    )
    .expect("apply");

    assert!(!selectable_ids(&session).contains(&oid("eo:new-1")));
}

#[test]
fn deleting_the_armed_occurrence_clears_the_selection() {
    let mut session = two_people_and_a_place();
    let mut resource = RecordingResource::default();
    click(&mut session, &oid("eo:ada"));
    assert_eq!(session.selected_id(), Some(&oid("eo:ada")));

    let result = apply_span_op(
        &mut session,
        &mut resource,
        &SpanOp::DeleteOccurrence {
            occurrence_id: oid("eo:ada"),
        },
    )
    .expect("apply");

    assert_eq!(result.delta.removed, vec![oid("eo:ada")]);
    assert_eq!(session.selected_id(), None);
    assert!(session.relations().is_empty());
    assert!(session.forms().is_empty());
    assert_eq!(selectable_ids(&session).len(), 2);
}

#[test]
fn deleting_an_entity_removes_its_occurrences_and_relations() {
    let mut session = two_people_and_a_place();
    let mut resource = RecordingResource::default();

    let result = apply_span_op(
        &mut session,
        &mut resource,
        &SpanOp::DeleteEntity {
            entity_id: EntityId::new("e:london").expect("entity id"),
        },
    )
    .expect("apply");

    assert_eq!(result.delta.removed, vec![oid("eo:london")]);
    assert_eq!(resource.calls, vec!["delete-entity e:london"]);
    assert_eq!(session.relations().len(), 1);
    assert!(session.forms().contains_key(&fid("f:ada-charles")));
    assert!(!session.forms().contains_key(&fid("f:ada-london")));
}

#[test]
fn saving_the_editor_updates_the_edited_occurrence() {
    let mut session = two_people_and_a_place();
    let mut resource = RecordingResource::default();

    let mut editor = SpanEditor::for_occurrence(&session, &oid("eo:ada")).expect("editor");
    // | Ada Lovelace | wrote ...  ->  | Ada | Lovelace wrote ...
    editor.move_marker(MarkerEnd::End, 2).expect("move");

    let result = save_editor(&mut session, &mut resource, &editor, None).expect("save");
    assert_eq!(result.delta.updated, vec![oid("eo:ada")]);
    assert_eq!(
        session.occurrence(&oid("eo:ada")).expect("occurrence").alias(),
        "Ada"
    );
}

#[test]
fn create_mode_editor_needs_an_entity() {
    let session = two_people_and_a_place();
    let segment = session
        .segment(&SegmentId::new("s:1").expect("segment id"))
        .expect("segment");
    let editor = SpanEditor::for_new(segment, 2).expect("editor");

    assert_eq!(editor_op(&editor, None), Err(ApplyError::MissingEntity));
    assert_eq!(
        editor_op(
            &editor,
            Some(NewEntity {
                key: "wrote".to_owned(),
                kind: EntityKind::new("ACTION"),
            })
        ),
        Ok(SpanOp::CreateOccurrence {
            entity_key: "wrote".to_owned(),
            kind: EntityKind::new("ACTION"),
            offset: 2,
            offset_end: 3,
        })
    );
}
