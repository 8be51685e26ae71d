// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::entity::{Entity, EntityKind};
use super::ids::{DocumentId, EntityId, FormId, OccurrenceId, SegmentId};
use super::occurrence::EntityOccurrence;
use super::relation::Relation;
use super::segment::TextSegment;
use super::session::LabelingSession;

pub(crate) fn oid(value: &str) -> OccurrenceId {
    OccurrenceId::new(value).expect("occurrence id")
}

pub(crate) fn fid(value: &str) -> FormId {
    FormId::new(value).expect("form id")
}

fn eid(value: &str) -> EntityId {
    EntityId::new(value).expect("entity id")
}

fn add_occurrence(
    session: &mut LabelingSession,
    occurrence_id: &str,
    entity_id: &str,
    kind: &str,
    span: (usize, usize),
) {
    let alias = session
        .segments()
        .values()
        .find(|segment| segment.contains_span(span.0, span.1))
        .map(|segment| segment.text_of(span.0, span.1))
        .unwrap_or_default();
    let occurrence =
        EntityOccurrence::new(eid(entity_id), EntityKind::new(kind), span.0, span.1, alias);
    session
        .add_occurrence(oid(occurrence_id), occurrence)
        .expect("fixture occurrence");
}

/// One segment, two people and a place, with candidate relations person-person and
/// person-place.
pub(crate) fn two_people_and_a_place() -> LabelingSession {
    let mut session = LabelingSession::new(DocumentId::new("doc:demo").expect("document id"));

    session
        .add_segment(TextSegment::new(
            SegmentId::new("s:1").expect("segment id"),
            0,
            [
                "Ada", "Lovelace", "wrote", "to", "Charles", "Babbage", "from", "London", ".",
            ],
        ))
        .expect("fixture segment");

    for (entity_id, key, kind) in [
        ("e:ada", "Ada Lovelace", "PERSON"),
        ("e:charles", "Charles Babbage", "PERSON"),
        ("e:london", "London", "LOCATION"),
    ] {
        session
            .add_entity(Entity::new(eid(entity_id), key, EntityKind::new(kind)))
            .expect("fixture entity");
    }

    add_occurrence(&mut session, "eo:ada", "e:ada", "PERSON", (0, 2));
    add_occurrence(&mut session, "eo:charles", "e:charles", "PERSON", (4, 6));
    add_occurrence(&mut session, "eo:london", "e:london", "LOCATION", (7, 8));

    session
        .add_relation(Relation::new(
            oid("eo:ada"),
            oid("eo:charles"),
            fid("f:ada-charles"),
        ))
        .expect("fixture relation");
    session
        .add_relation(Relation::new(
            oid("eo:ada"),
            oid("eo:london"),
            fid("f:ada-london"),
        ))
        .expect("fixture relation");

    session
}

/// Built-in session used by `spanlabel --demo`.
pub fn demo_session() -> LabelingSession {
    two_people_and_a_place()
}

#[cfg(test)]
pub(crate) fn with_duplicate_relation() -> LabelingSession {
    let mut session = two_people_and_a_place();
    session
        .add_relation(
            Relation::new(oid("eo:charles"), oid("eo:ada"), fid("f:charles-ada"))
                .with_info("wrote to"),
        )
        .expect("fixture relation");
    session
}
