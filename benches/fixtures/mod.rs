// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use spanlabel::model::{
    DocumentId, Entity, EntityId, EntityKind, EntityOccurrence, FormId, LabelingSession,
    OccurrenceId, Relation, SegmentId, TextSegment,
};

pub fn checksum_session(session: &LabelingSession) -> u64 {
    let mut acc = 0u64;
    acc = acc.wrapping_mul(131).wrapping_add(session.rev());
    for (occurrence_id, occurrence) in session.occurrences() {
        acc = acc
            .wrapping_mul(131)
            .wrapping_add(occurrence_id.as_str().len() as u64);
        acc = acc
            .wrapping_mul(131)
            .wrapping_add(occurrence.offset() as u64);
        acc = acc
            .wrapping_mul(131)
            .wrapping_add(u64::from(occurrence.selectable()) << 1 | u64::from(occurrence.selected()));
    }
    for value in session.forms().values() {
        acc = acc
            .wrapping_mul(131)
            .wrapping_add(value.map_or(0, |label| label.code().len() as u64 + 1));
    }
    acc
}

pub mod document {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Params {
        pub segments: usize,
        pub tokens_per_segment: usize,
        /// One two-token occurrence starts every `occurrence_stride` tokens.
        pub occurrence_stride: usize,
        /// Each occurrence is paired with this many following occurrences of its segment.
        pub partners: usize,
    }

    impl Params {
        pub const fn new(
            segments: usize,
            tokens_per_segment: usize,
            occurrence_stride: usize,
            partners: usize,
        ) -> Self {
            Self {
                segments,
                tokens_per_segment,
                occurrence_stride,
                partners,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Case {
        Small,
        MediumDense,
        LargeLongSegments,
    }

    impl Case {
        pub const fn id(self) -> &'static str {
            match self {
                Self::Small => "small",
                Self::MediumDense => "medium_dense",
                Self::LargeLongSegments => "large_long_segments",
            }
        }

        pub const fn params(self) -> Params {
            match self {
                Self::Small => Params::new(4, 30, 6, 2),
                Self::MediumDense => Params::new(20, 40, 3, 6),
                Self::LargeLongSegments => Params::new(60, 200, 5, 4),
            }
        }
    }

    pub fn occurrence_id(segment: usize, idx: usize) -> OccurrenceId {
        OccurrenceId::new(format!("eo:{segment:03}:{idx:03}")).expect("occurrence id")
    }

    fn entity_id(segment: usize, idx: usize) -> EntityId {
        EntityId::new(format!("e:{segment:03}:{idx:03}")).expect("entity id")
    }

    fn kind(idx: usize) -> EntityKind {
        EntityKind::new(if idx % 2 == 0 { "PERSON" } else { "LOCATION" })
    }

    pub fn session(params: Params) -> LabelingSession {
        let mut session = LabelingSession::new(DocumentId::new("doc:bench").expect("document id"));

        for segment in 0..params.segments {
            let base = segment * params.tokens_per_segment;
            let tokens = (0..params.tokens_per_segment).map(|idx| format!("tok{idx}"));
            session
                .add_segment(TextSegment::new(
                    SegmentId::new(format!("s:{segment:03}")).expect("segment id"),
                    base,
                    tokens,
                ))
                .expect("segment");

            let starts = (0..params.tokens_per_segment.saturating_sub(1))
                .step_by(params.occurrence_stride.max(1))
                .collect::<Vec<_>>();
            for (idx, start) in starts.iter().enumerate() {
                let entity_id = entity_id(segment, idx);
                session
                    .add_entity(Entity::new(
                        entity_id.clone(),
                        format!("entity {segment}/{idx}"),
                        kind(idx),
                    ))
                    .expect("entity");
                session
                    .add_occurrence(
                        occurrence_id(segment, idx),
                        EntityOccurrence::new(
                            entity_id,
                            kind(idx),
                            base + start,
                            base + start + 2,
                            format!("tok{start} tok{}", start + 1),
                        ),
                    )
                    .expect("occurrence");
            }

            for idx in 0..starts.len() {
                for step in 1..=params.partners {
                    let partner = idx + step;
                    if partner >= starts.len() {
                        break;
                    }
                    session
                        .add_relation(Relation::new(
                            occurrence_id(segment, idx),
                            occurrence_id(segment, partner),
                            FormId::new(format!("f:{segment:03}:{idx:03}:{partner:03}"))
                                .expect("form id"),
                        ))
                        .expect("relation");
                }
            }
        }

        session
    }

    pub fn fixture(case: Case) -> LabelingSession {
        session(case.params())
    }
}
