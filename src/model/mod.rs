// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A labeling session holds one document's segments, entities, occurrences, candidate
//! relations and the form slots their judgments are recorded in.

pub mod entity;
pub(crate) mod fixtures;
pub mod ids;
pub mod label;
pub mod occurrence;
pub mod relation;
pub mod segment;
pub mod session;

pub use entity::{Entity, EntityKind};
pub use fixtures::demo_session;
pub use ids::{DocumentId, EntityId, FormId, Id, IdError, OccurrenceId, SegmentId};
pub use label::{FormValue, Label, ParseLabelError};
pub use occurrence::EntityOccurrence;
pub use relation::{PairOrder, Relation, RelationView};
pub use segment::TextSegment;
pub use session::{LabelingSession, SessionError};
