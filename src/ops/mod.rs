// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Span edits and occurrence lifecycle operations.
//!
//! Every operation is validated against the session first, then sent through an
//! `OccurrenceResource`; the in-memory session only changes once the resource accepted it.
//! Successful operations bump the session revision and report a coarse delta of occurrence ids.

use std::collections::BTreeSet;
use std::fmt;

use crate::model::{
    Entity, EntityId, EntityKind, EntityOccurrence, LabelingSession, OccurrenceId, SessionError,
    TextSegment,
};
use crate::select::reset_selection;
use crate::span::{EditorMode, Span, SpanEditor};
use crate::store::{NewOccurrence, OccurrenceResource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanOp {
    /// Moves an existing occurrence to `[offset, offset_end)`.
    UpdateSpan {
        occurrence_id: OccurrenceId,
        offset: usize,
        offset_end: usize,
    },
    /// Creates an occurrence over `[offset, offset_end)` for the entity `(entity_key, kind)`.
    CreateOccurrence {
        entity_key: String,
        kind: EntityKind,
        offset: usize,
        offset_end: usize,
    },
    DeleteOccurrence {
        occurrence_id: OccurrenceId,
    },
    /// Deletes an entity together with all of its occurrences.
    DeleteEntity {
        entity_id: EntityId,
    },
}

/// Entity a newly drawn occurrence belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntity {
    pub key: String,
    pub kind: EntityKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub delta: Delta,
}

/// Occurrence ids touched by an operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<OccurrenceId>,
    pub removed: Vec<OccurrenceId>,
    pub updated: Vec<OccurrenceId>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<OccurrenceId>,
    removed: BTreeSet<OccurrenceId>,
    updated: BTreeSet<OccurrenceId>,
}

impl DeltaBuilder {
    fn record_added(&mut self, occurrence_id: OccurrenceId) {
        self.removed.remove(&occurrence_id);
        self.updated.remove(&occurrence_id);
        self.added.insert(occurrence_id);
    }

    fn record_removed(&mut self, occurrence_id: OccurrenceId) {
        self.added.remove(&occurrence_id);
        self.updated.remove(&occurrence_id);
        self.removed.insert(occurrence_id);
    }

    fn record_updated(&mut self, occurrence_id: OccurrenceId) {
        if self.added.contains(&occurrence_id) || self.removed.contains(&occurrence_id) {
            return;
        }
        self.updated.insert(occurrence_id);
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
        }
    }
}

/// Applies one operation: validate, persist through `resource`, then mirror it in `session`.
///
/// Degenerate spans and unknown ids are rejected before the resource is called. A resource
/// failure leaves the session untouched.
pub fn apply_span_op<R>(
    session: &mut LabelingSession,
    resource: &mut R,
    op: &SpanOp,
) -> Result<ApplyResult, ApplyError>
where
    R: OccurrenceResource + ?Sized,
{
    let mut delta = DeltaBuilder::default();

    match op {
        SpanOp::UpdateSpan {
            occurrence_id,
            offset,
            offset_end,
        } => apply_update_span(
            session,
            resource,
            occurrence_id,
            *offset,
            *offset_end,
            &mut delta,
        )?,
        SpanOp::CreateOccurrence {
            entity_key,
            kind,
            offset,
            offset_end,
        } => apply_create_occurrence(
            session,
            resource,
            entity_key,
            kind,
            *offset,
            *offset_end,
            &mut delta,
        )?,
        SpanOp::DeleteOccurrence { occurrence_id } => {
            apply_delete_occurrence(session, resource, occurrence_id, &mut delta)?
        }
        SpanOp::DeleteEntity { entity_id } => {
            apply_delete_entity(session, resource, entity_id, &mut delta)?
        }
    }

    session.bump_rev();
    Ok(ApplyResult {
        new_rev: session.rev(),
        delta: delta.finish(),
    })
}

/// Turns the editor's current markers into an operation.
///
/// Edit mode yields `UpdateSpan`; create mode needs the entity the new occurrence belongs to.
pub fn editor_op(editor: &SpanEditor, entity: Option<NewEntity>) -> Result<SpanOp, ApplyError> {
    let span = editor.infer();
    match editor.mode() {
        EditorMode::Edit { occurrence_id } => Ok(SpanOp::UpdateSpan {
            occurrence_id: occurrence_id.clone(),
            offset: span.offset,
            offset_end: span.offset_end,
        }),
        EditorMode::Create => {
            let entity = entity.ok_or(ApplyError::MissingEntity)?;
            Ok(SpanOp::CreateOccurrence {
                entity_key: entity.key,
                kind: entity.kind,
                offset: span.offset,
                offset_end: span.offset_end,
            })
        }
    }
}

/// The editor's save button: builds the operation and applies it.
pub fn save_editor<R>(
    session: &mut LabelingSession,
    resource: &mut R,
    editor: &SpanEditor,
    entity: Option<NewEntity>,
) -> Result<ApplyResult, ApplyError>
where
    R: OccurrenceResource + ?Sized,
{
    let op = editor_op(editor, entity)?;
    apply_span_op(session, resource, &op)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Occurrence,
    Entity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    EmptySpan { offset: usize, offset_end: usize },
    NotFound { kind: ObjectKind, id: String },
    OutsideSegments { offset: usize, offset_end: usize },
    MissingEntity,
    Rejected { reason: String },
    Session(SessionError),
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySpan { offset, offset_end } => write!(
                f,
                "empty span (offset={offset}, offset_end={offset_end}); put at least one token between the markers"
            ),
            Self::NotFound { kind, id } => write!(f, "object not found ({kind:?}, id={id})"),
            Self::OutsideSegments { offset, offset_end } => write!(
                f,
                "span [{offset}, {offset_end}) is not inside a single segment"
            ),
            Self::MissingEntity => f.write_str("a new occurrence needs an entity key and kind"),
            Self::Rejected { reason } => write!(f, "rejected by the server: {reason}"),
            Self::Session(err) => write!(f, "session update failed: {err}"),
        }
    }
}

impl std::error::Error for ApplyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Session(err) => Some(err),
            _ => None,
        }
    }
}

// Per-operation implementations used by `apply_span_op`.
include!("ops_impl.rs");

#[cfg(test)]
mod tests;
