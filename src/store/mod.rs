// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Session data source and persistence resource.
//!
//! `OccurrenceResource` is the contract span edits are persisted through. `DocumentFolder`
//! implements it (and loads/saves whole sessions) on top of a folder holding `document.json`
//! and `labels.json`.

use crate::model::{EntityId, EntityKind, OccurrenceId};
use crate::span::Span;

pub mod document_folder;

pub use document_folder::{
    document_json_schema, DocumentFolder, DocumentJson, EntityJson, FormJson, LabelsJson,
    OccurrenceJson, RelationJson, SegmentJson, StoreError, WriteDurability,
};

/// Request to create an occurrence (and its entity, if `(entity_key, kind)` is new).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOccurrence {
    pub entity_key: String,
    pub kind: EntityKind,
    pub span: Span,
    pub alias: String,
}

/// Ids handed out by the resource for a created occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedOccurrence {
    pub occurrence_id: OccurrenceId,
    pub entity_id: EntityId,
    /// Whether the entity was created along with the occurrence.
    pub created_entity: bool,
}

/// Create/update/delete calls for occurrences and entities.
///
/// Failures are reported as a human-readable reason; the caller shows it and leaves its session
/// untouched so the labeler can retry.
pub trait OccurrenceResource {
    fn create_occurrence(&mut self, request: &NewOccurrence) -> Result<CreatedOccurrence, String>;

    fn update_span(
        &mut self,
        occurrence_id: &OccurrenceId,
        span: Span,
        alias: &str,
    ) -> Result<(), String>;

    fn delete_occurrence(&mut self, occurrence_id: &OccurrenceId) -> Result<(), String>;

    fn delete_entity(&mut self, entity_id: &EntityId) -> Result<(), String>;
}
