// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{CreatedOccurrence, NewOccurrence, OccurrenceResource};
use crate::model::{
    DocumentId, Entity, EntityId, EntityKind, EntityOccurrence, FormId, IdError, Label,
    LabelingSession, OccurrenceId, ParseLabelError, Relation, SegmentId, SessionError,
    TextSegment,
};
use crate::span::Span;

const DOCUMENT_FILENAME: &str = "document.json";
const LABELS_FILENAME: &str = "labels.json";

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidId {
        field: &'static str,
        value: String,
        source: Box<IdError>,
    },
    InvalidLabel {
        form_id: String,
        source: Box<ParseLabelError>,
    },
    InvalidDocument {
        path: PathBuf,
        source: Box<SessionError>,
    },
    NotFound {
        kind: &'static str,
        id: String,
    },
    SymlinkRefused {
        path: PathBuf,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid id for {field}: {value:?}: {source}"),
            Self::InvalidLabel { form_id, source } => {
                write!(f, "invalid label for form {form_id}: {source}")
            }
            Self::InvalidDocument { path, source } => {
                write!(f, "inconsistent document at {path:?}: {source}")
            }
            Self::NotFound { kind, id } => write!(f, "{kind} not found (id={id})"),
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidId { source, .. } => Some(source),
            Self::InvalidLabel { source, .. } => Some(source),
            Self::InvalidDocument { source, .. } => Some(source),
            Self::NotFound { .. } => None,
            Self::SymlinkRefused { .. } => None,
        }
    }
}

/// On-disk form of a document: its segments, entities, occurrences and candidate relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentJson {
    pub document_id: String,
    /// Same-kind relations only complete in their declared order.
    #[serde(default)]
    pub order_check: bool,
    #[serde(default)]
    pub segments: Vec<SegmentJson>,
    #[serde(default)]
    pub entities: Vec<EntityJson>,
    #[serde(default)]
    pub occurrences: Vec<OccurrenceJson>,
    #[serde(default)]
    pub relations: Vec<RelationJson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SegmentJson {
    pub segment_id: String,
    /// Document token offset of the segment's first token.
    pub offset: usize,
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntityJson {
    pub entity_id: String,
    pub key: String,
    #[serde(default)]
    pub canonical_form: Option<String>,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OccurrenceJson {
    pub occurrence_id: String,
    pub entity_id: String,
    pub offset: usize,
    pub offset_end: usize,
    #[serde(default)]
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RelationJson {
    pub occurrence_a: String,
    pub occurrence_b: String,
    pub form_id: String,
    #[serde(default)]
    pub info: Option<String>,
}

/// Submitted judgments, one entry per form slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LabelsJson {
    pub document_id: String,
    #[serde(default)]
    pub forms: Vec<FormJson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormJson {
    pub form_id: String,
    /// Two-letter label code, or `null` when unset.
    #[serde(default)]
    pub label: Option<String>,
}

/// JSON schema of `document.json`.
pub fn document_json_schema() -> schemars::Schema {
    schemars::schema_for!(DocumentJson)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Writes a temp file and renames it into place, without fsync.
    #[default]
    BestEffort,

    /// Also flushes the file and its directory to stable storage where the platform allows.
    Durable,
}

/// A folder holding one document's `document.json` and `labels.json`.
#[derive(Debug, Clone)]
pub struct DocumentFolder {
    root: PathBuf,
    durability: WriteDurability,
}

impl DocumentFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document_path(&self) -> PathBuf {
        self.root.join(DOCUMENT_FILENAME)
    }

    pub fn labels_path(&self) -> PathBuf {
        self.root.join(LABELS_FILENAME)
    }

    pub fn load_document(&self) -> Result<DocumentJson, StoreError> {
        read_json(&self.document_path())
    }

    pub fn save_document(&self, document: &DocumentJson) -> Result<(), StoreError> {
        write_json(&self.root, &self.document_path(), document, self.durability)
    }

    /// Loads the session; labels are applied when `labels.json` exists.
    pub fn load_session(&self) -> Result<LabelingSession, StoreError> {
        let document = self.load_document()?;
        let mut session = session_from_json(&self.document_path(), document)?;

        let labels_path = self.labels_path();
        match fs::metadata(&labels_path) {
            Ok(_) => {
                let labels: LabelsJson = read_json(&labels_path)?;
                apply_labels(&mut session, labels)?;
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StoreError::Io {
                    path: labels_path,
                    source,
                })
            }
        }

        Ok(session)
    }

    pub fn save_session(&self, session: &LabelingSession) -> Result<(), StoreError> {
        self.save_document(&session_to_json(session))?;
        self.save_labels(session)
    }

    /// Form submission: writes the current value of every form slot.
    pub fn save_labels(&self, session: &LabelingSession) -> Result<(), StoreError> {
        write_json(
            &self.root,
            &self.labels_path(),
            &labels_to_json(session),
            self.durability,
        )
    }

    fn create_occurrence_in_document(
        &self,
        request: &NewOccurrence,
    ) -> Result<CreatedOccurrence, StoreError> {
        let mut document = self.load_document()?;

        let existing_entity = document
            .entities
            .iter()
            .find(|entity| entity.key == request.entity_key && entity.kind == request.kind.as_str())
            .map(|entity| entity.entity_id.clone());
        let created_entity = existing_entity.is_none();
        let entity_id = match existing_entity {
            Some(entity_id) => entity_id,
            None => {
                let entity_id =
                    next_free_id("e", document.entities.iter().map(|e| e.entity_id.as_str()));
                document.entities.push(EntityJson {
                    entity_id: entity_id.clone(),
                    key: request.entity_key.clone(),
                    canonical_form: None,
                    kind: request.kind.as_str().to_owned(),
                });
                entity_id
            }
        };

        let occurrence_id = next_free_id(
            "eo",
            document.occurrences.iter().map(|o| o.occurrence_id.as_str()),
        );
        document.occurrences.push(OccurrenceJson {
            occurrence_id: occurrence_id.clone(),
            entity_id: entity_id.clone(),
            offset: request.span.offset,
            offset_end: request.span.offset_end,
            alias: request.alias.clone(),
        });
        self.save_document(&document)?;

        Ok(CreatedOccurrence {
            occurrence_id: parse_id("occurrences[].occurrence_id", occurrence_id)?,
            entity_id: parse_id("entities[].entity_id", entity_id)?,
            created_entity,
        })
    }

    fn update_span_in_document(
        &self,
        occurrence_id: &OccurrenceId,
        span: Span,
        alias: &str,
    ) -> Result<(), StoreError> {
        let mut document = self.load_document()?;
        let occurrence = document
            .occurrences
            .iter_mut()
            .find(|o| o.occurrence_id == occurrence_id.as_str())
            .ok_or_else(|| StoreError::NotFound {
                kind: "occurrence",
                id: occurrence_id.to_string(),
            })?;
        occurrence.offset = span.offset;
        occurrence.offset_end = span.offset_end;
        occurrence.alias = alias.to_owned();
        self.save_document(&document)
    }

    fn delete_occurrences_in_document(
        &self,
        entity_id: Option<&EntityId>,
        occurrence_ids: &BTreeSet<String>,
    ) -> Result<(), StoreError> {
        let mut document = self.load_document()?;

        if let Some(entity_id) = entity_id {
            let before = document.entities.len();
            document
                .entities
                .retain(|entity| entity.entity_id != entity_id.as_str());
            if document.entities.len() == before {
                return Err(StoreError::NotFound {
                    kind: "entity",
                    id: entity_id.to_string(),
                });
            }
        }

        let removed = document
            .occurrences
            .iter()
            .filter(|o| {
                occurrence_ids.contains(&o.occurrence_id)
                    || entity_id.is_some_and(|entity_id| o.entity_id == entity_id.as_str())
            })
            .map(|o| o.occurrence_id.clone())
            .collect::<BTreeSet<_>>();
        if entity_id.is_none() && removed.len() != occurrence_ids.len() {
            let missing = occurrence_ids
                .difference(&removed)
                .next()
                .cloned()
                .unwrap_or_default();
            return Err(StoreError::NotFound {
                kind: "occurrence",
                id: missing,
            });
        }

        document
            .occurrences
            .retain(|o| !removed.contains(&o.occurrence_id));
        document.relations.retain(|r| {
            !removed.contains(&r.occurrence_a) && !removed.contains(&r.occurrence_b)
        });
        self.save_document(&document)
    }
}

impl OccurrenceResource for DocumentFolder {
    fn create_occurrence(&mut self, request: &NewOccurrence) -> Result<CreatedOccurrence, String> {
        self.create_occurrence_in_document(request)
            .map_err(|err| err.to_string())
    }

    fn update_span(
        &mut self,
        occurrence_id: &OccurrenceId,
        span: Span,
        alias: &str,
    ) -> Result<(), String> {
        self.update_span_in_document(occurrence_id, span, alias)
            .map_err(|err| err.to_string())
    }

    fn delete_occurrence(&mut self, occurrence_id: &OccurrenceId) -> Result<(), String> {
        let ids = BTreeSet::from([occurrence_id.to_string()]);
        self.delete_occurrences_in_document(None, &ids)
            .map_err(|err| err.to_string())
    }

    fn delete_entity(&mut self, entity_id: &EntityId) -> Result<(), String> {
        self.delete_occurrences_in_document(Some(entity_id), &BTreeSet::new())
            .map_err(|err| err.to_string())
    }
}

// JSON conversion and safe-write helpers for the document folder.
include!("document_folder/helpers.rs");
