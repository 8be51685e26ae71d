// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::ids::EntityId;

/// Name of an entity kind such as `PERSON` or `LOCATION`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKind {
    name: String,
}

impl EntityKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An entity that occurrences point at. `(key, kind)` is unique within a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    entity_id: EntityId,
    key: String,
    canonical_form: String,
    kind: EntityKind,
}

impl Entity {
    pub fn new(entity_id: EntityId, key: impl Into<String>, kind: EntityKind) -> Self {
        let key = key.into();
        Self {
            entity_id,
            canonical_form: key.clone(),
            key,
            kind,
        }
    }

    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn canonical_form(&self) -> &str {
        &self.canonical_form
    }

    pub fn set_canonical_form(&mut self, canonical_form: impl Into<String>) {
        self.canonical_form = canonical_form.into();
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }
}
