// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::entity::EntityKind;
use super::ids::EntityId;

/// A tagged mention of an entity, spanning document tokens `[offset, offset_end)`.
///
/// `selectable` and `selected` are session flags owned by the selection state machine; they are
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityOccurrence {
    entity_id: EntityId,
    kind: EntityKind,
    offset: usize,
    offset_end: usize,
    alias: String,
    selectable: bool,
    selected: bool,
}

impl EntityOccurrence {
    pub fn new(
        entity_id: EntityId,
        kind: EntityKind,
        offset: usize,
        offset_end: usize,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            entity_id,
            kind,
            offset,
            offset_end,
            alias: alias.into(),
            selectable: true,
            selected: false,
        }
    }

    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn offset_end(&self) -> usize {
        self.offset_end
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn set_span(&mut self, offset: usize, offset_end: usize, alias: impl Into<String>) {
        self.offset = offset;
        self.offset_end = offset_end;
        self.alias = alias.into();
    }

    /// Whether document token `offset` falls inside this occurrence.
    pub fn covers(&self, offset: usize) -> bool {
        self.offset <= offset && offset < self.offset_end
    }

    pub fn selectable(&self) -> bool {
        self.selectable
    }

    pub fn set_selectable(&mut self, selectable: bool) {
        self.selectable = selectable;
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
