// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Token-range inference for span editing.
//!
//! While an occurrence's span is being edited, the segment's tokens are shown as tiles with two
//! movable boundary markers among them. Every reorder recomputes the span from scratch by
//! scanning the tiles: the token after the first marker starts the span and the token after the
//! second marker ends it (exclusive).

use std::fmt;

use smallvec::SmallVec;

pub mod editor;

pub use editor::{EditorMode, SpanEditor, SpanPreview};

/// One tile of the editing sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanEntry {
    /// A token with its offset local to the segment.
    Token { offset: usize },
    /// A boundary marker.
    Marker,
}

impl SpanEntry {
    pub fn is_marker(self) -> bool {
        matches!(self, Self::Marker)
    }

    fn token_offset(self) -> Option<usize> {
        match self {
            Self::Token { offset } => Some(offset),
            Self::Marker => None,
        }
    }
}

/// Which boundary marker, in encounter order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerEnd {
    Start,
    End,
}

/// A span of document tokens `[offset, offset_end)` that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub offset: usize,
    pub offset_end: usize,
}

impl Span {
    pub fn new(offset: usize, offset_end: usize) -> Result<Self, SpanError> {
        if offset_end <= offset {
            return Err(SpanError::EmptySpan { offset, offset_end });
        }
        Ok(Self { offset, offset_end })
    }

    pub fn len(self) -> usize {
        self.offset_end - self.offset
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// Raw result of a scan. It may be degenerate; callers validate before persisting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredSpan {
    pub offset: usize,
    pub offset_end: usize,
    /// One flag per entry; `true` for tokens between the two markers. Display only.
    pub between: Vec<bool>,
}

impl InferredSpan {
    pub fn is_empty(&self) -> bool {
        self.offset_end <= self.offset
    }

    pub fn validate(&self) -> Result<Span, SpanError> {
        Span::new(self.offset, self.offset_end)
    }
}

/// Token tiles plus exactly two boundary markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence {
    entries: Vec<SpanEntry>,
}

impl TokenSequence {
    pub fn new(entries: Vec<SpanEntry>) -> Result<Self, SpanError> {
        let found = entries.iter().filter(|entry| entry.is_marker()).count();
        if found != 2 {
            return Err(SpanError::MarkerCount { found });
        }
        Ok(Self { entries })
    }

    /// Tokens `0..token_count` with markers around local tokens `[start, end)`.
    ///
    /// Out-of-range bounds are clamped to the token count.
    pub fn around(token_count: usize, start: usize, end: usize) -> Self {
        let start = start.min(token_count);
        let end = end.clamp(start, token_count);

        let mut entries = Vec::with_capacity(token_count + 2);
        entries.extend((0..start).map(|offset| SpanEntry::Token { offset }));
        entries.push(SpanEntry::Marker);
        entries.extend((start..end).map(|offset| SpanEntry::Token { offset }));
        entries.push(SpanEntry::Marker);
        entries.extend((end..token_count).map(|offset| SpanEntry::Token { offset }));
        Self { entries }
    }

    pub fn entries(&self) -> &[SpanEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn marker_positions(&self) -> SmallVec<[usize; 2]> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_marker())
            .map(|(index, _)| index)
            .collect()
    }

    /// Drag-reorder: the entry at `from` ends up at index `to`.
    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<(), SpanError> {
        let len = self.entries.len();
        for index in [from, to] {
            if index >= len {
                return Err(SpanError::EntryOutOfRange { index, len });
            }
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        Ok(())
    }

    /// Moves the first (`Start`) or second (`End`) marker, in current encounter order, to `to`.
    ///
    /// Dragging one marker past the other swaps their roles on the next scan.
    pub fn move_marker(&mut self, which: MarkerEnd, to: usize) -> Result<(), SpanError> {
        let positions = self.marker_positions();
        let from = match which {
            MarkerEnd::Start => positions.first(),
            MarkerEnd::End => positions.get(1),
        };
        let Some(&from) = from else {
            return Err(SpanError::MarkerCount {
                found: positions.len(),
            });
        };
        self.move_entry(from, to)
    }

    /// Scans the tiles and derives the span, adding `base_offset` to the local token offsets.
    ///
    /// When the second marker is the last entry, the end is one past the nearest token before
    /// it, skipping over the first marker if the two are adjacent. A strict "entry right before"
    /// reading would differ only in that adjacent case, which collapses to a point either way.
    pub fn infer(&self, base_offset: usize) -> InferredSpan {
        let mut markers = SmallVec::<[usize; 2]>::new();
        let mut painting = false;
        let mut between = Vec::with_capacity(self.entries.len());

        for (index, entry) in self.entries.iter().enumerate() {
            match entry {
                SpanEntry::Marker => {
                    markers.push(index);
                    painting = !painting;
                    between.push(false);
                }
                SpanEntry::Token { .. } => between.push(painting),
            }
        }

        let (first, second) = match markers.as_slice() {
            [first, second] => (*first, *second),
            _ => {
                return InferredSpan {
                    offset: base_offset,
                    offset_end: base_offset,
                    between,
                }
            }
        };

        // Past the last token the end falls back to one after the closest preceding token.
        let offset_end = match self.token_after(second) {
            Some(offset) => offset,
            None => self.token_before(second).map_or(0, |offset| offset + 1),
        };
        // Adjacent markers collapse the span to a point.
        let offset = self.token_after(first).unwrap_or(offset_end);

        InferredSpan {
            offset: base_offset + offset,
            offset_end: base_offset + offset_end,
            between,
        }
    }

    fn token_after(&self, index: usize) -> Option<usize> {
        self.entries
            .get(index + 1)
            .and_then(|entry| entry.token_offset())
    }

    fn token_before(&self, index: usize) -> Option<usize> {
        self.entries[..index]
            .iter()
            .rev()
            .find_map(|entry| entry.token_offset())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanError {
    MarkerCount { found: usize },
    EmptySpan { offset: usize, offset_end: usize },
    EntryOutOfRange { index: usize, len: usize },
    TokenOutOfRange { index: usize, len: usize },
    UnknownOccurrence { occurrence_id: String },
    NoSegmentForOccurrence { occurrence_id: String },
}

impl fmt::Display for SpanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MarkerCount { found } => {
                write!(f, "expected exactly 2 boundary markers, found {found}")
            }
            Self::EmptySpan { offset, offset_end } => write!(
                f,
                "empty span: the end marker must come after at least one token (offset={offset}, offset_end={offset_end})"
            ),
            Self::EntryOutOfRange { index, len } => {
                write!(f, "entry index {index} out of range (len={len})")
            }
            Self::TokenOutOfRange { index, len } => {
                write!(f, "token index {index} out of range (len={len})")
            }
            Self::UnknownOccurrence { occurrence_id } => {
                write!(f, "occurrence not found (id={occurrence_id})")
            }
            Self::NoSegmentForOccurrence { occurrence_id } => {
                write!(f, "no segment contains occurrence {occurrence_id}")
            }
        }
    }
}

impl std::error::Error for SpanError {}
