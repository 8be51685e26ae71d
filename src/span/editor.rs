// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::SmolStr;

use super::{InferredSpan, MarkerEnd, Span, SpanEntry, SpanError, TokenSequence};
use crate::model::{LabelingSession, OccurrenceId, SegmentId, TextSegment};

/// Whether the editor reshapes an existing occurrence or draws a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Edit { occurrence_id: OccurrenceId },
    Create,
}

/// Inferred span plus the text it currently covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanPreview {
    pub span: InferredSpan,
    pub text: String,
}

/// State of one span-editing dialog over a single segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanEditor {
    mode: EditorMode,
    segment_id: SegmentId,
    base_offset: usize,
    tokens: Vec<SmolStr>,
    sequence: TokenSequence,
}

impl SpanEditor {
    /// Opens the editor on an existing occurrence, markers around its current tokens.
    pub fn for_occurrence(
        session: &LabelingSession,
        occurrence_id: &OccurrenceId,
    ) -> Result<Self, SpanError> {
        let occurrence =
            session
                .occurrence(occurrence_id)
                .ok_or_else(|| SpanError::UnknownOccurrence {
                    occurrence_id: occurrence_id.to_string(),
                })?;
        let segment =
            session
                .segment_of(occurrence_id)
                .ok_or_else(|| SpanError::NoSegmentForOccurrence {
                    occurrence_id: occurrence_id.to_string(),
                })?;

        let start = occurrence.offset() - segment.offset();
        let end = occurrence.offset_end() - segment.offset();
        Ok(Self::open(
            EditorMode::Edit {
                occurrence_id: occurrence_id.clone(),
            },
            segment,
            TokenSequence::around(segment.tokens().len(), start, end),
        ))
    }

    /// Opens the editor for a new occurrence, markers around segment token `token_index`.
    pub fn for_new(segment: &TextSegment, token_index: usize) -> Result<Self, SpanError> {
        let len = segment.tokens().len();
        if token_index >= len {
            return Err(SpanError::TokenOutOfRange {
                index: token_index,
                len,
            });
        }
        Ok(Self::open(
            EditorMode::Create,
            segment,
            TokenSequence::around(len, token_index, token_index + 1),
        ))
    }

    fn open(mode: EditorMode, segment: &TextSegment, sequence: TokenSequence) -> Self {
        Self {
            mode,
            segment_id: segment.segment_id().clone(),
            base_offset: segment.offset(),
            tokens: segment.tokens().to_vec(),
            sequence,
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn segment_id(&self) -> &SegmentId {
        &self.segment_id
    }

    pub fn base_offset(&self) -> usize {
        self.base_offset
    }

    pub fn sequence(&self) -> &TokenSequence {
        &self.sequence
    }

    /// Token text for an entry, `None` for markers.
    pub fn entry_text(&self, entry: SpanEntry) -> Option<&str> {
        match entry {
            SpanEntry::Token { offset } => self.tokens.get(offset).map(SmolStr::as_str),
            SpanEntry::Marker => None,
        }
    }

    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<(), SpanError> {
        self.sequence.move_entry(from, to)
    }

    pub fn move_marker(&mut self, which: MarkerEnd, to: usize) -> Result<(), SpanError> {
        self.sequence.move_marker(which, to)
    }

    pub fn infer(&self) -> InferredSpan {
        self.sequence.infer(self.base_offset)
    }

    pub fn preview(&self) -> SpanPreview {
        let span = self.infer();
        let text = if span.is_empty() {
            String::new()
        } else {
            self.text_between(&span)
        };
        SpanPreview { span, text }
    }

    /// The validated span; empty spans are rejected here, before any persistence call.
    pub fn commit(&self) -> Result<Span, SpanError> {
        self.infer().validate()
    }

    fn text_between(&self, span: &InferredSpan) -> String {
        let start = span.offset - self.base_offset;
        let end = (span.offset_end - self.base_offset).min(self.tokens.len());
        self.tokens
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .map(SmolStr::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
