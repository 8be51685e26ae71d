// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use crate::model::{EntityOccurrence, LabelingSession, OccurrenceId, SegmentId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentRenderError {
    UnknownSegment { segment_id: SegmentId },
}

impl fmt::Display for SegmentRenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSegment { segment_id } => {
                write!(f, "segment not found (id={segment_id})")
            }
        }
    }
}

impl std::error::Error for SegmentRenderError {}

/// Renders a segment as one line of tokens with occurrences bracketed.
///
/// Each occurrence reads `[text](occurrence_id)`. The armed occurrence is suffixed with `*`;
/// while one is armed, occurrences that can complete a pair are suffixed with `+`. When
/// occurrences overlap, the earliest (then longest) one is drawn and the others are skipped.
pub fn render_segment_text(
    session: &LabelingSession,
    segment_id: &SegmentId,
) -> Result<String, SegmentRenderError> {
    let segment = session
        .segment(segment_id)
        .ok_or_else(|| SegmentRenderError::UnknownSegment {
            segment_id: segment_id.clone(),
        })?;
    let armed = session.selected_id().is_some();

    let mut occurrences = session
        .occurrences()
        .iter()
        .filter(|(_, occ)| {
            occ.offset() < occ.offset_end() && segment.contains_span(occ.offset(), occ.offset_end())
        })
        .collect::<Vec<(&OccurrenceId, &EntityOccurrence)>>();
    occurrences.sort_by(|(a_id, a), (b_id, b)| {
        a.offset()
            .cmp(&b.offset())
            .then_with(|| b.offset_end().cmp(&a.offset_end()))
            .then_with(|| a_id.cmp(b_id))
    });

    let mut parts = Vec::with_capacity(segment.tokens().len());
    let mut pending = occurrences.into_iter().peekable();
    let mut offset = segment.offset();
    while offset < segment.offset_end() {
        while pending.peek().is_some_and(|(_, occ)| occ.offset() < offset) {
            pending.next();
        }

        match pending.peek() {
            Some(&(occurrence_id, occ)) if occ.offset() == offset => {
                let mut part = format!(
                    "[{}]({occurrence_id})",
                    segment.text_of(occ.offset(), occ.offset_end())
                );
                if occ.selected() {
                    part.push('*');
                } else if armed && occ.selectable() {
                    part.push('+');
                }
                parts.push(part);
                offset = occ.offset_end();
                pending.next();
            }
            _ => {
                let local = offset - segment.offset();
                parts.push(
                    segment
                        .tokens()
                        .get(local)
                        .map(ToString::to_string)
                        .unwrap_or_default(),
                );
                offset += 1;
            }
        }
    }

    Ok(parts.join(" "))
}
