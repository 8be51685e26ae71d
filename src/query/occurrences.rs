// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use regex::RegexBuilder;
use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::model::{EntityOccurrence, LabelingSession, OccurrenceId, Relation, SegmentId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceSearchMode {
    Substring,
    Regex,
}

/// Occurrences whose alias matches `needle`, in document order.
pub fn occurrence_search<'a>(
    session: &'a LabelingSession,
    needle: &str,
    mode: OccurrenceSearchMode,
    case_insensitive: bool,
) -> Result<Vec<(&'a OccurrenceId, &'a EntityOccurrence)>, regex::Error> {
    let mut hits = match mode {
        OccurrenceSearchMode::Substring => {
            if case_insensitive {
                let needle_lower = needle.to_lowercase();
                session
                    .occurrences()
                    .iter()
                    .filter(|(_, occ)| occ.alias().to_lowercase().contains(&needle_lower))
                    .collect::<Vec<_>>()
            } else {
                session
                    .occurrences()
                    .iter()
                    .filter(|(_, occ)| occ.alias().contains(needle))
                    .collect::<Vec<_>>()
            }
        }
        OccurrenceSearchMode::Regex => {
            let regex = RegexBuilder::new(needle)
                .case_insensitive(case_insensitive)
                .build()?;
            session
                .occurrences()
                .iter()
                .filter(|(_, occ)| regex.is_match(occ.alias()))
                .collect::<Vec<_>>()
        }
    };

    hits.sort_by(|(a_id, a), (b_id, b)| {
        a.offset()
            .cmp(&b.offset())
            .then_with(|| a.offset_end().cmp(&b.offset_end()))
            .then_with(|| a_id.cmp(b_id))
    });
    Ok(hits)
}

/// Local token indices of `segment_id` covered by `occurrence_id`; highlighted on hover.
///
/// Empty when either id is unknown or the occurrence lies outside the segment.
pub fn hover_targets(
    session: &LabelingSession,
    segment_id: &SegmentId,
    occurrence_id: &OccurrenceId,
) -> Vec<usize> {
    let (Some(segment), Some(occurrence)) = (
        session.segment(segment_id),
        session.occurrence(occurrence_id),
    ) else {
        return Vec::new();
    };

    let start = occurrence.offset().max(segment.offset());
    let end = occurrence.offset_end().min(segment.offset_end());
    (start..end).map(|offset| offset - segment.offset()).collect()
}

/// One token of a segment together with the occurrences covering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedToken {
    pub index: usize,
    pub offset: usize,
    pub text: SmolStr,
    /// Covering occurrences, usually zero or one.
    pub occurrences: SmallVec<[OccurrenceId; 2]>,
}

impl EnrichedToken {
    pub fn is_covered(&self) -> bool {
        !self.occurrences.is_empty()
    }
}

pub fn enriched_tokens(
    session: &LabelingSession,
    segment_id: &SegmentId,
) -> Option<Vec<EnrichedToken>> {
    let segment = session.segment(segment_id)?;
    let tokens = segment
        .tokens()
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let offset = segment.offset() + index;
            let occurrences = session
                .occurrences()
                .iter()
                .filter(|(_, occ)| occ.covers(offset))
                .map(|(occurrence_id, _)| occurrence_id.clone())
                .collect();
            EnrichedToken {
                index,
                offset,
                text: text.clone(),
                occurrences,
            }
        })
        .collect();
    Some(tokens)
}

/// Candidate relations that pair `occurrence_id` with something, in relation order.
pub fn relations_of<'a>(
    session: &'a LabelingSession,
    occurrence_id: &OccurrenceId,
) -> Vec<&'a Relation> {
    session
        .relations()
        .iter()
        .filter(|relation| relation.contains(occurrence_id))
        .collect()
}
