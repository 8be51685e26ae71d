// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::SmolStr;

use super::ids::SegmentId;

/// A run of document tokens shown to the labeler as one unit.
///
/// Token `i` of the segment sits at document offset `offset + i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    segment_id: SegmentId,
    offset: usize,
    tokens: Vec<SmolStr>,
}

impl TextSegment {
    pub fn new<I, S>(segment_id: SegmentId, offset: usize, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            segment_id,
            offset,
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segment_id(&self) -> &SegmentId {
        &self.segment_id
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn offset_end(&self) -> usize {
        self.offset + self.tokens.len()
    }

    pub fn tokens(&self) -> &[SmolStr] {
        &self.tokens
    }

    pub fn contains_span(&self, offset: usize, offset_end: usize) -> bool {
        self.offset <= offset && offset <= offset_end && offset_end <= self.offset_end()
    }

    /// Text of document tokens `[offset, offset_end)`, clamped to this segment.
    pub fn text_of(&self, offset: usize, offset_end: usize) -> String {
        let start = offset.saturating_sub(self.offset).min(self.tokens.len());
        let end = offset_end
            .saturating_sub(self.offset)
            .clamp(start, self.tokens.len());
        self.tokens[start..end]
            .iter()
            .map(SmolStr::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::TextSegment;
    use crate::model::SegmentId;

    fn segment() -> TextSegment {
        TextSegment::new(
            SegmentId::new("s:1").expect("segment id"),
            10,
            ["Ada", "Lovelace", "met", "Babbage"],
        )
    }

    #[test]
    fn text_of_uses_document_offsets() {
        let segment = segment();
        assert_eq!(segment.text_of(10, 12), "Ada Lovelace");
        assert_eq!(segment.text_of(13, 14), "Babbage");
    }

    #[test]
    fn text_of_clamps_out_of_range_spans() {
        let segment = segment();
        assert_eq!(segment.text_of(12, 99), "met Babbage");
        assert_eq!(segment.text_of(13, 11), "");
    }

    #[test]
    fn contains_span_checks_segment_bounds() {
        let segment = segment();
        assert!(segment.contains_span(10, 14));
        assert!(!segment.contains_span(9, 11));
        assert!(!segment.contains_span(12, 15));
    }
}
