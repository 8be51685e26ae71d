// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

pub(crate) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    let len = text_len(text);
    if len <= max_len {
        return text.to_owned();
    }

    if max_len == 1 {
        return "…".to_owned();
    }

    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

pub(crate) fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// A line of spaces with `^` under every `(start, len)` cell range, trailing spaces trimmed.
pub(crate) fn caret_line(ranges: &[(usize, usize)]) -> String {
    let mut line = String::new();
    let mut cursor = 0;
    for &(start, len) in ranges {
        if start < cursor {
            continue;
        }
        line.extend(std::iter::repeat(' ').take(start - cursor));
        line.extend(std::iter::repeat('^').take(len));
        cursor = start + len;
    }
    line.trim_end_matches(' ').to_owned()
}

#[cfg(test)]
mod tests {
    use super::{caret_line, text_len, truncate_with_ellipsis};

    #[test]
    fn truncate_with_ellipsis_handles_small_widths() {
        assert_eq!(truncate_with_ellipsis("hello", 0), "");
        assert_eq!(truncate_with_ellipsis("hello", 1), "…");
        assert_eq!(truncate_with_ellipsis("h", 1), "h");
        assert_eq!(truncate_with_ellipsis("hello", 2), "h…");
    }

    #[test]
    fn truncate_with_ellipsis_counts_chars_not_bytes() {
        assert_eq!(text_len("αβγ"), 3);
        assert_eq!(truncate_with_ellipsis("αβγ", 2), "α…");
    }

    #[test]
    fn caret_line_skips_overlapping_ranges() {
        assert_eq!(caret_line(&[(2, 3), (6, 1)]), "  ^^^ ^");
        assert_eq!(caret_line(&[(2, 3), (3, 4)]), "  ^^^");
        assert_eq!(caret_line(&[]), "");
    }
}
