// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::text::{caret_line, text_len};
use crate::span::{SpanEditor, SpanEntry};

/// Renders the editor tiles on one line (`|` for markers) with `^` under tokens between them.
///
/// The second line is omitted when no token sits between the markers.
pub fn render_span_editor(editor: &SpanEditor) -> String {
    let inferred = editor.infer();

    let mut line = String::new();
    let mut highlighted = Vec::new();
    for (index, entry) in editor.sequence().entries().iter().enumerate() {
        if index > 0 {
            line.push(' ');
        }
        let text = match entry {
            SpanEntry::Marker => "|",
            SpanEntry::Token { .. } => editor.entry_text(*entry).unwrap_or("?"),
        };
        if inferred.between.get(index).copied().unwrap_or(false) {
            highlighted.push((text_len(&line), text_len(text)));
        }
        line.push_str(text);
    }

    let carets = caret_line(&highlighted);
    if carets.is_empty() {
        line
    } else {
        format!("{line}\n{carets}")
    }
}
