// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

/// A judgment a labeler can record for one candidate relation.
///
/// This is also the toolbox: the "current tool" of a session is one of these labels, and it is
/// what an empty form slot receives when its occurrence pair is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Label {
    #[default]
    Yes,
    No,
    DontKnow,
    Skip,
    Nonsense,
}

/// The judged value of one form slot. `None` means the slot is unset.
pub type FormValue = Option<Label>;

impl Label {
    pub const ALL: [Label; 5] = [
        Self::Yes,
        Self::No,
        Self::DontKnow,
        Self::Skip,
        Self::Nonsense,
    ];

    /// Two-letter code used in stored label files and on the command line.
    pub fn code(self) -> &'static str {
        match self {
            Self::Yes => "YE",
            Self::No => "NO",
            Self::DontKnow => "DK",
            Self::Skip => "SK",
            Self::Nonsense => "NS",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Yes => "Yes, relation is present",
            Self::No => "No relation present",
            Self::DontKnow => "Don't know if the relation is present",
            Self::Skip => "Skipped labeling of this evidence",
            Self::Nonsense => "Evidence is nonsense",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLabelError {
    value: String,
}

impl fmt::Display for ParseLabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown label code {:?} (expected YE, NO, DK, SK or NS)", self.value)
    }
}

impl std::error::Error for ParseLabelError {}

impl FromStr for Label {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|label| label.code() == upper)
            .ok_or_else(|| ParseLabelError {
                value: s.to_owned(),
            })
    }
}
