// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Spanlabel: relation selection and span editing for corpus labeling.
//!
//! The crate holds the state a labeling UI drives: the two-click relation selection state
//! machine (`select`), token-range inference for span editing (`span`), the operations that
//! persist span edits (`ops`) and a folder-backed document store (`store`).

pub mod model;
pub mod ops;
pub mod query;
pub mod render;
pub mod select;
pub mod span;
pub mod store;
