// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Attack submission
//!
//! Input selection, tuning parameters, the request orchestrator and the
//! catalog of sample images.

mod catalog;
mod orchestrator;
mod types;

pub use catalog::{CatalogImage, ImageCatalog};
pub use orchestrator::AttackOrchestrator;
pub use types::{
    inline_png, AttackInput, AttackOutcome, AttackParameters, AttackResult, AttackSelection,
    ImageFile, ModelId, INLINE_PNG_PREFIX,
};
