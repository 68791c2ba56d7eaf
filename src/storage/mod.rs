// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Durable key/value storage shared by client tabs
//!
//! Mirrors the browser's `localStorage`: one area per origin, visible to
//! every tab, with a change notification delivered to the *other* tabs
//! whenever one tab writes.

mod area;
mod backend;

pub use area::{ListenerId, StorageArea, StorageEvent, StorageListener, TabId};
pub use backend::{FileStorage, MemoryStorage, StorageBackend};
