// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Routes, the route guard and the per-tab router

mod guard;
mod route;
mod router;

pub use guard::{can_enter, decide, GuardDecision};
pub use route::{Route, RouteAccess};
pub use router::{NavigationOutcome, Router, View};
