// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Route guard

use super::route::{Route, RouteAccess};
use crate::auth::{SessionMonitor, SessionPhase};

/// Outcome of a guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested route
    Allow,
    /// Render another route instead
    Redirect(Route),
    /// Session not resolved yet; render the placeholder
    Checking,
}

/// Decide whether `route` may be entered
///
/// The monitor re-reads the credential store first, so the decision
/// reflects storage at the moment of the call rather than the last
/// observed phase.
pub fn can_enter(monitor: &SessionMonitor, route: Route) -> GuardDecision {
    decide(monitor.evaluate(), route)
}

/// Pure decision table
pub fn decide(phase: SessionPhase, route: Route) -> GuardDecision {
    match (phase, route.access()) {
        (SessionPhase::Initializing, _) => GuardDecision::Checking,
        (_, RouteAccess::Public) => GuardDecision::Allow,
        (SessionPhase::Unauthenticated, RouteAccess::Protected) => {
            GuardDecision::Redirect(Route::LOGIN)
        }
        (SessionPhase::Authenticated, RouteAccess::GuestOnly) => {
            GuardDecision::Redirect(Route::HOME)
        }
        _ => GuardDecision::Allow,
    }
}
