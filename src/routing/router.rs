// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Router
//!
//! Tracks which view a tab shows. Every navigation goes through the guard,
//! and the current route is re-checked whenever the auth bus fires or the
//! session phase changes, so a logout in this or another tab moves a
//! protected view to the login page without a reload.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::guard::{can_enter, GuardDecision};
use super::route::Route;
use crate::attack::AttackResult;
use crate::auth::{AuthEvent, AuthEventBus, SessionMonitor, Subscription};

/// Redirect chain limit before falling back to the landing page
const MAX_REDIRECTS: usize = 4;

/// What the tab currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Neutral placeholder while the session is unresolved
    Checking,
    /// A rendered route
    Page(Route),
}

/// Result of a navigation or re-check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Requested route rendered
    Rendered(Route),
    /// Guard sent the user elsewhere
    Redirected { requested: Route, rendered: Route },
    /// Decision deferred until the session resolves
    Checking(Route),
}

impl NavigationOutcome {
    /// Route on screen after this outcome, if any
    pub fn rendered(&self) -> Option<Route> {
        match self {
            NavigationOutcome::Rendered(route) => Some(*route),
            NavigationOutcome::Redirected { rendered, .. } => Some(*rendered),
            NavigationOutcome::Checking(_) => None,
        }
    }
}

#[derive(Debug)]
struct RouterState {
    view: View,
    pending: Option<Route>,
    results: Option<AttackResult>,
    history: Vec<Route>,
}

/// Guarded navigation for one tab
pub struct Router {
    monitor: Arc<SessionMonitor>,
    state: Mutex<RouterState>,
    subscription: Mutex<Option<Subscription>>,
}

impl Router {
    /// Create a router and start following `bus`
    pub fn new(monitor: Arc<SessionMonitor>, bus: &Arc<AuthEventBus>) -> Arc<Self> {
        let router = Arc::new(Self {
            monitor,
            state: Mutex::new(RouterState {
                view: View::Checking,
                pending: None,
                results: None,
                history: Vec::new(),
            }),
            subscription: Mutex::new(None),
        });

        let weak: Weak<Self> = Arc::downgrade(&router);
        let subscription = bus.subscribe(Arc::new(move |_: &AuthEvent| {
            if let Some(router) = weak.upgrade() {
                router.revalidate();
            }
        }));
        *router.subscription.lock() = Some(subscription);

        router
    }

    /// Navigate to `route`, dropping any transient results payload
    pub fn navigate(&self, route: Route) -> NavigationOutcome {
        self.state.lock().results = None;
        self.resolve(route)
    }

    /// Navigate to `route` carrying a results payload
    pub fn navigate_with_results(&self, route: Route, results: AttackResult) -> NavigationOutcome {
        self.state.lock().results = Some(results);
        self.resolve(route)
    }

    /// Re-run the guard for the route on screen (or pending)
    pub fn revalidate(&self) -> Option<NavigationOutcome> {
        let target = {
            let state = self.state.lock();
            match state.view {
                View::Page(route) => Some(route),
                View::Checking => state.pending,
            }
        };
        target.map(|route| self.resolve(route))
    }

    /// Re-check on every session phase change, on the current runtime
    pub fn spawn_follow(self: &Arc<Self>) -> JoinHandle<()> {
        let router = Arc::downgrade(self);
        let mut phases = self.monitor.watch();
        tokio::spawn(async move {
            while phases.changed().await.is_ok() {
                let Some(live) = router.upgrade() else {
                    break;
                };
                live.revalidate();
            }
        })
    }

    /// Current view
    pub fn current_view(&self) -> View {
        self.state.lock().view
    }

    /// Rendered route, if not checking
    pub fn current_route(&self) -> Option<Route> {
        match self.current_view() {
            View::Page(route) => Some(route),
            View::Checking => None,
        }
    }

    /// Route waiting on the session check
    pub fn pending_route(&self) -> Option<Route> {
        self.state.lock().pending
    }

    /// Transient results payload for the results view
    pub fn results(&self) -> Option<AttackResult> {
        self.state.lock().results.clone()
    }

    /// Routes rendered so far
    pub fn history(&self) -> Vec<Route> {
        self.state.lock().history.clone()
    }

    /// Monitor this router consults
    pub fn monitor(&self) -> &Arc<SessionMonitor> {
        &self.monitor
    }

    fn resolve(&self, requested: Route) -> NavigationOutcome {
        let mut target = requested;
        let mut hops = 0;

        // No lock held here: the guard may clear credentials and re-enter
        // through the bus.
        let rendered = loop {
            match can_enter(&self.monitor, target) {
                GuardDecision::Allow => break target,
                GuardDecision::Checking => {
                    let mut state = self.state.lock();
                    state.view = View::Checking;
                    state.pending = Some(requested);
                    debug!(route = %requested, "Session unresolved, deferring");
                    return NavigationOutcome::Checking(requested);
                }
                GuardDecision::Redirect(next) => {
                    hops += 1;
                    if hops > MAX_REDIRECTS {
                        break Route::Landing;
                    }
                    target = next;
                }
            }
        };

        let mut state = self.state.lock();
        if state.view != View::Page(rendered) {
            state.history.push(rendered);
        }
        state.view = View::Page(rendered);
        state.pending = None;
        if rendered != Route::Results {
            state.results = None;
        }
        drop(state);

        if rendered == requested {
            NavigationOutcome::Rendered(rendered)
        } else {
            info!(requested = %requested, rendered = %rendered, "Redirected");
            NavigationOutcome::Redirected {
                requested,
                rendered,
            }
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("view", &self.current_view())
            .field("pending", &self.pending_route())
            .finish()
    }
}
