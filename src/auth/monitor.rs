// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session monitor
//!
//! Derives the session phase from the credential store. Phase changes are
//! published on a watch channel; re-evaluating with nothing changed sends
//! nothing. Evaluation is driven by the auth event bus, with a coarse
//! periodic re-check as a safety net for changes that produce no event
//! (another process editing the credentials file, a token expiring).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::credentials::CredentialStore;
use super::events::{AuthEvent, AuthEventBus, Subscription};
use super::token::inspect_token;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Not yet evaluated; no routing decision may be made
    Initializing,
    /// No usable token
    Unauthenticated,
    /// Valid token present
    Authenticated,
}

/// Flags derived from the phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub authenticated: bool,
    pub loading: bool,
    pub checked: bool,
}

impl From<SessionPhase> for SessionState {
    fn from(phase: SessionPhase) -> Self {
        Self {
            authenticated: phase == SessionPhase::Authenticated,
            loading: phase == SessionPhase::Initializing,
            checked: phase != SessionPhase::Initializing,
        }
    }
}

/// Observes the credential store and tracks the session phase
pub struct SessionMonitor {
    store: Arc<CredentialStore>,
    bus: Arc<AuthEventBus>,
    phase: watch::Sender<SessionPhase>,
    mounted: AtomicBool,
    subscription: Mutex<Option<Subscription>>,
    transitions: AtomicU64,
}

impl SessionMonitor {
    /// Create an unmounted monitor in the `Initializing` phase
    pub fn new(store: Arc<CredentialStore>, bus: Arc<AuthEventBus>) -> Arc<Self> {
        let (phase, _) = watch::channel(SessionPhase::Initializing);
        Arc::new(Self {
            store,
            bus,
            phase,
            mounted: AtomicBool::new(false),
            subscription: Mutex::new(None),
            transitions: AtomicU64::new(0),
        })
    }

    /// Start observing the bus and run the first evaluation
    ///
    /// Mounting twice only re-evaluates.
    pub fn mount(self: &Arc<Self>) -> SessionPhase {
        if !self.mounted.swap(true, Ordering::SeqCst) {
            let monitor: Weak<Self> = Arc::downgrade(self);
            let subscription = self.bus.subscribe(Arc::new(move |_: &AuthEvent| {
                if let Some(monitor) = monitor.upgrade() {
                    monitor.evaluate();
                }
            }));
            *self.subscription.lock() = Some(subscription);
        }
        self.evaluate()
    }

    /// Stop observing the bus; the phase stays where it is
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        self.subscription.lock().take();
    }

    /// Whether the monitor is mounted
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Re-derive the phase from the credential store
    ///
    /// Malformed or expired tokens are cleared from the store. Before
    /// mounting this does nothing and reports `Initializing`.
    pub fn evaluate(&self) -> SessionPhase {
        if !self.is_mounted() {
            return self.phase();
        }

        let authenticated = match self.store.token() {
            None => false,
            Some(token) => {
                let status = inspect_token(&token);
                match status.invalid_reason() {
                    None => true,
                    Some(reason) => {
                        warn!(%reason, "Discarding invalid token");
                        self.store.clear();
                        false
                    }
                }
            }
        };

        let next = if authenticated {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        };

        let changed = self.phase.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });

        if changed {
            self.transitions.fetch_add(1, Ordering::SeqCst);
            info!(phase = ?next, "Session phase changed");
        }

        next
    }

    /// Last derived phase, without re-reading the store
    pub fn phase(&self) -> SessionPhase {
        *self.phase.borrow()
    }

    /// Flags for the last derived phase
    pub fn state(&self) -> SessionState {
        self.phase().into()
    }

    /// Receiver notified on every phase change
    pub fn watch(&self) -> watch::Receiver<SessionPhase> {
        self.phase.subscribe()
    }

    /// Number of phase changes so far
    pub fn transition_count(&self) -> u64 {
        self.transitions.load(Ordering::SeqCst)
    }

    /// Start the periodic safety-net re-check on the current runtime
    ///
    /// The task holds only a weak reference and ends once the monitor is
    /// dropped.
    pub fn spawn_recheck(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let monitor = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(live) = monitor.upgrade() else {
                    break;
                };
                live.evaluate();
            }
        })
    }
}

impl std::fmt::Debug for SessionMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionMonitor")
            .field("phase", &self.phase())
            .field("mounted", &self.is_mounted())
            .finish()
    }
}
