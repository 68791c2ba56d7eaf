// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Auth event bus
//!
//! One publish/subscribe channel per tab. Same-tab credential writes and
//! storage events from other tabs both land here, so observers are written
//! once against a single handler signature.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::debug;

use super::credentials::{TOKEN_KEY, USER_KEY};
use crate::storage::{ListenerId, StorageArea, StorageEvent, TabId};

/// Where a credentials change came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEventSource {
    /// Credential store write in this tab
    SameTab,
    /// Storage change made by another tab
    CrossTab { key: String },
}

/// "Credentials changed" notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    /// Origin of the change
    pub source: AuthEventSource,
}

impl AuthEvent {
    /// Event for a same-tab write
    pub fn same_tab() -> Self {
        Self {
            source: AuthEventSource::SameTab,
        }
    }

    /// Event forwarded from another tab
    pub fn cross_tab(key: impl Into<String>) -> Self {
        Self {
            source: AuthEventSource::CrossTab { key: key.into() },
        }
    }
}

/// Auth event handler
pub type AuthHandler = Arc<dyn Fn(&AuthEvent) + Send + Sync>;

/// Publish/subscribe channel for credential changes
pub struct AuthEventBus {
    handlers: RwLock<Vec<(u64, AuthHandler)>>,
    next_id: AtomicU64,
    published: AtomicU64,
}

impl AuthEventBus {
    /// Create a new bus
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            published: AtomicU64::new(0),
        })
    }

    /// Register a handler; it stays registered while the returned
    /// [`Subscription`] is alive
    pub fn subscribe(self: &Arc<Self>, handler: AuthHandler) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers.write().push((id, handler));
        Subscription {
            id,
            bus: Arc::downgrade(self),
            active: true,
        }
    }

    /// Deliver an event to every handler, in subscription order
    ///
    /// Handlers run synchronously on the caller, after the mutation that
    /// triggered the event has completed.
    pub fn publish(&self, event: AuthEvent) {
        self.published.fetch_add(1, Ordering::Relaxed);

        // Snapshot: handlers may subscribe or publish re-entrantly
        let handlers: Vec<AuthHandler> = self
            .handlers
            .read()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        debug!(source = ?event.source, handlers = handlers.len(), "Auth event");

        for handler in handlers {
            handler(&event);
        }
    }

    /// Number of live handlers
    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Total events published so far
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    fn unsubscribe(&self, id: u64) {
        self.handlers.write().retain(|(hid, _)| *hid != id);
    }
}

impl fmt::Debug for AuthEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthEventBus")
            .field("handlers", &self.handler_count())
            .field("published", &self.published_count())
            .finish()
    }
}

/// Handle to a registered handler; unsubscribes on drop
#[must_use = "dropping a Subscription unsubscribes the handler"]
pub struct Subscription {
    id: u64,
    bus: Weak<AuthEventBus>,
    active: bool,
}

impl Subscription {
    /// Unsubscribe now
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Keep the handler registered for the lifetime of the bus
    pub fn detach(mut self) {
        self.active = false;
    }

    fn release(&mut self) {
        if self.active {
            self.active = false;
            if let Some(bus) = self.bus.upgrade() {
                bus.unsubscribe(self.id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}

/// Forwards storage events from other tabs into a bus; detaches on drop
pub struct StorageBridge {
    area: Weak<StorageArea>,
    listener: ListenerId,
}

impl Drop for StorageBridge {
    fn drop(&mut self) {
        if let Some(area) = self.area.upgrade() {
            area.remove_listener(self.listener);
        }
    }
}

/// Route other tabs' credential-key storage events into `bus`
pub fn bridge_storage_events(
    area: &Arc<StorageArea>,
    tab: TabId,
    bus: &Arc<AuthEventBus>,
) -> StorageBridge {
    let target = Arc::downgrade(bus);
    let listener = area.add_listener(
        tab,
        Arc::new(move |event: &StorageEvent| {
            if event.key != TOKEN_KEY && event.key != USER_KEY {
                return;
            }
            if let Some(bus) = target.upgrade() {
                bus.publish(AuthEvent::cross_tab(event.key.clone()));
            }
        }),
    );

    StorageBridge {
        area: Arc::downgrade(area),
        listener,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn counter() -> (Arc<AtomicU64>, AuthHandler) {
        let count = Arc::new(AtomicU64::new(0));
        let c = count.clone();
        let handler: AuthHandler = Arc::new(move |_: &AuthEvent| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (count, handler)
    }

    #[test]
    fn test_publish_reaches_subscribers() {
        let bus = AuthEventBus::new();
        let (count, handler) = counter();
        let _sub = bus.subscribe(handler);

        bus.publish(AuthEvent::same_tab());
        bus.publish(AuthEvent::cross_tab("token"));

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(bus.published_count(), 2);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let bus = AuthEventBus::new();
        let (count, handler) = counter();
        let sub = bus.subscribe(handler);
        drop(sub);

        bus.publish(AuthEvent::same_tab());
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(bus.handler_count(), 0);
    }

    #[test]
    fn test_detach_keeps_handler() {
        let bus = AuthEventBus::new();
        let (count, handler) = counter();
        bus.subscribe(handler).detach();

        bus.publish(AuthEvent::same_tab());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let bus = AuthEventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = order.clone();
        let _a = bus.subscribe(Arc::new(move |_: &AuthEvent| first.lock().push("first")));
        let second = order.clone();
        let _b = bus.subscribe(Arc::new(move |_: &AuthEvent| second.lock().push("second")));

        bus.publish(AuthEvent::same_tab());
        assert_eq!(*order.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_reentrant_publish() {
        let bus = AuthEventBus::new();
        let (count, handler) = counter();
        let _counter = bus.subscribe(handler);

        let weak = Arc::downgrade(&bus);
        let fired = Arc::new(AtomicU64::new(0));
        let f = fired.clone();
        let _chain = bus.subscribe(Arc::new(move |event: &AuthEvent| {
            if event.source == AuthEventSource::SameTab && f.fetch_add(1, Ordering::SeqCst) == 0 {
                if let Some(bus) = weak.upgrade() {
                    bus.publish(AuthEvent::cross_tab("token"));
                }
            }
        }));

        bus.publish(AuthEvent::same_tab());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_storage_bridge_filters_keys() {
        let area = Arc::new(StorageArea::in_memory());
        let writer = area.open_tab();
        let reader = area.open_tab();

        let bus = AuthEventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = bus.subscribe(Arc::new(move |e: &AuthEvent| sink.lock().push(e.clone())));
        let bridge = bridge_storage_events(&area, reader, &bus);

        area.set_item(writer, "theme", "dark").unwrap();
        area.set_item(writer, TOKEN_KEY, "a.b.c").unwrap();

        assert_eq!(*seen.lock(), vec![AuthEvent::cross_tab(TOKEN_KEY)]);

        drop(bridge);
        assert_eq!(area.listener_count(), 0);
    }
}
