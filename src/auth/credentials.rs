// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Credential store
//!
//! Holds the bearer token and user profile in the tab's storage area.
//! Every write or clear publishes exactly one event on the tab's
//! [`AuthEventBus`] once storage has been updated.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::events::{AuthEvent, AuthEventBus};
use crate::storage::{StorageArea, TabId};

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "token";

/// Storage key for the user profile JSON
pub const USER_KEY: &str = "user";

/// User profile returned by login
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account ID
    #[serde(default, alias = "user_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Given name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl UserProfile {
    /// Name for display, falling back to the email
    pub fn display_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.clone()),
            _ => self.email.clone(),
        }
    }
}

/// Stored credentials
///
/// Token presence alone decides whether the record is authenticated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CredentialRecord {
    /// Bearer token
    pub token: Option<String>,
    /// Profile blob
    pub user: Option<UserProfile>,
}

impl CredentialRecord {
    /// Record with a token and optional profile
    pub fn new(token: impl Into<String>, user: Option<UserProfile>) -> Self {
        Self {
            token: Some(token.into()),
            user,
        }
    }

    /// Whether a token is present
    pub fn has_token(&self) -> bool {
        self.token.as_deref().map_or(false, |t| !t.is_empty())
    }

    /// Authorization header value
    pub fn authorization_header(&self) -> Option<String> {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| format!("Bearer {}", t))
    }
}

/// Durable credential storage for one tab
pub struct CredentialStore {
    area: Arc<StorageArea>,
    tab: TabId,
    bus: Arc<AuthEventBus>,
}

impl CredentialStore {
    /// Store writing to `area` as `tab`, announcing changes on `bus`
    pub fn new(area: Arc<StorageArea>, tab: TabId, bus: Arc<AuthEventBus>) -> Self {
        Self { area, tab, bus }
    }

    /// Read the current record
    ///
    /// Storage failures read as "no credentials".
    pub fn get(&self) -> CredentialRecord {
        let token = match self.area.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Credential storage unavailable, treating as signed out");
                return CredentialRecord::default();
            }
        };

        let user = self
            .area
            .get_item(USER_KEY)
            .ok()
            .flatten()
            .and_then(|json| serde_json::from_str(&json).ok());

        CredentialRecord { token, user }
    }

    /// Current bearer token, if any
    pub fn token(&self) -> Option<String> {
        self.get().token
    }

    /// Replace the stored record
    pub fn set(&self, record: &CredentialRecord) {
        self.write(TOKEN_KEY, record.token.as_deref().filter(|t| !t.is_empty()));

        let user_json = record
            .user
            .as_ref()
            .and_then(|user| serde_json::to_string(user).ok());
        self.write(USER_KEY, user_json.as_deref());

        debug!(tab = %self.tab, has_token = record.has_token(), "Credentials stored");
        self.bus.publish(AuthEvent::same_tab());
    }

    /// Remove all credentials
    pub fn clear(&self) {
        self.write(TOKEN_KEY, None);
        self.write(USER_KEY, None);

        debug!(tab = %self.tab, "Credentials cleared");
        self.bus.publish(AuthEvent::same_tab());
    }

    /// Tab this store writes as
    pub fn tab(&self) -> TabId {
        self.tab
    }

    /// Bus this store announces on
    pub fn bus(&self) -> &Arc<AuthEventBus> {
        &self.bus
    }

    fn write(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => self.area.set_item(self.tab, key, value),
            None => self.area.remove_item(self.tab, key),
        };
        if let Err(e) = result {
            warn!(key, error = %e, "Credential storage write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::storage::StorageBackend;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store() -> CredentialStore {
        let area = Arc::new(StorageArea::in_memory());
        let tab = area.open_tab();
        CredentialStore::new(area, tab, AuthEventBus::new())
    }

    struct BrokenStorage;

    impl StorageBackend for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::storage("disabled"))
        }
        fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::storage("quota exceeded"))
        }
        fn remove_item(&self, _key: &str) -> Result<()> {
            Err(Error::storage("disabled"))
        }
    }

    #[test]
    fn test_set_and_get() {
        let store = store();
        let user = UserProfile {
            id: Some(1),
            email: Some("test@example.com".to_string()),
            first_name: Some("Test".to_string()),
            last_name: Some("User".to_string()),
        };
        store.set(&CredentialRecord::new("a.b.c", Some(user.clone())));

        let record = store.get();
        assert_eq!(record.token.as_deref(), Some("a.b.c"));
        assert_eq!(record.user, Some(user));
        assert_eq!(record.authorization_header().as_deref(), Some("Bearer a.b.c"));
    }

    #[test]
    fn test_each_mutation_publishes_once() {
        let store = store();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let _sub = store.bus().subscribe(Arc::new(move |_: &AuthEvent| {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        store.set(&CredentialRecord::new("a.b.c", None));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        store.clear();
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(store.get(), CredentialRecord::default());
    }

    #[test]
    fn test_handlers_see_post_mutation_state() {
        let store = Arc::new(store());
        let observed = Arc::new(parking_lot::Mutex::new(None));
        let sink = observed.clone();
        let reader = Arc::downgrade(&store);
        let _sub = store.bus().subscribe(Arc::new(move |_: &AuthEvent| {
            if let Some(store) = reader.upgrade() {
                *sink.lock() = store.token();
            }
        }));

        store.set(&CredentialRecord::new("x.y.z", None));
        assert_eq!(observed.lock().as_deref(), Some("x.y.z"));
    }

    #[test]
    fn test_corrupt_profile_reads_as_none() {
        let store = store();
        store.area.set_item(store.tab, TOKEN_KEY, "a.b.c").unwrap();
        store.area.set_item(store.tab, USER_KEY, "{not json").unwrap();

        let record = store.get();
        assert!(record.has_token());
        assert_eq!(record.user, None);
    }

    #[test]
    fn test_profile_accepts_user_id_alias() {
        let user: UserProfile =
            serde_json::from_str(r#"{"user_id": 7, "email": "a@b.c", "role": "x"}"#).unwrap();
        assert_eq!(user.id, Some(7));
        assert_eq!(user.display_name().as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_unavailable_storage_is_not_fatal() {
        let area = Arc::new(StorageArea::new(Arc::new(BrokenStorage)));
        let tab = area.open_tab();
        let store = CredentialStore::new(area, tab, AuthEventBus::new());

        store.set(&CredentialRecord::new("a.b.c", None));
        assert_eq!(store.get(), CredentialRecord::default());
        store.clear();
        assert_eq!(store.bus().published_count(), 2);
    }
}
