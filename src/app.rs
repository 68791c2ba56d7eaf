// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client facade
//!
//! A [`ClientApp`] is one tab: its own bus, credential store, session
//! monitor and router, over a storage area that sibling tabs share.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::attack::{
    AttackOrchestrator, AttackOutcome, AttackParameters, AttackSelection, CatalogImage,
    ImageCatalog,
};
use crate::auth::{
    bridge_storage_events, AuthClient, AuthEventBus, CredentialRecord, CredentialStore,
    RegistrationForm, SessionMonitor, SessionPhase, StorageBridge,
};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig};
use crate::routing::{NavigationOutcome, Route, Router};
use crate::storage::{FileStorage, StorageArea, TabId};

/// One client tab
pub struct ClientApp {
    config: ClientConfig,
    area: Arc<StorageArea>,
    tab: TabId,
    bus: Arc<AuthEventBus>,
    store: Arc<CredentialStore>,
    monitor: Arc<SessionMonitor>,
    router: Arc<Router>,
    auth: AuthClient,
    attacks: AttackOrchestrator,
    catalog: ImageCatalog,
    _bridge: StorageBridge,
    background: Vec<JoinHandle<()>>,
}

impl ClientApp {
    /// Open the first tab, using file storage when a path is configured
    pub fn new(config: ClientConfig) -> Result<Self> {
        let area = match &config.storage_path {
            Some(path) => Arc::new(StorageArea::new(Arc::new(FileStorage::new(path.clone())))),
            None => Arc::new(StorageArea::in_memory()),
        };
        Self::with_area(config, area)
    }

    /// Open a tab on an existing storage area
    pub fn with_area(config: ClientConfig, area: Arc<StorageArea>) -> Result<Self> {
        let http = HttpClient::with_config(HttpClientConfig::from(&config))?;

        let tab = area.open_tab();
        let bus = AuthEventBus::new();
        let store = Arc::new(CredentialStore::new(area.clone(), tab, bus.clone()));

        // Monitor subscribes before the router so it re-evaluates first
        let monitor = SessionMonitor::new(store.clone(), bus.clone());
        monitor.mount();
        let router = Router::new(monitor.clone(), &bus);
        let bridge = bridge_storage_events(&area, tab, &bus);

        let auth = AuthClient::new(http.clone(), store.clone(), &config)?;
        let attacks = AttackOrchestrator::new(http.clone(), store.clone(), &config)?;
        let catalog = ImageCatalog::new(http, &config)?;

        debug!(%tab, phase = ?monitor.phase(), "Tab opened");

        Ok(Self {
            config,
            area,
            tab,
            bus,
            store,
            monitor,
            router,
            auth,
            attacks,
            catalog,
            _bridge: bridge,
            background: Vec::new(),
        })
    }

    /// Open a sibling tab sharing this tab's storage
    pub fn open_tab(&self) -> Result<Self> {
        Self::with_area(self.config.clone(), self.area.clone())
    }

    /// Start the periodic re-check and the router's phase follower
    ///
    /// Does nothing outside a tokio runtime or when already started.
    pub fn start_background(&mut self) {
        if !self.background.is_empty() || tokio::runtime::Handle::try_current().is_err() {
            return;
        }
        self.background
            .push(self.monitor.spawn_recheck(self.config.recheck_interval));
        self.background.push(self.router.spawn_follow());
    }

    /// Log in and move past the guest pages
    pub async fn login(&self, email: &str, password: &str) -> Result<CredentialRecord> {
        let record = self.auth.login(email, password).await?;
        if self.router.current_route().map_or(true, |r| !r.is_protected()) {
            self.router.navigate(Route::HOME);
        }
        Ok(record)
    }

    /// Register, then log in
    pub async fn register(&self, form: &RegistrationForm) -> Result<CredentialRecord> {
        self.auth.register(form).await?;
        self.login(&form.email, &form.password).await
    }

    /// Clear credentials and go to the login page
    pub fn logout(&self) -> NavigationOutcome {
        self.auth.logout();
        info!(tab = %self.tab, "Session ended");
        self.router.navigate(Route::LOGIN)
    }

    /// Submit an attack; on success the router shows the results
    pub async fn attack(
        &self,
        selection: &AttackSelection,
        params: &AttackParameters,
    ) -> Result<AttackOutcome> {
        self.attacks
            .submit_and_present(selection, params, &self.router)
            .await
            .map(|(outcome, _)| outcome)
    }

    /// Sample images for URL mode
    pub async fn available_images(&self) -> Result<Vec<CatalogImage>> {
        self.catalog.fetch().await
    }

    /// Navigate by path
    pub fn navigate(&self, path: &str) -> Result<NavigationOutcome> {
        Ok(self.router.navigate(path.parse()?))
    }

    pub fn phase(&self) -> SessionPhase {
        self.monitor.phase()
    }

    pub fn credentials(&self) -> CredentialRecord {
        self.store.get()
    }

    pub fn tab(&self) -> TabId {
        self.tab
    }

    pub fn bus(&self) -> &Arc<AuthEventBus> {
        &self.bus
    }

    pub fn monitor(&self) -> &Arc<SessionMonitor> {
        &self.monitor
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    pub fn attacks(&self) -> &AttackOrchestrator {
        &self.attacks
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Drop for ClientApp {
    fn drop(&mut self) {
        for handle in self.background.drain(..) {
            handle.abort();
        }
        self.monitor.unmount();
    }
}

impl std::fmt::Debug for ClientApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientApp")
            .field("tab", &self.tab)
            .field("phase", &self.phase())
            .field("view", &self.router.current_view())
            .finish()
    }
}
