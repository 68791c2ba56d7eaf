// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # fgsm-client - Session-aware client for an FGSM attack service
//!
//! Client side of a remote adversarial-attack service. The service runs the
//! attack; this crate keeps login state consistent across tabs and submits
//! attack jobs.
//!
//! ## Features
//!
//! - Credential store over shared durable storage, with change events
//! - Auth event bus fed by same-tab writes and other tabs' storage events
//! - Session monitor with token shape/expiry checks and a safety-net re-check
//! - Route guard and per-tab router with a "checking" placeholder
//! - Attack orchestrator: file upload or remote URL, auto-tune, error taxonomy
//! - Inline re-encoding of returned images
//!
//! ## Example
//!
//! ```rust,no_run
//! use fgsm_client::{AttackParameters, AttackSelection, ClientApp, ClientConfig, ImageFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = ClientApp::new(ClientConfig::from_env()?)?;
//!     app.login("user@example.com", "secret").await?;
//!
//!     let image = ImageFile::from_path("cat.png").await?;
//!     let outcome = app
//!         .attack(&AttackSelection::file(image), &AttackParameters::default())
//!         .await?;
//!
//!     println!("{} -> {}", outcome.result.orig_class, outcome.result.adv_class);
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod attack;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod routing;
pub mod storage;

// Re-exports for convenience

// Facade
pub use app::ClientApp;

// Attack
pub use attack::{
    AttackInput, AttackOrchestrator, AttackOutcome, AttackParameters, AttackResult,
    AttackSelection, CatalogImage, ImageCatalog, ImageFile, ModelId,
};

// Session
pub use auth::{
    AuthClient, AuthEvent, AuthEventBus, CredentialRecord, CredentialStore, RegistrationForm,
    SessionMonitor, SessionPhase, SessionState, Subscription, TokenStatus, UserProfile,
};

// Routing
pub use routing::{can_enter, GuardDecision, NavigationOutcome, Route, Router, View};

// Config and errors
pub use config::ClientConfig;
pub use error::{Error, ErrorContext, Result};

// HTTP
pub use http::{HttpClient, Request, Response};

// Storage
pub use storage::{FileStorage, MemoryStorage, StorageArea, StorageBackend, TabId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
