// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session and authentication state
//!
//! - [`CredentialStore`] keeps the bearer token and profile in durable storage
//! - [`AuthEventBus`] carries "credentials changed" notifications from both
//!   same-tab writes and other tabs' storage events
//! - [`SessionMonitor`] derives the authenticated phase from the store
//! - [`AuthClient`] runs the login / registration / verification calls

mod client;
mod credentials;
mod events;
mod monitor;
pub mod token;

pub use client::{AuthClient, RegistrationForm};
pub use credentials::{CredentialRecord, CredentialStore, UserProfile, TOKEN_KEY, USER_KEY};
pub use events::{
    bridge_storage_events, AuthEvent, AuthEventBus, AuthEventSource, AuthHandler, StorageBridge,
    Subscription,
};
pub use monitor::{SessionMonitor, SessionPhase, SessionState};
pub use token::{inspect_token, TokenStatus};
