// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Login, registration and token verification

use std::sync::Arc;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use super::credentials::{CredentialRecord, CredentialStore, UserProfile};
use crate::config::{endpoints, ClientConfig};
use crate::error::{Error, Result};
use crate::http::{HttpClient, Request, Response};

/// Registration form as entered by the user
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegistrationForm {
    /// Check the form locally
    pub fn validate(&self) -> Result<()> {
        let fields = [
            &self.email,
            &self.password,
            &self.confirm_password,
            &self.first_name,
            &self.last_name,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(Error::validation("All fields are required"));
        }
        if self.password != self.confirm_password {
            return Err(Error::validation("Passwords do not match"));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct LoginPayload<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterPayload<'a> {
    email: &'a str,
    password: &'a str,
    user_fname: &'a str,
    user_lname: &'a str,
}

#[derive(Serialize)]
struct VerifyPayload<'a> {
    token: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<UserProfile>,
}

/// Client for the account endpoints
pub struct AuthClient {
    client: HttpClient,
    store: Arc<CredentialStore>,
    login_url: Url,
    register_url: Url,
    verify_url: Url,
}

impl AuthClient {
    /// Create a client writing credentials into `store`
    pub fn new(client: HttpClient, store: Arc<CredentialStore>, config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client,
            store,
            login_url: config.endpoint(endpoints::LOGIN)?,
            register_url: config.endpoint(endpoints::REGISTER)?,
            verify_url: config.endpoint(endpoints::VERIFY_TOKEN)?,
        })
    }

    /// Log in and store the returned credentials
    pub async fn login(&self, email: &str, password: &str) -> Result<CredentialRecord> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(Error::validation("Email and password are required"));
        }

        let request = Request::post(self.login_url.clone()).json(&LoginPayload { email, password })?;
        let response = self.client.execute(request).await?;
        if !response.is_success() {
            return Err(rejection(&response, "Login failed"));
        }

        let body: AuthResponse = response.json().unwrap_or_default();
        let token = body
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::auth(body.message.unwrap_or_else(|| "Login failed".into()), None))?;

        let record = CredentialRecord::new(token, body.user);
        self.store.set(&record);
        info!(email, "Login successful");
        Ok(record)
    }

    /// Create an account; returns the server's confirmation message
    pub async fn register(&self, form: &RegistrationForm) -> Result<String> {
        form.validate()?;

        let payload = RegisterPayload {
            email: &form.email,
            password: &form.password,
            user_fname: &form.first_name,
            user_lname: &form.last_name,
        };
        let request = Request::post(self.register_url.clone()).json(&payload)?;
        let response = self.client.execute(request).await?;
        if !response.is_success() {
            return Err(rejection(&response, "Registration failed"));
        }

        let body: AuthResponse = response.json().unwrap_or_default();
        info!(email = %form.email, "Registration successful");
        Ok(body
            .message
            .unwrap_or_else(|| "Registration successful".to_string()))
    }

    /// Register, then log in with the same credentials
    pub async fn register_and_login(&self, form: &RegistrationForm) -> Result<CredentialRecord> {
        self.register(form).await?;
        self.login(&form.email, &form.password).await
    }

    /// Ask the server whether the stored token is still accepted
    ///
    /// `Ok(None)` when no token is stored. A 401 clears the store.
    pub async fn verify_token(&self) -> Result<Option<UserProfile>> {
        let Some(token) = self.store.token() else {
            return Ok(None);
        };

        let request =
            Request::post(self.verify_url.clone()).json(&VerifyPayload { token: &token })?;
        let response = self.client.execute(request).await?;

        if response.status == StatusCode::UNAUTHORIZED {
            let reason = response
                .json_message(&["message", "error"])
                .unwrap_or_else(|| "Token expired or invalid".to_string());
            warn!(%reason, "Server rejected stored token");
            self.store.clear();
            return Err(Error::TokenInvalid(reason));
        }
        if !response.is_success() {
            return Err(rejection(&response, "Token verification failed"));
        }

        let body: AuthResponse = response.json().unwrap_or_default();
        Ok(Some(body.user.unwrap_or_default()))
    }

    /// Forget the stored credentials
    pub fn logout(&self) {
        self.store.clear();
        info!("Logged out");
    }

    /// Credential store used by this client
    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }
}

fn rejection(response: &Response, fallback: &str) -> Error {
    let reason = response
        .json_message(&["message", "error"])
        .unwrap_or_else(|| fallback.to_string());
    Error::auth(reason, Some(response.status_code()))
}
