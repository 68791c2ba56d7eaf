// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Attack request orchestrator
//!
//! Builds one request from the input selection and tuning parameters,
//! dispatches it, and turns the service's reply into either a normalized
//! [`AttackResult`] or an error from the client taxonomy. At most one
//! submission runs per orchestrator; the loading flag is released on every
//! exit path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use super::types::{
    AttackInput, AttackOutcome, AttackParameters, AttackSelection, ImageFile, RawAttackResponse,
};
use crate::auth::CredentialStore;
use crate::config::{endpoints, ClientConfig};
use crate::error::{Error, Result, GENERIC_SERVER_ERROR};
use crate::http::{HttpClient, MultipartForm, Request, Response};
use crate::routing::{NavigationOutcome, Route, Router};

/// JSON body for URL-mode submissions
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UrlAttackPayload<'a> {
    image_url: &'a str,
    model: &'a str,
    epsilon: f64,
    auto_tune: bool,
}

/// Clears the loading flag when dropped
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| Error::SubmissionInFlight)?;
        Ok(Self(flag))
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Submits attacks to the service
pub struct AttackOrchestrator {
    client: HttpClient,
    store: Arc<CredentialStore>,
    attack_url: Url,
    attack_from_url_url: Url,
    loading: AtomicBool,
}

impl AttackOrchestrator {
    /// Create an orchestrator reading the bearer token from `store`
    pub fn new(client: HttpClient, store: Arc<CredentialStore>, config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client,
            store,
            attack_url: config.endpoint(endpoints::ATTACK)?,
            attack_from_url_url: config.endpoint(endpoints::ATTACK_FROM_URL)?,
            loading: AtomicBool::new(false),
        })
    }

    /// Whether a submission is in flight
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Build the request for a submission without sending it
    ///
    /// Fails with a validation error when nothing is selected or the
    /// parameters are out of range.
    pub fn build_request(
        &self,
        selection: &AttackSelection,
        params: &AttackParameters,
    ) -> Result<Request> {
        let input = selection
            .input()
            .ok_or_else(|| Error::validation("Please select an image or enter an image URL"))?;

        let request = match input {
            AttackInput::File(file) => {
                // Epsilon is only sent, and so only checked, without auto-tune
                let epsilon = if params.is_auto_tune() {
                    None
                } else {
                    Some(params.checked_epsilon()?)
                };
                Request::post(self.attack_url.clone()).multipart(file_form(file, params, epsilon))
            }
            AttackInput::Url(url) => {
                let url = url.trim();
                if url.is_empty() {
                    return Err(Error::validation("Please select an image or enter an image URL"));
                }
                // Epsilon always travels in URL mode, even with auto-tune on
                Request::post(self.attack_from_url_url.clone()).json(&UrlAttackPayload {
                    image_url: url,
                    model: params.model_id().as_str(),
                    epsilon: params.checked_epsilon()?,
                    auto_tune: params.is_auto_tune(),
                })?
            }
        };

        Ok(match self.store.get().token.filter(|t| !t.is_empty()) {
            Some(token) => request.bearer_auth(&token),
            None => request,
        })
    }

    /// Submit an attack and normalize the reply
    pub async fn submit(
        &self,
        selection: &AttackSelection,
        params: &AttackParameters,
    ) -> Result<AttackOutcome> {
        let _loading = LoadingGuard::acquire(&self.loading)?;

        let request = self.build_request(selection, params)?;
        let url = request.url.to_string();
        let start = Instant::now();
        debug!(%url, model = %params.model_id(), auto_tune = params.is_auto_tune(), "Submitting attack");

        let response = self.client.execute(request).await?;
        let outcome = interpret(&response)?;

        info!(
            %url,
            epsilon_used = outcome.result.epsilon_used,
            orig_class = %outcome.result.orig_class,
            adv_class = %outcome.result.adv_class,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Attack completed"
        );
        Ok(outcome)
    }

    /// Submit and, on success, move `router` to the results view
    ///
    /// On failure the router is left where it was.
    pub async fn submit_and_present(
        &self,
        selection: &AttackSelection,
        params: &AttackParameters,
        router: &Router,
    ) -> Result<(AttackOutcome, NavigationOutcome)> {
        let outcome = self.submit(selection, params).await?;
        let navigation = router.navigate_with_results(Route::Results, outcome.result.clone());
        Ok((outcome, navigation))
    }
}

fn file_form(file: &ImageFile, params: &AttackParameters, epsilon: Option<f64>) -> MultipartForm {
    let form = MultipartForm::new()
        .file(
            "image",
            file.file_name.clone(),
            file.media_type.clone(),
            file.bytes.clone(),
        )
        .text("autoTune", params.is_auto_tune().to_string())
        .text("model", params.model_id().as_str());

    match epsilon {
        Some(epsilon) => form.text("epsilon", epsilon.to_string()),
        None => form,
    }
}

/// Classify a response into an outcome or an error
fn interpret(response: &Response) -> Result<AttackOutcome> {
    if !response.is_success() {
        let message = response
            .json_message(&["error", "message"])
            .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string());
        warn!(status = response.status_code(), %message, "Attack request failed");
        return Err(Error::error_response(response.status_code(), message));
    }

    let raw: RawAttackResponse = response.json().map_err(|e| {
        let content_type = response.content_type().unwrap_or("unknown");
        warn!(content_type, error = %e, "Attack response is not a result");
        Error::InvalidResponse(format!("{} (content type {})", e, content_type))
    })?;

    if let Some(message) = raw.error.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        warn!(%message, "Service reported an error");
        return Err(Error::server_reported(message));
    }

    let warning = raw.warning.clone().filter(|w| !w.trim().is_empty());
    if let Some(warning) = &warning {
        warn!(%warning, "Service returned a warning");
    }

    Ok(AttackOutcome {
        result: raw.into_result()?,
        warning,
    })
}
