// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client layer
//!
//! Thin wrapper over reqwest that keeps requests inspectable before
//! dispatch (JSON and multipart bodies are plain data until sent) and
//! returns every completed exchange as a [`Response`], whatever its status.

mod client;
mod request;
mod response;

pub use client::{HttpClient, HttpClientConfig};
pub use request::{FormPart, MultipartForm, PartValue, Request, RequestBody};
pub use response::Response;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("fgsm-client/", env!("CARGO_PKG_VERSION"));

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const USER_AGENT: &str = "user-agent";
    pub const AUTHORIZATION: &str = "authorization";
}
