// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP request types

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use super::headers;
use crate::error::Result;

/// HTTP request representation
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<RequestBody>,
    /// Per-request timeout override
    pub timeout: Option<Duration>,
}

/// Request body, kept as data until dispatch
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Raw bytes (JSON bodies are serialized into this)
    Bytes(Bytes),
    /// multipart/form-data
    Multipart(MultipartForm),
}

/// multipart/form-data body
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    /// Parts in insertion order
    pub parts: Vec<FormPart>,
}

/// A single multipart part
#[derive(Debug, Clone)]
pub struct FormPart {
    /// Field name
    pub name: String,
    /// Field value
    pub value: PartValue,
}

/// Multipart part value
#[derive(Debug, Clone)]
pub enum PartValue {
    /// Plain text field
    Text(String),
    /// Binary file field
    File {
        file_name: String,
        media_type: String,
        bytes: Bytes,
    },
}

impl MultipartForm {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: PartValue::Text(value.into()),
        });
        self
    }

    /// Append a file field
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: PartValue::File {
                file_name: file_name.into(),
                media_type: media_type.into(),
                bytes: bytes.into(),
            },
        });
        self
    }

    /// Look up a part by field name
    pub fn get(&self, name: &str) -> Option<&PartValue> {
        self.parts.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    /// Text value of a field, if it is a text part
    pub fn text_value(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(PartValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// Whether the form has a field with this name
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl Request {
    /// Create a new request with arbitrary method
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Create a new GET request
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Create a new POST request
    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    /// Set a header
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Attach a bearer token
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header(headers::AUTHORIZATION, format!("Bearer {}", token))
    }

    /// Set JSON body
    pub fn json<T: Serialize>(mut self, data: &T) -> Result<Self> {
        let json = serde_json::to_vec(data)?;
        self.body = Some(RequestBody::Bytes(Bytes::from(json)));
        Ok(self.header(headers::CONTENT_TYPE, "application/json"))
    }

    /// Set multipart body (boundary header is added at dispatch)
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Get a header value
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Multipart body, if any
    pub fn multipart_body(&self) -> Option<&MultipartForm> {
        match &self.body {
            Some(RequestBody::Multipart(form)) => Some(form),
            _ => None,
        }
    }

    /// Decode a byte body as JSON
    pub fn json_body(&self) -> Option<serde_json::Value> {
        match &self.body {
            Some(RequestBody::Bytes(bytes)) => serde_json::from_slice(bytes).ok(),
            _ => None,
        }
    }
}
