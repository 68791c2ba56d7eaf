// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response types

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};

/// HTTP response representation
#[derive(Debug, Clone)]
pub struct Response {
    /// Response status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
    /// Final URL
    pub url: Url,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

impl Response {
    /// Create a new response
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
        url: Url,
        response_time_ms: u64,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            url,
            response_time_ms,
        }
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Parse body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Error::from)
    }

    /// First non-empty string among the given top-level JSON fields
    pub fn json_message(&self, fields: &[&str]) -> Option<String> {
        let value: serde_json::Value = serde_json::from_slice(&self.body).ok()?;
        fields
            .iter()
            .filter_map(|f| value.get(*f).and_then(|v| v.as_str()))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(String::from)
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: StatusCode, body: &'static str) -> Response {
        Response::new(
            status,
            HeaderMap::new(),
            Bytes::from(body),
            Url::parse("http://localhost:5000/attack").unwrap(),
            12,
        )
    }

    #[test]
    fn test_response_status() {
        let resp = response(StatusCode::OK, "{}");
        assert!(resp.is_success());
        assert_eq!(resp.status_code(), 200);
    }

    #[test]
    fn test_json_message_prefers_first_field() {
        let resp = response(
            StatusCode::BAD_REQUEST,
            r#"{"error": "No image provided", "message": "ignored"}"#,
        );
        assert_eq!(
            resp.json_message(&["error", "message"]),
            Some("No image provided".to_string())
        );
    }

    #[test]
    fn test_json_message_skips_empty_and_non_json() {
        let resp = response(StatusCode::BAD_REQUEST, r#"{"error": "", "message": "Bad input"}"#);
        assert_eq!(resp.json_message(&["error", "message"]), Some("Bad input".to_string()));

        let html = response(StatusCode::BAD_GATEWAY, "<html>502</html>");
        assert_eq!(html.json_message(&["error", "message"]), None);
    }

    #[test]
    fn test_content_type_header() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "text/html; charset=utf-8".parse().unwrap());
        let resp = Response::new(
            StatusCode::OK,
            headers,
            Bytes::from("<html></html>"),
            Url::parse("http://localhost:5000/attack").unwrap(),
            3,
        );
        assert_eq!(resp.content_type(), Some("text/html; charset=utf-8"));
        assert_eq!(resp.header("Content-Type"), resp.content_type());

        assert_eq!(response(StatusCode::OK, "{}").content_type(), None);
    }
}
