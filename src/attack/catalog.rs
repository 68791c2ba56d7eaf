// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Sample images offered by the service for URL-mode attacks

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::{endpoints, ClientConfig};
use crate::error::{Error, Result};
use crate::http::{HttpClient, Request};

/// One image the service can attack by URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogImage {
    pub filename: String,
    #[serde(default)]
    pub label: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    images: Vec<CatalogImage>,
}

/// Reads `/available-images`
pub struct ImageCatalog {
    client: HttpClient,
    url: Url,
}

impl ImageCatalog {
    pub fn new(client: HttpClient, config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client,
            url: config.endpoint(endpoints::AVAILABLE_IMAGES)?,
        })
    }

    /// Fetch the list of available images
    pub async fn fetch(&self) -> Result<Vec<CatalogImage>> {
        let response = self.client.execute(Request::get(self.url.clone())).await?;
        if !response.is_success() {
            return Err(Error::error_response(
                response.status_code(),
                response
                    .json_message(&["error", "message"])
                    .unwrap_or_default(),
            ));
        }

        let body: CatalogResponse = response
            .json()
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;
        if !body.success {
            return Err(Error::server_reported("Failed to load images"));
        }

        debug!(count = body.images.len(), "Loaded image catalog");
        Ok(body.images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_response_shape() {
        let body: CatalogResponse = serde_json::from_str(
            r#"{"success": true, "images": [
                {"filename": "cat.jpg", "label": "cat", "url": "http://localhost:5000/static/cat.jpg"}
            ]}"#,
        )
        .unwrap();
        assert!(body.success);
        assert_eq!(body.images[0].label, "cat");
    }

    #[test]
    fn test_missing_success_reads_as_failure() {
        let body: CatalogResponse = serde_json::from_str(r#"{"images": []}"#).unwrap();
        assert!(!body.success);
    }
}
