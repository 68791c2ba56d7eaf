// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Attack inputs, parameters and results

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Inline media-type declaration prepended to image payloads
pub const INLINE_PNG_PREFIX: &str = "data:image/png;base64,";

/// Classifier the attack runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelId {
    #[default]
    MobilenetV2,
    InceptionV3,
}

impl ModelId {
    /// Identifier sent to the service
    pub fn as_str(self) -> &'static str {
        match self {
            ModelId::MobilenetV2 => "mobilenet_v2",
            ModelId::InceptionV3 => "inception_v3",
        }
    }
}

impl FromStr for ModelId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mobilenet_v2" | "mobilenetv2" => Ok(ModelId::MobilenetV2),
            "inception_v3" | "inceptionv3" => Ok(ModelId::InceptionV3),
            other => Err(Error::validation(format!("Unknown model: {}", other))),
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tuning parameters for one attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackParameters {
    model: ModelId,
    epsilon: f64,
    auto_tune: bool,
}

impl Default for AttackParameters {
    fn default() -> Self {
        Self {
            model: ModelId::MobilenetV2,
            epsilon: 0.05,
            auto_tune: false,
        }
    }
}

impl AttackParameters {
    /// Default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model
    pub fn model(mut self, model: ModelId) -> Self {
        self.model = model;
        self
    }

    /// Set epsilon; checked at submission time
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Let the server pick epsilon
    pub fn auto_tune(mut self, auto_tune: bool) -> Self {
        self.auto_tune = auto_tune;
        self
    }

    pub fn model_id(&self) -> ModelId {
        self.model
    }

    pub fn is_auto_tune(&self) -> bool {
        self.auto_tune
    }

    /// Epsilon, if it lies in `[0, 1]`
    pub fn checked_epsilon(&self) -> Result<f64> {
        if self.epsilon.is_finite() && (0.0..=1.0).contains(&self.epsilon) {
            Ok(self.epsilon)
        } else {
            Err(Error::validation(format!(
                "Epsilon must be between 0 and 1, got {}",
                self.epsilon
            )))
        }
    }
}

/// Image chosen for upload
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Bytes,
}

impl ImageFile {
    /// Wrap in-memory bytes; the media type is guessed from the name
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let media_type = guess_media_type(&file_name).to_string();
        Self {
            file_name,
            media_type,
            bytes: bytes.into(),
        }
    }

    /// Read an image from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

fn guess_media_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// One of the two input modes
#[derive(Debug, Clone, PartialEq)]
pub enum AttackInput {
    File(ImageFile),
    Url(String),
}

/// Current input selection; choosing one mode clears the other
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackSelection {
    input: Option<AttackInput>,
}

impl AttackSelection {
    /// Nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection holding an uploaded file
    pub fn file(file: ImageFile) -> Self {
        Self {
            input: Some(AttackInput::File(file)),
        }
    }

    /// Selection holding a remote image URL
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            input: Some(AttackInput::Url(url.into())),
        }
    }

    /// Choose a file, replacing any URL
    pub fn select_file(&mut self, file: ImageFile) {
        self.input = Some(AttackInput::File(file));
    }

    /// Choose a URL, replacing any file
    pub fn select_url(&mut self, url: impl Into<String>) {
        self.input = Some(AttackInput::Url(url.into()));
    }

    pub fn clear(&mut self) {
        self.input = None;
    }

    pub fn input(&self) -> Option<&AttackInput> {
        self.input.as_ref()
    }
}

/// Normalized attack result handed to the results view
///
/// Image fields are always inline-renderable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackResult {
    pub epsilon_used: f64,
    pub orig_class: String,
    pub orig_conf: f64,
    pub adv_class: String,
    pub adv_conf: f64,
    pub original_image: String,
    pub perturbation_image: String,
    pub adversarial_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
}

impl AttackResult {
    /// Decode an inline image field back into raw bytes
    pub fn decode_image(inline: &str) -> Result<Vec<u8>> {
        let encoded = inline
            .split_once(";base64,")
            .map(|(_, data)| data)
            .unwrap_or(inline);
        STANDARD
            .decode(encoded.trim())
            .map_err(|e| Error::InvalidResponse(format!("image is not base64: {}", e)))
    }
}

/// Attack response as sent by the service
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawAttackResponse {
    pub epsilon_used: Option<f64>,
    pub orig_class: Option<String>,
    pub orig_conf: Option<f64>,
    pub adv_class: Option<String>,
    pub adv_conf: Option<f64>,
    pub original_image: Option<String>,
    pub perturbation_image: Option<String>,
    pub adversarial_image: Option<String>,
    pub model_used: Option<String>,
    pub error: Option<String>,
    pub warning: Option<String>,
}

impl RawAttackResponse {
    /// Compose the normalized result; fails if a required field is missing
    pub(crate) fn into_result(self) -> Result<AttackResult> {
        fn required<T>(value: Option<T>, field: &str) -> Result<T> {
            value.ok_or_else(|| Error::InvalidResponse(format!("missing field `{}`", field)))
        }

        Ok(AttackResult {
            epsilon_used: required(self.epsilon_used, "epsilon_used")?,
            orig_class: required(self.orig_class, "orig_class")?,
            orig_conf: required(self.orig_conf, "orig_conf")?,
            adv_class: required(self.adv_class, "adv_class")?,
            adv_conf: required(self.adv_conf, "adv_conf")?,
            original_image: inline_png(&required(self.original_image, "original_image")?),
            perturbation_image: inline_png(&required(
                self.perturbation_image,
                "perturbation_image",
            )?),
            adversarial_image: inline_png(&required(self.adversarial_image, "adversarial_image")?),
            model_used: self.model_used,
        })
    }
}

/// Successful submission
#[derive(Debug, Clone, PartialEq)]
pub struct AttackOutcome {
    pub result: AttackResult,
    /// Non-blocking notice from the service
    pub warning: Option<String>,
}

/// Re-encode a bare image payload into inline-renderable form
pub fn inline_png(encoded: &str) -> String {
    if encoded.starts_with("data:") {
        encoded.to_string()
    } else {
        format!("{}{}", INLINE_PNG_PREFIX, encoded)
    }
}
