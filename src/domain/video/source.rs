// SPDX-License-Identifier: MPL-2.0
//! Media source description and quality tracks.
//!
//! Source URLs and DRM material are opaque to the controller; they are handed
//! to the engine unchanged.

use serde::{Deserialize, Serialize};

/// DRM configuration forwarded to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrmConfig {
    /// License server URL (Widevine).
    pub license_url: Option<String>,
    /// Bearer token sent with license requests.
    pub auth_token: Option<String>,
    /// Client id header sent with license requests.
    pub client_id: Option<String>,
    /// Clear-key pair as `(kid, key)` hex strings.
    pub clear_key: Option<(String, String)>,
}

impl DrmConfig {
    /// Extra headers for license requests.
    #[must_use]
    pub fn license_headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::new();
        if let Some(token) = &self.auth_token {
            headers.push(("Authorization", format!("Bearer {token}")));
        }
        if let Some(client_id) = &self.client_id {
            headers.push(("Client-Id", client_id.clone()));
            headers.push(("Client-Type", "WEB".to_string()));
        }
        headers
    }
}

/// A playable source: a manifest URL plus optional DRM configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub manifest_url: String,
    #[serde(default)]
    pub drm: Option<DrmConfig>,
}

impl SourceDescriptor {
    #[must_use]
    pub fn new(manifest_url: impl Into<String>) -> Self {
        Self {
            manifest_url: manifest_url.into(),
            drm: None,
        }
    }

    /// The signed query suffix of the manifest URL (including `?`), if any.
    ///
    /// Signed manifests carry their signature as a query string that segment
    /// requests must repeat.
    #[must_use]
    pub fn signature_suffix(&self) -> Option<&str> {
        self.manifest_url
            .find('?')
            .map(|idx| &self.manifest_url[idx..])
            .filter(|suffix| suffix.len() > 1)
    }

    /// Appends the manifest signature to a segment URI that has no query yet.
    #[must_use]
    pub fn sign_segment_uri(&self, uri: &str) -> String {
        match self.signature_suffix() {
            Some(suffix) if !uri.contains('?') => format!("{uri}{suffix}"),
            _ => uri.to_string(),
        }
    }
}

/// Identifier of a variant (quality) track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackId(pub u32);

/// A variant track as enumerated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantTrack {
    pub id: TrackId,
    /// Video height in pixels; audio-only variants have none.
    pub height: Option<u32>,
    pub bandwidth: u64,
    pub active: bool,
}

impl VariantTrack {
    /// Label shown in the quality menu, e.g. `720p`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.height {
            Some(height) => format!("{height}p"),
            None => "audio".to_string(),
        }
    }
}
