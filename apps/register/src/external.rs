//! # External Capabilities
//!
//! Services the register consumes but does not implement: product image
//! generation and the signed-in user's identity. Both are display-only
//! conveniences; the register keeps working when they fail.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::state::ConfigState;

// =============================================================================
// Image Generation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("Image generation is not configured")]
    Unavailable,

    /// Opaque failure reported by the generator.
    #[error("Image generation failed: {0}")]
    Generation(String),

    #[error("Image generator returned something other than an image data URI")]
    InvalidOutput,
}

/// Turns a text prompt into an image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Returns the image as a `data:image/...` URI.
    async fn generate_image(&self, prompt: &str) -> Result<String, ImageError>;
}

/// Generator used when none is wired in. Always fails with `Unavailable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImageGenerator;

#[async_trait]
impl ImageGenerator for NoImageGenerator {
    async fn generate_image(&self, _prompt: &str) -> Result<String, ImageError> {
        Err(ImageError::Unavailable)
    }
}

/// Accepts only `data:image/<type>;...` URIs.
pub fn check_data_uri(uri: &str) -> Result<(), ImageError> {
    let is_image = uri
        .strip_prefix("data:image/")
        .is_some_and(|rest| rest.contains(','));
    if is_image {
        Ok(())
    } else {
        Err(ImageError::InvalidOutput)
    }
}

// =============================================================================
// Identity
// =============================================================================

/// The signed-in user, shown in the register header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub display_name: String,
    pub email: Option<String>,
}

pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<UserIdentity>;
}

/// Identity fixed at startup (from `operator_name` in the config).
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<UserIdentity>,
}

impl StaticIdentity {
    pub fn new(user: Option<UserIdentity>) -> Self {
        StaticIdentity { user }
    }

    pub fn from_config(config: &ConfigState) -> Self {
        StaticIdentity::new(config.operator_name.as_ref().map(|name| UserIdentity {
            display_name: name.clone(),
            email: None,
        }))
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserIdentity> {
        self.user.clone()
    }
}
