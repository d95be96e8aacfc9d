//! Transform client trait and request type.

use crate::error::{EditorError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// A request to edit one image with a text prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    /// Base64 body of the source image.
    pub base64_data: String,
    /// MIME type of the source image.
    pub mime_type: String,
    /// Editing instruction, never blank.
    pub prompt: String,
}

impl TransformRequest {
    /// Creates a request, rejecting a prompt that is empty after trimming.
    pub fn new(
        base64_data: impl Into<String>,
        mime_type: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(EditorError::Validation("prompt must not be empty".into()));
        }
        Ok(Self {
            base64_data: base64_data.into(),
            mime_type: mime_type.into(),
            prompt,
        })
    }
}

/// Trait for remote image transformation services.
#[async_trait]
pub trait TransformClient: Send + Sync {
    /// Sends the image and prompt, returning the edited image's base64 body.
    ///
    /// Makes exactly one attempt.
    async fn transform(&self, request: &TransformRequest) -> Result<String>;

    /// Returns the name of this client for display.
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: TransformClient + ?Sized> TransformClient for Arc<T> {
    async fn transform(&self, request: &TransformRequest) -> Result<String> {
        (**self).transform(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<T: TransformClient + ?Sized> TransformClient for Box<T> {
    async fn transform(&self, request: &TransformRequest) -> Result<String> {
        (**self).transform(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
