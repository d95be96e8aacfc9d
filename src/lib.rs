#![warn(missing_docs)]
//! imgedit - Edit images with natural-language prompts.
//!
//! Upload an image, describe the change, and a generative image API returns
//! the edited version. The crate is split the way a request flows:
//!
//! - [`image`]: reads files into data-URL [`EncodedImage`]s and splits them back.
//! - [`transform`]: the [`TransformClient`] seam and the Gemini implementation.
//! - [`session`]: [`SessionController`], the only writer of [`SessionState`].
//! - [`view`]: renders state for the terminal and maps input to [`Intent`]s.
//!
//! # Quick Start
//!
//! ```no_run
//! use imgedit::{GeminiClient, SessionController};
//!
//! #[tokio::main]
//! async fn main() -> imgedit::Result<()> {
//!     let client = GeminiClient::builder().build()?;
//!     let mut session = SessionController::new(client);
//!
//!     session.upload_image("cat.png").await;
//!     session.edit_prompt("Add a retro filter");
//!     session.submit().await;
//!
//!     if let Some(result) = session.state().result() {
//!         result.save("cat-retro.png")?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `gemini`: Gemini (Google) transform client
//! - `cli`: the `imgedit` command-line interface

mod error;

pub mod image;
pub mod session;
pub mod transform;
pub mod view;

// Re-export error types at crate root
pub use error::{EditorError, FailureKind, Result};

pub use image::{decode, encode_bytes, encode_file, DecodedPayload, EncodedImage, ImageFormat, MimeType};
pub use session::{Intent, Phase, SessionController, SessionState};
pub use transform::{TransformClient, TransformRequest};

#[cfg(feature = "gemini")]
pub use transform::providers::{GeminiClient, GeminiClientBuilder, GeminiModel};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{EditorError, Result};
    pub use crate::image::EncodedImage;
    pub use crate::session::{Intent, SessionController, SessionState};
    pub use crate::transform::{TransformClient, TransformRequest};

    #[cfg(feature = "gemini")]
    pub use crate::transform::providers::GeminiClient;
}
