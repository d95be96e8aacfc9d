//! Renders session state into a terminal view.

use crate::image::{EncodedImage, ImageFormat};
use crate::session::SessionState;
use std::fmt;

/// Application title.
pub const TITLE: &str = "Gemini Image Editor";
/// Subtitle under the title.
pub const SUBTITLE: &str = "Powered by Gemini 2.5 Flash Image";
/// Introductory hint shown under the header.
pub const INTRO: &str = "Upload an image, describe how you want to change it, and let Gemini \
bring your vision to life. Try prompts like \"Add a retro filter\" or \"Make the sky look like \
a vibrant sunset\".";
/// Shown while a request is in flight.
pub const BUSY_TEXT: &str = "Gemini is thinking...";
/// Shown in a comparison pane without an image.
pub const PANE_PLACEHOLDER: &str = "Image will appear here";

/// A rendered image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSummary {
    /// Display label.
    pub alt: String,
    /// MIME type the payload declares.
    pub mime_type: String,
    /// Size of the decoded image, when the payload decodes.
    pub size_bytes: Option<usize>,
}

impl ImageSummary {
    fn from_image(image: &EncodedImage) -> Self {
        let decoded = image.decode();
        Self {
            alt: image.alt.clone(),
            mime_type: decoded.mime.as_str().to_string(),
            size_bytes: decoded.bytes().ok().map(|b| b.len()),
        }
    }
}

impl fmt::Display for ImageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.alt, self.mime_type)?;
        if let Some(size) = self.size_bytes {
            write!(f, ", {size} bytes")?;
        }
        f.write_str(")")
    }
}

/// The upload affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploaderView {
    /// Nothing uploaded yet.
    Empty {
        /// Accepted formats hint.
        accepted: &'static str,
    },
    /// Shows the current source with a replace hint.
    Loaded(ImageSummary),
}

/// The prompt editor and its trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptView {
    /// Prompt text as typed.
    pub text: String,
    /// Trigger label.
    pub button_label: &'static str,
    /// True when the trigger is enabled.
    pub button_enabled: bool,
    /// True when the editor accepts input.
    pub editable: bool,
}

/// One side of the comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneView {
    /// Pane heading.
    pub title: &'static str,
    /// The image, or `None` for the placeholder.
    pub image: Option<ImageSummary>,
}

/// Side-by-side comparison of source and result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonView {
    /// The uploaded image.
    pub original: PaneView,
    /// The edited image.
    pub generated: PaneView,
}

/// Everything the terminal shows for one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Upload affordance.
    pub uploader: UploaderView,
    /// Prompt editor, present once an image is uploaded.
    pub prompt: Option<PromptView>,
    /// Error banner, present exactly when the session has an error.
    pub error_banner: Option<String>,
    /// Busy indicator, present exactly while busy.
    pub busy_indicator: Option<&'static str>,
    /// Comparison panes, hidden when there is neither source nor result.
    pub comparison: Option<ComparisonView>,
}

/// Builds the view for a state.
pub fn render(state: &SessionState) -> View {
    let uploader = match state.source() {
        Some(image) => UploaderView::Loaded(ImageSummary::from_image(image)),
        None => UploaderView::Empty {
            accepted: ImageFormat::ACCEPT_LABEL,
        },
    };

    let prompt = state.source().map(|_| PromptView {
        text: state.prompt().to_string(),
        button_label: if state.is_busy() {
            "Generating..."
        } else {
            "Generate"
        },
        button_enabled: !state.is_busy() && state.has_prompt(),
        editable: !state.is_busy(),
    });

    let comparison = if state.source().is_none() && state.result().is_none() {
        None
    } else {
        Some(ComparisonView {
            original: PaneView {
                title: "Original Image",
                image: state.source().map(ImageSummary::from_image),
            },
            generated: PaneView {
                title: "Generated Image",
                image: state.result().map(ImageSummary::from_image),
            },
        })
    };

    View {
        uploader,
        prompt,
        error_banner: state.last_error().map(str::to_string),
        busy_indicator: state.is_busy().then_some(BUSY_TEXT),
        comparison,
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.uploader {
            UploaderView::Empty { accepted } => {
                writeln!(f, "[ Click to upload or drag and drop ]")?;
                writeln!(f, "  {accepted}")?;
            }
            UploaderView::Loaded(image) => {
                writeln!(f, "[ {image} ]")?;
                writeln!(f, "  Click or drop to replace image")?;
            }
        }

        if let Some(prompt) = &self.prompt {
            let state = if prompt.button_enabled { "" } else { " (disabled)" };
            writeln!(f, "Prompt: {}", prompt.text)?;
            writeln!(f, "  <{}>{}", prompt.button_label, state)?;
        }

        if let Some(message) = &self.error_banner {
            writeln!(f, "Error: {message}")?;
        }

        if let Some(busy) = self.busy_indicator {
            writeln!(f, "{busy}")?;
        }

        if let Some(comparison) = &self.comparison {
            for pane in [&comparison.original, &comparison.generated] {
                match &pane.image {
                    Some(image) => writeln!(f, "{}: {}", pane.title, image)?,
                    None => writeln!(f, "{}: {}", pane.title, PANE_PLACEHOLDER)?,
                }
            }
        }

        Ok(())
    }
}
