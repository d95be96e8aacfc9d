//! Presentation: read-only rendering of session state and input mapping.

mod input;
mod render;

pub use input::{
    dropped_path, parse_line, prompt_key, Key, KeyPress, LineCommand, PromptDraft,
    HELP,
};
pub use render::{
    render, ComparisonView, ImageSummary, PaneView, PromptView, UploaderView, View, BUSY_TEXT,
    INTRO, PANE_PLACEHOLDER, SUBTITLE, TITLE,
};
