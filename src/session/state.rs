//! Session state owned by the controller.

use crate::image::EncodedImage;

/// Where the session is in its request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Waiting for user input. Covers both post-success and post-failure.
    #[default]
    Idle,
    /// A transform request is in flight.
    AwaitingResult,
}

/// Everything the presentation layer renders.
///
/// Read-only outside the crate; [`SessionController`](super::SessionController)
/// is the only writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub(crate) source: Option<EncodedImage>,
    pub(crate) result: Option<EncodedImage>,
    pub(crate) prompt: String,
    pub(crate) busy: bool,
    pub(crate) last_error: Option<String>,
}

impl SessionState {
    /// The uploaded image, if any.
    pub fn source(&self) -> Option<&EncodedImage> {
        self.source.as_ref()
    }

    /// The edited image from the last successful submit, if any.
    pub fn result(&self) -> Option<&EncodedImage> {
        self.result.as_ref()
    }

    /// The prompt text, exactly as typed.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// True while a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The user-visible message for the last failure.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        if self.busy {
            Phase::AwaitingResult
        } else {
            Phase::Idle
        }
    }

    /// True when the prompt has non-whitespace content.
    pub fn has_prompt(&self) -> bool {
        !self.prompt.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty_and_idle() {
        let state = SessionState::default();
        assert!(state.source().is_none());
        assert!(state.result().is_none());
        assert_eq!(state.prompt(), "");
        assert!(!state.is_busy());
        assert!(state.last_error().is_none());
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_phase_follows_busy_flag() {
        let state = SessionState {
            busy: true,
            ..Default::default()
        };
        assert_eq!(state.phase(), Phase::AwaitingResult);
    }

    #[test]
    fn test_whitespace_prompt_is_not_a_prompt() {
        let state = SessionState {
            prompt: " \n ".into(),
            ..Default::default()
        };
        assert!(!state.has_prompt());
    }
}
