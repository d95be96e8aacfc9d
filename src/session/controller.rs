//! Interaction controller: applies user intents to the session state.

use crate::error::{EditorError, Result};
use crate::image::{encode_file, EncodedImage};
use crate::session::state::SessionState;
use crate::transform::{TransformClient, TransformRequest};
use std::future::Future;
use std::path::PathBuf;

/// Shown when the chosen file cannot be read.
pub const READ_FAILURE_MESSAGE: &str = "Failed to read the image file.";

/// Shown when submit is attempted without an image or a prompt.
pub const VALIDATION_MESSAGE: &str = "Please upload an image and provide an editing prompt.";

/// Shown when the remote transformation fails for any reason.
pub const TRANSFORM_FAILURE_MESSAGE: &str =
    "Failed to generate the image. Please check your API key and try again.";

/// Shown when the user cancels an in-flight request.
pub const CANCELLED_MESSAGE: &str = "Image generation was cancelled.";

/// A discrete user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// A file was chosen, by browsing or by dropping it.
    Upload(PathBuf),
    /// The prompt text changed.
    EditPrompt(String),
    /// The user asked for the edit.
    Submit,
}

/// A dispatched request awaiting its outcome.
///
/// Only [`SessionController::begin_submit`] creates one, and
/// [`SessionController::finish_submit`] consumes it.
#[derive(Debug)]
pub struct PendingEdit {
    request: TransformRequest,
    source_alt: String,
}

impl PendingEdit {
    /// The request to send to the transform client.
    pub fn request(&self) -> &TransformRequest {
        &self.request
    }
}

/// Owns the session state and the transform client.
pub struct SessionController<C> {
    client: C,
    state: SessionState,
}

impl<C: TransformClient> SessionController<C> {
    /// Starts a session with empty state.
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: SessionState::default(),
        }
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the transform client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// True when the submit trigger should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.state.busy && self.state.has_prompt()
    }

    /// Applies one intent.
    pub async fn dispatch(&mut self, intent: Intent) {
        match intent {
            Intent::Upload(path) => self.upload_image(path).await,
            Intent::EditPrompt(text) => self.edit_prompt(text),
            Intent::Submit => self.submit().await,
        }
    }

    /// Reads and encodes a file, making it the new source image.
    pub async fn upload_image(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        let outcome = encode_file(&path).await;
        self.apply_upload(outcome);
    }

    /// Makes an already encoded image the new source.
    pub fn upload_encoded(&mut self, image: EncodedImage) {
        self.apply_upload(Ok(image));
    }

    fn apply_upload(&mut self, outcome: Result<EncodedImage>) {
        match outcome {
            Ok(image) => {
                tracing::info!(label = %image.alt, "source image loaded");
                self.state.source = Some(image);
                self.state.result = None;
                self.state.last_error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to read image file");
                self.state.last_error = Some(READ_FAILURE_MESSAGE.to_string());
            }
        }
    }

    /// Replaces the prompt text verbatim.
    pub fn edit_prompt(&mut self, text: impl Into<String>) {
        self.state.prompt = text.into();
    }

    /// Validates and dispatches a request.
    ///
    /// Returns `None` without touching state while busy. Returns `None` and
    /// records the validation message when the image or prompt is missing.
    pub fn begin_submit(&mut self) -> Option<PendingEdit> {
        if self.state.busy {
            tracing::debug!("submit ignored while a request is in flight");
            return None;
        }

        let Some(source) = self.state.source.as_ref() else {
            self.state.last_error = Some(VALIDATION_MESSAGE.to_string());
            return None;
        };
        let decoded = source.decode();
        let source_alt = source.alt.clone();

        let request = match TransformRequest::new(
            decoded.base64_data,
            decoded.mime.as_str(),
            self.state.prompt.clone(),
        ) {
            Ok(request) => request,
            Err(_) => {
                self.state.last_error = Some(VALIDATION_MESSAGE.to_string());
                return None;
            }
        };

        self.state.busy = true;
        self.state.last_error = None;
        self.state.result = None;

        tracing::info!(
            source = %source_alt,
            mime_type = %request.mime_type,
            client = self.client.name(),
            "dispatching edit request"
        );
        Some(PendingEdit {
            request,
            source_alt,
        })
    }

    /// Records the outcome of a dispatched request and returns to idle.
    pub fn finish_submit(&mut self, pending: PendingEdit, outcome: Result<String>) {
        match outcome {
            Ok(base64_data) => {
                tracing::info!(source = %pending.source_alt, "edit request completed");
                self.state.result = Some(EncodedImage::from_base64(
                    &pending.request.mime_type,
                    &base64_data,
                    format!("Edited version of {}", pending.source_alt),
                ));
            }
            Err(EditorError::Cancelled) => {
                tracing::info!(source = %pending.source_alt, "edit request cancelled");
                self.state.last_error = Some(CANCELLED_MESSAGE.to_string());
            }
            Err(e) => {
                tracing::error!(error = %e, source = %pending.source_alt, "edit request failed");
                self.state.last_error = Some(TRANSFORM_FAILURE_MESSAGE.to_string());
            }
        }
        self.state.busy = false;
    }

    /// Sends the source image and prompt, making exactly one attempt.
    pub async fn submit(&mut self) {
        let Some(pending) = self.begin_submit() else {
            return;
        };
        let outcome = self.client.transform(&pending.request).await;
        self.finish_submit(pending, outcome);
    }

    /// Like [`submit`](Self::submit), but abandons the request when `cancel`
    /// completes first.
    pub async fn submit_or_cancel<F>(&mut self, cancel: F)
    where
        F: Future<Output = ()>,
    {
        let Some(pending) = self.begin_submit() else {
            return;
        };
        let outcome = tokio::select! {
            outcome = self.client.transform(&pending.request) => outcome,
            _ = cancel => Err(EditorError::Cancelled),
        };
        self.finish_submit(pending, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::encode_bytes;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    enum Reply {
        Image(&'static str),
        Fail,
        Hang,
    }

    struct StubClient {
        reply: Reply,
        calls: AtomicUsize,
        last_request: Mutex<Option<TransformRequest>>,
    }

    impl StubClient {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl TransformClient for StubClient {
        async fn transform(&self, request: &TransformRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            match self.reply {
                Reply::Image(data) => Ok(data.to_string()),
                Reply::Fail => Err(EditorError::Auth("invalid key".into())),
                Reply::Hang => std::future::pending().await,
            }
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn cat_png() -> EncodedImage {
        encode_bytes(&[0x89, 0x50, 0x4E, 0x47], "image/png", "cat.png")
    }

    fn controller(reply: Reply) -> SessionController<StubClient> {
        SessionController::new(StubClient::new(reply))
    }

    #[tokio::test]
    async fn test_cat_with_hat_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.png");
        std::fs::write(&path, [0x89, 0x50, 0x4E, 0x47]).unwrap();

        let mut session = controller(Reply::Image("AAAA"));
        session.dispatch(Intent::Upload(path)).await;
        session.dispatch(Intent::EditPrompt("add a hat".into())).await;
        session.dispatch(Intent::Submit).await;

        let state = session.state();
        assert_eq!(
            state.result(),
            Some(&EncodedImage::new(
                "data:image/png;base64,AAAA",
                "Edited version of cat.png"
            ))
        );
        assert!(state.last_error().is_none());
        assert!(!state.is_busy());

        let sent = session.client().last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.mime_type, "image/png");
        assert_eq!(sent.base64_data, "iVBORw==");
        assert_eq!(sent.prompt, "add a hat");
    }

    #[tokio::test]
    async fn test_submit_without_image_is_validation_failure() {
        let mut session = controller(Reply::Image("AAAA"));
        session.edit_prompt("add a hat");
        session.submit().await;

        assert_eq!(session.state().last_error(), Some(VALIDATION_MESSAGE));
        assert!(!session.state().is_busy());
        assert_eq!(session.client().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_with_blank_prompt_is_validation_failure() {
        let mut session = controller(Reply::Image("AAAA"));
        session.upload_encoded(cat_png());
        session.edit_prompt("   \n");
        session.submit().await;

        assert_eq!(session.state().last_error(), Some(VALIDATION_MESSAGE));
        assert!(session.state().result().is_none());
        assert_eq!(session.client().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_sets_generic_message() {
        let mut session = controller(Reply::Fail);
        session.upload_encoded(cat_png());
        session.edit_prompt("add a hat");
        session.submit().await;

        let state = session.state();
        assert_eq!(state.last_error(), Some(TRANSFORM_FAILURE_MESSAGE));
        assert!(state.result().is_none());
        assert!(!state.is_busy());
        assert_eq!(session.client().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_second_submit_while_busy_is_not_dispatched() {
        let mut session = controller(Reply::Image("AAAA"));
        session.upload_encoded(cat_png());
        session.edit_prompt("add a hat");

        let pending = session.begin_submit().expect("first submit dispatches");
        assert!(session.state().is_busy());
        assert!(!session.can_submit());

        let before = session.state().clone();
        assert!(session.begin_submit().is_none());
        assert_eq!(session.state(), &before);

        session.finish_submit(pending, Ok("AAAA".into()));
        assert!(!session.state().is_busy());
        assert!(session.can_submit());
    }

    #[test]
    fn test_dispatch_clears_previous_result_and_error() {
        let mut session = controller(Reply::Image("AAAA"));
        session.upload_encoded(cat_png());
        session.edit_prompt("add a hat");
        let pending = session.begin_submit().unwrap();
        session.finish_submit(pending, Ok("AAAA".into()));
        assert!(session.state().result().is_some());

        let pending = session.begin_submit().unwrap();
        assert!(session.state().result().is_none());
        assert!(session.state().last_error().is_none());
        let timeout = EditorError::Timeout(std::time::Duration::from_secs(1));
        session.finish_submit(pending, Err(timeout));
        assert_eq!(session.state().last_error(), Some(TRANSFORM_FAILURE_MESSAGE));
        assert!(session.state().result().is_none());
    }

    #[test]
    fn test_upload_clears_result_and_error() {
        let mut session = controller(Reply::Image("AAAA"));
        session.upload_encoded(cat_png());
        session.edit_prompt("add a hat");
        let pending = session.begin_submit().unwrap();
        session.finish_submit(pending, Ok("AAAA".into()));
        session.edit_prompt("");
        assert!(session.begin_submit().is_none());
        assert_eq!(session.state().last_error(), Some(VALIDATION_MESSAGE));

        session.upload_encoded(encode_bytes(b"dog", "image/jpeg", "dog.jpg"));
        let state = session.state();
        assert_eq!(state.source().unwrap().alt, "dog.jpg");
        assert!(state.result().is_none());
        assert!(state.last_error().is_none());
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = controller(Reply::Image("AAAA"));
        session.upload_encoded(cat_png());

        session.upload_image(dir.path().join("missing.png")).await;
        let state = session.state();
        assert_eq!(state.last_error(), Some(READ_FAILURE_MESSAGE));
        assert_eq!(state.source().unwrap().alt, "cat.png");
    }

    #[test]
    fn test_prompt_is_stored_verbatim() {
        let mut session = controller(Reply::Image("AAAA"));
        session.edit_prompt("  add a hat\n");
        assert_eq!(session.state().prompt(), "  add a hat\n");
    }

    #[test]
    fn test_defaulted_mime_is_sent_as_octet_stream() {
        let mut session = controller(Reply::Image("AAAA"));
        session.upload_encoded(EncodedImage::new("garbage,QUJD", "odd.bin"));
        session.edit_prompt("sharpen");

        let pending = session.begin_submit().unwrap();
        assert_eq!(pending.request().mime_type, "application/octet-stream");
        assert_eq!(pending.request().base64_data, "QUJD");
    }

    #[tokio::test]
    async fn test_cancel_returns_to_idle() {
        let mut session = controller(Reply::Hang);
        session.upload_encoded(cat_png());
        session.edit_prompt("add a hat");

        session.submit_or_cancel(async {}).await;
        let state = session.state();
        assert!(!state.is_busy());
        assert!(state.result().is_none());
        assert_eq!(state.last_error(), Some(CANCELLED_MESSAGE));
    }
}
