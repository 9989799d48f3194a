//! Pipeline orchestrator — drives the full prompt → completion → fan-out
//! flow.
//!
//! # Pipeline flow
//!
//! ```text
//! send_request(user_input)
//!   ├─ credential guard (MissingCredential, zero network calls)
//!   ├─ compose_text_prompt → GenerationClient::complete_text
//!   │    ├─ Err → Failed, error surfaced via TextSink, no event
//!   │    └─ Ok  → TextSink::display + EventBus::emit (exactly once)
//!   └─ tokio::join!(
//!        image branch: compose_image_prompt → generate_image
//!                      → fetch_image → ImageSink::present,
//!        speech branch: synthesize_speech → wav::decode
//!                      → AudioSink::play,
//!      )   — branches fail independently, errors surfaced, non-fatal
//! ```
//!
//! A branch runs only when its sink is attached, mirroring the original
//! behaviour of skipping image generation when no display was wired up.
//! Each invocation owns its state; concurrent invocations share nothing but
//! the credential and config, so `send_request` takes `&self` and may be
//! called from any number of tasks at once. A caller that drops the
//! returned future simply abandons the invocation — nothing is poisoned.

use std::sync::Arc;

use thiserror::Error;

use crate::audio;
use crate::config::{ApiKey, AppConfig};
use crate::openai::{ClientError, GenerationClient};
use crate::prompt::{compose_image_prompt, compose_text_prompt};

use super::event::{CompletionEvent, EventBus};
use super::sink::{AudioSink, ImageSink, TextSink};
use super::state::PipelineState;

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors that terminate an invocation before any event is emitted.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No credential was loaded; no network call was attempted.
    #[error("API key is not loaded — cannot send request")]
    MissingCredential,

    /// The root text-completion call failed.
    #[error("text completion failed: {0}")]
    Completion(#[from] ClientError),
}

// ---------------------------------------------------------------------------
// BranchOutcome / PipelineReport
// ---------------------------------------------------------------------------

/// Result of one dependent branch.
#[derive(Debug, Clone, PartialEq)]
pub enum BranchOutcome {
    /// No sink attached — the branch was never started.
    Skipped,
    /// The branch delivered its result to its sink.
    Delivered,
    /// The branch failed; the message was surfaced via the text sink.
    Failed(String),
}

impl BranchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, BranchOutcome::Delivered)
    }
}

/// Everything the caller can observe about a finished invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// The completion text, as emitted on the event.
    pub completion: String,
    /// Image branch outcome.
    pub image: BranchOutcome,
    /// Speech branch outcome.
    pub speech: BranchOutcome,
}

// ---------------------------------------------------------------------------
// PipelineOrchestrator
// ---------------------------------------------------------------------------

/// Sequences the text completion and fans its result out to the image and
/// speech branches.
///
/// Construct with [`new`](Self::new), attach sinks and subscribers, then
/// call [`send_request`](Self::send_request) per user action.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use taleforge::config::{ApiKey, AppConfig};
/// use taleforge::openai::{GenerationClient, OpenAiClient};
/// use taleforge::pipeline::PipelineOrchestrator;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let key = ApiKey::from_raw("sk-…");
/// let client: Arc<dyn GenerationClient> =
///     Arc::new(OpenAiClient::from_config(&config, key.clone()));
///
/// let mut orchestrator = PipelineOrchestrator::new(client, config, Some(key));
/// orchestrator.subscribe(|event| println!("completion: {}", event.text));
///
/// let report = orchestrator.send_request("A lone tower").await.unwrap();
/// println!("{}", report.completion);
/// # }
/// ```
pub struct PipelineOrchestrator {
    client: Arc<dyn GenerationClient>,
    config: AppConfig,
    credential: Option<ApiKey>,
    bus: EventBus,
    text_sink: Option<Arc<dyn TextSink>>,
    image_sink: Option<Arc<dyn ImageSink>>,
    audio_sink: Option<Arc<dyn AudioSink>>,
}

impl PipelineOrchestrator {
    /// Create an orchestrator with no sinks and no subscribers.
    ///
    /// `credential` is the explicit, immutable credential value; `None`
    /// makes every [`send_request`](Self::send_request) fail fast with
    /// [`PipelineError::MissingCredential`].
    pub fn new(
        client: Arc<dyn GenerationClient>,
        config: AppConfig,
        credential: Option<ApiKey>,
    ) -> Self {
        Self {
            client,
            config,
            credential,
            bus: EventBus::new(),
            text_sink: None,
            image_sink: None,
            audio_sink: None,
        }
    }

    /// Attach the display sink for completion text and error messages.
    pub fn with_text_sink(mut self, sink: Arc<dyn TextSink>) -> Self {
        self.text_sink = Some(sink);
        self
    }

    /// Attach the image sink. Attaching it enables the image branch.
    pub fn with_image_sink(mut self, sink: Arc<dyn ImageSink>) -> Self {
        self.image_sink = Some(sink);
        self
    }

    /// Attach the audio sink. Attaching it enables the speech branch.
    pub fn with_audio_sink(mut self, sink: Arc<dyn AudioSink>) -> Self {
        self.audio_sink = Some(sink);
        self
    }

    /// Register a completion-event subscriber. Must be registered before
    /// the invocation whose event it wants to observe.
    pub fn subscribe(&mut self, f: impl Fn(&CompletionEvent) + Send + Sync + 'static) {
        self.bus.subscribe(f);
    }

    /// Swap the credential — the narrow runtime-rotation hook. In-flight
    /// invocations keep the key their client captured at construction.
    pub fn reload_credential(&mut self, credential: Option<ApiKey>) {
        self.credential = credential;
    }

    // -----------------------------------------------------------------------
    // Invocation
    // -----------------------------------------------------------------------

    /// Run one full invocation: completion, event, fan-out.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::MissingCredential`] — before any network call.
    /// - [`PipelineError::Completion`] — the root call failed; no event was
    ///   emitted and the error text went to the text sink.
    ///
    /// Branch failures never surface as `Err`: they are reported in the
    /// [`PipelineReport`] and via the text sink, and one branch's failure
    /// leaves the other untouched.
    pub async fn send_request(&self, user_input: &str) -> Result<PipelineReport, PipelineError> {
        if self.credential.is_none() {
            log::error!("pipeline: no API key loaded, refusing to send");
            return Err(PipelineError::MissingCredential);
        }

        self.enter(PipelineState::AwaitingCompletion);

        let prompt = compose_text_prompt(
            user_input,
            &self.config.prompt.theme_instructions,
            &self.config.prompt.negative_prompt,
        );

        let completion = match self.client.complete_text(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                self.enter(PipelineState::Failed);
                self.surface(&format!("Error: {e}"));
                return Err(e.into());
            }
        };

        self.enter(PipelineState::CompletionReceived);

        if let Some(sink) = &self.text_sink {
            sink.display(&completion);
        }

        // Exactly once, only on success.
        let event = CompletionEvent {
            text: completion.clone(),
        };
        let notified = self.bus.emit(&event);
        log::debug!("pipeline: completion event delivered to {notified} subscriber(s)");

        // Dependent branches: concurrent, mutually independent.
        let (image, speech) = tokio::join!(
            self.run_image_branch(&completion),
            self.run_speech_branch(&completion),
        );

        self.enter(PipelineState::Done);

        Ok(PipelineReport {
            completion,
            image,
            speech,
        })
    }

    // -----------------------------------------------------------------------
    // Branches
    // -----------------------------------------------------------------------

    async fn run_image_branch(&self, completion: &str) -> BranchOutcome {
        let Some(sink) = &self.image_sink else {
            return BranchOutcome::Skipped;
        };

        self.enter(PipelineState::AwaitingImage);

        let prompt = match compose_image_prompt(
            completion,
            &self.config.image.art_style,
            &self.config.image.negative_prompt,
            self.config.image.truncation,
        ) {
            Ok(p) => p,
            Err(e) => return self.branch_failed("image", &e.to_string()),
        };

        let url = match self.client.generate_image(&prompt).await {
            Ok(url) => url,
            Err(e) => return self.branch_failed("image", &e.to_string()),
        };

        let bytes = match self.client.fetch_image(&url).await {
            Ok(bytes) => bytes,
            Err(e) => return self.branch_failed("image", &e.to_string()),
        };

        log::debug!("pipeline: image branch delivered {} bytes", bytes.len());
        sink.present(&bytes);
        BranchOutcome::Delivered
    }

    async fn run_speech_branch(&self, completion: &str) -> BranchOutcome {
        let Some(sink) = &self.audio_sink else {
            return BranchOutcome::Skipped;
        };

        self.enter(PipelineState::AwaitingSpeech);

        let bytes = match self.client.synthesize_speech(completion).await {
            Ok(bytes) => bytes,
            Err(e) => return self.branch_failed("speech", &e.to_string()),
        };

        let decoded = match audio::decode(&bytes) {
            Ok(audio) => audio,
            Err(e) => return self.branch_failed("speech", &e.to_string()),
        };

        log::debug!(
            "pipeline: speech branch delivered {:.2}s of audio",
            decoded.duration_secs()
        );
        sink.play(decoded);
        BranchOutcome::Delivered
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn enter(&self, state: PipelineState) {
        log::debug!("pipeline: → {}", state.label());
    }

    /// Report a branch failure through the display channel — non-fatal to
    /// the invocation and to the sibling branch.
    fn branch_failed(&self, branch: &str, message: &str) -> BranchOutcome {
        let text = format!("{branch} error: {message}");
        self.surface(&text);
        BranchOutcome::Failed(message.to_string())
    }

    fn surface(&self, message: &str) {
        log::error!("pipeline: {message}");
        if let Some(sink) = &self.text_sink {
            sink.display(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
