//! Pipeline module — orchestrator, completion event, sinks, state machine.
//!
//! # Architecture
//!
//! ```text
//! user input
//!    │ compose_text_prompt
//!    ▼
//! GenerationClient::complete_text ──Err──▶ Failed (surfaced, no event)
//!    │ Ok
//!    ▼
//! TextSink::display + EventBus::emit(CompletionEvent)   — exactly once
//!    │
//!    ├──────────────── tokio::join! ────────────────┐
//!    ▼                                              ▼
//! image branch                                 speech branch
//!   compose_image_prompt                         synthesize_speech
//!   generate_image → fetch_image                 wav::decode
//!   ImageSink::present                           AudioSink::play
//! ```
//!
//! The two branches are mutually independent: each reports its own failure
//! to the text sink and neither can abort the other.

pub mod event;
pub mod runner;
pub mod sink;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use event::{CompletionEvent, EventBus, Subscriber};
pub use runner::{BranchOutcome, PipelineError, PipelineOrchestrator, PipelineReport};
pub use sink::{AudioSink, ImageSink, TextSink};
pub use state::PipelineState;
