//! taleforge — chained multi-modal content generation.
//!
//! A text prompt becomes a themed text completion; the completion fans out
//! into an image-generation request and a text-to-speech request, each
//! independently consumed by a presentation sink.
//!
//! * [`pipeline`] — the orchestrator, completion event and sink seams.
//! * [`openai`] — wire types, response parsing and the HTTP client.
//! * [`prompt`] — prompt composition and the image-prompt truncation policy.
//! * [`audio`] — WAV container decoding to normalized PCM.
//! * [`config`] — settings, platform paths and credential loading.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taleforge::config::{ApiKey, AppConfig};
//! use taleforge::openai::{GenerationClient, OpenAiClient};
//! use taleforge::pipeline::PipelineOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     let key = ApiKey::load()?;
//!
//!     let client: Arc<dyn GenerationClient> =
//!         Arc::new(OpenAiClient::from_config(&config, key.clone()));
//!     let mut orchestrator = PipelineOrchestrator::new(client, config, Some(key));
//!     orchestrator.subscribe(|event| println!("{}", event.text));
//!
//!     let report = orchestrator.send_request("A lone tower").await?;
//!     println!("image: {:?}, speech: {:?}", report.image, report.speech);
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod config;
pub mod openai;
pub mod pipeline;
pub mod prompt;
