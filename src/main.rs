//! Command-line entry point.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Load the API key from `api_key.txt` (hard failure when missing).
//! 4. Build the [`OpenAiClient`] and wire file/stdout sinks.
//! 5. Run one pipeline invocation for the prompt given on the command line
//!    and report where each branch landed.
//!
//! Usage: `taleforge "A lone tower on a stormy coast"`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use taleforge::audio::DecodedAudio;
use taleforge::config::{ApiKey, AppConfig};
use taleforge::openai::{GenerationClient, OpenAiClient};
use taleforge::pipeline::{AudioSink, ImageSink, PipelineOrchestrator, TextSink};

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Prints completion text (and surfaced errors) to stdout.
struct StdoutSink;

impl TextSink for StdoutSink {
    fn display(&self, text: &str) {
        println!("{text}");
    }
}

/// Writes the generated image bytes to a file as-is (the endpoint returns
/// an already-encoded image).
struct FileImageSink {
    path: PathBuf,
}

impl ImageSink for FileImageSink {
    fn present(&self, bytes: &[u8]) {
        if let Err(e) = std::fs::write(&self.path, bytes) {
            log::error!("failed to write {}: {e}", self.path.display());
        } else {
            log::info!("image written to {}", self.path.display());
        }
    }
}

/// Writes decoded PCM to a raw little-endian `f32` file, named after the
/// stream parameters so a player knows how to interpret it.
struct PcmFileSink {
    dir: PathBuf,
}

impl AudioSink for PcmFileSink {
    fn play(&self, audio: DecodedAudio) {
        let name = format!(
            "narration_{}ch_{}hz.f32",
            audio.channels(),
            audio.sample_rate()
        );
        let path = self.dir.join(name);

        let mut bytes = Vec::with_capacity(audio.samples().len() * 4);
        for sample in audio.samples() {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }

        if let Err(e) = std::fs::write(&path, bytes) {
            log::error!("failed to write {}: {e}", path.display());
        } else {
            log::info!(
                "narration written to {} ({:.2}s)",
                path.display(),
                audio.duration_secs()
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let prompt: String = {
        let args: Vec<String> = std::env::args().skip(1).collect();
        if args.is_empty() {
            bail!("usage: taleforge \"<prompt>\"");
        }
        args.join(" ")
    };

    let config = AppConfig::load().context("loading settings.toml")?;
    let key = ApiKey::load().context("loading api_key.txt")?;

    let client: Arc<dyn GenerationClient> =
        Arc::new(OpenAiClient::from_config(&config, key.clone()));

    let out_dir = std::env::current_dir()?;
    let mut orchestrator = PipelineOrchestrator::new(client, config, Some(key))
        .with_text_sink(Arc::new(StdoutSink))
        .with_image_sink(Arc::new(FileImageSink {
            path: out_dir.join("generated_image.png"),
        }))
        .with_audio_sink(Arc::new(PcmFileSink { dir: out_dir }));

    orchestrator.subscribe(|event| {
        log::info!("completion ready ({} chars)", event.text.len());
    });

    let report = orchestrator
        .send_request(&prompt)
        .await
        .context("pipeline invocation failed")?;

    log::info!(
        "done — image: {:?}, speech: {:?}",
        report.image,
        report.speech
    );
    Ok(())
}
