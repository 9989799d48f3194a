//! Presentation-side collaborator traits.
//!
//! The pipeline is agnostic to how results are shown: a text display, an
//! image-bytes-to-texture loader, an audio playback device — all live
//! behind these seams as `Arc<dyn …>`. Error messages travel through the
//! same [`TextSink`] that carries success text, so a failure is never a
//! silent no-op.

use crate::audio::DecodedAudio;

/// Receives the completion text — and any branch error messages.
pub trait TextSink: Send + Sync {
    fn display(&self, text: &str);
}

/// Receives the encoded bytes of a generated image. Decoding to a
/// renderable texture is the sink's concern, not the pipeline's.
pub trait ImageSink: Send + Sync {
    fn present(&self, bytes: &[u8]);
}

/// Receives decoded, normalized audio for playback.
pub trait AudioSink: Send + Sync {
    fn play(&self, audio: DecodedAudio);
}

// Compile-time assertions: all three must stay object-safe.
const _: fn() = || {
    fn _text(_: Box<dyn TextSink>) {}
    fn _image(_: Box<dyn ImageSink>) {}
    fn _audio(_: Box<dyn AudioSink>) {}
};
