//! Audio module — WAV container decoding for the speech branch.
//!
//! ```text
//! synthesized bytes → wav::decode → DecodedAudio → playback sink
//! ```

pub mod wav;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use wav::{decode, DecodedAudio, WavError};
