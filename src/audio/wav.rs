//! Raw WAV container decoding — byte buffer in, normalized PCM out.
//!
//! [`decode`] accepts a byte stream claiming to be a canonical
//! RIFF/WAVE/fmt/data container with 16-bit PCM samples and produces a
//! [`DecodedAudio`] with samples normalized to `[-1, 1]`. Every tag is
//! validated against the buffer rather than assumed from a fixed offset
//! table, so truncated or mislabeled input fails with
//! [`WavError::InvalidContainer`] instead of panicking or returning garbage.
//!
//! Out of scope: extended chunk layouts (`LIST`, `cue `, multiple `data`
//! chunks), compressed codecs, bit depths other than 16. A `fmt ` chunk
//! longer than the 16 fixed bytes has its extension skipped so that the
//! `data` tag check that follows stays meaningful.

use thiserror::Error;

// ---------------------------------------------------------------------------
// WavError
// ---------------------------------------------------------------------------

/// Error produced when a byte buffer is not a decodable WAV container.
///
/// The message names the exact validation step that failed.
#[derive(Debug, Clone, Error)]
pub enum WavError {
    #[error("invalid WAV container: {0}")]
    InvalidContainer(String),
}

impl WavError {
    fn at(step: impl Into<String>) -> Self {
        WavError::InvalidContainer(step.into())
    }
}

// ---------------------------------------------------------------------------
// DecodedAudio
// ---------------------------------------------------------------------------

/// Validated, normalized PCM audio.
///
/// Only constructible through [`decode`]; a buffer whose header fields fail
/// validation never yields a partially-populated value. Immutable after
/// creation.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    channels: u16,
    sample_rate: u32,
    samples: Vec<f32>,
}

impl DecodedAudio {
    /// Channel count declared by the format chunk.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Sample rate in Hz declared by the format chunk.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Interleaved samples, each in `[-1, 1]`.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Consume the decoded audio, yielding the sample buffer.
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Duration in seconds, derived from sample count, channels and rate.
    pub fn duration_secs(&self) -> f32 {
        if self.channels == 0 || self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.channels as f32 / self.sample_rate as f32
    }
}

// ---------------------------------------------------------------------------
// Byte cursor
// ---------------------------------------------------------------------------

/// Forward-only cursor over the input buffer. Every read is bounds-checked
/// so truncated input surfaces as an error at the step that ran out.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8], WavError> {
        let end = self.pos.checked_add(n).ok_or_else(|| {
            WavError::at(format!("{what}: length overflow"))
        })?;
        if end > self.bytes.len() {
            return Err(WavError::at(format!(
                "truncated while reading {what} (need {n} bytes at offset {}, have {})",
                self.pos,
                self.bytes.len() - self.pos
            )));
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn expect_tag(&mut self, tag: &[u8; 4], what: &str) -> Result<(), WavError> {
        let found = self.take(4, what)?;
        if found != tag {
            return Err(WavError::at(format!(
                "expected {what} tag {:?}, found {:?}",
                String::from_utf8_lossy(tag),
                String::from_utf8_lossy(found)
            )));
        }
        Ok(())
    }

    fn u16_le(&mut self, what: &str) -> Result<u16, WavError> {
        let b = self.take(2, what)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32_le(&mut self, what: &str) -> Result<u32, WavError> {
        let b = self.take(4, what)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

// ---------------------------------------------------------------------------
// decode
// ---------------------------------------------------------------------------

/// Parse a WAV byte buffer into validated, normalized PCM.
///
/// Layout consumed, in order:
///
/// ```text
/// "RIFF" <u32 chunk size> "WAVE"
/// "fmt " <u32 size ≥ 16> <format> <channels> <rate> <byte rate>
///        <block align> <bits/sample> [skipped extension]
/// "data" <u32 size> <size bytes of LE i16 payload>
/// ```
///
/// Each payload pair becomes one `f32` via `i16 / 32768.0`; a trailing odd
/// byte is discarded, so the output holds exactly `payload_len / 2` samples.
///
/// # Errors
///
/// [`WavError::InvalidContainer`] on any tag mismatch, a `fmt ` chunk
/// shorter than 16 bytes, or a buffer that ends before a declared read.
pub fn decode(bytes: &[u8]) -> Result<DecodedAudio, WavError> {
    let mut cur = Cursor::new(bytes);

    // RIFF header.
    cur.expect_tag(b"RIFF", "RIFF header")?;
    let _chunk_size = cur.u32_le("RIFF chunk size")?;
    cur.expect_tag(b"WAVE", "WAVE form type")?;

    // Format sub-chunk.
    cur.expect_tag(b"fmt ", "fmt chunk")?;
    let fmt_size = cur.u32_le("fmt chunk size")? as usize;
    if fmt_size < 16 {
        return Err(WavError::at(format!(
            "fmt chunk too small: {fmt_size} bytes (need 16)"
        )));
    }

    let audio_format = cur.u16_le("audio format")?;
    let channels = cur.u16_le("channel count")?;
    let sample_rate = cur.u32_le("sample rate")?;
    let _byte_rate = cur.u32_le("byte rate")?;
    let _block_align = cur.u16_le("block align")?;
    let bits_per_sample = cur.u16_le("bits per sample")?;

    if audio_format != 1 || bits_per_sample != 16 {
        log::warn!(
            "wav: format {audio_format}, {bits_per_sample} bits/sample — decoder assumes \
             16-bit PCM, output may be garbage"
        );
    }

    // Skip any fmt extension so the data tag check below stays honest.
    if fmt_size > 16 {
        cur.take(fmt_size - 16, "fmt chunk extension")?;
    }

    // Data sub-chunk.
    cur.expect_tag(b"data", "data chunk")?;
    let data_size = cur.u32_le("data chunk size")? as usize;
    let payload = cur.take(data_size, "sample payload")?;

    // LE i16 pairs → normalized f32. chunks_exact drops a trailing odd byte.
    let samples: Vec<f32> = payload
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect();

    log::debug!(
        "wav: decoded {} samples, {} ch @ {} Hz",
        samples.len(),
        channels,
        sample_rate
    );

    Ok(DecodedAudio {
        channels,
        sample_rate,
        samples,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
