//! Prompt composition — merges raw user input with static style and
//! negative-prompt modifiers into the final request strings.
//!
//! Two composers exist:
//! * [`compose_text_prompt`] — user input + theme instructions + negative
//!   prompt, sent to the chat endpoint. Unbounded length.
//! * [`compose_image_prompt`] — completion text + art style + negative
//!   prompt, sent to the image endpoint, which enforces a 1000-character
//!   ceiling. Over-long prompts are cut back to a whitespace boundary (or
//!   rejected, depending on [`TruncationPolicy`]).
//!
//! Both are pure functions of their inputs: no locale-dependent string
//! operations, identical output for identical input. Escaping is not
//! performed here — that happens at the transport boundary when the wire
//! body is serialised.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard ceiling the image endpoint places on prompt length, in characters.
pub const IMAGE_PROMPT_MAX_CHARS: usize = 1000;

// ---------------------------------------------------------------------------
// PromptError
// ---------------------------------------------------------------------------

/// Errors from prompt composition.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The composed image prompt exceeds the ceiling and the configured
    /// policy is [`TruncationPolicy::Reject`].
    #[error("image prompt too long: {len} characters (limit {limit})")]
    PromptTooLong { len: usize, limit: usize },
}

// ---------------------------------------------------------------------------
// TruncationPolicy
// ---------------------------------------------------------------------------

/// What to do when a composed image prompt exceeds
/// [`IMAGE_PROMPT_MAX_CHARS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TruncationPolicy {
    /// Cut at the ceiling, then trim back to the last whitespace boundary so
    /// no token is split. The trim is silent apart from a warning log.
    TruncateAtWhitespace,
    /// Refuse over-long prompts with [`PromptError::PromptTooLong`].
    Reject,
}

impl Default for TruncationPolicy {
    fn default() -> Self {
        Self::TruncateAtWhitespace
    }
}

// ---------------------------------------------------------------------------
// Composers
// ---------------------------------------------------------------------------

/// Compose the chat prompt sent to the text-completion endpoint.
///
/// Output shape: `{user_input}. {theme_instructions}. NEGATIVE PROMPT -
/// {negative_prompt}`
///
/// ```rust
/// use taleforge::prompt::compose_text_prompt;
///
/// let p = compose_text_prompt("A lone tower", "dark fantasy", "no color");
/// assert_eq!(p, "A lone tower. dark fantasy. NEGATIVE PROMPT - no color");
/// ```
pub fn compose_text_prompt(
    user_input: &str,
    theme_instructions: &str,
    negative_prompt: &str,
) -> String {
    format!("{user_input}. {theme_instructions}. NEGATIVE PROMPT - {negative_prompt}")
}

/// Compose the prompt sent to the image-generation endpoint, applying the
/// 1000-character truncation policy.
///
/// Output shape before truncation: `{completion}. {art_style}. NEGATIVE
/// PROMPT = {negative_prompt}` (note the `=` marker — the image endpoint
/// historically uses a different marker than the text endpoint).
///
/// # Errors
///
/// [`PromptError::PromptTooLong`] only under [`TruncationPolicy::Reject`];
/// the default policy absorbs over-length silently.
pub fn compose_image_prompt(
    completion: &str,
    art_style: &str,
    negative_prompt: &str,
    policy: TruncationPolicy,
) -> Result<String, PromptError> {
    let combined = format!("{completion}. {art_style}. NEGATIVE PROMPT = {negative_prompt}");

    let char_count = combined.chars().count();
    if char_count <= IMAGE_PROMPT_MAX_CHARS {
        return Ok(combined);
    }

    if policy == TruncationPolicy::Reject {
        return Err(PromptError::PromptTooLong {
            len: char_count,
            limit: IMAGE_PROMPT_MAX_CHARS,
        });
    }

    log::warn!(
        "image prompt exceeds {IMAGE_PROMPT_MAX_CHARS} characters ({char_count}) — truncating"
    );

    Ok(truncate_at_whitespace(&combined, IMAGE_PROMPT_MAX_CHARS))
}

/// Cut `text` at `max_chars` characters, then trim back to the last
/// whitespace boundary at or before the cut. When no whitespace exists
/// before the cut, the hard cut stands.
fn truncate_at_whitespace(text: &str, max_chars: usize) -> String {
    let mut cut: String = text.chars().take(max_chars).collect();

    // rfind returns a byte index that is always a char boundary (the start
    // of the whitespace char), so truncate() cannot split a code point.
    if let Some(idx) = cut.rfind(char::is_whitespace) {
        if idx > 0 {
            cut.truncate(idx);
        }
    }
    cut
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- compose_text_prompt ----

    #[test]
    fn text_prompt_matches_documented_shape() {
        let p = compose_text_prompt("A lone tower", "dark fantasy", "no color");
        assert_eq!(p, "A lone tower. dark fantasy. NEGATIVE PROMPT - no color");
    }

    #[test]
    fn text_prompt_is_deterministic() {
        let a = compose_text_prompt("input", "theme", "neg");
        let b = compose_text_prompt("input", "theme", "neg");
        assert_eq!(a, b);
    }

    #[test]
    fn text_prompt_preserves_embedded_punctuation() {
        let p = compose_text_prompt("Say \"hello\"", "theme", "neg");
        assert!(p.starts_with("Say \"hello\". "));
    }

    // ---- compose_image_prompt: under the ceiling ----

    #[test]
    fn short_image_prompt_is_unmodified_concatenation() {
        let p = compose_image_prompt(
            "A ruined keep",
            "in the style of a pencil sketch",
            "ENSURE NO TEXT",
            TruncationPolicy::default(),
        )
        .unwrap();
        assert_eq!(
            p,
            "A ruined keep. in the style of a pencil sketch. NEGATIVE PROMPT = ENSURE NO TEXT"
        );
    }

    #[test]
    fn exactly_at_limit_passes_through() {
        // Build a completion such that the combined prompt is exactly 1000
        // characters: suffix is ". s. NEGATIVE PROMPT = n" (24 chars).
        let completion = "x".repeat(IMAGE_PROMPT_MAX_CHARS - 24);
        let p = compose_image_prompt(&completion, "s", "n", TruncationPolicy::default()).unwrap();
        assert_eq!(p.chars().count(), IMAGE_PROMPT_MAX_CHARS);
        assert!(p.ends_with("NEGATIVE PROMPT = n"));
    }

    // ---- compose_image_prompt: over the ceiling ----

    #[test]
    fn long_prompt_is_cut_at_whitespace_boundary() {
        // Many space-separated words, far beyond the ceiling.
        let completion = "word ".repeat(400); // 2000 chars
        let p = compose_image_prompt(&completion, "style", "neg", TruncationPolicy::default())
            .unwrap();

        assert!(p.chars().count() <= IMAGE_PROMPT_MAX_CHARS);
        // Must not end mid-token: the char at the cut position in the source
        // was whitespace, so the result ends with a complete word.
        assert!(p.ends_with("word"));
        assert!(!p.ends_with(' '));
    }

    #[test]
    fn no_whitespace_means_hard_cut() {
        let completion = "x".repeat(2000);
        let p = compose_image_prompt(&completion, "y", "z", TruncationPolicy::default()).unwrap();
        // "xxxx…. y. NEGATIVE PROMPT = z" — first whitespace appears after
        // position 1000 only when the run of x's is shorter than the cut;
        // here the first 1000 chars are all 'x', so the hard cut stands.
        assert_eq!(p.chars().count(), IMAGE_PROMPT_MAX_CHARS);
        assert!(p.chars().all(|c| c == 'x'));
    }

    #[test]
    fn truncation_is_char_based_not_byte_based() {
        // 4-byte scorpions: a byte-based cut at 1000 would land mid-scorpion.
        let completion = "\u{1F982} ".repeat(600);
        let p = compose_image_prompt(&completion, "s", "n", TruncationPolicy::default()).unwrap();
        assert!(p.chars().count() <= IMAGE_PROMPT_MAX_CHARS);
        // Still valid UTF-8 by construction; ensure the tail is a whole char.
        assert!(p.ends_with('\u{1F982}'));
    }

    #[test]
    fn reject_policy_surfaces_prompt_too_long() {
        let completion = "word ".repeat(400);
        let err = compose_image_prompt(&completion, "s", "n", TruncationPolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, PromptError::PromptTooLong { limit: 1000, .. }));
    }

    #[test]
    fn truncation_is_deterministic() {
        let completion = "lorem ipsum dolor ".repeat(100);
        let a = compose_image_prompt(&completion, "s", "n", TruncationPolicy::default()).unwrap();
        let b = compose_image_prompt(&completion, "s", "n", TruncationPolicy::default()).unwrap();
        assert_eq!(a, b);
    }
}
