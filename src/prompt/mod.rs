//! Prompt composition module.
//!
//! Pure functions that merge user input with static style and negative
//! prompt modifiers, plus the truncation policy for the length-constrained
//! image endpoint.

pub mod compose;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use compose::{
    compose_image_prompt, compose_text_prompt, PromptError, TruncationPolicy,
    IMAGE_PROMPT_MAX_CHARS,
};
