//! OpenAI generation endpoints — wire types, response parsing, client.
//!
//! * [`GenerationClient`] — async trait the pipeline depends on.
//! * [`OpenAiClient`] — production reqwest implementation.
//! * [`wire`] — serde request/response bodies (the escaping boundary).
//! * [`parse`] — pure extraction of completion text and image URL.

pub mod client;
pub mod parse;
pub mod wire;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ClientError, GenerationClient, OpenAiClient};
pub use parse::ParseError;
