//! Response extraction — pure, synchronous, side-effect-free.
//!
//! Each function pulls the single typed result out of a parsed response
//! body and fails with [`ParseError::MalformedResponse`] when the shape is
//! unexpected. No network calls, no shared state.

use thiserror::Error;

use super::wire::{ChatResponse, ImageResponse};

// ---------------------------------------------------------------------------
// ParseError
// ---------------------------------------------------------------------------

/// The response document did not have the expected shape.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("malformed response: {0}")]
    MalformedResponse(&'static str),
}

// ---------------------------------------------------------------------------
// Extractors
// ---------------------------------------------------------------------------

/// Extract the completion text: `choices[0].message.content`, trimmed.
///
/// # Errors
///
/// [`ParseError::MalformedResponse`] when the `choices` sequence is empty or
/// absent, or the content is empty after trimming.
pub fn completion_text(response: &ChatResponse) -> Result<String, ParseError> {
    let choice = response
        .choices
        .first()
        .ok_or(ParseError::MalformedResponse("empty or absent choices sequence"))?;

    let content = choice.message.content.trim();
    if content.is_empty() {
        return Err(ParseError::MalformedResponse("empty completion content"));
    }
    Ok(content.to_string())
}

/// Extract the generated image URL: `data[0].url`.
///
/// # Errors
///
/// [`ParseError::MalformedResponse`] when the `data` sequence is empty or
/// absent, or the URL is empty.
pub fn image_url(response: &ImageResponse) -> Result<String, ParseError> {
    let datum = response
        .data
        .first()
        .ok_or(ParseError::MalformedResponse("empty or absent data sequence"))?;

    if datum.url.is_empty() {
        return Err(ParseError::MalformedResponse("empty image URL"));
    }
    Ok(datum.url.clone())
}

// Speech responses are a raw byte payload; there is nothing to extract here.
// Container validation is the WAV decoder's job.

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(json: &str) -> ChatResponse {
        serde_json::from_str(json).expect("fixture must deserialise")
    }

    fn image(json: &str) -> ImageResponse {
        serde_json::from_str(json).expect("fixture must deserialise")
    }

    // ---- completion_text ----

    #[test]
    fn extracts_first_choice_content() {
        let resp = chat(
            r#"{"choices":[
                {"message":{"role":"assistant","content":" The tower stood. "}},
                {"message":{"role":"assistant","content":"second"}}
            ]}"#,
        );
        assert_eq!(completion_text(&resp).unwrap(), "The tower stood.");
    }

    #[test]
    fn empty_choices_is_malformed() {
        let resp = chat(r#"{"choices":[]}"#);
        assert!(matches!(
            completion_text(&resp).unwrap_err(),
            ParseError::MalformedResponse(_)
        ));
    }

    #[test]
    fn absent_choices_is_malformed() {
        let resp = chat("{}");
        assert!(completion_text(&resp).is_err());
    }

    #[test]
    fn whitespace_only_content_is_malformed() {
        let resp = chat(r#"{"choices":[{"message":{"role":"assistant","content":"  \n "}}]}"#);
        assert!(completion_text(&resp).is_err());
    }

    // ---- image_url ----

    #[test]
    fn extracts_first_image_url() {
        let resp = image(r#"{"data":[{"url":"https://img.example/1.png"},{"url":"x"}]}"#);
        assert_eq!(image_url(&resp).unwrap(), "https://img.example/1.png");
    }

    #[test]
    fn empty_data_is_malformed() {
        let resp = image(r#"{"data":[]}"#);
        assert!(image_url(&resp).is_err());
    }

    #[test]
    fn empty_url_is_malformed() {
        let resp = image(r#"{"data":[{"url":""}]}"#);
        assert!(image_url(&resp).is_err());
    }

    /// Extraction is a pure function: same input, same output, no mutation.
    #[test]
    fn extraction_is_idempotent() {
        let resp = chat(r#"{"choices":[{"message":{"role":"assistant","content":"stable"}}]}"#);
        assert_eq!(completion_text(&resp).unwrap(), completion_text(&resp).unwrap());
    }
}
