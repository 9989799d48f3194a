//! Pipeline state machine.
//!
//! Each user-initiated invocation owns a fresh instance of this state
//! machine; nothing survives across invocations except the credential and
//! static configuration.

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// States of one content-generation invocation.
///
/// The transitions are:
///
/// ```text
/// Idle ──send_request──▶ AwaitingCompletion
///       ──completion ok──▶ CompletionReceived (event emitted here, once)
///          ──fan-out──▶ AwaitingImage ∥ AwaitingSpeech   (concurrent,
///                                                         independent)
///             ──branches settled──▶ Done
///       ──completion err──▶ Failed
/// ```
///
/// `Done` and `Failed` are terminal. Branch failures do not produce
/// `Failed` — they are recorded per branch while the invocation still ends
/// in `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Before the invocation has started.
    Idle,
    /// The text-completion request is in flight.
    AwaitingCompletion,
    /// Completion parsed; the event has been (or is being) emitted.
    CompletionReceived,
    /// The image branch is in flight.
    AwaitingImage,
    /// The speech branch is in flight.
    AwaitingSpeech,
    /// All requested work settled, successfully or per-branch-failed.
    Done,
    /// The root completion call failed; no event was emitted.
    Failed,
}

impl PipelineState {
    /// Terminal states never transition again within an invocation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    /// A short human-readable label for logs and status displays.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::AwaitingCompletion => "AwaitingCompletion",
            PipelineState::CompletionReceived => "CompletionReceived",
            PipelineState::AwaitingImage => "AwaitingImage",
            PipelineState::AwaitingSpeech => "AwaitingSpeech",
            PipelineState::Done => "Done",
            PipelineState::Failed => "Failed",
        }
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        PipelineState::Idle
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_done_and_failed_are_terminal() {
        assert!(PipelineState::Done.is_terminal());
        assert!(PipelineState::Failed.is_terminal());

        for s in [
            PipelineState::Idle,
            PipelineState::AwaitingCompletion,
            PipelineState::CompletionReceived,
            PipelineState::AwaitingImage,
            PipelineState::AwaitingSpeech,
        ] {
            assert!(!s.is_terminal(), "{} must not be terminal", s.label());
        }
    }

    #[test]
    fn labels_are_distinct() {
        let labels = [
            PipelineState::Idle.label(),
            PipelineState::AwaitingCompletion.label(),
            PipelineState::CompletionReceived.label(),
            PipelineState::AwaitingImage.label(),
            PipelineState::AwaitingSpeech.label(),
            PipelineState::Done.label(),
            PipelineState::Failed.label(),
        ];
        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), labels.len());
    }

    #[test]
    fn default_state_is_idle() {
        assert_eq!(PipelineState::default(), PipelineState::Idle);
    }
}
