// Error types for the snap-up flow engine

use thiserror::Error;

use crate::classify::LogicalState;

/// Result type alias for snap-up operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a checkout flow
#[derive(Debug, Error)]
pub enum Error {
    /// An expected DOM element never attached within its wait timeout
    ///
    /// Includes the selector that was used to locate the element.
    /// Handlers that treat the element as optional recover from this
    /// locally; otherwise the driver logs it and re-classifies on the
    /// next iteration.
    #[error("Element not found: selector '{0}'")]
    ElementNotFound(String),

    /// The current URL matches no pattern in the classification table
    ///
    /// Fatal: the flow cannot tell which checkout step is displayed,
    /// so the driver terminates the run with the offending URL recorded.
    #[error("URL matches no known checkout stage: '{url}'")]
    UnknownUrl { url: String },

    /// The global wall-clock budget for the whole flow expired
    ///
    /// Fatal, and distinct from an unknown-URL abort. Carries the last
    /// state the classifier reported so a stuck run can be diagnosed.
    #[error("Flow timed out after {budget_secs}s (last state: {last_state:?})")]
    FlowTimeout {
        last_state: LogicalState,
        budget_secs: u64,
    },

    /// The final payment submit control never attached
    ///
    /// Non-fatal: checkout may have already completed via redirect, so
    /// the run is reported as indeterminate rather than failed.
    #[error("Submit control never attached; order state is indeterminate")]
    SubmitTimeout,

    /// Page navigation failed
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// The browser driver reported a failure the engine cannot interpret
    #[error("Probe error: {0}")]
    Probe(String),

    /// Per-run purchase criteria are unusable (e.g. zero quantity)
    #[error("Invalid purchase criteria: {0}")]
    InvalidCriteria(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// True for errors that end the run (unknown URL, flow timeout)
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::UnknownUrl { .. } | Error::FlowTimeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_preserves_source() {
        let err = Error::ElementNotFound(".ticket-unit".into()).context("ticket scan");
        assert_eq!(
            err.to_string(),
            "ticket scan: Element not found: selector '.ticket-unit'"
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn fatal_classification() {
        assert!(Error::UnknownUrl { url: "https://example.com/".into() }.is_fatal());
        assert!(
            Error::FlowTimeout {
                last_state: LogicalState::TicketSelection,
                budget_secs: 2700,
            }
            .is_fatal()
        );
        assert!(!Error::SubmitTimeout.is_fatal());
    }
}
