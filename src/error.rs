//! Error types surfaced by the classification pipeline and the capture session.

use thiserror::Error;

/// Failures of a single classification request.
///
/// Every variant leaves the pipeline ready for the next request.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The engine has not finished loading. Nothing was run.
    #[error("engine not ready")]
    EngineNotReady,

    /// The engine failed to load and will not become ready. Nothing was run.
    #[error("engine failed to load: {0}")]
    EngineFailed(String),

    /// The engine ran and failed, or produced output that could not be read.
    #[error("inference")]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The chosen file is not a decodable image.
    #[error("image decode")]
    ImageDecode(#[source] image::ImageError),
}

impl ClassifyError {
    pub fn engine(message: impl Into<String>) -> Self {
        ClassifyError::Engine(message.into().into())
    }
}

/// Failures of the capture session.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The device refused or failed to deliver a stream. The session is back to Idle.
    #[error("capture unavailable")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The operation was requested in a state that does not allow it.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
}
