use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open source {0}: {1}")]
    Open(String, String),
    #[error("camera not found: {0}")]
    NotFound(String),
    #[error("no frame available")]
    NoFrame,
    #[error("backend error: {0}")]
    Backend(String),
}

/// Outcome of a single device read that did not yield a frame.
///
/// `Transient` is a dropped frame or momentary hiccup; the capture loop
/// retries indefinitely. `Fatal` means the device is gone and the loop
/// must terminate.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("transient read failure: {0}")]
    Transient(String),
    #[error("device failure: {0}")]
    Fatal(String),
}
