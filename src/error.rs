use std::io;
use thiserror::Error;

/// Errors that can abort a single proxy request.
///
/// Every failure is terminal for the request that hit it: there is no retry
/// or partial output anywhere in the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid numeric value: {0}")]
    InvalidNumber(String),

    #[error("Invalid amount of size parameters: {0}")]
    MalformedResize(String),

    #[error("Invalid size option given: {0}")]
    InvalidResize(String),

    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Transformation failed: {0}")]
    Transform(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
