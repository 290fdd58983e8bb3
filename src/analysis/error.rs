use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures that end a single fingerprinting pipeline.
///
/// None of these are retried: the input itself is defective and the caller rejects it.
#[derive(Debug, Error)]
pub enum FingerprintError {
    /// The source could not be opened, probed, or decoded.
    #[error("Audio decode failed for {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    /// Decoding did not finish before the configured deadline.
    #[error("Audio decode for {path} exceeded {timeout:?}")]
    DecodeTimeout { path: PathBuf, timeout: Duration },
    /// The buffer is empty or shorter than one analysis frame.
    #[error("Insufficient signal: {samples} samples, need at least {frame_size}")]
    InsufficientSignal { samples: usize, frame_size: usize },
    /// Extraction parameters are unusable.
    #[error("Invalid fingerprint configuration: {0}")]
    InvalidConfig(String),
}

impl FingerprintError {
    pub(crate) fn decode(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
