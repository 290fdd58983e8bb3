//! Fingerprint extraction: decoding, conditioning, descriptors, and the fixed-length summary.

pub mod audio;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod fingerprint;
pub mod layout;
mod pipeline;
mod preprocess;
pub mod vector;

pub use audio::{AudioBuffer, load_audio};
pub use config::{CHROMA_BINS, DenoiseConfig, FingerprintConfig};
pub use descriptors::{DescriptorFamily, DescriptorMatrix, DescriptorSet, extract_descriptors};
pub use error::FingerprintError;
pub use fingerprint::{Fingerprint, build_fingerprint, expected_fingerprint_len};
pub use layout::layout_tag;
pub use pipeline::{fingerprint_buffer, fingerprint_file, fingerprint_samples};
