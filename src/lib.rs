//! Remix-tolerant track identification: fingerprint reference tracks into a catalog,
//! then rank the catalog against unknown clips.
/// Decoding, descriptor extraction, and fingerprint building.
pub mod analysis;
/// App data directory resolution.
pub mod app_dirs;
/// Reference track storage.
pub mod catalog;
/// Persisted settings.
pub mod config;
/// Library indexing.
pub mod ingest;
/// Tracing setup for the binary.
pub mod logging;
/// Similarity scoring and ranking.
pub mod matching;
/// One-shot identification of files and uploads.
pub mod query;
