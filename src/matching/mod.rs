//! Ranks catalog entries against a query fingerprint.

mod score;
mod select;

use std::path::PathBuf;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::Fingerprint;
use crate::catalog::{CatalogEntry, CatalogError, CatalogSource, TrackId};
use crate::config::defaults::{
    default_cosine_weight, default_euclidean_weight, default_max_results,
    default_parallel_min_entries, default_threshold,
};

pub use score::{BlendWeights, UnitVector, blended_score};
pub use select::select_matches;

/// Scoring knobs shared by every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSettings {
    /// Minimum blended score for a result to be reported.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default = "default_cosine_weight")]
    pub cosine_weight: f32,
    #[serde(default = "default_euclidean_weight")]
    pub euclidean_weight: f32,
    /// Result cap.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Catalog size at which scoring fans out across the rayon pool.
    #[serde(default = "default_parallel_min_entries")]
    pub parallel_min_entries: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            cosine_weight: default_cosine_weight(),
            euclidean_weight: default_euclidean_weight(),
            max_results: default_max_results(),
            parallel_min_entries: default_parallel_min_entries(),
        }
    }
}

impl MatchSettings {
    /// Clamp the threshold into `[0, 1]` and rescale the weights to sum to 1.
    pub fn normalized(mut self) -> Self {
        self.threshold = if self.threshold.is_finite() {
            self.threshold.clamp(0.0, 1.0)
        } else {
            default_threshold()
        };
        let clean = |w: f32| if w.is_finite() { w.max(0.0) } else { 0.0 };
        let cosine = clean(self.cosine_weight);
        let euclidean = clean(self.euclidean_weight);
        let total = cosine + euclidean;
        if total <= 0.0 {
            self.cosine_weight = default_cosine_weight();
            self.euclidean_weight = default_euclidean_weight();
        } else if (total - 1.0).abs() > 1e-6 {
            self.cosine_weight = cosine / total;
            self.euclidean_weight = euclidean / total;
        } else {
            self.cosine_weight = cosine;
            self.euclidean_weight = euclidean;
        }
        self.max_results = self.max_results.max(1);
        self
    }

    pub fn weights(&self) -> BlendWeights {
        BlendWeights {
            cosine: f64::from(self.cosine_weight),
            euclidean: f64::from(self.euclidean_weight),
        }
    }
}

/// One reported match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub score: f32,
    /// Source file of the matched track, filled in by callers that look it up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
}

/// Why a catalog entry was left out of scoring.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryRejection {
    #[error("fingerprint has {found} values, query has {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("fingerprint layout {found} differs from query layout {expected}")]
    LayoutMismatch { expected: String, found: String },
    #[error("fingerprint has zero norm")]
    DegenerateVector,
}

/// A skipped entry and the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    pub id: TrackId,
    pub reason: EntryRejection,
}

/// Outcome of one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchReport {
    /// Best first, at or above the threshold.
    pub matches: Vec<MatchResult>,
    /// Entries excluded before scoring, in catalog order.
    pub rejected: Vec<RejectedEntry>,
    /// Number of entries read from the catalog.
    pub scanned: usize,
    /// True when the query itself had zero norm and nothing was scored.
    pub degenerate_query: bool,
}

/// Errors that stop a query before any entry is scored.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("The catalog is empty; index some tracks first")]
    EmptyCatalog,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Score every catalog entry against `query` and keep the best matches.
///
/// Entries whose fingerprint cannot be compared are reported in
/// [`MatchReport::rejected`]; they never fail the query. A silent query yields an
/// empty report.
pub fn match_fingerprint(
    query: &Fingerprint,
    catalog: &dyn CatalogSource,
    settings: &MatchSettings,
) -> Result<MatchReport, MatchError> {
    let entries = catalog.enumerate()?;
    if entries.is_empty() {
        return Err(MatchError::EmptyCatalog);
    }
    let scanned = entries.len();
    let Some(query_unit) = UnitVector::new(query.values()) else {
        info!(scanned, "Query fingerprint has zero norm; nothing to match");
        return Ok(MatchReport {
            scanned,
            degenerate_query: true,
            ..MatchReport::default()
        });
    };
    let weights = settings.weights();
    let score_one = |entry: &CatalogEntry| score_entry(query, &query_unit, entry, weights);
    let outcomes: Vec<Result<f32, EntryRejection>> =
        if entries.len() >= settings.parallel_min_entries {
            entries.par_iter().map(score_one).collect()
        } else {
            entries.iter().map(score_one).collect()
        };

    let mut scored = Vec::with_capacity(entries.len());
    let mut rejected = Vec::new();
    for (entry, outcome) in entries.into_iter().zip(outcomes) {
        match outcome {
            Ok(score) => scored.push(MatchResult {
                id: entry.id,
                title: entry.title,
                artist: entry.artist,
                score,
                file_path: None,
            }),
            Err(reason) => {
                debug!(id = entry.id, "Skipping catalog entry: {reason}");
                rejected.push(RejectedEntry {
                    id: entry.id,
                    reason,
                });
            }
        }
    }
    let matches = select_matches(scored, settings.threshold, settings.max_results);
    debug!(
        scanned,
        rejected = rejected.len(),
        matches = matches.len(),
        "Scored catalog"
    );
    Ok(MatchReport {
        matches,
        rejected,
        scanned,
        degenerate_query: false,
    })
}

fn score_entry(
    query: &Fingerprint,
    query_unit: &UnitVector,
    entry: &CatalogEntry,
    weights: BlendWeights,
) -> Result<f32, EntryRejection> {
    if entry.fingerprint.len() != query.len() {
        return Err(EntryRejection::DimensionMismatch {
            expected: query.len(),
            found: entry.fingerprint.len(),
        });
    }
    if entry.fingerprint.layout() != query.layout() {
        return Err(EntryRejection::LayoutMismatch {
            expected: query.layout().to_string(),
            found: entry.fingerprint.layout().to_string(),
        });
    }
    let candidate =
        UnitVector::new(entry.fingerprint.values()).ok_or(EntryRejection::DegenerateVector)?;
    Ok(blended_score(query_unit, &candidate, weights))
}
