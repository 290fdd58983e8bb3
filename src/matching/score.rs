//! Blended cosine/Euclidean similarity on L2-normalized fingerprints.
//!
//! Arithmetic runs in `f64`; fingerprints mix values spanning several orders of
//! magnitude and self-similarity must land on 1.0.

/// Fingerprint values scaled to unit length.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitVector(Vec<f64>);

impl UnitVector {
    /// Normalize `values`; `None` when the norm is zero or not finite.
    pub fn new(values: &[f32]) -> Option<Self> {
        let sum: f64 = values.iter().map(|&v| f64::from(v) * f64::from(v)).sum();
        if !sum.is_finite() || sum <= 0.0 {
            return None;
        }
        let norm = sum.sqrt();
        Some(Self(values.iter().map(|&v| f64::from(v) / norm).collect()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Blend weights applied to the two similarity terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    pub cosine: f64,
    pub euclidean: f64,
}

/// `cosine·cos + euclidean/(1 + d)` clamped to `[0, 1]`.
///
/// Both vectors must have the same length.
pub fn blended_score(query: &UnitVector, candidate: &UnitVector, weights: BlendWeights) -> f32 {
    let mut dot = 0.0_f64;
    let mut dist_sq = 0.0_f64;
    for (&a, &b) in query.as_slice().iter().zip(candidate.as_slice()) {
        dot += a * b;
        let diff = a - b;
        dist_sq += diff * diff;
    }
    let euclid_sim = 1.0 / (1.0 + dist_sq.sqrt());
    let score = weights.cosine * dot.clamp(-1.0, 1.0) + weights.euclidean * euclid_sim;
    score.clamp(0.0, 1.0) as f32
}
