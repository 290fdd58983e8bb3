use ndarray::Axis;
use serde::{Deserialize, Serialize};

use super::config::FingerprintConfig;
use super::descriptors::{DescriptorFamily, DescriptorSet};
use super::layout::layout_tag;

/// Fixed-length summary of a track: per-row means then per-row standard deviations of
/// every descriptor family, in canonical family order.
///
/// Values stay in natural units; normalization is left to the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint {
    layout: String,
    values: Vec<f32>,
}

impl Fingerprint {
    pub fn new(layout: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            layout: layout.into(),
            values,
        }
    }

    /// All-zero fingerprint with the layout of `config`.
    pub fn silent(config: &FingerprintConfig) -> Self {
        Self::new(
            layout_tag(config),
            vec![0.0; expected_fingerprint_len(config)],
        )
    }

    pub fn layout(&self) -> &str {
        &self.layout
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}

/// Length of every fingerprint built under `config`.
pub fn expected_fingerprint_len(config: &FingerprintConfig) -> usize {
    DescriptorFamily::ALL
        .iter()
        .map(|family| 2 * family.rows(config))
        .sum()
}

/// Collapse every descriptor matrix into row statistics.
pub fn build_fingerprint(set: &DescriptorSet, config: &FingerprintConfig) -> Fingerprint {
    let mut values = Vec::with_capacity(expected_fingerprint_len(config));
    for matrix in set.matrices() {
        let rows = matrix.values.nrows();
        match matrix.values.mean_axis(Axis(1)) {
            Some(means) => values.extend(means.iter().copied()),
            None => values.extend(std::iter::repeat_n(0.0, rows)),
        }
        if matrix.values.ncols() == 0 {
            values.extend(std::iter::repeat_n(0.0, rows));
        } else {
            values.extend(matrix.values.std_axis(Axis(1), 0.0).iter().copied());
        }
    }
    Fingerprint::new(layout_tag(config), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::descriptors::DescriptorMatrix;
    use ndarray::array;

    #[test]
    fn rows_contribute_means_then_population_stds() {
        let config = FingerprintConfig::default();
        let set = DescriptorSet::new(
            2,
            vec![
                DescriptorMatrix {
                    family: DescriptorFamily::Rolloff,
                    values: array![[1.0_f32, 3.0]],
                },
                DescriptorMatrix {
                    family: DescriptorFamily::Chroma,
                    values: array![[2.0_f32, 2.0], [0.0, 4.0]],
                },
            ],
        );
        let fp = build_fingerprint(&set, &config);
        assert_eq!(fp.values(), &[2.0, 1.0, 2.0, 2.0, 0.0, 2.0]);
        assert_eq!(fp.layout(), layout_tag(&config));
    }

    #[test]
    fn default_layout_length_matches_family_rows() {
        let config = FingerprintConfig::default();
        let expected = 2 * (3 * 13 + 12 + 7 + 256 + 3 + 384);
        assert_eq!(expected_fingerprint_len(&config), expected);
        assert_eq!(Fingerprint::silent(&config).len(), expected);
    }

    #[test]
    fn silent_fingerprint_is_all_zero_with_current_layout() {
        let config = FingerprintConfig::default();
        let fp = Fingerprint::silent(&config);
        assert_eq!(fp.layout(), layout_tag(&config));
        assert!(fp.values().iter().all(|&v| v == 0.0));
    }
}
