use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use remixid::analysis::{Fingerprint, FingerprintConfig, expected_fingerprint_len, layout_tag};
use remixid::catalog::{InMemoryCatalog, TrackMetadata};
use remixid::matching::{MatchSettings, match_fingerprint};

const CATALOG_SIZES: [usize; 2] = [256, 4_096];

/// Deterministic pseudo-random fingerprint values.
fn synthetic_values(seed: u64, len: usize) -> Vec<f32> {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            ((state >> 40) as f32 / (1u64 << 24) as f32) * 2.0 - 1.0
        })
        .collect()
}

fn setup_catalog(size: usize, config: &FingerprintConfig) -> InMemoryCatalog {
    let layout = layout_tag(config);
    let len = expected_fingerprint_len(config);
    let mut catalog = InMemoryCatalog::new();
    for i in 0..size {
        catalog.insert(
            TrackMetadata::new(format!("track {i}"), "bench"),
            Fingerprint::new(layout.clone(), synthetic_values(i as u64, len)),
        );
    }
    catalog
}

fn bench_scoring(c: &mut Criterion) {
    let config = FingerprintConfig::default();
    let query = Fingerprint::new(
        layout_tag(&config),
        synthetic_values(u64::MAX, expected_fingerprint_len(&config)),
    );
    let serial = MatchSettings {
        parallel_min_entries: usize::MAX,
        ..MatchSettings::default()
    };
    let parallel = MatchSettings {
        parallel_min_entries: 1,
        ..MatchSettings::default()
    };
    let mut group = c.benchmark_group("match_fingerprint");
    for size in CATALOG_SIZES {
        let catalog = setup_catalog(size, &config);
        for (name, settings) in [("serial", &serial), ("parallel", &parallel)] {
            group.bench_with_input(BenchmarkId::new(name, size), &catalog, |b, catalog| {
                b.iter(|| {
                    match_fingerprint(black_box(&query), catalog, settings)
                        .expect("match_fingerprint");
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_scoring);
criterion_main!(benches);
