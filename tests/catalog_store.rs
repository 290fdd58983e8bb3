mod support;

use remixid::analysis::{FingerprintConfig, fingerprint_samples};
use remixid::catalog::{AddOutcome, CatalogDatabase, CatalogSource, TrackMetadata};
use remixid::matching::{EntryRejection, MatchError, MatchSettings, match_fingerprint};
use support::signals::{TRACK_A, TRACK_B};
use tempfile::tempdir;

const RATE: u32 = 8_000;

fn test_config() -> FingerprintConfig {
    FingerprintConfig {
        sample_rate: RATE,
        max_duration_seconds: 2.0,
        fft_size: 512,
        hop_length: 128,
        mel_bands: 40,
        contrast_bands: 4,
        tempo_window: 48,
        ..FingerprintConfig::default()
    }
}

#[test]
fn stored_fingerprints_round_trip_exactly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    let config = test_config();
    let a = fingerprint_samples(&TRACK_A.render(1.5, RATE), RATE, &config).unwrap();
    let b = fingerprint_samples(&TRACK_B.render(1.5, RATE), RATE, &config).unwrap();
    {
        let db = CatalogDatabase::open(&path).unwrap();
        let meta = TrackMetadata::new("A", "Synth").with_file_path("/music/Synth - A.wav");
        assert_eq!(db.add_track(&meta, &a).unwrap(), AddOutcome::Inserted(1));
        assert_eq!(
            db.add_track(&TrackMetadata::new("B", "Synth"), &b).unwrap(),
            AddOutcome::Inserted(2)
        );
    }

    let db = CatalogDatabase::open(&path).unwrap();
    let entries = db.enumerate().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].fingerprint, a);
    assert_eq!(entries[1].fingerprint, b);

    let tracks = db.list_tracks().unwrap();
    assert_eq!(tracks[0].dim, a.len());
    assert_eq!(tracks[0].layout, a.layout());
    let meta = db.get(1).unwrap().unwrap();
    assert_eq!(
        meta.file_path.as_deref(),
        Some(std::path::Path::new("/music/Synth - A.wav"))
    );
}

#[test]
fn reindexing_with_new_settings_replaces_the_fingerprint() {
    let db = CatalogDatabase::open_in_memory().unwrap();
    let samples = TRACK_A.render(1.5, RATE);
    let old = fingerprint_samples(&samples, RATE, &test_config()).unwrap();
    let id = db
        .add_track(&TrackMetadata::new("A", "Synth"), &old)
        .unwrap()
        .id();

    let retuned = FingerprintConfig {
        rolloff_percent: 0.95,
        ..test_config()
    };
    let query = fingerprint_samples(&samples, RATE, &retuned).unwrap();
    let stale = match_fingerprint(&query, &db, &MatchSettings::default()).unwrap();
    assert!(stale.matches.is_empty());
    assert!(matches!(
        stale.rejected[0].reason,
        EntryRejection::LayoutMismatch { .. }
    ));

    assert!(db.replace_fingerprint(id, &query).unwrap());
    let fresh = match_fingerprint(&query, &db, &MatchSettings::default()).unwrap();
    assert_eq!(fresh.matches[0].id, id);
    assert!(fresh.matches[0].score >= 0.999);
}

#[test]
fn cleared_catalog_refuses_to_score() {
    let db = CatalogDatabase::open_in_memory().unwrap();
    let fp = fingerprint_samples(&TRACK_B.render(1.0, RATE), RATE, &test_config()).unwrap();
    db.add_track(&TrackMetadata::new("B", "Synth"), &fp).unwrap();
    assert_eq!(db.clear().unwrap(), 1);
    assert!(matches!(
        match_fingerprint(&fp, &db, &MatchSettings::default()),
        Err(MatchError::EmptyCatalog)
    ));
}
