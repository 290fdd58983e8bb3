/// RMS level every buffer is scaled to before extraction.
pub(crate) const TARGET_RMS_DB: f32 = -20.0;

/// Scale `samples` so their RMS sits at `target_db`, then pull peaks back under full scale.
///
/// Silent or non-finite buffers are left untouched.
pub(crate) fn normalize_level_in_place(samples: &mut [f32], target_db: f32) {
    normalize_rms_in_place(samples, target_db);
    normalize_peak_limit_in_place(samples);
}

pub(crate) fn normalize_rms_in_place(samples: &mut [f32], target_db: f32) {
    let rms_value = rms(samples);
    if !rms_value.is_finite() || rms_value <= 0.0 {
        return;
    }
    let target = db_to_linear(target_db);
    if !target.is_finite() || target <= 0.0 {
        return;
    }
    scale_in_place(samples, target / rms_value);
}

pub(crate) fn normalize_peak_limit_in_place(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0_f32, |m, &s| m.max(s.abs()));
    if !peak.is_finite() || peak <= 1.0 {
        return;
    }
    scale_in_place(samples, 1.0 / peak);
}

pub(crate) fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum = samples.iter().fold(0.0_f64, |acc, &s| {
        let s = if s.is_finite() { s as f64 } else { 0.0 };
        acc + s * s
    });
    (sum / samples.len() as f64).max(0.0).sqrt() as f32
}

fn scale_in_place(samples: &mut [f32], gain: f32) {
    for sample in samples.iter_mut() {
        *sample = if sample.is_finite() { *sample * gain } else { 0.0 };
    }
}

pub(crate) fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}
