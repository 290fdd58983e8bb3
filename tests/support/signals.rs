use std::f32::consts::PI;

/// A short synthetic "track": a sustained chord plus decaying clicks on every beat.
pub struct Track {
    pub chord_hz: &'static [f32],
    pub beat_seconds: f32,
    pub click_hz: f32,
}

pub const TRACK_A: Track = Track {
    chord_hz: &[220.0, 277.2, 329.6],
    beat_seconds: 0.5,
    click_hz: 1_800.0,
};

pub const TRACK_B: Track = Track {
    chord_hz: &[146.8, 174.6, 220.0, 587.3],
    beat_seconds: 0.3,
    click_hz: 900.0,
};

pub const TRACK_C: Track = Track {
    chord_hz: &[392.0, 493.9],
    beat_seconds: 0.75,
    click_hz: 2_600.0,
};

impl Track {
    pub fn render(&self, seconds: f32, sample_rate: u32) -> Vec<f32> {
        let len = (seconds * sample_rate as f32) as usize;
        let voices = self.chord_hz.len().max(1) as f32;
        (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                let chord: f32 = self
                    .chord_hz
                    .iter()
                    .map(|&hz| (2.0 * PI * hz * t).sin())
                    .sum::<f32>()
                    / voices;
                let since_beat = t % self.beat_seconds;
                let click = (-since_beat * 40.0).exp() * (2.0 * PI * self.click_hz * t).sin();
                0.35 * chord + 0.3 * click
            })
            .collect()
    }
}

pub fn scaled(samples: &[f32], gain: f32) -> Vec<f32> {
    samples.iter().map(|s| s * gain).collect()
}
