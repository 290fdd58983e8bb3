use std::path::Path;

/// Write mono 32-bit float samples.
pub fn write_test_wav(path: &Path, samples: &[f32], sample_rate: u32) {
    write_wav(path, samples, 1, sample_rate);
}

/// Write interleaved 16-bit PCM frames.
pub fn write_pcm16_wav(path: &Path, interleaved: &[f32], channels: u16, sample_rate: u32) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    create_parent(path);
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav writer");
    for &sample in interleaved {
        let scaled = (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
        writer.write_sample(scaled).expect("write wav sample");
    }
    writer.finalize().expect("finalize wav");
}

fn write_wav(path: &Path, samples: &[f32], channels: u16, sample_rate: u32) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    create_parent(path);
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav writer");
    for &sample in samples {
        writer.write_sample(sample).expect("write wav sample");
    }
    writer.finalize().expect("finalize wav");
}

fn create_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create wav parent dirs");
    }
}
