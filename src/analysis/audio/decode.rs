use std::fs::File;
use std::path::Path;

use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, errors::Error, formats::FormatOptions,
    io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};

use crate::analysis::error::FingerprintError;

/// Raw decoded audio in interleaved `f32` samples.
#[derive(Debug)]
pub(crate) struct DecodedAudio {
    pub(crate) samples: Vec<f32>,
    pub(crate) sample_rate: u32,
    pub(crate) channels: u16,
}

/// Decode up to `max_seconds` of audio into interleaved `f32` samples.
pub(crate) fn decode_audio(
    path: &Path,
    max_seconds: Option<f32>,
) -> Result<DecodedAudio, FingerprintError> {
    match decode_with_symphonia(path, max_seconds) {
        Ok((samples, sample_rate, channels)) => Ok(DecodedAudio {
            samples,
            sample_rate: sample_rate.max(1),
            channels: channels.max(1),
        }),
        Err(reason) => Err(FingerprintError::decode(path, reason)),
    }
}

fn decode_with_symphonia(
    path: &Path,
    max_seconds: Option<f32>,
) -> Result<(Vec<f32>, u32, u16), String> {
    let file = File::open(path).map_err(|err| format!("open failed: {err}"))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| format!("unsupported or corrupt container: {err}"))?;
    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| "no default audio track".to_string())?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| "missing sample rate".to_string())?;
    let channels = codec_params
        .channels
        .ok_or_else(|| "missing channel count".to_string())?
        .count() as u16;
    let max_samples = max_seconds.filter(|limit| *limit > 0.0).map(|limit| {
        let frames = (limit as f64 * sample_rate as f64).ceil().max(1.0);
        (frames as usize).saturating_mul(channels.max(1) as usize)
    });

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|err| format!("no decoder for codec: {err}"))?;

    let mut samples = Vec::new();
    loop {
        if max_samples.is_some_and(|limit| samples.len() >= limit) {
            break;
        }
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(Error::IoError(_)) => break,
            Err(err) => return Err(format!("packet read failed: {err}")),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let audio_buf = match decoder.decode(&packet) {
            Ok(audio_buf) => audio_buf,
            Err(Error::DecodeError(_)) => continue,
            Err(err) => return Err(format!("decode failed: {err}")),
        };
        let spec = *audio_buf.spec();
        let mut sample_buf = SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        samples.extend_from_slice(sample_buf.samples());
    }
    if let Some(limit) = max_samples {
        samples.truncate(limit);
    }

    if samples.is_empty() {
        return Err("decoded 0 samples".to_string());
    }
    Ok((samples, sample_rate, channels))
}
