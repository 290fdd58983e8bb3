//! Exact little-endian `f32` blob codec for stored fingerprints.

/// Encode values as consecutive little-endian `f32` words.
pub fn encode_f32_le_blob(values: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len().saturating_mul(4));
    for &v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

/// Decode a little-endian `f32` blob, requiring exactly `expected_len` values.
pub fn decode_f32_le_blob(blob: &[u8], expected_len: usize) -> Result<Vec<f32>, String> {
    if blob.len() % 4 != 0 {
        return Err(format!(
            "Fingerprint blob length {} is not a multiple of 4 bytes",
            blob.len()
        ));
    }
    let found = blob.len() / 4;
    if found != expected_len {
        return Err(format!(
            "Fingerprint blob holds {found} values, header says {expected_len}"
        ));
    }
    Ok(blob
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
