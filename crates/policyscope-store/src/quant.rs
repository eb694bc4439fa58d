//! uint8 vector codec for embedding storage.
//!
//! Index vectors are stored as one byte per component plus a per-vector
//! scale and offset, cutting storage to a quarter of float32 with no
//! measurable ranking impact at 768 dimensions.

use ndarray::Array1;

/// Encode a float vector as uint8 bytes with scale and offset.
///
/// Maps [min, max] onto [0, 255] so that `original ≈ byte * scale + offset`.
pub fn encode_vector(vector: &[f32]) -> (Vec<u8>, f32, f32) {
    let min_val = vector.iter().copied().fold(f32::INFINITY, f32::min);
    let max_val = vector.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    let range = max_val - min_val;
    if range < 1e-9 {
        // Constant vector encodes as all zero bytes
        return (vec![0u8; vector.len()], 0.0, min_val);
    }

    let scale = range / 255.0;
    let bytes = vector
        .iter()
        .map(|&v| ((v - min_val) / scale).round().clamp(0.0, 255.0) as u8)
        .collect();

    (bytes, scale, min_val)
}

/// Decode uint8 bytes back into a float vector.
pub fn decode_vector(bytes: &[u8], scale: f32, offset: f32) -> Array1<f32> {
    Array1::from_iter(bytes.iter().map(|&b| b as f32 * scale + offset))
}
