//! Utility functions for working with weight arrays
//!
//! Small conveniences shared by the capture/transfer pipeline and useful
//! to callers preparing their own weight data.

/// Check if two floating point values are approximately equal
pub fn approximately_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() <= epsilon
}

/// Scale a per-vertex weight vector so it sums to 1.0
///
/// A vector summing to zero is left untouched; an unskinned vertex stays
/// unskinned.
pub fn normalize_weights(weights: &mut [f32]) {
    let sum: f32 = weights.iter().sum();
    if sum > 0.0 {
        for weight in weights {
            *weight /= sum;
        }
    }
}

/// Per-vertex weight sums across a set of influence rows
///
/// Rows must be equally long; the result has one entry per vertex.
pub fn vertex_weight_sums(rows: &[Vec<f32>]) -> Vec<f32> {
    let vertex_count = rows.first().map(|row| row.len()).unwrap_or(0);
    let mut sums = vec![0.0; vertex_count];
    for row in rows {
        for (sum, weight) in sums.iter_mut().zip(row) {
            *sum += weight;
        }
    }
    sums
}
