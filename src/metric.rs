//! Branch metrics for hard and soft decision decoding
//!
//! Each function measures the distance between one candidate output group and the received
//! symbols for that group. Soft samples are amplitudes in `0 ..= 255`, with `255` meaning a
//! fully confident `1` bit; sample `i` within a group lines up with candidate bit
//! `rate - 1 - i`, matching the MSB-first order in which groups are written to the wire.

/// Maximum soft sample amplitude.
pub(crate) const SOFT_MAX: u16 = 255;

/// Returns the Hamming distance between two candidate output groups.
pub(crate) fn hamming_distance(x: u16, y: u16) -> u16 {
    (x ^ y).count_ones() as u16
}

/// Returns the sum of absolute differences between a candidate group and the received samples.
pub(crate) fn soft_distance_linear(candidate: u16, soft: &[u8]) -> u16 {
    let rate = soft.len();
    let mut dist = 0u16;
    for (i, &sample) in soft.iter().enumerate() {
        let expected = if (candidate >> (rate - 1 - i)) & 1 == 1 {
            SOFT_MAX
        } else {
            0
        };
        dist += u16::from(sample).abs_diff(expected);
    }
    dist
}

/// Returns the sum of squared differences between a candidate group and the received samples,
/// scaled down by 8 to keep accumulated path metrics inside `u16` range.
pub(crate) fn soft_distance_quadratic(candidate: u16, soft: &[u8]) -> u16 {
    let rate = soft.len();
    let mut dist = 0u32;
    for (i, &sample) in soft.iter().enumerate() {
        let expected = if (candidate >> (rate - 1 - i)) & 1 == 1 {
            u32::from(SOFT_MAX)
        } else {
            0
        };
        let diff = u32::from(sample).abs_diff(expected);
        dist += diff * diff;
    }
    (dist >> 3) as u16
}
