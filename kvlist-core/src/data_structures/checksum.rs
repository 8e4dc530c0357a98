//! Value integrity tag.

/// Sum of every byte in `bytes`, wrapping on overflow.
///
/// This is a cheap truncation/corruption detector, not a hash: it has no
/// avalanche property and trivially collides (`"ab"` and `"ba"` share a tag).
///
#[inline]
pub fn checksum(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |sum, &byte| sum.wrapping_add(u64::from(byte)))
}
