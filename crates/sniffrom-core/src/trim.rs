//! Output trimming
//!
//! The image buffers are allocated for the largest device we expect, so the
//! tail is normally untouched fill. Trimming drops that tail.
//!
//! Real data that ends in the fill value cannot be told apart from padding
//! and is trimmed as well.

/// Logical content length of `buf`: its length minus the trailing run of
/// `fill` bytes
pub fn trimmed_len(buf: &[u8], fill: u8) -> usize {
    buf.iter().rposition(|&b| b != fill).map_or(0, |i| i + 1)
}

/// `buf` truncated to its logical content length
pub fn trim(buf: &[u8], fill: u8) -> &[u8] {
    &buf[..trimmed_len(buf, fill)]
}
