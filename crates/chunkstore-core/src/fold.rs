//! Content folding for bucket selection.
//!
//! Uses FNV-1a for fast, deterministic hashing of byte chunks. The fold is
//! not cryptographically secure and is never used on its own to decide
//! equality: it only picks a bucket and rejects obvious mismatches before
//! the full byte comparison.

/// FNV-1a offset basis for 64-bit.
pub const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
pub const FNV_PRIME: u64 = 0x00000100000001B3;

/// Feed a single byte into an FNV-1a hash state.
#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

/// Feed a u64 (as 8 LE bytes) into an FNV-1a hash state.
#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

/// Compute the fold of a byte chunk.
///
/// Hashes every byte with FNV-1a, then folds in the chunk length as a
/// `u64`. Including the length keeps chunks that share a byte prefix but
/// differ in size from landing on the same value by construction.
///
/// Returns a fixed non-zero value for the empty chunk.
pub fn fold_bytes(data: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &b in data {
        hash = fnv1a_byte(hash, b);
    }
    fnv1a_u64(hash, data.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_is_deterministic() {
        assert_eq!(fold_bytes(b"hello"), fold_bytes(b"hello"));
    }

    #[test]
    fn empty_chunk_folds_length_only() {
        assert_eq!(fold_bytes(&[]), fnv1a_u64(FNV_OFFSET, 0));
        assert_ne!(fold_bytes(&[]), 0);
    }

    #[test]
    fn different_content_different_fold() {
        assert_ne!(fold_bytes(b"hello"), fold_bytes(b"world"));
    }

    #[test]
    fn trailing_zero_byte_changes_fold() {
        // "A" and "A\0" differ only by a zero byte that FNV alone would
        // still distinguish, but the length term must also move the fold.
        assert_ne!(fold_bytes(b"A"), fold_bytes(b"A\0"));
        assert_ne!(fold_bytes(b"AB"), fold_bytes(b"A"));
    }

    #[test]
    fn byte_order_matters() {
        assert_ne!(fold_bytes(b"ab"), fold_bytes(b"ba"));
    }
}
