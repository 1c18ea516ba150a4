//! Gas estimation for pay-for-blob transactions.
//!
//! Blobs are charged by the number of shares they occupy rather than by raw
//! length, so the estimate is a step function of each blob's size.

/// Size of a single share in bytes.
pub const SHARE_SIZE: u64 = 512;

/// Bytes a share's namespace prefix takes.
pub const NAMESPACE_SIZE: u64 = 29;

/// Share info byte carried by every share.
pub const SHARE_INFO_BYTES: u64 = 1;

/// Sequence length prefix carried by the first share of a blob.
pub const SEQUENCE_LEN_BYTES: u64 = 4;

pub const FIRST_SPARSE_SHARE_CONTENT_SIZE: u64 = SHARE_SIZE - NAMESPACE_SIZE - SHARE_INFO_BYTES - SEQUENCE_LEN_BYTES;

pub const CONTINUATION_SPARSE_SHARE_CONTENT_SIZE: u64 = SHARE_SIZE - NAMESPACE_SIZE - SHARE_INFO_BYTES;

pub const DEFAULT_GAS_PER_BLOB_BYTE: u64 = 8;

pub const DEFAULT_TX_SIZE_COST_PER_BYTE: u64 = 10;

/// Approximate encoded size of the per-blob metadata in the message.
pub const BYTES_PER_BLOB_INFO: u64 = 70;

/// Flat cost of a pay-for-blob message independent of its blobs.
pub const PFB_GAS_FIXED_COST: u64 = 75_000;

/// Number of shares a blob of `blob_size` bytes occupies.
#[must_use]
pub const fn shares_needed(blob_size: u64) -> u64 {
    if blob_size == 0 {
        return 0;
    }
    if blob_size < FIRST_SPARSE_SHARE_CONTENT_SIZE {
        return 1;
    }

    let remaining = blob_size - FIRST_SPARSE_SHARE_CONTENT_SIZE;
    1 + remaining.div_ceil(CONTINUATION_SPARSE_SHARE_CONTENT_SIZE)
}

/// Gas consumed by the blob bytes alone.
#[must_use]
pub fn gas_to_consume(blob_sizes: &[u64], gas_per_byte: u64) -> u64 {
    blob_sizes
        .iter()
        .map(|size| shares_needed(*size).saturating_mul(SHARE_SIZE).saturating_mul(gas_per_byte))
        .fold(0, u64::saturating_add)
}

/// Gas limit estimate for a pay-for-blob transaction carrying blobs of the
/// given sizes, using default parameters.
#[must_use]
pub fn estimate_gas(blob_sizes: &[u64]) -> u64 {
    estimate_gas_with(blob_sizes, DEFAULT_GAS_PER_BLOB_BYTE, DEFAULT_TX_SIZE_COST_PER_BYTE)
}

#[must_use]
pub fn estimate_gas_with(blob_sizes: &[u64], gas_per_byte: u64, tx_size_cost_per_byte: u64) -> u64 {
    let blob_count = blob_sizes.len() as u64;

    gas_to_consume(blob_sizes, gas_per_byte)
        .saturating_add(tx_size_cost_per_byte.saturating_mul(BYTES_PER_BLOB_INFO).saturating_mul(blob_count))
        .saturating_add(PFB_GAS_FIXED_COST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_shares_needed_boundaries() {
        assert_eq!(shares_needed(0), 0);
        assert_eq!(shares_needed(1), 1);
        assert_eq!(shares_needed(FIRST_SPARSE_SHARE_CONTENT_SIZE - 1), 1);
        assert_eq!(shares_needed(FIRST_SPARSE_SHARE_CONTENT_SIZE), 1);
        assert_eq!(shares_needed(FIRST_SPARSE_SHARE_CONTENT_SIZE + 1), 2);
        assert_eq!(
            shares_needed(FIRST_SPARSE_SHARE_CONTENT_SIZE + CONTINUATION_SPARSE_SHARE_CONTENT_SIZE),
            2
        );
        assert_eq!(
            shares_needed(FIRST_SPARSE_SHARE_CONTENT_SIZE + CONTINUATION_SPARSE_SHARE_CONTENT_SIZE + 1),
            3
        );
    }

    #[test]
    fn test_estimate_for_small_blob() {
        // one share: 512 * 8 + 10 * 70 + 75_000
        assert_eq!(estimate_gas(&[9]), 4_096 + 700 + 75_000);
    }

    #[test]
    fn test_estimate_without_blobs_is_fixed_cost() {
        assert_eq!(estimate_gas(&[]), PFB_GAS_FIXED_COST);
    }

    #[test]
    fn test_estimate_sums_blobs() {
        let single = estimate_gas(&[100]);
        let double = estimate_gas(&[100, 100]);

        assert_eq!(double - PFB_GAS_FIXED_COST, 2 * (single - PFB_GAS_FIXED_COST));
    }

    proptest! {
        #[test]
        fn prop_estimate_is_deterministic(size in 0u64..10_000_000) {
            prop_assert_eq!(estimate_gas(&[size]), estimate_gas(&[size]));
        }

        #[test]
        fn prop_estimate_is_monotonic(a in 0u64..10_000_000, b in 0u64..10_000_000) {
            let (small, large) = if a <= b { (a, b) } else { (b, a) };

            prop_assert!(estimate_gas(&[small]) <= estimate_gas(&[large]));
        }
    }
}
