use hongbao_core::{Address, Hash32};
use sha3::{Digest, Keccak256};

/// Keccak-256 of arbitrary bytes.
pub fn keccak256(data: &[u8]) -> Hash32 {
    let hash = Keccak256::new().chain_update(data).finalize();
    hash.into()
}

/// Combine two tree nodes, sorting the pair by byte value first.
pub fn combine(a: &Hash32, b: &Hash32) -> Hash32 {
    let (left, right) = if a <= b { (a, b) } else { (b, a) };
    let hash = Keccak256::new()
        .chain_update(left)
        .chain_update(right)
        .finalize();
    hash.into()
}

/// Leaf hash for an indexed balance entry.
///
/// Packed encoding is `uint256 index || address || uint256 amount`
/// (32 + 20 + 32 bytes, big-endian, zero-padded on the left).
pub fn balance_leaf(index: u64, account: &Address, amount: u128) -> Hash32 {
    let mut data = [0u8; 84];
    data[24..32].copy_from_slice(&index.to_be_bytes());
    data[32..52].copy_from_slice(account);
    data[68..84].copy_from_slice(&amount.to_be_bytes());
    keccak256(&data)
}

/// Leaf hash for the one-claim-per-address variant: `keccak256(account)`.
pub fn account_leaf(account: &Address) -> Hash32 {
    keccak256(account)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_is_order_independent() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        assert_eq!(combine(&a, &b), combine(&b, &a));
    }

    #[test]
    fn test_combine_sorts_before_hashing() {
        let a = [9u8; 32];
        let b = [3u8; 32];
        let mut packed = [0u8; 64];
        packed[..32].copy_from_slice(&b);
        packed[32..].copy_from_slice(&a);
        assert_eq!(combine(&a, &b), keccak256(&packed));
    }

    #[test]
    fn test_balance_leaf_packing() {
        let account = [0xABu8; 20];
        let leaf = balance_leaf(7, &account, 100);

        let mut expected = [0u8; 84];
        expected[31] = 7;
        expected[32..52].copy_from_slice(&account);
        expected[83] = 100;
        assert_eq!(leaf, keccak256(&expected));
    }

    #[test]
    fn test_leaf_variants_differ() {
        let account = [0x11u8; 20];
        assert_ne!(account_leaf(&account), balance_leaf(0, &account, 0));
    }

    #[test]
    fn test_keccak256_known_vector() {
        // keccak256 of the empty string
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
