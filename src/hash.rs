//! Hash primitives (spec.md C1 / §4.1): keccak-256 and lexicographic pair
//! hashing. The teacher's on-chain verifier
//! (`programs/cross-chain-escrow-src/src/merkle_tree.rs`) calls
//! `solana_program::keccak::hashv`; off-chain there is no `keccak` syscall,
//! so this reaches for `sha3::Keccak256` directly (the same backend the
//! teacher's own `svm-merkle-tree` crate lists under its `standard = ["sha3"]`
//! feature).

use sha3::{Digest, Keccak256};

/// 32-byte keccak-256 digest.
pub fn keccak(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let out = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&out);
    bytes
}

/// Hashes two 32-byte nodes in lexicographic order: `keccak(min(a,b) || max(a,b))`.
///
/// Both producer and verifier must agree on this ordering (spec.md §4.1) —
/// a tree built with `(a, b)` concatenated in insertion order instead of
/// sorted order will silently fail every proof against this verifier.
pub fn hash_pair(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(lo);
    buf[32..].copy_from_slice(hi);
    keccak(&buf)
}
