//! Cross-checks the Merkle tree's path construction against an independently written
//! verifier, rather than trusting `MerkleTree`'s own internal bookkeeping.

use roughtime_crypto::MerkleTree;

const LEAF_TWEAK: u8 = 0x00;
const NODE_TWEAK: u8 = 0x01;

fn nonce(byte: u8) -> [u8; 64] {
    [byte; 64]
}

fn sha512_concat(parts: &[&[u8]]) -> [u8; 64] {
    roughtime_crypto::sha512_concat(parts)
}

/// Walk `path`/`index` against `leaf_nonce` and return the reconstructed root,
/// independent of whatever bookkeeping `MerkleTree` uses internally.
fn reconstruct_root(leaf_nonce: &[u8; 64], mut index: u32, path: &[u8]) -> [u8; 64] {
    let mut hash = sha512_concat(&[&[LEAF_TWEAK], leaf_nonce]);
    let mut remaining = path;
    while !remaining.is_empty() {
        let sibling = &remaining[..64];
        hash = if index & 1 == 0 {
            sha512_concat(&[&[NODE_TWEAK], &hash, sibling])
        } else {
            sha512_concat(&[&[NODE_TWEAK], sibling, &hash])
        };
        index >>= 1;
        remaining = &remaining[64..];
    }
    hash
}

#[test]
fn single_leaf_path_is_empty_and_root_is_the_leaf_hash() {
    let tree = MerkleTree::from_nonces(&[nonce(1)]);
    let path = tree.path_for(0);
    assert!(path.is_empty());
    assert_eq!(reconstruct_root(&nonce(1), 0, &path), tree.root());
}

#[test]
fn every_leaf_in_trees_up_to_nine_reconstructs_the_root() {
    for n in 1..=9usize {
        let nonces: Vec<_> = (0..n).map(|i| nonce(i as u8)).collect();
        let tree = MerkleTree::from_nonces(&nonces);
        let root = tree.root();
        for i in 0..n {
            let path = tree.path_for(i);
            assert_eq!(
                reconstruct_root(&nonces[i], i as u32, &path),
                root,
                "leaf {i} of {n} failed to reconstruct the root"
            );
        }
    }
}

#[test]
fn wrong_index_does_not_reconstruct_the_root() {
    let nonces: Vec<_> = (0..4).map(nonce).collect();
    let tree = MerkleTree::from_nonces(&nonces);
    let path = tree.path_for(1);
    assert_ne!(reconstruct_root(&nonces[1], 0, &path), tree.root());
}

#[test]
fn wrong_leaf_value_does_not_reconstruct_the_root() {
    let nonces: Vec<_> = (0..4).map(nonce).collect();
    let tree = MerkleTree::from_nonces(&nonces);
    let path = tree.path_for(0);
    assert_ne!(reconstruct_root(&nonce(0xee), 0, &path), tree.root());
}

#[test]
fn corrupted_path_byte_does_not_reconstruct_the_root() {
    let nonces: Vec<_> = (0..4).map(nonce).collect();
    let tree = MerkleTree::from_nonces(&nonces);
    let mut path = tree.path_for(0);
    path[0] ^= 0xff;
    assert_ne!(reconstruct_root(&nonces[0], 0, &path), tree.root());
}

#[test]
fn a_valid_path_for_one_leaf_does_not_verify_a_different_leaf_at_the_same_index() {
    let nonces: Vec<_> = (0..4).map(nonce).collect();
    let tree = MerkleTree::from_nonces(&nonces);
    let path_for_leaf_2 = tree.path_for(2);
    assert_ne!(reconstruct_root(&nonces[3], 2, &path_for_leaf_2), tree.root());
}

#[test]
fn non_power_of_two_batches_still_verify_every_real_leaf() {
    for n in [3usize, 5, 6, 7] {
        let nonces: Vec<_> = (0..n).map(|i| nonce(i as u8)).collect();
        let tree = MerkleTree::from_nonces(&nonces);
        assert_eq!(tree.padded_leaf_count(), n.next_power_of_two());
        for i in 0..n {
            let path = tree.path_for(i);
            assert_eq!(reconstruct_root(&nonces[i], i as u32, &path), tree.root());
        }
    }
}

#[test]
fn distinct_batches_of_the_same_size_produce_distinct_roots() {
    let a: Vec<_> = (0..4).map(nonce).collect();
    let b: Vec<_> = (0..4).map(|i| nonce(i as u8 + 100)).collect();
    assert_ne!(MerkleTree::from_nonces(&a).root(), MerkleTree::from_nonces(&b).root());
}
