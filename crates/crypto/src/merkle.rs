use crate::hash::sha512_concat;
use crate::signing::random_bytes;

pub const HASH_LENGTH: usize = 64;
const LEAF_TWEAK: &[u8] = &[0x00];
const NODE_TWEAK: &[u8] = &[0x01];

/// A binary Merkle tree batching client nonces into a single signed root.
///
/// Leaves are `sha512(0x00 ‖ nonce)`. Odd leaf counts are padded up to the next power of
/// two with cryptographically random 64-byte fillers — *not* zero bytes, since a
/// zero-filled filler would let an attacker who guesses the batch size forge a plausible
/// sibling hash.
pub struct MerkleTree {
    /// `levels[0]` is the padded leaf hashes; each subsequent level is its parents;
    /// `levels.last()` is a single-element vec holding the root.
    levels: Vec<Vec<[u8; HASH_LENGTH]>>,
}

impl MerkleTree {
    /// Build a tree over `nonces`, one leaf per nonce, in the given order.
    pub fn from_nonces(nonces: &[[u8; HASH_LENGTH]]) -> Self {
        assert!(!nonces.is_empty(), "a Merkle tree needs at least one leaf");

        let mut leaves: Vec<[u8; HASH_LENGTH]> = nonces
            .iter()
            .map(|nonce| sha512_concat(&[LEAF_TWEAK, nonce]))
            .collect();

        let padded_len = leaves.len().next_power_of_two();
        while leaves.len() < padded_len {
            leaves.push(random_bytes::<HASH_LENGTH>());
        }

        let mut levels = vec![leaves];
        while levels.last().unwrap().len() > 1 {
            let prev = levels.last().unwrap();
            let next = prev
                .chunks_exact(2)
                .map(|pair| sha512_concat(&[NODE_TWEAK, &pair[0], &pair[1]]))
                .collect();
            levels.push(next);
        }

        Self { levels }
    }

    pub fn root(&self) -> [u8; HASH_LENGTH] {
        self.levels.last().unwrap()[0]
    }

    /// Number of *input* (unpadded) leaves this tree was built with is not retained here;
    /// callers track that separately. Returns the total (post-padding) leaf count.
    pub fn padded_leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// The authentication path for leaf `index`: sibling hashes from the bottom level up,
    /// concatenated. Empty when the tree has a single leaf.
    pub fn path_for(&self, mut index: usize) -> Vec<u8> {
        let mut path = Vec::new();
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = level[index ^ 1];
            path.extend_from_slice(&sibling);
            index >>= 1;
        }
        path
    }
}
