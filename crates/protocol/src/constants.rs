//! Wire-level constants that are part of the protocol's on-the-wire identity: changing any
//! of these bytes produces a different, incompatible protocol.

/// Context string prepended to a `DELE` body before the long-term key signs it.
pub const CERT_CTX: &[u8] = b"RoughTime v1 delegation signature--\x00";

/// Context string prepended to an `SREP` body before the delegate key signs it.
pub const RESP_CTX: &[u8] = b"RoughTime v1 response signature\x00";

/// Domain-separation byte prepended to a nonce before hashing it into a Merkle leaf.
pub const TREE_LEAF_TWEAK: &[u8] = &[0x00];

/// Domain-separation byte prepended to a pair of child hashes before hashing them into
/// their parent node.
pub const TREE_NODE_TWEAK: &[u8] = &[0x01];

pub const NONCE_LENGTH: usize = 64;
pub const SIGNATURE_LENGTH: usize = 64;
pub const HASH_LENGTH: usize = 64;
pub const PUBKEY_LENGTH: usize = 32;

/// Minimum wire size of a request, chosen to bound amplification.
pub const MIN_REQUEST_LENGTH: usize = 1024;

/// Exact encoded size of a `CERT` message: header (2 tags => 16 bytes) + SIG (64 bytes)
/// + DELE (header for 3 tags => 24 bytes + MINT(8) + MAXT(8) + PUBK(32) = 72 bytes).
pub const CERT_ENCODED_LENGTH: usize = 152;

/// Default validity window of a freshly issued delegate, in microseconds (30 days).
pub const DEFAULT_DELEGATE_VALIDITY_MICROS: u64 = 30 * 24 * 60 * 60 * 1_000_000;

/// Default uncertainty radius reported in `RADI`, in microseconds.
pub const DEFAULT_RADIUS_MICROS: u32 = 100_000;

/// Default UDP port servers listen on and clients connect to.
pub const DEFAULT_PORT: u16 = 2002;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_strings_have_documented_lengths() {
        assert_eq!(CERT_CTX.len(), 36);
        assert_eq!(RESP_CTX.len(), 32);
    }
}
