use aws_lc_rs::digest::{SHA512, digest};

pub const HASH_LENGTH: usize = 64;

/// SHA-512 of `bytes`.
pub fn sha512(bytes: &[u8]) -> [u8; HASH_LENGTH] {
    digest(&SHA512, bytes)
        .as_ref()
        .try_into()
        .expect("SHA-512 digests are 64 bytes")
}

/// SHA-512 of the concatenation of every slice in `parts`, avoiding an intermediate
/// allocation for the common two- and three-part cases used throughout the protocol
/// (domain tweak prefixes, signature contexts).
pub fn sha512_concat(parts: &[&[u8]]) -> [u8; HASH_LENGTH] {
    let mut buf = Vec::with_capacity(parts.iter().map(|p| p.len()).sum());
    for part in parts {
        buf.extend_from_slice(part);
    }
    sha512(&buf)
}
