use aws_lc_rs::signature::{Ed25519KeyPair, KeyPair, UnparsedPublicKey, ED25519};
use zeroize::Zeroize;

use crate::error::Error;

pub const SEED_LENGTH: usize = 32;
pub const PUBLIC_KEY_LENGTH: usize = 32;
pub const SIGNATURE_LENGTH: usize = 64;

/// An Ed25519 keypair, held as its 32-byte seed so it can be persisted and reconstructed
/// by an operator's own key store. The seed is zeroized on drop.
pub struct SigningKey {
    seed: [u8; SEED_LENGTH],
    pair: Ed25519KeyPair,
}

impl Drop for SigningKey {
    fn drop(&mut self) {
        self.seed.zeroize();
    }
}

impl SigningKey {
    /// Generate a fresh keypair from system randomness.
    pub fn generate() -> Result<Self, Error> {
        let mut seed = [0u8; SEED_LENGTH];
        aws_lc_rs::rand::fill(&mut seed).map_err(|_| Error::KeyGenFailed)?;
        Self::from_seed(&seed)
    }

    /// Reconstruct a keypair from a previously generated 32-byte seed.
    pub fn from_seed(seed: &[u8; SEED_LENGTH]) -> Result<Self, Error> {
        let pair =
            Ed25519KeyPair::from_seed_unchecked(seed).map_err(|_| Error::KeyGenFailed)?;
        Ok(Self { seed: *seed, pair })
    }

    pub fn seed_bytes(&self) -> &[u8; SEED_LENGTH] {
        &self.seed
    }

    pub fn public_key(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.pair
            .public_key()
            .as_ref()
            .try_into()
            .expect("Ed25519 public keys are 32 bytes")
    }

    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        self.pair
            .sign(message)
            .as_ref()
            .try_into()
            .expect("Ed25519 signatures are 64 bytes")
    }
}

/// Verify `signature` over `message` under `public_key`.
pub fn verify(
    public_key: &[u8; PUBLIC_KEY_LENGTH],
    signature: &[u8; SIGNATURE_LENGTH],
    message: &[u8],
) -> Result<(), Error> {
    let key = UnparsedPublicKey::new(&ED25519, public_key.as_slice());
    key.verify(message, signature.as_slice())
        .map_err(|_| Error::BadSignature)
}

/// Fill `buf` with cryptographically strong random bytes. Used for nonce blinds and
/// Merkle padding fillers, never routed through a non-cryptographic RNG.
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    aws_lc_rs::rand::fill(&mut buf).expect("system RNG is available");
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_succeeds() {
        let key = SigningKey::generate().unwrap();
        let sig = key.sign(b"hello roughtime");
        verify(&key.public_key(), &sig, b"hello roughtime").unwrap();
    }

    #[test]
    fn verify_rejects_tampered_message() {
        let key = SigningKey::generate().unwrap();
        let sig = key.sign(b"hello roughtime");
        assert!(verify(&key.public_key(), &sig, b"goodbye roughtime").is_err());
    }

    #[test]
    fn verify_rejects_wrong_key() {
        let key = SigningKey::generate().unwrap();
        let other = SigningKey::generate().unwrap();
        let sig = key.sign(b"hello roughtime");
        assert!(verify(&other.public_key(), &sig, b"hello roughtime").is_err());
    }

    #[test]
    fn from_seed_reproduces_the_same_keypair() {
        let key = SigningKey::generate().unwrap();
        let seed = *key.seed_bytes();
        let reconstructed = SigningKey::from_seed(&seed).unwrap();
        assert_eq!(key.public_key(), reconstructed.public_key());
    }

    #[test]
    fn random_bytes_are_not_all_zero() {
        let bytes: [u8; 64] = random_bytes();
        assert_ne!(bytes, [0u8; 64]);
    }
}
