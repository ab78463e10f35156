//! Validate replies from Roughtime servers: the nine-step verification pipeline run
//! against every reply, and the cross-reply causality audit run against a client's
//! accumulated history.

use roughtime_crypto::verify;
use roughtime_protocol::constants::{CERT_CTX, RESP_CTX};
use roughtime_protocol::Reply;

use crate::error::ClientError;
use crate::history::HistoryEntry;

/// The trustworthy part of a verified reply: the server's midpoint and its claimed
/// uncertainty radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub midp: u64,
    pub radi: u32,
}

/// Run the full verification pipeline against a reply, in the fixed order the checks
/// must happen: a failure at any step aborts with that step's error and never reaches
/// the steps after it.
pub fn verify_reply(long_term_pub: &[u8; 32], nonce: &[u8; 64], reply_bytes: &[u8]) -> Result<Verdict, ClientError> {
    let reply = decode(reply_bytes)?;

    let dele_bytes = reply.dele()?.encode();
    let mut dele_signed = Vec::with_capacity(CERT_CTX.len() + dele_bytes.len());
    dele_signed.extend_from_slice(CERT_CTX);
    dele_signed.extend_from_slice(&dele_bytes);
    verify(long_term_pub, &reply.cert_sig()?, &dele_signed).map_err(|_| ClientError::BadDelegationSignature)?;

    let mint = reply.mint()?;
    let maxt = reply.maxt()?;
    let midp = reply.midp()?;
    if midp < mint || midp > maxt {
        return Err(ClientError::MidpointOutsideDelegateWindow);
    }

    let path = reply.path()?;
    if path.len() % 64 != 0 || path.len() / 64 > 32 {
        return Err(ClientError::BadPath);
    }

    let root = walk_merkle_path(nonce, reply.index()?, &path)?;
    if root != reply.root()? {
        return Err(ClientError::BadMerkleRoot);
    }

    let srep_bytes = reply.srep()?.encode();
    let mut srep_signed = Vec::with_capacity(RESP_CTX.len() + srep_bytes.len());
    srep_signed.extend_from_slice(RESP_CTX);
    srep_signed.extend_from_slice(&srep_bytes);
    verify(&reply.delegate_pub()?, &reply.sig()?, &srep_signed).map_err(|_| ClientError::BadResponseSignature)?;

    Ok(Verdict { midp, radi: reply.radi()? })
}

fn decode(reply_bytes: &[u8]) -> Result<Reply, ClientError> {
    Reply::decode(reply_bytes).map_err(|e| match e {
        roughtime_protocol::Error::MissingTag(key) => ClientError::MissingTag(key),
        other => ClientError::BadReply(other),
    })
}

/// Walk the Merkle inclusion path starting from `nonce`'s leaf hash, returning the
/// reconstructed root. `indx` must reach zero by the time the path is exhausted.
fn walk_merkle_path(nonce: &[u8; 64], mut indx: u32, path: &[u8]) -> Result<[u8; 64], ClientError> {
    let mut h = roughtime_crypto::sha512_concat(&[&[0x00], nonce]);

    for sibling in path.chunks_exact(64) {
        h = if indx & 1 == 0 {
            roughtime_crypto::sha512_concat(&[&[0x01], &h, sibling])
        } else {
            roughtime_crypto::sha512_concat(&[&[0x01], sibling, &h])
        };
        indx >>= 1;
    }

    if indx != 0 {
        return Err(ClientError::BadPathIndex);
    }

    Ok(h)
}

/// An instance of causality constraints being violated between history entries `i` and
/// `k` (`i < k`): entry `i`'s earliest plausible instant lies strictly after entry
/// `k`'s latest plausible instant.
#[derive(Debug, Clone, Copy)]
pub struct CausalityViolation {
    pub i: usize,
    pub k: usize,
}

/// Walk `history` in order and report every pair whose time windows cannot both be
/// true. Detection only; violations are not raised as errors.
pub fn verify_replies(history: &[HistoryEntry], long_term_pub: &[u8; 32]) -> Vec<CausalityViolation> {
    let verdicts: Vec<Option<Verdict>> = history
        .iter()
        .map(|entry| verify_reply(long_term_pub, &entry.nonce, &entry.reply_bytes).ok())
        .collect();

    let mut violations = Vec::new();
    for i in 0..verdicts.len() {
        let Some(vi) = verdicts[i] else { continue };
        for k in (i + 1)..verdicts.len() {
            let Some(vk) = verdicts[k] else { continue };
            let lower_i = vi.midp.saturating_sub(vi.radi as u64);
            let upper_k = vk.midp + vk.radi as u64;
            if lower_i > upper_k {
                violations.push(CausalityViolation { i, k });
            }
        }
    }
    violations
}
