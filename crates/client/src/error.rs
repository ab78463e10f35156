use roughtime_protocol::Key;

/// Things that can go wrong querying a server and verifying its reply.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("timeout waiting for server response")]
    Timeout,

    #[error("malformed reply: {0}")]
    BadReply(#[from] roughtime_protocol::Error),

    #[error("required tag {0:?} missing from reply")]
    MissingTag(Key),

    #[error("long-term signature over DELE is invalid")]
    BadDelegationSignature,

    #[error("midpoint lies outside the delegate's validity window")]
    MidpointOutsideDelegateWindow,

    #[error("PATH length is not a multiple of 64 bytes, or exceeds 32 levels")]
    BadPath,

    #[error("INDX did not reach zero after walking the Merkle path")]
    BadPathIndex,

    #[error("reconstructed Merkle root does not match ROOT")]
    BadMerkleRoot,

    #[error("delegate signature over SREP is invalid")]
    BadResponseSignature,

    #[error("public key decode failed: {0}")]
    BadPublicKey(#[from] data_encoding::DecodeError),

    #[error("decoded public key is {0} bytes, expected 32")]
    BadPublicKeyLength(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not resolve '{0}' to an IPv4 address")]
    DnsLookupFailed(String),
}
