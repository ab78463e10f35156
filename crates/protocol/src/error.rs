use crate::key::Key;

/// Errors raised while decoding or constructing a wire message.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("packet length {0} is not a multiple of 4")]
    Unaligned(usize),

    #[error("packet of {0} bytes is too short to hold its own header")]
    MalformedPacket(usize),

    #[error("tag value length {0} is not a multiple of 4")]
    BadValueLength(usize),

    #[error("duplicate tag key {0:?} in one message")]
    DuplicateTag(Key),

    #[error("tag key {0:?} is not permitted in this context")]
    UnknownTag([u8; 4]),

    #[error("tag keys are not in strictly ascending order: {0:?} before {1:?}")]
    UnorderedTag(Key, Key),

    #[error("value offset {0} is out of range for a buffer of {1} bytes")]
    OffsetOutOfRange(u32, usize),

    #[error("value offsets are not strictly ascending: {0} before {1}")]
    UnorderedOffset(u32, u32),

    #[error("cannot interpret a {0}-byte value as an integer (expected 4 or 8)")]
    BadTagWidth(usize),

    #[error("required tag {0:?} is missing")]
    MissingTag(Key),

    #[error("re-encoding a decoded message did not reproduce its input bytes")]
    RoundTripMismatch,
}
