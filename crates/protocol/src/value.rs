use crate::error::Error;
use crate::message::Message;

/// The value half of a `(Key, TagValue)` pair.
///
/// Modeled as a tagged variant rather than a single opaque byte string so that integer
/// tags and nested messages carry their structure in the type instead of being re-parsed
/// by every caller.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TagValue {
    Opaque(Vec<u8>),
    Integer32(u32),
    Integer64(u64),
    Nested(Message),
}

impl TagValue {
    /// Length of this value once encoded to the wire, in bytes.
    pub fn encoded_len(&self) -> usize {
        match self {
            TagValue::Opaque(bytes) => bytes.len(),
            TagValue::Integer32(_) => 4,
            TagValue::Integer64(_) => 8,
            TagValue::Nested(msg) => msg.encoded_len(),
        }
    }

    /// Serialize this value's bytes (without re-validating alignment; callers only build
    /// `TagValue`s through constructors that already uphold the length-multiple-of-4
    /// invariant).
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            TagValue::Opaque(bytes) => bytes.clone(),
            TagValue::Integer32(n) => n.to_le_bytes().to_vec(),
            TagValue::Integer64(n) => n.to_le_bytes().to_vec(),
            TagValue::Nested(msg) => msg.encode(),
        }
    }

    /// Interpret this value as an opaque byte slice, regardless of its variant.
    pub fn as_bytes(&self) -> Vec<u8> {
        self.to_bytes()
    }

    /// Interpret a 4-byte value as a little-endian `u32`.
    pub fn to_u32(&self) -> Result<u32, Error> {
        match self {
            TagValue::Integer32(n) => Ok(*n),
            TagValue::Opaque(bytes) if bytes.len() == 4 => {
                Ok(u32::from_le_bytes(bytes[..4].try_into().unwrap()))
            }
            other => Err(Error::BadTagWidth(other.encoded_len())),
        }
    }

    /// Interpret an 8-byte value as a little-endian `u64`.
    pub fn to_u64(&self) -> Result<u64, Error> {
        match self {
            TagValue::Integer64(n) => Ok(*n),
            TagValue::Opaque(bytes) if bytes.len() == 8 => {
                Ok(u64::from_le_bytes(bytes[..8].try_into().unwrap()))
            }
            other => Err(Error::BadTagWidth(other.encoded_len())),
        }
    }

    /// Borrow the nested message, if this value is one.
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            TagValue::Nested(msg) => Some(msg),
            _ => None,
        }
    }
}

impl From<Vec<u8>> for TagValue {
    fn from(bytes: Vec<u8>) -> Self {
        TagValue::Opaque(bytes)
    }
}

impl From<u32> for TagValue {
    fn from(n: u32) -> Self {
        TagValue::Integer32(n)
    }
}

impl From<u64> for TagValue {
    fn from(n: u64) -> Self {
        TagValue::Integer64(n)
    }
}

impl From<Message> for TagValue {
    fn from(msg: Message) -> Self {
        TagValue::Nested(msg)
    }
}
