use crate::error::Error;
use crate::key::Key;
use crate::value::TagValue;

/// Which container a message is being decoded as, used to pick the permitted key set and
/// to resolve which child context a nested tag's value should itself be decoded under.
///
/// Using an explicit table keyed on `(key, context)` rather than a single hard-coded
/// leaf/nested match keeps the permitted sets local to where they're used and makes it
/// straightforward to add a new nesting level without touching the decode loop.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NestingContext {
    /// A request or a reply, the two top-level packet shapes.
    TopLevel,
    /// The body of a `CERT` tag: `{SIG, DELE}`.
    Cert,
    /// The body of a `DELE` tag: `{MINT, MAXT, PUBK}`.
    Dele,
    /// The body of a `SREP` tag: `{RADI, MIDP, ROOT}`.
    Srep,
}

impl NestingContext {
    fn permitted_keys(self) -> &'static [Key] {
        match self {
            NestingContext::TopLevel => &[
                Key::NONC,
                Key::PAD,
                Key::SIG,
                Key::PATH,
                Key::SREP,
                Key::CERT,
                Key::INDX,
            ],
            NestingContext::Cert => &[Key::SIG, Key::DELE],
            NestingContext::Dele => &[Key::MINT, Key::MAXT, Key::PUBK],
            NestingContext::Srep => &[Key::RADI, Key::MIDP, Key::ROOT],
        }
    }

    fn child_context(self, key: Key) -> Option<NestingContext> {
        match (self, key) {
            (NestingContext::TopLevel, Key::CERT) => Some(NestingContext::Cert),
            (NestingContext::TopLevel, Key::SREP) => Some(NestingContext::Srep),
            (NestingContext::Cert, Key::DELE) => Some(NestingContext::Dele),
            _ => None,
        }
    }
}

/// An ordered, unique-keyed collection of tags: both a top-level packet and a nested value.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Message {
    tags: Vec<(Key, TagValue)>,
}

impl Message {
    pub fn new() -> Self {
        Self { tags: Vec::new() }
    }

    /// Insert a tag. Fails if `key` is already present; callers add each key at most once.
    pub fn add(&mut self, key: Key, value: impl Into<TagValue>) -> Result<(), Error> {
        if self.tags.iter().any(|(k, _)| *k == key) {
            return Err(Error::DuplicateTag(key));
        }
        let value = value.into();
        if value.encoded_len() % 4 != 0 {
            return Err(Error::BadValueLength(value.encoded_len()));
        }
        self.tags.push((key, value));
        Ok(())
    }

    pub fn get(&self, key: Key) -> Option<&TagValue> {
        self.tags.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn require(&self, key: Key) -> Result<&TagValue, Error> {
        self.get(key).ok_or(Error::MissingTag(key))
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Total encoded length of this message in bytes, always a multiple of 4.
    pub fn encoded_len(&self) -> usize {
        let n = self.tags.len();
        if n == 0 {
            return 4;
        }
        let header_len = 8 * n;
        let values_len: usize = self.tags.iter().map(|(_, v)| v.encoded_len()).sum();
        header_len + values_len
    }

    /// Serialize this message. Tags are emitted in ascending key order regardless of the
    /// order they were added in.
    pub fn encode(&self) -> Vec<u8> {
        let mut sorted = self.tags.clone();
        sorted.sort_by_key(|(k, _)| *k);

        let n = sorted.len();
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&(n as u32).to_le_bytes());

        if n == 0 {
            return out;
        }

        let mut cumulative = 0u32;
        for (_, value) in sorted.iter().take(n - 1) {
            cumulative += value.encoded_len() as u32;
            out.extend_from_slice(&cumulative.to_le_bytes());
        }

        for (key, _) in &sorted {
            out.extend_from_slice(&key.wire_bytes());
        }

        for (_, value) in &sorted {
            out.extend_from_slice(&value.to_bytes());
        }

        out
    }

    /// Parse `buf` as a message valid in `ctx`, validating ordering, offsets, and that
    /// every key is permitted at this nesting level. Asserts that re-encoding the result
    /// reproduces `buf` exactly.
    pub fn decode(buf: &[u8], ctx: NestingContext) -> Result<Self, Error> {
        if buf.len() % 4 != 0 {
            return Err(Error::Unaligned(buf.len()));
        }
        if buf.len() < 4 {
            return Err(Error::MalformedPacket(buf.len()));
        }

        let n = u32::from_le_bytes(buf[0..4].try_into().unwrap()) as usize;
        if n == 0 {
            return Ok(Message::new());
        }

        let header_len = 8 * n;
        if header_len > buf.len() {
            return Err(Error::MalformedPacket(buf.len()));
        }

        let values_len = buf.len() - header_len;

        // offsets[0] = 0 is implicit; offsets[1..n] are read from the header;
        // offsets[n] = values_len is implicit (the end of the value region).
        let mut offsets = Vec::with_capacity(n + 1);
        offsets.push(0u32);
        for i in 0..(n - 1) {
            let pos = 4 + 4 * i;
            let offset = u32::from_le_bytes(buf[pos..pos + 4].try_into().unwrap());
            if (offset as usize) > values_len {
                return Err(Error::OffsetOutOfRange(offset, values_len));
            }
            if offset < *offsets.last().unwrap() {
                return Err(Error::UnorderedOffset(*offsets.last().unwrap(), offset));
            }
            offsets.push(offset);
        }
        offsets.push(values_len as u32);

        let keys_start = 4 + 4 * (n - 1);
        let permitted = ctx.permitted_keys();
        let mut keys = Vec::with_capacity(n);
        for i in 0..n {
            let pos = keys_start + 4 * i;
            let raw: [u8; 4] = buf[pos..pos + 4].try_into().unwrap();
            let key = match Key::from_wire_bytes(raw) {
                Some(key) if permitted.contains(&key) => key,
                // Recognized key, wrong nesting level, or a 4-byte sequence that isn't
                // any known key at all: both are "a tag we don't accept here", so both
                // surface the same way to callers.
                Some(_) | None => return Err(Error::UnknownTag(raw)),
            };
            keys.push(key);
        }
        for window in keys.windows(2) {
            if window[0] >= window[1] {
                return Err(Error::UnorderedTag(window[0], window[1]));
            }
        }

        let values_start = header_len;
        let mut message = Message::new();
        for (i, key) in keys.into_iter().enumerate() {
            let start = values_start + offsets[i] as usize;
            let end = values_start + offsets[i + 1] as usize;
            let raw_value = &buf[start..end];
            if raw_value.len() % 4 != 0 {
                return Err(Error::BadValueLength(raw_value.len()));
            }

            let value = if key.is_nested() {
                let child_ctx = ctx
                    .child_context(key)
                    .expect("is_nested() keys always have a child context");
                TagValue::Nested(Message::decode(raw_value, child_ctx)?)
            } else {
                TagValue::Opaque(raw_value.to_vec())
            };

            message.add(key, value)?;
        }

        if message.encode() != buf {
            return Err(Error::RoundTripMismatch);
        }

        Ok(message)
    }

    /// Pad a request message with a `PAD` tag so its encoded length is exactly 1024
    /// bytes, provided the pre-padding length was under 1024. A no-op otherwise.
    pub fn add_padding(&mut self) -> Result<(), Error> {
        let current = self.encoded_len();
        if current >= 1024 {
            return Ok(());
        }
        let pad_len = 1016usize.saturating_sub(current);
        self.add(Key::PAD, vec![0u8; pad_len])
    }
}
