//! Composite keys for the key-value store.
//!
//! A [`StoreKey`] is an ordered tuple of string or integer segments. Backends
//! that only understand flat string keys use [`StoreKey::encode`], which joins
//! segments with `/`. String segments escape `%`, `/` and a leading `#`;
//! integer segments are written as `#<n>`, so decoding is lossless.

use std::fmt;

const SEPARATOR: char = '/';
const INT_MARKER: char = '#';

/// A single segment of a [`StoreKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Str(String),
    Int(i64),
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        KeyPart::Str(value.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(value: String) -> Self {
        KeyPart::Str(value)
    }
}

impl From<i64> for KeyPart {
    fn from(value: i64) -> Self {
        KeyPart::Int(value)
    }
}

impl KeyPart {
    fn encode_into(&self, out: &mut String) {
        match self {
            KeyPart::Int(n) => {
                out.push(INT_MARKER);
                out.push_str(&n.to_string());
            }
            KeyPart::Str(s) => {
                for (i, c) in s.chars().enumerate() {
                    match c {
                        '%' => out.push_str("%25"),
                        SEPARATOR => out.push_str("%2F"),
                        INT_MARKER if i == 0 => out.push_str("%23"),
                        other => out.push(other),
                    }
                }
            }
        }
    }

    fn decode(segment: &str) -> Result<Self, KeyDecodeError> {
        if let Some(digits) = segment.strip_prefix(INT_MARKER) {
            return digits
                .parse()
                .map(KeyPart::Int)
                .map_err(|_| KeyDecodeError::InvalidInteger(segment.to_string()));
        }

        let mut out = String::with_capacity(segment.len());
        let mut chars = segment.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            let escape: String = chars.by_ref().take(2).collect();
            match escape.as_str() {
                "25" => out.push('%'),
                "2F" => out.push(SEPARATOR),
                "23" => out.push(INT_MARKER),
                _ => return Err(KeyDecodeError::InvalidEscape(segment.to_string())),
            }
        }
        Ok(KeyPart::Str(out))
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Str(s) => f.write_str(s),
            KeyPart::Int(n) => write!(f, "{}", n),
        }
    }
}

/// Failure to turn an encoded key back into segments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyDecodeError {
    #[error("invalid escape sequence in segment {0:?}")]
    InvalidEscape(String),

    #[error("invalid integer segment {0:?}")]
    InvalidInteger(String),
}

/// Ordered tuple of segments identifying one stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StoreKey {
    parts: Vec<KeyPart>,
}

impl StoreKey {
    pub const RATE_LIMIT_NAMESPACE: &'static str = "rate_limit";
    pub const SUBMISSIONS_COUNT: &'static str = "submissions_count";
    pub const VISITS_NAMESPACE: &'static str = "visits";

    /// Empty key. As a prefix it matches every key.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts<I, P>(parts: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<KeyPart>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a segment.
    pub fn push(mut self, part: impl Into<KeyPart>) -> Self {
        self.parts.push(part.into());
        self
    }

    /// `rate_limit/<action>/<client>`
    pub fn rate_limit(action: &str, client: &str) -> Self {
        Self::rate_limit_prefix().push(action).push(client)
    }

    /// Prefix covering every rate-limit record.
    pub fn rate_limit_prefix() -> Self {
        Self::new().push(Self::RATE_LIMIT_NAMESPACE)
    }

    pub fn submissions_count() -> Self {
        Self::new().push(Self::SUBMISSIONS_COUNT)
    }

    /// `visits/<page>`
    pub fn visits(page: &str) -> Self {
        Self::new().push(Self::VISITS_NAMESPACE).push(page)
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Segment-wise prefix test; `rate_limit` never matches `rate_limits/..`.
    pub fn starts_with(&self, prefix: &StoreKey) -> bool {
        self.parts.starts_with(&prefix.parts)
    }

    /// Flat string form for string-keyed backends.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push(SEPARATOR);
            }
            part.encode_into(&mut out);
        }
        out
    }

    /// String that every encoded key under this prefix starts with.
    pub fn encode_prefix(&self) -> String {
        if self.parts.is_empty() {
            return String::new();
        }
        let mut out = self.encode();
        out.push(SEPARATOR);
        out
    }

    pub fn decode(encoded: &str) -> Result<Self, KeyDecodeError> {
        if encoded.is_empty() {
            return Ok(Self::new());
        }
        let parts = encoded
            .split(SEPARATOR)
            .map(KeyPart::decode)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { parts })
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
