//! Segment identity using prefixed, monotonic ULIDs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

use crate::core::error::ValidationError;

/// Prefix carried by every segment identifier
pub const SEGMENT_PREFIX: &str = "SEG";

/// Opaque, unique customer segment identifier (`SEG-<ULID>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId {
    ulid: Ulid,
}

impl SegmentId {
    /// Parse a SegmentId from a string
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", SEGMENT_PREFIX, self.ulid)
    }
}

impl FromStr for SegmentId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, ulid_str) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;

        if !prefix.eq_ignore_ascii_case(SEGMENT_PREFIX) {
            return Err(IdParseError::InvalidPrefix(prefix.to_string()));
        }

        let ulid = Ulid::from_string(ulid_str)
            .map_err(|e| IdParseError::InvalidUlid(ulid_str.to_string(), e.to_string()))?;

        Ok(Self { ulid })
    }
}

impl Serialize for SegmentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SegmentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Hands out strictly increasing segment ids
///
/// Ids generated within the same millisecond are ordered by incrementing the
/// random component of the previous id, so an id is never handed out twice.
#[derive(Debug, Default, Clone)]
pub struct SegmentIdGenerator {
    last: Option<Ulid>,
}

impl SegmentIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume after the given ids (e.g. segments restored from a snapshot)
    pub fn resume_after<'a>(ids: impl IntoIterator<Item = &'a SegmentId>) -> Self {
        Self {
            last: ids.into_iter().map(|id| id.ulid).max(),
        }
    }

    /// Generate the next id
    pub fn next_id(&mut self) -> Result<SegmentId, ValidationError> {
        let candidate = Ulid::new();
        let ulid = match self.last {
            Some(last) if candidate <= last => last.increment().ok_or_else(|| {
                ValidationError::Identity("segment id space exhausted for this millisecond".into())
            })?,
            _ => candidate,
        };
        self.last = Some(ulid);
        Ok(SegmentId { ulid })
    }
}

/// Errors that can occur when parsing segment IDs
#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("invalid segment prefix: '{0}' (expected SEG)")]
    InvalidPrefix(String),

    #[error("missing '-' delimiter in segment ID: '{0}'")]
    MissingDelimiter(String),

    #[error("invalid ULID '{0}': {1}")]
    InvalidUlid(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_id_format() {
        let id = SegmentIdGenerator::new().next_id().unwrap();
        assert!(id.to_string().starts_with("SEG-"));
        assert_eq!(id.to_string().len(), 30); // SEG- (4) + ULID (26)
    }

    #[test]
    fn test_segment_id_roundtrip() {
        let original = SegmentIdGenerator::new().next_id().unwrap();
        let parsed = SegmentId::parse(&original.to_string()).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_generator_is_strictly_increasing() {
        let mut generator = SegmentIdGenerator::new();
        let ids: Vec<SegmentId> = (0..200).map(|_| generator.next_id().unwrap()).collect();
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_resume_after_never_reuses() {
        let mut generator = SegmentIdGenerator::new();
        let first = generator.next_id().unwrap();
        let second = generator.next_id().unwrap();

        let mut resumed = SegmentIdGenerator::resume_after([&first, &second]);
        assert!(resumed.next_id().unwrap() > second);
    }

    #[test]
    fn test_invalid_ids() {
        assert!(matches!(
            SegmentId::parse("REQ-01HQ3K4N5M6P7R8S9T0UVWXYZ").unwrap_err(),
            IdParseError::InvalidPrefix(_)
        ));
        assert!(matches!(
            SegmentId::parse("SEG01HQ3K4N5M6P7R8S9T0UVWXYZ").unwrap_err(),
            IdParseError::MissingDelimiter(_)
        ));
        assert!(matches!(
            SegmentId::parse("SEG-notaulid").unwrap_err(),
            IdParseError::InvalidUlid(_, _)
        ));
    }
}
