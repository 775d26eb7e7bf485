//! Numeric record identifiers.

use core::str::FromStr;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::DomainError;

/// Identifier of a stored record (customer, ticket, product, order, ...).
///
/// Identifiers are assigned as `max(existing) + 1` when a record is added.
/// `0` marks a record that has not been stored yet. Fixture and form data may
/// carry the number as a string, so deserialization accepts both.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    pub const fn is_assigned(&self) -> bool {
        self.0 != 0
    }

    /// Next free identifier after the given ones (1 for an empty collection).
    pub fn next_after<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = RecordId>,
    {
        let max = ids.into_iter().map(|id| id.0).max().unwrap_or(0);
        Self(max + 1)
    }
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<RecordId> for u64 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => n
                .as_u64()
                .map(Self)
                .ok_or_else(|| D::Error::custom(format!("invalid record id: {n}"))),
            Value::String(s) => s.parse().map_err(D::Error::custom),
            Value::Null => Ok(Self::default()),
            other => Err(D::Error::custom(format!("invalid record id: {other}"))),
        }
    }
}

/// `Option<RecordId>` where `""` and `null` both mean `None`.
pub mod opt_id {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            other => RecordId::deserialize(other).map(Some).map_err(D::Error::custom),
        }
    }
}

impl FromStr for RecordId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| DomainError::invalid_id(format!("RecordId: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_after_empty_is_one() {
        assert_eq!(RecordId::next_after(Vec::new()), RecordId::new(1));
    }

    #[test]
    fn next_after_uses_max_not_len() {
        let ids = [3, 17, 5].map(RecordId::new);
        assert_eq!(RecordId::next_after(ids), RecordId::new(18));
    }

    #[test]
    fn deserializes_numbers_and_numeric_strings() {
        let ids: Vec<RecordId> = serde_json::from_str(r#"[7, "8", null]"#).unwrap();
        assert_eq!(ids, vec![RecordId::new(7), RecordId::new(8), RecordId::default()]);
        assert!(!ids[2].is_assigned());
        assert!(serde_json::from_str::<RecordId>("-1").is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!("42".parse::<RecordId>().unwrap(), RecordId::new(42));
        match "x1".parse::<RecordId>() {
            Err(DomainError::InvalidId(_)) => {}
            other => panic!("expected InvalidId, got {other:?}"),
        }
    }
}
