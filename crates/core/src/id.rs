//! Job posting identifier.

use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DomainError, DomainResult};

/// Canonical identifier of a job posting.
///
/// Every cache in the system is keyed by this string form. Numeric ids coming
/// from callers or from JSON are coerced to their decimal representation, so
/// `JobId::from(42u64)` and `JobId::from("42")` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Parse an id supplied by an external caller.
    ///
    /// Surrounding whitespace is trimmed; a blank id is rejected.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("JobId: must not be blank"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for JobId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for JobId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&JobId> for JobId {
    fn from(value: &JobId) -> Self {
        value.clone()
    }
}

macro_rules! impl_numeric_job_id {
    ($($t:ty),*) => {
        $(
            impl From<$t> for JobId {
                fn from(value: $t) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

impl_numeric_job_id!(u32, u64, i32, i64, usize);

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Text(s) => Self(s),
            Wire::Unsigned(n) => Self::from(n),
            Wire::Signed(n) => Self::from(n),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn numeric_and_string_ids_share_a_key() {
        assert_eq!(JobId::from(42u64), JobId::from("42"));
        assert_eq!(JobId::from(-7i64).as_str(), "-7");
    }

    #[test]
    fn parse_trims_and_rejects_blank() {
        assert_eq!(JobId::parse("  17 ").unwrap().as_str(), "17");
        assert!(matches!(JobId::parse("   "), Err(DomainError::InvalidId(_))));
        assert!("".parse::<JobId>().is_err());
    }

    #[test]
    fn deserializes_from_string_or_number() {
        let from_num: JobId = serde_json::from_str("42").unwrap();
        let from_str: JobId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_num, from_str);
        assert_eq!(serde_json::to_string(&from_num).unwrap(), "\"42\"");
    }

    proptest! {
        /// Property: coercing any integer yields the same key as its decimal text.
        #[test]
        fn integer_coercion_matches_decimal_text(n in any::<u64>()) {
            prop_assert_eq!(JobId::from(n), JobId::from(n.to_string()));
        }
    }
}
