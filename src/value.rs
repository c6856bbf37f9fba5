//! The accumulator value type.
//!
//! Accumulator values and witnesses are the same thing: a non-negative
//! integer in the engine's ring.  They cross every external boundary as
//! decimal digit strings of unbounded length.

use crate::error::{AccumulatorError, Result};
use num_bigint::BigUint;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An accumulator (or witness) value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccumulatorValue(BigUint);

impl AccumulatorValue {
    /// Wraps a raw integer.
    pub fn new(value: BigUint) -> Self {
        Self(value)
    }

    /// Parses a decimal digit string.
    ///
    /// Only ASCII digits are accepted: no sign, whitespace or separators.
    pub fn from_decimal(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(AccumulatorError::InvalidValue("empty string".to_string()));
        }
        if let Some(bad) = input.chars().find(|c| !c.is_ascii_digit()) {
            return Err(AccumulatorError::InvalidValue(format!(
                "unexpected character {bad:?} in '{input}'"
            )));
        }
        BigUint::parse_bytes(input.as_bytes(), 10)
            .map(Self)
            .ok_or_else(|| {
                AccumulatorError::InvalidValue(format!("'{input}' is not a decimal integer"))
            })
    }

    /// Renders the value as a decimal digit string.
    pub fn to_decimal(&self) -> String {
        self.0.to_str_radix(10)
    }

    /// Borrows the underlying integer.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Consumes the wrapper.
    pub fn into_biguint(self) -> BigUint {
        self.0
    }
}

impl From<BigUint> for AccumulatorValue {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<u64> for AccumulatorValue {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl FromStr for AccumulatorValue {
    type Err = AccumulatorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_decimal(s)
    }
}

impl fmt::Display for AccumulatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for AccumulatorValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccumulatorValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::from_decimal(&text).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str =
        "57808458560955605718711154358856228929385560312576663845370661406324640956711";

    #[test]
    fn decimal_text_survives_parsing() {
        let value: AccumulatorValue = SEED.parse().unwrap();
        assert_eq!(value.to_decimal(), SEED);
        assert_eq!(value.to_string(), SEED);
    }

    #[test]
    fn zero_is_a_valid_value() {
        let value = AccumulatorValue::from_decimal("0").unwrap();
        assert_eq!(value, AccumulatorValue::from(0u64));
    }

    #[test]
    fn malformed_values_are_rejected() {
        for input in ["", "-5", "+5", "12a", " 12", "1_000", "0x10", "1.5"] {
            let err = AccumulatorValue::from_decimal(input).unwrap_err();
            assert!(
                matches!(err, AccumulatorError::InvalidValue(_)),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn serde_uses_decimal_strings() {
        let value: AccumulatorValue = SEED.parse().unwrap();
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, format!("\"{SEED}\""));
        let parsed: AccumulatorValue = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, value);
        assert!(serde_json::from_str::<AccumulatorValue>("\"-1\"").is_err());
    }
}
