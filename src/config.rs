//! Engine configuration.
//!
//! [`AccumulatorConfig`] is the validated, immutable set of parameters an
//! [`AccumulatorEngine`](crate::AccumulatorEngine) is built from.  Callers that
//! only want to change a few settings start from the defaults and apply a
//! [`ConfigOverrides`], which can be decoded from JSON or assembled from
//! key/value pairs.  Keys outside the allow-list are ignored; a recognised key
//! that is present but empty is an error rather than a silent default.

use crate::error::{AccumulatorError, Result};
use crate::hash::HashAlgorithm;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Default digest size, in bits, matching the default `sha256` algorithm.
pub const DEFAULT_HASH_BIT_COUNT: u32 = 256;

/// Largest accepted ring size exponent, the widest digest on offer.
///
/// Seed factors grow with the ring (`8 * n`-bit products), so this also
/// bounds the cost of [`AccumulatorEngine::create_seed`](crate::AccumulatorEngine::create_seed).
pub const MAX_HASH_BIT_COUNT: u32 = 512;

/// Keys recognised by [`ConfigOverrides::from_pairs`].
pub const CONFIG_KEYS: &[&str] = &[
    "hash_algorithm",
    "hash_type",
    "hash_bit_count",
    "word_width",
    "exponent_mode",
];

/// Width of the signed little-endian words a digest is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WordWidth {
    /// 32-bit words.
    Bits32,
    /// 64-bit words.
    #[default]
    Bits64,
}

impl WordWidth {
    /// Parses a width given in bits.
    pub fn from_bits(bits: i64) -> Result<Self> {
        match bits {
            32 => Ok(WordWidth::Bits32),
            64 => Ok(WordWidth::Bits64),
            other => Err(AccumulatorError::Configuration(format!(
                "word width must be 32 or 64, got {other}"
            ))),
        }
    }

    /// Width in bits.
    pub fn bits(self) -> u32 {
        match self {
            WordWidth::Bits32 => 32,
            WordWidth::Bits64 => 64,
        }
    }

    /// Width in bytes.
    pub fn bytes(self) -> usize {
        self.bits() as usize / 8
    }
}

/// How the digest words are combined into the exponent before the prime search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExponentMode {
    /// Multiply the first word by itself once per word (`w0^n`).
    ///
    /// This reproduces the published reference vectors.
    #[default]
    FirstWord,
    /// Multiply every word together (`w0 * w1 * ... * wn-1`).
    ///
    /// Reaches far more distinct exponents, but every output differs from
    /// [`ExponentMode::FirstWord`].
    AllWords,
}

impl ExponentMode {
    /// Canonical configuration name.
    pub fn name(self) -> &'static str {
        match self {
            ExponentMode::FirstWord => "first-word",
            ExponentMode::AllWords => "all-words",
        }
    }
}

impl fmt::Display for ExponentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExponentMode {
    type Err = AccumulatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "first-word" => Ok(ExponentMode::FirstWord),
            "all-words" => Ok(ExponentMode::AllWords),
            other => Err(AccumulatorError::Configuration(format!(
                "unknown exponent mode '{other}'"
            ))),
        }
    }
}

/// Validated engine parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccumulatorConfig {
    /// Hash function applied to every element.
    pub hash_algorithm: HashAlgorithm,
    /// Exponent of the ring modulus `2^hash_bit_count`.
    pub hash_bit_count: u32,
    /// Word width used when splitting digests.
    pub word_width: WordWidth,
    /// Exponent derivation rule.
    pub exponent_mode: ExponentMode,
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::Sha256,
            hash_bit_count: DEFAULT_HASH_BIT_COUNT,
            word_width: WordWidth::Bits64,
            exponent_mode: ExponentMode::FirstWord,
        }
    }
}

impl AccumulatorConfig {
    /// Checks the bit count and that the hash algorithm is compiled in.
    pub fn validate(&self) -> Result<()> {
        if self.hash_bit_count == 0 {
            return Err(AccumulatorError::Configuration(
                "hash bit count was not set".to_string(),
            ));
        }
        if self.hash_bit_count > MAX_HASH_BIT_COUNT {
            return Err(AccumulatorError::Configuration(format!(
                "hash bit count {} exceeds {MAX_HASH_BIT_COUNT}",
                self.hash_bit_count
            )));
        }
        if !self.hash_algorithm.is_available() {
            return Err(AccumulatorError::Dependency(format!(
                "hash algorithm '{}' is not compiled into this build",
                self.hash_algorithm
            )));
        }
        Ok(())
    }
}

/// Optional settings layered over [`AccumulatorConfig::default`].
///
/// Every field is optional.  `hash_bit_count` and `word_width` are read as
/// signed integers so that negative values surface as configuration errors
/// instead of decode failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Hash algorithm name (`hash_type` is accepted as an alias).
    pub hash_algorithm: Option<String>,
    /// Ring size exponent.
    pub hash_bit_count: Option<i64>,
    /// Digest word width in bits.
    pub word_width: Option<i64>,
    /// Exponent derivation rule name.
    pub exponent_mode: Option<String>,
}

impl ConfigOverrides {
    /// Decodes overrides from a JSON object.  Unknown keys are ignored.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(input)?;
        Self::from_json_value(&document)
    }

    /// Reads and decodes a JSON overrides file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Decodes overrides from a parsed JSON document.
    ///
    /// The document must be an object.  Recognised keys take strings or
    /// numbers (`"256"` and `256` are the same bit count); `null` or any other
    /// type is a configuration error.  `hash_algorithm` and `hash_type` may not
    /// both be given.
    pub fn from_json_value(document: &Value) -> Result<Self> {
        let Value::Object(entries) = document else {
            return Err(AccumulatorError::Configuration(format!(
                "configuration must be a JSON object, got {}",
                json_kind(document)
            )));
        };
        if entries.contains_key("hash_algorithm") && entries.contains_key("hash_type") {
            return Err(AccumulatorError::Configuration(
                "hash_algorithm and hash_type are the same setting; give only one".to_string(),
            ));
        }
        let mut overrides = Self::default();
        for (key, value) in entries {
            if !CONFIG_KEYS.contains(&key.as_str()) {
                log::warn!("ignoring unrecognised configuration key '{key}'");
                continue;
            }
            let text = match value {
                Value::String(text) => Cow::Borrowed(text.as_str()),
                Value::Number(number) => Cow::Owned(number.to_string()),
                Value::Null => {
                    return Err(AccumulatorError::Configuration(format!("{key} is empty")))
                }
                other => {
                    return Err(AccumulatorError::Configuration(format!(
                        "{key} must be a string or a number, got {}",
                        json_kind(other)
                    )))
                }
            };
            overrides.set(key, &text)?;
        }
        Ok(overrides)
    }

    /// Builds overrides from string key/value pairs.
    ///
    /// Keys not listed in [`CONFIG_KEYS`] are skipped.  Later pairs win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut overrides = Self::default();
        for (key, value) in pairs {
            let key = key.as_ref();
            if CONFIG_KEYS.contains(&key) {
                overrides.set(key, value.as_ref())?;
            } else {
                log::warn!("ignoring unrecognised configuration key '{key}'");
            }
        }
        Ok(overrides)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "hash_algorithm" | "hash_type" => self.hash_algorithm = Some(value.to_string()),
            "hash_bit_count" => self.hash_bit_count = Some(parse_integer(key, value)?),
            "word_width" => self.word_width = Some(parse_integer(key, value)?),
            "exponent_mode" => self.exponent_mode = Some(value.to_string()),
            _ => {}
        }
        Ok(())
    }

    /// Layers these overrides over `base`.
    ///
    /// Only parsing happens here; [`AccumulatorConfig::validate`] is applied
    /// when the engine is constructed.
    pub fn apply(&self, base: AccumulatorConfig) -> Result<AccumulatorConfig> {
        let mut config = base;
        if let Some(name) = &self.hash_algorithm {
            config.hash_algorithm = name.parse()?;
        }
        if let Some(bits) = self.hash_bit_count {
            config.hash_bit_count = u32::try_from(bits)
                .ok()
                .filter(|bits| *bits > 0)
                .ok_or_else(|| {
                    AccumulatorError::Configuration(format!(
                        "hash bit count must be positive, got {bits}"
                    ))
                })?;
        }
        if let Some(width) = self.word_width {
            config.word_width = WordWidth::from_bits(width)?;
        }
        if let Some(mode) = &self.exponent_mode {
            config.exponent_mode = mode.parse()?;
        }
        Ok(config)
    }
}

impl<'de> Deserialize<'de> for ConfigOverrides {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let document = Value::deserialize(deserializer)?;
        Self::from_json_value(&document).map_err(de::Error::custom)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_integer(key: &str, value: &str) -> Result<i64> {
    value.trim().parse::<i64>().map_err(|_| {
        AccumulatorError::Configuration(format!("{key} must be an integer, got '{value}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sha256_over_256_bits() {
        let config = AccumulatorConfig::default();
        assert_eq!(config.hash_algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.hash_bit_count, 256);
        assert_eq!(config.word_width, WordWidth::Bits64);
        assert_eq!(config.exponent_mode, ExponentMode::FirstWord);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_overrides_ignore_unknown_keys() {
        let overrides = ConfigOverrides::from_json_str(
            r#"{"hash_type":"sha512","hash_bit_count":512,"max_ring_size":7,"colour":"red"}"#,
        )
        .unwrap();
        let config = overrides.apply(AccumulatorConfig::default()).unwrap();
        assert_eq!(config.hash_algorithm, HashAlgorithm::Sha512);
        assert_eq!(config.hash_bit_count, 512);
    }

    #[test]
    fn empty_algorithm_is_rejected() {
        let overrides = ConfigOverrides {
            hash_algorithm: Some(String::new()),
            ..Default::default()
        };
        let err = overrides.apply(AccumulatorConfig::default()).unwrap_err();
        assert!(matches!(err, AccumulatorError::Configuration(_)));
    }

    #[test]
    fn zero_and_negative_bit_counts_are_rejected() {
        for bits in [0, -1, -256] {
            let overrides = ConfigOverrides {
                hash_bit_count: Some(bits),
                ..Default::default()
            };
            let err = overrides.apply(AccumulatorConfig::default()).unwrap_err();
            assert!(matches!(err, AccumulatorError::Configuration(_)), "bits={bits}");
        }
        let config = AccumulatorConfig {
            hash_bit_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AccumulatorError::Configuration(_))
        ));
    }

    #[test]
    fn oversized_bit_count_fails_validation() {
        let config = AccumulatorConfig {
            hash_bit_count: MAX_HASH_BIT_COUNT + 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AccumulatorError::Configuration(_))
        ));
    }

    #[test]
    fn pairs_follow_the_allow_list() {
        let overrides = ConfigOverrides::from_pairs([
            ("hash_bit_count", "128"),
            ("word_width", "32"),
            ("exponent_mode", "all_words"),
            ("max_ring_size", "3"),
        ])
        .unwrap();
        let config = overrides.apply(AccumulatorConfig::default()).unwrap();
        assert_eq!(config.hash_bit_count, 128);
        assert_eq!(config.word_width, WordWidth::Bits32);
        assert_eq!(config.exponent_mode, ExponentMode::AllWords);
        assert_eq!(config.hash_algorithm, HashAlgorithm::Sha256);
    }

    #[test]
    fn non_numeric_pair_value_is_a_configuration_error() {
        let err = ConfigOverrides::from_pairs([("hash_bit_count", "lots")]).unwrap_err();
        assert!(matches!(err, AccumulatorError::Configuration(_)));
    }

    #[test]
    fn null_on_a_recognised_key_is_a_configuration_error() {
        for input in [
            r#"{"hash_algorithm":null}"#,
            r#"{"hash_type":null}"#,
            r#"{"hash_bit_count":null}"#,
            r#"{"word_width":null}"#,
            r#"{"exponent_mode":null}"#,
        ] {
            let err = ConfigOverrides::from_json_str(input).unwrap_err();
            assert!(matches!(err, AccumulatorError::Configuration(_)), "{input}");
        }
        let overrides = ConfigOverrides::from_json_str(r#"{"colour":null}"#).unwrap();
        assert_eq!(overrides, ConfigOverrides::default());
    }

    #[test]
    fn numeric_strings_count_as_integers() {
        let overrides =
            ConfigOverrides::from_json_str(r#"{"hash_bit_count":"128","word_width":"32"}"#)
                .unwrap();
        assert_eq!(overrides.hash_bit_count, Some(128));
        assert_eq!(overrides.word_width, Some(32));
    }

    #[test]
    fn wrongly_typed_values_are_configuration_errors() {
        for input in [
            r#"{"hash_bit_count":"lots"}"#,
            r#"{"hash_bit_count":256.5}"#,
            r#"{"hash_bit_count":18446744073709551615}"#,
            r#"{"hash_bit_count":true}"#,
            r#"{"hash_algorithm":["sha512"]}"#,
            r#"{"exponent_mode":{"name":"all-words"}}"#,
            r#"{"hash_algorithm":"sha512","hash_type":"sha256"}"#,
        ] {
            let err = ConfigOverrides::from_json_str(input).unwrap_err();
            assert!(matches!(err, AccumulatorError::Configuration(_)), "{input}");
        }
    }

    #[test]
    fn only_json_objects_are_accepted() {
        for input in [r#"["sha512",512]"#, "512", r#""sha512""#, "null"] {
            let err = ConfigOverrides::from_json_str(input).unwrap_err();
            assert!(matches!(err, AccumulatorError::Configuration(_)), "{input}");
        }
        assert!(matches!(
            ConfigOverrides::from_json_str("{"),
            Err(AccumulatorError::Json(_))
        ));
    }

    #[test]
    fn overrides_deserialize_inside_larger_documents() {
        #[derive(Deserialize)]
        struct Service {
            accumulator: ConfigOverrides,
        }
        let service: Service =
            serde_json::from_str(r#"{"accumulator":{"hash_type":"sha384"}}"#).unwrap();
        assert_eq!(service.accumulator.hash_algorithm.as_deref(), Some("sha384"));
        assert!(serde_json::from_str::<Service>(r#"{"accumulator":[1]}"#).is_err());
    }

    #[test]
    fn bad_word_width_and_mode_are_rejected() {
        assert!(WordWidth::from_bits(16).is_err());
        assert!("every-other-word".parse::<ExponentMode>().is_err());
    }
}
