//! Accumulator engine.
//!
//! An [`AccumulatorEngine`] holds a validated [`AccumulatorConfig`] and the
//! ring it implies.  It never stores accumulator values: callers own every
//! value and every witness, and each fold returns a fresh value.
//!
//! Folding an element hashes it, turns the digest into an exponent, moves the
//! exponent to the next prime and multiplies it into the current value modulo
//! `2^n`.  Because ring multiplication is commutative, a witness (a value that
//! has absorbed everything except one element) can be brought up to date by
//! folding the same later elements into it, and membership is checked by
//! folding the missing element and comparing against the live accumulator.
//!
//! The modulus is a power of two rather than a hard-to-factor composite, so
//! this construction does not carry the security argument of RSA-style
//! accumulators.  Unpredictability comes only from the random seed.

use crate::config::{AccumulatorConfig, ConfigOverrides, ExponentMode};
use crate::error::Result;
use crate::hash::digest_words;
use crate::integer::{next_prime, random_limbs, Ring};
use crate::value::AccumulatorValue;
use num_bigint::{BigInt, BigUint};
use num_traits::One;
use rand::rngs::OsRng;
use rand::{CryptoRng, Rng};
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

/// Limb count used when the configured bit count yields none.
const FALLBACK_SEED_LIMBS: u64 = 20;

/// Batch size above which witness updates fan out over rayon.
#[cfg(not(target_arch = "wasm32"))]
const PARALLEL_THRESHOLD: usize = 64;

/// Creates seeds and folds elements into accumulator values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccumulatorEngine {
    config: AccumulatorConfig,
    ring: Ring,
}

impl AccumulatorEngine {
    /// Builds an engine from a configuration.
    ///
    /// Fails with a configuration error when the bit count is zero or too
    /// large, and with a dependency error when the hash algorithm was
    /// compiled out.
    pub fn new(config: AccumulatorConfig) -> Result<Self> {
        config.validate()?;
        let output_bits = config.hash_algorithm.output_bits();
        if output_bits != config.hash_bit_count {
            log::warn!(
                "hash bit count {} differs from the {}-bit {} digest",
                config.hash_bit_count,
                output_bits,
                config.hash_algorithm
            );
        }
        log::debug!(
            "accumulator engine: hash={} bits={} word_width={} exponent={}",
            config.hash_algorithm,
            config.hash_bit_count,
            config.word_width.bits(),
            config.exponent_mode
        );
        Ok(Self {
            ring: Ring::new(config.hash_bit_count),
            config,
        })
    }

    /// Builds an engine from the defaults with `overrides` applied.
    pub fn with_overrides(overrides: &ConfigOverrides) -> Result<Self> {
        Self::new(overrides.apply(AccumulatorConfig::default())?)
    }

    /// Builds an engine from a JSON overrides document.
    pub fn from_json(input: &str) -> Result<Self> {
        Self::with_overrides(&ConfigOverrides::from_json_str(input)?)
    }

    /// The configuration this engine was built from.
    pub fn config(&self) -> &AccumulatorConfig {
        &self.config
    }

    /// The ring modulus `2^hash_bit_count`.
    pub fn modulus(&self) -> &BigUint {
        self.ring.modulus()
    }

    /// Number of 64-bit limbs in each random seed factor.
    pub fn seed_limbs(&self) -> u64 {
        let limbs = u64::from(self.config.hash_bit_count).div_ceil(16);
        if limbs == 0 {
            FALLBACK_SEED_LIMBS
        } else {
            limbs
        }
    }

    /// Creates a fresh seed and renders it as a decimal string.
    pub fn create_seed(&self) -> Result<String> {
        Ok(self.create_seed_value()?.to_decimal())
    }

    /// Creates a fresh seed from the operating system's random source.
    pub fn create_seed_value(&self) -> Result<AccumulatorValue> {
        self.create_seed_with_rng(&mut OsRng)
    }

    /// Creates a fresh seed from `rng`.
    ///
    /// The seed is the product of two primes, each the next prime above the
    /// product of two random integers, reduced into the ring.
    pub fn create_seed_with_rng<R>(&self, rng: &mut R) -> Result<AccumulatorValue>
    where
        R: Rng + CryptoRng + ?Sized,
    {
        let limbs = self.seed_limbs();
        let s1a = random_limbs(rng, limbs);
        let s1b = random_limbs(rng, limbs);
        let s2a = random_limbs(rng, limbs);
        let s2b = random_limbs(rng, limbs);

        #[cfg(not(target_arch = "wasm32"))]
        let (p1, p2) = rayon::join(
            || next_prime(&(s1a * s1b)),
            || next_prime(&(s2a * s2b)),
        );
        #[cfg(target_arch = "wasm32")]
        let (p1, p2) = (next_prime(&(s1a * s1b)), next_prime(&(s2a * s2b)));

        let seed = self.ring.reduce(p1? * p2?);
        log::debug!("created seed of {} bits from {limbs}-limb factors", seed.bits());
        Ok(AccumulatorValue::new(seed))
    }

    /// Derives the prime an element multiplies into the accumulator.
    pub fn prime_exponent(&self, element: impl AsRef<[u8]>) -> Result<BigUint> {
        let digest = self.config.hash_algorithm.digest(element.as_ref())?;
        let words = digest_words(&digest, self.config.word_width);
        let exponent = match self.config.exponent_mode {
            ExponentMode::FirstWord => {
                let first = BigInt::from(words.first().copied().unwrap_or(1));
                num_traits::pow(first, words.len())
            }
            ExponentMode::AllWords => words
                .iter()
                .fold(BigInt::one(), |acc, word| acc * BigInt::from(*word)),
        };
        let prime = next_prime(exponent.magnitude())?;
        log::trace!(
            "element digest={} prime_bits={}",
            hex::encode(&digest),
            prime.bits()
        );
        Ok(prime)
    }

    /// Folds `element` into the decimal value `current`.
    ///
    /// `current` must be a non-negative decimal integer; anything else is an
    /// invalid value error.
    pub fn accumulate(&self, current: &str, element: impl AsRef<[u8]>) -> Result<String> {
        let current = AccumulatorValue::from_decimal(current)?;
        Ok(self.accumulate_value(&current, element)?.to_decimal())
    }

    /// Folds `element` into `current`, leaving `current` untouched.
    pub fn accumulate_value(
        &self,
        current: &AccumulatorValue,
        element: impl AsRef<[u8]>,
    ) -> Result<AccumulatorValue> {
        let prime = self.prime_exponent(element)?;
        Ok(self.fold_prime(current, &prime))
    }

    /// Folds every element of `elements`, in order, into `current`.
    pub fn accumulate_all<I>(
        &self,
        current: &AccumulatorValue,
        elements: I,
    ) -> Result<AccumulatorValue>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        elements.into_iter().try_fold(current.clone(), |acc, element| {
            self.accumulate_value(&acc, element)
        })
    }

    /// Folds one new element into a batch of tracked witnesses.
    ///
    /// The element's prime is derived once for the whole batch.
    pub fn update_witnesses(
        &self,
        witnesses: &[AccumulatorValue],
        element: impl AsRef<[u8]>,
    ) -> Result<Vec<AccumulatorValue>> {
        let prime = self.prime_exponent(element)?;
        #[cfg(not(target_arch = "wasm32"))]
        {
            if witnesses.len() >= PARALLEL_THRESHOLD && rayon::current_num_threads() > 1 {
                return Ok(witnesses
                    .par_iter()
                    .map(|witness| self.fold_prime(witness, &prime))
                    .collect());
            }
        }
        Ok(witnesses
            .iter()
            .map(|witness| self.fold_prime(witness, &prime))
            .collect())
    }

    /// Checks that folding `element` into `witness` reproduces `accumulator`.
    pub fn verify_membership(
        &self,
        accumulator: &AccumulatorValue,
        witness: &AccumulatorValue,
        element: impl AsRef<[u8]>,
    ) -> Result<bool> {
        Ok(&self.accumulate_value(witness, element)? == accumulator)
    }

    fn fold_prime(&self, current: &AccumulatorValue, prime: &BigUint) -> AccumulatorValue {
        AccumulatorValue::new(self.ring.reduce(current.as_biguint() * prime))
    }
}
