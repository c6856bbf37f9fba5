//! Arbitrary-precision helpers.
//!
//! The accumulator lives in the ring of integers modulo `2^n`.  This module
//! owns that modulus ([`Ring`]), the next-prime search used both for seeds and
//! for element exponents, and the random limb sampler behind seed creation.

use crate::error::{AccumulatorError, Result};
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_prime::{nt_funcs, PrimalityTestConfig};
use num_traits::One;
use once_cell::sync::Lazy;
use rand::{CryptoRng, Rng};
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

/// Bits per random limb.
pub const LIMB_BITS: u64 = 64;

/// The ring `Z / 2^n Z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    bits: u32,
    modulus: BigUint,
}

impl Ring {
    /// Creates the ring of integers modulo `2^bits`.
    pub fn new(bits: u32) -> Self {
        Self {
            bits,
            modulus: BigUint::one() << bits as usize,
        }
    }

    /// Exponent `n` of the modulus.
    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// The modulus `2^n`.
    #[inline]
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Maps `value` into `[0, 2^n)`.
    ///
    /// Values already inside the ring are returned untouched.
    pub fn reduce(&self, value: BigUint) -> BigUint {
        if value >= self.modulus {
            value % &self.modulus
        } else {
            value
        }
    }

    /// Returns `true` if `value` already lies inside the ring.
    #[inline]
    pub fn contains(&self, value: &BigUint) -> bool {
        value < &self.modulus
    }
}

/// Upper bound of the small primes used to sieve candidates.
const SIEVE_LIMIT: u64 = 1 << 16;

/// Odd candidates examined per sieve window.
const SIEVE_WINDOW: u64 = 4096;

/// Odd primes below [`SIEVE_LIMIT`].
static SIEVE_PRIMES: Lazy<Vec<u64>> = Lazy::new(|| {
    nt_funcs::primes(SIEVE_LIMIT)
        .into_iter()
        .filter(|&p| p != 2 && p < SIEVE_LIMIT)
        .collect()
});

/// Baillie-PSW: a base-2 strong probable-prime test followed by a strong
/// Lucas test.  No random bases, so repeated searches agree.
fn is_probable_prime(candidate: &BigUint) -> bool {
    nt_funcs::is_prime(candidate, Some(PrimalityTestConfig::bpsw())).probably()
}

/// Smallest prime strictly greater than `value`.
///
/// Values that fit in a machine word are answered deterministically.  Larger
/// values are searched in windows of odd candidates: every candidate with a
/// factor below 2^16 is struck out, and only the survivors reach the
/// Baillie-PSW test.
pub fn next_prime(value: &BigUint) -> Result<BigUint> {
    if value.bits() <= 64 {
        return nt_funcs::next_prime(value, Some(PrimalityTestConfig::bpsw())).ok_or_else(|| {
            AccumulatorError::PrimeSearch(format!("no prime found above {value}"))
        });
    }

    let mut start = value + 1u32;
    if start.is_even() {
        start += 1u32;
    }
    Ok(search_windows(start, SIEVE_WINDOW))
}

/// Walks windows of `window` odd candidates from the odd number `start`
/// (which must exceed [`SIEVE_LIMIT`]) until one holds a prime.
fn search_windows(mut start: BigUint, window: u64) -> BigUint {
    let mut residues: Vec<u64> = SIEVE_PRIMES
        .iter()
        .map(|&p| (&start % p).iter_u64_digits().next().unwrap_or(0))
        .collect();
    loop {
        let survivors = sieve_window(&residues, window);
        if let Some(offset) = first_prime(&start, &survivors) {
            return start + 2 * offset;
        }
        start += 2 * window;
        for (residue, &p) in residues.iter_mut().zip(SIEVE_PRIMES.iter()) {
            *residue = (*residue + 2 * window) % p;
        }
    }
}

/// Offsets `i < window` for which `start + 2i` has no factor in the sieve,
/// given `residues[k] = start mod SIEVE_PRIMES[k]`.
fn sieve_window(residues: &[u64], window: u64) -> Vec<u64> {
    let mut struck = vec![false; window as usize];
    for (&residue, &p) in residues.iter().zip(SIEVE_PRIMES.iter()) {
        // start + 2i = 0 (mod p)  <=>  i = -residue / 2 (mod p)
        let half = (p + 1) / 2;
        let mut i = (p - residue) % p * half % p;
        while i < window {
            struck[i as usize] = true;
            i += p;
        }
    }
    struck
        .iter()
        .enumerate()
        .filter(|&(_, &hit)| !hit)
        .map(|(i, _)| i as u64)
        .collect()
}

/// Lowest surviving offset whose candidate passes the primality test.
#[cfg(not(target_arch = "wasm32"))]
fn first_prime(start: &BigUint, survivors: &[u64]) -> Option<u64> {
    survivors
        .par_iter()
        .copied()
        .find_first(|&offset| is_probable_prime(&(start + 2 * offset)))
}

#[cfg(target_arch = "wasm32")]
fn first_prime(start: &BigUint, survivors: &[u64]) -> Option<u64> {
    survivors
        .iter()
        .copied()
        .find(|&offset| is_probable_prime(&(start + 2 * offset)))
}

/// Draws a uniformly random integer of `limbs` 64-bit limbs.
pub fn random_limbs<R>(rng: &mut R, limbs: u64) -> BigUint
where
    R: Rng + CryptoRng + ?Sized,
{
    rng.gen_biguint(limbs * LIMB_BITS)
}
