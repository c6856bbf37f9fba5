#![deny(missing_docs)]

//! # ring_accumulator
//!
//! **ring_accumulator** is a hash-to-prime cryptographic accumulator.  A single
//! big integer summarises every element folded into it, and any holder of a
//! *witness* (an accumulator value that has absorbed every element except
//! their own) can show that their element is present without revealing the
//! rest of the set.
//!
//! ## Features
//!
//! * **Seed creation**: [`AccumulatorEngine::create_seed`] multiplies two
//!   random primes into a fresh starting value.
//! * **Folding**: [`AccumulatorEngine::accumulate`] hashes an element, derives
//!   a prime exponent from the digest and multiplies it into the current value
//!   modulo `2^n`.  Folds commute, so order never matters.
//! * **Witnesses**: a witness is just another [`AccumulatorValue`].  Keep it up
//!   to date with [`AccumulatorEngine::update_witnesses`] and check it with
//!   [`AccumulatorEngine::verify_membership`].
//! * **Configuration**: [`AccumulatorConfig`] picks the hash, the ring size and
//!   the exponent rule; [`ConfigOverrides`] layers JSON or key/value settings
//!   over the defaults.
//!
//! The ring modulus is `2^n`, which is trivially factorable.  Unlike RSA-style
//! accumulators, the scheme relies on the unpredictability of the seed alone.
//!
//! ## Usage
//!
//! ```rust
//! use ring_accumulator::{AccumulatorConfig, AccumulatorEngine};
//!
//! let engine = AccumulatorEngine::new(AccumulatorConfig::default()).unwrap();
//! let seed = "57808458560955605718711154358856228929385560312576663845370661406324640956711";
//!
//! // The witness for "b" is the accumulator before "b" was added...
//! let a = engine.accumulate(seed, "a").unwrap();
//! let b = engine.accumulate(&a, "b").unwrap();
//! let c = engine.accumulate(&b, "c").unwrap();
//! // ...kept current by folding every later element into it.
//! let witness = engine.accumulate(&a, "c").unwrap();
//!
//! assert_eq!(engine.accumulate(&witness, "b").unwrap(), c);
//! ```

pub mod config;
pub mod engine;
mod error;
pub mod hash;
pub mod integer;
mod value;

pub use config::{AccumulatorConfig, ConfigOverrides, ExponentMode, WordWidth};
pub use engine::AccumulatorEngine;
pub use error::{AccumulatorError, Result};
pub use hash::HashAlgorithm;
pub use integer::Ring;
pub use value::AccumulatorValue;
