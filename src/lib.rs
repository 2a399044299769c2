//! Comparison harness for five variants of Paillier encryption.
//!
//! Two key-generation strategies, strong-prime ([`Scheme::Scheme1`]) and
//! DSA-parameter (everything else), crossed with whether encryption
//! precomputes a message table, a randomizer table, both, or neither. See
//! [`Scheme`] for the full list and [`generate`] for the entry point.

mod cipher;
mod config;
mod error;
mod keygen;
mod keypair;
mod persistence;
mod scheme;
mod tables;
pub mod utils;

use rand_core::{CryptoRng, RngCore};
use rug::Integer;

pub use self::config::{Config, DEFAULT_KEYSIZE, NO_GNR, POWER};
pub use self::error::Error;
pub use self::keypair::{Fresh, Keypair, PublicKey, Ready, SecretKey, Tables};
pub use self::scheme::Scheme;

/// Generates a fresh keypair for `scheme`, running whichever key-generation
/// strategy and precomputation that variant requires.
pub fn generate(
    rng: &mut (impl RngCore + CryptoRng),
    scheme: Scheme,
    config: Config,
) -> Result<Keypair<Ready>, Error> {
    let fresh = if scheme.uses_strong_prime_keygen() {
        keygen::generate_scheme1(rng, &config)?
    } else {
        keygen::generate_dsa(rng, scheme, &config)?
    };

    let tables = if fresh.needs_tables() {
        tables::build_for(&fresh, rng)?
    } else {
        Tables::default()
    };

    Ok(fresh.into_ready(tables))
}

/// Writes `keypair` to disk under `params/`, returning the file name it was
/// written to.
pub fn save(keypair: &Keypair<Ready>) -> Result<String, Error> {
    persistence::save(keypair)
}

/// Reads back a keypair previously written by [`save`].
pub fn load(scheme: Scheme, file_name: &str) -> Result<Keypair<Ready>, Error> {
    persistence::load(scheme, file_name)
}

/// Draws `count` uniform random messages in `[0, n)`, for benchmarking or
/// property tests that need a batch of plaintexts rather than one at a time.
pub fn random_messages(
    rng: &mut (impl RngCore + CryptoRng),
    n: &Integer,
    count: usize,
) -> Vec<Integer> {
    let zero = Integer::from(0);
    let upper = Integer::from(n - 1);
    (0..count)
        .map(|_| utils::rand_range(rng, &zero, &upper))
        .collect()
}
