//! Precomputation of the message table `Tm` and randomizer table `Tr`.
//!
//! Construction is embarrassingly parallel: every `(i, j)` of `Tm` and
//! every entry of `Tr` is independent, so both are built with `rayon` and
//! collected back into index order. A fatal error in any one work unit
//! aborts the whole build; there's no partial result and no cancellation
//! beyond that.

use rand_core::{CryptoRng, RngCore};
use rayon::prelude::*;
use rug::Integer;

use crate::error::Error;
use crate::keypair::{Fresh, Keypair, Tables};
use crate::utils;

/// Builds `Tm`: for `i in {0, 1}` and `j in [0, power)`,
/// `Tm[i][j] = g^((power^i) * j) mod nn`.
fn build_tm(g: &Integer, nn: &Integer, power: u32) -> Result<[Vec<Integer>; 2], Error> {
    let row = |base: &Integer| -> Result<Vec<Integer>, Error> {
        (0..power)
            .into_par_iter()
            .map(|j| {
                let exp = Integer::from(base * j);
                utils::modpow(g, &exp, nn)
            })
            .collect()
    };

    let row0 = row(&Integer::from(1))?;
    let row1 = row(&Integer::from(power))?;
    Ok([row0, row1])
}

/// Builds `Tr`: `power` independent entries `(g^n)^r mod nn`, each `r`
/// drawn as `g^(rand_range(1, n)) mod n`.
///
/// The randomizer exponents are sampled sequentially up front (the RNG
/// isn't `Send`, and sampling is cheap relative to the modular
/// exponentiations); only the expensive exponentiation is parallelized.
fn build_tr(
    rng: &mut (impl RngCore + CryptoRng),
    g: &Integer,
    n: &Integer,
    nn: &Integer,
    power: u32,
) -> Result<Vec<Integer>, Error> {
    let gn = utils::modpow(g, n, nn)?;
    let one = Integer::from(1);

    let exponents: Vec<Integer> = (0..power)
        .map(|_| utils::rand_range(rng, &one, n))
        .collect();

    exponents
        .into_par_iter()
        .map(|exp| {
            let r = utils::modpow(g, &exp, n)?;
            utils::modpow(&gn, &r, nn)
        })
        .collect()
}

/// Builds whichever tables `keypair`'s scheme requires.
pub(crate) fn build_for(
    keypair: &Keypair<Fresh>,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<Tables, Error> {
    let scheme = keypair.scheme();
    let public = keypair.public_key();
    let power = keypair.config().power;

    let gm = if scheme.uses_gm_table() {
        tracing::debug!(power, "building message table Tm");
        Some(build_tm(public.g(), public.nn(), power)?)
    } else {
        None
    };

    let gnr = if scheme.uses_gnr_table() {
        tracing::debug!(power, "building randomizer table Tr");
        Some(build_tr(rng, public.g(), public.n(), public.nn(), power)?)
    } else {
        None
    };

    Ok(Tables { gm, gnr })
}
