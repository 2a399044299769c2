//! Encryption, decryption, and homomorphic addition.
//!
//! Dispatch on [`Scheme`] happens only here and in [`crate::tables`]; once a
//! [`Keypair<Ready>`] exists, callers never need to know which variant they
//! hold.

use rand_core::{CryptoRng, RngCore};
use rug::Integer;

use crate::error::{Error, Reason};
use crate::keypair::{Keypair, Ready};
use crate::scheme::Scheme;
use crate::utils;

impl Keypair<Ready> {
    /// Encrypts `m`. Requires `0 <= m < n`; precompute-Gm variants
    /// additionally require `m` to fit in `config().message_limit_bits()`
    /// bits.
    pub fn encrypt(&self, rng: &mut (impl RngCore + CryptoRng), m: &Integer) -> Result<Integer, Error> {
        if m.cmp0().is_lt() || *m >= self.public.n {
            return Err(Reason::MessageOutOfRange.into());
        }

        let gm = self.compute_gm(m)?;
        let gnr = self.compute_gnr(rng)?;
        Ok(Integer::from(gm * gnr) % &self.public.nn)
    }

    /// Decrypts `c`. Requires `0 <= c < n^2`.
    pub fn decrypt(&self, c: &Integer) -> Result<Integer, Error> {
        if c.cmp0().is_lt() || *c >= self.public.nn {
            return Err(Reason::CiphertextOutOfRange.into());
        }

        let d = self.secret.decryption_exponent();
        let raised = utils::modpow(c, d, &self.public.nn)?;
        let num = utils::l_function(&raised, &self.public.n);
        let inv_den = utils::modinv(&self.den, &self.public.n)?;
        Ok(Integer::from(num * inv_den) % &self.public.n)
    }

    /// Homomorphic addition: `add(c1, c2)` decrypts to `(m1 + m2) mod n`.
    /// Binds `n^2` from `self`, not a module-level constant; the source
    /// this crate is distilled from reads a stray module global here.
    pub fn add(&self, c1: &Integer, c2: &Integer) -> Result<Integer, Error> {
        if c1.cmp0().is_lt() || *c1 >= self.public.nn || c2.cmp0().is_lt() || *c2 >= self.public.nn
        {
            return Err(Reason::CiphertextOutOfRange.into());
        }
        Ok(Integer::from(c1 * c2) % &self.public.nn)
    }

    fn compute_gm(&self, m: &Integer) -> Result<Integer, Error> {
        match &self.tables.gm {
            Some([t0, t1]) => {
                let limit = self.config.message_limit_bits();
                if m.significant_bits() > limit {
                    return Err(Reason::MessageTooWideForTables {
                        bits: m.significant_bits(),
                        limit,
                    }
                    .into());
                }
                let power = Integer::from(self.config.power);
                let j0 = Integer::from(m % &power);
                let j1 = Integer::from(Integer::from(m / &power) % &power);
                let idx0 = j0.to_usize().ok_or(Reason::TypeMismatch)?;
                let idx1 = j1.to_usize().ok_or(Reason::TypeMismatch)?;
                Ok(Integer::from(&t0[idx0] * &t1[idx1]) % &self.public.nn)
            }
            None => utils::modpow(&self.public.g, m, &self.public.nn),
        }
    }

    fn compute_gnr(&self, rng: &mut (impl RngCore + CryptoRng)) -> Result<Integer, Error> {
        if let Some(tr) = &self.tables.gnr {
            let picked = utils::sample_without_replacement(rng, tr, self.config.no_gnr);
            let product = picked
                .iter()
                .fold(Integer::from(1), |acc, x| Integer::from(acc * x));
            return Ok(product % &self.public.nn);
        }

        match self.scheme {
            Scheme::Scheme1 => {
                let one = Integer::from(1);
                let exp = utils::rand_range(rng, &one, &self.public.n);
                let r = utils::modpow(&self.public.g, &exp, &self.public.n)?;
                utils::modpow(&r, &self.public.n, &self.public.nn)
            }
            // Scheme3 and PrecomputeGm share the same randomizer recipe.
            // The source has a later refactor that computes
            // `g^((n*r) mod n) mod n^2`, which collapses to `g^0 = 1` and
            // silently disables randomization; this follows the earlier,
            // correct form `(g^n)^r mod n^2` instead.
            _ => {
                let one = Integer::from(1);
                let r = if self.config.cheat {
                    let alpha_minus_one =
                        Integer::from(self.secret.decryption_exponent() - 1);
                    utils::rand_range(rng, &one, &alpha_minus_one)
                } else {
                    let exp = utils::rand_range(rng, &one, &self.public.n);
                    utils::modpow(&self.public.g, &exp, &self.public.n)?
                };
                let gn = utils::modpow(&self.public.g, &self.public.n, &self.public.nn)?;
                utils::modpow(&gn, &r, &self.public.nn)
            }
        }
    }
}
