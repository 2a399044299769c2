use std::marker::PhantomData;

use rug::Integer;

use crate::config::Config;
use crate::error::Error;
use crate::scheme::Scheme;
use crate::utils;

/// Marker type: tables (if any) are still being built.
#[derive(Debug)]
pub struct Fresh(());

/// Marker type: the keypair carries everything `encrypt`/`decrypt`/`add`
/// need and is immutable for the rest of its lifetime.
#[derive(Debug)]
pub struct Ready(());

/// `Pk = (n, g, n^2)`.
#[derive(Clone, Debug)]
pub struct PublicKey {
    pub(crate) n: Integer,
    pub(crate) g: Integer,
    pub(crate) nn: Integer,
}

impl PublicKey {
    /// The Paillier modulus.
    pub fn n(&self) -> &Integer {
        &self.n
    }
    /// The public generator.
    pub fn g(&self) -> &Integer {
        &self.g
    }
    /// `n^2`, cached.
    pub fn nn(&self) -> &Integer {
        &self.nn
    }
}

/// `Sk`. Two shapes, one per key-generation strategy.
#[derive(Clone, Debug)]
pub enum SecretKey {
    /// Scheme1: `(p, q, gamma = lcm(p-1, q-1))`.
    StrongPrime {
        p: Integer,
        q: Integer,
        gamma: Integer,
    },
    /// Scheme3 and the precompute variants: `(p1, p2, alpha = q1*q2)`.
    DsaSubgroup {
        p1: Integer,
        p2: Integer,
        alpha: Integer,
    },
}

impl SecretKey {
    /// The decryption exponent: `gamma` for [`SecretKey::StrongPrime`],
    /// `alpha` for [`SecretKey::DsaSubgroup`].
    pub(crate) fn decryption_exponent(&self) -> &Integer {
        match self {
            SecretKey::StrongPrime { gamma, .. } => gamma,
            SecretKey::DsaSubgroup { alpha, .. } => alpha,
        }
    }

    /// First prime factor of `n`.
    pub fn p(&self) -> &Integer {
        match self {
            SecretKey::StrongPrime { p, .. } => p,
            SecretKey::DsaSubgroup { p1, .. } => p1,
        }
    }

    /// Second prime factor of `n`.
    pub fn q(&self) -> &Integer {
        match self {
            SecretKey::StrongPrime { q, .. } => q,
            SecretKey::DsaSubgroup { p2, .. } => p2,
        }
    }
}

/// Optional precomputation tables speeding up encryption.
///
/// `gm` holds the 2-row message table (`Tm[i][j] = g^(B^i * j) mod n^2`);
/// `gnr` holds the randomizer table `Tr` (`B` independent values of
/// `(g^n)^r mod n^2`). Modeled as `Option<Vec<Integer>>` rather than the
/// source's string-keyed maps, per the "dynamic collection of mixed-width
/// integers" guidance: a dense, index-addressed `Vec` is the natural fit
/// once the interchange format isn't the constraint.
#[derive(Clone, Debug, Default)]
pub struct Tables {
    pub(crate) gm: Option<[Vec<Integer>; 2]>,
    pub(crate) gnr: Option<Vec<Integer>>,
}

/// A Paillier keypair for one of the five variants, plus whatever
/// precomputation tables that variant uses.
///
/// `Keypair<Fresh>` exists only transiently, while [`crate::keygen`] is
/// still filling in tables; only `Keypair<Ready>` exposes
/// `encrypt`/`decrypt`/`add`, per the state machine in the source design.
/// Once built, a `Keypair<Ready>` never changes, so it's `Send + Sync` and
/// safe to share across threads behind an `Arc`.
pub struct Keypair<State = Ready> {
    pub(crate) scheme: Scheme,
    pub(crate) config: Config,
    pub(crate) public: PublicKey,
    pub(crate) secret: SecretKey,
    pub(crate) tables: Tables,
    /// `L(g^d mod n^2)`, cached per spec: it depends only on key material.
    pub(crate) den: Integer,
    _state: PhantomData<State>,
}

impl Keypair<Fresh> {
    /// Builds a fresh keypair from freshly generated key material, with no
    /// tables yet. Computes and caches the decryption denominator.
    pub(crate) fn new(
        scheme: Scheme,
        config: Config,
        public: PublicKey,
        secret: SecretKey,
    ) -> Result<Self, Error> {
        let d = secret.decryption_exponent();
        let raised = utils::modpow(&public.g, d, &public.nn)?;
        let den = utils::l_function(&raised, &public.n);
        Ok(Keypair {
            scheme,
            config,
            public,
            secret,
            tables: Tables::default(),
            den,
            _state: PhantomData,
        })
    }

    /// Whether this variant's scheme needs any precomputation at all.
    pub(crate) fn needs_tables(&self) -> bool {
        self.scheme.uses_gm_table() || self.scheme.uses_gnr_table()
    }

    /// Completes the state machine transition once tables (if any) are built.
    pub(crate) fn into_ready(self, tables: Tables) -> Keypair<Ready> {
        Keypair {
            scheme: self.scheme,
            config: self.config,
            public: self.public,
            secret: self.secret,
            tables,
            den: self.den,
            _state: PhantomData,
        }
    }
}

impl<State> Keypair<State> {
    /// Which of the five variants this keypair implements.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// The secret key.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret
    }

    /// The configuration this keypair was generated (or reconstructed) with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Overrides the `cheat` toggle on this keypair, returning it by value.
    ///
    /// Useful after [`crate::load`], which never persists `cheat` (it isn't
    /// part of the on-disk file layout): a caller that wants the weakened
    /// randomizer for a performance run can opt back in explicitly.
    pub fn with_cheat(mut self, cheat: bool) -> Self {
        self.config.cheat = cheat;
        self
    }
}

impl Keypair<Ready> {
    /// The precomputed tables this keypair carries, if any.
    pub fn tables(&self) -> &Tables {
        &self.tables
    }
}

impl Tables {
    /// The message table, if this variant precomputes one.
    pub fn gm(&self) -> Option<&[Vec<Integer>; 2]> {
        self.gm.as_ref()
    }

    /// The randomizer table, if this variant precomputes one.
    pub fn gnr(&self) -> Option<&[Integer]> {
        self.gnr.as_deref()
    }
}
