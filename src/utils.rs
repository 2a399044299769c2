//! BigInt arithmetic facade built on [`rug::Integer`].
//!
//! Everything here is variable-time: this crate is research code comparing
//! the performance of several key-generation and encryption strategies, not
//! a constant-time implementation.

use rand_core::{CryptoRng, RngCore};
use rug::{integer::IsPrime, Assign, Complete, Integer};

use crate::error::{Bug, Error, Reason};

/// Wraps any randomness source that implements [`rand_core::RngCore`] and
/// makes it compatible with [`rug::rand`].
pub fn external_rand(rng: &mut impl RngCore) -> rug::rand::ThreadRandState<'_> {
    use bytemuck::TransparentWrapper;

    #[derive(TransparentWrapper)]
    #[repr(transparent)]
    pub struct ExternalRand<R>(R);

    impl<R: RngCore> rug::rand::ThreadRandGen for ExternalRand<R> {
        fn gen(&mut self) -> u32 {
            self.0.next_u32()
        }
    }

    rug::rand::ThreadRandState::new_custom(ExternalRand::wrap_mut(rng))
}

/// Provides functionality not yet present on [`rug::Integer`].
pub trait IntegerExt {
    /// Returns `self mod module`, always in `[0, module)`.
    fn modulo(&self, module: &Self) -> Self;
}

impl IntegerExt for Integer {
    fn modulo(&self, module: &Self) -> Self {
        let c = (self % module).complete();
        if c.cmp0().is_lt() {
            module + c
        } else {
            c
        }
    }
}

/// Checks that `x` is in `Z*_n`.
#[inline(always)]
pub fn in_mult_group(x: &Integer, n: &Integer) -> bool {
    x.cmp0().is_ge() && x.gcd_ref(n).complete() == *Integer::ONE
}

/// Square-and-multiply modular exponentiation.
pub fn modpow(base: &Integer, exp: &Integer, modulus: &Integer) -> Result<Integer, Error> {
    base.clone()
        .pow_mod(exp, modulus)
        .map_err(|_| Bug::PowModUndef.into())
}

/// Modular inverse. Fails with [`Reason::NotInvertible`] when `gcd(a, m) != 1`.
pub fn modinv(a: &Integer, m: &Integer) -> Result<Integer, Error> {
    a.clone().invert(m).map_err(|_| Reason::NotInvertible.into())
}

/// Greatest common divisor.
pub fn gcd(a: &Integer, b: &Integer) -> Integer {
    a.clone().gcd(b)
}

/// Least common multiple.
pub fn lcm(a: &Integer, b: &Integer) -> Integer {
    a.clone().lcm(b)
}

/// `L(u, n) = (u - 1) / n`, truncating integer division.
///
/// Meaningful (in the Paillier sense) when `u ≡ 1 (mod n)`, but the
/// generator search in key generation applies it to arbitrary `u`, exactly
/// as the source does, so this does not itself check that congruence.
pub fn l_function(u: &Integer, n: &Integer) -> Integer {
    Integer::from(u - 1) / n
}

/// Chinese Remainder Theorem reconstruction.
///
/// Returns the unique `x` with `0 <= x < product(moduli)` such that
/// `x ≡ residues[i] (mod moduli[i])` for all `i`. Requires pairwise-coprime
/// moduli.
pub fn crt(moduli: &[Integer], residues: &[Integer]) -> Integer {
    assert_eq!(moduli.len(), residues.len(), "crt: mismatched slice lengths");
    let product = moduli
        .iter()
        .fold(Integer::from(1), |acc, m| acc * m.clone());

    let mut total = Integer::from(0);
    for (m_i, a_i) in moduli.iter().zip(residues) {
        let p_i = Integer::from(&product / m_i);
        let inv = p_i
            .clone()
            .invert(m_i)
            .expect("crt: moduli must be pairwise coprime");
        total += Integer::from(a_i * &p_i) * inv;
    }
    total.modulo(&product)
}

/// Uniform random integer in `[lo, hi]`.
pub fn rand_range(rng: &mut impl RngCore, lo: &Integer, hi: &Integer) -> Integer {
    let span = Integer::from(hi - lo) + Integer::from(1);
    let mut rstate = external_rand(rng);
    let offset = span.random_below(&mut rstate);
    Integer::from(lo + offset)
}

/// Uniform `bits`-bit integer.
pub fn rand_bits(rng: &mut impl RngCore, bits: u32) -> Integer {
    let mut rstate = external_rand(rng);
    Integer::from(Integer::random_bits(bits, &mut rstate))
}

/// Samples `x` uniformly in `Z*_n`.
pub fn sample_in_mult_group(rng: &mut impl RngCore, n: &Integer) -> Integer {
    let mut rstate = external_rand(rng);
    let mut x = Integer::new();
    loop {
        x.assign(n.random_below_ref(&mut rstate));
        if in_mult_group(&x, n) {
            return x;
        }
    }
}

/// Picks a uniform `k`-subset of `seq` without replacement, via partial
/// Fisher-Yates over the index range.
pub fn sample_without_replacement<T: Clone>(rng: &mut impl RngCore, seq: &[T], k: usize) -> Vec<T> {
    let n = seq.len();
    let take = k.min(n);
    let mut idx: Vec<usize> = (0..n).collect();
    for i in 0..take {
        let span = (n - i) as u64;
        let j = i + (rng.next_u64() % span) as usize;
        idx.swap(i, j);
    }
    idx[..take].iter().map(|&i| seq[i].clone()).collect()
}

/// Generates a random strong (Gordon-style) prime of exactly `bits` bits:
/// a prime `p` such that `(p - 1) / 2` is also prime.
///
/// Loops until a trial succeeds; this is the one retryable step in key
/// generation.
pub fn strong_prime(rng: &mut impl RngCore, bits: u32) -> Integer {
    let mut rstate = external_rand(rng);
    loop {
        let mut q = Integer::from(Integer::random_bits(bits - 1, &mut rstate));
        q.set_bit(bits - 2, true);
        q.set_bit(0, true);

        if !matches!(q.is_probably_prime(25), IsPrime::Yes | IsPrime::Probably) {
            continue;
        }

        let p = Integer::from(&q << 1) + 1;
        if let IsPrime::Yes | IsPrime::Probably = p.is_probably_prime(25) {
            return p;
        }
    }
}

/// Generates a random prime of exactly `bits` bits, with no further
/// structure (unlike [`strong_prime`]). Used for the subgroup order and
/// modulus steps of [`dsa_params`].
fn random_prime(rng: &mut impl RngCore, bits: u32) -> Integer {
    let mut rstate = external_rand(rng);
    loop {
        let mut x = Integer::from(Integer::random_bits(bits, &mut rstate));
        x.set_bit(bits - 1, true);
        x.set_bit(0, true);
        if let IsPrime::Yes | IsPrime::Probably = x.is_probably_prime(25) {
            return x;
        }
    }
}

/// Searches for a prime `p = k*q + 1` of exactly `p_bits` bits, for some
/// multiplier `k`. Bounded per attempt so a pathological `q` doesn't stall
/// the whole generation; [`dsa_params`] retries with a fresh `q` on failure.
fn find_dsa_modulus(rng: &mut impl RngCore, q: &Integer, p_bits: u32) -> Option<Integer> {
    let mut rstate = external_rand(rng);
    for _ in 0..(1 << 16) {
        let k_bits = p_bits.saturating_sub(q.significant_bits()).max(1);
        let mut k = Integer::from(Integer::random_bits(k_bits, &mut rstate));
        if k.is_even() {
            k += 1;
        }
        let p = Integer::from(&k * q) + Integer::from(1);
        if p.significant_bits() != p_bits {
            continue;
        }
        if let IsPrime::Yes | IsPrime::Probably = p.is_probably_prime(25) {
            return Some(p);
        }
    }
    None
}

/// Finds a generator of the order-`q` subgroup of `Z*_p`.
fn find_subgroup_generator(rng: &mut impl RngCore, p: &Integer, q: &Integer) -> Option<Integer> {
    let e = Integer::from(Integer::from(p - 1) / q);
    let mut rstate = external_rand(rng);
    for _ in 0..1024 {
        let h = Integer::from(p.random_below_ref(&mut rstate)) + Integer::from(2);
        let g = h.pow_mod(&e, p).ok()?;
        if g != *Integer::ONE {
            return Some(g);
        }
    }
    None
}

/// DSA-style domain parameter generation: a prime `p` of `bits` bits, a
/// large prime divisor `q` of `p - 1`, and a generator `g` of the
/// order-`q` subgroup of `Z*_p`.
///
/// Additionally verifies the subgroup-lifting invariant `g^(q*p) ≡ 1 (mod
/// p^2)` that the DSA-parameter keypair strategy relies on, retrying with a
/// fresh `p`/`q`/`g` triple on failure. The invariant holds for all but a
/// negligible fraction of generators, so retries are rare in practice.
pub fn dsa_params(rng: &mut (impl RngCore + CryptoRng), bits: u32) -> (Integer, Integer, Integer) {
    let q_bits = (bits / 4).max(32).min(bits.saturating_sub(8));
    loop {
        let q = random_prime(rng, q_bits);
        let Some(p) = find_dsa_modulus(rng, &q, bits) else {
            continue;
        };
        let Some(g) = find_subgroup_generator(rng, &p, &q) else {
            continue;
        };

        let pp = Integer::from(&p * &p);
        let qp = Integer::from(&q * &p);
        let Ok(lift) = modpow(&g, &qp, &pp) else {
            continue;
        };
        if lift == *Integer::ONE {
            return (p, q, g);
        }
    }
}

trait IsEven {
    fn is_even(&self) -> bool;
}

impl IsEven for Integer {
    fn is_even(&self) -> bool {
        !self.get_bit(0)
    }
}
