//! The two key-generation strategies: strong-prime (Scheme1) and
//! DSA-parameter (Scheme3 and the three precompute variants).

use rand_core::{CryptoRng, RngCore};
use rug::Integer;

use crate::config::Config;
use crate::error::{Error, Reason};
use crate::keypair::{Fresh, Keypair, PublicKey, SecretKey};
use crate::scheme::Scheme;
use crate::utils;

/// Strong-prime strategy (Scheme1): draw `p`, `q` until `n = p*q` has
/// exactly `config.n_length` bits, then search the smallest `g >= 2` for
/// which `L(g^gamma mod n^2)` is invertible mod `n`.
#[tracing::instrument(level = "debug", skip(rng, config))]
pub(crate) fn generate_scheme1(
    rng: &mut (impl RngCore + CryptoRng),
    config: &Config,
) -> Result<Keypair<Fresh>, Error> {
    let half = config.n_length / 2;

    let (p, q, n) = loop {
        let p = utils::strong_prime(rng, half);
        let mut q = utils::strong_prime(rng, half);
        while q == p {
            q = utils::strong_prime(rng, half);
        }
        let n = Integer::from(&p * &q);
        if n.significant_bits() == config.n_length {
            break (p, q, n);
        }
    };
    tracing::debug!(bits = n.significant_bits(), "generated n for scheme1");

    let nn = Integer::from(&n * &n);
    let pm1 = Integer::from(&p - 1);
    let qm1 = Integer::from(&q - 1);
    let gamma = utils::lcm(&pm1, &qm1);
    if gamma.cmp0().is_eq() {
        return Err(Reason::InvalidPQ.into());
    }

    let mut g = Integer::from(2);
    let public = loop {
        if utils::gcd(&g, &nn) == *Integer::ONE {
            let raised = utils::modpow(&g, &gamma, &nn)?;
            let l = utils::l_function(&raised, &n);
            if utils::gcd(&l, &n) == *Integer::ONE {
                break PublicKey {
                    n: n.clone(),
                    g: g.clone(),
                    nn: nn.clone(),
                };
            }
        }
        g += 1;
    };

    let secret = SecretKey::StrongPrime { p, q, gamma };
    Keypair::new(Scheme::Scheme1, *config, public, secret)
}

/// Asserts the subgroup-lifting invariant `g^(q*p) ≡ 1 (mod p^2)` a DSA
/// parameter triple must satisfy for the rest of key generation to go
/// through.
fn assert_lift(g: &Integer, q: &Integer, p: &Integer) -> Result<(), Error> {
    let pp = Integer::from(p * p);
    let qp = Integer::from(q * p);
    let check = utils::modpow(g, &qp, &pp)?;
    if check != *Integer::ONE {
        return Err(Reason::AssertionFailure("g^(q*p) != 1 mod p^2").into());
    }
    Ok(())
}

/// DSA-parameter strategy: generate two independent DSA parameter triples,
/// lift their generators into `Z*_{n^2}` via CRT, and derive `alpha = q1*q2`
/// as the decryption exponent. Shared by Scheme3 and the three precompute
/// variants; `scheme` identifies which one so the returned keypair is
/// tagged correctly.
#[tracing::instrument(level = "debug", skip(rng, config))]
pub(crate) fn generate_dsa(
    rng: &mut (impl RngCore + CryptoRng),
    scheme: Scheme,
    config: &Config,
) -> Result<Keypair<Fresh>, Error> {
    let half = config.n_length / 2;

    let (p1, q1, g1) = utils::dsa_params(rng, half);
    let (p2, q2, g2) = utils::dsa_params(rng, half);
    assert_lift(&g1, &q1, &p1)?;
    assert_lift(&g2, &q2, &p2)?;

    let n = Integer::from(&p1 * &p2);
    let nn = Integer::from(&n * &n);
    let gamma = utils::lcm(&Integer::from(&p1 - 1), &Integer::from(&p2 - 1));

    let p1p1 = Integer::from(&p1 * &p1);
    let p2p2 = Integer::from(&p2 * &p2);
    let g = utils::crt(&[p1p1, p2p2], &[g1, g2]);
    let alpha = Integer::from(&q1 * &q2);

    if Integer::from(&gamma % &alpha) != 0 {
        return Err(Reason::AssertionFailure("gamma is not divisible by alpha").into());
    }
    let order_check = utils::modpow(&g, &Integer::from(&alpha * &n), &nn)?;
    if order_check != *Integer::ONE {
        return Err(Reason::AssertionFailure("g^(alpha*n) != 1 mod n^2").into());
    }
    tracing::debug!(bits = n.significant_bits(), ?scheme, "generated DSA-parameter key");

    let public = PublicKey { n, g, nn };
    let secret = SecretKey::DsaSubgroup { p1, p2, alpha };
    Keypair::new(scheme, *config, public, secret)
}
