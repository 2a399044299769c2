use std::sync::Arc;
use std::thread;

use paillier_variants::{Config, Scheme};
use rug::Integer;

const SCHEMES: [Scheme; 5] = [
    Scheme::Scheme1,
    Scheme::Scheme3,
    Scheme::PrecomputeGm,
    Scheme::PrecomputeGnr,
    Scheme::PrecomputeBoth,
];

fn small_config() -> Config {
    Config {
        n_length: 512,
        power: 256,
        no_gnr: 4,
        cheat: false,
    }
}

#[test]
fn encrypt_decrypt_round_trips_for_every_scheme() {
    let mut rng = rand_dev::DevRng::new();
    let config = small_config();

    for scheme in SCHEMES {
        let keypair = paillier_variants::generate(&mut rng, scheme, config).unwrap();
        let n = keypair.public_key().n().clone();

        for m in paillier_variants::random_messages(&mut rng, &n, 10) {
            let c = keypair.encrypt(&mut rng, &m).unwrap();
            let decrypted = keypair.decrypt(&c).unwrap();
            assert_eq!(decrypted, m, "round trip failed for {scheme:?}");
        }
    }
}

#[test]
fn rejects_message_out_of_range() {
    let mut rng = rand_dev::DevRng::new();
    let keypair = paillier_variants::generate(&mut rng, Scheme::Scheme1, small_config()).unwrap();
    let n = keypair.public_key().n().clone();

    let too_big = Integer::from(&n + 1);
    assert!(keypair.encrypt(&mut rng, &too_big).is_err());

    let negative = Integer::from(-1);
    assert!(keypair.encrypt(&mut rng, &negative).is_err());
}

#[test]
fn rejects_ciphertext_out_of_range() {
    let mut rng = rand_dev::DevRng::new();
    let keypair = paillier_variants::generate(&mut rng, Scheme::Scheme1, small_config()).unwrap();
    let nn = keypair.public_key().nn().clone();

    let too_big = Integer::from(&nn + 1);
    assert!(keypair.decrypt(&too_big).is_err());
    assert!(keypair.add(&too_big, &Integer::from(1)).is_err());
}

#[test]
fn rejects_message_too_wide_for_tables() {
    let mut rng = rand_dev::DevRng::new();
    let config = small_config();
    let keypair =
        paillier_variants::generate(&mut rng, Scheme::PrecomputeGm, config).unwrap();

    let limit = config.message_limit_bits();
    let too_wide = Integer::from(1) << (limit + 8);
    assert!(too_wide < *keypair.public_key().n());
    assert!(keypair.encrypt(&mut rng, &too_wide).is_err());
}

#[test]
fn homomorphic_addition_matches_plaintext_addition() {
    let mut rng = rand_dev::DevRng::new();
    let config = small_config();

    for scheme in SCHEMES {
        let keypair = paillier_variants::generate(&mut rng, scheme, config).unwrap();
        let n = keypair.public_key().n().clone();

        for _ in 0..10 {
            let ab = paillier_variants::random_messages(&mut rng, &n, 2);
            let (a, b) = (ab[0].clone(), ab[1].clone());
            let ca = keypair.encrypt(&mut rng, &a).unwrap();
            let cb = keypair.encrypt(&mut rng, &b).unwrap();
            let sum_cipher = keypair.add(&ca, &cb).unwrap();
            let decrypted = keypair.decrypt(&sum_cipher).unwrap();
            let expected = Integer::from(&a + &b) % &n;
            assert_eq!(decrypted, expected, "homomorphic add failed for {scheme:?}");
        }
    }
}

#[test]
fn save_and_load_round_trips_every_scheme() {
    let mut rng = rand_dev::DevRng::new();
    let config = small_config();

    for scheme in SCHEMES {
        let keypair = paillier_variants::generate(&mut rng, scheme, config).unwrap();
        let n = keypair.public_key().n().clone();
        let m = paillier_variants::random_messages(&mut rng, &n, 1)[0].clone();
        let c = keypair.encrypt(&mut rng, &m).unwrap();

        let file_name = paillier_variants::save(&keypair).unwrap();
        let loaded = paillier_variants::load(scheme, &file_name).unwrap();

        assert_eq!(loaded.public_key().n(), keypair.public_key().n());
        assert_eq!(loaded.decrypt(&c).unwrap(), m);
    }
}

#[test]
fn load_rejects_scheme_tag_mismatch() {
    let mut rng = rand_dev::DevRng::new();
    let keypair =
        paillier_variants::generate(&mut rng, Scheme::PrecomputeBoth, small_config()).unwrap();
    let file_name = paillier_variants::save(&keypair).unwrap();

    assert!(paillier_variants::load(Scheme::Scheme1, &file_name).is_err());
}

#[test]
fn ready_keypair_is_shareable_across_threads() {
    let mut rng = rand_dev::DevRng::new();
    let keypair = Arc::new(
        paillier_variants::generate(&mut rng, Scheme::Scheme1, small_config()).unwrap(),
    );
    let n = keypair.public_key().n().clone();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let keypair = Arc::clone(&keypair);
            let n = n.clone();
            thread::spawn(move || {
                let mut rng = rand_dev::DevRng::new();
                let m = paillier_variants::random_messages(&mut rng, &n, 1)[0].clone();
                let c = keypair.encrypt(&mut rng, &m).unwrap();
                assert_eq!(keypair.decrypt(&c).unwrap(), m);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn repeated_encryptions_of_the_same_message_differ() {
    let mut rng = rand_dev::DevRng::new();
    let config = small_config();

    for scheme in SCHEMES {
        let keypair = paillier_variants::generate(&mut rng, scheme, config).unwrap();
        let m = Integer::from(42);

        let c1 = keypair.encrypt(&mut rng, &m).unwrap();
        let c2 = keypair.encrypt(&mut rng, &m).unwrap();
        assert_ne!(c1, c2, "encryptions of the same message collided for {scheme:?}");
        assert_eq!(keypair.decrypt(&c1).unwrap(), m);
        assert_eq!(keypair.decrypt(&c2).unwrap(), m);
    }
}

#[test]
fn message_table_matches_direct_exponentiation() {
    let mut rng = rand_dev::DevRng::new();
    let config = small_config();
    let keypair =
        paillier_variants::generate(&mut rng, Scheme::PrecomputeBoth, config).unwrap();

    let g = keypair.public_key().g().clone();
    let nn = keypair.public_key().nn().clone();
    let power = Integer::from(config.power);
    let [t0, t1] = keypair.tables().gm().expect("PrecomputeBoth carries Tm");

    for j in [0usize, 1, 7, (config.power - 1) as usize] {
        let exp0 = Integer::from(j);
        let expected0 = paillier_variants::utils::modpow(&g, &exp0, &nn).unwrap();
        assert_eq!(t0[j], expected0);

        let exp1 = Integer::from(&power * Integer::from(j));
        let expected1 = paillier_variants::utils::modpow(&g, &exp1, &nn).unwrap();
        assert_eq!(t1[j], expected1);
    }

    let gnr = keypair.tables().gnr().expect("PrecomputeBoth carries Tr");
    assert_eq!(gnr.len(), config.power as usize);
    for entry in gnr {
        assert!(entry.cmp0().is_ge() && *entry < nn, "Tr entry out of [0, n^2) range");
    }
}

#[test]
fn cheat_toggle_still_round_trips() {
    let mut rng = rand_dev::DevRng::new();
    let mut config = small_config();
    config.cheat = true;

    let keypair = paillier_variants::generate(&mut rng, Scheme::Scheme3, config).unwrap();
    let n = keypair.public_key().n().clone();

    for m in paillier_variants::random_messages(&mut rng, &n, 5) {
        let c = keypair.encrypt(&mut rng, &m).unwrap();
        assert_eq!(keypair.decrypt(&c).unwrap(), m);
    }
}
