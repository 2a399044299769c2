use paillier_variants::{Config, Scheme};
use rug::Integer;

const SCHEMES: [Scheme; 5] = [
    Scheme::Scheme1,
    Scheme::Scheme3,
    Scheme::PrecomputeGm,
    Scheme::PrecomputeGnr,
    Scheme::PrecomputeBoth,
];

fn bench_config() -> Config {
    Config {
        n_length: 1024,
        power: 1 << 12,
        no_gnr: 8,
        cheat: false,
    }
}

/// Draws a plaintext bounded to `config.message_limit_bits()`, so the
/// precompute-Gm variants (which reject wider messages) can be benchmarked
/// alongside the others with the same draw.
fn bench_message(rng: &mut rand_dev::DevRng, config: &Config) -> Integer {
    let hi = Integer::from(Integer::from(1) << config.message_limit_bits()) - 1;
    paillier_variants::utils::rand_range(rng, &Integer::from(0), &hi)
}

fn keygen(c: &mut criterion::Criterion) {
    let mut rng = rand_dev::DevRng::new();
    let mut group = c.benchmark_group("Key generation");
    group.sample_size(10);

    for scheme in SCHEMES {
        group.bench_function(format!("{scheme:?}"), |b| {
            b.iter(|| paillier_variants::generate(&mut rng, scheme, bench_config()).unwrap())
        });
    }
}

fn encryption(c: &mut criterion::Criterion) {
    let mut rng = rand_dev::DevRng::new();
    let config = bench_config();
    let mut group = c.benchmark_group("Encrypt");

    for scheme in SCHEMES {
        let keypair = paillier_variants::generate(&mut rng, scheme, config).unwrap();

        group.bench_function(format!("{scheme:?}"), |b| {
            b.iter_batched(
                || bench_message(&mut rng, &config),
                |m| keypair.encrypt(&mut rng.clone(), &m).unwrap(),
                criterion::BatchSize::SmallInput,
            )
        });
    }
}

fn decryption(c: &mut criterion::Criterion) {
    let mut rng = rand_dev::DevRng::new();
    let config = bench_config();
    let mut group = c.benchmark_group("Decrypt");

    for scheme in SCHEMES {
        let keypair = paillier_variants::generate(&mut rng, scheme, config).unwrap();

        group.bench_function(format!("{scheme:?}"), |b| {
            b.iter_batched(
                || {
                    let m = bench_message(&mut rng, &config);
                    keypair.encrypt(&mut rng, &m).unwrap()
                },
                |c| keypair.decrypt(&c).unwrap(),
                criterion::BatchSize::SmallInput,
            )
        });
    }
}

fn homomorphic_add(c: &mut criterion::Criterion) {
    let mut rng = rand_dev::DevRng::new();
    let config = bench_config();
    let keypair = paillier_variants::generate(&mut rng, Scheme::Scheme1, config).unwrap();
    let n = keypair.public_key().n().clone();

    c.bench_function("Homomorphic add", |b| {
        b.iter_batched(
            || {
                let ms = paillier_variants::random_messages(&mut rng, &n, 2);
                let c1 = keypair.encrypt(&mut rng, &ms[0]).unwrap();
                let c2 = keypair.encrypt(&mut rng, &ms[1]).unwrap();
                (c1, c2)
            },
            |(c1, c2)| keypair.add(&c1, &c2).unwrap(),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion::criterion_group!(benches, keygen, encryption, decryption, homomorphic_add);
criterion::criterion_main!(benches);
