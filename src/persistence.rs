//! On-disk JSON persistence of generated keypairs, mirroring the source's
//! `saveJson`/`constructFromJsonFile` pair.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rug::Integer;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Reason};
use crate::keypair::{Keypair, PublicKey, Ready, SecretKey, Tables};
use crate::scheme::Scheme;

/// Directory persisted keypairs are written to and read from.
const PARAMS_DIR: &str = "params";

#[derive(Serialize, Deserialize)]
struct PersistedPublic {
    n: String,
    g: String,
}

#[derive(Serialize, Deserialize)]
struct PersistedPrivate {
    p: String,
    q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    gamma: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alpha: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct PersistedConfig {
    n_length: u32,
    power: u32,
    no_gnr: usize,
}

#[derive(Serialize, Deserialize)]
struct PersistedFile {
    scheme: Scheme,
    config: PersistedConfig,
    public: PersistedPublic,
    private: PersistedPrivate,
    #[serde(skip_serializing_if = "Option::is_none")]
    precomputed_gm: Option<[Vec<String>; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    precomputed_gnr: Option<Vec<String>>,
}

fn to_strings(xs: &[Integer]) -> Vec<String> {
    xs.iter().map(|x| x.to_string()).collect()
}

fn from_strings(xs: &[String]) -> Result<Vec<Integer>, Error> {
    xs.iter()
        .map(|s| s.parse::<Integer>().map_err(|_| Reason::TypeMismatch.into()))
        .collect()
}

fn parse(s: &str) -> Result<Integer, Error> {
    s.parse::<Integer>().map_err(|_| Reason::TypeMismatch.into())
}

/// Serializes `keypair` to `params/<prefix>-<timestamp>.json` and returns
/// the file name written (relative to [`PARAMS_DIR`]).
pub fn save(keypair: &Keypair<Ready>) -> Result<String, Error> {
    let public = keypair.public_key();
    let secret = keypair.secret_key();
    let scheme = keypair.scheme();
    let config = keypair.config();

    let (gamma, alpha) = match secret {
        SecretKey::StrongPrime { gamma, .. } => (Some(gamma.to_string()), None),
        SecretKey::DsaSubgroup { alpha, .. } => (None, Some(alpha.to_string())),
    };

    let tables = keypair.tables();
    let precomputed_gm = tables.gm().map(|[t0, t1]| [to_strings(t0), to_strings(t1)]);
    let precomputed_gnr = tables.gnr().map(to_strings);

    let file = PersistedFile {
        scheme,
        config: PersistedConfig {
            n_length: config.n_length,
            power: config.power,
            no_gnr: config.no_gnr,
        },
        public: PersistedPublic {
            n: public.n().to_string(),
            g: public.g().to_string(),
        },
        private: PersistedPrivate {
            p: secret.p().to_string(),
            q: secret.q().to_string(),
            gamma,
            alpha,
        },
        precomputed_gm,
        precomputed_gnr,
    };

    let dir = Path::new(PARAMS_DIR);
    std::fs::create_dir_all(dir).map_err(|e| Reason::FileNotFound(e.to_string()))?;

    let now = time::OffsetDateTime::now_utc();
    let stamp = format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    );
    let file_name = format!("{}-{}.json", scheme.file_prefix(), stamp);
    let path = dir.join(&file_name);

    let writer = File::create(&path).map_err(|e| Reason::FileNotFound(e.to_string()))?;
    serde_json::to_writer_pretty(writer, &file).map_err(|_| Reason::TypeMismatch.into())?;

    tracing::info!(path = %path.display(), "persisted keypair");
    Ok(file_name)
}

/// Loads a keypair previously written by [`save`].
///
/// `scheme` is the variant the caller expects to load; it's checked against
/// the persisted tag, and the file is checked to carry whichever tables
/// that variant requires (a `PrecomputeGm` file with no `precomputed_gm`
/// field is a corrupt or mismatched file, not a silently degraded keypair).
pub fn load(scheme: Scheme, file_name: &str) -> Result<Keypair<Ready>, Error> {
    let path: PathBuf = Path::new(PARAMS_DIR).join(file_name);
    let reader = File::open(&path).map_err(|_| Reason::FileNotFound(path.display().to_string()))?;
    let file: PersistedFile = serde_json::from_reader(BufReader::new(reader))
        .map_err(|_| Reason::TypeMismatch)?;

    if file.scheme != scheme {
        return Err(Reason::MissingTable("scheme", scheme).into());
    }

    let n = parse(&file.public.n)?;
    let g = parse(&file.public.g)?;
    let nn = Integer::from(&n * &n);
    let public = PublicKey { n, g, nn };

    let p = parse(&file.private.p)?;
    let q = parse(&file.private.q)?;
    let secret = if scheme.uses_strong_prime_keygen() {
        let gamma = file
            .private
            .gamma
            .as_deref()
            .ok_or(Reason::MissingTable("gamma", scheme))?;
        SecretKey::StrongPrime {
            p,
            q,
            gamma: parse(gamma)?,
        }
    } else {
        let alpha = file
            .private
            .alpha
            .as_deref()
            .ok_or(Reason::MissingTable("alpha", scheme))?;
        SecretKey::DsaSubgroup {
            p1: p,
            p2: q,
            alpha: parse(alpha)?,
        }
    };

    let config = Config {
        n_length: file.config.n_length,
        power: file.config.power,
        no_gnr: file.config.no_gnr,
        cheat: false,
    };

    let gm = if scheme.uses_gm_table() {
        let [t0, t1] = file
            .precomputed_gm
            .as_ref()
            .ok_or(Reason::MissingTable("precomputed_gm", scheme))?;
        Some([from_strings(t0)?, from_strings(t1)?])
    } else {
        None
    };

    let gnr = if scheme.uses_gnr_table() {
        let t = file
            .precomputed_gnr
            .as_ref()
            .ok_or(Reason::MissingTable("precomputed_gnr", scheme))?;
        Some(from_strings(t)?)
    } else {
        None
    };

    let fresh = Keypair::new(scheme, config, public, secret)?;
    Ok(fresh.into_ready(Tables { gm, gnr }))
}
