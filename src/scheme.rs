/// Tag identifying one of the five Paillier variants under comparison.
///
/// This is the only thing that knows which key-generation strategy and
/// which precomputation tables a variant uses; `Keypair` and the rest of
/// the crate dispatch on it rather than duplicating per-variant types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Strong-prime key generation, no precomputation.
    Scheme1,
    /// DSA-parameter key generation, no precomputation.
    Scheme3,
    /// DSA-parameter key generation with a message table (`Tm`).
    PrecomputeGm,
    /// DSA-parameter key generation with a randomizer table (`Tr`).
    PrecomputeGnr,
    /// DSA-parameter key generation with both tables.
    PrecomputeBoth,
}

impl Scheme {
    /// Whether this variant carries a message table `Tm`.
    pub(crate) fn uses_gm_table(self) -> bool {
        matches!(self, Scheme::PrecomputeGm | Scheme::PrecomputeBoth)
    }

    /// Whether this variant carries a randomizer table `Tr`.
    pub(crate) fn uses_gnr_table(self) -> bool {
        matches!(self, Scheme::PrecomputeGnr | Scheme::PrecomputeBoth)
    }

    /// Whether this variant is generated via the strong-prime strategy
    /// (only `Scheme1`) or the DSA-parameter strategy (everything else).
    pub(crate) fn uses_strong_prime_keygen(self) -> bool {
        matches!(self, Scheme::Scheme1)
    }

    /// Prefix used for persisted file names, matching the naming the source
    /// uses for its JSON dumps (`scheme1-...`, `precompute_both-...`).
    pub(crate) fn file_prefix(self) -> &'static str {
        match self {
            Scheme::Scheme1 => "scheme1",
            Scheme::Scheme3 => "scheme3",
            Scheme::PrecomputeGm => "precompute_gm",
            Scheme::PrecomputeGnr => "precompute_gnr",
            Scheme::PrecomputeBoth => "precompute_both",
        }
    }
}
