/// Default bit-length of the Paillier modulus `n`.
pub const DEFAULT_KEYSIZE: u32 = 2048;

/// Default table base `B`: the per-dimension size of the message table and
/// the length of the randomizer table.
pub const POWER: u32 = 1 << 16;

/// Default number of randomizer-table entries combined per encryption.
pub const NO_GNR: usize = 8;

/// Tunable parameters threaded through key generation and encryption.
///
/// The source this crate is distilled from keeps these as module-level
/// constants (and a module-level `CHEAT` flag). Here they're bundled into a
/// value passed explicitly into `generate`/`encrypt`, so a process can run
/// several configurations side by side and tests can exercise both the
/// `cheat` and non-`cheat` branch without process-global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Bit-length of the modulus `n`.
    pub n_length: u32,
    /// Table base `B`.
    pub power: u32,
    /// Number of `Tr` entries combined per encryption (`k`).
    pub no_gnr: usize,
    /// Research toggle that replaces the DSA-variant randomizer with a
    /// direct small random integer. Leaks information; never safe outside
    /// performance measurement.
    pub cheat: bool,
}

impl Config {
    /// Upper bound, in bits, on messages accepted by table-based encryption:
    /// `2 * log2(power)`.
    pub fn message_limit_bits(&self) -> u32 {
        2 * self.power.max(2).ilog2()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            n_length: DEFAULT_KEYSIZE,
            power: POWER,
            no_gnr: NO_GNR,
            cheat: false,
        }
    }
}
