use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for deterministic worlds.
///
/// A 128-bit seed that initializes the world's random number generator
/// (enemy spawns, enemy fire, power-up drops, particles). The same seed and
/// the same inputs replay the same game, which enables:
///
/// - Session recording and replay
/// - Fair comparison of AI pilots during training
/// - Deterministic tests
///
/// Seeds are written as 32 lowercase hex characters.
///
/// # Example
///
/// ```
/// use lightplane_engine::GameSeed;
/// use rand::Rng as _;
///
/// let seed: GameSeed = rand::rng().random();
/// let parsed: GameSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSeed([u8; 16]);

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid seed {input:?}: {reason}")]
pub struct SeedParseError {
    input: String,
    reason: &'static str,
}

impl GameSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Builds a seed from a small integer, handy for fixed evaluation seeds.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }

    #[must_use]
    pub fn rng(&self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }

    /// A second generator, independent of [`GameSeed::rng`], for cosmetics.
    ///
    /// Particles drawn from it never shift the gameplay sequence, so a
    /// replay stays in sync whether or not effects were triggered.
    #[must_use]
    pub fn effects_rng(&self) -> Pcg32 {
        let mut bytes = self.0;
        bytes.reverse();
        Pcg32::from_seed(bytes.map(|b| b ^ 0x5a))
    }
}

impl fmt::Display for GameSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for GameSeed {
    type Err = SeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = |reason| SeedParseError {
            input: s.to_owned(),
            reason,
        };
        if s.len() != 32 {
            return Err(error("expected 32 hex characters"));
        }
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(error("not a hex number"));
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| error("not a hex number"))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for GameSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GameSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random seeds with `rng.random()`.
impl Distribution<GameSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GameSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GameSeed(seed)
    }
}
