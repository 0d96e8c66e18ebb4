use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seeded generator when a seed is configured, otherwise a fresh random one
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(rand::random::<u64>))
}
