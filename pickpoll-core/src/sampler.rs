//! Unique-index subset sampling for presentation rounds.
use hmac::{Hmac, Mac};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;
use smallvec::SmallVec;
use thiserror::Error;

/// Catalog indices drawn for one round, in presentation order.
pub type Round = SmallVec<[usize; 8]>;

/// Errors raised when a round cannot be drawn.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SampleError {
    #[error("cannot draw {requested} distinct items: only {available} of {catalog_size} are eligible")]
    Exhausted {
        requested: usize,
        available: usize,
        catalog_size: usize,
    },
}

/// Draw `n` distinct indices from `[0, catalog_size)`, none of them in `exclude`.
///
/// Candidates are drawn uniformly and rejected when already picked or excluded,
/// so the result carries no ordering guarantee.
///
/// # Errors
///
/// Returns [`SampleError::Exhausted`] when fewer than `n` indices are eligible.
pub fn sample<R>(
    rng: &mut R,
    n: usize,
    catalog_size: usize,
    exclude: &[usize],
) -> Result<Round, SampleError>
where
    R: Rng + ?Sized,
{
    let mut blocked: SmallVec<[usize; 8]> = exclude
        .iter()
        .copied()
        .filter(|idx| *idx < catalog_size)
        .collect();
    blocked.sort_unstable();
    blocked.dedup();
    let available = catalog_size - blocked.len();
    if n > available {
        return Err(SampleError::Exhausted {
            requested: n,
            available,
            catalog_size,
        });
    }

    let mut round = Round::with_capacity(n);
    while round.len() < n {
        let candidate = rng.gen_range(0..catalog_size);
        if round.contains(&candidate) || blocked.binary_search(&candidate).is_ok() {
            continue;
        }
        round.push(candidate);
    }
    Ok(round)
}

/// Deterministic sampler stream for a user-visible seed.
#[must_use]
pub fn seeded_rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, b"sampler"))
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
