//! Program-derived addresses
//!
//! Accounts owned by the program live at addresses computed from a seed tuple
//! and the program id, never at addresses a caller supplies. A derived address
//! is deliberately *not* a valid ed25519 point, so no private key exists that
//! could sign for it; only the program, by presenting the seeds and bump, can
//! authorize movements out of accounts it owns.
//!
//! The derivation is pure: anyone holding `(creator, description)` and the
//! program id can locate a habit without consulting ledger state.

use ed25519_dalek::VerifyingKey;
use sha2::{Digest, Sha256};
use tracing::debug;
use types::ids::{Address, Pubkey};

use crate::errors::PdaError;

/// Namespace tag for habit records
pub const HABIT_SEED: &[u8] = b"habit";

/// Maximum number of seeds, bump included
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed
pub const MAX_SEED_LEN: usize = 32;

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Compute the address for an exact seed list (bump already appended).
///
/// Fails with `OnCurve` when the hash happens to be a valid curve point.
pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Address, PdaError> {
    check_seeds(seeds, MAX_SEEDS)?;

    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(program_id.as_ref());
    hasher.update(PDA_MARKER);
    let hash: [u8; 32] = hasher.finalize().into();

    if is_on_curve(&hash) {
        return Err(PdaError::OnCurve);
    }
    Ok(Address::new_from_array(hash))
}

/// Find the first off-curve address for `seeds`, searching bumps 255 → 0.
///
/// Returns the address and the bump that produced it. The result depends
/// only on the inputs.
pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Address, u8), PdaError> {
    check_seeds(seeds, MAX_SEEDS - 1)?;

    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut with_bump: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
        with_bump.extend_from_slice(seeds);
        with_bump.push(&bump_seed);

        match create_program_address(&with_bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            Err(PdaError::OnCurve) => continue,
            Err(e) => return Err(e),
        }
    }

    Err(PdaError::NoViableBump)
}

/// Derive the habit record address for `(creator, description)`.
pub fn find_habit_address(
    program_id: &Pubkey,
    creator: &Pubkey,
    description: &[u8],
) -> Result<(Address, u8), PdaError> {
    let (address, bump) =
        find_program_address(&[HABIT_SEED, creator.as_ref(), description], program_id)?;
    debug!(%creator, %address, bump, "Derived habit address");
    Ok((address, bump))
}

/// Recompute a habit address from its stored bump.
pub fn create_habit_address(
    program_id: &Pubkey,
    creator: &Pubkey,
    description: &[u8],
    bump: u8,
) -> Result<Address, PdaError> {
    create_program_address(&[HABIT_SEED, creator.as_ref(), description, &[bump]], program_id)
}

/// Address of `owner`'s associated token account for `mint`.
pub fn associated_token_address(
    owner: &Pubkey,
    mint: &Address,
    token_program_id: &Pubkey,
    associated_token_program_id: &Pubkey,
) -> Result<Address, PdaError> {
    find_program_address(
        &[owner.as_ref(), token_program_id.as_ref(), mint.as_ref()],
        associated_token_program_id,
    )
    .map(|(address, _)| address)
}

/// Whether 32 bytes decode to a point on the ed25519 curve.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    VerifyingKey::from_bytes(bytes).is_ok()
}

fn check_seeds(seeds: &[&[u8]], max_seeds: usize) -> Result<(), PdaError> {
    if seeds.len() > max_seeds {
        return Err(PdaError::MaxSeedsExceeded {
            count: seeds.len(),
            max: max_seeds,
        });
    }
    if let Some((index, seed)) = seeds.iter().enumerate().find(|(_, s)| s.len() > MAX_SEED_LEN) {
        return Err(PdaError::MaxSeedLengthExceeded {
            index,
            len: seed.len(),
            max: MAX_SEED_LEN,
        });
    }
    Ok(())
}
