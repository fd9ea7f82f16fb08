//! Shared validation and authorization checks
//!
//! Used by both the registry (creation) and the judgement engine. Each check
//! maps one precondition to one error so rejections stay distinguishable.

use types::ids::Pubkey;

use crate::errors::{JudgementError, RegistryError};
use crate::state::{Habit, Outcome};

/// Staked amount must be non-zero.
pub fn ensure_positive_amount(amount: u64) -> Result<(), RegistryError> {
    if amount == 0 {
        return Err(RegistryError::InvalidAmount);
    }
    Ok(())
}

/// Deadline must lie strictly after `now`.
pub fn ensure_future_deadline(deadline: i64, now: i64) -> Result<(), RegistryError> {
    if deadline <= now {
        return Err(RegistryError::DeadlinePassed { deadline, now });
    }
    Ok(())
}

/// Description must fit in a single address seed.
pub fn ensure_description_len(description: &[u8], max: usize) -> Result<(), RegistryError> {
    if description.len() > max {
        return Err(RegistryError::DescriptionTooLong {
            len: description.len(),
            max,
        });
    }
    Ok(())
}

/// Judgement preconditions, in order: unresolved, judge, deadline.
pub fn ensure_judgeable(habit: &Habit, caller: &Pubkey, now: i64) -> Result<(), JudgementError> {
    if habit.outcome != Outcome::Unresolved {
        return Err(JudgementError::AlreadyResolved);
    }
    if *caller != habit.judge {
        return Err(JudgementError::Unauthorized);
    }
    if now < habit.deadline {
        return Err(JudgementError::DeadlineNotReached {
            deadline: habit.deadline,
            now,
        });
    }
    Ok(())
}
