//! Security Hardening Tests
//!
//! Adversarial testing of the habit program:
//! - Permission escalation (non-judge resolution)
//! - Early resolution
//! - Replay (repeated judgement)
//! - Duplicate creation
//! - Underfunded and malformed creation
//! - Transaction rollback
//! - Fuzz testing (proptest)
//! - Upgrade path (ABI freeze)

mod common;

use common::{terms, Harness, START};
use contracts::errors::{JudgementError, RegistryError};
use contracts::pda::{create_habit_address, MAX_SEED_LEN};
use contracts::{Outcome, Verdict, CONTRACT_ABI_VERSION};
use types::ids::Pubkey;

// ═══════════════════════════════════════════════════════════════════
// Permission Tests
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_creator_cannot_judge_own_habit() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(500);
    let judge = Pubkey::new_unique();
    let created = h.create(creator, source, terms("walk", 500, judge, START + 1)).unwrap();
    h.clock.advance(1);

    let result = h.program.cast_judgement(creator, created.address, Verdict::Success);
    assert_eq!(result, Err(JudgementError::Unauthorized));
    assert_eq!(h.program.vault_balance(&created.address).unwrap(), 500);
    assert_eq!(h.balance_of(&creator), 0);
}

#[test]
fn test_beneficiary_cannot_judge() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(500);
    let judge = Pubkey::new_unique();
    let params = terms("walk", 500, judge, START + 1);
    let beneficiary = params.to_failure;
    let created = h.create(creator, source, params).unwrap();
    h.clock.advance(1);

    let result = h.program.cast_judgement(beneficiary, created.address, Verdict::Failure);
    assert_eq!(result, Err(JudgementError::Unauthorized));
    assert_eq!(h.balance_of(&beneficiary), 0);
}

#[test]
fn test_unauthorized_checked_before_deadline() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(1);
    let created = h
        .create(creator, source, terms("walk", 1, Pubkey::new_unique(), START + 100))
        .unwrap();

    let result = h.program.cast_judgement(Pubkey::new_unique(), created.address, Verdict::Success);
    assert_eq!(result, Err(JudgementError::Unauthorized));
}

#[test]
fn test_judge_may_be_creator() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(10);
    let created = h.create(creator, source, terms("walk", 10, creator, START + 1)).unwrap();
    h.clock.advance(1);
    assert!(h.program.cast_judgement(creator, created.address, Verdict::Success).is_ok());
}

// ═══════════════════════════════════════════════════════════════════
// Deadline Tests
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_judgement_one_second_early_rejected() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(10);
    let judge = Pubkey::new_unique();
    let created = h.create(creator, source, terms("walk", 10, judge, START + 10)).unwrap();
    h.clock.set(START + 9);

    let result = h.program.cast_judgement(judge, created.address, Verdict::Failure);
    assert!(matches!(result, Err(JudgementError::DeadlineNotReached { .. })));
    assert_eq!(
        h.program.fetch_habit(&created.address).unwrap().outcome,
        Outcome::Unresolved
    );
}

#[test]
fn test_judgement_exactly_at_deadline_allowed() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(10);
    let judge = Pubkey::new_unique();
    let created = h.create(creator, source, terms("walk", 10, judge, START + 10)).unwrap();
    h.clock.set(START + 10);
    assert!(h.program.cast_judgement(judge, created.address, Verdict::Failure).is_ok());
}

#[test]
fn test_deadline_now_rejected_at_creation() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(10);
    let result = h.create(creator, source, terms("walk", 10, Pubkey::new_unique(), START));
    assert_eq!(
        result,
        Err(RegistryError::DeadlinePassed {
            deadline: START,
            now: START
        })
    );
}

// ═══════════════════════════════════════════════════════════════════
// Replay Tests
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_repeated_judgement_with_other_verdict_rejected() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(100);
    let judge = Pubkey::new_unique();
    let params = terms("walk", 100, judge, START + 1);
    let (to_success, to_failure) = (params.to_success, params.to_failure);
    let created = h.create(creator, source, params).unwrap();
    h.clock.advance(1);

    h.program.cast_judgement(judge, created.address, Verdict::Success).unwrap();
    let flip = h.program.cast_judgement(judge, created.address, Verdict::Failure);

    assert_eq!(flip, Err(JudgementError::AlreadyResolved));
    assert_eq!(h.balance_of(&to_success), 100);
    assert_eq!(h.balance_of(&to_failure), 0);
    assert_eq!(
        h.program.fetch_habit(&created.address).unwrap().outcome,
        Outcome::Success
    );
}

#[test]
fn test_resolved_checked_before_caller() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(100);
    let judge = Pubkey::new_unique();
    let created = h.create(creator, source, terms("walk", 100, judge, START + 1)).unwrap();
    h.clock.advance(1);
    h.program.cast_judgement(judge, created.address, Verdict::Success).unwrap();

    let result = h.program.cast_judgement(Pubkey::new_unique(), created.address, Verdict::Failure);
    assert_eq!(result, Err(JudgementError::AlreadyResolved));
}

#[test]
fn test_vault_remains_with_zero_balance() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(100);
    let judge = Pubkey::new_unique();
    let created = h.create(creator, source, terms("walk", 100, judge, START + 1)).unwrap();
    h.clock.advance(1);
    h.program.cast_judgement(judge, created.address, Verdict::Failure).unwrap();

    assert!(h.program.ledger().contains(&created.vault));
    assert_eq!(h.program.token_balance(&created.vault).unwrap(), 0);
}

// ═══════════════════════════════════════════════════════════════════
// Creation Tests
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_duplicate_creation_keeps_first_terms() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(1_000);
    let first_judge = Pubkey::new_unique();
    let created = h.create(creator, source, terms("walk", 100, first_judge, START + 1)).unwrap();

    let second = h.create(creator, source, terms("walk", 900, Pubkey::new_unique(), START + 50));
    assert_eq!(
        second,
        Err(RegistryError::DuplicateCommitment {
            address: created.address
        })
    );

    let habit = h.program.fetch_habit(&created.address).unwrap();
    assert_eq!(habit.judge, first_judge);
    assert_eq!(habit.amount, 100);
    assert_eq!(h.balance_of(&creator), 900);
    assert_eq!(h.program.events().len(), 1);
}

#[test]
fn test_underfunded_creation_leaves_no_record() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(99);
    let accounts_before = h.program.ledger().len();

    let result = h.create(creator, source, terms("walk", 100, Pubkey::new_unique(), START + 1));
    assert_eq!(
        result,
        Err(RegistryError::InsufficientFunds {
            required: 100,
            available: 99
        })
    );

    let address = h.program.derive_habit_address(&creator, b"walk").unwrap();
    assert!(h.program.fetch_habit(&address).is_err());
    assert_eq!(h.program.ledger().len(), accounts_before);
    assert!(h.program.events().is_empty());
}

#[test]
fn test_funding_from_someone_elses_account_rejected() {
    let mut h = Harness::new();
    let (_victim, victim_source) = h.funded_user(1_000);
    let (attacker, _) = h.funded_user(0);

    let result = h.create(attacker, victim_source, terms("walk", 1_000, attacker, START + 1));
    assert_eq!(
        result,
        Err(RegistryError::WrongTokenAccount {
            account: victim_source
        })
    );
    assert_eq!(h.program.token_balance(&victim_source).unwrap(), 1_000);
}

#[test]
fn test_payout_to_habit_address_rejected() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(1_000);
    let judge = Pubkey::new_unique();
    let own_address = h.program.derive_habit_address(&creator, b"walk").unwrap();
    let mut params = terms("walk", 1_000, judge, START + 1);
    params.to_success = own_address;

    let result = h.create(creator, source, params);
    assert_eq!(
        result,
        Err(RegistryError::InvalidDestination {
            destination: own_address
        })
    );
    assert!(h.program.fetch_habit(&own_address).is_err());
    assert_eq!(h.balance_of(&creator), 1_000);
}

#[test]
fn test_vault_opened_by_third_party_does_not_block_creation() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(1_000);
    let judge = Pubkey::new_unique();
    let address = h.program.derive_habit_address(&creator, b"walk").unwrap();
    let squatted = h.program.create_token_account(address, h.mint).unwrap();

    let created = h.create(creator, source, terms("walk", 1_000, judge, START + 1)).unwrap();
    assert_eq!(created.address, address);
    assert_eq!(created.vault, squatted);
    assert_eq!(h.program.vault_balance(&address).unwrap(), 1_000);

    h.clock.advance(1);
    h.program.cast_judgement(judge, address, Verdict::Failure).unwrap();
    assert_eq!(h.program.vault_balance(&address).unwrap(), 0);
}

#[test]
fn test_vault_funded_before_creation_rejected() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(1_000);
    let address = h.program.derive_habit_address(&creator, b"walk").unwrap();
    let vault = h.program.create_token_account(address, h.mint).unwrap();
    h.program.mint_to(h.mint, vault, h.mint_authority, 7).unwrap();

    let result = h.create(creator, source, terms("walk", 1_000, Pubkey::new_unique(), START + 1));
    assert_eq!(result, Err(RegistryError::VaultNotEmpty { vault, balance: 7 }));
    assert!(h.program.fetch_habit(&address).is_err());
    assert_eq!(h.balance_of(&creator), 1_000);
}

#[test]
fn test_description_at_seed_limit() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(2);
    let max = "x".repeat(MAX_SEED_LEN);
    let over = "y".repeat(MAX_SEED_LEN + 1);

    assert!(h.create(creator, source, terms(&max, 1, creator, START + 1)).is_ok());
    assert_eq!(
        h.create(creator, source, terms(&over, 1, creator, START + 1)),
        Err(RegistryError::DescriptionTooLong {
            len: MAX_SEED_LEN + 1,
            max: MAX_SEED_LEN
        })
    );
}

#[test]
fn test_binary_description_accepted() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(1);
    let mut params = terms("", 1, creator, START + 1);
    params.description = vec![0xff, 0x00, 0xfe];

    let created = h.create(creator, source, params).unwrap();
    let fetched = h.program.fetch_habit_by_seed(&creator, &[0xff, 0x00, 0xfe]).unwrap();
    assert_eq!(fetched, &created.habit);
}

#[test]
fn test_stored_bump_reproduces_address() {
    let mut h = Harness::new();
    let (creator, source) = h.funded_user(1);
    let created = h.create(creator, source, terms("walk", 1, creator, START + 1)).unwrap();

    let program_id = h.program.config().program_id;
    let habit = &created.habit;
    let rebuilt = create_habit_address(&program_id, &creator, &habit.description, habit.bump).unwrap();
    assert_eq!(rebuilt, created.address);
}

// ═══════════════════════════════════════════════════════════════════
// Test Upgrade Path (ABI Freeze)
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_contract_abi_version_frozen() {
    assert_eq!(CONTRACT_ABI_VERSION, "1.0.0");
}

// ═══════════════════════════════════════════════════════════════════
// Fuzz Tests (Proptest)
// ═══════════════════════════════════════════════════════════════════

mod fuzz {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for descriptions that fit in a seed
    fn description() -> impl Strategy<Value = String> {
        "[a-z ]{1,32}"
    }

    proptest! {
        /// Invariant: a (creator, description) pair is created at most once.
        #[test]
        fn fuzz_creation_unique_per_seed(
            desc in description(),
            first in 1u64..1_000u64,
            second in 1u64..1_000u64,
        ) {
            let mut h = Harness::new();
            let (creator, source) = h.funded_user(2_000);
            let created = h.create(creator, source, terms(&desc, first, creator, START + 1)).unwrap();

            let again = h.create(creator, source, terms(&desc, second, creator, START + 1));
            prop_assert_eq!(
                again,
                Err(RegistryError::DuplicateCommitment { address: created.address })
            );
            prop_assert_eq!(h.program.vault_balance(&created.address).unwrap(), first);
        }

        /// Invariant: the vault holds exactly the stake until resolution, then
        /// all of it moves to the chosen destination.
        #[test]
        fn fuzz_escrow_conservation(
            amount in 1u64..=1_000_000u64,
            extra in 0u64..1_000u64,
            success in any::<bool>(),
        ) {
            let mut h = Harness::new();
            let (creator, source) = h.funded_user(amount + extra);
            let judge = Pubkey::new_unique();
            let params = terms("stake", amount, judge, START + 1);
            let destination = if success { params.to_success } else { params.to_failure };
            let created = h.create(creator, source, params).unwrap();

            prop_assert_eq!(h.program.vault_balance(&created.address).unwrap(), amount);
            prop_assert_eq!(h.balance_of(&creator), extra);

            let before = h.balance_of(&destination);
            h.clock.advance(1);
            h.program.cast_judgement(judge, created.address, Verdict::from(success)).unwrap();

            prop_assert_eq!(h.program.vault_balance(&created.address).unwrap(), 0);
            prop_assert_eq!(h.balance_of(&destination), before + amount);
        }

        /// Invariant: after one judgement every later call is rejected and
        /// changes nothing.
        #[test]
        fn fuzz_single_resolution(
            first in any::<bool>(),
            replays in prop::collection::vec(any::<bool>(), 1..6),
        ) {
            let mut h = Harness::new();
            let (creator, source) = h.funded_user(100);
            let judge = Pubkey::new_unique();
            let created = h.create(creator, source, terms("once", 100, judge, START + 1)).unwrap();
            h.clock.advance(1);

            let resolved = h.program.cast_judgement(judge, created.address, Verdict::from(first)).unwrap();
            for verdict in replays {
                let result = h.program.cast_judgement(judge, created.address, Verdict::from(verdict));
                prop_assert_eq!(result, Err(JudgementError::AlreadyResolved));
                let habit = h.program.fetch_habit(&created.address).unwrap();
                prop_assert_eq!(habit.outcome, resolved.outcome);
                prop_assert_eq!(h.program.vault_balance(&created.address).unwrap(), 0);
            }
            prop_assert_eq!(h.program.events().len(), 2);
        }

        /// Invariant: address derivation is pure and matches creation.
        #[test]
        fn fuzz_address_determinism(desc in description()) {
            let mut h = Harness::new();
            let (creator, source) = h.funded_user(1);

            let derived = h.program.derive_habit_address(&creator, desc.as_bytes()).unwrap();
            prop_assert_eq!(
                h.program.derive_habit_address(&creator, desc.as_bytes()).unwrap(),
                derived
            );

            let created = h.create(creator, source, terms(&desc, 1, creator, START + 1)).unwrap();
            prop_assert_eq!(created.address, derived);
        }
    }
}
