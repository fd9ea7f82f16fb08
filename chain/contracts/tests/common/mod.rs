//! Shared fixture for integration tests: a program on a manual clock with one
//! mint and helpers to fund users and read balances.

#![allow(dead_code)]

use contracts::errors::{FetchError, RegistryError};
use contracts::{CreatedHabit, FundingAccounts, HabitProgram, ManualClock, NewHabit, ProgramConfig};
use types::ids::{Address, Pubkey};

pub const START: i64 = 1_700_000_000;
pub const DECIMALS: u8 = 6;

pub struct Harness {
    pub program: HabitProgram<ManualClock>,
    pub clock: ManualClock,
    pub mint: Address,
    pub mint_authority: Pubkey,
}

impl Harness {
    pub fn new() -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let clock = ManualClock::new(START);
        let mut program = HabitProgram::with_clock(ProgramConfig::default(), clock.clone()).unwrap();
        let mint_authority = Pubkey::new_unique();
        let mint = program.create_mint(mint_authority, DECIMALS).unwrap();
        Self {
            program,
            clock,
            mint,
            mint_authority,
        }
    }

    /// New user holding `amount` in their associated token account.
    pub fn funded_user(&mut self, amount: u64) -> (Pubkey, Address) {
        let user = Pubkey::new_unique();
        let account = self.program.create_token_account(user, self.mint).unwrap();
        if amount > 0 {
            self.program
                .mint_to(self.mint, account, self.mint_authority, amount)
                .unwrap();
        }
        (user, account)
    }

    pub fn funding(&self, source: Address) -> FundingAccounts {
        FundingAccounts {
            token_source: source,
            mint: self.mint,
        }
    }

    /// Create a habit funded from `source`.
    pub fn create(
        &mut self,
        creator: Pubkey,
        source: Address,
        params: NewHabit,
    ) -> Result<CreatedHabit, RegistryError> {
        let funding = self.funding(source);
        self.program.new_habit(creator, funding, params)
    }

    /// Balance of `owner`'s associated token account, zero if it does not exist.
    pub fn balance_of(&self, owner: &Pubkey) -> u64 {
        let account = self
            .program
            .config()
            .token_program()
            .associated_token_address(owner, &self.mint)
            .unwrap();
        match self.program.token_balance(&account) {
            Ok(amount) => amount,
            Err(FetchError::NotFound { .. }) => 0,
            Err(e) => panic!("unexpected error reading balance: {}", e),
        }
    }
}

pub fn terms(description: &str, amount: u64, judge: Pubkey, deadline: i64) -> NewHabit {
    NewHabit {
        description: description.as_bytes().to_vec(),
        amount,
        judge,
        to_success: Pubkey::new_unique(),
        to_failure: Pubkey::new_unique(),
        deadline,
    }
}
