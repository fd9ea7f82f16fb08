//! Habit program: the entry points a client calls
//!
//! Owns the ledger, the injected clock, and the event log. Every mutating
//! entry point runs as one ledger transaction; events are recorded only when
//! the transaction commits. Callers that need to share a program across
//! threads wrap it in `Arc<Mutex<_>>`, which serializes transactions the way
//! a ledger host would.

use rust_decimal::Decimal;
use tracing::info;
use types::ids::{Address, Pubkey};
use types::numeric::{from_ui_amount, to_ui_amount};

use crate::clock::{Clock, SystemClock};
use crate::config::ProgramConfig;
use crate::errors::{FetchError, JudgementError, LedgerError, PdaError, ProgramError, RegistryError};
use crate::events::{ContractEvent, EventRecord, HabitCreated, HabitJudged};
use crate::judgement;
use crate::ledger::Ledger;
use crate::pda::{associated_token_address, find_habit_address};
use crate::registry::{self, CreatedHabit, FundingAccounts, NewHabit};
use crate::state::{Habit, Verdict};

#[derive(Debug)]
pub struct HabitProgram<C: Clock = SystemClock> {
    config: ProgramConfig,
    clock: C,
    ledger: Ledger,
    /// Emitted events log (append-only)
    events: Vec<EventRecord>,
}

impl HabitProgram<SystemClock> {
    /// Program reading wall-clock time.
    pub fn new(config: ProgramConfig) -> Result<Self, ProgramError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> HabitProgram<C> {
    pub fn with_clock(config: ProgramConfig, clock: C) -> Result<Self, ProgramError> {
        let config = config.validate()?;
        info!(
            program_id = %config.program_id,
            max_description_len = config.max_description_len,
            "HabitProgram initialized"
        );
        Ok(Self {
            config,
            clock,
            ledger: Ledger::new(),
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    /// Current time according to the injected clock.
    pub fn now(&self) -> i64 {
        self.clock.unix_timestamp()
    }

    // ───────────────────────── Token Setup ─────────────────────────

    /// Create a new mint and return its address.
    pub fn create_mint(&mut self, mint_authority: Pubkey, decimals: u8) -> Result<Address, ProgramError> {
        let token_program = self.config.token_program();
        let address = Pubkey::new_unique();
        self.ledger
            .transact(|tx| token_program.initialize_mint(tx, address, mint_authority, decimals))?;
        Ok(address)
    }

    /// Create `owner`'s associated token account for `mint`.
    pub fn create_token_account(&mut self, owner: Pubkey, mint: Address) -> Result<Address, ProgramError> {
        let token_program = self.config.token_program();
        Ok(self
            .ledger
            .transact(|tx| token_program.create_associated_token_account(tx, &owner, &mint))?)
    }

    pub fn mint_to(
        &mut self,
        mint: Address,
        destination: Address,
        mint_authority: Pubkey,
        amount: u64,
    ) -> Result<(), ProgramError> {
        let token_program = self.config.token_program();
        Ok(self
            .ledger
            .transact(|tx| token_program.mint_to(tx, &mint, &destination, &mint_authority, amount))?)
    }

    // ───────────────────────── Creation ─────────────────────────

    /// Create a habit and lock its stake. `creator` is the signer.
    pub fn new_habit(
        &mut self,
        creator: Pubkey,
        funding: FundingAccounts,
        params: NewHabit,
    ) -> Result<CreatedHabit, RegistryError> {
        let now = self.now();
        let config = &self.config;
        let (created, tx_id) = self.ledger.transact(|tx| {
            let created = registry::new_habit(tx, config, creator, funding, params, now)?;
            Ok::<_, RegistryError>((created, tx.id()))
        })?;

        self.events.push(EventRecord {
            tx_id,
            event: ContractEvent::HabitCreated(HabitCreated {
                habit: created.address,
                creator,
                judge: created.habit.judge,
                deadline: created.habit.deadline,
                amount: created.habit.amount,
            }),
        });
        Ok(created)
    }

    // ───────────────────────── Judgement ─────────────────────────

    /// Resolve the habit at `address`. `caller` is the signer; time comes
    /// from the injected clock. Returns the resolved record.
    pub fn cast_judgement(
        &mut self,
        caller: Pubkey,
        address: Address,
        verdict: Verdict,
    ) -> Result<Habit, JudgementError> {
        let now = self.now();
        let config = &self.config;
        let (settlement, tx_id) = self.ledger.transact(|tx| {
            let settlement = judgement::cast_judgement(tx, config, caller, address, verdict, now)?;
            Ok::<_, JudgementError>((settlement, tx.id()))
        })?;

        self.events.push(EventRecord {
            tx_id,
            event: ContractEvent::HabitJudged(HabitJudged {
                habit: address,
                creator: settlement.habit.creator,
                judge: settlement.habit.judge,
                outcome: settlement.habit.outcome,
                destination: settlement.destination,
                amount: settlement.amount,
            }),
        });
        Ok(settlement.habit)
    }

    // ───────────────────────── Reads ─────────────────────────

    /// Address of the habit for `(creator, description)`. Reads no state.
    pub fn derive_habit_address(&self, creator: &Pubkey, description: &[u8]) -> Result<Address, PdaError> {
        find_habit_address(&self.config.program_id, creator, description).map(|(address, _)| address)
    }

    pub fn fetch_habit(&self, address: &Address) -> Result<&Habit, FetchError> {
        self.ledger.habit(address).map_err(|e| not_found(*address, e))
    }

    /// Look up a habit by re-deriving its address.
    pub fn fetch_habit_by_seed(&self, creator: &Pubkey, description: &[u8]) -> Result<&Habit, FetchError> {
        let address = self.derive_habit_address(creator, description)?;
        self.fetch_habit(&address)
    }

    /// Address of the vault holding a habit's stake.
    pub fn vault_address(&self, habit_address: &Address) -> Result<Address, FetchError> {
        let habit = self.fetch_habit(habit_address)?;
        Ok(associated_token_address(
            habit_address,
            &habit.mint,
            &self.config.token_program_id,
            &self.config.associated_token_program_id,
        )?)
    }

    pub fn vault_balance(&self, habit_address: &Address) -> Result<u64, FetchError> {
        let vault = self.vault_address(habit_address)?;
        self.token_balance(&vault)
    }

    pub fn token_balance(&self, account: &Address) -> Result<u64, FetchError> {
        self.ledger
            .token_account(account)
            .map(|token| token.amount)
            .map_err(|e| not_found(*account, e))
    }

    /// Balance in whole tokens, using the mint's decimals.
    pub fn ui_balance(&self, account: &Address) -> Result<Decimal, ProgramError> {
        let token = self
            .ledger
            .token_account(account)
            .map_err(|e| not_found(*account, e))?;
        let mint = self
            .ledger
            .mint(&token.mint)
            .map_err(|e| not_found(token.mint, e))?;
        Ok(to_ui_amount(token.amount, mint.decimals)?)
    }

    /// Convert a whole-token amount into base units of `mint`.
    ///
    /// Amounts finer than the mint's decimals are rejected, never rounded.
    pub fn base_units(&self, mint: &Address, amount: Decimal) -> Result<u64, ProgramError> {
        let decimals = self
            .ledger
            .mint(mint)
            .map_err(|e| not_found(*mint, e))?
            .decimals;
        Ok(from_ui_amount(amount, decimals)?)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    // ───────────────────────── Events ─────────────────────────

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.events)
    }
}

fn not_found(address: Address, err: LedgerError) -> FetchError {
    match err {
        LedgerError::AccountNotFound { .. } => FetchError::NotFound { address },
        other => FetchError::Ledger(other),
    }
}
