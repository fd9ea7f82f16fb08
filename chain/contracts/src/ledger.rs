//! Account ledger with all-or-nothing transactions
//!
//! All accounts share one flat address space. Mutations happen only inside
//! `Ledger::transact`, which hands the closure a journaled `Transaction`:
//! the first write to any address records that address's pre-image, and if
//! the closure returns `Err` (or unwinds) every touched address is restored
//! before control returns. A failed operation is therefore indistinguishable
//! from one that never started.

use std::collections::HashMap;
use tracing::debug;
use types::ids::{Address, TransactionId};

use crate::errors::LedgerError;
use crate::state::{Account, Habit, Mint, TokenAccount};

/// The account store.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    accounts: HashMap<Address, Account>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` atomically. Writes are kept only if it returns `Ok`.
    pub fn transact<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<T, E>,
    {
        let mut tx = Transaction::begin(&mut self.accounts);
        let result = f(&mut tx);
        if result.is_ok() {
            tx.commit();
        }
        result
    }

    pub fn get(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.accounts.contains_key(address)
    }

    pub fn habit(&self, address: &Address) -> Result<&Habit, LedgerError> {
        as_habit(address, self.accounts.get(address))
    }

    pub fn token_account(&self, address: &Address) -> Result<&TokenAccount, LedgerError> {
        as_token_account(address, self.accounts.get(address))
    }

    pub fn mint(&self, address: &Address) -> Result<&Mint, LedgerError> {
        as_mint(address, self.accounts.get(address))
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// A journaled view over the ledger, open for the duration of one operation.
pub struct Transaction<'a> {
    id: TransactionId,
    accounts: &'a mut HashMap<Address, Account>,
    /// Pre-images of every address written so far
    journal: HashMap<Address, Option<Account>>,
    committed: bool,
}

impl<'a> Transaction<'a> {
    fn begin(accounts: &'a mut HashMap<Address, Account>) -> Self {
        Self {
            id: TransactionId::new(),
            accounts,
            journal: HashMap::new(),
            committed: false,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn get(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.accounts.contains_key(address)
    }

    /// Store a new account. Fails if anything already lives at `address`.
    pub fn create(&mut self, address: Address, account: Account) -> Result<(), LedgerError> {
        if self.accounts.contains_key(&address) {
            return Err(LedgerError::AddressInUse { address });
        }
        self.touch(address);
        self.accounts.insert(address, account);
        Ok(())
    }

    pub fn habit(&self, address: &Address) -> Result<&Habit, LedgerError> {
        as_habit(address, self.accounts.get(address))
    }

    pub fn habit_mut(&mut self, address: &Address) -> Result<&mut Habit, LedgerError> {
        self.habit(address)?;
        match self.account_mut(address) {
            Some(Account::Habit(habit)) => Ok(habit),
            _ => Err(LedgerError::AccountNotFound { address: *address }),
        }
    }

    pub fn token_account(&self, address: &Address) -> Result<&TokenAccount, LedgerError> {
        as_token_account(address, self.accounts.get(address))
    }

    pub fn token_account_mut(&mut self, address: &Address) -> Result<&mut TokenAccount, LedgerError> {
        self.token_account(address)?;
        match self.account_mut(address) {
            Some(Account::Token(account)) => Ok(account),
            _ => Err(LedgerError::AccountNotFound { address: *address }),
        }
    }

    pub fn mint(&self, address: &Address) -> Result<&Mint, LedgerError> {
        as_mint(address, self.accounts.get(address))
    }

    pub fn mint_mut(&mut self, address: &Address) -> Result<&mut Mint, LedgerError> {
        self.mint(address)?;
        match self.account_mut(address) {
            Some(Account::Mint(mint)) => Ok(mint),
            _ => Err(LedgerError::AccountNotFound { address: *address }),
        }
    }

    fn account_mut(&mut self, address: &Address) -> Option<&mut Account> {
        self.touch(*address);
        self.accounts.get_mut(address)
    }

    /// Record the pre-image of `address` on first write.
    fn touch(&mut self, address: Address) {
        if !self.journal.contains_key(&address) {
            let previous = self.accounts.get(&address).cloned();
            self.journal.insert(address, previous);
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }

    fn rollback(&mut self) {
        let touched = self.journal.len();
        for (address, previous) in self.journal.drain() {
            match previous {
                Some(account) => {
                    self.accounts.insert(address, account);
                }
                None => {
                    self.accounts.remove(&address);
                }
            }
        }
        debug!(tx_id = %self.id, touched, "Transaction rolled back");
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.rollback();
        }
    }
}

fn as_habit<'a>(address: &Address, account: Option<&'a Account>) -> Result<&'a Habit, LedgerError> {
    match account {
        Some(Account::Habit(habit)) => Ok(habit),
        Some(_) => Err(LedgerError::AccountTypeMismatch {
            address: *address,
            expected: "habit",
        }),
        None => Err(LedgerError::AccountNotFound { address: *address }),
    }
}

fn as_token_account<'a>(
    address: &Address,
    account: Option<&'a Account>,
) -> Result<&'a TokenAccount, LedgerError> {
    match account {
        Some(Account::Token(token)) => Ok(token),
        Some(_) => Err(LedgerError::AccountTypeMismatch {
            address: *address,
            expected: "token account",
        }),
        None => Err(LedgerError::AccountNotFound { address: *address }),
    }
}

fn as_mint<'a>(address: &Address, account: Option<&'a Account>) -> Result<&'a Mint, LedgerError> {
    match account {
        Some(Account::Mint(mint)) => Ok(mint),
        Some(_) => Err(LedgerError::AccountTypeMismatch {
            address: *address,
            expected: "mint",
        }),
        None => Err(LedgerError::AccountNotFound { address: *address }),
    }
}
