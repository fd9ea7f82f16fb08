//! Types library for the habit commitment escrow
//!
//! Shared definitions used by the contract layer and by any harness that
//! drives it: identities, account addresses, transaction ids, and token
//! amount conversions.
//!
//! # Modules
//! - `ids`: 32-byte identities (`Pubkey`, `Address`) and `TransactionId`
//! - `numeric`: raw base units <-> human-readable token amounts

pub mod ids;
pub mod numeric;
