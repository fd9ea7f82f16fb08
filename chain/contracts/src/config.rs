//! Program configuration
//!
//! Ids that namespace every derived address, plus the description limit.
//! Defaults derive each id by hashing a fixed label, so two deployments with
//! default configuration agree on every address.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use types::ids::Pubkey;

use crate::errors::ProgramError;
use crate::pda::MAX_SEED_LEN;
use crate::token::TokenProgram;

/// Configuration for a habit program deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    /// Id that namespaces habit record addresses
    pub program_id: Pubkey,
    /// Id of the token program that owns balances
    pub token_program_id: Pubkey,
    /// Id that namespaces associated token account addresses
    pub associated_token_program_id: Pubkey,
    /// Longest accepted description in bytes; never above the seed limit
    pub max_description_len: usize,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            program_id: label_id(b"solhabits"),
            token_program_id: label_id(b"token-program"),
            associated_token_program_id: label_id(b"associated-token-program"),
            max_description_len: MAX_SEED_LEN,
        }
    }
}

impl ProgramConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ProgramError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ProgramError::Config {
            reason: e.to_string(),
        })?;
        config.validate()
    }

    /// Reject settings that could never derive a valid address.
    pub fn validate(self) -> Result<Self, ProgramError> {
        if self.max_description_len == 0 || self.max_description_len > MAX_SEED_LEN {
            return Err(ProgramError::Config {
                reason: format!(
                    "max_description_len must be in 1..={}, got {}",
                    MAX_SEED_LEN, self.max_description_len
                ),
            });
        }
        if self.program_id == self.token_program_id
            || self.program_id == self.associated_token_program_id
        {
            return Err(ProgramError::Config {
                reason: "program ids must be distinct".to_string(),
            });
        }
        Ok(self)
    }

    pub fn token_program(&self) -> TokenProgram {
        TokenProgram::new(self.token_program_id, self.associated_token_program_id)
    }
}

fn label_id(label: &[u8]) -> Pubkey {
    Pubkey::new_from_array(Sha256::digest(label).into())
}
