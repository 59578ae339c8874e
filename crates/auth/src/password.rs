//! Password hashing and verification using bcrypt.
//!
//! - Random per-hash salt, deliberately slow (cost is configurable)
//! - Constant-time comparison on verify
//! - Malformed hashes verify as `false`, never as an error

use thiserror::Error;

use crate::PasswordHash;

/// Lowest bcrypt cost accepted (only sensible in tests).
pub const MIN_COST: u32 = 4;
/// Highest bcrypt cost the algorithm defines.
pub const MAX_COST: u32 = 31;

const DUMMY_PASSWORD: &str = "catalog-auth/timing-equalizer";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password cost {0} out of range ({MIN_COST}..={MAX_COST})")]
    InvalidCost(u32),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// bcrypt hasher bound to a cost factor.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: PasswordHash,
}

impl PasswordHasher {
    /// Build a hasher with the given bcrypt cost.
    ///
    /// Hashes one throwaway password up front; that hash backs
    /// [`PasswordHasher::verify_dummy`].
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordError::InvalidCost(cost));
        }
        let dummy = bcrypt::hash(DUMMY_PASSWORD, cost)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;
        Ok(Self {
            cost,
            dummy_hash: PasswordHash::from_stored(dummy),
        })
    }

    /// Hasher with bcrypt's default cost.
    pub fn with_default_cost() -> Result<Self, PasswordError> {
        Self::new(bcrypt::DEFAULT_COST)
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordError> {
        bcrypt::hash(plaintext, self.cost)
            .map(PasswordHash::from_stored)
            .map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    pub fn verify(&self, plaintext: &str, hash: &PasswordHash) -> bool {
        bcrypt::verify(plaintext, hash.as_str()).unwrap_or(false)
    }

    /// Burn the same CPU as a real verify against a hash of this cost.
    ///
    /// Used when the identifier is unknown so response timing does not reveal
    /// which identifiers exist.
    pub fn verify_dummy(&self, plaintext: &str) {
        let _ = self.verify(plaintext, &self.dummy_hash);
    }
}
