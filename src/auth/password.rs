//! Password hashing and verification using bcrypt

use crate::error::AppError;

/// Default bcrypt cost (2^10 rounds)
pub const DEFAULT_COST: u32 = 10;

/// Password hasher with a fixed work factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create hasher with the default cost
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Create hasher with an explicit cost (4..=31)
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password; every call draws a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        bcrypt::hash(password, self.cost).map_err(|e| {
            tracing::error!("Failed to hash password: {:?}", e);
            AppError::Internal(format!("Failed to hash password: {}", e))
        })
    }

    /// Verify a password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; a malformed hash is an internal error,
    /// never reported as bad credentials.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        bcrypt::verify(password, hash).map_err(|e| {
            tracing::error!("Failed to verify password hash: {:?}", e);
            AppError::Internal(format!("Failed to verify password hash: {}", e))
        })
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
