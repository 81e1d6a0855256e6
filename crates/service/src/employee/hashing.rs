use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

use super::errors::EmployeeError;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingParams {
    fn default() -> Self {
        configs::SecurityConfig::default().into()
    }
}

impl From<configs::SecurityConfig> for HashingParams {
    fn from(c: configs::SecurityConfig) -> Self {
        Self { memory_kib: c.argon2_memory_kib, iterations: c.argon2_iterations, parallelism: c.argon2_parallelism }
    }
}

impl HashingParams {
    fn hasher(&self) -> Result<Argon2<'static>, EmployeeError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| EmployeeError::Hashing(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hash a password into a PHC string with a fresh random salt.
///
/// Runs on the blocking thread pool so the async workers keep serving
/// requests while the hash is computed.
pub async fn hash_password(password: String, params: HashingParams) -> Result<String, EmployeeError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        params
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| EmployeeError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| EmployeeError::Hashing(format!("hash task failed: {e}")))?
}

/// Check a password against a stored PHC string. Parameters are read from the hash.
pub fn verify_password(password: &str, phc: &str) -> Result<bool, EmployeeError> {
    let parsed = PasswordHash::new(phc).map_err(|e| EmployeeError::Hashing(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}
