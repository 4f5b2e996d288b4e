use thiserror::Error;

/// Cost factor bounds accepted by bcrypt
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Plaintext verified against the dummy digest when a username is unknown
const TIMING_GUARD_PLAINTEXT: &str = "study-planner-timing-guard";

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("password worker failed: {0}")]
    Worker(String),
}

/// bcrypt wrapper with a fixed cost factor.
///
/// Hashing and verification are CPU-bound; the async variants move them onto
/// the blocking pool.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: String,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        let dummy_hash = bcrypt::hash(TIMING_GUARD_PLAINTEXT, cost)?;
        Ok(Self { cost, dummy_hash })
    }

    /// Salted hash; the same plaintext yields a different digest per call
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    pub fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordError> {
        Ok(bcrypt::verify(plaintext, digest)?)
    }

    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, PasswordError> {
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| PasswordError::Worker(e.to_string()))?
            .map_err(PasswordError::from)
    }

    pub async fn verify_blocking(
        &self,
        plaintext: String,
        digest: String,
    ) -> Result<bool, PasswordError> {
        tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &digest))
            .await
            .map_err(|e| PasswordError::Worker(e.to_string()))?
            .map_err(PasswordError::from)
    }

    /// Spend one verification's worth of time, always reporting a mismatch
    pub async fn verify_unknown_user(&self, plaintext: String) -> Result<bool, PasswordError> {
        self.verify_blocking(plaintext, self.dummy_hash.clone())
            .await
            .map(|_| false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(MIN_COST).unwrap()
    }

    #[test]
    fn hash_produces_bcrypt_digest() {
        let digest = hasher().hash("pw123").unwrap();
        assert!(digest.starts_with("$2b$"));
        assert_eq!(digest.len(), 60);
    }

    #[test]
    fn same_plaintext_hashes_differently() {
        let hasher = hasher();
        assert_ne!(hasher.hash("pw123").unwrap(), hasher.hash("pw123").unwrap());
    }

    #[test]
    fn verify_matches_only_original_plaintext() {
        let hasher = hasher();
        let digest = hasher.hash("correct horse").unwrap();
        assert!(hasher.verify("correct horse", &digest).unwrap());
        assert!(!hasher.verify("wrong horse", &digest).unwrap());
    }

    #[test]
    fn malformed_digest_is_an_error() {
        assert!(hasher().verify("pw", "not-a-bcrypt-hash").is_err());
    }

    #[tokio::test]
    async fn blocking_variants_agree_with_sync_ones() {
        let hasher = hasher();
        let digest = hasher.hash_blocking("pw123".to_string()).await.unwrap();
        assert!(hasher
            .verify_blocking("pw123".to_string(), digest.clone())
            .await
            .unwrap());
        assert!(!hasher
            .verify_blocking("pw124".to_string(), digest)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn unknown_user_check_never_matches() {
        let hasher = hasher();
        assert!(!hasher
            .verify_unknown_user(TIMING_GUARD_PLAINTEXT.to_string())
            .await
            .unwrap());
    }
}
