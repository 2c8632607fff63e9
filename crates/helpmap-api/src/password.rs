use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

/// Argon2 digest checked when the username is unknown, so that a failed
/// login costs the same whether or not the account exists.
static ABSENT_USER_DIGEST: LazyLock<String> =
    LazyLock::new(|| hash("absent-user-placeholder").unwrap_or_default());

/// Hash a password with Argon2id and a random salt (PHC string).
pub fn hash(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?
        .to_string();
    Ok(hash)
}

/// Check `password` against a stored digest.
///
/// Accepts Argon2 PHC strings and, for users written by the old file
/// format, bare hex SHA-256 digests.
pub fn verify(password: &str, digest: &str) -> bool {
    if is_legacy_digest(digest) {
        return legacy_sha256(password).eq_ignore_ascii_case(digest);
    }

    match PasswordHash::new(digest) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Burn one Argon2 verification for a login whose username matched no
/// account. Always `false`.
pub fn verify_absent(password: &str) -> bool {
    let _ = verify(password, &ABSENT_USER_DIGEST);
    false
}

fn is_legacy_digest(digest: &str) -> bool {
    digest.len() == 64 && digest.bytes().all(|b| b.is_ascii_hexdigit())
}

fn legacy_sha256(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
