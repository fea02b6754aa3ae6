use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

pub fn hash_password_sha256(password: &str, salt: [u8; 16]) -> [u8; 32] {
    let mut hash = Sha256::new();
    hash.update(password.as_bytes());
    hash.update(salt);
    hash.finalize().into()
}

pub fn generate_salt() -> [u8; 16] {
    // uuid is conveniently 128 bits
    Uuid::new_v4().as_u128().to_le_bytes()
}

/// Constant-time check of `password` against a stored salt and digest.
pub fn verify_password(password: &str, salt: &[u8], expected_hash: &[u8]) -> bool {
    let Ok(salt) = <[u8; 16]>::try_from(salt) else {
        return false;
    };
    let actual = hash_password_sha256(password, salt);
    actual[..].ct_eq(expected_hash).into()
}
