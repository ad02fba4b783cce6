use blake2::{Blake2b, Digest};
use rand::RngCore;
use subtle::ConstantTimeEq;

const SALT_LENGTH: usize = 16;

/// Salted one-way hash, stored as `hex(salt)$hex(digest)`.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    format!("{}${}", hex::encode(salt), salted_digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let (salt, digest) = match stored.split_once('$') {
        Some(parts) => parts,
        None => return false,
    };
    let salt = match hex::decode(salt) {
        Ok(salt) if salt.len() == SALT_LENGTH => salt,
        _ => return false,
    };

    let expected = salted_digest(&salt, password);
    expected.as_bytes().ct_eq(digest.as_bytes()).into()
}

fn salted_digest(salt: &[u8], password: &str) -> String {
    let mut hasher = Blake2b::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_against_same_password() {
        let stored = hash_password("password123");
        assert!(verify_password("password123", &stored));
        assert!(!verify_password("password124", &stored));
    }

    #[test]
    fn same_password_gets_different_salts() {
        let first = hash_password("password123");
        let second = hash_password("password123");
        assert_ne!(first, second);
        assert!(verify_password("password123", &second));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("password123", ""));
        assert!(!verify_password("password123", "no-separator"));
        assert!(!verify_password("password123", "zz$abcd"));
        assert!(!verify_password("password123", "abcd$abcd"));
    }
}
