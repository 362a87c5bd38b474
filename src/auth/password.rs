//! Salted password hashing
//!
//! Stored form is `"<salt>$<hex key>"` where the key is PBKDF2-HMAC-SHA256
//! over the password with `ITERATIONS` rounds.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

#[cfg(not(test))]
const ITERATIONS: u32 = 100_000;
#[cfg(test)]
const ITERATIONS: u32 = 1_000;

fn derive_key(salt: &str, password: &str) -> [u8; 32] {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), ITERATIONS, &mut key);
    key
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, hex::encode(derive_key(&salt, password)))
}

/// Check a password against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, expected)) = stored.split_once('$') else {
        return false;
    };
    if salt.is_empty() {
        return false;
    }
    let Ok(expected) = hex::decode(expected) else {
        return false;
    };

    let actual = derive_key(salt, password);
    bool::from(actual[..].ct_eq(&expected[..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("same");
        let b = hash_password("same");
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }

    #[test]
    fn test_malformed_hash_rejected() {
        assert!(!verify_password("pw", "no-separator"));
        assert!(!verify_password("pw", "$abc"));
        assert!(!verify_password("pw", "salt$"));
        assert!(!verify_password("pw", "salt$not-hex"));
    }

    #[test]
    fn test_matches_pbkdf2_reference() {
        // RFC 7914 section 11, first 32 bytes
        let mut key = [0u8; 32];
        pbkdf2_hmac::<Sha256>(b"passwd", b"salt", 1, &mut key);
        assert_eq!(
            hex::encode(key),
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc"
        );

        let stored = format!("pepper${}", hex::encode(derive_key("pepper", "pw")));
        assert!(verify_password("pw", &stored));
        assert!(!verify_password("pw", &stored[..stored.len() - 2]));
    }
}
