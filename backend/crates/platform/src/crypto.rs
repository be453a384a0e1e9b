//! Cryptographic Utilities

use rand::{RngCore, rngs::OsRng};

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generate an opaque random identifier.
///
/// `len_bytes` random bytes from the OS CSPRNG, rendered as
/// `2 * len_bytes` lowercase hex characters. Collisions are not handled;
/// at 10 bytes the space is 2^80.
pub fn random_hex_id(len_bytes: usize) -> String {
    hex::encode(random_bytes(len_bytes))
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        // Should not be all zeros (statistically)
        assert!(bytes.iter().any(|&b| b != 0));

        let bytes = random_bytes(0);
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_random_hex_id_shape() {
        let id = random_hex_id(10);
        assert_eq!(id.len(), 20);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(hex::decode(&id).is_ok());

        let id = random_hex_id(5);
        assert_eq!(id.len(), 10);
    }

    #[test]
    fn test_random_hex_id_uniqueness() {
        let a = random_hex_id(10);
        let b = random_hex_id(10);
        assert_ne!(a, b);
    }

    #[test]
    fn test_constant_time_eq() {
        let a = [1u8, 2, 3, 4];
        let b = [1u8, 2, 3, 4];
        let c = [1u8, 2, 3, 5];
        assert!(constant_time_eq(&a, &b));
        assert!(!constant_time_eq(&a, &c));
        assert!(!constant_time_eq(&a, &b[..3]));
        assert!(constant_time_eq(b"", b""));
    }
}
