//! Domain Services
//!
//! Pure domain logic for PIN verification.

use crate::domain::value_objects::Pin;
use platform::crypto::constant_time_eq;

/// Verify a submitted PIN against a level secret.
///
/// Plain equality is the contract; the comparison runs in constant time.
pub fn verify_pin(candidate: &str, secret: &Pin) -> bool {
    constant_time_eq(candidate.as_bytes(), secret.as_str().as_bytes())
}
