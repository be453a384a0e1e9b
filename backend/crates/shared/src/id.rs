//! Common ID Types
//!
//! Type-safe wrappers for the opaque random identifiers the system hands
//! out. An identifier is a fixed-length printable string with no payload;
//! whether it is *live* is always a store lookup, never a parsing concern.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Generic typed identifier wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type Token = Id<markers::Token>;
/// ```
pub struct Id<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Wrap a freshly generated identifier value
    pub fn from_string(value: String) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Accept an identifier presented by a caller.
    ///
    /// Only the length is checked: anything that is not exactly
    /// `expected_len` characters is treated as absent and rejected.
    pub fn parse(raw: &str, expected_len: usize) -> Option<Self> {
        if raw.len() != expected_len {
            return None;
        }
        Some(Self::from_string(raw.to_string()))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Convert into the underlying string
    pub fn into_string(self) -> String {
        self.value
    }
}

// Manual impls: the marker type is never part of the value, so none of
// these may require bounds on `T`.

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Marker types for different identifier kinds
pub mod markers {
    /// Marker for single-use challenge tokens
    pub struct Token;

    /// Marker for client session identifiers
    pub struct Session;
}

/// Type aliases for common identifiers
pub type Token = Id<markers::Token>;
pub type SessionId = Id<markers::Session>;
