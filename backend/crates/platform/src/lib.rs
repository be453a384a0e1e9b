//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (CSPRNG identifiers, constant-time compare)
//! - Cookie management
//! - Client identification helpers

pub mod client;
pub mod cookie;
pub mod crypto;
