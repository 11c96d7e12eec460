//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (secure randomness, constant-time comparison)
//! - Password policy and hashing (Argon2id)

pub mod crypto;
pub mod password;
