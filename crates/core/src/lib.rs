//! apizza core - shared domain types.
//!
//! This crate provides the value types used across all apizza components:
//! - `vendor` - the Domino's API client, local cache and order lifecycle
//! - `cli` - the `apizza` command-line binary
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no disk
//! access, no HTTP clients. Address normalization and card validation live
//! here because both are plain string parsing.
//!
//! # Modules
//!
//! - [`types`] - Addresses, payment cards, service methods, vendor IDs and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
