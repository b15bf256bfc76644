//! Core types for apizza.
//!
//! This module provides type-safe wrappers for the vendor's domain concepts.

pub mod address;
pub mod card;
pub mod id;
pub mod price;
pub mod service;

pub use address::{Address, AddressError, AddressType, StreetAddr, UserAddress, parse_address};
pub use card::{Card, CardError, CardKind, parse_expiration, validate_card};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use service::{ServiceMethod, ServiceMethodError};
