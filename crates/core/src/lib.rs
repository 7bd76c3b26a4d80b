//! Smart Bazaar Core - Shared domain types.
//!
//! This crate provides the types used across all Smart Bazaar components:
//! - `server` - JSON API over the vendor directory
//! - `cli` - Command-line tools for schema setup and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Validation that belongs at the input boundary
//! (prices, emails, coordinates, opening hours) lives here so every
//! caller parses input the same way.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, coordinates, vendor and catalog records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
