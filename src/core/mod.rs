//! Core library components.
//!
//! This module contains the reusable logic for token encryption, key
//! derivation, value resolution and the storage collaborator traits.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod global;
pub mod overrides;
pub mod resolver;
pub mod store;
pub mod types;
