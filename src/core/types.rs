//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A caller-facing key such as `api_key`, before namespacing.
pub type LogicalName = String;

/// A storage key: the logical name with the namespace prepended.
pub type FullName = String;

/// An override identifier: the uppercased full name (e.g. `MYAPP_API_KEY`).
pub type OverrideId = String;

/// A prefixed, base64-encoded, IV-prepended ciphertext string.
pub type Token = String;

/// Identifies the owner of a per-owner attribute (user, record, ...).
pub type OwnerId = u64;
