//! Where a resolved value came from.

use std::fmt;

use serde::Serialize;

/// The path that produced a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// An out-of-band override; storage was not consulted.
    Override,
    /// The settings store, decrypted if it held a token.
    Database,
    /// The caller-supplied default.
    Default,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Override => "override",
            Self::Database => "database",
            Self::Default => "default",
        })
    }
}

/// A resolved value with its provenance, for diagnostics and admin views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub value: String,
    pub source: Source,
    /// Override identifier for [`Source::Override`], storage key otherwise.
    pub identifier: String,
    /// Whether the stored value carried the token prefix.
    pub was_encrypted: bool,
}

impl Resolved {
    pub(crate) fn fallback(default: &str, identifier: String, was_encrypted: bool) -> Self {
        Self {
            value: default.to_string(),
            source: Source::Default,
            identifier,
            was_encrypted,
        }
    }

    /// The value, unless it is the caller's default.
    pub(crate) fn found(self) -> Option<String> {
        match self.source {
            Source::Default => None,
            _ => Some(self.value),
        }
    }
}

/// Result of a write through the resolver.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The token was written to storage.
    Stored,
    /// An override is defined for the name, so nothing was written.
    Suppressed,
}

impl SetOutcome {
    pub fn is_stored(self) -> bool {
        self == Self::Stored
    }
}
