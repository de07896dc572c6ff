//! # Structural Errors
//!
//! Raised by the payload normalizer when a caller-supplied payload is not
//! well-formed. A structural error always aborts the operation before any
//! network call is made.
//!
//! Every variant carries the `$`-rooted path of the offending value, e.g.
//! `$.responses.200.properties.id`, so that an agent can repair the payload
//! without guesswork.

use thiserror::Error;

/// Malformed input shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// A key the model cannot default is absent.
    #[error("missing required key \"{key}\" at {path}")]
    MissingKey {
        /// Path of the object that should have held the key.
        path: String,
        /// The absent key.
        key: String,
    },

    /// A value has the wrong JSON kind.
    #[error("wrong kind at {path}: expected {expected}, found {found}")]
    WrongKind {
        /// Path of the offending value.
        path: String,
        /// Expected JSON kind.
        expected: &'static str,
        /// Actual JSON kind.
        found: &'static str,
    },

    /// A value has the right kind but is outside the accepted domain
    /// (unknown HTTP method, status code out of range, ...).
    #[error("invalid value at {path}: {reason}")]
    InvalidValue {
        /// Path of the offending value.
        path: String,
        /// Human-readable reason.
        reason: String,
    },

    /// A `$ref` names a component that the payload does not define.
    #[error("unresolved schema reference \"{reference}\" at {path}")]
    UnresolvedReference {
        /// Path of the `$ref` node.
        path: String,
        /// The reference string as written.
        reference: String,
    },

    /// A `$ref` chain loops back onto itself.
    #[error("cyclic schema reference \"{reference}\" at {path}")]
    CyclicReference {
        /// Path of the `$ref` node that closes the cycle.
        path: String,
        /// The reference string as written.
        reference: String,
    },

    /// Inlining `$ref` targets grew the schema tree past the node budget.
    #[error("schema at {path} expands to more than {limit} nodes")]
    TooLarge {
        /// Path of the node that crossed the budget.
        path: String,
        /// The node budget.
        limit: usize,
    },
}

impl StructuralError {
    /// Path of the offending value.
    pub fn path(&self) -> &str {
        match self {
            Self::MissingKey { path, .. }
            | Self::WrongKind { path, .. }
            | Self::InvalidValue { path, .. }
            | Self::UnresolvedReference { path, .. }
            | Self::CyclicReference { path, .. }
            | Self::TooLarge { path, .. } => path,
        }
    }
}
