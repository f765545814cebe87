//! Error taxonomy shared by the gateway, the resolver and the
//! reconciliation passes.

use thiserror::Error;

use crate::selector::EntityKind;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by gateway calls and reconciliation passes.
///
/// Nothing in this crate retries on any of these; retry policy belongs to
/// the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// The external process could not be reached, or its reply could not
    /// be parsed.
    #[error("transport failure: {0}")]
    Transport(String),

    /// No live entity matches the selector or identifier.
    #[error("{kind} not found: {token}")]
    NotFound { kind: EntityKind, token: String },

    /// A label matched more than one live space. Labels are assumed unique,
    /// so this means external state has drifted from that assumption.
    #[error("label '{label}' matches {count} spaces; labels must be unique")]
    Ambiguous { label: String, count: usize },

    /// A candidate label failed the admission rules. No mutation was sent.
    #[error("invalid label: {0}")]
    InvalidLabel(String),

    /// Declared configuration violates a precondition. No mutation was sent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The external system declined a mutation.
    #[error("command rejected: {0}")]
    Rejected(String),

    /// An ordering pass stopped making progress before reaching the
    /// desired order. The live state may still be partially improved.
    #[error("spaces on display {display} could not be reconciled: no progress")]
    Unreconcilable { display: u32 },

    /// An ordering pass exhausted its re-query budget.
    #[error("spaces on display {display} not reconciled within {requeries} re-queries")]
    ReconcileTimeout { display: u32, requeries: usize },
}
