//! Transport contract to the external window manager process.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Synchronous request/response channel to the window manager.
///
/// A request is an ordered list of string tokens: domain keyword, selector
/// tokens, verb and arguments. Queries answer with a structured document;
/// mutations answer with an empty acknowledgment. Implementations map an
/// unreachable process or a malformed reply to [`Error::Transport`] and a
/// declined command to [`Error::Rejected`]. Implementations never retry.
pub trait Gateway {
    /// Send a query command and return the parsed response document.
    fn query(&self, args: &[&str]) -> Result<Value>;

    /// Send a mutation command, expecting an empty success marker.
    fn execute(&self, args: &[&str]) -> Result<()>;
}

/// Decode a response document into a typed snapshot.
pub(crate) fn decode<T: DeserializeOwned>(doc: Value) -> Result<T> {
    serde_json::from_value(doc)
        .map_err(|e| Error::Transport(format!("malformed response document: {e}")))
}

/// Treat a benign no-op rejection as success.
///
/// The external system reports "focus the focused space" and friends as
/// errors; callers that do not care pass the diagnostic substring here.
pub(crate) fn tolerate(result: Result<()>, needle: &str) -> Result<()> {
    match result {
        Err(Error::Rejected(msg)) if msg.contains(needle) => Ok(()),
        other => other,
    }
}
