//! Selector resolution: one query, one snapshot.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::selector::{EntityKind, Selector};

/// Resolve a selector to the matching entity's current snapshot document.
///
/// Issues exactly one query. Label selectors list the domain and filter by
/// exact label, so that a collision is detected instead of silently picking
/// one of the colliding spaces; all other selectors go through a scoped
/// query. Resolution failures are reported immediately, never retried.
pub fn resolve(gw: &dyn Gateway, kind: EntityKind, selector: &Selector) -> Result<Value> {
    selector.validate_for(kind)?;

    match selector {
        Selector::Label(label) => {
            let records = list(gw, kind)?;
            let mut matches: Vec<Value> = records
                .into_iter()
                .filter(|r| r.get("label").and_then(Value::as_str) == Some(label.as_str()))
                .collect();
            match matches.len() {
                0 => Err(Error::NotFound {
                    kind,
                    token: label.clone(),
                }),
                1 => Ok(matches.remove(0)),
                count => Err(Error::Ambiguous {
                    label: label.clone(),
                    count,
                }),
            }
        }
        Selector::Id(id) => {
            let records = list(gw, kind)?;
            records
                .into_iter()
                .find(|r| r.get("id").and_then(Value::as_u64) == Some(*id))
                .ok_or(Error::NotFound {
                    kind,
                    token: id.to_string(),
                })
        }
        other => {
            let token = other.token();
            let mut args = vec!["query", kind.query_flag(), kind.scope_flag()];
            if let Some(t) = token.as_deref() {
                args.push(t);
            }
            match gw.query(&args) {
                Ok(doc) => Ok(doc),
                // The external process reports a miss as a declined command.
                Err(Error::Rejected(_)) => Err(Error::NotFound {
                    kind,
                    token: other.to_string(),
                }),
                Err(e) => Err(e),
            }
        }
    }
}

/// List all records of a domain.
pub(crate) fn list(gw: &dyn Gateway, kind: EntityKind) -> Result<Vec<Value>> {
    let doc = gw.query(&["query", kind.query_flag()])?;
    match doc {
        Value::Array(records) => Ok(records),
        _ => Err(Error::Transport(format!(
            "expected an array of {kind} records"
        ))),
    }
}
