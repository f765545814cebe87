//! Displays: snapshots and stable handles.
//!
//! A display's arrangement index changes when monitors are plugged or
//! rearranged, so handles store the numeric id and re-derive the index per
//! operation, the same way space handles do.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gateway::{decode, tolerate, Gateway};
use crate::resolver::resolve;
use crate::selector::{EntityKind, Selector};
use crate::sort::{self, SortReport};
use crate::space::{all_spaces, Space};
use crate::Frame;

/// Properties of a display, captured by one query and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayProps {
    pub id: u64,
    pub uuid: String,
    /// Arrangement index, 1-based.
    pub index: u32,
    pub frame: Frame,
    /// Mission-control indexes of the member spaces, in arrangement order.
    #[serde(default)]
    pub spaces: Vec<u32>,
}

/// Stable reference to one display, bound to its numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Display {
    id: u64,
}

impl Display {
    /// Resolve a selector once and capture the matched display's id.
    pub fn from_selector(gw: &dyn Gateway, selector: &Selector) -> Result<Self> {
        let props: DisplayProps = decode(resolve(gw, EntityKind::Display, selector)?)?;
        Ok(Self { id: props.id })
    }

    /// Wrap an already-known id.
    pub fn from_id(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Query the current properties of the display.
    pub fn props(&self, gw: &dyn Gateway) -> Result<DisplayProps> {
        all_displays(gw)?
            .into_iter()
            .find(|p| p.id == self.id)
            .ok_or(Error::NotFound {
                kind: EntityKind::Display,
                token: self.id.to_string(),
            })
    }

    /// Currently-correct external selector token for this display.
    pub(crate) fn sel(&self, gw: &dyn Gateway) -> Result<String> {
        Ok(self.props(gw)?.index.to_string())
    }

    /// Focus the display. Focusing the already-focused display is a no-op.
    pub fn focus(&self, gw: &dyn Gateway) -> Result<()> {
        let sel = self.sel(gw)?;
        tolerate(
            gw.execute(&["display", "--focus", &sel]),
            "already focused display",
        )
    }

    /// Handles for the member spaces, in current arrangement order.
    pub fn spaces(&self, gw: &dyn Gateway) -> Result<Vec<Space>> {
        let index = self.props(gw)?.index;
        let mut members: Vec<_> = all_spaces(gw)?
            .into_iter()
            .filter(|p| p.display == index)
            .collect();
        members.sort_by_key(|p| p.index);
        Ok(members.into_iter().map(|p| Space::from_id(p.id)).collect())
    }

    /// Create a new space on this display, returning its handle.
    ///
    /// The external system appends the new space at the end of the
    /// display's arrangement.
    pub fn create_space(&self, gw: &dyn Gateway) -> Result<Space> {
        let sel = self.sel(gw)?;
        gw.execute(&["space", "--create", &sel])?;
        let last_index = *self.props(gw)?.spaces.last().ok_or_else(|| {
            Error::Transport("display reports no spaces after a create".to_string())
        })?;
        let created = all_spaces(gw)?
            .into_iter()
            .find(|p| p.index == last_index)
            .ok_or(Error::NotFound {
                kind: EntityKind::Space,
                token: last_index.to_string(),
            })?;
        Ok(Space::from_id(created.id))
    }

    /// Restore ascending label order among this display's spaces.
    pub fn sort(&self, gw: &dyn Gateway) -> Result<SortReport> {
        sort::sort(gw, self)
    }
}

/// Snapshot every connected display, in arrangement order.
pub fn all_displays(gw: &dyn Gateway) -> Result<Vec<DisplayProps>> {
    let mut displays: Vec<DisplayProps> = decode(gw.query(&["query", "--displays"])?)?;
    displays.sort_by_key(|p| p.index);
    Ok(displays)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_props_decoding() {
        let doc = json!({
            "id": 2,
            "uuid": "9A8C",
            "index": 1,
            "frame": { "x": 0.0, "y": 0.0, "w": 2560.0, "h": 1440.0 },
            "spaces": [1, 2, 3]
        });
        let props: DisplayProps = serde_json::from_value(doc).unwrap();
        assert_eq!(props.id, 2);
        assert_eq!(props.index, 1);
        assert_eq!(props.frame.w, 2560.0);
        assert_eq!(props.spaces, vec![1, 2, 3]);
    }
}
