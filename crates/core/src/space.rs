//! Spaces: snapshots and stable handles.
//!
//! Keeping track of a space is the hard case. Its label changes when it is
//! relabeled, its mission-control index changes when it (or a sibling) is
//! moved, and `focused` stops matching the moment focus moves on. Only the
//! numeric id survives all of that, but the command language cannot address
//! a space by id, so every operation first re-derives the currently-correct
//! index from a fresh query.

use serde::{Deserialize, Serialize};

use crate::display::Display;
use crate::error::{Error, Result};
use crate::gateway::{decode, tolerate, Gateway};
use crate::label::check_label;
use crate::resolver::resolve;
use crate::selector::{EntityKind, Selector};

/// Properties of a space, captured by one query and never updated.
///
/// Field names mirror the external system's documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceProps {
    pub id: u64,
    pub uuid: String,
    /// Mission-control index, 1-based across all displays.
    pub index: u32,
    pub label: String,
    /// Arrangement index of the owning display.
    pub display: u32,
    #[serde(default)]
    pub windows: Vec<u64>,
    #[serde(rename = "has-focus")]
    pub has_focus: bool,
    #[serde(rename = "is-visible")]
    pub is_visible: bool,
    #[serde(rename = "is-native-fullscreen", default)]
    pub is_native_fullscreen: bool,
}

/// Stable reference to one space.
///
/// Owns the durable numeric id captured at construction, never the selector
/// it was resolved from. Relabeling, moving or refocusing the space does not
/// invalidate the handle; only destruction does, after which every operation
/// returns `NotFound`. The handle is deliberately not re-resolvable: if the
/// original selector now matches a different space, this handle still
/// addresses the one it was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Space {
    id: u64,
}

impl Space {
    /// Resolve a selector once and capture the matched space's id.
    pub fn from_selector(gw: &dyn Gateway, selector: &Selector) -> Result<Self> {
        let props: SpaceProps = decode(resolve(gw, EntityKind::Space, selector)?)?;
        Ok(Self { id: props.id })
    }

    /// Wrap an already-known id.
    pub fn from_id(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Query the current properties of the space.
    pub fn props(&self, gw: &dyn Gateway) -> Result<SpaceProps> {
        all_spaces(gw)?
            .into_iter()
            .find(|p| p.id == self.id)
            .ok_or(Error::NotFound {
                kind: EntityKind::Space,
                token: self.id.to_string(),
            })
    }

    /// Currently-correct external selector token for this space.
    fn sel(&self, gw: &dyn Gateway) -> Result<String> {
        Ok(self.props(gw)?.index.to_string())
    }

    /// Focus the space. Focusing the already-focused space is a no-op.
    pub fn focus(&self, gw: &dyn Gateway) -> Result<()> {
        let sel = self.sel(gw)?;
        tolerate(
            gw.execute(&["space", "--focus", &sel]),
            "already focused space",
        )
    }

    /// Relabel the space.
    ///
    /// The candidate is checked against the label admission rules first;
    /// on violation nothing is sent. The space's own current label is
    /// exempt from the collision check.
    pub fn set_label(&self, gw: &dyn Gateway, label: &str) -> Result<()> {
        check_label(gw, label, Some(self.id))?;
        let sel = self.sel(gw)?;
        gw.execute(&["space", &sel, "--label", label])
    }

    /// Move the space to the position of `other` (same display only).
    pub fn move_to(&self, gw: &dyn Gateway, other: &Space) -> Result<()> {
        let sel = self.sel(gw)?;
        let target = other.sel(gw)?;
        tolerate(
            gw.execute(&["space", &sel, "--move", &target]),
            "cannot move space to itself",
        )
    }

    /// Swap the space with `other` (same display only).
    pub fn swap_with(&self, gw: &dyn Gateway, other: &Space) -> Result<()> {
        let sel = self.sel(gw)?;
        let target = other.sel(gw)?;
        tolerate(
            gw.execute(&["space", &sel, "--swap", &target]),
            "cannot swap space with itself",
        )
    }

    /// Send the space to another display. Already being there is a no-op.
    pub fn send_to_display(&self, gw: &dyn Gateway, display: &Display) -> Result<()> {
        let sel = self.sel(gw)?;
        let target = display.sel(gw)?;
        tolerate(
            gw.execute(&["space", &sel, "--display", &target]),
            "already located on the given display",
        )
    }

    /// Destroy the space. The id never comes back; any later operation
    /// through this handle returns `NotFound`.
    pub fn destroy(self, gw: &dyn Gateway) -> Result<()> {
        let sel = self.sel(gw)?;
        gw.execute(&["space", "--destroy", &sel])
    }
}

/// Snapshot every space currently known to the window manager.
pub fn all_spaces(gw: &dyn Gateway) -> Result<Vec<SpaceProps>> {
    decode(gw.query(&["query", "--spaces"])?)
}
