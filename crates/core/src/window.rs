//! Windows: snapshots and stable handles.
//!
//! Windows are the easy case: the command language accepts the numeric id
//! directly, so no index re-derivation is needed.

use serde::{Deserialize, Serialize};

use crate::display::Display;
use crate::error::{Error, Result};
use crate::gateway::{decode, tolerate, Gateway};
use crate::resolver::resolve;
use crate::selector::{EntityKind, Selector};
use crate::space::Space;
use crate::Frame;

/// Properties of a window, captured by one query and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowProps {
    pub id: u64,
    pub pid: u32,
    pub app: String,
    pub title: String,
    pub frame: Frame,
    /// Arrangement index of the owning display.
    pub display: u32,
    /// Mission-control index of the owning space.
    pub space: u32,
    #[serde(rename = "has-focus")]
    pub has_focus: bool,
    #[serde(rename = "is-visible")]
    pub is_visible: bool,
    #[serde(rename = "is-minimized", default)]
    pub is_minimized: bool,
    #[serde(rename = "is-floating", default)]
    pub is_floating: bool,
}

/// Stable reference to one window, bound to its numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    id: u64,
}

impl Window {
    /// Resolve a selector once and capture the matched window's id.
    pub fn from_selector(gw: &dyn Gateway, selector: &Selector) -> Result<Self> {
        let props: WindowProps = decode(resolve(gw, EntityKind::Window, selector)?)?;
        Ok(Self { id: props.id })
    }

    /// Wrap an already-known id.
    pub fn from_id(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Query the current properties of the window.
    pub fn props(&self, gw: &dyn Gateway) -> Result<WindowProps> {
        let sel = self.id.to_string();
        match gw.query(&["query", "--windows", "--window", &sel]) {
            Ok(doc) => decode(doc),
            Err(Error::Rejected(_)) => Err(Error::NotFound {
                kind: EntityKind::Window,
                token: sel,
            }),
            Err(e) => Err(e),
        }
    }

    /// Focus the window. Focusing the already-focused window is a no-op.
    pub fn focus(&self, gw: &dyn Gateway) -> Result<()> {
        let sel = self.id.to_string();
        tolerate(
            gw.execute(&["window", "--focus", &sel]),
            "already focused window",
        )
    }

    /// Send the window to a space.
    pub fn send_to_space(&self, gw: &dyn Gateway, space: &Space) -> Result<()> {
        let sel = self.id.to_string();
        let target = space.props(gw)?.index.to_string();
        gw.execute(&["window", &sel, "--space", &target])
    }

    /// Send the window to a display.
    pub fn send_to_display(&self, gw: &dyn Gateway, display: &Display) -> Result<()> {
        let sel = self.id.to_string();
        let target = display.sel(gw)?;
        gw.execute(&["window", &sel, "--display", &target])
    }
}

/// Snapshot every window currently known to the window manager.
pub fn all_windows(gw: &dyn Gateway) -> Result<Vec<WindowProps>> {
    decode(gw.query(&["query", "--windows"])?)
}
