//! yabactl core
//!
//! Stable-identity and reconciliation layer over the yabai control surface.
//!
//! yabai addresses windows, spaces and displays only through transient
//! selectors (label, index, `focused`, direction keywords). A selector can
//! go stale the instant its target moves, is relabeled or loses focus, and
//! the process assigns no ordering guarantees across mutations. This crate
//! papers over both problems:
//!
//! - [`Space`], [`Display`] and [`Window`] are handles bound to the durable
//!   numeric identifier, captured once at resolution time. They keep
//!   addressing the same entity through relabeling, moving and focus
//!   changes, and fail with `NotFound` once it is gone.
//! - [`sort`] drives the spaces of one display into ascending label order
//!   using only the relative-move commands the process offers, re-reading
//!   live state after every move.
//! - [`reconcile`] and [`ensure_spaces`] map a declared space layout
//!   (labels, icons, preferred displays) onto whatever is currently live.
//!
//! All communication goes through the [`Gateway`] trait; this crate holds no
//! cache and treats the external process as the single source of truth.

pub mod display;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod label;
pub mod resolver;
pub mod selector;
pub mod sort;
pub mod space;
pub mod window;

use serde::{Deserialize, Serialize};

pub use display::{all_displays, Display, DisplayProps};
pub use engine::{
    effective_display, ensure_spaces, reconcile, validate_defs, EnsureAction, EnsureOutcome,
    EnsureReport, ReconcileReport, SortOutcome, SpaceDef, SpaceOutcome, SpaceStatus,
};
pub use error::{Error, Result};
pub use gateway::Gateway;
pub use label::{check_label, validate_label_syntax, RESERVED_LABELS};
pub use resolver::resolve;
pub use selector::{Direction, EntityKind, Selector};
pub use sort::{sort, SortReport};
pub use space::{all_spaces, Space, SpaceProps};
pub use window::{all_windows, Window, WindowProps};

/// A rectangle in screen coordinates, as reported by the external system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}
