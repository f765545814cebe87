//! Transient entity addressing.
//!
//! The external system has no durable handle in its command language: every
//! command re-identifies its target through a selector that is only
//! guaranteed to match at the instant it is evaluated. Selectors here are
//! therefore consumed once, during resolution, and never stored.

use std::fmt;

use crate::error::{Error, Result};

/// The three entity families exposed by the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Window,
    Space,
    Display,
}

impl EntityKind {
    /// Domain flag used in list queries (`query --spaces`).
    pub(crate) fn query_flag(self) -> &'static str {
        match self {
            EntityKind::Window => "--windows",
            EntityKind::Space => "--spaces",
            EntityKind::Display => "--displays",
        }
    }

    /// Scoping flag selecting a single entity within the domain.
    pub(crate) fn scope_flag(self) -> &'static str {
        match self {
            EntityKind::Window => "--window",
            EntityKind::Space => "--space",
            EntityKind::Display => "--display",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Window => "window",
            EntityKind::Space => "space",
            EntityKind::Display => "display",
        };
        f.write_str(name)
    }
}

/// Cardinal direction selectors. Valid for displays only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    fn token(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

/// One-shot address for an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Durable numeric identifier assigned by the external system.
    Id(u64),
    /// Unique non-empty label. Only spaces carry labels.
    Label(String),
    /// Positional index (mission-control index for spaces, arrangement
    /// index for displays).
    Index(u32),
    /// The currently focused entity.
    Focused,
    Prev,
    Next,
    First,
    Last,
    Recent,
    Mouse,
    /// Directional neighbor. Displays only.
    Direction(Direction),
}

impl Selector {
    /// Parse a user-supplied selector string for the given kind.
    ///
    /// Digit-only strings are positional indexes (labels are forbidden from
    /// being digit-only for exactly this reason); recognized keywords map to
    /// their variants; anything else is a label, which only spaces accept.
    pub fn parse(kind: EntityKind, raw: &str) -> Result<Selector> {
        let trimmed = raw.trim();
        let selector = match trimmed {
            "" => {
                return Err(Error::InvalidConfig(
                    "selector cannot be empty (use 'focused' for the current entity)".to_string(),
                ))
            }
            "focused" => Selector::Focused,
            "prev" => Selector::Prev,
            "next" => Selector::Next,
            "first" => Selector::First,
            "last" => Selector::Last,
            "recent" => Selector::Recent,
            "mouse" => Selector::Mouse,
            "north" => Selector::Direction(Direction::North),
            "south" => Selector::Direction(Direction::South),
            "east" => Selector::Direction(Direction::East),
            "west" => Selector::Direction(Direction::West),
            other if other.chars().all(|c| c.is_ascii_digit()) => {
                let index = other.parse::<u32>().map_err(|_| {
                    Error::InvalidConfig(format!("index '{other}' is out of range"))
                })?;
                Selector::Index(index)
            }
            other => Selector::Label(other.to_string()),
        };
        selector.validate_for(kind)?;
        Ok(selector)
    }

    /// Check that this selector is syntactically valid for the kind.
    pub fn validate_for(&self, kind: EntityKind) -> Result<()> {
        match self {
            Selector::Label(label) if kind != EntityKind::Space => Err(Error::InvalidConfig(
                format!("label selector '{label}' is only valid for spaces, not {kind}s"),
            )),
            Selector::Direction(_) if kind != EntityKind::Display => Err(Error::InvalidConfig(
                format!("direction selector '{self}' is only valid for displays, not {kind}s"),
            )),
            _ => Ok(()),
        }
    }

    /// Token appended to a scoped query, if the selector carries one.
    ///
    /// `Focused` is the external system's implicit default and renders to
    /// nothing. `Id` and `Label` have no scoped-query form; the resolver
    /// handles them by listing and filtering.
    pub(crate) fn token(&self) -> Option<String> {
        match self {
            Selector::Id(_) | Selector::Label(_) | Selector::Focused => None,
            Selector::Index(index) => Some(index.to_string()),
            Selector::Prev => Some("prev".to_string()),
            Selector::Next => Some("next".to_string()),
            Selector::First => Some("first".to_string()),
            Selector::Last => Some("last".to_string()),
            Selector::Recent => Some("recent".to_string()),
            Selector::Mouse => Some("mouse".to_string()),
            Selector::Direction(d) => Some(d.token().to_string()),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Id(id) => write!(f, "id {id}"),
            Selector::Label(label) => f.write_str(label),
            Selector::Index(index) => write!(f, "{index}"),
            Selector::Focused => f.write_str("focused"),
            Selector::Prev => f.write_str("prev"),
            Selector::Next => f.write_str("next"),
            Selector::First => f.write_str("first"),
            Selector::Last => f.write_str("last"),
            Selector::Recent => f.write_str("recent"),
            Selector::Mouse => f.write_str("mouse"),
            Selector::Direction(d) => f.write_str(d.token()),
        }
    }
}
