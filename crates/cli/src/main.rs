//! yabactl CLI
//!
//! Command-line interface for declarative yabai space management.
//!
//! Commands talk to the yabai process directly; the heavy lifting (stable
//! handles, ordering, layout reconciliation) lives in `yabactl-core`.

mod config;
mod notify;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use yabactl_core::{
    all_displays, ensure_spaces, reconcile, Display, EntityKind, Gateway, ReconcileReport,
    Selector, Space, SpaceDef, SpaceStatus, Window,
};
use yabactl_yabai::YabaiGateway;

#[derive(Parser)]
#[command(name = "yabactl")]
#[command(author, version, about = "Declarative space management for yabai")]
struct Cli {
    /// Path to the space definition file (defaults to the standard
    /// config locations).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, delete, relabel and move spaces until they match the
    /// declared layout
    PrepareSpaces,
    /// Focus a space
    FocusSpace {
        /// Space selector: label, index, focused, prev, next, first, last,
        /// recent, mouse
        selector: String,
    },
    /// Move the focused window to a space, then focus that space
    WindowToSpace {
        /// Space selector
        selector: String,
    },
    /// Move the focused space to a display, restore label order there,
    /// then focus the display
    SpaceToDisplay {
        /// Display selector: index, focused, prev, next, first, last,
        /// north, south, east, west
        selector: String,
    },
    /// Move every space to its preferred display and restore label order
    SpacesToDisplays,
    /// Sort the spaces on the focused display by label
    SortDisplay,
    /// Sort the spaces on every display by label
    SortDisplays,
    /// Look up one property of a space from another of its properties
    SpaceProp {
        /// Property identifying the space (must be unique to it)
        input: SpaceProperty,
        /// Value of the identifying property
        value: String,
        /// Property to print
        output: SpaceProperty,
    },
}

/// Properties a space can be identified by or asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SpaceProperty {
    Label,
    Index,
    /// Any space selector (label, index, prev, next, ...)
    Selector,
    Display,
    Icon,
    Abbr,
    Key,
    Color,
    Name,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let gw = YabaiGateway::new();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::PrepareSpaces => prepare_spaces(&gw, config),
        Commands::FocusSpace { selector } => focus_space(&gw, config, &selector),
        Commands::WindowToSpace { selector } => window_to_space(&gw, config, &selector),
        Commands::SpaceToDisplay { selector } => space_to_display(&gw, config, &selector),
        Commands::SpacesToDisplays => spaces_to_displays(&gw, config),
        Commands::SortDisplay => sort_display(&gw),
        Commands::SortDisplays => sort_displays(&gw),
        Commands::SpaceProp {
            input,
            value,
            output,
        } => space_prop(&gw, config, input, &value, output),
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn prepare_spaces(gw: &dyn Gateway, config: Option<&Path>) -> Result<()> {
    let defs = config::load(config)?;
    let ensure = ensure_spaces(gw, &defs)?;
    for outcome in &ensure.outcomes {
        if let Err(e) = &outcome.result {
            warn!(label = %outcome.label, "{:?} failed: {e}", outcome.action);
        }
    }
    let report = reconcile(gw, &defs)?;
    notify::notify("Preparing spaces", None);
    check_report(&report)?;
    if !ensure.is_clean() {
        bail!("some spaces could not be created or recycled");
    }
    Ok(())
}

fn focus_space(gw: &dyn Gateway, config: Option<&Path>, selector: &str) -> Result<()> {
    let selector = Selector::parse(EntityKind::Space, selector)?;
    let space = Space::from_selector(gw, &selector)?;
    space.focus(gw)?;
    notify::notify(&space_name(gw, config, &space), Some("Focusing"));
    Ok(())
}

fn window_to_space(gw: &dyn Gateway, config: Option<&Path>, selector: &str) -> Result<()> {
    let window = Window::from_selector(gw, &Selector::Focused)?;
    let selector = Selector::parse(EntityKind::Space, selector)?;
    let space = Space::from_selector(gw, &selector)?;
    window.send_to_space(gw, &space)?;
    space.focus(gw)?;
    notify::notify(&space_name(gw, config, &space), Some("Moving window to"));
    notify::trigger_statusbar();
    Ok(())
}

fn space_to_display(gw: &dyn Gateway, config: Option<&Path>, selector: &str) -> Result<()> {
    let space = Space::from_selector(gw, &Selector::Focused)?;
    let selector = Selector::parse(EntityKind::Display, selector)?;
    let display = Display::from_selector(gw, &selector)?;

    // Displays cannot be left empty; refuse instead of letting the move
    // fail halfway through.
    let origin = space.props(gw)?.display;
    let siblings = yabactl_core::all_spaces(gw)?
        .iter()
        .filter(|p| p.display == origin)
        .count();
    if siblings <= 1 {
        bail!("cannot move this space; it is the last space on its display");
    }

    space.send_to_display(gw, &display)?;
    display.sort(gw)?;
    display.focus(gw)?;

    let target = display.props(gw)?.index;
    notify::notify(
        &format!("{} to display {target}", space_name(gw, config, &space)),
        Some("Moving space"),
    );
    Ok(())
}

fn spaces_to_displays(gw: &dyn Gateway, config: Option<&Path>) -> Result<()> {
    let defs = config::load(config)?;
    let report = reconcile(gw, &defs)?;
    notify::notify("All spaces to their preferred displays", Some("Moving spaces"));
    check_report(&report)
}

fn sort_display(gw: &dyn Gateway) -> Result<()> {
    let display = Display::from_selector(gw, &Selector::Focused)?;
    display.sort(gw)?;
    notify::notify("Current display", Some("Sorting spaces"));
    Ok(())
}

fn sort_displays(gw: &dyn Gateway) -> Result<()> {
    for props in all_displays(gw)? {
        Display::from_id(props.id)
            .sort(gw)
            .with_context(|| format!("sorting display {}", props.index))?;
    }
    notify::notify("All displays", Some("Sorting spaces"));
    Ok(())
}

fn space_prop(
    gw: &dyn Gateway,
    config: Option<&Path>,
    input: SpaceProperty,
    value: &str,
    output: SpaceProperty,
) -> Result<()> {
    let space = space_from_property(gw, config, input, value)?;
    println!("{}", property_of_space(gw, config, &space, output)?);
    Ok(())
}

/// Find the space identified by one of its properties.
fn space_from_property(
    gw: &dyn Gateway,
    config: Option<&Path>,
    prop: SpaceProperty,
    value: &str,
) -> Result<Space> {
    match prop {
        SpaceProperty::Label | SpaceProperty::Index | SpaceProperty::Selector => {
            let selector = Selector::parse(EntityKind::Space, value)?;
            Ok(Space::from_selector(gw, &selector)?)
        }
        SpaceProperty::Icon | SpaceProperty::Abbr | SpaceProperty::Key | SpaceProperty::Color => {
            let defs = config::load(config)?;
            let def = defs
                .iter()
                .find(|d| def_field(d, prop).is_some_and(|f| f == value))
                .with_context(|| format!("no space definition has {prop:?} equal to '{value}'"))?;
            Ok(Space::from_selector(
                gw,
                &Selector::Label(def.label.clone()),
            )?)
        }
        SpaceProperty::Display => {
            let selector = Selector::parse(EntityKind::Display, value)?;
            let display = Display::from_selector(gw, &selector)?;
            let mut spaces = display.spaces(gw)?;
            if spaces.len() != 1 {
                bail!("a display identifies a space only when it holds exactly one space");
            }
            Ok(spaces.remove(0))
        }
        SpaceProperty::Name => {
            bail!("a space cannot be identified by name; use label or a selector")
        }
    }
}

/// Read one property of a space.
fn property_of_space(
    gw: &dyn Gateway,
    config: Option<&Path>,
    space: &Space,
    prop: SpaceProperty,
) -> Result<String> {
    let props = space.props(gw)?;
    match prop {
        SpaceProperty::Label => Ok(props.label),
        SpaceProperty::Index => Ok(props.index.to_string()),
        SpaceProperty::Display => Ok(props.display.to_string()),
        SpaceProperty::Icon
        | SpaceProperty::Abbr
        | SpaceProperty::Key
        | SpaceProperty::Color
        | SpaceProperty::Name => {
            let defs = config::load(config)?;
            let def = defs.iter().find(|d| d.label == props.label);
            Ok(def
                .and_then(|d| def_field(d, prop))
                .unwrap_or_default())
        }
        SpaceProperty::Selector => {
            bail!("selector is an input property; ask for label or index instead")
        }
    }
}

/// Declared-property accessor shared by the two bridges above.
fn def_field(def: &SpaceDef, prop: SpaceProperty) -> Option<String> {
    match prop {
        SpaceProperty::Icon => Some(def.icon.clone()),
        SpaceProperty::Abbr => Some(def.abbr()),
        SpaceProperty::Key => def.key.clone(),
        SpaceProperty::Color => def.color.clone(),
        SpaceProperty::Name => def.name.clone(),
        _ => None,
    }
}

/// Presentation name for a space: its definition's full name when one
/// matches, the raw label or index otherwise.
fn space_name(gw: &dyn Gateway, config: Option<&Path>, space: &Space) -> String {
    let label = space
        .props(gw)
        .map(|p| if p.label.is_empty() {
            p.index.to_string()
        } else {
            p.label
        })
        .unwrap_or_default();
    config::load(config)
        .ok()
        .and_then(|defs| {
            defs.iter()
                .find(|d| d.label == label)
                .map(|d| d.full_name(false))
        })
        .unwrap_or(label)
}

/// Log every failure in a reconciliation report, then fail if any occurred.
fn check_report(report: &ReconcileReport) -> Result<()> {
    for (space_id, label, result) in &report.assignments {
        if let Err(e) = result {
            warn!(space = space_id, %label, "labeling failed: {e}");
        }
    }
    for outcome in &report.spaces {
        if let SpaceStatus::Failed(e) = &outcome.status {
            warn!(
                label = %outcome.label,
                display = outcome.target_display,
                "placement failed: {e}"
            );
        }
    }
    for sort in &report.sorts {
        if let Err(e) = &sort.result {
            warn!(display = sort.display, "sort failed: {e}");
        }
    }
    if !report.is_clean() {
        bail!("some spaces could not be reconciled; see the log for details");
    }
    Ok(())
}
