//! Declared-layout reconciliation.
//!
//! A declared layout is an ordered list of [`SpaceDef`] records. The engine
//! drives the live set of spaces toward it: unlabeled spaces pick up unused
//! labels, labeled spaces migrate to their preferred displays, and every
//! display is sorted afterwards. Failures on one space never abort work on
//! its siblings; callers get the full picture back in a report.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::display::{all_displays, Display, DisplayProps};
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::label::validate_label_syntax;
use crate::selector::EntityKind;
use crate::sort::{sort, SortReport};
use crate::space::{all_spaces, Space};

/// One declared space: its label, how it is presented, and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceDef {
    /// Unique, non-empty label; doubles as the sort key for display order.
    pub label: String,
    /// Icon shown in notifications and status bars.
    pub icon: String,
    /// Preferred display, as a 1-based arrangement index.
    pub display: u32,
    /// Shortcut key, when one is bound.
    pub key: Option<String>,
    /// Human-readable name.
    pub name: Option<String>,
    /// Accent color as "#rrggbb".
    pub color: Option<String>,
}

impl SpaceDef {
    /// Presentation string, e.g. `1: \u{1F4C1} files`.
    pub fn full_name(&self, include_icon: bool) -> String {
        let key = self.key.as_deref().unwrap_or("");
        let name = self.name.as_deref().unwrap_or(&self.label);
        if include_icon && !self.icon.is_empty() {
            format!("{key}: {} {name}", self.icon)
        } else {
            format!("{key}: {name}")
        }
    }

    /// Compact presentation: shortcut key plus icon.
    pub fn abbr(&self) -> String {
        format!("{}{}", self.key.as_deref().unwrap_or(""), self.icon)
    }
}

/// Validate a declared sequence: labels unique (case-insensitively) and
/// syntactically admissible, preferred displays at least 1.
pub fn validate_defs(defs: &[SpaceDef]) -> Result<()> {
    let mut seen = HashSet::new();
    for def in defs {
        validate_label_syntax(&def.label)
            .map_err(|e| Error::InvalidConfig(format!("space '{}': {e}", def.label)))?;
        if !seen.insert(def.label.trim().to_lowercase()) {
            return Err(Error::InvalidConfig(format!(
                "label '{}' is declared more than once",
                def.label
            )));
        }
        if def.display == 0 {
            return Err(Error::InvalidConfig(format!(
                "space '{}': displays are numbered from 1",
                def.label
            )));
        }
    }
    Ok(())
}

/// Display a def lands on given how many displays are connected.
///
/// A preferred display beyond the connected count overflows onto the last
/// connected display.
pub fn effective_display(def: &SpaceDef, connected: u32) -> u32 {
    def.display.min(connected.max(1))
}

/// Placement outcome for one declared space.
#[derive(Debug)]
pub enum SpaceStatus {
    /// Already on its target display.
    InPlace,
    /// Moved to its target display.
    Moved,
    /// No live space carries this label.
    Missing,
    /// The mutation failed; the pass continued with the siblings.
    Failed(Error),
}

/// Per-def record in a reconciliation report.
#[derive(Debug)]
pub struct SpaceOutcome {
    pub label: String,
    pub space_id: Option<u64>,
    /// Effective target after the overflow clamp.
    pub target_display: u32,
    pub status: SpaceStatus,
}

/// Per-display sort record in a reconciliation report.
#[derive(Debug)]
pub struct SortOutcome {
    pub display: u32,
    pub result: Result<SortReport>,
}

/// Everything one reconciliation pass did.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Labels handed to previously unlabeled spaces, in assignment order.
    pub assignments: Vec<(u64, String, Result<()>)>,
    pub spaces: Vec<SpaceOutcome>,
    pub sorts: Vec<SortOutcome>,
}

impl ReconcileReport {
    /// True when nothing in the pass failed.
    pub fn is_clean(&self) -> bool {
        self.assignments.iter().all(|(_, _, r)| r.is_ok())
            && self
                .spaces
                .iter()
                .all(|o| !matches!(o.status, SpaceStatus::Failed(_)))
            && self.sorts.iter().all(|o| o.result.is_ok())
    }
}

/// Reconcile the live spaces against the declared layout.
///
/// Steps, in order: validate the defs; hand unused labels to unlabeled
/// spaces; move each labeled space to its (overflow-clamped) preferred
/// display; sort every display. Per-space failures are recorded and skipped
/// over, so one stubborn space cannot block the rest of the pass.
pub fn reconcile(gw: &dyn Gateway, defs: &[SpaceDef]) -> Result<ReconcileReport> {
    validate_defs(defs)?;

    let displays = all_displays(gw)?;
    let connected = displays.len() as u32;
    let mut report = ReconcileReport::default();

    assign_labels(gw, defs, &mut report)?;

    // Fresh read: the assignment step may have changed labels.
    let live = all_spaces(gw)?;
    for def in defs {
        let target = effective_display(def, connected);
        let Some(props) = live.iter().find(|p| p.label == def.label) else {
            debug!(label = %def.label, "no live space carries this label");
            report.spaces.push(SpaceOutcome {
                label: def.label.clone(),
                space_id: None,
                target_display: target,
                status: SpaceStatus::Missing,
            });
            continue;
        };

        let status = if props.display == target {
            debug!(label = %def.label, display = target, "already on its display");
            SpaceStatus::InPlace
        } else {
            match display_at(&displays, target) {
                Some(display) => match Space::from_id(props.id).send_to_display(gw, &display) {
                    Ok(()) => {
                        info!(label = %def.label, display = target, "space sent to display");
                        SpaceStatus::Moved
                    }
                    Err(e) => SpaceStatus::Failed(e),
                },
                None => SpaceStatus::Failed(Error::NotFound {
                    kind: EntityKind::Display,
                    token: target.to_string(),
                }),
            }
        };
        report.spaces.push(SpaceOutcome {
            label: def.label.clone(),
            space_id: Some(props.id),
            target_display: target,
            status,
        });
    }

    for display in &displays {
        let result = sort(gw, &Display::from_id(display.id));
        report.sorts.push(SortOutcome {
            display: display.index,
            result,
        });
    }

    Ok(report)
}

/// Hand unused labels to unlabeled spaces, in declared order.
///
/// Labels are consumed in the declared sequence while unlabeled spaces are
/// visited in live enumeration order. When the live order differs from the
/// declared order (typically after the external process restarted and
/// dropped every label), the pairing comes out shifted. That reassignment
/// order is kept as is: the previous labels are unrecoverable, so there is
/// nothing better to pair by.
fn assign_labels(gw: &dyn Gateway, defs: &[SpaceDef], report: &mut ReconcileReport) -> Result<()> {
    let live = all_spaces(gw)?;
    let used: HashSet<String> = live
        .iter()
        .filter(|p| !p.label.is_empty())
        .map(|p| p.label.clone())
        .collect();
    let mut unused = defs.iter().filter(|d| !used.contains(&d.label));

    for props in live.iter().filter(|p| p.label.is_empty()) {
        let Some(def) = unused.next() else { break };
        info!(space = props.id, label = %def.label, "labeling space");
        let result = Space::from_id(props.id).set_label(gw, &def.label);
        report
            .assignments
            .push((props.id, def.label.clone(), result));
    }
    Ok(())
}

/// Find the connected display with the given arrangement index.
fn display_at(displays: &[DisplayProps], index: u32) -> Option<Display> {
    displays
        .iter()
        .find(|p| p.index == index)
        .map(|p| Display::from_id(p.id))
}

/// What `ensure_spaces` decided to do with one space or def.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureAction {
    /// An unwanted space was given a wanted label.
    Relabel,
    /// An unwanted space had no wanted label left and was destroyed.
    Destroy,
    /// A wanted label had no space left and one was created.
    Create,
}

/// One step in an `ensure_spaces` pass.
#[derive(Debug)]
pub struct EnsureOutcome {
    pub action: EnsureAction,
    /// The wanted label involved, or the discarded label for destroys.
    pub label: String,
    pub space_id: Option<u64>,
    pub result: Result<()>,
}

/// Everything one `ensure_spaces` pass did.
#[derive(Debug, Default)]
pub struct EnsureReport {
    pub outcomes: Vec<EnsureOutcome>,
}

impl EnsureReport {
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Make the set of live spaces match the declared set of labels.
///
/// Spaces whose label matches no def are recycled: as long as some declared
/// label has no space, the next recyclable space is relabeled to it. Spaces
/// left over after that are destroyed; labels left over get a fresh space
/// created on the first display. Placement and ordering are not touched
/// here; run [`reconcile`] afterwards for that.
pub fn ensure_spaces(gw: &dyn Gateway, defs: &[SpaceDef]) -> Result<EnsureReport> {
    validate_defs(defs)?;

    let live = all_spaces(gw)?;
    let wanted: HashSet<&str> = defs.iter().map(|d| d.label.as_str()).collect();
    let found: HashSet<&str> = live
        .iter()
        .map(|p| p.label.as_str())
        .filter(|l| wanted.contains(l))
        .collect();

    let mut excess: Vec<_> = live
        .iter()
        .filter(|p| !found.contains(p.label.as_str()))
        .collect();
    let mut missing: Vec<&SpaceDef> = defs
        .iter()
        .filter(|d| !found.contains(d.label.as_str()))
        .collect();

    debug!(
        excess = excess.len(),
        missing = missing.len(),
        "live spaces versus declared labels"
    );

    let mut report = EnsureReport::default();

    // Recycle before destroying or creating; relabeling is the only one of
    // the three that preserves the windows already on the space.
    while !excess.is_empty() && !missing.is_empty() {
        let (Some(props), Some(def)) = (excess.pop(), missing.pop()) else {
            break;
        };
        info!(space = props.id, label = %def.label, "relabeling space");
        let result = Space::from_id(props.id).set_label(gw, &def.label);
        report.outcomes.push(EnsureOutcome {
            action: EnsureAction::Relabel,
            label: def.label.clone(),
            space_id: Some(props.id),
            result,
        });
    }

    for props in excess {
        info!(space = props.id, label = %props.label, "destroying excess space");
        let result = Space::from_id(props.id).destroy(gw);
        report.outcomes.push(EnsureOutcome {
            action: EnsureAction::Destroy,
            label: props.label.clone(),
            space_id: Some(props.id),
            result,
        });
    }

    if !missing.is_empty() {
        // New spaces go to the first display; reconcile moves them later.
        let first = display_at(&all_displays(gw)?, 1);
        for def in missing {
            info!(label = %def.label, "creating missing space");
            let result = match &first {
                Some(display) => display
                    .create_space(gw)
                    .and_then(|space| space.set_label(gw, &def.label)),
                None => Err(Error::NotFound {
                    kind: EntityKind::Display,
                    token: "1".to_string(),
                }),
            };
            report.outcomes.push(EnsureOutcome {
                action: EnsureAction::Create,
                label: def.label.clone(),
                space_id: None,
                result,
            });
        }
    }

    Ok(report)
}
