//! Ordering reconciliation for the spaces of one display.
//!
//! The external system only offers relative positioning ("move this space
//! to that space's position"), never absolute index assignment, and a
//! single move is not guaranteed to leave the rest of the arrangement
//! untouched. The reconciler therefore never plans more than one move
//! ahead: it re-reads the live order after every move and repeats until the
//! order matches or progress stops.

use tracing::{debug, warn};

use crate::display::Display;
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::space::{all_spaces, SpaceProps};

/// What one sort pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortReport {
    /// Relative-move commands issued.
    pub moves: usize,
    /// Member-list re-queries issued after the initial read.
    pub requeries: usize,
}

/// Drive the spaces of `display` into ascending label order.
///
/// Spaces with empty labels sort after all labeled ones; their order among
/// themselves is whatever the live arrangement had, kept consistent for the
/// duration of the pass. Each iteration fixes the first position where the
/// live order diverges from the desired order by moving the space that
/// belongs there onto the current occupant, then re-reads the live order.
///
/// At most one move per member is needed when the external system behaves;
/// a pass where a move does not extend the agreeing prefix stops with
/// [`Error::Unreconcilable`], and the re-query budget of N² guards against
/// livelock with [`Error::ReconcileTimeout`].
pub fn sort(gw: &dyn Gateway, display: &Display) -> Result<SortReport> {
    let display_index = display.props(gw)?.index;

    let mut members = members_of(gw, display_index)?;
    let desired = desired_order(&members);
    let member_count = desired.len();
    let budget = member_count * member_count;

    let mut report = SortReport {
        moves: 0,
        requeries: 0,
    };
    let mut prefix = agreement(&members, &desired);

    loop {
        if prefix == member_count && members.len() == member_count {
            debug!(
                display = display_index,
                moves = report.moves,
                "space order reconciled"
            );
            return Ok(report);
        }

        // The live set changing size mid-pass means something else is
        // mutating spaces underneath us; one pass cannot converge on that.
        if prefix >= desired.len() || members.len() != member_count {
            warn!(display = display_index, "live space set changed during sort");
            return Err(Error::Unreconcilable {
                display: display_index,
            });
        }

        let subject_id = desired[prefix];
        let occupant = &members[prefix];
        let Some(subject) = members.iter().find(|m| m.id == subject_id) else {
            // Same count, different spaces: the set was swapped out under us.
            warn!(display = display_index, "live space set changed during sort");
            return Err(Error::Unreconcilable {
                display: display_index,
            });
        };

        debug!(
            display = display_index,
            label = %subject.label,
            from = subject.index,
            to = occupant.index,
            "moving space into place"
        );

        let subject_sel = subject.index.to_string();
        let occupant_sel = occupant.index.to_string();
        match gw.execute(&["space", &subject_sel, "--move", &occupant_sel]) {
            Ok(()) => {}
            Err(Error::Rejected(msg)) => {
                warn!(display = display_index, %msg, "move refused, giving up");
                return Err(Error::Unreconcilable {
                    display: display_index,
                });
            }
            Err(e) => return Err(e),
        }
        report.moves += 1;

        // Read back before deciding anything further; the move may have
        // reshuffled more than the one space.
        members = members_of(gw, display_index)?;
        report.requeries += 1;
        if report.requeries > budget {
            return Err(Error::ReconcileTimeout {
                display: display_index,
                requeries: report.requeries,
            });
        }

        let advanced = agreement(&members, &desired);
        if advanced <= prefix {
            warn!(
                display = display_index,
                "move issued but the order did not improve"
            );
            return Err(Error::Unreconcilable {
                display: display_index,
            });
        }
        prefix = advanced;
    }
}

/// Live members of a display, ascending by arrangement index.
fn members_of(gw: &dyn Gateway, display_index: u32) -> Result<Vec<SpaceProps>> {
    let mut members: Vec<_> = all_spaces(gw)?
        .into_iter()
        .filter(|p| p.display == display_index)
        .collect();
    members.sort_by_key(|p| p.index);
    Ok(members)
}

/// Desired id sequence: ascending by label, empty labels last.
///
/// The sort is stable, so spaces with equal (or empty) labels keep their
/// live relative order for this pass.
fn desired_order(members: &[SpaceProps]) -> Vec<u64> {
    let mut ordered: Vec<&SpaceProps> = members.iter().collect();
    ordered.sort_by(|a, b| {
        (a.label.is_empty(), a.label.as_str()).cmp(&(b.label.is_empty(), b.label.as_str()))
    });
    ordered.into_iter().map(|p| p.id).collect()
}

/// Length of the leading run where the live order already matches.
fn agreement(members: &[SpaceProps], desired: &[u64]) -> usize {
    members
        .iter()
        .zip(desired)
        .take_while(|(m, want)| m.id == **want)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: u64, index: u32, label: &str) -> SpaceProps {
        SpaceProps {
            id,
            uuid: format!("uuid-{id}"),
            index,
            label: label.to_string(),
            display: 1,
            windows: Vec::new(),
            has_focus: false,
            is_visible: false,
            is_native_fullscreen: false,
        }
    }

    #[test]
    fn test_desired_order_is_ascending_by_label() {
        let members = vec![
            member(1, 1, "3_terminal"),
            member(2, 2, "1_files"),
            member(3, 3, "2_www"),
        ];
        assert_eq!(desired_order(&members), vec![2, 3, 1]);
    }

    #[test]
    fn test_desired_order_puts_unlabeled_last() {
        let members = vec![
            member(1, 1, ""),
            member(2, 2, "2_www"),
            member(3, 3, ""),
            member(4, 4, "1_files"),
        ];
        // The two unlabeled spaces keep their live relative order.
        assert_eq!(desired_order(&members), vec![4, 2, 1, 3]);
    }

    #[test]
    fn test_agreement_counts_leading_matches_only() {
        let members = vec![
            member(1, 1, "1_files"),
            member(2, 2, "3_terminal"),
            member(3, 3, "2_www"),
        ];
        let desired = vec![1, 3, 2];
        assert_eq!(agreement(&members, &desired), 1);
        assert_eq!(agreement(&members, &[9, 3, 2]), 0);
        assert_eq!(agreement(&members, &[1, 2, 9]), 2);
    }
}
