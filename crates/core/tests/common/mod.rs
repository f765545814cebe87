#![allow(dead_code)]

//! In-memory stand-in for the external window manager process.
//!
//! Implements just enough of the query/command surface for the tests:
//! space/display/window queries (plain and scoped), focus, relabel,
//! relative move, display transfer, create and destroy. Mission-control
//! indexes renumber on every mutation the way the real process renumbers
//! them, and every mutation is recorded so tests can count commands.

use std::cell::RefCell;

use serde_json::{json, Value};
use yabactl_core::{Error, Gateway, Result};

#[derive(Debug, Clone)]
struct FakeSpace {
    id: u64,
    label: String,
    display: u32,
    focused: bool,
}

#[derive(Debug, Clone)]
struct FakeWindow {
    id: u64,
    app: String,
    title: String,
    space_id: u64,
    focused: bool,
}

#[derive(Default)]
struct State {
    /// Mission-control order: display 1's spaces first, then display 2's,
    /// and so on. A space's index is its position here plus one.
    spaces: Vec<FakeSpace>,
    windows: Vec<FakeWindow>,
    displays: u32,
    next_space_id: u64,
    next_window_id: u64,
    mutations: Vec<String>,
    reject_relative_moves: Vec<String>,
    reject_display_transfers: Vec<String>,
}

pub struct FakeYabai {
    state: RefCell<State>,
}

impl FakeYabai {
    pub fn new(displays: u32) -> Self {
        Self {
            state: RefCell::new(State {
                displays,
                next_space_id: 1,
                next_window_id: 100,
                ..State::default()
            }),
        }
    }

    /// Append a space to a display's block. The first space added is focused.
    pub fn add_space(&self, display: u32, label: &str) -> u64 {
        let mut state = self.state.borrow_mut();
        let id = state.next_space_id;
        state.next_space_id += 1;
        let focused = state.spaces.is_empty();
        let at = insertion_point(&state.spaces, display);
        state.spaces.insert(
            at,
            FakeSpace {
                id,
                label: label.to_string(),
                display,
                focused,
            },
        );
        id
    }

    pub fn add_window(&self, app: &str, title: &str, space_id: u64) -> u64 {
        let mut state = self.state.borrow_mut();
        let id = state.next_window_id;
        state.next_window_id += 1;
        let focused = state.windows.is_empty();
        state.windows.push(FakeWindow {
            id,
            app: app.to_string(),
            title: title.to_string(),
            space_id,
            focused,
        });
        id
    }

    // --- test backdoors, bypassing the command surface

    pub fn focus_space_directly(&self, id: u64) {
        let mut state = self.state.borrow_mut();
        for sp in &mut state.spaces {
            sp.focused = sp.id == id;
        }
    }

    pub fn focus_window_directly(&self, id: u64) {
        let mut state = self.state.borrow_mut();
        for wi in &mut state.windows {
            wi.focused = wi.id == id;
        }
    }

    pub fn relabel_directly(&self, id: u64, label: &str) {
        let mut state = self.state.borrow_mut();
        if let Some(sp) = state.spaces.iter_mut().find(|s| s.id == id) {
            sp.label = label.to_string();
        }
    }

    /// Refuse relative-move commands whose acting space carries `label`.
    pub fn reject_relative_moves_for(&self, label: &str) {
        self.state
            .borrow_mut()
            .reject_relative_moves
            .push(label.to_string());
    }

    /// Refuse display transfers whose acting space carries `label`.
    pub fn reject_display_transfers_for(&self, label: &str) {
        self.state
            .borrow_mut()
            .reject_display_transfers
            .push(label.to_string());
    }

    // --- inspection

    pub fn labels_in_order(&self, display: u32) -> Vec<String> {
        self.state
            .borrow()
            .spaces
            .iter()
            .filter(|s| s.display == display)
            .map(|s| s.label.clone())
            .collect()
    }

    pub fn space_label(&self, id: u64) -> Option<String> {
        self.state
            .borrow()
            .spaces
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.label.clone())
    }

    pub fn space_display(&self, id: u64) -> Option<u32> {
        self.state
            .borrow()
            .spaces
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.display)
    }

    pub fn space_count(&self) -> usize {
        self.state.borrow().spaces.len()
    }

    pub fn mutations(&self) -> Vec<String> {
        self.state.borrow().mutations.clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.state.borrow().mutations.len()
    }

    pub fn clear_mutations(&self) {
        self.state.borrow_mut().mutations.clear();
    }
}

/// Position right after the last space of `display`, keeping blocks in
/// display order.
fn insertion_point(spaces: &[FakeSpace], display: u32) -> usize {
    let mut at = 0;
    for (i, sp) in spaces.iter().enumerate() {
        if sp.display <= display {
            at = i + 1;
        }
    }
    at
}

fn space_record(state: &State, pos: usize) -> Value {
    let sp = &state.spaces[pos];
    let windows: Vec<u64> = state
        .windows
        .iter()
        .filter(|w| w.space_id == sp.id)
        .map(|w| w.id)
        .collect();
    json!({
        "id": sp.id,
        "uuid": format!("F-{}", sp.id),
        "index": pos + 1,
        "label": sp.label,
        "type": "bsp",
        "display": sp.display,
        "windows": windows,
        "has-focus": sp.focused,
        "is-visible": sp.focused,
        "is-native-fullscreen": false
    })
}

fn display_record(state: &State, display: u32) -> Value {
    let members: Vec<usize> = state
        .spaces
        .iter()
        .enumerate()
        .filter(|(_, s)| s.display == display)
        .map(|(i, _)| i + 1)
        .collect();
    json!({
        "id": 1000 + display as u64,
        "uuid": format!("D-{display}"),
        "index": display,
        "frame": {
            "x": f64::from(display - 1) * 2560.0,
            "y": 0.0,
            "w": 2560.0,
            "h": 1440.0
        },
        "spaces": members
    })
}

fn window_record(state: &State, wi: &FakeWindow) -> Value {
    let (space_index, display) = state
        .spaces
        .iter()
        .enumerate()
        .find(|(_, s)| s.id == wi.space_id)
        .map(|(i, s)| (i + 1, s.display))
        .unwrap_or((0, 0));
    json!({
        "id": wi.id,
        "pid": 4000 + wi.id,
        "app": wi.app,
        "title": wi.title,
        "frame": { "x": 0.0, "y": 0.0, "w": 800.0, "h": 600.0 },
        "display": display,
        "space": space_index,
        "has-focus": wi.focused,
        "is-visible": wi.focused,
        "is-minimized": false,
        "is-floating": false
    })
}

fn rejected(msg: &str) -> Error {
    Error::Rejected(msg.to_string())
}

/// Resolve a space selector token to a position in the space list.
fn space_pos(state: &State, token: Option<&str>) -> Result<usize> {
    let focused = || state.spaces.iter().position(|s| s.focused);
    let pos = match token {
        None => focused(),
        Some("first") => (!state.spaces.is_empty()).then_some(0),
        Some("last") => state.spaces.len().checked_sub(1),
        Some("prev") => focused().and_then(|p| p.checked_sub(1)),
        Some("next") => focused().map(|p| p + 1).filter(|p| *p < state.spaces.len()),
        Some(tok) => tok
            .parse::<usize>()
            .ok()
            .and_then(|i| i.checked_sub(1))
            .filter(|p| *p < state.spaces.len()),
    };
    pos.ok_or_else(|| rejected("could not locate the selected space."))
}

/// Resolve a display selector token to an arrangement index.
fn display_number(state: &State, token: Option<&str>) -> Result<u32> {
    let number = match token {
        None => state
            .spaces
            .iter()
            .find(|s| s.focused)
            .map(|s| s.display)
            .or((state.displays > 0).then_some(1)),
        Some(tok) => tok
            .parse::<u32>()
            .ok()
            .filter(|d| *d >= 1 && *d <= state.displays),
    };
    number.ok_or_else(|| rejected("could not locate the selected display."))
}

impl Gateway for FakeYabai {
    fn query(&self, args: &[&str]) -> Result<Value> {
        let state = self.state.borrow();
        match args {
            ["query", "--spaces"] => Ok(Value::Array(
                (0..state.spaces.len())
                    .map(|pos| space_record(&state, pos))
                    .collect(),
            )),
            ["query", "--spaces", "--space", rest @ ..] => {
                let pos = space_pos(&state, rest.first().copied())?;
                Ok(space_record(&state, pos))
            }
            ["query", "--displays"] => Ok(Value::Array(
                (1..=state.displays)
                    .map(|d| display_record(&state, d))
                    .collect(),
            )),
            ["query", "--displays", "--display", rest @ ..] => {
                let number = display_number(&state, rest.first().copied())?;
                Ok(display_record(&state, number))
            }
            ["query", "--windows"] => Ok(Value::Array(
                state
                    .windows
                    .iter()
                    .map(|w| window_record(&state, w))
                    .collect(),
            )),
            ["query", "--windows", "--window", rest @ ..] => {
                let wi = match rest.first() {
                    None => state.windows.iter().find(|w| w.focused),
                    Some(tok) => tok
                        .parse::<u64>()
                        .ok()
                        .and_then(|id| state.windows.iter().find(|w| w.id == id)),
                };
                wi.map(|w| window_record(&state, w))
                    .ok_or_else(|| rejected("could not locate the selected window."))
            }
            _ => Err(Error::Transport(format!(
                "unhandled query: {}",
                args.join(" ")
            ))),
        }
    }

    fn execute(&self, args: &[&str]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.mutations.push(args.join(" "));
        match args {
            ["space", "--focus", sel] => {
                let pos = space_pos(&state, Some(*sel))?;
                if state.spaces[pos].focused {
                    return Err(rejected("cannot focus an already focused space."));
                }
                let id = state.spaces[pos].id;
                for sp in &mut state.spaces {
                    sp.focused = sp.id == id;
                }
                Ok(())
            }
            ["space", "--create", sel] => {
                let pos = space_pos(&state, Some(*sel))?;
                let display = state.spaces[pos].display;
                let id = state.next_space_id;
                state.next_space_id += 1;
                let at = insertion_point(&state.spaces, display);
                state.spaces.insert(
                    at,
                    FakeSpace {
                        id,
                        label: String::new(),
                        display,
                        focused: false,
                    },
                );
                Ok(())
            }
            ["space", "--destroy", sel] => {
                let pos = space_pos(&state, Some(*sel))?;
                state.spaces.remove(pos);
                Ok(())
            }
            ["space", sel, "--label", label] => {
                let pos = space_pos(&state, Some(*sel))?;
                state.spaces[pos].label = label.to_string();
                Ok(())
            }
            ["space", sel, "--move", target] => {
                let a = space_pos(&state, Some(*sel))?;
                let b = space_pos(&state, Some(*target))?;
                if a == b {
                    return Err(rejected("cannot move space to itself."));
                }
                if state.spaces[a].display != state.spaces[b].display {
                    return Err(rejected(
                        "acting space and selected space must belong to the same display.",
                    ));
                }
                let label = state.spaces[a].label.clone();
                if state.reject_relative_moves.contains(&label) {
                    return Err(rejected("could not move the selected space."));
                }
                // The moved space takes the target's slot; everything in
                // between shifts by one.
                let moved = state.spaces.remove(a);
                state.spaces.insert(b, moved);
                Ok(())
            }
            ["space", sel, "--swap", target] => {
                let a = space_pos(&state, Some(*sel))?;
                let b = space_pos(&state, Some(*target))?;
                if a == b {
                    return Err(rejected("cannot swap space with itself."));
                }
                state.spaces.swap(a, b);
                Ok(())
            }
            ["space", sel, "--display", dsel] => {
                let pos = space_pos(&state, Some(*sel))?;
                let display = display_number(&state, Some(*dsel))?;
                if state.spaces[pos].display == display {
                    return Err(rejected(
                        "acting space is already located on the given display.",
                    ));
                }
                let label = state.spaces[pos].label.clone();
                if state.reject_display_transfers.contains(&label) {
                    return Err(rejected("could not send space to display."));
                }
                let mut moved = state.spaces.remove(pos);
                moved.display = display;
                let at = insertion_point(&state.spaces, display);
                state.spaces.insert(at, moved);
                Ok(())
            }
            ["display", "--focus", sel] => {
                let display = display_number(&state, Some(*sel))?;
                let target = state
                    .spaces
                    .iter()
                    .find(|s| s.display == display)
                    .map(|s| s.id);
                if let Some(id) = target {
                    for sp in &mut state.spaces {
                        sp.focused = sp.id == id;
                    }
                }
                Ok(())
            }
            ["window", "--focus", sel] => {
                let id = sel
                    .parse::<u64>()
                    .map_err(|_| rejected("could not locate the selected window."))?;
                if !state.windows.iter().any(|w| w.id == id) {
                    return Err(rejected("could not locate the selected window."));
                }
                for wi in &mut state.windows {
                    wi.focused = wi.id == id;
                }
                Ok(())
            }
            ["window", sel, "--space", target] => {
                let id = sel
                    .parse::<u64>()
                    .map_err(|_| rejected("could not locate the selected window."))?;
                let pos = space_pos(&state, Some(*target))?;
                let space_id = state.spaces[pos].id;
                let wi = state
                    .windows
                    .iter_mut()
                    .find(|w| w.id == id)
                    .ok_or_else(|| rejected("could not locate the selected window."))?;
                wi.space_id = space_id;
                Ok(())
            }
            ["window", sel, "--display", dsel] => {
                let id = sel
                    .parse::<u64>()
                    .map_err(|_| rejected("could not locate the selected window."))?;
                let display = display_number(&state, Some(*dsel))?;
                let space_id = state
                    .spaces
                    .iter()
                    .find(|s| s.display == display)
                    .map(|s| s.id)
                    .ok_or_else(|| rejected("display has no spaces."))?;
                let wi = state
                    .windows
                    .iter_mut()
                    .find(|w| w.id == id)
                    .ok_or_else(|| rejected("could not locate the selected window."))?;
                wi.space_id = space_id;
                Ok(())
            }
            _ => Err(Error::Transport(format!(
                "unhandled command: {}",
                args.join(" ")
            ))),
        }
    }
}
