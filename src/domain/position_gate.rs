//! Single-slot long position gate.
//!
//! Turns entry/exit flag series into the actions a host would take with at
//! most one open long position. When both flags are set on a row, the
//! current state decides: flat enters, holding exits.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Enter { row: usize },
    Exit { row: usize },
}

pub fn resolve_actions(enter_long: &[bool], exit_long: &[bool]) -> Vec<Action> {
    let mut actions = Vec::new();
    let mut holding = false;

    for (row, (&enter, &exit)) in enter_long.iter().zip(exit_long).enumerate() {
        if !holding && enter {
            actions.push(Action::Enter { row });
            holding = true;
        } else if holding && exit {
            actions.push(Action::Exit { row });
            holding = false;
        }
    }

    actions
}
