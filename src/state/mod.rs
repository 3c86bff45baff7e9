//! Client-side view state machine.
//!
//! ```text
//! Idle --submit--> Generating --ok--> ResultsReady <--back-- PlanShown
//!   ^                  |                   |  ^                 ^  |
//!   +------failure-----+                   |  +--regenerate     |  +--edit / rerun
//!                                          +--inspect plan------+
//! ```
//!
//! Every asynchronous action is split into a `begin_*` call that returns a
//! [`Ticket`] and a [`AppState::complete`] call that applies the response.
//! Failures land in a per-action error slot and never touch loaded data.

mod machine;
mod session;

pub use machine::{AppState, Outcome, Ticket};
pub use session::Session;

use std::fmt;

/// Which top-level screen is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Idle,
    Generating,
    ResultsReady,
    PlanShown,
}

/// An asynchronous user action. Each one owns an independent error slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    RefreshTables,
    Generate,
    Regenerate,
    RunQuery,
    InspectPlan,
    Rerun,
    PlotConfig,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::RefreshTables,
        Action::Generate,
        Action::Regenerate,
        Action::RunQuery,
        Action::InspectPlan,
        Action::Rerun,
        Action::PlotConfig,
    ];

    /// Whether the action can be started from `view`.
    pub fn allowed_in(&self, view: View) -> bool {
        match self {
            Action::RefreshTables => true,
            Action::Generate => view == View::Idle,
            Action::Regenerate | Action::RunQuery | Action::InspectPlan | Action::PlotConfig => {
                view == View::ResultsReady
            }
            Action::Rerun => view == View::PlanShown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::RefreshTables => "refresh-tables",
            Action::Generate => "generate",
            Action::Regenerate => "regenerate",
            Action::RunQuery => "run-query",
            Action::InspectPlan => "inspect-plan",
            Action::Rerun => "rerun",
            Action::PlotConfig => "plot-config",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
