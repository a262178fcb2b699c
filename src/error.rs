//! Error types for timed automaton construction and analysis.

use thiserror::Error;

/// Errors that can occur while building or analyzing a timed automaton.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TfaError {
    /// An interval's endpoints violate the ordering or finiteness rules of §4.1:
    /// `lo` must not exceed `hi`, neither endpoint may be `NaN`, and `+inf` is
    /// only a valid `hi` when the upper bound is open.
    #[error("invalid interval [{lo}, {hi}) (lo_closed={lo_closed}, hi_closed={hi_closed})")]
    InvalidInterval {
        lo: f64,
        hi: f64,
        lo_closed: bool,
        hi_closed: bool,
    },

    /// Simulation encountered a disabled `(state, event, clock)` triple.
    #[error("invalid trace at step {step}: no transition enabled from state {state:?} on event {event:?} at clock {clock}")]
    InvalidTrace {
        step: usize,
        state: String,
        event: String,
        clock: f64,
    },

    /// `X` or `X_0` was empty at construction time.
    #[error("automaton has no states or no initial states")]
    EmptyAutomaton,

    /// An initial state was not a member of the declared state set.
    #[error("initial state {0:?} is not a member of the declared state set")]
    UnknownInitialState(String),

    /// A transition referenced a state that was not declared.
    #[error("transition references undeclared state {0:?}")]
    UnknownState(String),
}
