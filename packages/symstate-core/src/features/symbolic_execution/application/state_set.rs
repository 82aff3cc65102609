//! Visited-State Set
//!
//! Collects the program states already explored at a program point,
//! keyed by the structural, identifier-insensitive equivalence of
//! [`ProgramState`]. A driver iterating a loop reaches its fixpoint when
//! every incoming state is rejected as already explored: no new facts
//! are being learned.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::features::symbolic_execution::domain::ProgramState;

/// Set of explored program states at one program point
#[derive(Debug, Clone, Default)]
pub struct StateSet {
    states: FxHashSet<ProgramState>,
}

impl StateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `state` as explored
    ///
    /// Returns `false` when an equivalent state was already present; the
    /// caller should not re-explore from it.
    pub fn insert(&mut self, state: ProgramState) -> bool {
        let added = self.states.insert(state);
        if !added {
            debug!("equivalent state already explored");
        }
        added
    }

    /// True iff an equivalent state was already recorded
    pub fn contains(&self, state: &ProgramState) -> bool {
        self.states.contains(state)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
