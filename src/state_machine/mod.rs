//! State machine module - Derive the include chain from directive paths

use crate::Result;
use std::collections::BTreeSet;

pub mod analyzer;
pub mod graph;
pub mod paths;
pub mod state;
pub mod transition;

// Re-export key types
pub use analyzer::{AnalysisReport, collect_relevant_states};
pub use graph::{GraphStats, TransitionGraph};
pub use paths::{CompletedPaths, IncludePath, complete_paths};
pub use state::{State, StateClass, StateId, name_states, root_state_name, state_name};
pub use transition::{Transition, derive_transitions};

/// Everything derived for one entity before code generation
#[derive(Debug, Clone)]
pub struct StateMachine {
    pub entity: String,
    pub root: StateId,
    pub states: Vec<State>,
    pub transitions: Vec<Transition>,
    pub relevant: BTreeSet<StateId>,
}

impl StateMachine {
    pub fn transition(&self, state: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.current_state == state)
    }

    pub fn report(&self) -> AnalysisReport {
        analyzer::analyze(&self.transitions, &self.relevant)
    }
}

/// Complete, name, derive, and filter the include chain for one entity.
///
/// Returns `None` when the entity declares no includes.
pub fn build_state_machine(
    entity: &str,
    raw_paths: &[String],
    initial_state_name: &str,
) -> Result<Option<StateMachine>> {
    let Some(completed) = complete_paths(entity, raw_paths)? else {
        tracing::debug!("{} declares no includes", entity);
        return Ok(None);
    };

    let states = name_states(initial_state_name, &completed)?;
    let transitions = derive_transitions(entity, initial_state_name, &states);
    let relevant = collect_relevant_states(&transitions);

    tracing::debug!(
        entity,
        states = states.len(),
        relevant = relevant.len(),
        "derived state machine"
    );

    Ok(Some(StateMachine {
        entity: entity.to_string(),
        root: root_state_name(entity, initial_state_name),
        states,
        transitions,
        relevant,
    }))
}
