//! Relevance analysis
//!
//! Decides which states take part in the generated builder and what role
//! each one plays.

use super::{StateClass, StateId, Transition};
use std::collections::BTreeSet;

/// States that are a source with successors, or a successor of anything.
///
/// A state with no successors that nothing points to is dropped.
pub fn collect_relevant_states(transitions: &[Transition]) -> BTreeSet<StateId> {
    let mut relevant = BTreeSet::new();
    let mut referenced = BTreeSet::new();

    for transition in transitions {
        if !transition.next_states.is_empty() {
            relevant.insert(transition.current_state.clone());
            referenced.extend(transition.next_states.iter().cloned());
        }
    }

    relevant.extend(referenced);
    relevant
}

/// Classify every state by its role in the builder
pub fn classify_states(
    transitions: &[Transition],
    relevant: &BTreeSet<StateId>,
) -> Vec<(StateId, StateClass)> {
    transitions
        .iter()
        .map(|transition| {
            let class = if transition.path.is_root() {
                StateClass::Initial
            } else if !relevant.contains(&transition.current_state) {
                StateClass::Inert
            } else if transition.is_terminal() {
                StateClass::Terminal
            } else {
                StateClass::Chaining
            };
            (transition.current_state.clone(), class)
        })
        .collect()
}

/// Summary of a derived state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub total_states: usize,
    pub relevant_states: usize,
    pub chaining_states: usize,
    pub terminal_states: usize,
    pub max_depth: usize,
}

pub fn analyze(transitions: &[Transition], relevant: &BTreeSet<StateId>) -> AnalysisReport {
    let classes = classify_states(transitions, relevant);
    let count = |wanted: StateClass| classes.iter().filter(|(_, class)| *class == wanted).count();

    AnalysisReport {
        total_states: transitions.len(),
        relevant_states: relevant.len(),
        chaining_states: count(StateClass::Chaining),
        terminal_states: count(StateClass::Terminal),
        max_depth: transitions
            .iter()
            .map(|t| t.path.depth())
            .max()
            .unwrap_or(0),
    }
}
