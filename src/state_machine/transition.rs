//! Transition representation and derivation

use crate::state_machine::paths::IncludePath;
use crate::state_machine::state::{State, StateId, root_state_name};
use serde::Serialize;
use std::collections::BTreeSet;

/// The include calls that may legally follow a state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub current_state: StateId,
    pub path: IncludePath,
    pub next_states: BTreeSet<StateId>,
}

impl Transition {
    pub fn new(current_state: StateId, path: IncludePath, next_states: BTreeSet<StateId>) -> Self {
        Self {
            current_state,
            path,
            next_states,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next_states.is_empty()
    }

    /// Get display label for the transition
    pub fn display_label(&self) -> String {
        if self.next_states.is_empty() {
            format!("{} (terminal)", self.current_state)
        } else {
            let next: Vec<&str> = self.next_states.iter().map(String::as_str).collect();
            format!("{} -> {}", self.current_state, next.join(", "))
        }
    }
}

/// Derive one transition per state.
///
/// From the root every top-level include may follow. From any other path
/// the chain may switch to a different top-level include, continue with a
/// sibling under the same parent, or descend one level. The root state is
/// never a successor.
pub fn derive_transitions(
    entity: &str,
    initial_state_name: &str,
    states: &[State],
) -> Vec<Transition> {
    let root_state = root_state_name(entity, initial_state_name);

    states
        .iter()
        .map(|state| {
            let mut next_states = next_states_for(&state.path, states);
            next_states.remove(&root_state);

            tracing::trace!(
                state = %state.name,
                successors = next_states.len(),
                "derived transition"
            );

            Transition::new(state.name.clone(), state.path.clone(), next_states)
        })
        .collect()
}

fn next_states_for(path: &IncludePath, states: &[State]) -> BTreeSet<StateId> {
    let select = |keep: &dyn Fn(&IncludePath) -> bool| -> Vec<StateId> {
        states
            .iter()
            .filter(|candidate| keep(&candidate.path))
            .map(|candidate| candidate.name.clone())
            .collect()
    };

    let Some(first_segment) = path.first_segment() else {
        return select(&|candidate| candidate.depth() == 1).into_iter().collect();
    };

    let depth = path.depth();
    let parent = path.parent();
    let mut next_states = BTreeSet::new();

    // Switch to an unrelated top-level include
    next_states.extend(select(&|candidate| {
        candidate.depth() == 1 && candidate.first_segment() != Some(first_segment)
    }));

    // Another include at the same depth under the same ancestor
    next_states.extend(select(&|candidate| {
        candidate.depth() == depth && candidate.parent() == parent && candidate != path
    }));

    // One level deeper
    next_states.extend(select(&|candidate| candidate.is_child_of(path)));

    next_states
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::paths::complete_paths;
    use crate::state_machine::state::name_states;

    fn transitions(entity: &str, raw: &[&str]) -> Vec<Transition> {
        let raw: Vec<String> = raw.iter().map(|p| p.to_string()).collect();
        let completed = complete_paths(entity, &raw).unwrap().unwrap();
        let states = name_states("InitialState", &completed).unwrap();
        derive_transitions(entity, "InitialState", &states)
    }

    fn next_of<'a>(transitions: &'a [Transition], state: &str) -> Vec<&'a str> {
        transitions
            .iter()
            .find(|t| t.current_state == state)
            .unwrap_or_else(|| panic!("no transition for {}", state))
            .next_states
            .iter()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn test_foo_example() {
        let transitions = transitions("Foo", &["A.B", "C"]);

        assert_eq!(transitions.len(), 4);
        assert_eq!(next_of(&transitions, "FooInitialState"), vec!["IncludeA", "IncludeC"]);
        assert_eq!(next_of(&transitions, "IncludeA"), vec!["IncludeC", "ThenAIncludeB"]);
        assert_eq!(next_of(&transitions, "IncludeC"), vec!["IncludeA"]);
        assert_eq!(next_of(&transitions, "ThenAIncludeB"), vec!["IncludeC"]);
    }

    #[test]
    fn test_single_top_level_chain_is_terminal() {
        let transitions = transitions("Foo", &["A.B"]);

        assert_eq!(next_of(&transitions, "FooInitialState"), vec!["IncludeA"]);
        assert_eq!(next_of(&transitions, "IncludeA"), vec!["ThenAIncludeB"]);
        assert!(next_of(&transitions, "ThenAIncludeB").is_empty());
    }

    #[test]
    fn test_siblings_are_mutual_successors() {
        let transitions = transitions("Foo", &["X.Y", "X.Z"]);

        assert_eq!(next_of(&transitions, "ThenXIncludeY"), vec!["ThenXIncludeZ"]);
        assert_eq!(next_of(&transitions, "ThenXIncludeZ"), vec!["ThenXIncludeY"]);
        assert_eq!(next_of(&transitions, "IncludeX"), vec!["ThenXIncludeY", "ThenXIncludeZ"]);
    }

    #[test]
    fn test_cousins_are_not_siblings() {
        let transitions = transitions("Foo", &["A.X", "B.Y"]);

        let from_ax = next_of(&transitions, "ThenAIncludeX");
        assert_eq!(from_ax, vec!["IncludeB"]);
        assert!(!from_ax.contains(&"ThenBIncludeY"));
    }

    #[test]
    fn test_no_root_reentry() {
        let transitions = transitions(
            "UserEntity",
            &[
                "GroupUsers",
                "SentInvitations",
                "ReceivedInvitations",
                "GroupUsers.Group",
                "GroupUsers.Group.GroupUsers.User",
                "GroupUsers.TransactionGroupUsers.Transaction",
                "",
            ],
        );

        for transition in &transitions {
            assert!(!transition.next_states.contains("UserEntityInitialState"));
        }
    }

    #[test]
    fn test_nested_chain_matches_known_output() {
        let transitions = transitions(
            "UserEntity",
            &[
                "GroupUsers",
                "SentInvitations",
                "ReceivedInvitations",
                "GroupUsers.Group",
                "GroupUsers.Group.GroupUsers.User",
                "GroupUsers.TransactionGroupUsers.Transaction",
            ],
        );

        assert_eq!(
            next_of(&transitions, "ThenGuIncludeTransactionGroupUsers"),
            vec![
                "IncludeReceivedInvitations",
                "IncludeSentInvitations",
                "ThenGuIncludeGroup",
                "ThenGuTguIncludeTransaction",
            ]
        );
        assert_eq!(
            next_of(&transitions, "ThenGuGIncludeGroupUsers"),
            vec![
                "IncludeReceivedInvitations",
                "IncludeSentInvitations",
                "ThenGuGGuIncludeUser",
            ]
        );
    }

    #[test]
    fn test_display_label() {
        let transitions = transitions("Foo", &["A.B"]);
        assert_eq!(transitions[1].display_label(), "IncludeA -> ThenAIncludeB");
        assert_eq!(transitions[2].display_label(), "ThenAIncludeB (terminal)");
    }
}
