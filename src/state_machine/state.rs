//! State representation and naming

use crate::state_machine::paths::{CompletedPaths, IncludePath};
use crate::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;

pub type StateId = String;

/// A state in the include chain (one per completed path)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct State {
    pub name: StateId,
    pub path: IncludePath,
}

/// Role of a state in the compiled builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateClass {
    /// The root state owning the empty path
    Initial,
    /// Has successors; its method returns a continuation interface
    Chaining,
    /// Reachable but without successors; its method ends the chain
    Terminal,
    /// Neither a source with successors nor a successor; not emitted
    #[default]
    Inert,
}

impl StateClass {
    pub fn color(&self) -> &'static str {
        match self {
            StateClass::Initial => "lightblue",
            StateClass::Chaining => "lightgreen",
            StateClass::Terminal => "green",
            StateClass::Inert => "gray",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StateClass::Initial => "Initial",
            StateClass::Chaining => "Chaining",
            StateClass::Terminal => "Terminal",
            StateClass::Inert => "Inert",
        }
    }
}

impl State {
    pub fn new(name: impl Into<StateId>, path: IncludePath) -> Self {
        Self {
            name: name.into(),
            path,
        }
    }

    pub fn is_root(&self) -> bool {
        self.path.is_root()
    }
}

/// Name of the root state for an entity
pub fn root_state_name(entity: &str, initial_state_name: &str) -> StateId {
    format!("{}{}", entity, initial_state_name)
}

/// Uppercase letters of a segment, lowercased, then capitalized.
/// `TransactionGroupUsers` becomes `Tgu`.
fn abbreviate_segment(segment: &str) -> String {
    let letters: String = segment
        .chars()
        .filter(|c| c.is_uppercase())
        .flat_map(char::to_lowercase)
        .collect();

    let mut chars = letters.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derive the state name for one path.
///
/// - root: `{Entity}{InitialStateName}`
/// - `X`: `IncludeX`
/// - `A.B.X`: `Then` + abbreviations of `A` and `B` + `IncludeX`
pub fn state_name(entity: &str, initial_state_name: &str, path: &IncludePath) -> StateId {
    let segments: Vec<&str> = path.segments().collect();
    match segments.as_slice() {
        [] => root_state_name(entity, initial_state_name),
        [single] => format!("Include{}", single),
        [ancestors @ .., last] => {
            let prefix: String = ancestors.iter().map(|s| abbreviate_segment(s)).collect();
            format!("Then{}Include{}", prefix, last)
        }
    }
}

/// Assign a state to every completed path, preserving order.
///
/// Distinct paths must not derive the same name.
pub fn name_states(initial_state_name: &str, completed: &CompletedPaths) -> Result<Vec<State>> {
    let mut seen: HashMap<StateId, &IncludePath> = HashMap::with_capacity(completed.len());
    let mut states = Vec::with_capacity(completed.len());

    for path in &completed.paths {
        let name = state_name(&completed.entity, initial_state_name, path);
        if let Some(first) = seen.insert(name.clone(), path) {
            return Err(Error::StateNameCollision {
                name,
                first: first.to_string(),
                second: path.to_string(),
            });
        }
        states.push(State::new(name, path.clone()));
    }

    Ok(states)
}
