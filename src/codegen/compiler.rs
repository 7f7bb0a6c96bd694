//! Signature and interface compilation
//!
//! Turns the transition graph into builder methods: every relevant state
//! becomes a method on the generated class, and every state with successors
//! becomes a continuation interface listing the methods allowed next.

use crate::state_machine::{IncludePath, StateId, StateMachine, Transition};
use crate::{Error, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Interface name → method signatures, both ordered
pub type InterfaceMap = BTreeMap<String, BTreeSet<MethodSignature>>;

/// One builder method.
///
/// The method takes an optional `path` argument defaulting to the state's
/// path and records it; it returns the continuation interface when the state
/// has successors and nothing otherwise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct MethodSignature {
    pub name: StateId,
    pub default_path: IncludePath,
    pub continuation: Option<String>,
}

impl MethodSignature {
    pub fn is_terminal(&self) -> bool {
        self.continuation.is_none()
    }

    /// Return type as written in the generated source
    pub fn return_type(&self) -> &str {
        self.continuation.as_deref().unwrap_or("void")
    }
}

/// The compiled builder for one entity
#[derive(Debug, Clone, Serialize)]
pub struct CompiledConfig {
    pub entity: String,
    /// Class methods in transition order
    pub methods: Vec<MethodSignature>,
    /// Interfaces the generated class implements
    pub class_interfaces: BTreeSet<String>,
    pub interfaces: InterfaceMap,
}

pub fn interface_name(state: &str) -> String {
    format!("I{}", state)
}

fn signature_for(transition: &Transition) -> MethodSignature {
    MethodSignature {
        name: transition.current_state.clone(),
        default_path: transition.path.clone(),
        continuation: (!transition.is_terminal())
            .then(|| interface_name(&transition.current_state)),
    }
}

/// Compile the machine's transitions into class methods and interfaces
pub fn compile(machine: &StateMachine) -> Result<CompiledConfig> {
    compile_transitions(&machine.entity, &machine.transitions, &machine.relevant)
}

/// Compile transitions restricted to the relevant states.
///
/// Every successor must have a transition of its own; a missing one means
/// the transition data is malformed and the entity is rejected.
pub fn compile_transitions(
    entity: &str,
    transitions: &[Transition],
    relevant: &BTreeSet<StateId>,
) -> Result<CompiledConfig> {
    let by_state: HashMap<&str, &Transition> = transitions
        .iter()
        .map(|t| (t.current_state.as_str(), t))
        .collect();

    let mut methods = Vec::new();
    let mut class_interfaces = BTreeSet::new();
    let mut interfaces = InterfaceMap::new();

    for transition in transitions {
        if !relevant.contains(&transition.current_state) {
            tracing::debug!("Skipping inert state {}", transition.current_state);
            continue;
        }

        let method = signature_for(transition);

        if let Some(interface) = &method.continuation {
            class_interfaces.insert(interface.clone());
            let signatures = interfaces.entry(interface.clone()).or_default();

            for next_state in &transition.next_states {
                let next = by_state.get(next_state.as_str()).ok_or_else(|| {
                    Error::state_machine(format!(
                        "successor {} of {} has no transition",
                        next_state, transition.current_state
                    ))
                })?;
                signatures.insert(signature_for(next));
            }
        }

        methods.push(method);
    }

    Ok(CompiledConfig {
        entity: entity.to_string(),
        methods,
        class_interfaces,
        interfaces,
    })
}
