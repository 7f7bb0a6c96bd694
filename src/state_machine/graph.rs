use crate::state_machine::{State, StateClass, StateId, StateMachine};
use crate::{Error, Result};
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::Dfs;
use std::collections::HashMap;

/// A directed graph of the include chain for one entity.
///
/// Nodes are states, edges point from a state to every state that may be
/// included right after it.
pub struct TransitionGraph {
    pub graph: StableGraph<State, ()>,

    /// Maps state names to their graph indices.
    pub state_index: HashMap<StateId, NodeIndex>,

    pub entity: String,
    pub root: StateId,
}

impl TransitionGraph {
    pub fn new(entity: String, root: StateId) -> Self {
        Self {
            graph: StableGraph::new(),
            state_index: HashMap::new(),
            entity,
            root,
        }
    }

    /// Adds a state to the graph and updates the state index.
    pub fn add_state(&mut self, state: State) -> NodeIndex {
        let name = state.name.clone();
        let node_index = self.graph.add_node(state);
        self.state_index.insert(name, node_index);
        node_index
    }

    /// Build the graph from a derived state machine. Every successor must be
    /// one of the machine's own states.
    pub fn from_machine(machine: &StateMachine) -> Result<Self> {
        let mut graph = Self::new(machine.entity.clone(), machine.root.clone());

        for transition in &machine.transitions {
            graph.add_state(State::new(
                transition.current_state.clone(),
                transition.path.clone(),
            ));
        }

        for transition in &machine.transitions {
            let from_idx = graph.state_index[&transition.current_state];
            for next in &transition.next_states {
                let to_idx = graph.state_index.get(next).copied().ok_or_else(|| {
                    Error::state_machine(format!(
                        "{} lists unknown successor {}",
                        transition.current_state, next
                    ))
                })?;
                graph.graph.add_edge(from_idx, to_idx, ());
            }
        }

        Ok(graph)
    }

    /// Classify a state from its position in the graph
    pub fn classify(&self, node_idx: NodeIndex) -> StateClass {
        let is_root = self
            .graph
            .node_weight(node_idx)
            .is_some_and(|state| state.is_root());
        let has_incoming = self
            .graph
            .edges_directed(node_idx, Direction::Incoming)
            .next()
            .is_some();
        let has_outgoing = self
            .graph
            .edges_directed(node_idx, Direction::Outgoing)
            .next()
            .is_some();

        match (is_root, has_incoming, has_outgoing) {
            (true, _, _) => StateClass::Initial,
            (false, _, true) => StateClass::Chaining,
            (false, true, false) => StateClass::Terminal,
            (false, false, false) => StateClass::Inert,
        }
    }

    /// States that cannot be reached by any chain starting at the root
    pub fn unreachable_from_root(&self) -> Vec<&State> {
        let Some(&root_idx) = self.state_index.get(&self.root) else {
            return self.all_states();
        };

        let mut reached = Vec::new();
        let mut dfs = Dfs::new(&self.graph, root_idx);
        while let Some(idx) = dfs.next(&self.graph) {
            reached.push(idx);
        }

        self.graph
            .node_indices()
            .filter(|idx| !reached.contains(idx))
            .filter_map(|idx| self.graph.node_weight(idx))
            .collect()
    }

    /// Find all terminal states (reachable, no outgoing edges)
    pub fn find_terminal_states(&self) -> Vec<&State> {
        self.graph
            .node_indices()
            .filter(|&idx| self.classify(idx) == StateClass::Terminal)
            .filter_map(|idx| self.graph.node_weight(idx))
            .collect()
    }

    /// Names of the states that may follow `state_id`, sorted
    pub fn successors(&self, state_id: &str) -> Vec<&str> {
        let Some(&node_idx) = self.state_index.get(state_id) else {
            return Vec::new();
        };

        let mut names: Vec<&str> = self
            .graph
            .neighbors_directed(node_idx, Direction::Outgoing)
            .filter_map(|idx| self.graph.node_weight(idx))
            .map(|state| state.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Get all states
    pub fn all_states(&self) -> Vec<&State> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx))
            .collect()
    }

    /// Export to DOT format for Graphviz
    pub fn to_dot(&self) -> String {
        let mut dot = format!("digraph {} {{\n", self.entity);
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=box, style=filled];\n\n");

        for node_idx in self.graph.node_indices() {
            if let Some(state) = self.graph.node_weight(node_idx) {
                let color = self.classify(node_idx).color();
                let label = if state.is_root() {
                    state.name.clone()
                } else {
                    format!("{}\\n{}", state.name, state.path)
                };

                dot.push_str(&format!(
                    "  \"{}\" [label=\"{}\", fillcolor=\"{}\"];\n",
                    state.name, label, color
                ));
            }
        }

        dot.push('\n');

        for edge_idx in self.graph.edge_indices() {
            if let Some((from_idx, to_idx)) = self.graph.edge_endpoints(edge_idx)
                && let (Some(from_state), Some(to_state)) = (
                    self.graph.node_weight(from_idx),
                    self.graph.node_weight(to_idx),
                )
            {
                dot.push_str(&format!(
                    "  \"{}\" -> \"{}\";\n",
                    from_state.name, to_state.name
                ));
            }
        }

        dot.push_str("}\n");
        dot
    }

    /// Get graph statistics
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            total_states: self.graph.node_count(),
            total_transitions: self.graph.edge_count(),
            terminal_states: self.find_terminal_states().len(),
            unreachable_states: self.unreachable_from_root().len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub total_states: usize,
    pub total_transitions: usize,
    pub terminal_states: usize,
    pub unreachable_states: usize,
}
