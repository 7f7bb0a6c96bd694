//! Output formatting module
//!
//! This module handles formatting derived state machines for inspection.

use crate::Result;
use crate::codegen::compile;
use crate::state_machine::{StateMachine, TransitionGraph, analyzer::classify_states};
use serde_json::json;

/// Output state machines as JSON, each with its compiled builder
pub fn output_json(w: &mut impl std::io::Write, machines: &[StateMachine]) -> Result<()> {
    let mut entities = Vec::with_capacity(machines.len());
    for machine in machines {
        let report = machine.report();
        entities.push(json!({
            "entity": machine.entity,
            "root": machine.root,
            "states": machine.states,
            "transitions": machine.transitions,
            "relevant": machine.relevant,
            "report": {
                "total_states": report.total_states,
                "relevant_states": report.relevant_states,
                "chaining_states": report.chaining_states,
                "terminal_states": report.terminal_states,
                "max_depth": report.max_depth,
            },
            "builder": compile(machine)?,
        }));
    }

    let output = json!({
        "summary": {
            "total_entities": machines.len(),
            "total_states": machines.iter().map(|m| m.states.len()).sum::<usize>(),
        },
        "entities": entities,
    });

    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?; // Add trailing newline
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

/// Output state machines as text tables, one per entity
pub fn output_table(w: &mut impl std::io::Write, machines: &[StateMachine]) -> Result<()> {
    writeln!(w, "Include Configuration - Derived State Machines")?;
    writeln!(w, "{}", "=".repeat(80))?;
    writeln!(w)?;

    writeln!(w, "Summary:")?;
    writeln!(w, "  Total Entities: {}", machines.len())?;
    writeln!(w)?;

    for machine in machines {
        let report = machine.report();
        writeln!(w, "{}:", machine.entity)?;
        writeln!(
            w,
            "  States: {} ({} relevant, {} chaining, {} terminal), max depth {}",
            report.total_states,
            report.relevant_states,
            report.chaining_states,
            report.terminal_states,
            report.max_depth
        )?;
        let stats = TransitionGraph::from_machine(machine)?.stats();
        writeln!(
            w,
            "  Transitions: {}, unreachable from root: {}",
            stats.total_transitions, stats.unreachable_states
        )?;
        writeln!(w, "{:-<120}", "")?;
        writeln!(w, "{:<32} {:<30} {:<9} {:<45}", "State", "Path", "Class", "Next States")?;
        writeln!(w, "{:-<120}", "")?;

        for (state_id, class) in classify_states(&machine.transitions, &machine.relevant) {
            let Some(transition) = machine.transition(&state_id) else {
                continue;
            };
            let next = if transition.is_terminal() {
                "-".to_string()
            } else {
                transition.next_states.iter().cloned().collect::<Vec<_>>().join(", ")
            };

            writeln!(
                w,
                "{:<32} {:<30} {:<9} {:<45}",
                truncate(&state_id, 32),
                truncate(transition.path.as_str(), 30),
                class.name(),
                truncate(&next, 45)
            )?;
        }
        writeln!(w)?;
    }

    Ok(())
}
