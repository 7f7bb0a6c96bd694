//! CLI command implementations
//!
//! This module contains the implementation for each CLI command.

use crate::cli::TargetArgs;
use crate::discovery::{EntityIncludes, ProjectScanner};
use crate::state_machine::{StateMachine, build_state_machine};
use crate::{Config, Error, Result};
use dialoguer::Select;
use is_terminal::IsTerminal;

/// Scan the project and return the entities declared under the selected
/// query-object class. `None` means nothing implements the interface.
fn resolve_entities(target: &TargetArgs, config: &Config) -> Result<Option<Vec<EntityIncludes>>> {
    let scanner = ProjectScanner::new(&target.project, &config.discovery)?;
    let classes = scanner.query_classes()?;

    if classes.is_empty() {
        tracing::info!("No classes implementing {} found.", config.discovery.interface_name);
        return Ok(None);
    }

    let names: Vec<String> = classes.into_keys().collect();
    let interactive = !target.non_interactive && std::io::stdin().is_terminal();
    let class_name = select_class(&names, target.classname.as_deref(), interactive)?;
    tracing::info!("Using query-object class {}", class_name);

    let entities = scanner.entities_for(&class_name)?;
    if entities.is_empty() {
        tracing::info!("No IncludeDirectives found under {}", class_name);
    }

    Ok(Some(entities))
}

/// Pick the query-object class to work from
fn select_class(names: &[String], requested: Option<&str>, interactive: bool) -> Result<String> {
    if let Some(requested) = requested {
        return names
            .iter()
            .find(|name| name.as_str() == requested)
            .cloned()
            .ok_or_else(|| {
                Error::discovery(format!(
                    "class {} not found, candidates: {}",
                    requested,
                    names.join(", ")
                ))
            });
    }

    match names {
        [] => Err(Error::discovery("no query-object classes to choose from")),
        [only] => Ok(only.clone()),
        [first, ..] if !interactive => {
            tracing::warn!(
                "Found {} query-object classes, using {} (pass --classname to choose)",
                names.len(),
                first
            );
            Ok(first.clone())
        }
        _ => {
            let selection = Select::new()
                .with_prompt("Select the query-object class")
                .items(names)
                .default(0)
                .interact()?;
            names
                .get(selection)
                .cloned()
                .ok_or_else(|| Error::Prompt(format!("invalid selection {}", selection)))
        }
    }
}

/// Run `process` for every entity.
///
/// Entity-scoped failures are logged and collected so the remaining entities
/// still run; anything else aborts.
fn process_entities<T>(
    entities: &[EntityIncludes],
    mut process: impl FnMut(&EntityIncludes) -> Result<Option<T>>,
) -> Result<(Vec<T>, Vec<String>)> {
    let mut results = Vec::new();
    let mut failed = Vec::new();

    for entity in entities {
        match process(entity) {
            Ok(Some(result)) => results.push(result),
            Ok(None) => tracing::info!("{} declares no includes, skipping", entity.entity),
            Err(e) if e.is_entity_scoped() => {
                tracing::error!(
                    entity = %entity.entity,
                    source = %entity.source.display(),
                    "Skipping entity: {}",
                    e
                );
                failed.push(entity.entity.clone());
            }
            Err(e) => return Err(e),
        }
    }

    Ok((results, failed))
}

fn check_failures(failed: &[String]) -> Result<()> {
    crate::ensure!(
        failed.is_empty(),
        "{} entities failed: {}",
        failed.len(),
        failed.join(", ")
    );
    Ok(())
}

fn state_machine_for(entity: &EntityIncludes, config: &Config) -> Result<Option<StateMachine>> {
    build_state_machine(&entity.entity, &entity.paths, &config.generator.initial_state_name)
}

/// Generate command implementation
pub mod generate {
    use super::*;
    use crate::codegen::{EmitOptions, compile, render_artifacts, write_artifacts};
    use std::io::Write;

    /// Execute the generate command. With `dry_run`, artifact paths are
    /// listed on `w` instead of being written.
    pub fn execute(
        target: &TargetArgs,
        config: &Config,
        dry_run: bool,
        w: &mut impl Write,
    ) -> Result<()> {
        let Some(entities) = resolve_entities(target, config)? else {
            return Ok(());
        };

        let options = EmitOptions::for_project(
            &target.project,
            &config.generator.output_dir,
            &config.generator.config_name,
        );
        tracing::debug!("Output directory: {}", options.output_dir.display());

        let (generated, failed) = process_entities(&entities, |entity| {
            let Some(machine) = state_machine_for(entity, config)? else {
                return Ok(None);
            };
            let artifacts = render_artifacts(&compile(&machine)?, &options);

            if dry_run {
                for artifact in &artifacts {
                    writeln!(w, "{}", artifact.path.display())?;
                }
            } else {
                write_artifacts(&artifacts)?;
            }

            tracing::info!(
                "Generated {} files for {}",
                artifacts.len(),
                entity.entity
            );
            Ok(Some(entity.entity.clone()))
        })?;

        tracing::info!("Processed {} entities", generated.len());
        check_failures(&failed)
    }
}

/// Inspect command implementation
pub mod inspect {
    use super::*;
    use crate::cli::{OutputFormat, output};
    use crate::state_machine::TransitionGraph;
    use std::io::Write;

    /// Execute the inspect command
    pub fn execute(
        target: &TargetArgs,
        config: &Config,
        format: OutputFormat,
        w: &mut impl Write,
    ) -> Result<()> {
        let Some(entities) = resolve_entities(target, config)? else {
            return Ok(());
        };

        let (machines, failed) =
            process_entities(&entities, |entity| state_machine_for(entity, config))?;

        match format {
            OutputFormat::Json => output::output_json(w, &machines)?,
            OutputFormat::Table => output::output_table(w, &machines)?,
            OutputFormat::Dot => {
                for machine in &machines {
                    let graph = TransitionGraph::from_machine(machine)?;
                    writeln!(w, "{}", graph.to_dot())?;
                }
            }
        }

        check_failures(&failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::discovery::tests::{sample_project, write};
    use std::path::Path;

    fn target(project: &Path) -> TargetArgs {
        TargetArgs {
            project: project.to_path_buf(),
            classname: None,
            output_dir: None,
            initial_state_name: None,
            config_name: None,
            interface: None,
            non_interactive: true,
        }
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_select_class() {
        let classes = names(&["BaseQueryObject", "LegacyQuery"]);

        assert_eq!(select_class(&classes, None, false).unwrap(), "BaseQueryObject");
        assert_eq!(
            select_class(&classes, Some("LegacyQuery"), false).unwrap(),
            "LegacyQuery"
        );
        assert!(matches!(
            select_class(&classes, Some("Missing"), false),
            Err(Error::Discovery(_))
        ));
        assert_eq!(
            select_class(&names(&["OnlyOne"]), None, true).unwrap(),
            "OnlyOne"
        );
    }

    #[test]
    fn test_generate_writes_builders() {
        let dir = tempfile::tempdir().unwrap();
        sample_project(dir.path());

        let mut out = Vec::new();
        generate::execute(&target(dir.path()), &Config::default(), false, &mut out).unwrap();
        assert!(out.is_empty());

        let entity_dir = dir.path().join("IncludeConfig/OrderEntity");
        let class = std::fs::read_to_string(entity_dir.join("RelationsConfig.cs")).unwrap();
        assert!(class.contains("namespace IncludeConfig.RelationsConfig.OrderEntity\n"));
        assert!(class.contains("public class OrderEntityRelationsConfig : "));
        assert!(class.contains("IncludeCustomer(string path = \"Customer\")"));
        assert!(entity_dir.join("Interfaces/IOrderEntityInitialState.cs").is_file());

        // Empty directives produce nothing
        assert!(!dir.path().join("IncludeConfig/TagEntity").exists());
    }

    #[test]
    fn test_generate_dry_run_lists_paths() {
        let dir = tempfile::tempdir().unwrap();
        sample_project(dir.path());

        let mut out = Vec::new();
        generate::execute(&target(dir.path()), &Config::default(), true, &mut out).unwrap();

        let listed = String::from_utf8(out).unwrap();
        assert!(listed.lines().any(|l| l.ends_with("RelationsConfig.cs")));
        assert!(listed.lines().any(|l| l.ends_with("IOrderEntityInitialState.cs")));
        assert!(!dir.path().join("IncludeConfig").exists());
    }

    #[test]
    fn test_generate_continues_past_failing_entity() {
        let dir = tempfile::tempdir().unwrap();
        sample_project(dir.path());
        write(
            dir.path(),
            "Shop.DAL/QueryObjects/MemberQueryObject.cs",
            r#"public class MemberQueryObject : BaseQueryObject<MemberEntity, MemberQueryObject>
{
    public override ICollection<Func<MemberEntity, object>> IncludeDirectives { get; } = new List<Func<MemberEntity, object>>
    {
        entity => entity.Group.Select(g => g.User),
        entity => entity.Grade.Select(g => g.User),
    };
}
"#,
        );

        let mut out = Vec::new();
        let err = generate::execute(&target(dir.path()), &Config::default(), false, &mut out)
            .unwrap_err();

        assert_eq!(err.to_string(), "1 entities failed: MemberEntity");
        assert!(dir.path().join("IncludeConfig/OrderEntity/RelationsConfig.cs").is_file());
        assert!(!dir.path().join("IncludeConfig/MemberEntity").exists());
    }

    #[test]
    fn test_no_query_objects_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "App/Program.cs", "public class Program {}\n");

        let mut out = Vec::new();
        generate::execute(&target(dir.path()), &Config::default(), false, &mut out).unwrap();
        assert!(!dir.path().join("IncludeConfig").exists());
    }

    #[test]
    fn test_inspect_formats() {
        let dir = tempfile::tempdir().unwrap();
        sample_project(dir.path());
        let config = Config::default();

        let mut json = Vec::new();
        inspect::execute(&target(dir.path()), &config, OutputFormat::Json, &mut json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["entities"][0]["entity"], "OrderEntity");
        assert_eq!(value["entities"][0]["root"], "OrderEntityInitialState");

        let mut dot = Vec::new();
        inspect::execute(&target(dir.path()), &config, OutputFormat::Dot, &mut dot).unwrap();
        assert!(String::from_utf8(dot).unwrap().starts_with("digraph OrderEntity {"));

        let mut table = Vec::new();
        inspect::execute(&target(dir.path()), &config, OutputFormat::Table, &mut table).unwrap();
        assert!(String::from_utf8(table).unwrap().contains("ThenLIncludeProduct"));

        assert!(!dir.path().join("IncludeConfig").exists());
    }
}
