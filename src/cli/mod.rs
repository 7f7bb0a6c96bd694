//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::{Config, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// Include-path builder generator CLI
#[derive(Parser, Debug)]
#[command(name = "relation-config-gen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate include builders for every query object of a project
    Generate {
        #[command(flatten)]
        target: TargetArgs,

        /// List the files that would be written without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the derived state machines without writing files
    Inspect {
        #[command(flatten)]
        target: TargetArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

/// Project selection and naming flags shared by all commands
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Project root directory to scan
    #[arg(short, long)]
    pub project: PathBuf,

    /// Query-object class to use (prompts when several exist)
    #[arg(long)]
    pub classname: Option<String>,

    /// Output directory, relative to the project root
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Suffix of the initial state name
    #[arg(long)]
    pub initial_state_name: Option<String>,

    /// Suffix of the generated class name
    #[arg(long)]
    pub config_name: Option<String>,

    /// Interface implemented by query objects
    #[arg(long)]
    pub interface: Option<String>,

    /// Never prompt; pick the first class in name order
    #[arg(long)]
    pub non_interactive: bool,
}

impl TargetArgs {
    /// Override configuration values with the flags that were given
    pub fn apply(&self, config: &mut Config) {
        if let Some(output_dir) = &self.output_dir {
            config.generator.output_dir = output_dir.clone();
        }
        if let Some(initial_state_name) = &self.initial_state_name {
            config.generator.initial_state_name = initial_state_name.clone();
        }
        if let Some(config_name) = &self.config_name {
            config.generator.config_name = config_name.clone();
        }
        if let Some(interface) = &self.interface {
            config.discovery.interface_name = interface.clone();
        }
    }
}

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// DOT format (Graphviz)
    Dot,
    /// Plain text table
    Table,
}

/// Execute the CLI command
pub fn execute(args: Cli, mut config: Config) -> Result<()> {
    match args.command {
        Commands::Generate { target, dry_run } => {
            target.apply(&mut config);
            config.validate()?;
            commands::generate::execute(&target, &config, dry_run, &mut std::io::stdout())
        }
        Commands::Inspect { target, format } => {
            target.apply(&mut config);
            config.validate()?;
            commands::inspect::execute(&target, &config, format, &mut std::io::stdout())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "relation-config-gen",
            "generate",
            "--project",
            "./Shop",
            "--classname",
            "BaseQueryObject",
            "-o",
            "Shop.DAL/IncludeConfig",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate { target, dry_run } => {
                assert!(dry_run);
                assert_eq!(target.project, PathBuf::from("./Shop"));
                assert_eq!(target.classname.as_deref(), Some("BaseQueryObject"));
                assert_eq!(target.output_dir.as_deref(), Some("Shop.DAL/IncludeConfig"));
                assert!(!target.non_interactive);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_inspect_defaults_to_table() {
        let cli =
            Cli::try_parse_from(["relation-config-gen", "inspect", "--project", "."]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Inspect {
                format: OutputFormat::Table,
                ..
            }
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "relation-config-gen",
            "inspect",
            "--project",
            ".",
            "--format",
            "dot",
            "-v",
            "--config",
            "gen.toml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("gen.toml")));
    }

    #[test]
    fn test_project_is_required() {
        assert!(Cli::try_parse_from(["relation-config-gen", "generate"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "relation-config-gen",
            "generate",
            "--project",
            ".",
            "--initial-state-name",
            "Start",
            "--config-name",
            "Includes",
            "--interface",
            "IQuery",
        ])
        .unwrap();

        let Commands::Generate { target, .. } = cli.command else {
            panic!("expected generate");
        };
        let mut config = Config::default();
        target.apply(&mut config);

        assert_eq!(config.generator.output_dir, "IncludeConfig");
        assert_eq!(config.generator.initial_state_name, "Start");
        assert_eq!(config.generator.config_name, "Includes");
        assert_eq!(config.discovery.interface_name, "IQuery");
    }
}
