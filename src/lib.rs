//! Relation Config Generator
//!
//! Compiles the include directives declared on query objects into a fluent,
//! type-safe include builder.
//!
//! This library provides functionality for:
//! - Discovering query-object classes and their include directives in a source tree
//! - Completing include paths and naming one state per path
//! - Deriving which include may legally follow which as a transition graph
//! - Compiling that graph into builder methods and continuation interfaces
//! - Emitting the builder class and interfaces as source files

pub mod cli;
pub mod codegen;
pub mod config;
pub mod discovery;
pub mod error;
pub mod state_machine;

pub use config::Config;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "relation-config-gen");
    }
}
