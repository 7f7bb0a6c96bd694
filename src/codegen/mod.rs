//! Code generation - Compile state machines into builder source files

pub mod compiler;
pub mod emitter;

pub use compiler::{CompiledConfig, InterfaceMap, MethodSignature, compile, interface_name};
pub use emitter::{Artifact, ArtifactKind, EmitOptions, render_artifacts, write_artifacts};
