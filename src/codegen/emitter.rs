//! Artifact emission
//!
//! Renders a compiled builder as C# source files. Rendering is pure; only
//! [`write_artifacts`] touches the filesystem.

use crate::Result;
use crate::codegen::compiler::{CompiledConfig, MethodSignature};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Include bookkeeping shared by every generated class
const INCLUDE_MEMBERS: &str = r#"        private readonly List<string> _includes = new List<string>(); // Stores the includes for related entities

        /// <summary>
        /// Gets the list of includes to be applied to the query.
        /// </summary>
        public virtual List<string> Includes => _includes;

        /// <summary>
        /// Adds an include path to the current query object.
        /// </summary>
        /// <param name="include">The path of the include to be added.</param>
        protected void AddInclude(string include)
        {
            if (!string.IsNullOrWhiteSpace(include) && !_includes.Contains(include))
            {
                _includes.Add(include);
            }
        }

        /// <summary>
        /// Removes an include path from the current query object.
        /// </summary>
        /// <param name="include">The path of the include to be removed.</param>
        protected void RemoveInclude(string include)
        {
            if (_includes.Contains(include))
            {
                _includes.Remove(include);
            }
        }
"#;

/// Where and how artifacts are named
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Where files are written
    pub output_dir: PathBuf,
    /// Output path as configured, used for the namespace
    pub namespace_dir: PathBuf,
    pub config_name: String,
}

impl EmitOptions {
    /// Write under `project/output_dir`, namespaced by `output_dir` alone
    pub fn for_project(
        project: &Path,
        output_dir: impl Into<PathBuf>,
        config_name: impl Into<String>,
    ) -> Self {
        let namespace_dir = output_dir.into();
        Self {
            output_dir: project.join(&namespace_dir),
            namespace_dir,
            config_name: config_name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Class,
    Interface,
}

/// A rendered file, not yet written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub contents: String,
}

/// Namespace for an entity's builder: the output path with separators turned
/// into dots, followed by the config name and the entity.
pub fn namespace(output_dir: &Path, config_name: &str, entity: &str) -> String {
    let sanitized = output_dir.to_string_lossy().replace(['/', '\\'], ".");
    let sanitized = sanitized.trim_start_matches('.');

    if sanitized.is_empty() {
        format!("{}.{}", config_name, entity)
    } else {
        format!("{}.{}.{}", sanitized, config_name, entity)
    }
}

fn render_class_method(out: &mut String, method: &MethodSignature) {
    out.push_str(&format!(
        "        public {} {}(string path = \"{}\") {{\n",
        method.return_type(),
        method.name,
        method.default_path
    ));
    out.push_str("            AddInclude(path);\n");
    if !method.is_terminal() {
        out.push_str("            return this;\n");
    }
    out.push_str("        }\n");
}

/// Render the builder class
pub fn render_class(config: &CompiledConfig, namespace: &str, config_name: &str) -> String {
    let class_name = format!("{}{}", config.entity, config_name);
    let mut out = String::new();

    out.push_str(&format!("using {}.Interfaces;\n", namespace));
    out.push('\n');
    out.push_str(&format!("namespace {}\n", namespace));
    out.push_str("{\n");

    if config.class_interfaces.is_empty() {
        out.push_str(&format!("    public class {}\n", class_name));
    } else {
        let interfaces: Vec<&str> = config.class_interfaces.iter().map(String::as_str).collect();
        out.push_str(&format!(
            "    public class {} : {}\n",
            class_name,
            interfaces.join(", ")
        ));
    }
    out.push_str("    {\n");
    out.push_str(INCLUDE_MEMBERS);

    for method in &config.methods {
        out.push('\n');
        render_class_method(&mut out, method);
    }

    out.push_str("    }\n}\n");
    out
}

/// Render one continuation interface
pub fn render_interface(
    interface: &str,
    methods: &BTreeSet<MethodSignature>,
    namespace: &str,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("namespace {}.Interfaces\n", namespace));
    out.push_str("{\n");
    out.push_str(&format!("    public interface {}\n", interface));
    out.push_str("    {\n");
    for method in methods {
        out.push_str(&format!(
            "        {} {}(string path = \"{}\");\n",
            method.return_type(),
            method.name,
            method.default_path
        ));
    }
    out.push_str("    }\n}\n");
    out
}

/// Render the class file and one file per interface.
///
/// Layout: `{output_dir}/{Entity}/{config_name}.cs` and
/// `{output_dir}/{Entity}/Interfaces/{Interface}.cs`.
pub fn render_artifacts(config: &CompiledConfig, options: &EmitOptions) -> Vec<Artifact> {
    let namespace = namespace(&options.namespace_dir, &options.config_name, &config.entity);
    let entity_dir = options.output_dir.join(&config.entity);
    let interfaces_dir = entity_dir.join("Interfaces");

    let mut artifacts = Vec::with_capacity(config.interfaces.len() + 1);
    artifacts.push(Artifact {
        kind: ArtifactKind::Class,
        path: entity_dir.join(format!("{}.cs", options.config_name)),
        contents: render_class(config, &namespace, &options.config_name),
    });

    for (interface, methods) in &config.interfaces {
        artifacts.push(Artifact {
            kind: ArtifactKind::Interface,
            path: interfaces_dir.join(format!("{}.cs", interface)),
            contents: render_interface(interface, methods, &namespace),
        });
    }

    artifacts
}

/// Write artifacts to disk, creating directories as needed
pub fn write_artifacts(artifacts: &[Artifact]) -> Result<()> {
    for artifact in artifacts {
        if let Some(parent) = artifact.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&artifact.path, &artifact.contents)?;
        tracing::debug!("Wrote {}", artifact.path.display());
    }
    Ok(())
}
