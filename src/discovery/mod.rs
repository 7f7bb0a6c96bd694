//! Discovery module - Find query objects and their include directives
//!
//! This module scans a project tree for classes implementing the
//! query-object interface, walks down to their most-derived subclasses, and
//! extracts the include directive paths declared there.

use crate::config::DiscoveryConfig;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

pub mod classes;
pub mod directives;
pub mod files;

pub use classes::{ClassDecl, ClassIndex, Hierarchy};
pub use directives::{DirectiveExtractor, IncludeDirectives};

/// Include paths declared for one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityIncludes {
    pub entity: String,
    pub paths: Vec<String>,
    /// Query-object class declaring the directives
    pub class_name: String,
    pub source: PathBuf,
}

/// Scans one project tree
pub struct ProjectScanner {
    root: PathBuf,
    config: DiscoveryConfig,
    index: ClassIndex,
    extractor: DirectiveExtractor,
}

impl ProjectScanner {
    /// Index every source file under `root`
    pub fn new(root: impl Into<PathBuf>, config: &DiscoveryConfig) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::discovery(format!(
                "project directory {} does not exist",
                root.display()
            )));
        }

        let all_files = files::find_source_files(&root, &config.extension);
        tracing::info!(
            "Found {} .{} files under {}",
            all_files.len(),
            config.extension,
            root.display()
        );

        Ok(Self {
            index: ClassIndex::build(&all_files)?,
            extractor: DirectiveExtractor::new()?,
            config: config.clone(),
            root,
        })
    }

    /// Classes implementing the query-object interface.
    ///
    /// Directories named after the preferred marker are searched first; the
    /// whole tree is used when nothing is found there.
    pub fn query_classes(&self) -> Result<BTreeMap<String, PathBuf>> {
        let interface = &self.config.interface_name;
        let marker_dirs = files::find_marker_dirs(&self.root, &self.config.preferred_dir_marker);

        if !marker_dirs.is_empty() {
            let preferred = files::find_source_files_in(&marker_dirs, &self.config.extension);
            let classes = ClassIndex::build(&preferred)?.implementing(interface)?;
            if !classes.is_empty() {
                tracing::debug!(
                    "Found {} {} classes in {} directories",
                    classes.len(),
                    interface,
                    self.config.preferred_dir_marker
                );
                return Ok(classes);
            }
        }

        self.index.implementing(interface)
    }

    /// Include directives declared by the most-derived subclasses of `class_name`.
    ///
    /// When the class has no subclasses, the class itself is scanned.
    pub fn entities_for(&self, class_name: &str) -> Result<Vec<EntityIncludes>> {
        let hierarchy = self.index.descendants(class_name)?;

        let targets: BTreeMap<String, PathBuf> = if hierarchy.is_empty() {
            self.index
                .file_of(class_name)
                .map(|file| (class_name.to_string(), file.to_path_buf()))
                .into_iter()
                .collect()
        } else {
            hierarchy.most_derived()
        };

        let mut entities = Vec::new();
        for (class, file) in targets {
            let content = fs::read_to_string(&file)?;
            let found = self.extractor.extract(&content);

            if found.is_empty() {
                tracing::info!("No IncludeDirectives found in {}", class);
                continue;
            }

            for directives in found {
                tracing::debug!(
                    "{} declares {} include directives for {}",
                    class,
                    directives.paths.len(),
                    directives.entity
                );
                entities.push(EntityIncludes {
                    entity: directives.entity,
                    paths: directives.paths,
                    class_name: class.clone(),
                    source: file.clone(),
                });
            }
        }

        Ok(entities)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::Path;

    pub(crate) fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub(crate) fn sample_project(root: &Path) {
        write(
            root,
            "Shop.DAL/QueryObjects/QueryObject.cs",
            "public abstract class BaseQueryObject<TEntity, TQueryObject> : IQueryObject<TEntity>\n{\n    public virtual ICollection<Func<TEntity, object>> IncludeDirectives { get; } = new List<Func<TEntity, object>>();\n}\n",
        );
        write(
            root,
            "Shop.DAL/QueryObjects/OrderQueryObject.cs",
            r#"public class OrderQueryObject : BaseQueryObject<OrderEntity, OrderQueryObject>
{
    public override ICollection<Func<OrderEntity, object>> IncludeDirectives { get; } = new List<Func<OrderEntity, object>>
    {
        entity => entity.Customer,
        entity => entity.Lines.Select(l => l.Product),
    };
}
"#,
        );
        write(
            root,
            "Shop.DAL/QueryObjects/TagQueryObject.cs",
            "public class TagQueryObject : BaseQueryObject<TagEntity, TagQueryObject>\n{\n    public override ICollection<Func<TagEntity, object>> IncludeDirectives { get; } = new List<Func<TagEntity, object>> { };\n}\n",
        );
        write(root, "Shop.Web/Program.cs", "public class Program {}\n");
    }

    #[test]
    fn test_scan_sample_project() {
        let dir = tempfile::tempdir().unwrap();
        sample_project(dir.path());

        let scanner = ProjectScanner::new(dir.path(), &DiscoveryConfig::default()).unwrap();
        let classes = scanner.query_classes().unwrap();
        assert_eq!(classes.keys().collect::<Vec<_>>(), vec!["BaseQueryObject"]);

        let entities = scanner.entities_for("BaseQueryObject").unwrap();
        assert_eq!(entities.len(), 2);

        let order = entities.iter().find(|e| e.entity == "OrderEntity").unwrap();
        assert_eq!(order.class_name, "OrderQueryObject");
        assert_eq!(order.paths, vec!["Customer", "Lines.Product", ""]);

        let tag = entities.iter().find(|e| e.entity == "TagEntity").unwrap();
        assert_eq!(tag.paths, vec![""]);
    }

    #[test]
    fn test_falls_back_to_whole_tree() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Data/Queries.cs",
            "public class InvoiceQuery : IQueryObject<InvoiceEntity> {}\n",
        );

        let scanner = ProjectScanner::new(dir.path(), &DiscoveryConfig::default()).unwrap();
        let classes = scanner.query_classes().unwrap();
        assert_eq!(classes.keys().collect::<Vec<_>>(), vec!["InvoiceQuery"]);
    }

    #[test]
    fn test_class_without_subclasses_is_scanned_itself() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Data/InvoiceQuery.cs",
            "public class InvoiceQuery : IQueryObject<InvoiceEntity>\n{\n    public virtual ICollection<Func<InvoiceEntity, object>> IncludeDirectives { get; } = new List<Func<InvoiceEntity, object>>\n    {\n        entity => entity.Lines,\n    };\n}\n",
        );

        let scanner = ProjectScanner::new(dir.path(), &DiscoveryConfig::default()).unwrap();
        let entities = scanner.entities_for("InvoiceQuery").unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].paths, vec!["Lines", ""]);
    }

    #[test]
    fn test_missing_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectScanner::new(dir.path().join("nope"), &DiscoveryConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, Error::Discovery(_)));
    }
}
