//! Class declaration discovery
//!
//! Class headers are matched with regular expressions; there is no real
//! parsing of the source language.

use crate::{Error, Result};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

/// A `class Name<...> : Base, IInterface` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    /// Everything after the colon on the header line
    pub heritage: String,
    pub file: PathBuf,
}

/// Class declarations of a set of source files
#[derive(Debug, Default)]
pub struct ClassIndex {
    declarations: Vec<ClassDecl>,
}

fn word_pattern(name: &str) -> Result<Regex> {
    Regex::new(&format!(r"\b{}\b", regex::escape(name)))
        .map_err(|e| Error::discovery(format!("invalid class name {:?}: {}", name, e)))
}

impl ClassIndex {
    /// Read every file and collect the class headers that declare a base list
    pub fn build(files: &[PathBuf]) -> Result<Self> {
        let header = Regex::new(r"\bclass\s+(\w+)(?:<.*?>)?\s*:\s*(.*)")
            .map_err(|e| Error::discovery(e.to_string()))?;

        let mut declarations = Vec::new();
        for file in files {
            let content = match fs::read_to_string(file) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("Skipping unreadable file {}: {}", file.display(), e);
                    continue;
                }
            };
            declarations.extend(Self::parse(&header, &content, file));
        }

        tracing::debug!("Indexed {} class declarations", declarations.len());
        Ok(Self { declarations })
    }

    fn parse(header: &Regex, content: &str, file: &Path) -> Vec<ClassDecl> {
        header
            .captures_iter(content)
            .map(|caps| ClassDecl {
                name: caps[1].to_string(),
                heritage: caps[2].trim().to_string(),
                file: file.to_path_buf(),
            })
            .collect()
    }

    pub fn from_declarations(declarations: Vec<ClassDecl>) -> Self {
        Self { declarations }
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// File declaring `name`; the last declaration wins
    pub fn file_of(&self, name: &str) -> Option<&Path> {
        self.declarations
            .iter()
            .rev()
            .find(|decl| decl.name == name)
            .map(|decl| decl.file.as_path())
    }

    /// Classes naming `base` (a class or interface) in their header,
    /// excluding `base` itself. Later declarations win for duplicate names.
    pub fn derived_from(&self, base: &str) -> Result<BTreeMap<String, PathBuf>> {
        let pattern = word_pattern(base)?;
        Ok(self
            .declarations
            .iter()
            .filter(|decl| decl.name != base && pattern.is_match(&decl.heritage))
            .map(|decl| (decl.name.clone(), decl.file.clone()))
            .collect())
    }

    /// Classes implementing the given interface
    pub fn implementing(&self, interface: &str) -> Result<BTreeMap<String, PathBuf>> {
        self.derived_from(interface)
    }

    /// Every transitive subclass of `parent`, found breadth-first
    pub fn descendants(&self, parent: &str) -> Result<Hierarchy> {
        let mut hierarchy = Hierarchy::default();
        let mut queue = VecDeque::from([parent.to_string()]);
        let mut visited = BTreeSet::new();

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }

            for (child, file) in self.derived_from(&current)? {
                if child == parent {
                    continue;
                }
                // A child already reached through another ancestor still
                // makes `current` a non-leaf
                hierarchy.parents.insert(current.clone());
                if hierarchy.classes.contains_key(&child) {
                    continue;
                }
                hierarchy.classes.insert(child.clone(), file);
                queue.push_back(child);
            }
        }

        Ok(hierarchy)
    }
}

/// Subclasses found under a root class
#[derive(Debug, Default, Clone)]
pub struct Hierarchy {
    /// Class name → defining file
    pub classes: BTreeMap<String, PathBuf>,
    /// Classes that have at least one subclass in `classes`
    pub parents: BTreeSet<String>,
}

impl Hierarchy {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Subclasses nothing else in the hierarchy derives from
    pub fn most_derived(&self) -> BTreeMap<String, PathBuf> {
        self.classes
            .iter()
            .filter(|(name, _)| !self.parents.contains(*name))
            .map(|(name, file)| (name.clone(), file.clone()))
            .collect()
    }
}
