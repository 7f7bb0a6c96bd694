//! Include directive extraction
//!
//! Query objects declare the navigation chains they may include as a
//! collection of lambdas:
//!
//! ```text
//! public override ICollection<Func<UserEntity, object>> IncludeDirectives { get; } = new List<Func<UserEntity, object>>
//! {
//!     entity => entity.GroupUsers,
//!     entity => entity.GroupUsers.Select(gu => gu.Group),
//! };
//! ```
//!
//! which yields `UserEntity` with `["GroupUsers", "GroupUsers.Group", ""]`.

use crate::{Error, Result};
use regex::Regex;

const DIRECTIVES_PATTERN: &str = r"(?s)public\s*(?:virtual|override)?\s*ICollection\s*<\s*Func\s*<\s*(\w+)\s*,\s*object\s*>\s*>\s*IncludeDirectives\s*\{\s*get\s*;\s*\}\s*=\s*new\s*List\s*<\s*Func\s*<\s*\w+\s*,\s*object\s*>\s*>\s*\{([^}]*)\s*\};";

/// One `IncludeDirectives` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirectives {
    pub entity: String,
    /// Dotted paths as written, possibly with empty entries
    pub paths: Vec<String>,
}

/// Finds and cleans `IncludeDirectives` initializers
pub struct DirectiveExtractor {
    declaration: Regex,
    whitespace: Regex,
    select: Regex,
    lambda_head: Regex,
    punctuation: Regex,
}

impl DirectiveExtractor {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| Error::discovery(format!("bad directive pattern: {}", e)))
        };

        Ok(Self {
            declaration: compile(DIRECTIVES_PATTERN)?,
            whitespace: compile(r"\s+")?,
            select: compile(r"Select\(\w*=>\w*\.")?,
            lambda_head: compile(r"\w+=>\w+\.")?,
            punctuation: compile(r"[(){}<>;!]")?,
        })
    }

    /// Every declaration in a source file
    pub fn extract(&self, content: &str) -> Vec<IncludeDirectives> {
        self.declaration
            .captures_iter(content)
            .map(|caps| IncludeDirectives {
                entity: caps[1].to_string(),
                paths: self.clean_code_block(&caps[2]),
            })
            .collect()
    }

    /// Reduce the initializer body to dotted paths.
    ///
    /// `entity => entity.A.Select(a => a.B)` becomes `A.B`. The list is split
    /// on commas, so a trailing comma leaves an empty entry.
    pub fn clean_code_block(&self, block: &str) -> Vec<String> {
        let cleaned = self.whitespace.replace_all(block, "");
        let cleaned = self.select.replace_all(&cleaned, "");
        let cleaned = self.lambda_head.replace_all(&cleaned, "");
        let cleaned = self.punctuation.replace_all(&cleaned, "");

        cleaned.split(',').map(str::to_string).collect()
    }
}
