use glob::Pattern;

use crate::error::{DirdiffError, Result};

/// Built-in basenames and globs excluded from every tree.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    // package managers
    "node_modules",
    ".pnpm-store",
    ".yarn",
    "bower_components",
    "jspm_packages",
    // build output
    "dist",
    "build",
    "out",
    ".next",
    ".nuxt",
    ".output",
    "target",
    // version control
    ".git",
    ".svn",
    ".hg",
    // editors
    ".idea",
    ".vscode",
    ".vs",
    "*.swp",
    "*.swo",
    ".DS_Store",
    // logs and caches
    "*.log",
    "npm-debug.log*",
    "yarn-debug.log*",
    "yarn-error.log*",
    ".cache",
    ".temp",
    ".tmp",
    // environment files
    ".env",
    ".env.*",
    ".env.local",
    ".env.*.local",
    // misc
    "coverage",
    ".nyc_output",
    ".eslintcache",
    ".stylelintcache",
    ".prettiercache",
];

#[derive(Debug, Clone)]
enum Rule {
    Literal(String),
    Glob(Pattern),
}

impl Rule {
    fn parse(pattern: &str) -> Result<Self> {
        if !pattern.contains('*') {
            return Ok(Rule::Literal(pattern.to_string()));
        }
        // Only `*` is meaningful; anything else glob would interpret stays literal.
        let escaped = pattern
            .split('*')
            .map(Pattern::escape)
            .collect::<Vec<_>>()
            .join("*");
        Pattern::new(&escaped)
            .map(Rule::Glob)
            .map_err(|source| DirdiffError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Rule::Literal(lit) => lit == name,
            Rule::Glob(pat) => pat.matches(name),
        }
    }
}

/// Decides which entry basenames are left out of a tree snapshot.
///
/// Matching is case-sensitive and anchored on the whole basename: `node_modules`
/// excludes `node_modules` but not `node_modules_backup`, and `*.log` excludes
/// `app.log` but not `app.log.txt`.
#[derive(Debug, Clone)]
pub struct PathFilter {
    rules: Vec<Rule>,
}

impl Default for PathFilter {
    fn default() -> Self {
        let rules = DEFAULT_IGNORE_PATTERNS
            .iter()
            .filter_map(|p| Rule::parse(p).ok())
            .collect();
        Self { rules }
    }
}

impl PathFilter {
    /// The built-in table plus `extra` patterns.
    pub fn with_patterns<I, S>(extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::default();
        for pattern in extra {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            filter.rules.push(Rule::parse(pattern)?);
        }
        Ok(filter)
    }

    /// A filter that keeps everything.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn should_ignore(&self, basename: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(basename))
    }
}
