//! Hybrid glob/regex filters for file names and embedded objects.
//!
//! A filter without an escaped dot (`\.`) that contains `*`, `?` or `.` is a
//! glob; anything else is taken as a regular expression. Globs may still use
//! regex constructs such as `[bc]` or `(home|job)`.

use crate::{error::Error, Result};
use regex::{Regex, RegexBuilder};

/// Options controlling how a filter is compiled.
#[derive(Debug, Clone, Copy)]
pub struct PatternOptions {
    /// Match case-insensitively.
    pub ignore_case: bool,
    /// Anchor globs with `^`/`$` (a leading or trailing `*` leaves that end open).
    pub anchored: bool,
    /// Result of `matches` when the filter is empty.
    pub none_value: bool,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            ignore_case: false,
            anchored: true,
            none_value: true,
        }
    }
}

impl PatternOptions {
    /// Options for substring-style include/exclude filters.
    pub fn unanchored(ignore_case: bool, none_value: bool) -> Self {
        Self {
            ignore_case,
            anchored: false,
            none_value,
        }
    }
}

/// A compiled filter predicate.
#[derive(Debug, Clone)]
pub struct Pattern {
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Constant(bool),
    Regex(Regex),
}

impl Pattern {
    /// Compiles `filter` with default options (anchored, case-sensitive,
    /// empty filter matches everything).
    pub fn new(filter: &str) -> Result<Self> {
        Self::compile(Some(filter), PatternOptions::default())
    }

    /// Compiles a filter string into a predicate.
    pub fn compile(filter: Option<&str>, options: PatternOptions) -> Result<Self> {
        let Some(filter) = filter.filter(|f| !f.is_empty()) else {
            return Ok(Self {
                matcher: Matcher::Constant(options.none_value),
            });
        };

        let mut source = filter.to_string();
        if ends_with_lone_backslash(&source) {
            source.push('\\');
        }
        if is_glob(&source) {
            source = glob_to_regex(&source, options.anchored);
        }

        let regex = RegexBuilder::new(&source)
            .case_insensitive(options.ignore_case)
            .build()
            .map_err(|source| Error::PatternCompile {
                pattern: filter.to_string(),
                source,
            })?;

        Ok(Self {
            matcher: Matcher::Regex(regex),
        })
    }

    /// Returns true if `name` is accepted by this filter.
    pub fn matches(&self, name: &str) -> bool {
        match &self.matcher {
            Matcher::Constant(value) => *value,
            Matcher::Regex(regex) => regex.is_match(name),
        }
    }

    /// The regular expression this filter compiled to, if any.
    pub fn as_regex(&self) -> Option<&str> {
        match &self.matcher {
            Matcher::Constant(_) => None,
            Matcher::Regex(regex) => Some(regex.as_str()),
        }
    }
}

/// Returns true if `filter` is interpreted as a glob rather than a regex.
pub fn is_glob(filter: &str) -> bool {
    !filter.contains(r"\.") && filter.contains(['*', '?', '.'])
}

/// Translates a glob into a regular expression.
pub fn glob_to_regex(glob: &str, anchored: bool) -> String {
    let mut out = String::with_capacity(glob.len() + 8);
    if anchored && !glob.starts_with('*') {
        out.push('^');
    }
    for ch in glob.chars() {
        match ch {
            '.' => out.push_str(r"\."),
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            _ => out.push(ch),
        }
    }
    if anchored && !glob.ends_with('*') {
        out.push('$');
    }
    out
}

fn ends_with_lone_backslash(filter: &str) -> bool {
    let trailing = filter.chars().rev().take_while(|c| *c == '\\').count();
    trailing == 1
}
