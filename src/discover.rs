//! Finding ODF files from command-line style path arguments.

use crate::document::ODF_FORMATS;
use crate::pattern::{Pattern, PatternOptions};
use crate::{error::Error, Result};
use std::path::{Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// How [`list_documents`] walks a directory.
#[derive(Debug, Clone, Default)]
pub struct DiscoverOptions {
    pub ignore_case: bool,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Deepest subdirectory level searched when `recursive` is set; `None`
    /// means unlimited and `Some(0)` searches only the top directory.
    pub max_depth: Option<usize>,
    /// Found paths must match this filter.
    pub include: Option<String>,
    /// Found paths must not match this filter.
    pub exclude: Option<String>,
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Splits a path argument into an existing directory and a file filter.
///
/// `"docs/*.odt"` becomes `("docs", "*.odt")` and a bare `"*.odt"` becomes
/// `("", "*.odt")`. With `check_existence`, every directory segment must
/// exist or [`Error::PathNotFound`] is returned; an argument that only looks
/// like a path because of a regex `\.` is kept whole as a filter.
pub fn split_path_and_filter(input: &str, check_existence: bool) -> Result<(PathBuf, String)> {
    let mut chars = input.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if is_separator(c) {
            return Ok((PathBuf::from(MAIN_SEPARATOR_STR), String::new()));
        }
    }

    if check_existence && Path::new(input).is_dir() {
        let trimmed = input.strip_suffix(is_separator).unwrap_or(input);
        return Ok((PathBuf::from(trimmed), String::new()));
    }

    let Some((first, rest)) = input.split_once(is_separator) else {
        return Ok((PathBuf::new(), input.to_string()));
    };

    let rooted = first.is_empty();
    let first_dir = if rooted { MAIN_SEPARATOR_STR } else { first };
    if check_existence && !Path::new(first_dir).is_dir() {
        if !input.replace(r"\.", ".").contains(is_separator) {
            return Ok((PathBuf::new(), input.to_string()));
        }
        return Err(Error::PathNotFound(PathBuf::from(first_dir)));
    }

    let mut path = if rooted {
        String::new()
    } else {
        first.to_string()
    };
    let mut remaining = rest;
    while let Some((segment, tail)) = remaining.split_once(is_separator) {
        let candidate = format!("{path}{MAIN_SEPARATOR}{segment}");
        if check_existence && !Path::new(&candidate).is_dir() {
            return Err(Error::PathNotFound(PathBuf::from(candidate)));
        }
        path = candidate;
        remaining = tail;
    }

    if path.is_empty() {
        return Ok((PathBuf::from(MAIN_SEPARATOR_STR), rest.to_string()));
    }
    Ok((PathBuf::from(path), remaining.to_string()))
}

/// Regex accepting file names with an ODF extension.
pub fn odf_extension_regex() -> String {
    let extensions: Vec<&str> = ODF_FORMATS.iter().map(|(ext, _)| *ext).collect();
    format!(r".*\.(?:{})$", extensions.join("|"))
}

/// Lists the ODF files in `dir` whose names match `filter`.
///
/// If `dir/filter` names an existing file it is returned as is, whatever
/// its extension. An empty `dir` means the current directory; paths found
/// there are returned relative to it.
pub fn list_documents(
    dir: &Path,
    filter: &str,
    options: &DiscoverOptions,
) -> Result<Vec<PathBuf>> {
    let current = dir.as_os_str().is_empty();
    if !filter.is_empty() {
        let exact = if current {
            PathBuf::from(filter)
        } else {
            dir.join(filter)
        };
        if exact.is_file() {
            return Ok(vec![exact]);
        }
    }

    let root = if current { Path::new(".") } else { dir };
    if !root.is_dir() {
        debug!("Not a directory: {}", root.display());
        return Ok(Vec::new());
    }

    let anchored = PatternOptions {
        ignore_case: options.ignore_case,
        ..Default::default()
    };
    let user = Pattern::compile(Some(filter), anchored)?;
    let odf = Pattern::compile(Some(odf_extension_regex().as_str()), anchored)?;
    let include = Pattern::compile(
        options.include.as_deref(),
        PatternOptions::unanchored(options.ignore_case, true),
    )?;
    let exclude = Pattern::compile(
        options.exclude.as_deref(),
        PatternOptions::unanchored(options.ignore_case, false),
    )?;

    let max_depth = if options.recursive {
        options.max_depth.map_or(usize::MAX, |depth| depth.saturating_add(1))
    } else {
        1
    };

    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            user.matches(&name) && odf.matches(&name)
        })
        .map(|entry| {
            let path = entry.into_path();
            match path.strip_prefix(".") {
                Ok(relative) if current => relative.to_path_buf(),
                _ => path,
            }
        })
        .filter(|path| {
            let path = path.to_string_lossy();
            include.matches(&path) && !exclude.matches(&path)
        })
        .collect();

    found.sort();
    debug!("Found {} documents in {}", found.len(), root.display());
    Ok(found)
}
