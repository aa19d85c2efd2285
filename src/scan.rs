//! Source tree scanning.
//!
//! Walks the source root and returns every regular file that should be
//! embedded, in a stable order: depth-first, entries sorted by file name
//! within each directory.
//!
//! ## Exclusion Rules
//!
//! A file is skipped when any of these hold:
//!
//! - its name starts with `.` (dotfiles, `.git`, `.svn`, editor droppings)
//! - its name ends with an ignored suffix (`.scc` by default, see
//!   [`ScanConfig`])
//! - it is empty
//! - any directory between it and the root is skipped by the name rules
//!
//! The root itself is never judged by its own name, so scanning `./.assets`
//! works as expected.
//!
//! ## Patterns
//!
//! The optional file pattern is a `;`-separated list of wildcards matched
//! against the file name only (`*.png;*.jpg`). Directories are always
//! descended. Matching follows the platform's file name case rules:
//! case-insensitive on Windows and macOS, case-sensitive elsewhere.
//!
//! ## Unreadable Entries
//!
//! Dangling symlinks, symlink loops, and walk errors on entries the name rules
//! would drop anyway are skipped. Any other walk error ends the scan.

use crate::config::ScanConfig;
use crate::types::SourceFile;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Source directory doesn't exist: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("Didn't find any source files in: {0}")]
    NoFilesFound(PathBuf),
}

/// Whether file name patterns ignore ASCII case on this platform.
pub const PATTERN_IGNORES_CASE: bool = cfg!(any(windows, target_os = "macos"));

/// Wildcard filter applied to file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    alternatives: Vec<String>,
}

impl FilePattern {
    /// Parse a `;`-separated wildcard list. Blank input means "all files".
    pub fn parse(pattern: &str) -> Self {
        let alternatives: Vec<String> = pattern
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        if alternatives.is_empty() {
            Self::default()
        } else {
            Self { alternatives }
        }
    }

    /// True if `name` matches any alternative, with case handled as
    /// [`PATTERN_IGNORES_CASE`] says.
    pub fn matches(&self, name: &str) -> bool {
        let text: Vec<char> = name.chars().collect();
        self.alternatives.iter().any(|alt| {
            let pattern: Vec<char> = alt.chars().collect();
            wildcard_match(&pattern, &text, PATTERN_IGNORES_CASE)
        })
    }
}

impl Default for FilePattern {
    fn default() -> Self {
        Self {
            alternatives: vec!["*".to_string()],
        }
    }
}

impl fmt::Display for FilePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.alternatives.join(";"))
    }
}

/// Greedy `*`/`?` matcher with single-star backtracking.
fn wildcard_match(pattern: &[char], text: &[char], ignore_case: bool) -> bool {
    let same = |a: char, b: char| {
        if ignore_case {
            a.eq_ignore_ascii_case(&b)
        } else {
            a == b
        }
    };

    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len()
            && (pattern[p] == '?' || same(pattern[p], text[t]))
        {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = star {
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}

/// True if a file or directory with this name is never embedded.
pub fn is_ignored_name(name: &str, config: &ScanConfig) -> bool {
    name.starts_with('.')
        || config
            .ignored_suffixes
            .iter()
            .any(|suffix| ends_with_ignore_case(name, suffix))
}

fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    if suffix.len() > name.len() {
        return false;
    }
    let start = name.len() - suffix.len();
    name.is_char_boundary(start) && name[start..].eq_ignore_ascii_case(suffix)
}

/// True if a walk error can be passed over rather than ending the scan.
fn is_skippable(err: &walkdir::Error, config: &ScanConfig) -> bool {
    if err.depth() == 0 {
        return false;
    }
    if err.loop_ancestor().is_some() {
        return true;
    }
    // dangling symlink
    if err.io_error().is_some_and(|e| e.kind() == io::ErrorKind::NotFound) {
        return true;
    }
    err.path()
        .and_then(Path::file_name)
        .is_some_and(|name| is_ignored_name(&name.to_string_lossy(), config))
}

/// Enumerate the files under `root` that match `pattern` and survive the
/// exclusion rules.
///
/// Returns [`ScanError::NoFilesFound`] rather than an empty list so callers
/// can stop before touching any output.
pub fn scan(
    root: &Path,
    pattern: &FilePattern,
    config: &ScanConfig,
) -> Result<Vec<SourceFile>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::DirectoryNotFound(root.to_path_buf()));
    }

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !is_ignored_name(&e.file_name().to_string_lossy(), config)
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if is_skippable(&err, config) => continue,
            Err(err) => return Err(err.into()),
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if !pattern.matches(&entry.file_name().to_string_lossy()) {
            continue;
        }

        let metadata = entry.metadata()?;
        if metadata.len() == 0 {
            continue;
        }

        let rel_path = entry
            .path()
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(entry.file_name()));

        files.push(SourceFile {
            path: entry.path().to_path_buf(),
            rel_path,
            len: metadata.len(),
            modified: metadata.modified()?,
        });
    }

    if files.is_empty() {
        return Err(ScanError::NoFilesFound(root.to_path_buf()));
    }
    Ok(files)
}
