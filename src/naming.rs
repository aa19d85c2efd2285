//! Identifier generation for embedded files.
//!
//! Every embedded file is exposed as a C++ symbol derived from its name:
//!
//! - `icon.png` → `icon_png`
//! - `my font.ttf` → `my_font_ttf`
//! - `8bit.wav` → `_8bit_wav` (leading digit gets an underscore)
//! - `delete` → `_delete` (so do C++ keywords)
//! - `ui/icons/app.png` with directory prefixes → `ui_icons_app_png`
//!
//! Sanitization maps space, `.`, `/` and `\` to `_` and drops everything else
//! outside `[A-Za-z0-9_]`, so two distinct files can end up with the same
//! name (`a-b.txt` and `ab.txt` both become `ab_txt`). [`check_unique`]
//! catches that before anything is written, since the generated header would
//! otherwise fail to compile with a duplicate symbol.

use crate::types::{self, Identifier, SourceFile};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Names the generated header declares for its own use.
const RESERVED: &[&str] = &["Info", "info", "infoSize"];

#[derive(Error, Debug)]
pub enum NamingError {
    #[error(
        "Identifier '{identifier}' is generated for both {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateIdentifier {
        identifier: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("Identifier '{identifier}' for {} clashes with a generated name", .path.display())]
    Reserved { identifier: String, path: PathBuf },
}

/// Replace separators with `_` and drop anything that can't appear in a
/// C++ identifier.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            ' ' | '.' | '/' | '\\' => '_',
            c => c,
        })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Derive the symbol name for `file`.
///
/// With `include_directory_prefix`, the file's directory relative to
/// `source_root` is sanitized and prepended. Files directly in the root, or
/// whose parent lies outside it, get no prefix.
pub fn generate_identifier(
    file: &SourceFile,
    source_root: &Path,
    include_directory_prefix: bool,
) -> Identifier {
    let mut name = sanitize(&file.file_name());

    if include_directory_prefix
        && let Some(dir) = relative_parent(&file.path, source_root)
    {
        let prefix = sanitize(&dir);
        if !prefix.is_empty() {
            name = format!("{prefix}_{name}");
        }
    }

    if name.is_empty() {
        name.push('_');
    } else if name.starts_with(|c: char| c.is_ascii_digit()) || types::is_cpp_keyword(&name) {
        name.insert(0, '_');
    }

    Identifier::new_unchecked(name)
}

/// Parent directory of `path` relative to `root`, `/`-separated.
///
/// `None` when the parent is the root itself or escapes it.
fn relative_parent(path: &Path, root: &Path) -> Option<String> {
    let parent = path.parent()?;
    let rel = parent.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Reject any run in which two files would declare the same symbol.
///
/// Each file declares both `<id>` and `<id>Size`, so `logo` and `logoSize`
/// clash just as two `logo`s do.
pub fn check_unique<'a>(
    entries: impl IntoIterator<Item = (&'a SourceFile, &'a Identifier)>,
) -> Result<(), NamingError> {
    let mut seen: HashMap<String, &'a Path> = HashMap::new();

    for (file, id) in entries {
        if RESERVED.contains(&id.as_str()) {
            return Err(NamingError::Reserved {
                identifier: id.to_string(),
                path: file.rel_path.clone(),
            });
        }
        for symbol in [id.to_string(), format!("{id}Size")] {
            if let Some(first) = seen.insert(symbol.clone(), &file.rel_path) {
                return Err(NamingError::DuplicateIdentifier {
                    identifier: symbol,
                    first: first.to_path_buf(),
                    second: file.rel_path.clone(),
                });
            }
        }
    }
    Ok(())
}
