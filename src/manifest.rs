//! The `info[]` table describing every embedded file.
//!
//! Written once, into the last unit, after all arrays exist:
//!
//! ```text
//! Assets::Info Assets::info[]  = {
//!     { "icon.png", "", Assets::icon_png, 500 },
//!     { "app.png", "ui/icons", Assets::ui_icons_app_png, 1234 },
//! };
//!
//! int Assets::infoSize = 2;
//! ```
//!
//! Rows follow scan order. The path column is the file's directory relative
//! to the source root, empty for files at the root.

use crate::codegen::{CodeStyle, c_string_literal};
use crate::types::{EncodedEntry, Identifier};
use std::io::{self, Write};

/// One row of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    pub name: String,
    pub path: String,
    pub identifier: Identifier,
    pub size: u64,
}

impl From<&EncodedEntry> for ManifestRow {
    fn from(entry: &EncodedEntry) -> Self {
        Self {
            name: entry.file.file_name(),
            path: entry.file.rel_dir(),
            identifier: entry.identifier.clone(),
            size: entry.size,
        }
    }
}

pub fn manifest_rows(entries: &[EncodedEntry]) -> Vec<ManifestRow> {
    entries.iter().map(ManifestRow::from).collect()
}

pub fn write_manifest(
    w: &mut impl Write,
    class_name: &str,
    entries: &[EncodedEntry],
    style: CodeStyle,
) -> io::Result<()> {
    let eol = style.eol;
    let rows = manifest_rows(entries);

    write!(w, "{class_name}::Info {class_name}::info[]  = {{{eol}")?;
    for row in &rows {
        write!(
            w,
            "    {{ {}, {}, {class_name}::{}, {} }},{eol}",
            c_string_literal(&row.name),
            c_string_literal(&row.path),
            row.identifier,
            row.size
        )?;
    }
    write!(w, "}};{eol}{eol}")?;
    write!(w, "int {class_name}::infoSize = {};{eol}", rows.len())
}
