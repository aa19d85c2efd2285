//! Console output for a generation run.
//!
//! Each message has a `format_*` function that returns lines (pure, testable)
//! and the binary prints them. Progress arrives as
//! [`BuildEvent`](crate::generate::BuildEvent)s while the pipeline runs; the
//! summary is formatted from the final [`BuildOutcome`](crate::generate::BuildOutcome).
//!
//! ```text
//! Creating out/Assets.h from 2 files in assets/...
//!
//! Adding icon_png: 500 bytes
//! Adding logo_svg: 1834 bytes
//!
//! Total size of binary data: 2334 bytes in 1 unit
//! ```

use crate::generate::{BuildEvent, BuildOutcome, BuildSummary};
use std::path::Path;

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Lines for a single progress event.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::Started {
            header,
            source_dir,
            file_count,
        } => vec![
            format!(
                "Creating {} from {} in {}...",
                header.display(),
                plural(*file_count, "file", "files"),
                source_dir.display()
            ),
            String::new(),
        ],
        BuildEvent::PreviousOutputRemoved { path } => {
            vec![format!("Removed previous output {}", file_name(path))]
        }
        BuildEvent::FileAdded { identifier, size } => {
            vec![format!("Adding {identifier}: {size} bytes")]
        }
        // unit 1 is implied by the Started line
        BuildEvent::UnitOpened { number: 1, .. } => Vec::new(),
        BuildEvent::UnitOpened { number, path } => {
            vec![format!("Starting unit {number}: {}", file_name(path))]
        }
        BuildEvent::WrapperPadded { number, path } => {
            vec![format!(
                "Created empty wrapper {} for unit {number}",
                file_name(path)
            )]
        }
    }
}

/// Closing lines after a run.
pub fn format_outcome(outcome: &BuildOutcome) -> Vec<String> {
    match outcome {
        BuildOutcome::UpToDate { .. } => {
            vec!["No processing required. No files updated".to_string()]
        }
        BuildOutcome::Generated(summary) => format_summary(summary),
    }
}

fn format_summary(summary: &BuildSummary) -> Vec<String> {
    vec![
        String::new(),
        format!(
            "Total size of binary data: {} bytes in {}",
            summary.total_bytes,
            plural(summary.units.len(), "unit", "units")
        ),
    ]
}

pub fn print_build_event(event: &BuildEvent) {
    for line in format_build_event(event) {
        println!("{line}");
    }
}

pub fn print_outcome(outcome: &BuildOutcome) {
    for line in format_outcome(outcome) {
        println!("{line}");
    }
}
