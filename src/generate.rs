//! The generation pipeline.
//!
//! Ties the components together for one run:
//!
//! ```text
//! scan → identifiers → uniqueness check → staleness gate
//!      → start journal → delete previous outputs → header + units (encode, split per file)
//!      → manifest table → pad wrappers → close header → save record
//! ```
//!
//! Everything that can fail without touching the target directory (missing
//! directories, bad class name, no files, identifier collisions) is checked
//! before the first write. After that an I/O failure stops the run and leaves
//! whatever was already flushed on disk; the journal lists those files so the
//! next run removes them.

use crate::codegen::{self, CodeStyle};
use crate::config::{ConfigError, GeneratorConfig};
use crate::encode::Encoder;
use crate::manifest;
use crate::naming::{self, NamingError};
use crate::scan::{self, FilePattern, ScanError};
use crate::split::{self, OutputError, OutputSplitter};
use crate::stale::{self, GenerationRecord, OutputJournal};
use crate::types::{EncodedEntry, Identifier};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Naming(#[from] NamingError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("Destination directory doesn't exist: {0}")]
    DestinationNotFound(PathBuf),
    #[error("Class name '{0}' is not a valid C++ identifier")]
    InvalidClassName(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything one run needs to know.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    pub class_name: String,
    /// Minimum number of wrapper stubs to leave in the target directory.
    pub min_units: u32,
    /// Prefix identifiers with the file's directory.
    pub add_path: bool,
    pub pattern: FilePattern,
    /// Regenerate even if outputs look up to date.
    pub force: bool,
    pub config: GeneratorConfig,
}

/// Progress notifications, in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    Started {
        header: PathBuf,
        source_dir: PathBuf,
        file_count: usize,
    },
    PreviousOutputRemoved {
        path: PathBuf,
    },
    FileAdded {
        identifier: String,
        size: u64,
    },
    UnitOpened {
        number: u32,
        path: PathBuf,
    },
    WrapperPadded {
        number: u32,
        path: PathBuf,
    },
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub header: PathBuf,
    pub entries: Vec<EncodedEntry>,
    pub units: Vec<split::SealedUnit>,
    pub wrappers: usize,
    pub padded: usize,
    pub total_bytes: u64,
}

#[derive(Debug, Clone)]
pub enum BuildOutcome {
    /// Outputs already reflect the sources; nothing was written.
    UpToDate { file_count: usize },
    Generated(BuildSummary),
}

/// The options that shape generated text. A change to any of them forces a
/// rebuild even when no source changed.
#[derive(Serialize)]
struct Fingerprint<'a> {
    class_name: &'a str,
    min_units: u32,
    add_path: bool,
    pattern: String,
    config: &'a GeneratorConfig,
}

/// Run the pipeline with `options`, reporting progress to `on_event`.
pub fn generate(
    options: &BuildOptions,
    mut on_event: impl FnMut(&BuildEvent),
) -> Result<BuildOutcome, BuildError> {
    let class_name = options.class_name.trim();
    if Identifier::parse(class_name).is_none() {
        return Err(BuildError::InvalidClassName(class_name.to_string()));
    }
    if !options.source_dir.is_dir() {
        return Err(ScanError::DirectoryNotFound(options.source_dir.clone()).into());
    }
    if !options.target_dir.is_dir() {
        return Err(BuildError::DestinationNotFound(options.target_dir.clone()));
    }
    options.config.validate()?;

    let files = scan::scan(&options.source_dir, &options.pattern, &options.config.scan)?;
    let identifiers: Vec<Identifier> = files
        .iter()
        .map(|f| naming::generate_identifier(f, &options.source_dir, options.add_path))
        .collect();
    naming::check_unique(files.iter().zip(identifiers.iter()))?;

    let target = options.target_dir.as_path();
    let header_path = target.join(codegen::header_file_name(class_name));
    let sources: Vec<String> = files.iter().map(|f| f.rel_key()).collect();
    let options_hash = stale::fingerprint(&Fingerprint {
        class_name,
        min_units: options.min_units,
        add_path: options.add_path,
        pattern: options.pattern.to_string(),
        config: &options.config,
    })?;

    let previous = GenerationRecord::load(target, class_name);
    let record_current = previous
        .as_ref()
        .is_some_and(|r| r.is_current(&options_hash, &sources));
    if !options.force && record_current && !stale::needs_regeneration(&header_path, &files) {
        return Ok(BuildOutcome::UpToDate {
            file_count: files.len(),
        });
    }

    on_event(&BuildEvent::Started {
        header: header_path.clone(),
        source_dir: options.source_dir.clone(),
        file_count: files.len(),
    });

    let mut journal = OutputJournal::begin(target, class_name, previous.as_ref())?;
    if let Some(previous) = &previous {
        for path in previous.remove_outputs(target)? {
            on_event(&BuildEvent::PreviousOutputRemoved { path });
        }
    }
    remove_if_exists(&header_path)?;

    let style = CodeStyle::from_config(&options.config.output);
    journal.add(&header_path)?;
    let mut header = split::create_output(&header_path)?;
    codegen::write_header_preamble(&mut header, class_name, style)?;

    let mut splitter = OutputSplitter::open(
        target,
        class_name,
        style,
        options.config.output.split_threshold,
        &mut journal,
    )?;
    on_event(&BuildEvent::UnitOpened {
        number: 1,
        path: splitter.current().path().to_path_buf(),
    });

    let mut encoder = Encoder::new(class_name, style);
    let mut entries = Vec::with_capacity(files.len());
    let mut total_bytes = 0u64;

    for (file, identifier) in files.iter().zip(identifiers) {
        let entry = encoder.encode(file, identifier, &mut header, splitter.current())?;
        on_event(&BuildEvent::FileAdded {
            identifier: entry.identifier.to_string(),
            size: entry.size,
        });
        total_bytes += entry.size;
        entries.push(entry);

        if let Some(number) = splitter.after_file()? {
            on_event(&BuildEvent::UnitOpened {
                number,
                path: splitter.current().path().to_path_buf(),
            });
        }
    }

    manifest::write_manifest(splitter.current(), class_name, &entries, style)?;
    let split_summary = splitter.finish(options.min_units)?;
    for (i, path) in split_summary.padded.iter().enumerate() {
        on_event(&BuildEvent::WrapperPadded {
            number: split_summary.units.len() as u32 + i as u32 + 1,
            path: path.clone(),
        });
    }

    // Header is closed last so its mtime is not older than any unit.
    codegen::write_header_footer(&mut header, style)?;
    header.flush()?;
    drop(header);

    journal.complete(options_hash, sources)?;

    Ok(BuildOutcome::Generated(BuildSummary {
        header: header_path,
        entries,
        wrappers: split_summary.wrappers.len(),
        padded: split_summary.padded.len(),
        units: split_summary.units,
        total_bytes,
    }))
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
