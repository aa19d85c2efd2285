//! Incremental rebuild decision and the generation record.
//!
//! Regeneration is all-or-nothing. A run is skipped only when:
//!
//! 1. the header exists and no source file is newer than it
//!    ([`needs_regeneration`] returns false), and
//! 2. the generation record from the previous run still describes this run:
//!    same options fingerprint, same list of embedded sources.
//!
//! The second check catches what modification times cannot: a deleted or
//! renamed source file, or a changed flag such as `-addpath`.
//!
//! ## Generation Record
//!
//! The record is a JSON file at `<target>/<Class>.units.json`. Besides the
//! inputs it lists every file the run wrote (header, units, wrappers), so the
//! next regeneration can delete exactly those instead of probing for numbered
//! leftovers. A missing, corrupt, or older-version record reads as `None` and
//! forces a rebuild.
//!
//! While a run is writing, [`OutputJournal`] keeps the record on disk listing
//! the previous run's outputs plus everything created so far, under an empty
//! options hash. A run that fails partway therefore still reads as stale, and
//! the next run deletes whatever it left behind.

use crate::split::OutputLog;
use crate::types::SourceFile;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Version of the record format. Bump to force a rebuild everywhere when
/// the format or fingerprint inputs change.
const RECORD_VERSION: u32 = 1;

pub fn record_file_name(class_name: &str) -> String {
    format!("{class_name}.units.json")
}

/// True if the header is missing or any source is strictly newer than it.
pub fn needs_regeneration(header_path: &Path, files: &[SourceFile]) -> bool {
    let header_time = match fs::metadata(header_path) {
        Ok(meta) if meta.is_file() => match meta.modified() {
            Ok(t) => t,
            Err(_) => return true,
        },
        _ => return true,
    };
    files.iter().any(|f| f.modified > header_time)
}

/// SHA-256 of the JSON encoding of `options`, as hex.
pub fn fingerprint(options: &impl Serialize) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(options)?;
    Ok(format!("{:x}", Sha256::digest(&json)))
}

/// Inputs and outputs of the last successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub version: u32,
    pub options_hash: String,
    /// Root-relative source paths in embedding order.
    pub sources: Vec<String>,
    /// File names (relative to the target directory) written by the run.
    pub outputs: Vec<String>,
}

impl GenerationRecord {
    pub fn new(options_hash: String, sources: Vec<String>, outputs: Vec<String>) -> Self {
        Self {
            version: RECORD_VERSION,
            options_hash,
            sources,
            outputs,
        }
    }

    /// Load the record for `class_name`, or `None` if it is missing, corrupt,
    /// or from another format version.
    pub fn load(target_dir: &Path, class_name: &str) -> Option<Self> {
        let content = fs::read_to_string(target_dir.join(record_file_name(class_name))).ok()?;
        let record: Self = serde_json::from_str(&content).ok()?;
        (record.version == RECORD_VERSION).then_some(record)
    }

    pub fn save(&self, target_dir: &Path, class_name: &str) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(target_dir.join(record_file_name(class_name)), json)
    }

    /// Whether this record was produced from the same options and sources.
    pub fn is_current(&self, options_hash: &str, sources: &[String]) -> bool {
        self.options_hash == options_hash && self.sources == sources
    }

    /// Delete every output listed in the record. Already-missing files are
    /// skipped. Returns the paths actually removed.
    pub fn remove_outputs(&self, target_dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut removed = Vec::new();
        for name in &self.outputs {
            // plain file names only; never follow a path out of the target dir
            if Path::new(name).file_name().and_then(|n| n.to_str()) != Some(name.as_str()) {
                continue;
            }
            let path = target_dir.join(name);
            // something else took the name, e.g. a directory; leave it
            if fs::symlink_metadata(&path).is_ok_and(|m| m.is_dir()) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed.push(path),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(removed)
    }
}

/// The generation record of a run still in progress.
pub struct OutputJournal {
    target_dir: PathBuf,
    class_name: String,
    carried: Vec<String>,
    created: Vec<String>,
}

impl OutputJournal {
    /// Start journaling, carrying over the outputs `previous` listed until
    /// the run completes. Saves immediately.
    pub fn begin(
        target_dir: &Path,
        class_name: &str,
        previous: Option<&GenerationRecord>,
    ) -> io::Result<Self> {
        let journal = Self {
            target_dir: target_dir.to_path_buf(),
            class_name: class_name.to_string(),
            carried: previous.map(|r| r.outputs.clone()).unwrap_or_default(),
            created: Vec::new(),
        };
        journal.save()?;
        Ok(journal)
    }

    /// Record that `path` is about to be created.
    pub fn add(&mut self, path: &Path) -> io::Result<()> {
        let Some(name) = path.file_name() else {
            return Ok(());
        };
        let name = name.to_string_lossy().into_owned();
        if !self.created.contains(&name) {
            self.created.push(name);
        }
        self.save()
    }

    /// Replace the journal with the final record of a successful run. Only
    /// outputs created by this run are listed.
    pub fn complete(
        self,
        options_hash: String,
        sources: Vec<String>,
    ) -> io::Result<GenerationRecord> {
        let record = GenerationRecord::new(options_hash, sources, self.created);
        record.save(&self.target_dir, &self.class_name)?;
        Ok(record)
    }

    fn save(&self) -> io::Result<()> {
        let mut outputs = self.carried.clone();
        for name in &self.created {
            if !outputs.contains(name) {
                outputs.push(name.clone());
            }
        }
        GenerationRecord::new(String::new(), Vec::new(), outputs)
            .save(&self.target_dir, &self.class_name)
    }
}

impl OutputLog for OutputJournal {
    fn will_create(&mut self, path: &Path) -> io::Result<()> {
        self.add(path)
    }
}
