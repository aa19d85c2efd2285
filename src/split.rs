//! Output unit management.
//!
//! Generated data is spread across numbered units (`Assets1.cpp`,
//! `Assets2.cpp`, ...) so no single translation unit grows unbounded. After
//! every file the splitter checks the current unit's size; once it reaches the
//! threshold the unit is flushed, sealed, and a successor opened. Units are
//! written strictly in order and never reopened.
//!
//! ## Wrapper Stubs
//!
//! Each unit gets a one-line `AssetsNWrapper.cpp` that just includes it. Build
//! files list the wrappers, not the units, so a project can reference a fixed
//! number of wrappers: [`OutputSplitter::finish`] writes empty wrappers for
//! every number up to the configured minimum that no unit reached.
//!
//! ## Output Log
//!
//! Every path is reported to an [`OutputLog`] before its file is created, so
//! a run that dies partway still leaves a list of what it may have written.

use crate::codegen::{self, CodeStyle};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Couldn't open {} for writing: {source}", .path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Create (truncate) `path` for buffered writing.
pub fn create_output(path: &Path) -> Result<BufWriter<File>, OutputError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| OutputError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })
}

fn write_wrapper(path: &Path, contents: &str) -> Result<(), OutputError> {
    fs::write(path, contents).map_err(|source| OutputError::OpenFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Told about every output path before the file is created.
pub trait OutputLog {
    fn will_create(&mut self, path: &Path) -> io::Result<()>;
}

impl OutputLog for Vec<PathBuf> {
    fn will_create(&mut self, path: &Path) -> io::Result<()> {
        self.push(path.to_path_buf());
        Ok(())
    }
}

/// One numbered `.cpp` unit with a running byte count.
pub struct OutputUnit {
    number: u32,
    path: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl OutputUnit {
    /// Create unit `number` in `dir` and write its preamble.
    pub fn create(
        dir: &Path,
        class_name: &str,
        number: u32,
        style: CodeStyle,
    ) -> Result<Self, OutputError> {
        let path = dir.join(codegen::unit_file_name(class_name, number));
        let writer = create_output(&path)?;
        let mut unit = Self {
            number,
            path,
            writer,
            written: 0,
        };
        codegen::write_unit_preamble(&mut unit, class_name, style)?;
        Ok(unit)
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes written so far, buffered or not.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl Write for OutputUnit {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.writer.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// A unit that has been closed, with its final size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedUnit {
    pub number: u32,
    pub path: PathBuf,
    pub size: u64,
}

/// What the splitter produced over a run.
#[derive(Debug, Clone, Default)]
pub struct SplitSummary {
    /// Every unit in order; the last one holds the manifest table.
    pub units: Vec<SealedUnit>,
    /// Wrapper stubs for populated units, in order.
    pub wrappers: Vec<PathBuf>,
    /// Empty wrapper stubs written to reach the minimum count.
    pub padded: Vec<PathBuf>,
}

impl SplitSummary {
    /// Every file the splitter created.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.units
            .iter()
            .map(|u| u.path.as_path())
            .chain(self.wrappers.iter().map(PathBuf::as_path))
            .chain(self.padded.iter().map(PathBuf::as_path))
    }
}

pub struct OutputSplitter<'a> {
    log: &'a mut dyn OutputLog,
    dir: PathBuf,
    class_name: String,
    style: CodeStyle,
    threshold: u64,
    current: OutputUnit,
    summary: SplitSummary,
}

impl<'a> OutputSplitter<'a> {
    /// Open unit 1 and its wrapper.
    pub fn open(
        dir: &Path,
        class_name: &str,
        style: CodeStyle,
        threshold: u64,
        log: &'a mut dyn OutputLog,
    ) -> Result<Self, OutputError> {
        let mut summary = SplitSummary::default();
        let current = Self::open_unit(dir, class_name, 1, style, &mut summary, &mut *log)?;
        Ok(Self {
            log,
            dir: dir.to_path_buf(),
            class_name: class_name.to_string(),
            style,
            threshold,
            current,
            summary,
        })
    }

    fn open_unit(
        dir: &Path,
        class_name: &str,
        number: u32,
        style: CodeStyle,
        summary: &mut SplitSummary,
        log: &mut (dyn OutputLog + 'a),
    ) -> Result<OutputUnit, OutputError> {
        let wrapper = dir.join(codegen::wrapper_file_name(class_name, number));
        log.will_create(&wrapper)?;
        write_wrapper(&wrapper, &codegen::wrapper_include(class_name, number))?;
        summary.wrappers.push(wrapper);
        log.will_create(&dir.join(codegen::unit_file_name(class_name, number)))?;
        OutputUnit::create(dir, class_name, number, style)
    }

    pub fn current(&mut self) -> &mut OutputUnit {
        &mut self.current
    }

    /// Seal the current unit if it has reached the threshold.
    ///
    /// Returns the number of the newly opened unit when a split happened.
    pub fn after_file(&mut self) -> Result<Option<u32>, OutputError> {
        if self.current.written() < self.threshold {
            return Ok(None);
        }

        self.current.flush()?;
        let next_number = self.current.number() + 1;
        let next = Self::open_unit(
            &self.dir,
            &self.class_name,
            next_number,
            self.style,
            &mut self.summary,
            &mut *self.log,
        )?;
        let sealed = std::mem::replace(&mut self.current, next);
        self.summary.units.push(SealedUnit {
            number: sealed.number,
            path: sealed.path,
            size: sealed.written,
        });
        Ok(Some(next_number))
    }

    /// Flush the last unit and pad wrappers up to `min_units`.
    pub fn finish(self, min_units: u32) -> Result<SplitSummary, OutputError> {
        let Self {
            log,
            dir,
            class_name,
            mut current,
            mut summary,
            ..
        } = self;

        current.flush()?;
        let last = current.number;
        summary.units.push(SealedUnit {
            number: current.number,
            path: current.path.clone(),
            size: current.written,
        });
        drop(current);

        for number in (last + 1)..=min_units {
            let wrapper = dir.join(codegen::wrapper_file_name(&class_name, number));
            log.will_create(&wrapper)?;
            write_wrapper(&wrapper, codegen::EMPTY_WRAPPER)?;
            summary.padded.push(wrapper);
        }
        Ok(summary)
    }
}
