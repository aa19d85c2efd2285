//! # Binary Builder
//!
//! Turns a directory of arbitrary files into C++ sources that embed each
//! file's bytes, so assets can be linked straight into an executable with no
//! runtime filesystem access.
//!
//! # Architecture: Single-Pass Pipeline
//!
//! ```text
//! 1. Scan       source/   →  [SourceFile]         (filter hidden, empty, VCS)
//! 2. Name       SourceFile →  Identifier          (sanitize, reject collisions)
//! 3. Gate       header mtime + record             (skip if nothing changed)
//! 4. Encode     bytes     →  tempN[] + accessor   (into the current unit)
//! 5. Split      unit size ≥ threshold → next unit (+ wrapper stub)
//! 6. Manifest   entries   →  info[] table          (into the last unit)
//! ```
//!
//! Everything runs on one thread, in order. The only state carried between
//! files is the encoder's array counter and the splitter's current unit,
//! both owned by [`generate::generate`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the source tree, applies the wildcard pattern and exclusion rules |
//! | [`naming`] | Derives C++ identifiers from paths and detects collisions |
//! | [`encode`] | Writes one file as a byte array plus its declaration and accessor |
//! | [`split`] | Owns the numbered output units and their wrapper stubs |
//! | [`stale`] | Decides whether a run is needed; persists the generation record |
//! | [`manifest`] | Emits the `info[]` table describing every embedded file |
//! | [`codegen`] | The literal C++ text for every generated fragment |
//! | [`generate`] | Runs the pipeline; defines [`generate::BuildError`] |
//! | [`config`] | Optional TOML settings (split threshold, line endings, ignores) |
//! | [`output`] | Console formatting of progress events and the final summary |
//! | [`types`] | Data shared between stages (`SourceFile`, `Identifier`, `EncodedEntry`) |
//!
//! # Design Decisions
//!
//! ## Wrapper Stubs
//!
//! Build systems that list sources statically can't know how many units a
//! run will produce. They list `Class1Wrapper.cpp` … `ClassNWrapper.cpp`
//! instead; each wrapper includes its unit, and wrappers past the last real
//! unit are written empty.
//!
//! ## Collisions Are Errors
//!
//! Sanitization is lossy, so `a-b.txt` and `ab.txt` both map to `ab_txt`.
//! Rather than invent a disambiguation scheme that would make symbol names
//! depend on which other files exist, the run stops before writing and names
//! both files. `-addpath` or a rename resolves it.
//!
//! ## Exact Cleanup
//!
//! Each run records the files it wrote in `<Class>.units.json`. The next
//! regeneration deletes exactly those, so a run that produced five units
//! followed by one that produces two leaves no stale `Class3.cpp` behind.
//! The record is rewritten before each output is created, so this also holds
//! after a run that failed halfway.

pub mod codegen;
pub mod config;
pub mod encode;
pub mod generate;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod scan;
pub mod split;
pub mod stale;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
