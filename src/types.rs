//! Shared types passed between the pipeline components.
//!
//! The scanner produces [`SourceFile`]s, the naming module turns each into an
//! [`Identifier`], and the encoder pairs the two into an [`EncodedEntry`] that
//! the manifest emitter consumes once every unit has been written.

use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

/// A file selected for embedding.
///
/// Immutable once enumerated by [`scan`](crate::scan::scan).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Path relative to the source root, e.g. `icons/app.png`.
    pub rel_path: PathBuf,
    /// Size in bytes at scan time. Always non-zero.
    pub len: u64,
    /// Last modification time at scan time.
    pub modified: SystemTime,
}

impl SourceFile {
    /// Base file name as written into the manifest table.
    pub fn file_name(&self) -> String {
        self.rel_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Parent directory relative to the source root, `/`-separated.
    ///
    /// Empty for files sitting directly in the root.
    pub fn rel_dir(&self) -> String {
        self.rel_path
            .parent()
            .map(|p| {
                p.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default()
    }

    /// Root-relative path, `/`-separated. Used as a stable key in the
    /// generation record.
    pub fn rel_key(&self) -> String {
        self.rel_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// C++ keywords and alternative operator tokens, which can't name a symbol.
const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "co_await",
    "co_return", "co_yield", "compl", "concept", "const", "const_cast", "consteval",
    "constexpr", "constinit", "continue", "decltype", "default", "delete", "do", "double",
    "dynamic_cast", "else", "enum", "explicit", "export", "extern", "false", "float", "for",
    "friend", "goto", "if", "inline", "int", "long", "mutable", "namespace", "new",
    "noexcept", "not", "not_eq", "nullptr", "operator", "or", "or_eq", "private",
    "protected", "public", "register", "reinterpret_cast", "requires", "return", "short",
    "signed", "sizeof", "static", "static_assert", "static_cast", "struct", "switch",
    "template", "this", "thread_local", "throw", "true", "try", "typedef", "typeid",
    "typename", "union", "unsigned", "using", "virtual", "void", "volatile", "wchar_t",
    "while", "xor", "xor_eq",
];

pub fn is_cpp_keyword(name: &str) -> bool {
    CPP_KEYWORDS.contains(&name)
}

/// A C++-safe symbol name matching `[A-Za-z_][A-Za-z0-9_]*` that is not a
/// keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    /// Wrap an already-sanitized name. Callers outside [`naming`](crate::naming)
    /// should go through [`Identifier::parse`].
    pub(crate) fn new_unchecked(name: String) -> Self {
        Self(name)
    }

    /// Accept `name` only if it is a valid identifier.
    pub fn parse(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let first = chars.next()?;
        if !(first.is_ascii_alphabetic() || first == '_') {
            return None;
        }
        if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !is_cpp_keyword(name) {
            Some(Self(name.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One file after encoding: what the manifest table needs to describe it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedEntry {
    pub file: SourceFile,
    pub identifier: Identifier,
    /// Ordinal of the anonymous `temp<N>` array holding the bytes.
    pub array_index: u32,
    /// Number of the output unit the array was written into (1-based).
    pub unit: u32,
    /// Payload size, excluding the two sentinel zero bytes.
    pub size: u64,
}
