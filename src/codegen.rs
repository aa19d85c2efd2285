//! C++ text fragments for the generated header, units, and wrapper stubs.
//!
//! Everything that ends up in a generated file is spelled out here so the
//! layout can be read in one place:
//!
//! ```text
//! Assets.h
//!     /* (Auto-generated binary data file). */
//!     #ifndef BINARY_ASSETS_H / #define BINARY_ASSETS_H
//!     namespace Assets {
//!         struct Info { ... };  extern Info info[];  extern int infoSize;
//!         extern const char*  icon_png;
//!         const int           icon_pngSize = 500;
//!     }
//!     #endif
//!
//! Assets1.cpp
//!     /* (Auto-generated binary data file). */
//!     #include "Assets.h"
//!     static const unsigned char temp1[] = {137,80,78,...,0,0};
//!     const char* Assets::icon_png = (const char*) temp1;
//!     Assets::Info Assets::info[]  = { ... };        (last unit only)
//!     int Assets::infoSize = 1;
//!
//! Assets1Wrapper.cpp
//!     #include "Assets1.cpp"
//! ```

use crate::config::OutputConfig;
use crate::types::Identifier;
use std::io::{self, Write};

const NOTICE: &str = "/* (Auto-generated binary data file). */";

/// Formatting knobs shared by every writer in this module.
#[derive(Debug, Clone, Copy)]
pub struct CodeStyle {
    pub eol: &'static str,
    pub values_per_line: usize,
}

impl CodeStyle {
    pub fn from_config(config: &OutputConfig) -> Self {
        Self {
            eol: config.line_ending.as_str(),
            values_per_line: config.values_per_line.max(1),
        }
    }
}

impl Default for CodeStyle {
    fn default() -> Self {
        Self::from_config(&OutputConfig::default())
    }
}

pub fn header_file_name(class_name: &str) -> String {
    format!("{class_name}.h")
}

pub fn unit_file_name(class_name: &str, unit: u32) -> String {
    format!("{class_name}{unit}.cpp")
}

pub fn wrapper_file_name(class_name: &str, unit: u32) -> String {
    format!("{class_name}{unit}Wrapper.cpp")
}

/// Header opening: notice, include guard, namespace, and the `Info` table
/// declarations.
pub fn write_header_preamble(
    w: &mut impl Write,
    class_name: &str,
    style: CodeStyle,
) -> io::Result<()> {
    let eol = style.eol;
    let guard = format!("BINARY_{}_H", class_name.to_uppercase());
    write!(w, "{NOTICE}{eol}{eol}")?;
    write!(w, "#ifndef {guard}{eol}#define {guard}{eol}{eol}")?;
    write!(w, "namespace {class_name}{eol}{{{eol}{eol}")?;
    write!(
        w,
        "    struct Info {{ const char* name; const char* path; const char* data; int size; }};{eol}"
    )?;
    write!(w, "    extern Info info[];{eol}")?;
    write!(w, "    extern int infoSize;{eol}{eol}")
}

/// Accessor pointer and size constant for one embedded file.
pub fn write_header_declaration(
    w: &mut impl Write,
    id: &Identifier,
    size: u64,
    style: CodeStyle,
) -> io::Result<()> {
    let eol = style.eol;
    write!(w, "    extern const char*  {id};{eol}")?;
    write!(w, "    const int           {id}Size = {size};{eol}{eol}")
}

pub fn write_header_footer(w: &mut impl Write, style: CodeStyle) -> io::Result<()> {
    let eol = style.eol;
    write!(w, "}}{eol}{eol}#endif{eol}")
}

/// First two lines of every numbered unit.
pub fn write_unit_preamble(
    w: &mut impl Write,
    class_name: &str,
    style: CodeStyle,
) -> io::Result<()> {
    let eol = style.eol;
    write!(w, "{NOTICE}{eol}{eol}")?;
    write!(w, "#include \"{}\"{eol}{eol}", header_file_name(class_name))
}

/// Anonymous `temp<N>` array holding `data` as decimal literals, followed
/// by two zero bytes.
pub fn write_byte_array(
    w: &mut impl Write,
    index: u32,
    data: &[u8],
    style: CodeStyle,
) -> io::Result<()> {
    write!(w, "static const unsigned char temp{index}[] = {{")?;

    let last = data.len().saturating_sub(1);
    for (i, byte) in data.iter().enumerate() {
        write!(w, "{byte},")?;
        if i < last && i % style.values_per_line == style.values_per_line - 1 {
            write!(w, "{}  ", style.eol)?;
        }
    }

    write!(w, "0,0}};{}", style.eol)
}

/// Binds the declared accessor to its anonymous array.
pub fn write_accessor_definition(
    w: &mut impl Write,
    class_name: &str,
    id: &Identifier,
    index: u32,
    style: CodeStyle,
) -> io::Result<()> {
    let eol = style.eol;
    write!(
        w,
        "const char* {class_name}::{id} = (const char*) temp{index};{eol}{eol}"
    )
}

/// Contents of the wrapper stub that pulls in a populated unit.
pub fn wrapper_include(class_name: &str, unit: u32) -> String {
    format!("#include \"{}\"\n", unit_file_name(class_name, unit))
}

/// Contents of a padding wrapper for a unit that was never produced.
pub const EMPTY_WRAPPER: &str = "\n";

/// Quote `s` as a C string literal.
pub fn c_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\{:03o}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
