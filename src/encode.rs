//! Byte-array encoding of a single file.
//!
//! Each file contributes two pieces of text: a declaration in the shared
//! header and an anonymous array plus accessor definition in the current
//! output unit. Arrays are named `temp1`, `temp2`, ... by a counter owned by
//! the [`Encoder`]; one encoder lives for the whole run, so the counter keeps
//! climbing across unit boundaries and no two units define the same array.

use crate::codegen::{self, CodeStyle};
use crate::split::OutputUnit;
use crate::types::{EncodedEntry, Identifier, SourceFile};
use std::fs;
use std::io::{self, Write};

pub struct Encoder {
    class_name: String,
    style: CodeStyle,
    next_array: u32,
}

impl Encoder {
    pub fn new(class_name: &str, style: CodeStyle) -> Self {
        Self {
            class_name: class_name.to_string(),
            style,
            next_array: 1,
        }
    }

    /// Number of arrays emitted so far.
    pub fn arrays_written(&self) -> u32 {
        self.next_array - 1
    }

    /// Read `file` from disk and encode it into `header` and `unit`.
    pub fn encode(
        &mut self,
        file: &SourceFile,
        identifier: Identifier,
        header: &mut impl Write,
        unit: &mut OutputUnit,
    ) -> io::Result<EncodedEntry> {
        let data = fs::read(&file.path)?;
        let unit_number = unit.number();
        self.encode_data(file, identifier, &data, header, unit, unit_number)
    }

    /// Encode already-loaded bytes. The size recorded is `data.len()`, which
    /// may differ from the scan-time length if the file changed in between.
    pub fn encode_data(
        &mut self,
        file: &SourceFile,
        identifier: Identifier,
        data: &[u8],
        header: &mut impl Write,
        unit: &mut impl Write,
        unit_number: u32,
    ) -> io::Result<EncodedEntry> {
        let size = data.len() as u64;
        let index = self.next_array;
        self.next_array += 1;

        codegen::write_header_declaration(header, &identifier, size, self.style)?;
        codegen::write_byte_array(unit, index, data, self.style)?;
        codegen::write_accessor_definition(
            unit,
            &self.class_name,
            &identifier,
            index,
            self.style,
        )?;

        Ok(EncodedEntry {
            file: file.clone(),
            identifier,
            array_index: index,
            unit: unit_number,
            size,
        })
    }
}
