//! Shared test utilities.
//!
//! Builders for throwaway source trees and readers that pull data back out
//! of generated C++ so tests can check round-trips without a compiler.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::time::SystemTime;

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

pub fn assert_dir_empty(dir: &Path) {
    let names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(names.is_empty(), "expected {} to be empty, found {names:?}", dir.display());
}

/// File name → modification time for every file in `dir`.
pub fn snapshot_mtimes(dir: &Path) -> BTreeMap<String, SystemTime> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| {
            let e = e.unwrap();
            (
                e.file_name().to_string_lossy().into_owned(),
                e.metadata().unwrap().modified().unwrap(),
            )
        })
        .collect()
}

// =========================================================================
// Generated source readers
// =========================================================================

/// Parse every `static const unsigned char tempN[] = {...};` in `source`
/// into `N → bytes`, with the two trailing sentinel zeros removed.
pub fn decode_arrays(source: &str) -> HashMap<u32, Vec<u8>> {
    let mut arrays = HashMap::new();
    let mut rest = source;
    let marker = "static const unsigned char temp";

    while let Some(start) = rest.find(marker) {
        rest = &rest[start + marker.len()..];
        let open = rest.find("[] = {").expect("array opener");
        let index: u32 = rest[..open].parse().expect("array index");
        rest = &rest[open + "[] = {".len()..];
        let close = rest.find("};").expect("array close");

        let mut values: Vec<u8> = rest[..close]
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| v.parse().expect("byte literal"))
            .collect();
        assert!(values.len() >= 2, "array temp{index} missing sentinels");
        let sentinels = values.split_off(values.len() - 2);
        assert_eq!(sentinels, vec![0, 0], "array temp{index} sentinels");

        arrays.insert(index, values);
        rest = &rest[close..];
    }
    arrays
}

/// Parse `const char* Class::name = (const char*) tempN;` definitions into
/// `name → N`.
pub fn decode_accessors(source: &str) -> HashMap<String, u32> {
    source
        .lines()
        .filter_map(|line| {
            let line = line.trim_end_matches('\r');
            let rest = line.strip_prefix("const char* ")?;
            let (qualified, target) = rest.split_once(" = (const char*) temp")?;
            let name = qualified.rsplit("::").next()?;
            let index = target.strip_suffix(';')?.parse().ok()?;
            Some((name.to_string(), index))
        })
        .collect()
}

/// Count manifest rows in a unit holding the `info[]` table.
pub fn manifest_row_count(source: &str) -> usize {
    let Some(start) = source.find("::info[]  = {") else {
        return 0;
    };
    let table = &source[start..];
    let end = table.find("};").unwrap_or(table.len());
    table[..end]
        .lines()
        .filter(|l| l.trim_start().starts_with("{ "))
        .count()
}
