//! End-to-end runs of the generation pipeline against temporary trees.
//!
//! Generated C++ is read back with the helpers in `src/test_helpers.rs`, so
//! byte round-trips are checked without invoking a compiler.

#[allow(dead_code)]
#[path = "../src/test_helpers.rs"]
mod test_helpers;

use binary_builder::config::{DEFAULT_SPLIT_THRESHOLD, GeneratorConfig, LineEnding};
use binary_builder::generate::{BuildOptions, BuildOutcome, BuildSummary, generate};
use binary_builder::scan::{FilePattern, scan};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use test_helpers::*;

fn options(src: &Path, dst: &Path, class_name: &str, min_units: u32) -> BuildOptions {
    BuildOptions {
        source_dir: src.to_path_buf(),
        target_dir: dst.to_path_buf(),
        class_name: class_name.to_string(),
        min_units,
        add_path: false,
        pattern: FilePattern::default(),
        force: false,
        config: GeneratorConfig::default(),
    }
}

fn run(opts: &BuildOptions) -> BuildSummary {
    match generate(opts, |_| {}).unwrap() {
        BuildOutcome::Generated(summary) => summary,
        BuildOutcome::UpToDate { .. } => panic!("expected a generated run"),
    }
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

/// Identifier → decoded bytes across every generated unit.
fn decode_all(summary: &BuildSummary) -> HashMap<String, Vec<u8>> {
    let mut arrays = HashMap::new();
    let mut accessors = HashMap::new();
    for unit in &summary.units {
        let text = fs::read_to_string(&unit.path).unwrap();
        arrays.extend(decode_arrays(&text));
        accessors.extend(decode_accessors(&text));
    }
    accessors
        .into_iter()
        .map(|(name, index)| (name, arrays[&index].clone()))
        .collect()
}

#[test]
fn assets_example_layout() {
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    let icon: Vec<u8> = (0..500u32).map(|i| (i * 7 % 256) as u8).collect();
    write_file(src.path(), "icon.png", &icon);
    write_file(src.path(), ".git/config", &[b'x'; 100]);
    write_file(src.path(), "placeholder.bin", b"");

    let summary = run(&options(src.path(), dst.path(), "Assets", 2));

    assert_eq!(summary.entries.len(), 1);
    assert_eq!(summary.entries[0].identifier.as_str(), "icon_png");
    assert_eq!(summary.units.len(), 1);

    let header = read(dst.path(), "Assets.h");
    assert!(header.contains("namespace Assets\r\n{"));
    assert!(header.contains("    extern const char*  icon_png;\r\n"));
    assert!(header.contains("    const int           icon_pngSize = 500;\r\n"));
    assert!(header.trim_end().ends_with("#endif"));

    let unit = read(dst.path(), "Assets1.cpp");
    assert!(unit.starts_with(
        "/* (Auto-generated binary data file). */\r\n\r\n#include \"Assets.h\"\r\n"
    ));
    assert!(unit.contains("{ \"icon.png\", \"\", Assets::icon_png, 500 },"));
    assert!(unit.contains("int Assets::infoSize = 1;"));
    assert_eq!(manifest_row_count(&unit), 1);

    assert_eq!(read(dst.path(), "Assets1Wrapper.cpp"), "#include \"Assets1.cpp\"\n");
    assert_eq!(read(dst.path(), "Assets2Wrapper.cpp"), "\n");
    assert!(!dst.path().join("Assets2.cpp").exists());
    assert!(!dst.path().join("Assets3Wrapper.cpp").exists());

    let decoded = decode_all(&summary);
    assert_eq!(decoded["icon_png"], icon);
}

#[test]
fn manifest_count_matches_scanner() {
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    write_file(src.path(), "a.bin", b"a");
    write_file(src.path(), "sub/b.bin", b"bb");
    write_file(src.path(), "sub/deeper/c.bin", b"ccc");
    write_file(src.path(), "sub/.hidden", b"h");
    write_file(src.path(), ".svn/entries", b"s");
    write_file(src.path(), "zero.bin", b"");

    let mut opts = options(src.path(), dst.path(), "Assets", 1);
    opts.add_path = true;
    let summary = run(&opts);

    let scanned = scan(src.path(), &FilePattern::default(), &opts.config.scan).unwrap();
    assert_eq!(summary.entries.len(), scanned.len());

    let unit = read(dst.path(), "Assets1.cpp");
    assert_eq!(manifest_row_count(&unit), scanned.len());
    assert!(unit.contains(&format!("int Assets::infoSize = {};", scanned.len())));
    assert!(unit.contains("{ \"c.bin\", \"sub/deeper\", Assets::sub_deeper_c_bin, 3 },"));
}

#[test]
fn excluded_files_absent_everywhere() {
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    write_file(src.path(), "keep.bin", b"keep");
    write_file(src.path(), "empty.bin", b"");
    write_file(src.path(), ".dotfile", b"dot");
    write_file(src.path(), ".private/inner.bin", b"inner");

    run(&options(src.path(), dst.path(), "Assets", 1));

    let header = read(dst.path(), "Assets.h");
    let unit = read(dst.path(), "Assets1.cpp");
    for needle in ["empty", "dotfile", "inner"] {
        assert!(!header.contains(needle), "{needle} leaked into header");
        assert!(!unit.contains(needle), "{needle} leaked into unit");
    }
    assert!(header.contains("keep_bin"));
}

#[test]
fn round_trip_across_many_files() {
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    let mut originals = HashMap::new();
    for i in 0..12u8 {
        let data: Vec<u8> = (0..(i as usize * 97 + 1))
            .map(|j| (j as u8).wrapping_mul(31).wrapping_add(i))
            .collect();
        let name = format!("file{i}.dat");
        write_file(src.path(), &name, &data);
        originals.insert(format!("file{i}_dat"), data);
    }

    let mut opts = options(src.path(), dst.path(), "Assets", 1);
    opts.config.output.split_threshold = 2048;
    let summary = run(&opts);
    assert!(summary.units.len() > 1);

    let decoded = decode_all(&summary);
    assert_eq!(decoded, originals);
}

#[test]
fn array_names_unique_across_units() {
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    for i in 0..5 {
        write_file(src.path(), &format!("f{i}.bin"), &[i as u8 + 1; 300]);
    }
    let mut opts = options(src.path(), dst.path(), "Assets", 1);
    opts.config.output.split_threshold = 1;
    let summary = run(&opts);

    let indices: Vec<u32> = summary.entries.iter().map(|e| e.array_index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4, 5]);
    let units: Vec<u32> = summary.entries.iter().map(|e| e.unit).collect();
    assert_eq!(units, vec![1, 2, 3, 4, 5]);
    assert!(read(dst.path(), "Assets3.cpp").contains("temp3[]"));
}

#[test]
fn second_run_writes_nothing() {
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    write_file(src.path(), "a.bin", b"alpha");
    write_file(src.path(), "b/c.bin", b"gamma");
    let opts = options(src.path(), dst.path(), "Assets", 3);

    run(&opts);
    let before = snapshot_mtimes(dst.path());
    let contents_before = read(dst.path(), "Assets1.cpp");

    let outcome = generate(&opts, |_| {}).unwrap();
    assert!(matches!(outcome, BuildOutcome::UpToDate { file_count: 2 }));
    assert_eq!(snapshot_mtimes(dst.path()), before);
    assert_eq!(read(dst.path(), "Assets1.cpp"), contents_before);
}

#[test]
fn touched_source_triggers_full_regeneration() {
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    write_file(src.path(), "a.bin", b"alpha");
    let opts = options(src.path(), dst.path(), "Assets", 1);
    run(&opts);

    let header_time = fs::metadata(dst.path().join("Assets.h"))
        .unwrap()
        .modified()
        .unwrap();
    let file = fs::File::options()
        .write(true)
        .open(src.path().join("a.bin"))
        .unwrap();
    file.set_modified(header_time + std::time::Duration::from_secs(5))
        .unwrap();
    drop(file);

    assert!(matches!(
        generate(&opts, |_| {}).unwrap(),
        BuildOutcome::Generated(_)
    ));
}

#[test]
fn splitting_at_default_threshold() {
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    // 4 MiB of 255 encodes to 16 MiB of "255," literals
    write_file(src.path(), "big.bin", &vec![255u8; 4 * 1024 * 1024]);
    write_file(src.path(), "small.bin", b"tail");

    let summary = run(&options(src.path(), dst.path(), "Assets", 4));

    assert_eq!(summary.units.len(), 2);
    assert!(summary.units[0].size >= DEFAULT_SPLIT_THRESHOLD);
    assert!(summary.units[1].size < DEFAULT_SPLIT_THRESHOLD);
    assert_eq!(summary.entries[0].unit, 1);
    assert_eq!(summary.entries[1].unit, 2);
    assert_eq!(summary.wrappers + summary.padded, 4);

    assert_eq!(read(dst.path(), "Assets2Wrapper.cpp"), "#include \"Assets2.cpp\"\n");
    assert_eq!(read(dst.path(), "Assets3Wrapper.cpp"), "\n");
    assert_eq!(read(dst.path(), "Assets4Wrapper.cpp"), "\n");

    let last = read(dst.path(), "Assets2.cpp");
    assert_eq!(manifest_row_count(&last), 2);
    assert_eq!(manifest_row_count(&read(dst.path(), "Assets1.cpp")), 0);
}

#[test]
fn pattern_limits_embedded_files() {
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    write_file(src.path(), "a.png", b"png");
    write_file(src.path(), "b.wav", b"wav");
    write_file(src.path(), "c.txt", b"txt");

    let mut opts = options(src.path(), dst.path(), "Assets", 1);
    opts.pattern = FilePattern::parse("*.png;*.wav");
    let summary = run(&opts);

    let ids: Vec<&str> = summary.entries.iter().map(|e| e.identifier.as_str()).collect();
    assert_eq!(ids, vec!["a_png", "b_wav"]);
}

#[test]
fn lf_line_endings_and_custom_width() {
    let (src, dst) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    write_file(src.path(), "a.bin", &[1, 2, 3, 4, 5]);

    let mut opts = options(src.path(), dst.path(), "Assets", 1);
    opts.config.output.line_ending = LineEnding::Lf;
    opts.config.output.values_per_line = 2;
    run(&opts);

    let unit = read(dst.path(), "Assets1.cpp");
    assert!(!unit.contains('\r'));
    assert!(unit.contains("static const unsigned char temp1[] = {1,2,\n  3,4,\n  5,0,0};\n"));
}
