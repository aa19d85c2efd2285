use binary_builder::generate::{self, BuildError, BuildOptions};
use binary_builder::scan::FilePattern;
use binary_builder::{config, output};
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

fn version_string() -> &'static str {
    if env!("BB_RELEASE_TAG") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    match env!("BB_GIT_HASH") {
        "" => "dev@unknown",
        // Leaked once at startup
        hash => Box::leak(format!("dev@{hash}").into_boxed_str()),
    }
}

#[derive(Parser)]
#[command(name = "binary-builder")]
#[command(about = "Embed a directory of binary files into generated C++ sources")]
#[command(long_about = "\
Embed a directory of binary files into generated C++ sources

Every file under SOURCE_DIR (optionally filtered by PATTERN) is encoded into
CLASS.h and CLASS1.cpp, CLASS2.cpp, ... in TARGET_DIR. Each file becomes a
`const char*` accessor plus a size constant inside `namespace CLASS`, and an
`info[]` table lists them all:

  assets/                      out/
  ├── icon.png          →      ├── Assets.h             (declarations)
  ├── ui/logo.svg              ├── Assets1.cpp          (data + info[] table)
  ├── .git/…   (skipped)       ├── Assets1Wrapper.cpp   (#include \"Assets1.cpp\")
  └── empty.bin (skipped)      ├── Assets2Wrapper.cpp   (empty, pads to MIN_UNITS)
                               └── Assets.units.json    (generation record)

Hidden files, files inside hidden directories, *.scc files and empty files
are never embedded. A new .cpp unit starts once the current one reaches
15 MiB. Nothing is written when no source file is newer than CLASS.h.

PATTERN is a ';'-separated wildcard list matched against file names, e.g.
\"*.png;*.svg\". It is case-sensitive except on Windows and macOS. The
single-dash form -addpath is accepted for --addpath.

Run 'binary-builder --print-config' for a documented settings file.")]
#[command(version = version_string())]
struct Cli {
    /// Prefix identifiers with the file's directory relative to SOURCE_DIR
    #[arg(long)]
    addpath: bool,

    /// Regenerate even if the outputs are up to date
    #[arg(long)]
    force: bool,

    /// Generator settings file (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print a stock settings file with all options documented
    #[arg(long)]
    print_config: bool,

    /// Minimum number of wrapper files to leave in TARGET_DIR
    #[arg(required_unless_present = "print_config")]
    min_units: Option<u32>,

    /// Directory holding the files to embed
    #[arg(required_unless_present = "print_config")]
    source_dir: Option<PathBuf>,

    /// Directory the generated sources are written to
    #[arg(required_unless_present = "print_config")]
    target_dir: Option<PathBuf>,

    /// Namespace, header name and file prefix for generated sources
    #[arg(required_unless_present = "print_config")]
    class_name: Option<String>,

    /// Wildcard filter for file names
    #[arg(default_value = "*")]
    pattern: String,
}

/// Accept the historical single-dash `-addpath` spelling.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            if arg == "-addpath" {
                OsString::from("--addpath")
            } else {
                arg
            }
        })
        .collect()
}

fn main() {
    let cli = match Cli::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version requests also arrive here
            let _ = err.print();
            if err.use_stderr() {
                println!();
                let _ = Cli::command().print_help();
            }
            return;
        }
    };

    if let Err(err) = run(cli) {
        println!("{err}");
        println!();
    }
}

fn run(cli: Cli) -> Result<(), BuildError> {
    if cli.print_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let (Some(min_units), Some(source_dir), Some(target_dir), Some(class_name)) =
        (cli.min_units, cli.source_dir, cli.target_dir, cli.class_name)
    else {
        // clap enforces these unless --print-config is given
        return Ok(());
    };

    let cwd = std::env::current_dir()?;
    let options = BuildOptions {
        source_dir: cwd.join(source_dir),
        target_dir: cwd.join(target_dir),
        class_name,
        min_units,
        add_path: cli.addpath,
        pattern: FilePattern::parse(&cli.pattern),
        force: cli.force,
        config: config::load_config(cli.config.as_deref())?,
    };

    let outcome = generate::generate(&options, output::print_build_event)?;
    output::print_outcome(&outcome);
    Ok(())
}
