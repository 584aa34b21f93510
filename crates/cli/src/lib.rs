#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

//! Command-line front-end: a JSON type document in, a TypeScript module out.

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};
use typegen_core::{WriteOptions, load_world};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "typegen",
    version,
    about = "Compile a type document into TypeScript declarations"
)]
pub struct Cli {
    /// JSON document describing the types to emit
    #[arg(value_name = "DOCUMENT")]
    pub input: PathBuf,

    /// TOML file with writer options (exported_types, order_types_by, order_fields_by)
    #[arg(long, value_name = "OPTIONS")]
    pub options: Option<PathBuf>,

    /// Write the module here instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Parse `args`, run, and return the process exit code.
pub fn run_cli<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => {
            init_tracing();
            match run(&cli) {
                Ok(()) => 0,
                Err(err) => {
                    eprintln!("{err}");
                    1
                }
            }
        }
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

pub fn run(cli: &Cli) -> Result<(), String> {
    let document = fs::read_to_string(&cli.input)
        .map_err(|err| format!("Failed to read {}: {err}", cli.input.display()))?;
    let world = load_world(&document).map_err(|err| format!("{}: {err}", cli.input.display()))?;
    debug!(types = world.len(), "Loaded type document.");

    let options = match &cli.options {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;
            WriteOptions::from_toml_str(&contents)
                .map_err(|err| format!("{}: {err}", path.display()))?
        }
        None => WriteOptions::default(),
    };

    let code = world.to_typescript(&options).map_err(|err| err.to_string())?;
    match &cli.output {
        Some(path) => {
            fs::write(path, &code)
                .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
            info!(path = %path.display(), "Wrote TypeScript module.");
        }
        None => print!("{code}"),
    }
    Ok(())
}

fn init_tracing() {
    // TYPEGEN_LOG is either a plain level or a full filter spec
    let filter = match std::env::var("TYPEGEN_LOG") {
        Ok(level) if is_plain_level(&level) => {
            format!("typegen_core={level},typegen_cli={level}")
        }
        Ok(spec) => spec,
        Err(_) => "typegen_core=warn,typegen_cli=info".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
