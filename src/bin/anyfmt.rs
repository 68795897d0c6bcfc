//! # anyfmt CLI
//!
//! Converts documents between the formats the library supports.
//!
//! ## Usage
//!
//! ```sh
//! # Input format inferred from the extension
//! anyfmt convert --to yaml config.json
//!
//! # Explicit formats, stdin to a file
//! cat data.toml | anyfmt convert --from toml --to json -o data.json
//!
//! # List format identifiers
//! anyfmt formats
//! ```
//!
//! Diagnostics go to stderr. `-v` enables debug logging, `-vv` trace
//! logging, and `RUST_LOG` overrides both.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyfmt::{FormatOptions, Registry};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// anyfmt - convert structured data between text formats
#[derive(Parser, Debug)]
#[command(name = "anyfmt")]
#[command(about = "Convert structured data between JSON, JSON5, YAML, TOML, CSV, INI, XML, CSON and Hjson", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a document from one format to another
    Convert(ConvertArgs),

    /// List the supported format identifiers
    Formats,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input file; reads stdin when absent or `-`
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Input format; inferred from the input file extension when absent
    #[arg(short, long)]
    from: Option<String>,

    /// Output format
    #[arg(short, long)]
    to: String,

    /// Output file; writes stdout when absent
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Indentation width for pretty-printing formats
    #[arg(long)]
    indent: Option<usize>,

    /// XML root element name
    #[arg(long)]
    root_name: Option<String>,

    /// CSV field delimiter
    #[arg(long)]
    delimiter: Option<char>,

    /// Keep JSON comments as syntax errors instead of stripping them
    #[arg(long)]
    strict_json: bool,
}

impl ConvertArgs {
    fn options(&self) -> Result<FormatOptions> {
        let mut options = FormatOptions::new().with_json_comments(!self.strict_json);
        if let Some(indent) = self.indent {
            options = options.with_indent(indent);
        }
        if let Some(root_name) = &self.root_name {
            options = options.with_root_name(root_name.clone());
        }
        if let Some(delimiter) = self.delimiter {
            let byte = u8::try_from(delimiter)
                .ok()
                .filter(u8::is_ascii)
                .ok_or_else(|| anyhow!("CSV delimiter must be a single ASCII character"))?;
            options = options.with_delimiter(byte);
        }
        Ok(options)
    }

    fn input_path(&self) -> Option<&Path> {
        self.input
            .as_deref()
            .filter(|path| path.as_os_str() != "-")
    }

    fn source_format(&self) -> Result<String> {
        if let Some(from) = &self.from {
            return Ok(from.clone());
        }
        let path = self
            .input_path()
            .context("--from is required when reading stdin")?;
        format_from_extension(path)
            .with_context(|| format!("cannot infer the format of {}; pass --from", path.display()))
    }
}

/// Maps a file extension onto a format identifier.
fn format_from_extension(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match extension.as_str() {
        "yml" => "yaml".to_string(),
        "cfg" | "conf" => "ini".to_string(),
        _ => extension,
    })
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn cmd_convert(args: ConvertArgs) -> Result<()> {
    let registry = Registry::with_options(&args.options()?)?;
    let from = args.source_format()?;
    for format in [from.as_str(), args.to.as_str()] {
        if !registry.contains(format) {
            let known: Vec<&str> = registry.names().collect();
            bail!("unknown format `{}` (expected one of: {})", format, known.join(", "));
        }
    }

    let text = match args.input_path() {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };
    info!(from = %from, to = %args.to, bytes = text.len(), "converting");

    let value = registry.decode(&text, &from)?;
    let output = registry.encode(&value, &args.to)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("failed to write {}", path.display()))?;
            debug!(path = %path.display(), bytes = output.len(), "wrote output");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            if !output.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

fn cmd_formats() -> Result<()> {
    let mut stdout = io::stdout().lock();
    for name in anyfmt::formats() {
        writeln!(stdout, "{}", name)?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert(args) => cmd_convert(args),
        Commands::Formats => cmd_formats(),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
