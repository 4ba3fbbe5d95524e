//! # Transcode CLI - Character Encoding Converter
//!
//! Command-line front end for converting files between any encodings the
//! system `iconv` supports.

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use log::{LevelFilter, Log, Metadata, Record, debug, info};
#[cfg(feature = "cli")]
use serde::Serialize;

#[cfg(feature = "cli")]
use transcode::{Converter, ConverterConfig, Encoding, Error as ConvertError};

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI features disabled. Enable with --features cli");
    std::process::exit(1);
}

/// Transcode: convert data between character encodings
#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "transcode")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log progress to stderr (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format for reports (text, json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Convert a file between character encodings
    Convert(ConvertArgs),

    /// Check that a file is valid in an encoding
    Validate(ValidateArgs),

    /// List well-known encodings and whether this system supports them
    List(ListArgs),
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ConvertArgs {
    /// Source encoding
    #[arg(short = 'f', long = "from")]
    from: String,

    /// Target encoding
    #[arg(short = 't', long = "to")]
    to: String,

    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Strip BOM from input
    #[arg(long)]
    strip_bom: bool,

    /// Add BOM to output
    #[arg(long)]
    add_bom: bool,

    /// Fail instead of growing the output beyond this many bytes
    #[arg(long)]
    max_output: Option<usize>,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ValidateArgs {
    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Expected encoding
    #[arg(short, long)]
    encoding: String,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ListArgs {
    /// Filter by category (unicode, ascii, iso, windows, ebcdic, dos, mac, asian)
    #[arg(short, long)]
    category: Option<String>,

    /// Show only stateful encodings
    #[arg(long)]
    stateful: bool,

    /// Show only encodings this system can convert to and from UTF-8
    #[arg(long)]
    supported: bool,
}

#[cfg(feature = "cli")]
#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct ConversionReport<'a> {
    success: bool,
    source: &'a str,
    target: &'a str,
    bytes_read: usize,
    bytes_written: usize,
    processing_time_ms: u64,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct ValidationReport<'a> {
    valid: bool,
    encoding: &'a str,
    error: Option<String>,
    position: Option<usize>,
    code: Option<i32>,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct EncodingEntry {
    name: &'static str,
    category: &'static str,
    multibyte: bool,
    stateful: bool,
    has_bom: bool,
    supported: bool,
}

/// Writes log records to stderr.
#[cfg(feature = "cli")]
struct StderrLogger;

#[cfg(feature = "cli")]
impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

#[cfg(feature = "cli")]
static LOGGER: StderrLogger = StderrLogger;

#[cfg(feature = "cli")]
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert(ref args) => convert_command(args, &cli)?,
        Commands::Validate(ref args) => validate_command(args, &cli)?,
        Commands::List(ref args) => list_command(args, &cli)?,
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            info!("Reading from: {}", path.display());
            fs::read(path).with_context(|| format!("Failed to read input file: {}", path.display()))
        }
        None => {
            info!("Reading from stdin");
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

#[cfg(feature = "cli")]
fn convert_command(args: &ConvertArgs, cli: &Cli) -> Result<()> {
    let start_time = std::time::Instant::now();

    let mut config = ConverterConfig::default();
    if let Some(max) = args.max_output {
        config = config.with_max_capacity(max);
    }

    let mut converter = Converter::with_config(&args.from, &args.to, config)
        .with_context(|| format!("Failed to create converter from {} to {}", args.from, args.to))?;
    info!("Converting from {} to {}", converter.source(), converter.target());

    let input_data = read_input(args.input.as_deref())?;
    let mut payload = input_data.as_slice();

    if args.strip_bom {
        if let Some(bom) = Encoding::from_name(&args.from).and_then(Encoding::bom) {
            if let Some(rest) = payload.strip_prefix(bom) {
                debug!("Stripped BOM ({} bytes)", bom.len());
                payload = rest;
            }
        }
    }

    let mut output_data = converter.convert(payload).context("Conversion failed")?;

    if args.add_bom {
        if let Some(bom) = Encoding::from_name(&args.to).and_then(Encoding::bom) {
            let mut with_bom = bom.to_vec();
            with_bom.extend_from_slice(&output_data);
            output_data = with_bom;
        }
    }

    if let Some(ref output_path) = args.output {
        fs::write(output_path, &output_data)
            .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;
        info!("Wrote to: {}", output_path.display());
    } else {
        io::stdout()
            .write_all(&output_data)
            .context("Failed to write to stdout")?;
    }

    let processing_time = start_time.elapsed();
    info!(
        "Processed {} bytes -> {} bytes in {:?}",
        input_data.len(),
        output_data.len(),
        processing_time
    );

    if let OutputFormat::Json = cli.format {
        let report = ConversionReport {
            success: true,
            source: converter.source(),
            target: converter.target(),
            bytes_read: input_data.len(),
            bytes_written: output_data.len(),
            processing_time_ms: processing_time.as_millis() as u64,
        };
        // stdout may carry the converted data
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn validate_command(args: &ValidateArgs, cli: &Cli) -> Result<()> {
    let input_data = read_input(args.input.as_deref())?;

    let mut converter = Converter::new(&args.encoding, &args.encoding)
        .with_context(|| format!("Unsupported encoding: {}", args.encoding))?;
    let result = converter.convert(&input_data);

    let position = match &result {
        Err(ConvertError::IllegalSequence { position })
        | Err(ConvertError::IncompleteSequence { position }) => Some(*position),
        _ => None,
    };
    let report = ValidationReport {
        valid: result.is_ok(),
        encoding: converter.source(),
        error: result.as_ref().err().map(ToString::to_string),
        position,
        code: result.as_ref().err().map(ConvertError::raw_os_error),
    };

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            if report.valid {
                println!("✓ Input is valid {}", report.encoding);
            } else {
                println!("✗ Input is not valid {}", report.encoding);
                if let Some(ref error) = report.error {
                    println!("  Error: {}", error);
                }
            }
        }
    }

    if !report.valid {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn is_supported(encoding: Encoding) -> bool {
    let name = encoding.name();
    Converter::new("UTF-8", name).is_ok() && Converter::new(name, "UTF-8").is_ok()
}

#[cfg(feature = "cli")]
fn list_command(args: &ListArgs, cli: &Cli) -> Result<()> {
    let entries: Vec<EncodingEntry> = Encoding::ALL
        .iter()
        .copied()
        .filter(|encoding| {
            args.category
                .as_deref()
                .is_none_or(|category| encoding.category() == category)
        })
        .filter(|encoding| !args.stateful || encoding.is_stateful())
        .map(|encoding| EncodingEntry {
            name: encoding.name(),
            category: encoding.category(),
            multibyte: encoding.is_multibyte(),
            stateful: encoding.is_stateful(),
            has_bom: encoding.bom().is_some(),
            supported: is_supported(encoding),
        })
        .filter(|entry| !args.supported || entry.supported)
        .collect();

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => {
            println!("Encodings ({} total):", entries.len());
            println!();
            for entry in &entries {
                println!(
                    "{:15} {:10} {}{}",
                    entry.name,
                    format!("[{}]", entry.category),
                    if entry.supported { "supported" } else { "unsupported" },
                    if entry.stateful { ", stateful" } else { "" }
                );
            }
        }
    }

    Ok(())
}
