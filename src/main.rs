//! csv-duplex CLI - CSV decoder and encoder

use clap::{Args, Parser, Subcommand};
use csv_duplex::fixtures::{load_rows, load_text, run_conformance_with};
use csv_duplex::{
    CodecError, DecodeOptions, Dialect, EncodeOptions, Header, Newline, decode, encode,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Decode CSV-family text to JSON rows and encode JSON rows back to CSV.
///
/// The delimiter and newline are detected from the input when not given.
#[derive(Parser, Debug)]
#[command(name = "csv-duplex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a delimited file into JSON rows
    Decode {
        /// Input CSV file
        file: PathBuf,

        #[command(flatten)]
        dialect: DialectArgs,

        #[command(flatten)]
        header: HeaderArgs,

        #[command(flatten)]
        range: RangeArgs,

        /// Cast numeric and boolean columns
        #[arg(long)]
        cast: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Encode a JSON array of rows into delimited text
    Encode {
        /// Input JSON file
        file: PathBuf,

        #[command(flatten)]
        dialect: DialectArgs,

        #[command(flatten)]
        header: HeaderArgs,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Report the detected delimiter and newline
    Detect {
        /// Input CSV file
        file: PathBuf,

        /// Output format
        #[arg(short = 'f', long, default_value = "text")]
        format: OutputFormat,
    },

    /// Check every csv/<name>.csv under a directory against json/<name>.json
    Conform {
        /// Dataset directory
        dir: PathBuf,

        /// Cast numeric and boolean columns while decoding
        #[arg(long)]
        cast: bool,
    },
}

#[derive(Args, Debug)]
struct DialectArgs {
    /// Force a specific delimiter (single character)
    #[arg(short = 'd', long)]
    delimiter: Option<char>,

    /// Force a specific newline: crlf, lf or cr
    #[arg(short = 'n', long)]
    newline: Option<Newline>,
}

#[derive(Args, Debug)]
struct HeaderArgs {
    /// Treat the first row as field names
    #[arg(long, conflicts_with = "fields")]
    header: bool,

    /// Explicit field names (comma-separated)
    #[arg(long, value_delimiter = ',')]
    fields: Option<Vec<String>>,
}

impl HeaderArgs {
    fn to_header(&self) -> Header {
        match &self.fields {
            Some(names) => Header::Fields(names.clone()),
            None if self.header => Header::FirstRow,
            None => Header::None,
        }
    }
}

#[derive(Args, Debug)]
struct RangeArgs {
    /// Number of rows to skip
    #[arg(long, default_value = "0")]
    skip: usize,

    /// Maximum number of rows to process
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(command: &Command) -> csv_duplex::Result<ExitCode> {
    match command {
        Command::Decode {
            file,
            dialect,
            header,
            range,
            cast,
            pretty,
        } => {
            let options = DecodeOptions {
                skip: range.skip,
                limit: range.limit,
                newline: dialect.newline,
                delimiter: dialect.delimiter,
                header: header.to_header(),
                cast: *cast,
            };
            options.validate()?;
            decode_file(file, &options, *pretty)?;
        }
        Command::Encode {
            file,
            dialect,
            header,
            range,
        } => {
            let defaults = EncodeOptions::default();
            let options = EncodeOptions {
                delimiter: dialect.delimiter.unwrap_or(defaults.delimiter),
                newline: dialect.newline.unwrap_or(defaults.newline),
                skip: range.skip,
                limit: range.limit,
                header: header.to_header(),
            };
            options.validate()?;
            encode_file(file, &options)?;
        }
        Command::Detect { file, format } => {
            let text = load_text(file)?;
            print_dialect(file, &Dialect::resolve(&text, None, None), *format);
        }
        Command::Conform { dir, cast } => {
            let options = DecodeOptions {
                header: Header::FirstRow,
                cast: *cast,
                ..DecodeOptions::default()
            };
            let result = run_conformance_with(dir, &options)?;
            result.print_details();
            result.print_summary();
            if !result.all_passed() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn decode_file(path: &Path, options: &DecodeOptions, pretty: bool) -> csv_duplex::Result<()> {
    let text = load_text(path)?;
    let rows = decode(&text, options);

    // Empty input prints `false`
    let json = match (&rows, pretty) {
        (Some(rows), true) => serde_json::to_string_pretty(rows)?,
        (Some(rows), false) => serde_json::to_string(rows)?,
        (None, _) => "false".to_string(),
    };
    println!("{json}");
    Ok(())
}

fn encode_file(path: &Path, options: &EncodeOptions) -> csv_duplex::Result<()> {
    let rows = load_rows(path)?;
    let text = encode(&rows, options).ok_or(CodecError::EmptyData)?;
    print!("{text}{}", options.newline.as_str());
    Ok(())
}

fn print_dialect(path: &Path, dialect: &Dialect, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("File: {}", path.display());
            println!("  Delimiter: {:?}", dialect.delimiter);
            println!("  Newline: {}", dialect.newline);
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "file": path.display().to_string(),
                "delimiter": dialect.delimiter.to_string(),
                "newline": dialect.newline.as_str(),
            });
            println!("{json}");
        }
    }
}
