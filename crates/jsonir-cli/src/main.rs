//! `jsonir` CLI: push JSON documents through the value model from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Structural encode + decode (stdin → stdout)
//! echo '{"name":"Alice","age":30}' | jsonir encode
//!
//! # Coerce a document to a schema, file to file
//! jsonir encode -i data.json -s schema.json -o normalized.json
//!
//! # Print the normalized form of a schema descriptor
//! jsonir schema -i schema.json --pretty
//!
//! # Log coercion failures to stderr
//! jsonir -vv encode -s schema.json -i data.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jsonir_core::Type;
use log::{debug, LevelFilter};
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "jsonir",
    version,
    about = "Normalize JSON through dynamic values and schemas"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON document to values and decode it back to JSON
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Schema descriptor file; the output then has exactly its shape
        #[arg(short, long)]
        schema: Option<String>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Build a type from a schema descriptor and print its normalized form
    Schema {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Encode {
            input,
            output,
            schema,
            pretty,
        } => {
            let text = read_input(input.as_deref())?;
            let doc: serde_json::Value =
                serde_json::from_str(&text).context("Failed to parse input JSON")?;

            let encoded = match schema.as_deref() {
                Some(path) => {
                    let ty = load_schema(path)?;
                    debug!("encoding against schema {ty}");
                    jsonir_core::encode_by_type(&doc, &ty)
                }
                None => jsonir_core::encode(&doc),
            };

            let json = if pretty {
                jsonir_core::to_json_string_pretty(&encoded)
            } else {
                jsonir_core::to_json_string(&encoded)
            }
            .context("Failed to write JSON")?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Schema { input, pretty } => {
            let text = read_input(input.as_deref())?;
            let ty = jsonir_core::parse_type(&text).context("Failed to build schema")?;
            let json = if pretty {
                serde_json::to_string_pretty(&ty)?
            } else {
                ty.to_string()
            };
            write_output(None, &json)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_schema(path: &str) -> Result<Type> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file: {}", path))?;
    jsonir_core::parse_type(&text).with_context(|| format!("Invalid schema in {}", path))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
