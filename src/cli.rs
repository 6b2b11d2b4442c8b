use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, warn};

use huffpack::config::{Config, DEFAULT_CONFIG_FILE};
use huffpack::engine::{
    codes::{code_string, CodeTable},
    frequency::FrequencyTable,
    huffman::{display_byte, HuffmanTree},
};
use huffpack::format::{Container, HEADER_SIZE};
use huffpack::report::{Event, NullReporter, Reporter, Summary, TracingReporter};
use huffpack::utils::{hash::sha256_hex, io};
use huffpack::{compress, decompress};

#[derive(Parser)]
#[command(name = "huffpack")]
#[command(about = "Encode and decode files with Huffman coding")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Config file path")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Output as JSON")]
    pub json: bool,

    #[arg(short, long, global = true, help = "Log pipeline stages")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode a file to huff format
    Encode {
        filename: PathBuf,
        #[arg(long, help = "Name of output file")]
        output: Option<PathBuf>,
    },
    /// Decode a file from huff format
    Decode {
        filename: PathBuf,
        #[arg(long, help = "Name of output file")]
        output: Option<PathBuf>,
    },
    /// Print the code table a file would be encoded with
    Table { filename: PathBuf },
    /// Describe an encoded file without decoding it
    Inspect {
        filename: PathBuf,
        #[arg(long, help = "Print the rebuilt tree")]
        tree: bool,
    },
    /// Encode and decode a file in memory and compare digests
    Verify { filename: PathBuf },
    /// Write the default configuration
    GenerateConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE, help = "Config file path")]
        output: PathBuf,
    },
}

/// Prints run summaries to stdout, as text or JSON lines, and logs every event.
pub struct ConsoleReporter {
    json: bool,
    log: TracingReporter,
}

impl ConsoleReporter {
    pub fn new(json: bool) -> Self {
        Self { json, log: TracingReporter }
    }

    fn print_summary(&self, verb: &str, summary: &Summary) {
        println!("   {} {} bytes -> {} bytes", verb, summary.input_bytes, summary.output_bytes);
        println!("   Distinct symbols: {}", summary.distinct_symbols);
        if summary.input_bytes > 0 {
            println!("   Ratio: {:.1}%", summary.ratio * 100.0);
        }
        println!("   CRC32: {:08x}", summary.crc32);
    }
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, event: Event) {
        self.log.report(event.clone());
        if self.json {
            if !matches!(event, Event::StageStarted { .. }) {
                match serde_json::to_string(&event) {
                    Ok(line) => println!("{}", line),
                    Err(e) => warn!("failed to serialize event: {}", e),
                }
            }
            return;
        }
        match event {
            Event::StageStarted { .. } => {}
            Event::Encoded(summary) => self.print_summary("Encoded", &summary),
            Event::Decoded(summary) => self.print_summary("Decoded", &summary),
        }
    }
}

pub fn run(cli: Cli, config: &Config) -> Result<()> {
    let mut reporter = ConsoleReporter::new(cli.json);

    match cli.command {
        Commands::Encode { filename, output } => {
            let output = output.unwrap_or_else(|| config.encoded_name(&filename));
            encode(&filename, &output, config, &mut reporter, cli.json)
        }
        Commands::Decode { filename, output } => {
            let output = output.unwrap_or_else(|| config.decoded_name(&filename));
            decode(&filename, &output, config, &mut reporter, cli.json)
        }
        Commands::Table { filename } => table(&filename, cli.json),
        Commands::Inspect { filename, tree } => inspect(&filename, tree, cli.json),
        Commands::Verify { filename } => verify(&filename, cli.json),
        Commands::GenerateConfig { output } => {
            Config::default().save(&output)?;
            if cli.json {
                println!("{}", serde_json::json!({"config": output}));
            } else {
                println!("Generated config file: {}", output.display());
            }
            Ok(())
        }
    }
}

fn check_output(output: &Path, config: &Config) -> Result<()> {
    if !config.overwrite && output.exists() {
        bail!("refusing to overwrite existing file '{}'", output.display());
    }
    Ok(())
}

fn encode(input: &Path, output: &Path, config: &Config, reporter: &mut dyn Reporter, json: bool) -> Result<()> {
    if !json {
        println!("encoding file '{}' to '{}'", input.display(), output.display());
    }
    check_output(output, config)?;

    let data = io::read_all(input)?;
    let packed = compress(&data, reporter)
        .with_context(|| format!("failed to encode '{}'", input.display()))?;

    if config.verify_after_encode {
        let restored = decompress(&packed, &mut NullReporter)
            .with_context(|| format!("verification of '{}' failed", input.display()))?;
        if restored != data {
            bail!("verification of '{}' failed: decoded bytes differ", input.display());
        }
        debug!("verified {} bytes", data.len());
    }

    io::write_all(output, &packed)?;
    info!("encoded '{}' to '{}'", input.display(), output.display());
    Ok(())
}

fn decode(input: &Path, output: &Path, config: &Config, reporter: &mut dyn Reporter, json: bool) -> Result<()> {
    if !json {
        println!("decoding file '{}' to '{}'", input.display(), output.display());
    }
    check_output(output, config)?;

    let data = io::read_all(input)?;
    let restored = decompress(&data, reporter)
        .with_context(|| format!("failed to decode '{}'", input.display()))?;

    io::write_all(output, &restored)?;
    info!("decoded '{}' to '{}'", input.display(), output.display());
    Ok(())
}

/// Code table rows for `data`: byte, count and code, most frequent first.
fn table_rows(data: &[u8]) -> Vec<(u8, u64, String)> {
    let freq = FrequencyTable::count(data);
    let codes = HuffmanTree::build(&freq)
        .map(|tree| CodeTable::from_tree(&tree))
        .unwrap_or_default();
    codes
        .by_frequency(&freq)
        .into_iter()
        .map(|(byte, count, code)| (byte, count, code_string(code)))
        .collect()
}

fn table(input: &Path, json: bool) -> Result<()> {
    let data = io::read_all(input)?;
    let rows = table_rows(&data);

    if json {
        let rows: Vec<_> = rows
            .iter()
            .map(|(byte, count, code)| serde_json::json!({
                "byte": byte,
                "count": count,
                "code": code,
            }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for (byte, count, code) in rows {
        println!("{}: {} ({})", display_byte(byte), code, count);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct ContainerInfo {
    symbols: u64,
    distinct_symbols: usize,
    header_bytes: usize,
    payload_bytes: usize,
    code_bits: u64,
    tree_depth: usize,
}

fn describe(container: &Container, tree: Option<&HuffmanTree>) -> ContainerInfo {
    ContainerInfo {
        symbols: container.table.total(),
        distinct_symbols: container.table.distinct(),
        header_bytes: HEADER_SIZE,
        payload_bytes: container.payload.len(),
        code_bits: tree
            .map(|tree| CodeTable::from_tree(tree).total_bits(&container.table))
            .unwrap_or(0),
        tree_depth: tree.map(HuffmanTree::depth).unwrap_or(0),
    }
}

fn inspect(input: &Path, show_tree: bool, json: bool) -> Result<()> {
    let data = io::read_all(input)?;
    let container = Container::from_bytes(&data)
        .with_context(|| format!("failed to read '{}'", input.display()))?;
    let tree = HuffmanTree::build(&container.table);
    let info = describe(&container, tree.as_ref());

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Container: {}", input.display());
        println!("   Symbols: {}", info.symbols);
        println!("   Distinct symbols: {}", info.distinct_symbols);
        println!("   Payload: {} bytes (expected {})", info.payload_bytes, info.code_bits.div_ceil(8));
        println!("   Code bits: {}", info.code_bits);
        println!("   Tree depth: {}", info.tree_depth);
    }

    if show_tree {
        if let Some(tree) = tree {
            print!("{}", tree.render());
        }
    }
    Ok(())
}

fn verify(input: &Path, json: bool) -> Result<()> {
    let data = io::read_all(input)?;
    let packed = compress(&data, &mut NullReporter)?;
    let restored = decompress(&packed, &mut NullReporter)?;

    let original = sha256_hex(&data);
    let roundtrip = sha256_hex(&restored);
    let matched = original == roundtrip && data == restored;

    if json {
        println!("{}", serde_json::json!({
            "original_sha256": original,
            "roundtrip_sha256": roundtrip,
            "encoded_bytes": packed.len(),
            "passed": matched,
        }));
    } else {
        println!("Original:   {}", original);
        println!("Round-trip: {}", roundtrip);
        println!("Encoded size: {} bytes", packed.len());
    }

    if !matched {
        bail!("round-trip of '{}' does not reproduce the input", input.display());
    }
    if !json {
        println!("Verification PASSED");
    }
    Ok(())
}
