//! lioli: CLI tool for building and reading BILL streams.

use clap::{Parser, Subcommand, ValueEnum};
use lioli::{gzip, parse_records, BillReader, LogRegistry, OutputConfig};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lioli")]
#[command(version)]
#[command(about = "Build, dump and inspect BILL tree streams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serialize a record file (`$.path value` lines, blank line between records)
    Build {
        /// Input record file
        #[arg(short, long)]
        input: PathBuf,

        /// Output stream file
        #[arg(short, long)]
        output: PathBuf,

        /// Output configuration (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Leave out root node names and spans
        #[arg(long)]
        no_root_node: bool,

        /// Gzip the output
        #[arg(long)]
        gzip: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print every tree of a BILL stream (gzip is detected)
    Dump {
        /// Input stream file
        #[arg(short, long)]
        input: PathBuf,

        /// Rendering of each tree
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Root name for streams written without root nodes
        #[arg(long)]
        root_name: Option<String>,
    },

    /// Print statistics of a BILL stream
    Inspect {
        /// Input stream file
        #[arg(short, long)]
        input: PathBuf,

        /// Root name for streams written without root nodes
        #[arg(long)]
        root_name: Option<String>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Lorth,
    Python,
    Json,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            input,
            output,
            config,
            no_root_node,
            gzip,
            verbose,
        } => build(&input, &output, config.as_deref(), no_root_node, gzip, verbose),
        Commands::Dump {
            input,
            format,
            root_name,
        } => dump(&input, format, root_name.as_deref()),
        Commands::Inspect { input, root_name } => inspect(&input, root_name.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn build(
    input: &Path,
    output: &Path,
    config: Option<&Path>,
    no_root_node: bool,
    compress: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match config {
        Some(path) => OutputConfig::load(path)?,
        None => OutputConfig::default(),
    };
    config.bill.no_root_node |= no_root_node;
    config.gzip |= compress;

    let registry = LogRegistry::with_builtins(config.bill.clone());
    let (serializer, logger) = registry.resolve(&config)?;

    if verbose {
        println!("Reading records: {:?}", input);
    }
    let trees = parse_records(&fs::read_to_string(input)?)?;

    let mut context = serializer.create_context();
    let mut data = Vec::new();
    let mut dropped = 0usize;
    for tree in &trees {
        match context.serialize(tree) {
            Ok(bytes) => data.extend(bytes),
            Err(_) => dropped += 1,
        }
        logger.log(tree.clone());
    }
    data.extend(context.close()?);

    let raw_size = data.len();
    if config.gzip {
        data = gzip::compress(&data)?;
    }
    fs::write(output, &data)?;

    if verbose {
        println!(
            "Wrote {} trees ({} dropped) with serializer {}, logger {}: {} bytes ({} on disk)",
            trees.len() - dropped,
            dropped,
            serializer.name(),
            logger.name(),
            raw_size,
            data.len()
        );
    }
    log::info!("wrote {} trees to {:?}", trees.len() - dropped, output);
    Ok(())
}

fn open_stream(input: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    Ok(gzip::decompress(&data)?)
}

fn reader<'a>(
    data: &'a [u8],
    root_name: Option<&str>,
) -> Result<BillReader<'a>, Box<dyn std::error::Error>> {
    let reader = BillReader::new(data)?;
    Ok(match root_name {
        Some(name) => reader.with_root_name(name)?,
        None => reader,
    })
}

fn dump(input: &Path, format: Format, root_name: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let data = open_stream(input)?;
    for tree in reader(&data, root_name)? {
        let tree = tree?;
        match format {
            Format::Text => print!("{}", tree.as_string()),
            Format::Lorth => print!("{}", tree.as_lorth()),
            Format::Python => println!("{}", tree.as_python()),
            Format::Json => println!("{}", serde_json::to_string(&tree.to_json())?),
        }
    }
    Ok(())
}

fn inspect(input: &Path, root_name: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let data = open_stream(input)?;
    let mut reader = reader(&data, root_name)?;

    let mut trees = 0usize;
    let mut raw_bytes = 0usize;
    let mut largest = 0usize;
    while let Some(tree) = reader.next_tree()? {
        trees += 1;
        raw_bytes += tree.raw().len();
        largest = largest.max(tree.raw().len());
    }

    println!("Stream:      {:?}", input);
    println!("Size:        {} bytes", data.len());
    println!("Trees:       {}", trees);
    println!("Raw bytes:   {}", raw_bytes);
    println!("Largest raw: {}", largest);
    println!("Overhead:    {} bytes", data.len().saturating_sub(raw_bytes));
    println!("Terminated:  {}", reader.is_finished());
    Ok(())
}
