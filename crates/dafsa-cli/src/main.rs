//! DAFSA CLI
//!
//! CLI tool for compiling word lists into DAFSA graphs and querying them.

mod graph_io;

use std::path::Path;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use dafsa_compiler::emit_rust_source;
use dafsa_core::{Dafsa, MatchResult};

use crate::graph_io::{compile_graph_bytes, read_graph, write_output};

#[derive(Parser)]
#[command(name = "dafsa-cli")]
#[command(about = "Fixed-set DAFSA compiler and lookup tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Raw graph bytes
    Bin,
    /// Rust source with a static byte array
    Rust,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile word lists into a DAFSA graph
    Compile {
        /// Input word list files
        #[arg(short, long, required = true)]
        input: Vec<String>,

        /// Output file
        #[arg(short, long, default_value = "graph.dafsa")]
        output: String,

        /// Store words reversed, for suffix lookups
        #[arg(long)]
        reverse: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Bin)]
        format: OutputFormat,

        /// Name of the static array when emitting Rust source
        #[arg(long, default_value = "DAFSA_GRAPH")]
        name: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate a compiled graph
    Validate {
        /// Graph file to validate
        #[arg(short, long)]
        input: String,
    },

    /// Dump graph info
    Info {
        /// Graph file to inspect
        #[arg(short, long)]
        input: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up whole keys
    Lookup {
        /// Graph file to query
        #[arg(short, long)]
        input: String,

        /// Keys to look up
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Find the longest matching suffix of hosts in a reversed graph
    Suffix {
        /// Graph file to query
        #[arg(short, long)]
        input: String,

        /// Also match private rules
        #[arg(long)]
        include_private: bool,

        /// Hosts to match
        #[arg(required = true)]
        hosts: Vec<String>,
    },
}

#[derive(Serialize)]
struct InfoReport<'a> {
    path: &'a str,
    size: usize,
    labels: usize,
    branches: usize,
    edges: usize,
    terminals: usize,
}

fn main() {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Compile { verbose: true, .. });
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Compile {
            input,
            output,
            reverse,
            format,
            name,
            verbose,
        } => cmd_compile(&input, &output, reverse, format, &name, verbose),
        Commands::Validate { input } => cmd_validate(&input),
        Commands::Info { input, json } => cmd_info(&input, json),
        Commands::Lookup { input, keys } => cmd_lookup(&input, &keys),
        Commands::Suffix {
            input,
            include_private,
            hosts,
        } => cmd_suffix(&input, include_private, &hosts),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_compile(
    inputs: &[String],
    output: &str,
    reverse: bool,
    format: OutputFormat,
    name: &str,
    verbose: bool,
) -> Result<(), String> {
    let (bytes, stats) = compile_graph_bytes(inputs, reverse, verbose)?;

    let rendered = match format {
        OutputFormat::Bin => bytes.clone(),
        OutputFormat::Rust => emit_rust_source(name, &bytes).into_bytes(),
    };
    write_output(Path::new(output), &rendered)?;

    println!("Compiled {} word lists to '{}'", inputs.len(), output);
    println!("  Lines:    {}", stats.lines);
    println!("  Words:    {} ({} entries)", stats.words, stats.entries);
    println!("  Reversed: {}", reverse);
    println!("  Size:     {} bytes ({:.1} KB)", bytes.len(), bytes.len() as f64 / 1024.0);
    println!(
        "  Time:     {:.1}ms (parse: {:.1}ms, build: {:.1}ms)",
        stats.parse_ms + stats.build_ms,
        stats.parse_ms,
        stats.build_ms,
    );

    Ok(())
}

fn load<'a>(input: &str, bytes: &'a [u8]) -> Result<Dafsa<'a>, String> {
    Dafsa::new(bytes).map_err(|e| format!("Invalid graph '{}': {}", input, e))
}

fn cmd_validate(input: &str) -> Result<(), String> {
    let bytes = read_graph(Path::new(input))?;
    let dafsa = load(input, &bytes)?;
    let stats = dafsa.stats().map_err(|e| e.to_string())?;

    println!("Graph '{}' is valid", input);
    println!("  Labels:      {}", stats.labels);
    println!("  Size:        {} bytes", bytes.len());

    Ok(())
}

fn cmd_info(input: &str, json: bool) -> Result<(), String> {
    let bytes = read_graph(Path::new(input))?;
    let dafsa = load(input, &bytes)?;
    let stats = dafsa.stats().map_err(|e| e.to_string())?;

    if json {
        let report = InfoReport {
            path: input,
            size: bytes.len(),
            labels: stats.labels,
            branches: stats.branches,
            edges: stats.edges,
            terminals: stats.terminals,
        };
        let text = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }

    println!("Graph: {}", input);
    println!("  Total size:  {} bytes ({:.1} KB)", bytes.len(), bytes.len() as f64 / 1024.0);
    println!();
    println!("Nodes:");
    println!("  Labels:      {}", stats.labels);
    println!("  Branches:    {}", stats.branches);
    println!("  Edges:       {}", stats.edges);
    println!("  Terminals:   {}", stats.terminals);

    Ok(())
}

fn describe(result: MatchResult) -> String {
    match result {
        MatchResult::NotFound => "not found".to_string(),
        MatchResult::Found(flags) if flags.is_empty() => "found (code 0)".to_string(),
        MatchResult::Found(flags) => format!("found (code {}, {:?})", result.code(), flags),
    }
}

fn cmd_lookup(input: &str, keys: &[String]) -> Result<(), String> {
    let bytes = read_graph(Path::new(input))?;
    let dafsa = load(input, &bytes)?;

    for key in keys {
        println!("{}: {}", key, describe(dafsa.lookup(key)));
    }
    Ok(())
}

fn cmd_suffix(input: &str, include_private: bool, hosts: &[String]) -> Result<(), String> {
    let bytes = read_graph(Path::new(input))?;
    let dafsa = load(input, &bytes)?;

    for host in hosts {
        let m = dafsa.lookup_suffix(include_private, host);
        match m.suffix_of(host) {
            Some(suffix) => println!("{}: {} [{}]", host, suffix, describe(m.result)),
            None => println!("{}: no match", host),
        }
    }
    Ok(())
}
