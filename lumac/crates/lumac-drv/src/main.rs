//! Lumac CLI - compile Luma source files to WebAssembly modules.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lumac_drv::cache::ModuleCache;

/// Compiler for the Luma language.
///
/// Compiles a `.luma` source file into a self-contained WebAssembly
/// module in which every function is exported by name.
#[derive(Parser, Debug)]
#[command(name = "lumac")]
#[command(author = "Luma Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compiler for the Luma language", long_about = None)]
struct Cli {
    /// Luma source file to compile.
    input: PathBuf,

    /// Output path (default: the input path with a .wasm extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print an intermediate representation instead of writing a module.
    #[arg(long, value_enum)]
    emit: Option<Emit>,

    /// Reuse previously compiled binaries from the cache.
    #[arg(long)]
    cached: bool,

    /// Cache directory used with --cached.
    #[arg(long, default_value = ".luma-cache", env = "LUMAC_CACHE_DIR")]
    cache_dir: PathBuf,

    /// Enable verbose output.
    #[arg(short, long, env = "LUMAC_VERBOSE")]
    verbose: bool,
}

/// Which intermediate representation to print.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Emit {
    /// The token stream.
    Tokens,
    /// The abstract syntax tree.
    Ast,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    match cli.emit {
        Some(Emit::Tokens) => {
            for token in lumac_drv::tokenize(&source)? {
                println!("{:?}", token.token);
            }
            return Ok(());
        },
        Some(Emit::Ast) => {
            let program = lumac_drv::parse(lumac_drv::tokenize(&source)?)?;
            println!("{program:#?}");
            return Ok(());
        },
        None => {},
    }

    let wasm = if cli.cached {
        let mut cache = ModuleCache::new(&cli.cache_dir)?;
        cache.load_or_compile(&cli.input)?
    } else {
        lumac_drv::compile(&source)?
    };

    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension("wasm"));
    std::fs::write(&output, &wasm)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(bytes = wasm.len(), output = %output.display(), "module written");
    Ok(())
}
