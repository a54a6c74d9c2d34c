mod specfile;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use crate::specfile::{DEFAULT_SPEC_NAME, SpecFile, write_starter_spec};

#[derive(Parser)]
#[command(name = "clab")]
#[command(
    version,
    about = "Evaluate command line tokens against a declarative argument spec",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter clab.json
    Init(InitArgs),

    /// Build the argument specs of a spec file and report problems
    Check(CheckArgs),

    /// Evaluate tokens against a spec file and print the result as JSON
    Eval(EvalArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Overwrite an existing clab.json
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct CheckArgs {
    /// Path to the spec file
    #[arg(short, long, default_value = DEFAULT_SPEC_NAME, value_name = "FILE")]
    spec: PathBuf,
}

#[derive(Parser)]
struct EvalArgs {
    /// Path to the spec file
    #[arg(short, long, default_value = DEFAULT_SPEC_NAME, value_name = "FILE")]
    spec: PathBuf,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,

    /// Tokens to evaluate, given after `--`
    #[arg(last = true, value_name = "TOKENS")]
    tokens: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Check(args) => check(args),
        Commands::Eval(args) => eval(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let dest = write_starter_spec(&dir, args.force)?;

    eprintln!("Created: {}", dest.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit {DEFAULT_SPEC_NAME} to declare your arguments");
    eprintln!("  2. Run: clab check");
    eprintln!("  3. Run: clab eval -- -i input.txt");

    Ok(())
}

fn check(args: CheckArgs) -> Result<()> {
    tracing::debug!("executing check command");

    let spec = SpecFile::from_file(&args.spec)?;
    let registry = spec
        .build()
        .with_context(|| format!("invalid spec file: {}", args.spec.display()))?;

    for arg in registry.specs() {
        if arg.is_positional() {
            println!("{} (positional)", arg.id());
        } else {
            let tags: Vec<String> = arg.tags().iter().map(|t| t.text()).collect();
            println!("{} ({})", arg.id(), tags.join(", "));
        }
    }
    eprintln!("{} argument spec(s) OK", registry.len());
    Ok(())
}

fn eval(args: EvalArgs) -> Result<()> {
    tracing::debug!(tokens = args.tokens.len(), "executing eval command");

    let spec = SpecFile::from_file(&args.spec)?;
    let registry = spec
        .build()
        .with_context(|| format!("invalid spec file: {}", args.spec.display()))?;

    let evaluation = registry
        .evaluate(&args.tokens)
        .context("failed to evaluate tokens")?;
    if let Some(id) = evaluation.aborted_id() {
        tracing::info!("evaluation aborted by '{id}'");
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&evaluation)
    } else {
        serde_json::to_string(&evaluation)
    }
    .context("failed to serialize evaluation")?;
    println!("{json}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
