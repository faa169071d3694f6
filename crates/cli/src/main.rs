mod manifest;

use anyhow::{Context, Result, bail};
use argline::tokenize::{DEFAULT_DELIMITERS, split_line};
use argline::{ArgClass, ParseOutcome, ParsedArg};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

use crate::manifest::{DEFAULT_MANIFEST_NAME, load_manifest, write_default_manifest};

#[derive(Parser)]
#[command(name = "argline")]
#[command(
    version,
    about = "Declarative command-line parsing driven by a JSON manifest",
    long_about = None
)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample argline.json
    Init(InitArgs),

    /// Parse a command line against the manifest
    Parse(ParseArgs),

    /// Show how a command line is split into tokens
    Tokens(InputArgs),

    /// Print the aligned argument table
    Help(ManifestArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Replace an existing manifest
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct ManifestArgs {
    /// Path to the argument manifest
    #[arg(
        short,
        long,
        env = "ARGLINE_MANIFEST",
        default_value = DEFAULT_MANIFEST_NAME,
        value_name = "FILE"
    )]
    manifest: PathBuf,
}

#[derive(Parser)]
struct InputArgs {
    /// Whole command line as one string
    #[arg(
        short,
        long,
        value_name = "LINE",
        allow_hyphen_values = true,
        conflicts_with = "args"
    )]
    line: Option<String>,

    /// Arguments after `--`, joined with single spaces
    #[arg(last = true, allow_hyphen_values = true, value_name = "ARGS")]
    args: Vec<String>,
}

impl InputArgs {
    fn command_line(&self) -> String {
        match &self.line {
            Some(line) => line.clone(),
            None => self.args.join(" "),
        }
    }
}

#[derive(Parser)]
struct ParseArgs {
    #[command(flatten)]
    manifest: ManifestArgs,

    #[command(flatten)]
    input: InputArgs,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ParseReport<'a> {
    results: &'a [ParsedArg],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    missing_required: Vec<i32>,
}

impl<'a> ParseReport<'a> {
    fn new(outcome: &'a ParseOutcome) -> Self {
        Self {
            results: outcome.results(),
            error: outcome.error().map(ToString::to_string),
            missing_required: outcome.missing_required(),
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Parse(args) => parse(args),
        Commands::Tokens(args) => tokens(args),
        Commands::Help(args) => help(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    tracing::debug!("executing init command");
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
    let dest = write_default_manifest(&dir, args.force)?;

    eprintln!("Created: {}", dest.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit {DEFAULT_MANIFEST_NAME} to declare your arguments");
    eprintln!("  2. Run: argline help");
    eprintln!("  3. Run: argline parse -- <ARGS>");
    Ok(())
}

fn load_parser(manifest_path: &Path) -> Result<argline::Parser> {
    let manifest = load_manifest(manifest_path)?;
    manifest
        .to_parser()
        .with_context(|| format!("invalid manifest: {}", manifest_path.display()))
}

fn parse(args: ParseArgs) -> Result<()> {
    tracing::debug!("executing parse command");
    let mut parser = load_parser(&args.manifest.manifest)?;
    let line = args.input.command_line();
    let outcome = parser.parse_line(&line);

    if args.json {
        let report = ParseReport::new(&outcome);
        let json = serde_json::to_string_pretty(&report).context("failed to serialize outcome")?;
        println!("{json}");
    } else {
        for r in outcome.results() {
            println!("{}\t{}", r.id, r.value);
        }
    }

    if let Some(err) = outcome.error() {
        bail!("{err}");
    }
    // An exclusive switch (`--help`, `--version`) satisfies the line on its own.
    let exclusive = outcome.results().iter().any(|r| {
        parser
            .spec_by_id(r.id)
            .is_some_and(|s| s.class() == ArgClass::ExclusiveSwitch)
    });
    if outcome.is_missing_required() && !exclusive {
        let ids: Vec<String> = outcome
            .missing_required()
            .iter()
            .map(|id| match parser.spec_by_id(*id) {
                Some(spec) if spec.has_long_name() => spec.long_flag(),
                Some(spec) if spec.has_short_name() => spec.short_flag(),
                _ => id.to_string(),
            })
            .collect();
        bail!("missing required arguments: {}", ids.join(", "));
    }
    Ok(())
}

fn tokens(args: InputArgs) -> Result<()> {
    tracing::debug!("executing tokens command");
    for token in split_line(&args.command_line(), &DEFAULT_DELIMITERS) {
        println!("{token}");
    }
    Ok(())
}

fn help(args: ManifestArgs) -> Result<()> {
    tracing::debug!("executing help command");
    let parser = load_parser(&args.manifest)?;
    println!("{}", parser.help());
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
