//! CLI frontend for the Zustand condition tracker.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "zs",
    about = "Zustand: track tabletop RPG conditions and resolve checks",
    version,
    propagate_version = true
)]
struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List conditions in the catalog
    List {
        /// Only show conditions whose id or name contains this text
        filter: Option<String>,

        /// Only show incremental conditions
        #[arg(short, long)]
        incremental: bool,

        /// Catalog JSON file (default: built-in catalog)
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// Show the rules for a condition
    Show {
        /// Condition reference id
        reference: String,

        /// Catalog JSON file (default: built-in catalog)
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// Validate a catalog file strictly and report dangling references
    Check {
        /// Catalog JSON file (default: built-in catalog)
        path: Option<PathBuf>,
    },

    /// Roll a check and report the degree of success
    Roll {
        /// Bonus added to the die
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        modifier: i32,

        /// Difficulty class to meet
        #[arg(long)]
        dc: i32,

        /// Die to roll (d4, d6, d8, d10, d12, d20, d100, or dN)
        #[arg(long, default_value = "d20")]
        die: String,

        /// RNG seed for a reproducible roll
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Roll a check for an action and print the matching effect
    Action {
        /// Action reference id
        reference: String,

        /// Bonus added to the die
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        modifier: i32,

        /// Difficulty class to meet
        #[arg(long)]
        dc: i32,

        /// RNG seed for a reproducible roll
        #[arg(short, long)]
        seed: Option<u64>,

        /// Catalog JSON file (default: built-in catalog)
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// Start an interactive tracking session for one entity
    Track {
        /// Catalog JSON file (default: built-in catalog)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// RNG seed for reproducible rolls
        #[arg(short, long)]
        seed: Option<u64>,

        /// Reject negative or fractional levels instead of coercing them
        #[arg(long)]
        strict_levels: bool,

        /// Give up on a level prompt after this many tries
        #[arg(long)]
        max_prompt_attempts: Option<u32>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::List {
            filter,
            incremental,
            catalog,
        } => commands::list::run(catalog.as_deref(), filter.as_deref(), incremental),
        Commands::Show { reference, catalog } => {
            commands::show::run(catalog.as_deref(), &reference)
        }
        Commands::Check { path } => commands::check::run(path.as_deref()),
        Commands::Roll {
            modifier,
            dc,
            die,
            seed,
        } => commands::roll::run(&die, modifier, dc, seed),
        Commands::Action {
            reference,
            modifier,
            dc,
            seed,
            catalog,
        } => commands::action::run(catalog.as_deref(), &reference, modifier, dc, seed),
        Commands::Track {
            catalog,
            seed,
            strict_levels,
            max_prompt_attempts,
        } => commands::track::run(catalog.as_deref(), seed, strict_levels, max_prompt_attempts),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
