use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use conway_comms::communication::{
    by_shared_entities, communication_from_changes, CommunicationOptions,
};
use conway_comms::effort::validate_efforts;
use conway_core::{Change, ConwayConfig, Effort, PairOrder, SortOrder};

#[derive(Parser)]
#[command(
    name = "conway",
    version,
    about = "Communication strength between contributors",
    long_about = "Conway estimates how much contributors need to talk to each other.\n\n\
                   For every pair of authors sharing an entity (file, function, ...), it counts\n\
                   the shared entities and normalizes them by the pair's averaged revisions.\n\n\
                   Examples:\n  \
                     conway communication --file efforts.json\n  \
                     conway communication --input changes --sort strength < changes.json\n  \
                     conway init                        Create a .conway.toml config file"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (default: .conway.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Compute communication strength between co-authors
    #[command(long_about = "Compute communication strength between co-authors.\n\n\
        Reads JSON from a file or stdin and writes the records as JSON to stdout.\n\
        Efforts input: [{\"entity\": \"a.rs\", \"authors\": [{\"author\": \"alice\", \"revisions\": 3}]}]\n\
        Changes input: [{\"entity\": \"a.rs\", \"author\": \"alice\", \"revision\": \"3f2a9c1\"}]\n\n\
        Examples:\n  conway communication --file efforts.json\n  conway communication --input changes --min-shared 2")]
    Communication {
        /// Read input from file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,

        /// Shape of the input JSON
        #[arg(long, default_value = "efforts")]
        input: InputKind,

        /// Author/peer labelling (overrides config)
        #[arg(long)]
        pair_order: Option<PairOrder>,

        /// Output ordering (overrides config)
        #[arg(long)]
        sort: Option<SortOrder>,

        /// Minimum shared entities (overrides config)
        #[arg(long)]
        min_shared: Option<u32>,

        /// Minimum strength (overrides config)
        #[arg(long)]
        min_strength: Option<f64>,

        /// Maximum records to emit
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Create a default .conway.toml configuration file
    #[command(long_about = "Create a default .conway.toml configuration file.\n\n\
        Fails if .conway.toml already exists.")]
    Init,
}

#[derive(Clone, ValueEnum)]
enum InputKind {
    /// Per-entity author revision counts
    Efforts,
    /// Raw (entity, author, revision) rows
    Changes,
}

const DEFAULT_CONFIG: &str = r#"# Conway configuration

[communication]
# Label pairs alphabetically ("canonical") or as first seen ("encounter")
pair_order = "canonical"
# Order records by "pair" or by descending "strength"
sort = "pair"
# Drop pairs sharing fewer entities than this
min_shared = 1
# Drop pairs weaker than this
min_strength = 0.0
# Tally in parallel from this many efforts (0 disables)
parallel_threshold = 1024
"#;

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("CONWAY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ConwayConfig> {
    match path {
        Some(path) => ConwayConfig::from_file(path)
            .into_diagnostic()
            .wrap_err(format!("loading {}", path.display())),
        None => {
            let default_path = Path::new(".conway.toml");
            if default_path.exists() {
                ConwayConfig::from_file(default_path)
                    .into_diagnostic()
                    .wrap_err("loading .conway.toml")
            } else {
                Ok(ConwayConfig::default())
            }
        }
    }
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err(format!("reading {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .into_diagnostic()
                .wrap_err("reading stdin")?;
            Ok(input)
        }
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Communication {
            ref file,
            ref input,
            pair_order,
            sort,
            min_shared,
            min_strength,
            limit,
        } => {
            let mut options = CommunicationOptions::from(&config.communication);
            if let Some(pair_order) = pair_order {
                options.pair_order = pair_order;
            }
            if let Some(sort) = sort {
                options.sort = sort;
            }
            if let Some(min_shared) = min_shared {
                options.min_shared = min_shared;
            }
            if let Some(min_strength) = min_strength {
                options.min_strength = min_strength;
            }
            debug!(?options, "resolved communication options");

            let raw = read_input(file.as_deref())?;
            let mut records = match input {
                InputKind::Efforts => {
                    let efforts: Vec<Effort> = serde_json::from_str(&raw)
                        .into_diagnostic()
                        .wrap_err("parsing efforts JSON")?;
                    validate_efforts(&efforts).into_diagnostic()?;
                    by_shared_entities(&efforts, &options).into_diagnostic()?
                }
                InputKind::Changes => {
                    let changes: Vec<Change> = serde_json::from_str(&raw)
                        .into_diagnostic()
                        .wrap_err("parsing changes JSON")?;
                    communication_from_changes(&changes, &options).into_diagnostic()?
                }
            };

            if let Some(limit) = limit {
                records.truncate(limit);
            }

            println!(
                "{}",
                serde_json::to_string_pretty(&records).into_diagnostic()?
            );
        }
        Command::Init => {
            let path = Path::new(".conway.toml");
            if path.exists() {
                miette::bail!(".conway.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .conway.toml with default configuration");
        }
    }

    Ok(())
}
