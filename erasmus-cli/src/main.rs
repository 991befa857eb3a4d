use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use erasmus_core::validation::validate_shared_state;
use erasmus_core::{codec, BudgetSummary, SharedState};
use erasmus_store::{StoreConfig, UrlStore};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod table;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Table format (default)
    Table,
    /// Pretty JSON
    Json,
}

#[derive(Parser)]
#[command(name = "erasmus")]
#[command(about = "Erasmus budget state and short-link tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct StoreArgs {
    /// Path to the JSON url table
    #[arg(long = "db", value_name = "PATH", env = "URL_DB_FILE", default_value = "data/url-store.json")]
    db_path: PathBuf,
}

impl StoreArgs {
    fn open(&self) -> Result<UrlStore> {
        debug!("Opening url table at {:?}", self.db_path);
        UrlStore::open(StoreConfig::new(&self.db_path)).context("Failed to open url table")
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a state JSON file ("-" for stdin) into a URL-safe string
    Encode {
        /// State file path
        input: PathBuf,
        /// Encode even if the state fails validation
        #[arg(long)]
        force: bool,
    },
    /// Decode an encoded state into JSON
    Decode {
        /// Encoded state
        encoded: String,
    },
    /// Show the cost breakdown of an encoded state
    Summary {
        /// Encoded state
        encoded: String,
        /// Output format (table, json)
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
    /// Store an encoded state and print its short id
    Shorten {
        #[command(flatten)]
        store: StoreArgs,
        /// Encoded state
        encoded: String,
    },
    /// Print the encoded state behind a short id
    Resolve {
        #[command(flatten)]
        store: StoreArgs,
        /// Short id
        id: String,
    },
    /// Remove links older than the retention window
    Cleanup {
        #[command(flatten)]
        store: StoreArgs,
        /// Maximum link age in days
        #[arg(long, default_value = "90")]
        max_age_days: u32,
    },
    /// List stored links
    List {
        #[command(flatten)]
        store: StoreArgs,
        /// Output format (table, json)
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
    /// Show url table statistics
    Stats {
        #[command(flatten)]
        store: StoreArgs,
    },
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))
    }
}

fn decode(encoded: &str) -> Result<SharedState> {
    match codec::decode_state(encoded) {
        Some(state) => Ok(state),
        None => bail!("Not a valid encoded state"),
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { input, force } => {
            let json = read_input(&input)?;
            let state: SharedState = serde_json::from_str(&json).context("Invalid state JSON")?;

            let errors = validate_shared_state(&state);
            if !errors.is_empty() {
                for error in &errors {
                    eprintln!("✗ {}", error);
                }
                if !force {
                    bail!("State has {} problem(s); use --force to encode anyway", errors.len());
                }
            }

            println!("{}", codec::encode_state(&state).context("Failed to encode state")?);
        }

        Commands::Decode { encoded } => {
            let state = decode(&encoded)?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }

        Commands::Summary { encoded, output } => {
            let state = decode(&encoded)?;
            let summary = BudgetSummary::calculate(&state);
            match output {
                OutputFormat::Table => {
                    println!("City: {}  Stay: {} months", state.city_id, state.stay_duration);
                    println!("{}", table::format_summary_table(&summary, state.stay_duration));
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                }
            }
        }

        Commands::Shorten { store, encoded } => {
            if encoded.trim().is_empty() {
                bail!("Missing state parameter");
            }
            if codec::decode_state(&encoded).is_none() {
                warn!("State does not decode; storing it as-is");
            }
            println!("{}", store.open()?.store(&encoded));
        }

        Commands::Resolve { store, id } => match store.open()?.resolve(&id) {
            Some(state) => println!("{}", state),
            None => bail!("Short URL not found: {}", id),
        },

        Commands::Cleanup { store, max_age_days } => {
            let removed = store.open()?.cleanup(max_age_days);
            println!("Removed {} link(s) older than {} days", removed, max_age_days);
        }

        Commands::List { store, output } => {
            let records = store.open()?.records();
            match output {
                OutputFormat::Table => {
                    println!("{}", table::format_records_table(&records));
                    println!();
                    println!("Count: {}", records.len());
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&records)?);
                }
            }
        }

        Commands::Stats { store } => {
            println!("{}", table::format_stats_table(&store.open()?.stats()));
        }
    }

    Ok(())
}
