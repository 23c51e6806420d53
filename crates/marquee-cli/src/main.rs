use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod commands;
mod config;

use config::Config;

#[derive(Debug, Parser)]
#[command(name = "marquee", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the movie catalog JSON (default: from config)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Path to the similarity matrix JSON (default: from config)
    #[arg(long, global = true)]
    similarity: Option<PathBuf>,

    /// Log at debug level regardless of configuration
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Recommend movies similar to a title
    ///
    /// Looks up the title in the catalog (exact, case-sensitive match), reads
    /// its row of the similarity matrix and prints the highest-scoring other
    /// movies, best first. Movies with equal scores are listed in catalog
    /// order. The title itself is never recommended.
    ///
    /// If the title is not in the catalog the command fails and lists
    /// catalog titles that contain it, ignoring case. Use 'marquee titles'
    /// to browse exact titles.
    Recommend {
        /// Exact title as listed in the catalog
        title: String,

        /// Number of recommendations (default: top_k from config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Show the similarity score next to each title
        #[arg(long)]
        scores: bool,

        /// Print recommendations as JSON
        #[arg(long)]
        json: bool,
    },
    /// List catalog titles
    Titles {
        /// Only show titles containing this text (case-insensitive)
        filter: Option<String>,
    },
    /// Validate the catalog and similarity matrix and show a summary
    Status,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print one value, or the whole config file when no key is given
    Get {
        /// One of: catalog_path, similarity_path, top_k, logging.level, logging.coloured
        key: Option<String>,
    },
    /// Set a value in the config file
    Set { key: String, value: String },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults if it does not exist
    Init,
}

fn load_config(
    catalog: Option<PathBuf>,
    similarity: Option<PathBuf>,
    verbose: bool,
) -> Result<Config> {
    let config = Config::load()?.with_overrides(catalog, similarity);
    config::setup_logging(&config.logging, verbose)?;
    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Recommend {
            title,
            top_k,
            scores,
            json,
        } => {
            let config = load_config(cli.catalog, cli.similarity, cli.verbose)?;
            commands::run_recommend(&config, &title, top_k, scores, json)?;
        }
        Commands::Titles { filter } => {
            let config = load_config(cli.catalog, cli.similarity, cli.verbose)?;
            commands::list_titles(&config, filter.as_deref())?;
        }
        Commands::Status => {
            let config = load_config(cli.catalog, cli.similarity, cli.verbose)?;
            commands::show_status(&config)?;
        }
        // Only show and get need the effective configuration, so a broken
        // config file can still be located and repaired.
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let config = load_config(cli.catalog, cli.similarity, cli.verbose)?;
                commands::config::show_config(&config)?;
            }
            ConfigAction::Get { key } => {
                let config = load_config(cli.catalog, cli.similarity, cli.verbose)?;
                commands::config::get_config(&config, key)?;
            }
            ConfigAction::Set { key, value } => commands::config::set_config(key, value)?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
