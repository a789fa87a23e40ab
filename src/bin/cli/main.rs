mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "studydeck-cli", about = "Study flashcards and explore roadmaps", version)]
struct Cli {
    /// Use a specific settings file (default: <config dir>/studydeck/settings.toml)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Study the due cards from a JSON card file
    Study {
        /// JSON array of cards
        cards: PathBuf,
        /// API base URL to submit reviews to (offline if omitted)
        #[arg(long)]
        api_url: Option<String>,
        /// Bearer token for the API
        #[arg(long)]
        token: Option<String>,
        /// Seed for re-insertion order (reproducible sessions)
        #[arg(long)]
        seed: Option<u64>,
        /// Study every card, not only the due ones
        #[arg(long)]
        all: bool,
        /// Maximum cards in the session
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Lay out a roadmap tree
    Roadmap {
        /// JSON roadmap tree
        roadmap: PathBuf,
        /// JSON array of node mastery rows
        #[arg(long)]
        mastery: Option<PathBuf>,
    },

    /// AI provider settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Show current settings (API keys masked)
    Show,

    /// Rewrite a settings file in the current schema
    Migrate {
        /// Settings file to migrate
        file: PathBuf,
    },

    /// Import settings exported from the web client's local storage
    ImportLegacy {
        /// JSON export
        json: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let app = app::App::new(cli.settings)?;

    match cli.command {
        Command::Study {
            cards,
            api_url,
            token,
            seed,
            all,
            limit,
        } => {
            let options = commands::study::StudyOptions {
                cards,
                api_url,
                token,
                seed,
                all,
                limit,
            };
            commands::study::run(&app, options, &cli.format, use_color)?;
        }
        Command::Roadmap { roadmap, mastery } => {
            commands::roadmap::run(&app, &roadmap, mastery.as_deref(), &cli.format, use_color)?;
        }
        Command::Settings(subcmd) => match subcmd {
            SettingsCommand::Show => {
                commands::settings::run_show(&app, &cli.format)?;
            }
            SettingsCommand::Migrate { file } => {
                commands::settings::run_migrate(&file)?;
            }
            SettingsCommand::ImportLegacy { json } => {
                commands::settings::run_import_legacy(&app, &json)?;
            }
        },
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
