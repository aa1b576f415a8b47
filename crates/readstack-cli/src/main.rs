//! Read Stack CLI
//!
//! Command-line interface for Read Stack - a personal reading tracker.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use readstack_core::{Category, Config, Filter, Status, Store};

mod commands;
mod editor;
mod logging;
mod output;

use commands::book::EditArgs;
use commands::LibraryStore;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "readstack")]
#[command(about = "Read Stack - Track the books you read")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a book to the library
    Add {
        /// Book title
        title: String,
        /// Author name
        author: String,
        /// Category (e.g. fiction, non-fiction, self-help)
        #[arg(short, long, default_value = "Other")]
        category: Category,
        /// Reading status (to-read, reading, finished)
        #[arg(short, long, default_value = "to-read")]
        status: Status,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List books
    #[command(alias = "ls")]
    List {
        /// Only show books under this filter (all, to-read, reading, finished)
        #[arg(short, long, default_value = "all")]
        filter: Filter,
    },
    /// Show book details
    Show {
        /// Book ID (full ID or prefix)
        id: String,
    },
    /// Edit a book
    Edit {
        /// Book ID (full ID or prefix)
        id: String,
        /// New title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// New author
        #[arg(short, long)]
        author: Option<String>,
        /// New notes
        #[arg(short, long)]
        notes: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<Category>,
        /// Edit notes in $EDITOR
        #[arg(short, long)]
        editor: bool,
    },
    /// Change the reading status of a book
    Status {
        /// Book ID (full ID or prefix)
        id: String,
        /// New status (to-read, reading, finished)
        status: Status,
    },
    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        /// Book ID (full ID or prefix)
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Show reading statistics
    Stats,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Start an interactive session
    Shell {
        /// Initial location, e.g. "?filter=reading"
        #[arg(short, long)]
        location: Option<String>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, backend, slot, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Configuration commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    logging::init(&config);

    let mut store: LibraryStore = Store::open(config.open_slot()?);
    debug!(backend = %config.backend, slot = %config.slot, books = store.len(), "store opened");

    match cli.command {
        Commands::Add {
            title,
            author,
            category,
            status,
            notes,
        } => commands::book::add(&mut store, title, author, category, status, notes, &output),
        Commands::List { filter } => commands::book::list(&store, filter, &output),
        Commands::Show { id } => commands::book::show(&store, id, &output),
        Commands::Edit {
            id,
            title,
            author,
            notes,
            category,
            editor,
        } => {
            let args = EditArgs {
                title,
                author,
                notes,
                category,
                use_editor: editor,
            };
            commands::book::edit(&mut store, id, args, &output)
        }
        Commands::Status { id, status } => {
            commands::book::set_status(&mut store, id, status, &output)
        }
        Commands::Delete { id, force } => commands::book::delete(&mut store, id, force, &output),
        Commands::Stats => commands::stats::show(&store, &output),
        Commands::Shell { location } => commands::shell::run(store, location, output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_defaults() {
        let cli = Cli::try_parse_from(["readstack", "add", "Dune", "Frank Herbert"]).unwrap();
        match cli.command {
            Commands::Add {
                category, status, ..
            } => {
                assert_eq!(category, Category::Other);
                assert_eq!(status, Status::ToRead);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_list_filter() {
        let cli = Cli::try_parse_from(["readstack", "ls", "--filter", "reading", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::List {
                filter: Filter::Reading
            }
        ));

        assert!(Cli::try_parse_from(["readstack", "list", "--filter", "shelved"]).is_err());
    }

    #[test]
    fn test_parse_status_and_category() {
        let cli = Cli::try_parse_from(["readstack", "status", "abc", "finished"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Status {
                status: Status::Finished,
                ..
            }
        ));

        let cli =
            Cli::try_parse_from(["readstack", "edit", "abc", "--category", "self help"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Edit {
                category: Some(Category::SelfHelp),
                ..
            }
        ));
    }
}
