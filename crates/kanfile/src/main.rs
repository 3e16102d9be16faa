//! CLI entry point for kanfile.

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use kanfile_app::Board;
use kanfile_store_json::{JsonFileStore, MemoryStore};

use config::BoardConfig;

mod commands;
mod config;
mod view;

/// A kanban board kept in one JSON document, no server attached.
#[derive(Parser, Debug)]
#[command(
    name = "kanfile",
    version,
    about = "kanfile: a personal kanban board stored as a single JSON document"
)]
struct Cli {
    /// Path of the board document (defaults to the configured data file).
    #[arg(long)]
    data: Option<PathBuf>,

    /// Keep the board in memory only; nothing is written to disk.
    #[arg(long)]
    ephemeral: bool,

    #[command(subcommand)]
    cmd: Command,
}

/// Output shape for list-like commands.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable text.
    Table,
    /// Machine-readable JSON.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Json => "json",
        })
    }
}

/// Export representations.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ExportFormat {
    /// Complete data, best for reimporting.
    Json,
    /// Spreadsheet-friendly rows.
    Csv,
    /// Human-readable status-grouped document.
    Markdown,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Markdown => "markdown",
        })
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new task, directly or from a template.
    New {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// Due date as RFC 3339.
        #[arg(long)]
        due: Option<String>,
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,
        /// Expand a builtin template (see `kanfile templates`).
        #[arg(long)]
        template: Option<String>,
        /// Template variable as key=value; repeatable.
        #[arg(long = "var")]
        vars: Vec<String>,
        /// Expand a quick action; `--title` completes its title prefix.
        #[arg(long)]
        quick: Option<String>,
    },

    /// List tasks grouped by column.
    Ls {
        /// Free-text search over title, description, and tags.
        #[arg(long)]
        text: Option<String>,
        /// Priority filter (low, medium, high, or all).
        #[arg(long)]
        priority: Option<String>,
        /// Status filter (todo, in-progress, done, or all).
        #[arg(long)]
        status: Option<String>,
        /// Due bucket filter (overdue, due-today, due-week, no-due-date, or all).
        #[arg(long)]
        due: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show one task in full.
    Show {
        #[arg(long)]
        task: String,
    },

    /// Edit fields of an existing task.
    Edit {
        #[arg(long)]
        task: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// New description; an empty string clears it.
        #[arg(long)]
        description: Option<String>,
        /// New due date as RFC 3339.
        #[arg(long)]
        due: Option<String>,
        /// Remove the due date.
        #[arg(long)]
        clear_due: bool,
        /// Desired tag set; repeatable, replaces the current tags.
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,
        /// Remove every tag.
        #[arg(long)]
        clear_tags: bool,
    },

    /// Move tasks to another column, or drop one onto another task.
    Mv {
        #[arg(long = "task")]
        tasks: Vec<String>,
        /// Target column for a bulk move.
        #[arg(long)]
        status: Option<String>,
        /// Drop the single named task onto this task (reorders within a
        /// column, moves across columns).
        #[arg(long)]
        onto: Option<String>,
    },

    /// Delete tasks.
    Rm {
        #[arg(long = "task")]
        tasks: Vec<String>,
    },

    /// Merge a JSON export into the board; duplicate ids are skipped.
    Import {
        /// File to read, or `-` for stdin.
        #[arg(long, default_value = "-")]
        file: String,
    },

    /// Export the board.
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Write to a file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also copy the export to the clipboard (best effort).
        #[arg(long)]
        copy: bool,
    },

    /// Show aggregate board statistics.
    Stats {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List builtin templates and quick actions.
    Templates,
}

fn main() -> Result<()> {
    install_tracing();

    let Cli { data, ephemeral, cmd } = Cli::parse();
    let config = BoardConfig::load()?;

    if ephemeral {
        let board = Board::open(MemoryStore::unavailable())?;
        commands::run(cmd, board, &config)
    } else {
        let path = config.resolve_data_path(data)?;
        let board = Board::open(JsonFileStore::new(path))?;
        commands::run(cmd, board, &config)
    }
}

fn install_tracing() {
    // RUST_LOG overrides the default INFO level.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_new_command() {
        let cli = Cli::parse_from([
            "kanfile",
            "new",
            "--title",
            "Improve docs",
            "--status",
            "todo",
            "--priority",
            "high",
            "--tag",
            "docs",
        ]);

        match cli.cmd {
            Command::New {
                title,
                status,
                priority,
                tags,
                ..
            } => {
                assert_eq!(title.as_deref(), Some("Improve docs"));
                assert_eq!(status.as_deref(), Some("todo"));
                assert_eq!(priority.as_deref(), Some("high"));
                assert_eq!(tags, vec!["docs"]);
            }
            _ => panic!("expected new command"),
        }
    }

    #[test]
    fn parse_new_from_template() {
        let cli = Cli::parse_from([
            "kanfile",
            "new",
            "--template",
            "bug-fix",
            "--var",
            "bug_title=Login fails",
        ]);

        match cli.cmd {
            Command::New { template, vars, .. } => {
                assert_eq!(template.as_deref(), Some("bug-fix"));
                assert_eq!(vars, vec!["bug_title=Login fails"]);
            }
            _ => panic!("expected new command"),
        }
    }

    #[test]
    fn parse_ls_filters() {
        let cli = Cli::parse_from([
            "kanfile",
            "ls",
            "--text",
            "crash",
            "--due",
            "overdue",
            "--format",
            "json",
        ]);

        match cli.cmd {
            Command::Ls { text, due, format, .. } => {
                assert_eq!(text.as_deref(), Some("crash"));
                assert_eq!(due.as_deref(), Some("overdue"));
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected ls command"),
        }
    }

    #[test]
    fn parse_mv_onto() {
        let cli = Cli::parse_from(["kanfile", "mv", "--task", "a", "--onto", "b"]);
        match cli.cmd {
            Command::Mv { tasks, onto, status } => {
                assert_eq!(tasks, vec!["a"]);
                assert_eq!(onto.as_deref(), Some("b"));
                assert!(status.is_none());
            }
            _ => panic!("expected mv command"),
        }
    }

    #[test]
    fn parse_ephemeral_flag() {
        let cli = Cli::parse_from(["kanfile", "--ephemeral", "templates"]);
        assert!(cli.ephemeral);
    }
}
