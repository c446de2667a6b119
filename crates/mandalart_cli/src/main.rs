//! Terminal host for the mandalart board.
//!
//! # Responsibility
//! - Play the rendering layer: show views, feed edits into them.
//! - Provide the confirmation and export collaborators.
//! - Surface non-fatal warnings on stderr without failing the command.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use mandalart_core::db::open_db;
use mandalart_core::{
    default_log_level, init_logging, BoardService, CellPos, KvRepository, PersistenceGateway,
    SettingsPatch, SqliteKvRepository, TextExporter, ViewKind,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mandalart", version, about = "9x9 goal-planning board")]
struct Cli {
    /// Board database file.
    #[arg(long, env = "MANDALART_DB", default_value = "mandalart.sqlite3", global = true)]
    db: PathBuf,
    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "MANDALART_LOG_DIR", global = true)]
    log_dir: Option<String>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    Grid,
    List,
}

impl From<ViewArg> for ViewKind {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::Grid => ViewKind::Grid,
            ViewArg::List => ViewKind::List,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the board through one of its views.
    Show {
        #[arg(long, value_enum, default_value = "grid")]
        view: ViewArg,
    },
    /// Edit one cell; linked cells follow automatically.
    Set {
        /// Block index 0-8 (4 is the center block).
        block: usize,
        /// Cell index 0-8 inside the block (4 is the center cell).
        cell: usize,
        value: String,
        /// Type the value into this view instead of editing the grid directly.
        #[arg(long, value_enum)]
        via: Option<ViewArg>,
    },
    /// Clear every cell.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or change presentation settings.
    Settings(SettingsArgs),
    /// Write a plain-text snapshot of the board.
    Export {
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Show { .. } => "show",
            Self::Set { .. } => "set",
            Self::Reset { .. } => "reset",
            Self::Settings(_) => "settings",
            Self::Export { .. } => "export",
        }
    }
}

#[derive(Args)]
struct SettingsArgs {
    #[arg(long)]
    font_size: Option<u32>,
    #[arg(long)]
    background_color: Option<String>,
    #[arg(long, conflicts_with = "clear_text_color")]
    text_color: Option<String>,
    #[arg(long)]
    clear_text_color: bool,
}

impl SettingsArgs {
    fn into_patch(self) -> SettingsPatch {
        let text_color = if self.clear_text_color {
            Some(None)
        } else {
            self.text_color.map(Some)
        };
        SettingsPatch {
            font_size: self.font_size,
            background_color: self.background_color,
            text_color,
        }
    }
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or_else(|| default_log_level());
        init_logging(level, log_dir).context("initialize logging")?;
    }

    let conn = open_db(&cli.db).with_context(|| format!("open board {}", cli.db.display()))?;
    let repo = SqliteKvRepository::try_new(&conn).context("prepare board storage")?;
    let mut board = BoardService::open(PersistenceGateway::new(repo));
    let name = cli.command.name();
    let result = execute(&mut board, cli.command);
    match &result {
        Ok(()) => info!("event=cli_command module=cli status=ok command={name}"),
        Err(_) => warn!("event=cli_command module=cli status=error command={name}"),
    }
    report_warnings(&mut board);
    result
}

fn execute<K: KvRepository>(board: &mut BoardService<K>, command: Command) -> Result<()> {
    match command {
        Command::Show { view } => {
            let kind = ViewKind::from(view);
            board.switch_view(kind)?;
            let text = board
                .view(kind)
                .and_then(|view| view.render())
                .context("view is not mounted")?;
            print!("{text}");
        }
        Command::Set {
            block,
            cell,
            value,
            via,
        } => {
            let pos = CellPos::try_new(block, cell)?;
            let outcomes = match via {
                Some(view) => {
                    let kind = ViewKind::from(view);
                    board.switch_view(kind)?;
                    board.type_into(kind, pos, &value)?
                }
                None => vec![board.apply_edit(pos, &value)],
            };
            for outcome in outcomes {
                let written = outcome
                    .written_positions()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>();
                println!("updated {}", written.join(" "));
            }
        }
        Command::Reset { yes } => {
            let mut confirm = |prompt: &str| yes || prompt_yes_no(prompt);
            if board.reset(&mut confirm) {
                println!("board cleared");
            } else {
                println!("reset cancelled");
            }
        }
        Command::Settings(args) => {
            let patch = args.into_patch();
            let settings = if patch.is_empty() {
                board.settings()
            } else {
                board.update_settings(patch)?
            };
            println!("fontSize={}", settings.font_size);
            println!("backgroundColor={}", settings.background_color);
            if let Some(color) = &settings.text_color {
                println!("textColor={color}");
            }
        }
        Command::Export { out } => {
            if let Some(artifact) = board.export(&TextExporter::new(out)) {
                println!("exported {} ({} bytes)", artifact.path.display(), artifact.bytes);
            }
        }
    }
    Ok(())
}

fn prompt_yes_no(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn report_warnings<K: KvRepository>(board: &mut BoardService<K>) {
    for warning in board.take_warnings() {
        eprintln!("warning: {warning}");
    }
}
