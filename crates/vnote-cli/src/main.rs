mod cmd_list;
mod cmd_open;
mod cmd_preview;
mod cmd_validate;
mod cmd_watch;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use vnote::{OutputMode, Unavailable};

#[derive(Parser, Debug)]
#[command(name = "vnote")]
#[command(about = "Assemble virtual variants of markdown notes from patterns")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Vault root directory
    #[arg(long, global = true, default_value = ".")]
    vault: PathBuf,

    /// Settings file (defaults to <vault>/.vnote.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble and print every variant of a note
    Preview {
        /// Note path, relative to the vault or on disk
        note: String,

        /// How to lay out the variants (defaults to the settings file)
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Keep watching the vault and reprint on change
        #[arg(long)]
        watch: bool,
    },
    /// Assemble and print a single variant
    Open {
        /// Note path, relative to the vault or on disk
        note: String,

        /// Variant id (defaults to the first variant)
        #[arg(long)]
        id: Option<String>,
    },
    /// List notes with a pattern, or the variants of one note
    List {
        /// Note path; if omitted, lists every note that has a pattern
        note: Option<String>,
    },
    /// Validate a pattern file
    Validate {
        /// Pattern file
        pattern: PathBuf,
    },
    /// Watch a note and reprint its variants whenever the vault changes
    Watch {
        /// Note path, relative to the vault or on disk
        note: String,

        /// How to lay out the variants (defaults to the settings file)
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Separate,
    Single,
}

impl From<ModeArg> for OutputMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Separate => OutputMode::Separate,
            ModeArg::Single => OutputMode::Single,
        }
    }
}

/// Exit status when a command does not apply to the note.
const EXIT_UNAVAILABLE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.downcast_ref::<Unavailable>().is_some() => {
            eprintln!("{}", e);
            ExitCode::from(EXIT_UNAVAILABLE)
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let format = output::Format::new(cli.json, cli.pretty);
    let load = || context::Context::load(&cli.vault, cli.config.as_deref());

    match cli.command {
        Commands::Preview { note, mode, watch } => {
            let ctx = load()?;
            let mode = mode.map(Into::into);
            if watch || ctx.settings.auto_update {
                cmd_watch::run(&ctx, &note, mode, format)
            } else {
                cmd_preview::run(&ctx, &note, mode, format)
            }
        }
        Commands::Open { note, id } => cmd_open::run(&load()?, &note, id.as_deref(), format),
        Commands::List { note } => cmd_list::run(&load()?, note.as_deref(), format),
        Commands::Validate { pattern } => cmd_validate::run(pattern),
        Commands::Watch { note, mode } => {
            cmd_watch::run(&load()?, &note, mode.map(Into::into), format)
        }
    }
}
