use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueHint};

use flashdeck::commands::review::ReviewOptions;
use flashdeck::commands::settings::Toggle;
use flashdeck::commands::settings as settings_cmd;
use flashdeck::commands::{clear, create, folders, review};
use flashdeck::logging::init_logging;
use flashdeck::selection::Mode;
use flashdeck::settings::{AppPaths, Settings};
use flashdeck::utils::get_data_dir;

#[derive(Parser, Debug)]
#[command(
    name = "flashdeck",
    version,
    about = "Typewriter-style flashcard review for the terminal.",
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Results file to use instead of the one in the data directory
    #[arg(long, global = true, value_name = "PATH", value_hint = ValueHint::FilePath)]
    results: Option<PathBuf>,
    /// Write debug output to the log file
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Review the flashcards in one folder
    Review {
        /// Directory whose subfolders hold flashcard text files
        #[arg(value_name = "DIR", value_hint = ValueHint::DirPath)]
        directory: PathBuf,
        /// Folder to review. You are asked to pick one when omitted.
        #[arg(value_name = "FOLDER")]
        folder: Option<String>,
        /// Order in which cards are shown
        #[arg(long, value_enum, default_value_t = Mode::Random)]
        mode: Mode,
        /// Characters revealed per second for this session (10-200)
        #[arg(long, value_name = "CHARS")]
        speed: Option<u32>,
        /// Disable sounds for this session
        #[arg(long, default_value_t = false)]
        mute: bool,
    },
    /// List folders with their flashcard counts and results
    Folders {
        #[arg(value_name = "DIR", value_hint = ValueHint::DirPath)]
        directory: PathBuf,
    },
    /// Write new flashcards into a folder
    Create {
        #[arg(value_name = "DIR", value_hint = ValueHint::DirPath)]
        directory: PathBuf,
    },
    /// Clear stored results for a category.
    ///
    /// Every stored path that contains CATEGORY is removed, so clearing
    /// "Math" also clears "Math2".
    Clear {
        #[arg(value_name = "CATEGORY")]
        category: String,
        /// Skip the confirmation prompt
        #[arg(long, short, default_value_t = false)]
        yes: bool,
    },
    /// Show or change typing speed and sound settings
    Settings {
        /// Characters revealed per second (10-200)
        #[arg(long, value_name = "CHARS")]
        speed: Option<u32>,
        /// Turn sounds on or off
        #[arg(long, value_enum)]
        sound: Option<Toggle>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("{:?}", err);
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let paths = AppPaths::in_dir(get_data_dir()?, cli.results);
    let _log_guard = init_logging(&paths.log_file, cli.verbose)?;
    let settings = Settings::load(&paths.settings).context("Unable to load settings")?;
    tracing::debug!(?paths, ?settings, "starting");

    match cli.command {
        Command::Review {
            directory,
            folder,
            mode,
            speed,
            mute,
        } => {
            let options = ReviewOptions {
                directory,
                folder,
                mode,
                typing_speed: speed,
                mute,
            };
            review::run(&paths, settings, options).await?;
        }
        Command::Folders { directory } => folders::run(&paths, directory)?,
        Command::Create { directory } => create::run(directory)?,
        Command::Clear { category, yes } => clear::run(&paths, category, yes)?,
        Command::Settings { speed, sound } => {
            settings_cmd::run(&paths, settings, speed, sound)?
        }
    }

    Ok(())
}
