use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use jem_util::{
    commands,
    logger::Level,
    paths::Paths,
    ui::{ColorMode, Ui},
};

#[derive(Parser)]
#[command(name = "jem")]
#[command(about = "Recursive directory copy, move and delete, plus small file utilities")]
#[command(version)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// When to use colors: always, auto, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Config file to use instead of ~/.jem/config.json
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy a directory tree
    Cp { src: PathBuf, dst: PathBuf },

    /// Move a directory tree (copy, then delete the source)
    Mv { src: PathBuf, dst: PathBuf },

    /// Delete a directory tree
    Rm {
        path: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List the entries of a directory
    Ls {
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Only list regular files
        #[arg(long)]
        files: bool,
    },

    /// Show type, size and modification time of a path
    Stat { path: PathBuf },

    /// Read and write ~/.jem/config.json
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Append a line to the application log
    Log {
        /// info, warning or error
        level: Level,
        message: String,
    },

    /// Print shell completions
    Completions { shell: Shell },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the value stored under a key
    Get { key: String },

    /// Store a value; parsed as JSON when possible, otherwise kept as a string
    Set { key: String, value: String },

    /// List every key and value
    List,
}

fn init_tracing(ui: &Ui) {
    let filter = EnvFilter::try_from_env("JEM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(ui.color_enabled)
                .with_target(false),
        )
        .init();
}

fn run(cli: Cli, ui: &Ui) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "jem", &mut std::io::stdout());
        return Ok(());
    }

    let mut paths = Paths::new()?;
    if let Some(config) = cli.config {
        paths = paths.with_config_file(config);
    }
    paths.ensure_dirs()?;

    match cli.command {
        Commands::Cp { src, dst } => commands::cp(&paths, &src, &dst, ui),
        Commands::Mv { src, dst } => commands::mv(&paths, &src, &dst, ui),
        Commands::Rm { path, force } => commands::rm(&paths, &path, ui, force),
        Commands::Ls { dir, files } => commands::ls(&dir, files, ui),
        Commands::Stat { path } => commands::stat_path(&path, ui),
        Commands::Config(ConfigCommand::Get { key }) => commands::config_get(&paths, &key, ui),
        Commands::Config(ConfigCommand::Set { key, value }) => {
            commands::config_set(&paths, &key, &value, ui)
        }
        Commands::Config(ConfigCommand::List) => commands::config_list(&paths, ui),
        Commands::Log { level, message } => commands::log(&paths, level, &message, ui),
        Commands::Completions { .. } => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let ui = Ui::new(cli.color, cli.no_color);
    init_tracing(&ui);

    match run(cli, &ui) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui.err(format!("{e:#}"));
            ExitCode::from(commands::exit_code(&e))
        }
    }
}
