use clap::{Parser, Subcommand};
use goat_updater::database::ensure_parent_dir;
use goat_updater::*;
use tracing::Level;

mod commands;

use commands::install::InstallArgs;
use commands::run_single::RunSingleArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.goat/goat.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Output format: table, markdown, json, json-pretty
    #[clap(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered updaters with their installed version
    List,

    /// Show pending installs and updates
    Status,

    /// Install every missing updater and run every pending update
    Run,

    /// Run a single update without recording its version
    RunSingle(RunSingleArgs),

    /// Install one updater
    Install(InstallArgs),

    /// Show the effective configuration
    Config,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match GoatConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    if cli.debug || config.debug {
        tracing_subscriber::fmt()
            // filter spans/events with level TRACE or higher.
            .with_max_level(Level::INFO)
            .init();
    }

    if let Err(e) = dispatch(cli.command, &config, cli.format) {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

fn dispatch(command: Commands, config: &GoatConfig, format: OutputFormat) -> anyhow::Result<()> {
    if let Commands::Config = command {
        return commands::config::run(config, format);
    }

    ensure_parent_dir(&config.database_path)?;
    let db = DatabaseConn::open_path(&config.database_path)?;
    let (registry, indexes) = config.registry()?;
    let manager = InstallManager::new(&db, &registry, indexes);

    match command {
        Commands::List => commands::list::run(&manager, format),
        Commands::Status => commands::status::run(&manager, format),
        Commands::Run => commands::run::run(&manager),
        Commands::RunSingle(args) => commands::run_single::run(&manager, args),
        Commands::Install(args) => commands::install::run(&manager, args),
        Commands::Config => commands::config::run(config, format),
    }
}
