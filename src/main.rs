use clap::{Parser, Subcommand};
use starmod::core::ModError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "starmod")]
#[command(about = "Local mod manager with a durable load order")]
#[command(version)]
struct Cli {
    /// Use this config file instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add mod archives to the end of the load order
    Add {
        /// Archive files (.zip, .rar, .7z)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Remove a mod from the list (uninstalling it first)
    Remove {
        /// Internal name of the mod
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Copy a mod's payload into the game directory
    Install {
        name: String,
    },
    /// Remove a mod's payload from the game directory
    Uninstall {
        name: String,
    },
    /// Hide a mod without removing it
    Hide {
        name: String,
    },
    /// Show a hidden mod again
    Unhide {
        name: String,
    },
    /// Move a mod toward the front (positive) or back (negative) of the load order
    Move {
        name: String,
        /// Number of places to move
        #[arg(allow_hyphen_values = true)]
        amount: i64,
    },
    /// List managed mods in load order
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check that files are genuine archives
    Verify {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show the files of an installed mod
    Files {
        name: String,
        /// Print the contents of manifest files
        #[arg(long)]
        show: bool,
    },
    /// Print the Adler-32 checksum of a file
    Checksum {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), ModError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Add { files } => cli::add::run(config, files).await,
        Commands::Remove { name, yes } => cli::remove::run(config, &name, yes),
        Commands::Install { name } => cli::install::run(config, &name),
        Commands::Uninstall { name } => cli::install::run_uninstall(config, &name),
        Commands::Hide { name } => cli::hide::run(config, &name, true),
        Commands::Unhide { name } => cli::hide::run(config, &name, false),
        Commands::Move { name, amount } => cli::reorder::run(config, &name, amount),
        Commands::List { json } => cli::list::run(config, json),
        Commands::Files { name, show } => cli::files::run(config, &name, show),
        Commands::Verify { files } => cli::verify::run(config, files).await,
        Commands::Checksum { file } => cli::checksum::run(&file),
    };

    // Display error with helpful suggestions
    if let Err(ref e) = result {
        eprintln!("\n{}", starmod::core::format_error_with_help(e));
    }

    result
}
