use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use peridot::cli::{
    handle_decrypt, handle_encrypt, handle_list, handle_remove, handle_update, EncryptArgs,
    UpdateArgs,
};
use peridot::config::paths::default_settings_file;
use peridot::config::{PeridotPaths, Settings};

#[derive(Parser)]
#[command(
    name = "peridot",
    version,
    about = "Encrypted dotfiles backup and restore",
    long_about = "Peridot encrypts the hidden files of your home directory into named \
                  groups inside a single archive file, and restores a group back into \
                  place when you need it."
)]
struct Cli {
    /// Home directory to back up from and restore into
    #[arg(long, global = true, env = "PERIDOT_HOME")]
    home: Option<PathBuf>,

    /// Archive file (default: <home>/dotfiles.peridot)
    #[arg(long, global = true, env = "PERIDOT_ARCHIVE")]
    archive: Option<PathBuf>,

    /// Key file (default: <home>/peridot_key.key)
    #[arg(long, global = true, env = "PERIDOT_KEY_FILE")]
    key_file: Option<PathBuf>,

    /// Settings file
    #[arg(long, global = true, env = "PERIDOT_CONFIG")]
    config: Option<PathBuf>,

    /// Number of encryption worker threads
    #[arg(short, long, global = true)]
    jobs: Option<usize>,

    /// More log output (-v info, -vv debug); PERIDOT_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt dotfiles into a group
    Encrypt(EncryptArgs),

    /// Re-encrypt dotfiles into a group, merging with what it holds
    Update(UpdateArgs),

    /// Restore a group's files into the home directory
    Decrypt {
        /// Group to restore
        group: String,
    },

    /// List groups and their contents
    #[command(alias = "ls")]
    List {
        /// Show every stored path instead of top-level names
        #[arg(short = 't', long)]
        detailed: bool,
    },

    /// Remove a group, or every group with '*'
    Rm {
        /// Group to remove, or '*' to delete the whole archive
        group: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("PERIDOT_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,peridot={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = PeridotPaths::resolve(cli.home, cli.archive, cli.key_file)?;

    let mut settings = match cli.config.or_else(default_settings_file) {
        Some(path) => Settings::load_or_default(&path)?,
        None => Settings::default(),
    };
    if let Some(jobs) = cli.jobs {
        settings.workers = jobs.max(1);
    }

    match cli.command {
        Commands::Encrypt(args) => handle_encrypt(&paths, &settings, args)?,
        Commands::Update(args) => handle_update(&paths, &settings, args)?,
        Commands::Decrypt { group } => handle_decrypt(&paths, &group)?,
        Commands::List { detailed } => handle_list(&paths, detailed)?,
        Commands::Rm { group, force } => handle_remove(&paths, &group, force)?,
    }

    Ok(())
}
