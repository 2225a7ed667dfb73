//! # Multiclient CLI Entry Point
//!
//! ## Usage
//!
//! ```bash
//! # List liteservers of a global config
//! multiclient list global.config.json
//!
//! # Write one config per liteserver into ./split
//! multiclient split global.config.json -o ./split
//! ```

use anyhow::Result;
use argh::FromArgs;
use std::path::PathBuf;

use multiclient_cli::commands;

#[derive(FromArgs)]
/// Multiclient - liteserver global config tools
struct Cli {
    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Commands {
    List(ListArgs),
    Split(SplitArgs),
}

/// Arguments for listing liteservers.
///
/// Output is one line per liteserver, `<index> <ip>:<port> <key>`, where the
/// index is the worker index the multiclient assigns to that liteserver.
#[derive(FromArgs)]
#[argh(subcommand, name = "list")]
/// list the liteservers in a global config
struct ListArgs {
    /// path to the global config
    #[argh(positional)]
    global_config: PathBuf,
}

/// Arguments for splitting a global config.
///
/// # Example
///
/// ```bash
/// multiclient split global.config.json -o ./split
/// ```
#[derive(FromArgs)]
#[argh(subcommand, name = "split")]
/// write one single-liteserver config per liteserver
struct SplitArgs {
    /// path to the global config
    #[argh(positional)]
    global_config: PathBuf,

    /// directory to write ls_<index>.json files into
    ///
    /// Created if it does not exist.
    #[argh(option, short = 'o', long = "out-dir", default = "PathBuf::from(\".\")")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    // Logs go to stderr so stdout stays pipeable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::List(args) => {
            let config = commands::load_global_config(&args.global_config)?;
            for line in commands::list_liteservers(&config)? {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::Split(args) => {
            let config = commands::load_global_config(&args.global_config)?;
            tracing::info!(
                "Splitting {} liteservers into {}",
                config.liteserver_count(),
                args.out_dir.display()
            );
            let written = commands::write_split_configs(&config, &args.out_dir)?;
            println!("{}", written.len());
            Ok(())
        }
    }
}
