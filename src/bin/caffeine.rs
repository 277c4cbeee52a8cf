// Caffeine CLI - keeps the system awake from a terminal, no tray required

use anyhow::{Context, Result};
use caffeine::app_state::LogView;
use caffeine::config_file::ConfigStore;
use caffeine::input::EnigoBackend;
use caffeine::keep_awake::exit_on_fatal;
use caffeine::utils::keycode::supported_keys;
use caffeine::utils::logging::{self, LogTarget};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;

/// Keep the system awake by periodically pressing a harmless key
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Keep the system awake by periodically pressing a harmless key",
    long_about = "Keep the system awake by periodically pressing a harmless key.

Settings are read from the same config file as the tray app:
    key: F15        # F1-F16
    time: 290       # seconds between presses
    autostart: true # tray app only

Command-line flags override the file. Press Ctrl+C to stop."
)]
struct Args {
    /// Config file to read (default: the per-user config file)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Key to press, overrides the config file (F1-F16)
    #[arg(short, long)]
    key: Option<String>,

    /// Seconds between presses, overrides the config file
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the supported key names and exit
    #[arg(long)]
    list_keys: bool,

    /// Validate the config file and print the effective settings
    #[arg(long)]
    check_config: bool,
}

fn main() {
    let args = Args::parse();

    let target = match args.log_file.as_deref() {
        Some(path) => LogTarget::File(path),
        None => LogTarget::Stderr,
    };
    if let Err(e) = logging::init(target) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if args.list_keys {
        for name in supported_keys() {
            println!("{}", name);
        }
        return Ok(());
    }

    let store = match args.config {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::standard()?,
    };

    if args.check_config {
        let config = store.try_load()?;
        caffeine::utils::keycode::resolve(&config.key)?;
        print!("{}", config.to_yaml()?);
        println!("# {} is valid", store.path().display());
        return Ok(());
    }

    let mut config = store.open()?;
    if let Some(key) = args.key {
        config.key = key;
    }
    if let Some(interval) = args.interval {
        config.time = interval;
    }

    let toggle = caffeine::build_toggle(
        config,
        Arc::new(EnigoBackend::new()),
        LogView,
        exit_on_fatal(),
    )?;

    let (quit_tx, quit_rx) = crossbeam_channel::bounded(1);
    ctrlc::set_handler(move || {
        let _ = quit_tx.try_send(());
    })
    .context("Failed to install Ctrl+C handler")?;

    toggle.start()?;
    info!("Press Ctrl+C to stop");

    let _ = quit_rx.recv();
    toggle.shutdown();
    info!("Program closed");
    Ok(())
}
