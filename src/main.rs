//! Tsuyaku - Chat Translation Bot Core
//!
//! Command-line entry point: runs the translation pipeline on a single
//! message, the same way the messaging webhook would.

use anyhow::Result;
use clap::Parser;
use std::io::Read;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use tsuyaku::cli::{Args, Commands};
use tsuyaku::config::Config;
use tsuyaku::message::InputMessage;
use tsuyaku::reply::StdoutSink;
use tsuyaku::script::classify;
use tsuyaku::translate::{directions_for, Translator};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;

    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("tsuyaku.toml").exists() {
                info!("Found tsuyaku.toml in current directory, loading...");
                Config::from_file("tsuyaku.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Translate { text, sender } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };

            let message = InputMessage::new(&text, sender)?;
            let translator = Translator::from_config(&config)?;
            translator.handle(&message, &StdoutSink).await?;
        }
        Commands::Classify { text } => {
            let category = classify(&text);
            let targets = directions_for(category, config.translate.unclassified)
                .iter()
                .map(|direction| direction.target.code())
                .collect::<Vec<_>>();

            println!("Script: {}", category);
            if targets.is_empty() {
                println!("Targets: none (guidance reply)");
            } else {
                println!("Targets: {}", targets.join(", "));
            }
        }
        Commands::InitConfig { output } => {
            config.save_to_file(&output)?;
            println!("Wrote configuration to {}", output.display());
        }
    }

    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".tsuyaku").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Daily rotation; the guard must outlive every log call
    let file_appender = rolling::daily(&log_dir, "tsuyaku.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Console output goes to stderr so stdout carries only the reply
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("tsuyaku.log").display());

    Ok(())
}
