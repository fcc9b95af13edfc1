#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::style)]

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use singlink::cli::{Args, Command};
use singlink::config::outbound::to_json_array;
use singlink::engine::{ProxyEngine, SingBoxProcess};
use singlink::subscription::{Settings, build_engine_config, load_subscription, write_engine_config};
use tracing::Level;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let is_verbose = args.verbose;
    tracing_subscriber::fmt()
        .with_max_level(if is_verbose {
            Level::TRACE
        } else {
            Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        tracing::error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    match args.command {
        Command::Parse { source, timeout } => {
            if timeout == 0 {
                anyhow::bail!("--timeout must be greater than zero");
            }
            let outbounds = load_subscription(&source, Duration::from_secs(timeout)).await?;
            println!("{}", to_json_array(&outbounds).context("Failed to serialize outbounds")?);
        }
        Command::Build { request } => {
            let outbound = request.build();
            println!("{}", outbound.to_json_pretty().context("Failed to serialize outbound")?);
        }
        Command::Generate { settings, output } => {
            tracing::info!("Loading settings from: {}", settings);
            let settings = Settings::load(&settings).await?;
            let config = build_engine_config(&settings).await?;
            let output = output.unwrap_or_else(|| settings.output.clone());
            write_engine_config(&config, &output).await?;
            tracing::info!("Config generation complete!");
        }
        Command::Run { settings } => {
            tracing::info!("Loading settings from: {}", settings);
            let settings = Settings::load(&settings).await?;
            let config = build_engine_config(&settings).await?;

            let mut engine = SingBoxProcess::new(settings.engine_binary.clone());
            engine.start(&config).await?;
            tracing::info!("Engine status: {}", engine.status());

            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl-C")?;
            tracing::info!("Shutting down");
            engine.stop().await?;
        }
    }

    Ok(())
}
