//! apkfetch - range-fetch, verify and cache APK packages
//!
//! This is the CLI application. It loads configuration, drains the event
//! channel while an operation runs, and renders the result.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use apkfetch_config::Config;
use apkfetch_events::EventReceiver;
use apkfetch_ops::{OperationResult, OpsCtx};
use apkfetch_types::{IndexImport, KeyringImport, PackageImport, SegmentSpec};
use clap::Parser;
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!(code = ?e.code(), "Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting apkfetch v{}", env!("CARGO_PKG_VERSION"));

    // 1. File config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Environment, including HTTP_AUTH
    config.merge_env()?;

    // 3. CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global);

    let (event_sender, event_receiver) = apkfetch_events::channel();
    let ops_ctx = OpsCtx::from_config(config, event_sender)?;

    let renderer = OutputRenderer::new(cli.global.json);
    let mut event_handler = EventHandler::new(cli.global.json, cli.global.debug);

    let result =
        execute_command_with_events(cli.command, ops_ctx, event_receiver, &mut event_handler)
            .await?;

    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

fn apply_cli_config(config: &mut Config, global: &GlobalArgs) {
    if let Some(cache_root) = &global.cache_root {
        config.paths.cache_root = Some(cache_root.clone());
    }
    if let Some(strategy) = global.range_strategy {
        config.host.range_strategy = strategy;
    }
    if let Some(version) = &global.host_version {
        config.host.version = Some(version.clone());
    }
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    ops_ctx: OpsCtx,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(command, ops_ctx));

    loop {
        select! {
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            event = event_receiver.recv() => {
                if let Some(event) = event {
                    event_handler.handle_event(event);
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(command: Commands, ctx: OpsCtx) -> Result<OperationResult, CliError> {
    match command {
        Commands::Package {
            url,
            arch,
            name,
            version,
            signature_range,
            control_range,
            control_digest,
            data_range,
            data_digest,
        } => {
            let import = PackageImport {
                name,
                version,
                architecture: arch,
                url,
                signature: SegmentSpec::new(signature_range, None),
                control: SegmentSpec::new(control_range, Some(control_digest)),
                data: SegmentSpec::new(data_range, Some(data_digest)),
            };
            let report = apkfetch_ops::import_package(&ctx, &import).await?;
            Ok(OperationResult::Import(report))
        }

        Commands::Index { url, arch, name } => {
            let import = IndexImport {
                name: name.unwrap_or_else(|| url.clone()),
                url,
                architecture: arch,
            };
            let report = apkfetch_ops::import_index(&ctx, &import).await?;
            Ok(OperationResult::Import(report))
        }

        Commands::Keyring { url, name } => {
            let import = KeyringImport {
                name: name.unwrap_or_else(|| url.clone()),
                url,
            };
            let report = apkfetch_ops::import_keyring(&ctx, &import).await?;
            Ok(OperationResult::Import(report))
        }

        Commands::Lock { path } => {
            let set = apkfetch_ops::import_lockfile(&ctx, &path).await?;
            Ok(OperationResult::Locked(set))
        }

        Commands::Probe { url } => {
            let report = apkfetch_ops::probe_repository(&ctx, &url).await?;
            Ok(OperationResult::Probe(report))
        }
    }
}

/// Initialize tracing/logging
///
/// Logs go to stderr so stdout only ever carries the rendered result.
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let default_filter = if debug_enabled_flag {
        "info,apkfetch=debug,apkfetch_ops=debug,apkfetch_net=debug,apkfetch_store=debug"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    if json_mode {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(debug_enabled_flag)
            .init();
    }
}
