//! iosmgrd - IOS desired-state configuration manager
//!
//! Entry point for the iosmgrd command.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use ios_cfgmgr_common::{Reconciler, ShellTransport};
use ios_cfgmgrd::logging::{init_logging, init_logging_pretty};
use ios_cfgmgrd::{
    apply_document, delete_entity, list_entities, read_entity, DesiredDocument, EntityKind,
    Settings, DEFAULT_SETTINGS_PATH,
};
use ios_config_codec::IosCodec;

/// Reconcile a Cisco IOS device against desired state
#[derive(Parser, Debug)]
#[command(name = "iosmgrd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file
    #[arg(short = 'c', long, global = true, default_value = DEFAULT_SETTINGS_PATH)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the settings file
    #[arg(short = 'l', long, global = true)]
    log_level: Option<String>,

    /// Emit JSON logs
    #[arg(long, global = true)]
    log_json: bool,

    /// Override device.exec_command
    #[arg(long, global = true)]
    exec_command: Option<String>,

    /// Override device.configure_command
    #[arg(long, global = true)]
    configure_command: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply every entity in a desired-state YAML document
    Apply {
        /// Document path
        file: PathBuf,
    },
    /// Print one entity as the device has it (null when absent)
    Read {
        #[arg(value_enum)]
        kind: EntityKind,
        /// VLAN id, interface name, AS number or <prefix>/<mask>
        key: String,
    },
    /// Print every entity of a kind
    List {
        #[arg(value_enum)]
        kind: EntityKind,
    },
    /// Remove one entity
    Delete {
        #[arg(value_enum)]
        kind: EntityKind,
        key: String,
    },
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = Settings::load_or_default(&args.config)
        .with_context(|| format!("loading settings from {}", args.config.display()))?;

    if let Some(level) = &args.log_level {
        settings.logging.level = level.clone();
    }
    if args.log_json {
        settings.logging.json = true;
    }
    if let Some(cmd) = &args.exec_command {
        settings.device.exec_command = cmd.clone();
    }
    if let Some(cmd) = &args.configure_command {
        settings.device.configure_command = cmd.clone();
    }

    settings.validate().context("invalid settings")?;
    Ok(settings)
}

async fn run(args: Args, settings: Settings) -> Result<()> {
    let transport = ShellTransport::new(
        settings.device.exec_command.clone(),
        settings.device.configure_command.clone(),
    );
    let reconciler = Reconciler::new(transport, IosCodec::new())
        .with_show_command(settings.device.show_command.clone());

    let output = match args.command {
        Command::Apply { file } => {
            let document = DesiredDocument::load(&file)?;
            info!(path = %file.display(), entities = document.len(), "Applying document");
            let report = apply_document(&reconciler, &document)
                .await
                .context("applying document")?;
            serde_json::to_value(report)?
        }
        Command::Read { kind, key } => read_entity(&reconciler, kind, &key)
            .await
            .with_context(|| format!("reading {} {}", kind, key))?,
        Command::List { kind } => list_entities(&reconciler, kind)
            .await
            .with_context(|| format!("listing {}", kind))?,
        Command::Delete { kind, key } => {
            delete_entity(&reconciler, kind, &key)
                .await
                .with_context(|| format!("deleting {} {}", kind, key))?;
            info!(%kind, %key, "Deleted");
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("iosmgrd: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if settings.logging.json {
        init_logging(&settings.logging.level);
    } else {
        init_logging_pretty(&settings.logging.level);
    }

    match run(args, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
