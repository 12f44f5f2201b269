//! # wbcmd — relay switch for test benches
//!
//! Composition root that wires the MQTT adapter into the executor and runs
//! one command.
//!
//! ## Responsibilities
//! - Load tool settings and the stand configuration
//! - Initialize logging (stderr only, stdout carries the help page)
//! - Parse `<target> <action> <device>` or a help token
//! - Resolve and validate the command before any network IO
//! - Execute it through `ActionExecutor` over an `MqttBroker`
//! - Map failures to exit codes: `1` for unusable commands or configuration,
//!   `2` for broker failures
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod cli;
mod config;

use std::error::Error;
use std::process::ExitCode;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use wbcmd_adapter_mqtt::MqttBroker;
use wbcmd_app::delay::TokioDelay;
use wbcmd_app::services::action_executor::ActionExecutor;
use wbcmd_domain::device::DeviceTable;
use wbcmd_domain::error::WbcmdError;
use wbcmd_domain::help::format_help;

use cli::Invocation;
use config::Settings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let env = |key: &str| std::env::var(key).ok();

    let settings = match Settings::load(env) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Can't load settings: {}", report(&err));
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&settings.logging.filter);

    let path = config::stand_config_path(env);
    let table = match config::load_device_table(&path) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("Can't parse config: {}", report(&err));
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(path = %path.display(), devices = table.len(), "stand configuration loaded");
    for (name, target) in table.duplicates() {
        tracing::warn!(
            device = name,
            target,
            "device configured more than once for this target, the first entry is used"
        );
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&settings, &table, &args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let prefix = match err {
                WbcmdError::Command(_) => "Command is incorrect",
                WbcmdError::Execution(_) | WbcmdError::Broker(_) => "Error! Command is not executed",
            };
            eprintln!("{prefix}: {}", report(&err));
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(settings: &Settings, table: &DeviceTable, args: &[String]) -> Result<(), WbcmdError> {
    let command = match Invocation::parse(args)? {
        Invocation::Help => {
            print!("{}", format_help(table));
            return Ok(());
        }
        Invocation::Run(command) => command,
    };

    let (device, action) = command.check(table)?;
    tracing::info!(
        device = %device.name,
        target = %device.target,
        %action,
        channel = %device.channel,
        "command accepted"
    );

    let broker = MqttBroker::new(settings.mqtt.clone());
    let mut executor = ActionExecutor::new(broker, TokioDelay);
    executor.execute(device, &command.action).await
}

fn init_tracing(directives: &str) {
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|err| {
        eprintln!("Invalid log filter '{directives}' ({err}), using 'warn'");
        EnvFilter::new("warn")
    });
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// The error and all its sources, joined with `: `.
fn report(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
