// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: alarmd command line handling
//! OWNERS: @runtime
//! PUBLIC API: help(), execute(), run()

use std::path::Path;

use log::{error, info};

use crate::config::AlarmdConfig;

/// Returns the CLI usage string.
pub fn help() -> &'static str {
    "alarmd reconciles alarm delivery windows. Usage: alarmd [--help] [--config <path>]"
}

fn load_config(args: &[&str]) -> Result<AlarmdConfig, String> {
    match args.iter().position(|arg| *arg == "--config") {
        None => Ok(AlarmdConfig::default()),
        Some(pos) => {
            let path = args.get(pos + 1).ok_or_else(|| "--config requires a path".to_string())?;
            AlarmdConfig::load(Path::new(path)).map_err(|err| err.to_string())
        }
    }
}

/// Executes the CLI logic and returns a descriptive message.
pub fn execute(args: &[&str]) -> String {
    if args.contains(&"--help") {
        return help().to_string();
    }
    match load_config(args) {
        Ok(config) => format!(
            "alarmd: ready (max_alarms_per_uid={} max_alarms_total={})",
            config.max_alarms_per_uid, config.max_alarms_total
        ),
        Err(err) => {
            error!("alarmd: config error: {err}");
            format!("alarmd: config error: {err}")
        }
    }
}

/// Entry point used by the daemon binary.
pub fn run() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    let owned: Vec<String> = std::env::args().skip(1).collect();
    let refs: Vec<&str> = owned.iter().map(|s| s.as_str()).collect();
    let message = execute(&refs);
    info!("{message}");
    println!("{message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_message() {
        assert!(execute(&["--help"]).contains("Usage"));
    }

    #[test]
    fn default_config_reports_ready() {
        let output = execute(&[]);
        assert!(output.contains("ready"));
        assert!(output.contains("max_alarms_per_uid=500"));
    }

    #[test]
    fn config_flag_without_path() {
        assert!(execute(&["--config"]).contains("requires a path"));
    }
}
