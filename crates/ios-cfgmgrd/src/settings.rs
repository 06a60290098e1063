//! Settings file support for iosmgrd
//!
//! Loads and validates the daemon's TOML settings.
//! Default location: /etc/iosmgr/iosmgrd.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use ios_cfgmgr_common::{CfgMgrError, CfgMgrResult, DEFAULT_SHOW_COMMAND};

/// Default settings file location.
pub const DEFAULT_SETTINGS_PATH: &str = "/etc/iosmgr/iosmgrd.toml";

/// How to reach the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// Command that runs one exec-mode command; the command is appended as
    /// a single quoted argument.
    #[serde(default = "default_exec_command")]
    pub exec_command: String,

    /// Command that reads a configuration session from stdin.
    #[serde(default = "default_configure_command")]
    pub configure_command: String,

    /// Exec command that prints the running configuration.
    #[serde(default = "default_show_command")]
    pub show_command: String,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub device: DeviceSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

fn default_exec_command() -> String {
    "ssh -T router".to_string()
}

fn default_configure_command() -> String {
    "ssh -T router".to_string()
}

fn default_show_command() -> String {
    DEFAULT_SHOW_COMMAND.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            exec_command: default_exec_command(),
            configure_command: default_configure_command(),
            show_command: default_show_command(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Settings {
    /// Load settings from file, falling back to defaults if the file is missing
    pub fn load_or_default(path: impl AsRef<Path>) -> CfgMgrResult<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                CfgMgrError::settings(format!(
                    "Failed to parse settings file {}: {}",
                    path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                eprintln!(
                    "iosmgrd: Settings file {} not found, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(CfgMgrError::settings(format!(
                "Failed to read settings file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Load from default location or defaults
    pub fn load() -> CfgMgrResult<Self> {
        Self::load_or_default(DEFAULT_SETTINGS_PATH)
    }

    /// Validate settings
    pub fn validate(&self) -> CfgMgrResult<()> {
        if self.device.exec_command.trim().is_empty() {
            return Err(CfgMgrError::settings("device.exec_command must not be empty"));
        }

        if self.device.configure_command.trim().is_empty() {
            return Err(CfgMgrError::settings(
                "device.configure_command must not be empty",
            ));
        }

        if self.device.show_command.trim().is_empty() {
            return Err(CfgMgrError::settings("device.show_command must not be empty"));
        }

        Ok(())
    }
}
