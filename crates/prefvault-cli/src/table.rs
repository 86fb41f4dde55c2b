//! Descriptor table configuration
//!
//! Which keys prefvault tracks is CLI policy -- the library provides only
//! the capture/restore mechanism. The built-in table is embedded TOML;
//! a user file at ~/.config/prefvault/descriptors.toml or an explicit
//! --table path overrides it entirely.

use prefvault::{DescriptorTable, Result, SettingDescriptor, ValueType, VaultError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Built-in descriptor table, compiled into the binary
const EMBEDDED_DESCRIPTORS: &str = include_str!("../descriptors.toml");

/// User override file name under ~/.config/prefvault/
const USER_TABLE_FILE: &str = "descriptors.toml";

/// TOML shape of a descriptor file
#[derive(Debug, Deserialize)]
struct DescriptorFile {
    #[serde(default)]
    setting: Vec<DescriptorEntry>,
}

#[derive(Debug, Deserialize)]
struct DescriptorEntry {
    domain: String,
    key: String,
    #[serde(rename = "type")]
    value_type: ValueType,
    /// Display label, unused by the engine
    #[serde(default)]
    #[allow(dead_code)]
    label: Option<String>,
}

/// Load the descriptor table.
///
/// Precedence: explicit `--table` path, then the user file under
/// ~/.config/prefvault/, then the embedded built-in table.
pub fn load_table(explicit: Option<&Path>) -> Result<DescriptorTable> {
    if let Some(path) = explicit {
        let contents = fs::read_to_string(path).map_err(|e| {
            VaultError::DescriptorParse(format!(
                "failed to read descriptor table {}: {e}",
                path.display()
            ))
        })?;
        return parse_table(&contents, &path.display().to_string());
    }

    if let Some(path) = user_table_path() {
        if path.exists() {
            tracing::info!("Using user descriptor table at {}", path.display());
            let contents = fs::read_to_string(&path).map_err(|e| {
                VaultError::DescriptorParse(format!(
                    "failed to read descriptor table {}: {e}",
                    path.display()
                ))
            })?;
            return parse_table(&contents, &path.display().to_string());
        }
    }

    parse_table(EMBEDDED_DESCRIPTORS, "built-in")
}

/// Location of the user override table, if a config directory exists.
fn user_table_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("prefvault").join(USER_TABLE_FILE))
}

fn parse_table(contents: &str, origin: &str) -> Result<DescriptorTable> {
    let file: DescriptorFile = toml::from_str(contents).map_err(|e| {
        VaultError::DescriptorParse(format!("descriptor table {origin}: {e}"))
    })?;

    if file.setting.is_empty() {
        return Err(VaultError::DescriptorParse(format!(
            "descriptor table {origin} defines no settings"
        )));
    }

    let descriptors = file
        .setting
        .into_iter()
        .map(|e| SettingDescriptor::new(e.domain, e.key, e.value_type))
        .collect();

    DescriptorTable::new(descriptors)
}
