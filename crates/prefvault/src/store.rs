//! Preference store abstraction
//!
//! The vault never talks to the OS preference database directly; it goes
//! through the `PreferenceStore` trait so capture/restore logic can be
//! exercised against an in-memory fake. `DefaultsStore` is the real thing:
//! it shells out to `defaults read` / `defaults write`.

use crate::descriptor::ValueType;
use crate::error::{Result, VaultError};
use std::collections::HashMap;
use std::process::Command;

/// Key-value access to the OS preference database.
pub trait PreferenceStore {
    /// Read the textual value of `(domain, key)`, or `None` if the key
    /// is not set.
    fn read(&self, domain: &str, key: &str) -> Result<Option<String>>;

    /// Write a raw textual value, coerced according to `value_type`.
    fn write(
        &mut self,
        domain: &str,
        key: &str,
        value_type: ValueType,
        raw: &str,
    ) -> Result<()>;
}

/// Preference store backed by the macOS `defaults` command.
#[derive(Debug, Default)]
pub struct DefaultsStore;

impl DefaultsStore {
    pub fn new() -> Self {
        Self
    }
}

impl PreferenceStore for DefaultsStore {
    fn read(&self, domain: &str, key: &str) -> Result<Option<String>> {
        let output = Command::new("defaults")
            .args(["read", domain, key])
            .output()
            .map_err(|e| VaultError::StoreAccess(format!("failed to run defaults: {e}")))?;

        // `defaults read` exits nonzero for missing keys. It uses the same
        // exit code for other failures, so any nonzero exit maps to absent.
        if !output.status.success() {
            tracing::debug!("defaults read {domain} {key}: key not present");
            return Ok(None);
        }

        let raw = String::from_utf8_lossy(&output.stdout)
            .trim_end_matches('\n')
            .to_string();
        Ok(Some(raw))
    }

    fn write(
        &mut self,
        domain: &str,
        key: &str,
        value_type: ValueType,
        raw: &str,
    ) -> Result<()> {
        let output = Command::new("defaults")
            .args(["write", domain, key, value_type.flag(), raw])
            .output()
            .map_err(|e| VaultError::StoreAccess(format!("failed to run defaults: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VaultError::PreferenceWrite {
                domain: domain.to_string(),
                key: key.to_string(),
                reason: stderr.trim().to_string(),
            });
        }
        Ok(())
    }
}

/// In-memory preference store.
///
/// Used by tests and dry runs. Unlike a plain map it validates type
/// coercion on write, the way `defaults write` rejects e.g. a non-numeric
/// `-int` value, so partial-failure paths are reachable without the OS.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<(String, String), String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value directly, bypassing coercion checks.
    pub fn set(&mut self, domain: &str, key: &str, value: &str) {
        self.values
            .insert((domain.to_string(), key.to_string()), value.to_string());
    }

    #[must_use]
    pub fn get(&self, domain: &str, key: &str) -> Option<&str> {
        self.values
            .get(&(domain.to_string(), key.to_string()))
            .map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, domain: &str, key: &str) -> bool {
        self.values
            .contains_key(&(domain.to_string(), key.to_string()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PreferenceStore for MemoryStore {
    fn read(&self, domain: &str, key: &str) -> Result<Option<String>> {
        Ok(self.get(domain, key).map(str::to_string))
    }

    fn write(
        &mut self,
        domain: &str,
        key: &str,
        value_type: ValueType,
        raw: &str,
    ) -> Result<()> {
        let coercible = match value_type {
            ValueType::String => true,
            ValueType::Integer => raw.parse::<i64>().is_ok(),
            ValueType::Float => raw.parse::<f64>().is_ok(),
            // `defaults` accepts a handful of boolean spellings
            ValueType::Boolean => matches!(
                raw.to_ascii_lowercase().as_str(),
                "true" | "false" | "yes" | "no" | "0" | "1"
            ),
        };

        if !coercible {
            return Err(VaultError::PreferenceWrite {
                domain: domain.to_string(),
                key: key.to_string(),
                reason: format!("value {raw:?} is not coercible to {value_type}"),
            });
        }

        self.set(domain, key, raw);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_read_absent() {
        let store = MemoryStore::new();
        assert_eq!(store.read("com.apple.dock", "mineffect").expect("read"), None);
    }

    #[test]
    fn memory_store_write_then_read() {
        let mut store = MemoryStore::new();
        store
            .write("com.apple.dock", "mineffect", ValueType::String, "genie")
            .expect("write");
        assert_eq!(
            store.read("com.apple.dock", "mineffect").expect("read"),
            Some("genie".to_string())
        );
    }

    #[test]
    fn memory_store_rejects_bad_integer() {
        let mut store = MemoryStore::new();
        let err = store
            .write("com.apple.dock", "tilesize", ValueType::Integer, "huge")
            .expect_err("non-numeric int must fail");
        assert!(matches!(err, VaultError::PreferenceWrite { .. }));
        assert!(!store.contains("com.apple.dock", "tilesize"));
    }

    #[test]
    fn memory_store_rejects_bad_float() {
        let mut store = MemoryStore::new();
        assert!(store
            .write("com.apple.dock", "autohide-delay", ValueType::Float, "fast")
            .is_err());
    }

    #[test]
    fn memory_store_boolean_spellings() {
        let mut store = MemoryStore::new();
        for raw in ["true", "false", "YES", "no", "0", "1"] {
            store
                .write("com.apple.finder", "DisableAllAnimations", ValueType::Boolean, raw)
                .expect("accepted boolean spelling");
        }
        assert!(store
            .write("com.apple.finder", "DisableAllAnimations", ValueType::Boolean, "maybe")
            .is_err());
    }

    #[test]
    fn memory_store_preserves_raw_text() {
        // Coercion is validation only; the stored value stays textual
        let mut store = MemoryStore::new();
        store
            .write("NSGlobalDomain", "NSWindowResizeTime", ValueType::Float, "0.001")
            .expect("write");
        assert_eq!(
            store.get("NSGlobalDomain", "NSWindowResizeTime"),
            Some("0.001")
        );
    }
}
