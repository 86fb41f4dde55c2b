//! Setting descriptors and the descriptor table
//!
//! A descriptor names one tunable preference as a `(domain, key, type)`
//! triple. The table is supplied by configuration; the vault only iterates
//! it in order.

use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// How a captured textual value is coerced when written back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Integer,
    Boolean,
    Float,
}

impl ValueType {
    /// The `defaults write` type flag, also the third wire-format field.
    #[must_use]
    pub fn flag(&self) -> &'static str {
        match self {
            Self::String => "-string",
            Self::Integer => "-int",
            Self::Boolean => "-bool",
            Self::Float => "-float",
        }
    }

    /// Parse a wire-format type flag.
    pub fn from_flag(flag: &str) -> Result<Self> {
        match flag {
            "-string" => Ok(Self::String),
            "-int" => Ok(Self::Integer),
            "-bool" => Ok(Self::Boolean),
            "-float" => Ok(Self::Float),
            other => Err(VaultError::UnknownValueType(other.to_string())),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

/// One tunable preference: a key within a preference domain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingDescriptor {
    /// Preference namespace (bundle id or a global namespace marker)
    pub domain: String,
    /// Key name within the domain
    pub key: String,
    /// How the raw value is coerced on write
    pub value_type: ValueType,
}

impl SettingDescriptor {
    pub fn new(
        domain: impl Into<String>,
        key: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        Self {
            domain: domain.into(),
            key: key.into(),
            value_type,
        }
    }
}

impl fmt::Display for SettingDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.domain, self.key)
    }
}

/// An ordered, validated set of descriptors.
///
/// `(domain, key)` pairs are unique and neither field may contain
/// whitespace: both are unquoted fields of the snapshot wire format.
/// Order is preserved (it is the capture order) but only matters for
/// display.
#[derive(Clone, Debug)]
pub struct DescriptorTable {
    descriptors: Vec<SettingDescriptor>,
}

impl DescriptorTable {
    /// Build a table, rejecting duplicates and whitespace-bearing fields.
    pub fn new(descriptors: Vec<SettingDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for d in &descriptors {
            if d.domain.is_empty() || d.domain.chars().any(char::is_whitespace) {
                return Err(VaultError::InvalidDescriptor {
                    domain: d.domain.clone(),
                    key: d.key.clone(),
                    reason: "domain must be non-empty and contain no whitespace".to_string(),
                });
            }
            if d.key.is_empty() || d.key.chars().any(char::is_whitespace) {
                return Err(VaultError::InvalidDescriptor {
                    domain: d.domain.clone(),
                    key: d.key.clone(),
                    reason: "key must be non-empty and contain no whitespace".to_string(),
                });
            }
            if !seen.insert((d.domain.clone(), d.key.clone())) {
                return Err(VaultError::DuplicateDescriptor {
                    domain: d.domain.clone(),
                    key: d.key.clone(),
                });
            }
        }
        Ok(Self { descriptors })
    }

    pub fn iter(&self) -> impl Iterator<Item = &SettingDescriptor> {
        self.descriptors.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
