//! Sensor role mapping.
//!
//! A role key names a logical sensor position on the rig diagram,
//! `<ComponentType>.<component_id>.<port>` (for example
//! `Compressor.a91fd4.SP`), or the short form `<component_id>.<port>`.
//! The mapping assigns each role a raw channel name.

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Parsed role key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoleKey {
    pub component_type: Option<String>,
    pub component_id: String,
    pub port: String,
}

impl RoleKey {
    pub fn new(component_type: &str, component_id: &str, port: &str) -> Self {
        Self {
            component_type: Some(component_type.to_string()),
            component_id: component_id.to_string(),
            port: port.to_string(),
        }
    }

    /// The short `<id>.<port>` form of this key.
    pub fn fallback(&self) -> RoleKey {
        RoleKey {
            component_type: None,
            component_id: self.component_id.clone(),
            port: self.port.clone(),
        }
    }
}

impl fmt::Display for RoleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.component_type {
            Some(t) => write!(f, "{t}.{}.{}", self.component_id, self.port),
            None => write!(f, "{}.{}", self.component_id, self.port),
        }
    }
}

impl FromStr for RoleKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| EngineError::InvalidRoleKey {
            key: s.to_string(),
            reason: reason.to_string(),
        };
        let parts: Vec<&str> = s.split('.').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid("empty segment"));
        }
        match parts.as_slice() {
            [t, id, port] => Ok(RoleKey::new(t, id, port)),
            [id, port] => Ok(RoleKey {
                component_type: None,
                component_id: id.to_string(),
                port: port.to_string(),
            }),
            _ => Err(invalid("expected <Type>.<id>.<port> or <id>.<port>")),
        }
    }
}

/// Read-only role → channel table for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SensorRoleMapping {
    roles: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MappingFile {
    Wrapped { sensor_roles: BTreeMap<String, String> },
    Plain(BTreeMap<String, String>),
}

impl SensorRoleMapping {
    /// Build from raw role keys, rejecting malformed keys.
    pub fn new(roles: BTreeMap<String, String>) -> EngineResult<Self> {
        for key in roles.keys() {
            key.parse::<RoleKey>()?;
        }
        Ok(Self { roles })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Load `{"sensor_roles": {...}}` or a plain `{role: channel}` object.
    pub fn load_json(path: &Path) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> EngineResult<Self> {
        let roles = match serde_json::from_str::<MappingFile>(content)? {
            MappingFile::Wrapped { sensor_roles } => sensor_roles,
            MappingFile::Plain(roles) => roles,
        };
        Self::new(roles)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Channel for a port: `<Type>.<id>.<port>` first, then `<id>.<port>`.
    pub fn lookup(&self, component_type: &str, component_id: &str, port: &str) -> Option<&str> {
        let key = RoleKey::new(component_type, component_id, port);
        self.get(&key.to_string())
            .or_else(|| self.get(&key.fallback().to_string()))
    }

    pub fn get(&self, role_key: &str) -> Option<&str> {
        self.roles
            .get(role_key)
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }

    /// Channels referenced by more than one role, with the roles referencing them.
    pub fn duplicate_channels(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut by_channel: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (role, channel) in &self.roles {
            if !channel.is_empty() {
                by_channel
                    .entry(channel.as_str())
                    .or_default()
                    .push(role.as_str());
            }
        }
        by_channel.retain(|_, roles| roles.len() > 1);
        by_channel
    }
}
