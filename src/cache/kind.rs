//! Cache kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Category of backing store, selecting a registry slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    /// Cleared at every event-loop turn boundary.
    Zone,
    /// Lives as long as the process.
    Memory,
    /// Placeholder, no provider.
    Session,
    /// Placeholder, no provider.
    Storage,
    /// Placeholder, no provider.
    File,
}

impl CacheKind {
    /// All kinds, in slot order.
    pub const ALL: [CacheKind; 5] = [
        CacheKind::Zone,
        CacheKind::Memory,
        CacheKind::Session,
        CacheKind::Storage,
        CacheKind::File,
    ];

    /// Lowercase name, as used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::Zone => "zone",
            CacheKind::Memory => "memory",
            CacheKind::Session => "session",
            CacheKind::Storage => "storage",
            CacheKind::File => "file",
        }
    }

    /// Whether this crate ships a store and provider for the kind.
    pub fn is_supported(&self) -> bool {
        matches!(self, CacheKind::Zone | CacheKind::Memory)
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        CacheKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| CacheError::UnknownKind(s.trim().to_string()))
    }
}
