//! Kinds of network link in the supply hierarchy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role a network link plays in the supply chain.
///
/// Stored as lowercase text in `network_links.network_type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Factory,
    #[default]
    Retail,
    Individual,
}

impl NetworkType {
    pub fn as_str(self) -> &'static str {
        match self {
            NetworkType::Factory => "factory",
            NetworkType::Retail => "retail",
            NetworkType::Individual => "individual",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
