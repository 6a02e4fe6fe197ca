//! Victim status tracked by the position registry

use serde::{Deserialize, Serialize};

use crate::error::CoordError;

/// Progress of a single victim through the mission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VictimStatus {
    /// Spotted by a scout
    Discovered,
    /// Under observation by a monitoring agent
    Monitored,
    /// Picked up
    Rescued,
}

impl std::fmt::Display for VictimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discovered => write!(f, "discovered"),
            Self::Monitored => write!(f, "monitored"),
            Self::Rescued => write!(f, "rescued"),
        }
    }
}

impl std::str::FromStr for VictimStatus {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "discovered" => Ok(Self::Discovered),
            "monitored" => Ok(Self::Monitored),
            "rescued" => Ok(Self::Rescued),
            _ => Err(CoordError::InvalidVictimStatus(s.to_string())),
        }
    }
}
