//! Live vehicle positions.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::geo::Coordinate;

/// Error returned when parsing an unrecognised crowd level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid crowd level: {0:?}")]
pub struct InvalidCrowdLevel(pub String);

/// Coarse occupancy reported by a vehicle.
///
/// Used as a proxy for average travel speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrowdLevel {
    Low,
    Medium,
    High,
}

impl CrowdLevel {
    pub const ALL: [CrowdLevel; 3] = [CrowdLevel::Low, CrowdLevel::Medium, CrowdLevel::High];

    /// Wire name (`low`, `medium`, `high`).
    pub fn as_str(&self) -> &'static str {
        match self {
            CrowdLevel::Low => "low",
            CrowdLevel::Medium => "medium",
            CrowdLevel::High => "high",
        }
    }
}

impl FromStr for CrowdLevel {
    type Err = InvalidCrowdLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(CrowdLevel::Low),
            "medium" => Ok(CrowdLevel::Medium),
            "high" => Ok(CrowdLevel::High),
            other => Err(InvalidCrowdLevel(other.to_string())),
        }
    }
}

impl fmt::Display for CrowdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point-in-time position report from one vehicle on a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleFix {
    pub plate: String,
    pub bearing: f64,
    pub location: Coordinate,
    pub crowd_level: CrowdLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_wire_names() {
        for level in CrowdLevel::ALL {
            assert_eq!(level.as_str().parse::<CrowdLevel>(), Ok(level));
        }
    }

    #[test]
    fn reject_unknown_level() {
        let err = "LOW".parse::<CrowdLevel>().unwrap_err();
        assert_eq!(err.to_string(), "invalid crowd level: \"LOW\"");
        assert!("".parse::<CrowdLevel>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&CrowdLevel::Medium).unwrap(),
            "\"medium\""
        );
    }
}
