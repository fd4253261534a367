pub mod plan;
pub mod protoss;
pub mod strategy;

use std::str::FromStr;

use rust_sc2::prelude::*;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("unknown build `{0}`, expected one of pvp, pvz, pvt or pvr")]
    Unknown(String),
}

/// Matchup family forced from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildFamily {
    Pvp,
    Pvz,
    Pvt,
    Pvr,
}

impl BuildFamily {
    pub fn race(&self) -> Race {
        match self {
            BuildFamily::Pvp => Race::Protoss,
            BuildFamily::Pvz => Race::Zerg,
            BuildFamily::Pvt => Race::Terran,
            BuildFamily::Pvr => Race::Random,
        }
    }
}

impl FromStr for BuildFamily {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pvp" => Ok(BuildFamily::Pvp),
            "pvz" => Ok(BuildFamily::Pvz),
            "pvt" => Ok(BuildFamily::Pvt),
            "pvr" => Ok(BuildFamily::Pvr),
            _ => Err(BuildError::Unknown(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_names_parse() {
        assert_eq!("pvt".parse::<BuildFamily>(), Ok(BuildFamily::Pvt));
        assert_eq!("PvZ".parse::<BuildFamily>(), Ok(BuildFamily::Pvz));
        assert_eq!(BuildFamily::Pvr.race(), Race::Random);
        assert_eq!(
            "zvz".parse::<BuildFamily>(),
            Err(BuildError::Unknown("zvz".to_string()))
        );
    }
}
