use std::collections::HashSet;

use rust_sc2::prelude::*;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("priority table {table} is empty")]
    Empty { table: &'static str },
    #[error("priority table {table} lists {unit_type:?} more than once")]
    Duplicate {
        table: &'static str,
        unit_type: UnitTypeId,
    },
}

/// Static target weights. Negative means never, zero is neutral and higher
/// values are shot first. Types missing from a table weigh -1.
pub struct PriorityTable {
    name: &'static str,
    entries: &'static [(UnitTypeId, i32)],
}

impl PriorityTable {
    pub const MISSING: i32 = -1;

    pub const fn new(name: &'static str, entries: &'static [(UnitTypeId, i32)]) -> Self {
        Self { name, entries }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, unit_type: UnitTypeId) -> Option<i32> {
        self.entries
            .iter()
            .find(|(t, _)| *t == unit_type)
            .map(|(_, weight)| *weight)
    }

    pub fn weight(&self, unit_type: UnitTypeId) -> i32 {
        self.get(unit_type).unwrap_or(Self::MISSING)
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.entries.is_empty() {
            return Err(TableError::Empty { table: self.name });
        }
        let mut seen = HashSet::new();
        for (unit_type, _) in self.entries {
            if !seen.insert(*unit_type) {
                return Err(TableError::Duplicate {
                    table: self.name,
                    unit_type: *unit_type,
                });
            }
        }
        Ok(())
    }
}

pub fn validate_tables() -> Result<(), TableError> {
    for table in [
        &STALKER_PRIORITY,
        &IMMORTAL_PRIORITY,
        &ADEPT_PRIORITY,
        &PHOENIX_LIFT_PRIORITY,
    ] {
        table.validate()?;
    }
    Ok(())
}

pub static STALKER_PRIORITY: PriorityTable = PriorityTable::new(
    "stalker",
    &[
        // Terran
        (UnitTypeId::SiegeTank, 8),
        (UnitTypeId::SiegeTankSieged, 10),
        (UnitTypeId::WidowMine, 18),
        (UnitTypeId::WidowMineBurrowed, 20),
        (UnitTypeId::MULE, 20),
        // Repairing otherwise
        (UnitTypeId::SCV, 10),
        (UnitTypeId::Ghost, 7),
        (UnitTypeId::Reaper, 4),
        (UnitTypeId::Marauder, 4),
        (UnitTypeId::Marine, 3),
        (UnitTypeId::Cyclone, 5),
        (UnitTypeId::Hellion, 2),
        (UnitTypeId::HellionTank, 3),
        (UnitTypeId::Thor, 7),
        (UnitTypeId::Medivac, 26),
        (UnitTypeId::VikingFighter, 30),
        (UnitTypeId::VikingAssault, 5),
        (UnitTypeId::LiberatorAG, 30),
        (UnitTypeId::Liberator, 30),
        (UnitTypeId::Raven, 10),
        (UnitTypeId::Battlecruiser, 15),
        (UnitTypeId::MissileTurret, 1),
        (UnitTypeId::Bunker, 2),
        (UnitTypeId::Banshee, 24),
        // Zerg
        (UnitTypeId::Drone, 20),
        (UnitTypeId::Zergling, 3),
        (UnitTypeId::Baneling, 6),
        (UnitTypeId::BanelingCocoon, 6),
        (UnitTypeId::Ultralisk, 6),
        (UnitTypeId::Queen, 5),
        (UnitTypeId::Roach, 6),
        (UnitTypeId::Ravager, 8),
        (UnitTypeId::RavagerCocoon, 8),
        (UnitTypeId::Hydralisk, 7),
        (UnitTypeId::HydraliskBurrowed, 7),
        (UnitTypeId::LurkerMP, 9),
        (UnitTypeId::LurkerMPEgg, 9),
        (UnitTypeId::LurkerMPBurrowed, 9),
        (UnitTypeId::Infestor, 10),
        (UnitTypeId::BroodLord, 30),
        (UnitTypeId::BroodLordCocoon, 10),
        (UnitTypeId::Mutalisk, 30),
        (UnitTypeId::Corruptor, 8),
        (UnitTypeId::Larva, -1),
        (UnitTypeId::Egg, -1),
        (UnitTypeId::LocustMP, -1),
        // Protoss
        (UnitTypeId::Sentry, 8),
        (UnitTypeId::Probe, 10),
        (UnitTypeId::HighTemplar, 15),
        (UnitTypeId::Oracle, 25),
        (UnitTypeId::DarkTemplar, 15),
        (UnitTypeId::Disruptor, 35),
        (UnitTypeId::Adept, 15),
        (UnitTypeId::Zealot, 4),
        (UnitTypeId::Stalker, 4),
        (UnitTypeId::Immortal, 7),
        (UnitTypeId::Colossus, 10),
        (UnitTypeId::Archon, 6),
        (UnitTypeId::ShieldBattery, 1),
        (UnitTypeId::PhotonCannon, 1),
        (UnitTypeId::Pylon, 2),
        (UnitTypeId::FleetBeacon, 3),
        (UnitTypeId::VoidRay, 25),
        (UnitTypeId::Tempest, 15),
        (UnitTypeId::CyberneticsCore, 15),
    ],
);

pub static IMMORTAL_PRIORITY: PriorityTable = PriorityTable::new(
    "immortal",
    &[
        // Terran
        (UnitTypeId::MULE, 3),
        (UnitTypeId::SCV, 3),
        (UnitTypeId::SiegeTank, 30),
        (UnitTypeId::SiegeTankSieged, 30),
        (UnitTypeId::Ghost, 3),
        (UnitTypeId::Reaper, 3),
        (UnitTypeId::Marauder, 20),
        (UnitTypeId::Marine, 3),
        (UnitTypeId::Cyclone, 20),
        (UnitTypeId::Hellion, 20),
        (UnitTypeId::HellionTank, 20),
        (UnitTypeId::Thor, 30),
        (UnitTypeId::Medivac, -1),
        (UnitTypeId::VikingFighter, -1),
        (UnitTypeId::VikingAssault, -1),
        (UnitTypeId::LiberatorAG, -1),
        (UnitTypeId::Liberator, -1),
        (UnitTypeId::Raven, -1),
        (UnitTypeId::Battlecruiser, -1),
        (UnitTypeId::MissileTurret, 1),
        (UnitTypeId::Bunker, 20),
        // Zerg
        (UnitTypeId::Drone, 3),
        (UnitTypeId::Zergling, 2),
        (UnitTypeId::Baneling, 3),
        (UnitTypeId::Ultralisk, 4),
        (UnitTypeId::Queen, 6),
        (UnitTypeId::Roach, 30),
        (UnitTypeId::Ravager, 4),
        (UnitTypeId::Hydralisk, 8),
        (UnitTypeId::HydraliskBurrowed, 8),
        (UnitTypeId::LurkerMP, 30),
        (UnitTypeId::LurkerMPBurrowed, 30),
        (UnitTypeId::Infestor, 30),
        (UnitTypeId::BroodLord, -1),
        (UnitTypeId::Mutalisk, -1),
        (UnitTypeId::Corruptor, -1),
        (UnitTypeId::Larva, -1),
        (UnitTypeId::Egg, -1),
        (UnitTypeId::LocustMP, -1),
        // Protoss
        (UnitTypeId::Sentry, 3),
        (UnitTypeId::Probe, 3),
        (UnitTypeId::HighTemplar, 10),
        (UnitTypeId::DarkTemplar, 30),
        (UnitTypeId::Adept, 3),
        (UnitTypeId::Zealot, 3),
        (UnitTypeId::Stalker, 30),
        (UnitTypeId::Immortal, 30),
        (UnitTypeId::Colossus, 30),
        (UnitTypeId::Archon, 20),
        (UnitTypeId::ShieldBattery, 1),
        (UnitTypeId::PhotonCannon, 30),
        (UnitTypeId::Pylon, 20),
        (UnitTypeId::FleetBeacon, 3),
    ],
);

pub static ADEPT_PRIORITY: PriorityTable = PriorityTable::new(
    "adept",
    &[
        // Terran
        (UnitTypeId::MULE, 30),
        (UnitTypeId::SCV, 30),
        (UnitTypeId::SiegeTank, 3),
        (UnitTypeId::SiegeTankSieged, 5),
        (UnitTypeId::Ghost, 10),
        (UnitTypeId::Reaper, 8),
        (UnitTypeId::Marauder, 4),
        (UnitTypeId::Marine, 8),
        (UnitTypeId::Cyclone, 4),
        (UnitTypeId::Hellion, 8),
        (UnitTypeId::HellionTank, 3),
        (UnitTypeId::Thor, 3),
        (UnitTypeId::Medivac, -1),
        (UnitTypeId::VikingFighter, -1),
        (UnitTypeId::VikingAssault, -1),
        (UnitTypeId::LiberatorAG, -1),
        (UnitTypeId::Liberator, -1),
        (UnitTypeId::Raven, -1),
        (UnitTypeId::Battlecruiser, -1),
        (UnitTypeId::MissileTurret, 1),
        (UnitTypeId::Bunker, 2),
        // Zerg
        (UnitTypeId::Drone, 30),
        (UnitTypeId::Zergling, 8),
        (UnitTypeId::Baneling, 10),
        (UnitTypeId::Ultralisk, 4),
        (UnitTypeId::Queen, 6),
        (UnitTypeId::Roach, 4),
        (UnitTypeId::Ravager, 4),
        (UnitTypeId::Hydralisk, 8),
        (UnitTypeId::HydraliskBurrowed, 8),
        (UnitTypeId::LurkerMP, 3),
        (UnitTypeId::LurkerMPBurrowed, 3),
        (UnitTypeId::Infestor, 10),
        (UnitTypeId::BroodLord, -1),
        (UnitTypeId::Mutalisk, -1),
        (UnitTypeId::Corruptor, -1),
        (UnitTypeId::Larva, -1),
        (UnitTypeId::Egg, -1),
        (UnitTypeId::LocustMP, -1),
        // Protoss
        (UnitTypeId::Sentry, 9),
        (UnitTypeId::Probe, 30),
        (UnitTypeId::HighTemplar, 10),
        (UnitTypeId::DarkTemplar, 9),
        (UnitTypeId::Adept, 8),
        (UnitTypeId::Zealot, 8),
        (UnitTypeId::Stalker, 4),
        (UnitTypeId::Immortal, 2),
        (UnitTypeId::Colossus, 3),
        (UnitTypeId::Archon, 4),
        (UnitTypeId::ShieldBattery, 1),
        (UnitTypeId::PhotonCannon, 1),
        (UnitTypeId::Pylon, 2),
        (UnitTypeId::FleetBeacon, 3),
    ],
);

/// 10 is an instant pickup, 5 and above beats shooting, below 5 only lifts
/// when nothing else is around.
pub static PHOENIX_LIFT_PRIORITY: PriorityTable = PriorityTable::new(
    "phoenix lift",
    &[
        (UnitTypeId::Colossus, -1),
        // Terran
        (UnitTypeId::SiegeTank, 8),
        (UnitTypeId::SiegeTankSieged, 10),
        (UnitTypeId::MULE, 6),
        (UnitTypeId::SCV, 4),
        (UnitTypeId::WidowMineBurrowed, 10),
        (UnitTypeId::WidowMine, 8),
        (UnitTypeId::Ghost, 10),
        (UnitTypeId::Reaper, 4),
        (UnitTypeId::Marauder, 4),
        (UnitTypeId::Marine, 3),
        (UnitTypeId::Cyclone, 30),
        (UnitTypeId::Banshee, 30),
        (UnitTypeId::Hellion, 2),
        (UnitTypeId::HellionTank, 1),
        (UnitTypeId::Thor, -1),
        // Zerg
        (UnitTypeId::Queen, 3),
        (UnitTypeId::Drone, 4),
        (UnitTypeId::Hydralisk, 7),
        (UnitTypeId::Baneling, 6),
        (UnitTypeId::LurkerMP, 9),
        (UnitTypeId::LurkerMPBurrowed, 9),
        (UnitTypeId::Infestor, 10),
        (UnitTypeId::Roach, 0),
        (UnitTypeId::Larva, -1),
        (UnitTypeId::Egg, -1),
        (UnitTypeId::LocustMP, -1),
        (UnitTypeId::Broodling, -1),
        (UnitTypeId::Ultralisk, -1),
        // Protoss
        (UnitTypeId::Sentry, 8),
        (UnitTypeId::Probe, 4),
        (UnitTypeId::HighTemplar, 10),
        (UnitTypeId::Disruptor, 20),
        (UnitTypeId::DarkTemplar, 9),
        (UnitTypeId::Adept, 4),
        (UnitTypeId::Zealot, 4),
        (UnitTypeId::Stalker, 2),
        (UnitTypeId::Immortal, 15),
        (UnitTypeId::Archon, -1),
    ],
);
