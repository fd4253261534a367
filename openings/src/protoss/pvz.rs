use rust_sc2::prelude::*;

use crate::plan::Condition::*;
use crate::plan::{Goal, Plan};

/// Gateway expand, the same for every zerg opening we haven't read yet.
pub fn eco_start() -> Vec<Goal> {
    Plan::sequence()
        .unit(UnitTypeId::Probe, 13)
        .unit(UnitTypeId::Pylon, 1)
        .unit(UnitTypeId::Probe, 14)
        .unit(UnitTypeId::Gateway, 1)
        .unit(UnitTypeId::Probe, 17)
        .unit(UnitTypeId::Assimilator, 1)
        .unit(UnitTypeId::Probe, 19)
        .unit(UnitTypeId::Nexus, 2)
        .unit(UnitTypeId::CyberneticsCore, 1)
        .build()
}

/// Two base immortal adept into colossus.
pub fn macro_game() -> Vec<Goal> {
    Plan::sequence()
        .unit(UnitTypeId::Assimilator, 1)
        .unit(UnitTypeId::Nexus, 2)
        .unit(UnitTypeId::CyberneticsCore, 1)
        .unit(UnitTypeId::Assimilator, 2)
        .unit(UnitTypeId::Pylon, 2)
        .unit(UnitTypeId::Adept, 1)
        .unit(UnitTypeId::RoboticsFacility, 1)
        .upgrade(UpgradeId::WarpGateResearch)
        .unit(UnitTypeId::RoboticsFacility, 2)
        .unit(UnitTypeId::Stalker, 1)
        .unit(UnitTypeId::Immortal, 2)
        .unit(UnitTypeId::Gateway, 3)
        .unit(UnitTypeId::WarpPrism, 1)
        .unit(UnitTypeId::Gateway, 4)
        .unit(UnitTypeId::Observer, 1)
        .unit(UnitTypeId::Adept, 6)
        .unit(UnitTypeId::Immortal, 3)
        .unit(UnitTypeId::RoboticsBay, 1)
        .keep_when(EnemyCount(UnitTypeId::Zergling, 10), UnitTypeId::Adept, 3)
        .keep_when(Supply(100), UnitTypeId::Nexus, 3)
        .keep_when(Supply(56), UnitTypeId::Assimilator, 3)
        .keep_when(Supply(66), UnitTypeId::Assimilator, 4)
        .keep_when(OwnCount(UnitTypeId::RoboticsBay, 1), UnitTypeId::Colossus, 2)
        .keep(UnitTypeId::Immortal, 5)
        .keep(UnitTypeId::Observer, 2)
        .keep_when(Supply(120), UnitTypeId::Stargate, 1)
        .keep_when(OwnCount(UnitTypeId::Stargate, 1), UnitTypeId::Phoenix, 6)
        .keep(UnitTypeId::Immortal, 8)
        .keep(UnitTypeId::Disruptor, 2)
        .fill(UnitTypeId::Stalker)
        .build()
}

/// Zealot and adepts off two gates, expanding once it is safe.
pub fn counter_ling_rush() -> Vec<Goal> {
    Plan::sequence()
        .unit(UnitTypeId::CyberneticsCore, 1)
        .unit(UnitTypeId::Pylon, 2)
        .unit(UnitTypeId::Assimilator, 1)
        .unit(UnitTypeId::Zealot, 1)
        .unit(UnitTypeId::Gateway, 2)
        .unit(UnitTypeId::Adept, 2)
        .unit(UnitTypeId::Zealot, 2)
        .unit(UnitTypeId::Gateway, 4)
        .unit(UnitTypeId::Adept, 6)
        .research_when(Supply(32), UpgradeId::WarpGateResearch)
        .keep_when(Supply(32), UnitTypeId::Assimilator, 2)
        .keep_when(Supply(44), UnitTypeId::Nexus, 2)
        .keep_when(OwnCount(UnitTypeId::Nexus, 2), UnitTypeId::Gateway, 8)
        .keep_when(OwnCount(UnitTypeId::Gateway, 6), UnitTypeId::Assimilator, 4)
        .keep_when(EnemyCount(UnitTypeId::Zergling, 8), UnitTypeId::Adept, 14)
        .fill(UnitTypeId::Stalker)
        .build()
}

/// Immortals and stalkers until the prism is out.
pub fn counter_roach_rush() -> Vec<Goal> {
    Plan::sequence()
        .unit(UnitTypeId::Assimilator, 2)
        .unit(UnitTypeId::Gateway, 2)
        .unit(UnitTypeId::CyberneticsCore, 1)
        .unit(UnitTypeId::Pylon, 2)
        .unit(UnitTypeId::Zealot, 1)
        .unit(UnitTypeId::RoboticsFacility, 1)
        .unit(UnitTypeId::Immortal, 1)
        .unit(UnitTypeId::Stalker, 4)
        .upgrade(UpgradeId::WarpGateResearch)
        .unit(UnitTypeId::WarpPrism, 1)
        .keep_when(EnemyCount(UnitTypeId::Zergling, 4), UnitTypeId::Adept, 1)
        .keep_when(EnemyCount(UnitTypeId::Zergling, 8), UnitTypeId::Adept, 6)
        .keep_when(OwnCount(UnitTypeId::WarpPrism, 1), UnitTypeId::Nexus, 2)
        .keep(UnitTypeId::Stalker, 4)
        .fill(UnitTypeId::Immortal)
        .build()
}
