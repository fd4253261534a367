use rust_sc2::prelude::*;

use crate::plan::Condition::*;
use crate::plan::{Goal, Plan};

pub fn eco_start() -> Vec<Goal> {
    Plan::sequence()
        .unit(UnitTypeId::Probe, 13)
        .unit(UnitTypeId::Pylon, 1)
        .unit(UnitTypeId::Probe, 15)
        .unit(UnitTypeId::Gateway, 1)
        .unit(UnitTypeId::Probe, 17)
        .unit(UnitTypeId::Assimilator, 1)
        .unit(UnitTypeId::Probe, 19)
        .unit(UnitTypeId::CyberneticsCore, 1)
        .build()
}

/// Expand into twilight, dark shrine for the prism harass, then chargelot
/// colossus.
pub fn templar() -> Vec<Goal> {
    Plan::sequence()
        .unit(UnitTypeId::Nexus, 2)
        .unit(UnitTypeId::Assimilator, 2)
        .unit(UnitTypeId::Adept, 1)
        .upgrade(UpgradeId::WarpGateResearch)
        .unit(UnitTypeId::Adept, 2)
        .unit(UnitTypeId::TwilightCouncil, 1)
        .unit(UnitTypeId::Adept, 3)
        .unit(UnitTypeId::Gateway, 3)
        .unit(UnitTypeId::RoboticsFacility, 1)
        .unit(UnitTypeId::DarkShrine, 1)
        .unit(UnitTypeId::WarpPrism, 1)
        .unit(UnitTypeId::Stalker, 2)
        .unit(UnitTypeId::Assimilator, 3)
        .upgrade(UpgradeId::Charge)
        .unit(UnitTypeId::Observer, 1)
        .unit(UnitTypeId::Nexus, 3)
        .unit(UnitTypeId::Immortal, 1)
        .unit(UnitTypeId::Stalker, 7)
        .unit(UnitTypeId::RoboticsBay, 1)
        .unit(UnitTypeId::Zealot, 3)
        .unit(UnitTypeId::Gateway, 6)
        .upgrade(UpgradeId::ExtendedThermalLance)
        .unit(UnitTypeId::Disruptor, 1)
        .unit(UnitTypeId::Forge, 2)
        .unit(UnitTypeId::Zealot, 13)
        .unit(UnitTypeId::Colossus, 1)
        .upgrade(UpgradeId::ProtossGroundWeaponsLevel1)
        .upgrade(UpgradeId::ProtossGroundArmorsLevel1)
        .unit(UnitTypeId::Stalker, 8)
        .unit(UnitTypeId::Nexus, 4)
        .unit(UnitTypeId::Gateway, 10)
        .keep_when(EnemyCount(UnitTypeId::PlanetaryFortress, 1), UnitTypeId::Nexus, 3)
        .keep(UnitTypeId::WarpPrism, 1)
        .keep(UnitTypeId::Zealot, 15)
        .keep(UnitTypeId::Colossus, 3)
        .keep(UnitTypeId::Zealot, 25)
        .keep(UnitTypeId::Immortal, 4)
        .fill(UnitTypeId::Stalker)
        .build()
}

/// Safe one base into a three base gateway robo army.
pub fn macro_game() -> Vec<Goal> {
    Plan::sequence()
        .unit(UnitTypeId::Nexus, 2)
        .unit(UnitTypeId::Adept, 1)
        .upgrade(UpgradeId::WarpGateResearch)
        .unit(UnitTypeId::Stalker, 1)
        .unit(UnitTypeId::RoboticsFacility, 1)
        .unit(UnitTypeId::Gateway, 2)
        .unit(UnitTypeId::ShieldBattery, 1)
        .unit(UnitTypeId::Immortal, 1)
        .unit(UnitTypeId::Gateway, 3)
        .unit(UnitTypeId::Assimilator, 2)
        .unit(UnitTypeId::Sentry, 1)
        .unit(UnitTypeId::Stalker, 2)
        .unit(UnitTypeId::Observer, 1)
        .unit(UnitTypeId::Stalker, 4)
        .unit(UnitTypeId::Assimilator, 3)
        .unit(UnitTypeId::TwilightCouncil, 1)
        .unit(UnitTypeId::WarpPrism, 1)
        .unit(UnitTypeId::Assimilator, 4)
        .unit(UnitTypeId::Adept, 2)
        .unit(UnitTypeId::Stalker, 6)
        .upgrade(UpgradeId::BlinkTech)
        .unit(UnitTypeId::Stargate, 1)
        .keep_when(EnemyCount(UnitTypeId::PlanetaryFortress, 1), UnitTypeId::Nexus, 3)
        .keep_when(Supply(72), UnitTypeId::Nexus, 3)
        .keep_when(OwnCount(UnitTypeId::Nexus, 3), UnitTypeId::Gateway, 8)
        .keep_when(EnemyCount(UnitTypeId::Battlecruiser, 1), UnitTypeId::Stalker, 10)
        .keep_when(EnemyCount(UnitTypeId::Banshee, 1), UnitTypeId::Phoenix, 2)
        .keep_when(EnemyCount(UnitTypeId::Marauder, 4), UnitTypeId::Immortal, 2)
        .keep_when(EnemyCount(UnitTypeId::Marine, 4), UnitTypeId::Adept, 4)
        .keep_when(EnemyCount(UnitTypeId::Battlecruiser, 2), UnitTypeId::Tempest, 4)
        .research_when(OwnCount(UnitTypeId::Nexus, 4), UpgradeId::ProtossShieldsLevel1)
        .research_when(OwnCount(UnitTypeId::Nexus, 4), UpgradeId::ProtossGroundWeaponsLevel2)
        .keep_when(Gas(700), UnitTypeId::HighTemplar, 4)
        .keep_when(Minerals(700), UnitTypeId::Zealot, 20)
        .keep_when(OwnCount(UnitTypeId::Nexus, 4), UnitTypeId::Mothership, 1)
        .keep(UnitTypeId::Immortal, 3)
        .keep(UnitTypeId::Phoenix, 4)
        .keep(UnitTypeId::Adept, 6)
        .keep(UnitTypeId::Zealot, 13)
        .fill(UnitTypeId::Stalker)
        .build()
}

/// One base robo until the bunker push is held, then expand.
pub fn counter_bunker() -> Vec<Goal> {
    Plan::sequence()
        .unit(UnitTypeId::Assimilator, 2)
        .unit(UnitTypeId::Gateway, 2)
        .unit(UnitTypeId::RoboticsFacility, 1)
        .upgrade(UpgradeId::WarpGateResearch)
        .unit(UnitTypeId::Gateway, 4)
        .keep(UnitTypeId::Immortal, 1)
        .keep(UnitTypeId::WarpPrism, 1)
        .keep(UnitTypeId::Observer, 1)
        .keep_when(Supply(58), UnitTypeId::Nexus, 2)
        .keep(UnitTypeId::Adept, 4)
        .keep(UnitTypeId::Stalker, 8)
        .fill(UnitTypeId::Immortal)
        .build()
}
