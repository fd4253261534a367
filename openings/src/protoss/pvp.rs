use rust_sc2::prelude::*;

use crate::plan::Condition::*;
use crate::plan::{Goal, Plan};

/// Two gate expand into blink stalkers and robo.
pub fn macro_game() -> Vec<Goal> {
    Plan::sequence()
        .unit(UnitTypeId::Probe, 13)
        .unit(UnitTypeId::Pylon, 1)
        .unit(UnitTypeId::Probe, 14)
        .unit(UnitTypeId::Gateway, 1)
        .unit(UnitTypeId::Probe, 16)
        .unit(UnitTypeId::Assimilator, 1)
        .unit(UnitTypeId::Probe, 17)
        .unit(UnitTypeId::Assimilator, 2)
        .unit(UnitTypeId::Probe, 19)
        .unit(UnitTypeId::Gateway, 2)
        .unit(UnitTypeId::CyberneticsCore, 1)
        .unit(UnitTypeId::Probe, 22)
        .unit(UnitTypeId::Pylon, 2)
        .upgrade(UpgradeId::WarpGateResearch)
        .unit(UnitTypeId::Stalker, 1)
        .unit(UnitTypeId::Sentry, 1)
        .unit(UnitTypeId::Stalker, 3)
        .unit(UnitTypeId::Nexus, 2)
        .unit(UnitTypeId::TwilightCouncil, 1)
        .unit(UnitTypeId::Stalker, 5)
        .unit(UnitTypeId::Gateway, 4)
        .upgrade(UpgradeId::BlinkTech)
        .unit(UnitTypeId::RoboticsFacility, 1)
        .unit(UnitTypeId::Stalker, 8)
        .unit(UnitTypeId::Observer, 1)
        .unit(UnitTypeId::Assimilator, 4)
        .unit(UnitTypeId::RoboticsBay, 1)
        .unit(UnitTypeId::Gateway, 6)
        .unit(UnitTypeId::Disruptor, 1)
        .keep_when(EnemyCount(UnitTypeId::DarkTemplar, 1), UnitTypeId::Observer, 1)
        .keep_when(EnemyCount(UnitTypeId::Zealot, 1), UnitTypeId::Adept, 4)
        .keep_when(EnemyCount(UnitTypeId::VoidRay, 1), UnitTypeId::Stalker, 12)
        .keep_when(EnemyCount(UnitTypeId::Stalker, 8), UnitTypeId::Immortal, 4)
        .keep_when(Supply(90), UnitTypeId::Nexus, 3)
        .keep_when(EnemyCount(UnitTypeId::Nexus, 3), UnitTypeId::Nexus, 3)
        .keep_when(Supply(80), UnitTypeId::Stargate, 1)
        .research_when(Supply(70), UpgradeId::ProtossGroundArmorsLevel1)
        .research_when(Supply(70), UpgradeId::ProtossGroundWeaponsLevel1)
        .keep(UnitTypeId::Disruptor, 3)
        .keep_when(OwnCount(UnitTypeId::Immortal, 2), UnitTypeId::WarpPrism, 1)
        .keep(UnitTypeId::Immortal, 4)
        .keep(UnitTypeId::VoidRay, 4)
        .fill(UnitTypeId::Stalker)
        .build()
}

/// Adepts and stalkers off the core, then four gates.
pub fn punish_early_expand() -> Vec<Goal> {
    Plan::sequence()
        .unit(UnitTypeId::CyberneticsCore, 1)
        .unit(UnitTypeId::Probe, 22)
        .unit(UnitTypeId::Pylon, 2)
        .upgrade(UpgradeId::WarpGateResearch)
        .unit(UnitTypeId::Adept, 2)
        .unit(UnitTypeId::RoboticsFacility, 1)
        .unit(UnitTypeId::Gateway, 4)
        .unit(UnitTypeId::Adept, 4)
        .unit(UnitTypeId::WarpPrism, 1)
        .unit(UnitTypeId::Stalker, 6)
        .keep_when(Gas(400), UnitTypeId::Sentry, 2)
        .fill(UnitTypeId::Stalker)
        .build()
}

/// Stalkers and immortals, no expansion until the cannons are dealt with.
pub fn counter_cannon_rush() -> Vec<Goal> {
    Plan::sequence()
        .unit(UnitTypeId::CyberneticsCore, 1)
        .unit(UnitTypeId::Gateway, 2)
        .unit(UnitTypeId::RoboticsFacility, 1)
        .upgrade(UpgradeId::WarpGateResearch)
        .unit(UnitTypeId::Sentry, 1)
        .keep(UnitTypeId::Immortal, 4)
        .fill(UnitTypeId::Stalker)
        .build()
}

pub fn counter_proxy_zealots() -> Vec<Goal> {
    Plan::sequence()
        .unit(UnitTypeId::Gateway, 1)
        .unit(UnitTypeId::Assimilator, 2)
        .unit(UnitTypeId::CyberneticsCore, 1)
        .unit(UnitTypeId::Gateway, 3)
        .unit(UnitTypeId::Stalker, 3)
        .unit(UnitTypeId::Adept, 6)
        .upgrade(UpgradeId::WarpGateResearch)
        .keep_when(OwnCount(UnitTypeId::Stalker, 5), UnitTypeId::Gateway, 4)
        .fill(UnitTypeId::Stalker)
        .build()
}

/// Holds 4 gate style pressure on two bases with cannons and immortals.
pub fn counter_four_gate() -> Vec<Goal> {
    Plan::sequence()
        .unit(UnitTypeId::Gateway, 2)
        .unit(UnitTypeId::CyberneticsCore, 1)
        .unit(UnitTypeId::Assimilator, 2)
        .unit(UnitTypeId::Stalker, 2)
        .upgrade(UpgradeId::WarpGateResearch)
        .unit(UnitTypeId::Nexus, 2)
        .unit(UnitTypeId::PhotonCannon, 1)
        .unit(UnitTypeId::Gateway, 4)
        .keep_when(EnemyCount(UnitTypeId::Stalker, 6), UnitTypeId::Sentry, 1)
        .keep_when(EnemyCount(UnitTypeId::VoidRay, 1), UnitTypeId::Stalker, 8)
        .keep_when(EnemyCount(UnitTypeId::Adept, 4), UnitTypeId::Stalker, 6)
        .keep_when(EnemyCount(UnitTypeId::Stalker, 4), UnitTypeId::Immortal, 4)
        .keep_when(EnemyCount(UnitTypeId::Stalker, 8), UnitTypeId::Immortal, 8)
        .keep_when(Supply(60), UnitTypeId::Assimilator, 3)
        .keep_when(OwnCount(UnitTypeId::Gateway, 6), UnitTypeId::RoboticsFacility, 1)
        .keep_when(Supply(64), UnitTypeId::Gateway, 6)
        .keep(UnitTypeId::WarpPrism, 1)
        .fill(UnitTypeId::Stalker)
        .build()
}

pub fn counter_air() -> Vec<Goal> {
    Plan::sequence()
        .unit(UnitTypeId::Nexus, 2)
        .unit(UnitTypeId::CyberneticsCore, 1)
        .unit(UnitTypeId::Sentry, 1)
        .unit(UnitTypeId::Stalker, 2)
        .unit(UnitTypeId::Adept, 2)
        .unit(UnitTypeId::PhotonCannon, 1)
        .unit(UnitTypeId::Gateway, 3)
        .unit(UnitTypeId::Immortal, 1)
        .upgrade(UpgradeId::WarpGateResearch)
        .keep_when(EnemyCount(UnitTypeId::DarkTemplar, 1), UnitTypeId::Observer, 1)
        .keep_when(OwnCount(UnitTypeId::RoboticsFacility, 1), UnitTypeId::Assimilator, 2)
        .keep_when(Supply(60), UnitTypeId::Gateway, 8)
        .keep_when(OwnCount(UnitTypeId::Gateway, 6), UnitTypeId::Assimilator, 4)
        .keep_when(EnemyCount(UnitTypeId::Stalker, 3), UnitTypeId::Immortal, 2)
        .keep_when(EnemyCount(UnitTypeId::Tempest, 1), UnitTypeId::Stalker, 8)
        .keep_when(EnemyCount(UnitTypeId::VoidRay, 1), UnitTypeId::Stalker, 8)
        .keep_when(OwnCount(UnitTypeId::Immortal, 5), UnitTypeId::WarpPrism, 1)
        .keep(UnitTypeId::Immortal, 4)
        .fill(UnitTypeId::Stalker)
        .build()
}

/// Robo against robo, expanding behind the immortals.
pub fn counter_robo() -> Vec<Goal> {
    Plan::sequence()
        .unit(UnitTypeId::Gateway, 2)
        .unit(UnitTypeId::CyberneticsCore, 1)
        .unit(UnitTypeId::Assimilator, 2)
        .unit(UnitTypeId::RoboticsFacility, 1)
        .unit(UnitTypeId::Sentry, 1)
        .keep_when(EnemyCount(UnitTypeId::DarkTemplar, 1), UnitTypeId::Observer, 1)
        .keep_when(Supply(60), UnitTypeId::Nexus, 2)
        .keep_when(OwnCount(UnitTypeId::Probe, 36), UnitTypeId::Assimilator, 4)
        .keep_when(EnemyCount(UnitTypeId::VoidRay, 1), UnitTypeId::Stalker, 8)
        .keep(UnitTypeId::RoboticsFacility, 2)
        .keep_when(OwnCount(UnitTypeId::Immortal, 2), UnitTypeId::WarpPrism, 1)
        .keep_when(OwnCount(UnitTypeId::Immortal, 2), UnitTypeId::Observer, 1)
        .keep_when(OwnCount(UnitTypeId::Immortal, 2), UnitTypeId::Stalker, 20)
        .fill(UnitTypeId::Immortal)
        .build()
}

/// Detection first, then a robo expand.
pub fn counter_fast_dt() -> Vec<Goal> {
    Plan::sequence()
        .unit(UnitTypeId::Gateway, 1)
        .unit(UnitTypeId::CyberneticsCore, 1)
        .unit(UnitTypeId::RoboticsFacility, 1)
        .unit(UnitTypeId::Observer, 1)
        .unit(UnitTypeId::Gateway, 2)
        .unit(UnitTypeId::Stalker, 3)
        .upgrade(UpgradeId::WarpGateResearch)
        .unit(UnitTypeId::Nexus, 2)
        .unit(UnitTypeId::PhotonCannon, 1)
        .keep(UnitTypeId::Observer, 2)
        .keep_when(OwnCount(UnitTypeId::Immortal, 2), UnitTypeId::WarpPrism, 1)
        .keep(UnitTypeId::Immortal, 3)
        .keep_when(OwnCount(UnitTypeId::Probe, 36), UnitTypeId::Assimilator, 4)
        .keep_when(OwnCount(UnitTypeId::Stalker, 8), UnitTypeId::Gateway, 4)
        .keep_when(OwnCount(UnitTypeId::Probe, 38), UnitTypeId::Gateway, 7)
        .fill(UnitTypeId::Stalker)
        .build()
}
