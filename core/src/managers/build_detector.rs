use std::collections::HashMap;

use log::info;
use rust_sc2::bot::Bot;
use rust_sc2::prelude::*;

use crate::managers::cache_manager::UnitCache;
use crate::params::*;
use crate::snapshot::UnitSnapshot;
use crate::utils::RealType;
use crate::{AIComponent, BotState};

/// What the enemy opening looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyRushBuild {
    Macro,
    CannonRush,
    ProxyZealots,
    Zealots,
    ProxyRobo,
    RoboRush,
    AdeptRush,
    EarlyExpand,
    FastDT,
    AirOneBase,
    SafeExpand,
    ProxyBase,
    WorkerRush,
    LingRush,
    RoachRush,
    EcoExpand,
    NySwarm,
    ProxyMarauders,
    ProxyFactory,
    TerranMacro,
    ProxyMarine,
    TerranOneBase,
    Bunker,
    TerranLate,
}

impl Default for EnemyRushBuild {
    fn default() -> Self {
        EnemyRushBuild::Macro
    }
}

/// Composition the enemy goes for once the opening is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyMacroBuild {
    StandardMacro,
    BattleCruisers,
    Banshees,
    Tempests,
    Carriers,
    DarkTemplars,
    Lurkers,
    Mutalisks,
    Mmm,
}

impl Default for EnemyMacroBuild {
    fn default() -> Self {
        EnemyMacroBuild::StandardMacro
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RushChange {
    pub previous: EnemyRushBuild,
    pub current: EnemyRushBuild,
}

const START_TOWNHALLS: [UnitTypeId; 3] = [
    UnitTypeId::Nexus,
    UnitTypeId::Hatchery,
    UnitTypeId::CommandCenter,
];

const CC_TYPES: [UnitTypeId; 3] = [
    UnitTypeId::CommandCenter,
    UnitTypeId::OrbitalCommand,
    UnitTypeId::PlanetaryFortress,
];

/// Streaming classifier of the enemy strategy.
///
/// Every tick it records the estimated start time of newly seen structures
/// and walks a set of time windowed rules over what we remember of the enemy.
/// The first rule that matches decides the tick.
#[derive(Default)]
pub struct BuildDetector {
    enemy_race: Race,
    own_start: Point2,
    enemy_start: Point2,
    rush_build: EnemyRushBuild,
    macro_build: EnemyMacroBuild,
    timings: HashMap<UnitTypeId, Vec<f32>>,
    handled: HashMap<u64, UnitTypeId>,
}

fn count(cache: &UnitCache, unit_type: UnitTypeId) -> usize {
    cache
        .remembered_enemies()
        .iter()
        .filter(|u| u.type_id.real_type() == unit_type)
        .count()
}

fn ready_count(cache: &UnitCache, unit_type: UnitTypeId) -> usize {
    cache
        .remembered_enemies()
        .iter()
        .filter(|u| u.is_ready() && u.type_id.real_type() == unit_type)
        .count()
}

fn structures_near(cache: &UnitCache, pos: Point2, range: f32) -> Vec<&UnitSnapshot> {
    cache
        .enemy_in_range(pos, range)
        .into_iter()
        .filter(|u| u.is_structure)
        .collect()
}

impl BuildDetector {
    pub fn start(&mut self, enemy_race: Race, own_start: Point2, enemy_start: Point2) {
        self.enemy_race = enemy_race;
        self.own_start = own_start;
        self.enemy_start = enemy_start;
        let townhalls: &[UnitTypeId] = match enemy_race {
            Race::Protoss => &[UnitTypeId::Nexus],
            Race::Zerg => &[UnitTypeId::Hatchery],
            Race::Terran => &[UnitTypeId::CommandCenter],
            _ => &START_TOWNHALLS,
        };
        for townhall in townhalls {
            self.timings.insert(*townhall, vec![0f32]);
        }
    }

    pub fn set_enemy_race(&mut self, enemy_race: Race) {
        if self.enemy_race != enemy_race {
            info!("Enemy race revealed as {enemy_race:?}");
            self.enemy_race = enemy_race;
        }
    }

    pub fn enemy_race(&self) -> Race {
        self.enemy_race
    }

    pub fn rush_build(&self) -> EnemyRushBuild {
        self.rush_build
    }

    pub fn macro_build(&self) -> EnemyMacroBuild {
        self.macro_build
    }

    pub fn rush_detected(&self) -> bool {
        self.rush_build != EnemyRushBuild::Macro
    }

    /// Estimated start time of the `index`th structure of that type we saw.
    pub fn started(&self, unit_type: UnitTypeId, index: usize) -> f32 {
        self.timings
            .get(&unit_type)
            .and_then(|timings| timings.get(index))
            .copied()
            .unwrap_or(f32::MAX)
    }

    pub fn update(&mut self, cache: &UnitCache, time: f32) -> Option<RushChange> {
        self.update_timings(cache, time);
        let change = self
            .rush_detection(cache, time)
            .and_then(|rush| self.set_rush(rush));
        if self.macro_build == EnemyMacroBuild::StandardMacro {
            self.macro_build = self.macro_build_detection(cache, time);
            if self.macro_build != EnemyMacroBuild::StandardMacro {
                info!("Enemy normal build recognized as {:?}", self.macro_build);
            }
        }
        change
    }

    fn set_rush(&mut self, rush: EnemyRushBuild) -> Option<RushChange> {
        if self.rush_build == rush {
            return None;
        }
        let change = RushChange {
            previous: self.rush_build,
            current: rush,
        };
        info!("POSSIBLE RUSH: {rush:?}.");
        self.rush_build = rush;
        Some(change)
    }

    fn is_first_townhall(&self, unit: &UnitSnapshot) -> bool {
        unit.position == self.enemy_start && START_TOWNHALLS.contains(&unit.type_id)
    }

    fn update_timings(&mut self, cache: &UnitCache, time: f32) {
        for unit in cache
            .enemy_units()
            .iter()
            .filter(|u| u.is_structure && !u.is_snapshot)
        {
            if self.handled.get(&unit.tag) == Some(&unit.type_id) {
                continue;
            }
            self.handled.insert(unit.tag, unit.type_id);
            if self.is_first_townhall(unit) {
                continue;
            }
            let start_time = time - unit.build_progress * unit.build_time;
            self.timings
                .entry(unit.type_id.real_type())
                .or_default()
                .push(start_time);
        }
    }

    /// The archetype the current observations point to, if any rule matches.
    pub fn rush_detection(&self, cache: &UnitCache, time: f32) -> Option<EnemyRushBuild> {
        if time > RUSH_TIMEOUT {
            return Some(match self.enemy_race {
                Race::Protoss => EnemyRushBuild::Macro,
                Race::Zerg => EnemyRushBuild::EcoExpand,
                _ => EnemyRushBuild::TerranLate,
            });
        }
        if self.rush_build == EnemyRushBuild::WorkerRush
            || (self.rush_build == EnemyRushBuild::CannonRush && time < CANNON_RUSH_HOLD)
        {
            return None;
        }
        let workers_close = cache
            .known_enemy_workers()
            .iter()
            .filter(|u| u.distance(self.own_start) < u.distance(self.enemy_start))
            .count();
        if workers_close > WORKER_RUSH_COUNT && self.rush_build != EnemyRushBuild::LingRush {
            return Some(EnemyRushBuild::WorkerRush);
        }
        match self.enemy_race {
            Race::Protoss => self.protoss_rushes(cache, time),
            Race::Zerg => self.zerg_rushes(cache, time),
            Race::Terran => self.terran_rushes(cache, time),
            _ => None,
        }
    }

    fn protoss_rushes(&self, cache: &UnitCache, time: f32) -> Option<EnemyRushBuild> {
        use EnemyRushBuild::*;
        let current = self.rush_build;
        let nexus = count(cache, UnitTypeId::Nexus);
        let gateway = count(cache, UnitTypeId::Gateway);
        let cyber = count(cache, UnitTypeId::CyberneticsCore);
        let assimilator = count(cache, UnitTypeId::Assimilator);
        let stargate = count(cache, UnitTypeId::Stargate);
        let robo = count(cache, UnitTypeId::RoboticsFacility);

        if nexus > 1 {
            if (110f32..=130f32).contains(&time) {
                return Some(EarlyExpand);
            }
            if time >= 160f32 && ![EarlyExpand, RoboRush, ProxyRobo, CannonRush, AirOneBase].contains(&current) {
                return Some(SafeExpand);
            }
        }
        if time > 135f32
            && time <= 200f32
            && ready_count(cache, UnitTypeId::PhotonCannon) >= 1
            && current == EarlyExpand
        {
            return Some(SafeExpand);
        }
        if !structures_near(cache, self.own_start, PROXY_DISTANCE_PROTOSS).is_empty() && time <= 120f32 {
            return Some(CannonRush);
        }

        if (135f32..=180f32).contains(&time) {
            if gateway >= 3 && cyber >= 1 {
                return Some(AdeptRush);
            }
            if count(cache, UnitTypeId::Forge) >= 1 {
                if gateway == 0 && assimilator == 0 {
                    return Some(CannonRush);
                } else if assimilator >= 1 {
                    return Some(FastDT);
                }
            }
            if count(cache, UnitTypeId::Pylon) < 2 {
                if assimilator < 1 && current == Macro {
                    if count(cache, UnitTypeId::Adept) >= 4 {
                        return Some(AdeptRush);
                    }
                    return Some(if nexus == 0 { ProxyRobo } else { ProxyZealots });
                }
            } else {
                if stargate >= 1 && gateway == 1 {
                    return Some(AirOneBase);
                }
                if robo >= 1 {
                    return Some(RoboRush);
                }
                if gateway < 2 && cyber >= 1 && assimilator > 1 && current == Macro {
                    return Some(ProxyRobo);
                } else if gateway >= 2 && cyber >= 1 && current == Macro {
                    return Some(if robo >= 1 {
                        RoboRush
                    } else if assimilator >= 1 {
                        Macro
                    } else {
                        ProxyZealots
                    });
                }
            }
        }

        let proxy_robo = structures_near(cache, self.own_start, PROXY_ROBO_DISTANCE)
            .iter()
            .any(|u| u.type_id == UnitTypeId::RoboticsFacility);
        if proxy_robo && current == Macro {
            return Some(ProxyRobo);
        }

        if time > 135f32
            && time <= 260f32
            && ready_count(cache, UnitTypeId::Nexus) < 2
            && ![CannonRush, EarlyExpand, ProxyZealots].contains(&current)
        {
            if gateway + stargate + robo >= 3 {
                if count(cache, UnitTypeId::DarkShrine) > 0 {
                    return Some(FastDT);
                }
                if stargate > 0 && current != RoboRush {
                    return Some(AirOneBase);
                }
                if robo > 0 && current != AirOneBase {
                    return Some(RoboRush);
                }
            } else if ![ProxyRobo, RoboRush, AirOneBase, AdeptRush, ProxyZealots, FastDT].contains(&current) {
                // Nothing at home, the production is somewhere else.
                return Some(Macro);
            }
        }
        None
    }

    fn zerg_rushes(&self, cache: &UnitCache, time: f32) -> Option<EnemyRushBuild> {
        use EnemyRushBuild::*;
        let hatcheries = count(cache, UnitTypeId::Hatchery);
        if !structures_near(cache, self.own_start, PROXY_DISTANCE_ZERG).is_empty() && time <= 120f32 {
            return Some(LingRush);
        }
        if self.rush_build == Macro {
            if hatcheries >= 2 && (70f32..=90f32).contains(&time) {
                return Some(EcoExpand);
            }
            if (75f32..=95f32).contains(&time) {
                if count(cache, UnitTypeId::Roach) + count(cache, UnitTypeId::RoachWarren) >= 1 {
                    return Some(RoachRush);
                }
                if count(cache, UnitTypeId::Zergling) >= 1 {
                    return Some(LingRush);
                }
            }
            if time > 95f32 {
                return Some(LingRush);
            }
        }
        if self.rush_build == LingRush && (95f32..=101f32).contains(&time) && hatcheries >= 2 {
            return Some(EcoExpand);
        }
        if time <= 230f32 && hatcheries >= 2 {
            return Some(EcoExpand);
        }
        None
    }

    fn terran_rushes(&self, cache: &UnitCache, time: f32) -> Option<EnemyRushBuild> {
        use EnemyRushBuild::*;
        let current = self.rush_build;
        let bases = cache.enemy_count(&CC_TYPES);
        if [ProxyMarine, ProxyMarauders, ProxyFactory].contains(&current) && bases > 1 {
            return Some(TerranMacro);
        }
        if bases > 1 {
            if (80f32..=93f32).contains(&time) {
                return Some(EarlyExpand);
            }
            if (120f32..=140f32).contains(&time) && current != EarlyExpand {
                return Some(TerranMacro);
            }
        }

        let in_main = |unit_type: UnitTypeId| {
            cache
                .enemy_structures()
                .iter()
                .filter(|u| u.type_id.real_type() == unit_type && u.is_closer(MAIN_BASE_RADIUS, self.enemy_start))
                .count()
        };
        let main_barracks = in_main(UnitTypeId::Barracks);
        let main_factories = in_main(UnitTypeId::Factory);
        let refineries = count(cache, UnitTypeId::Refinery);

        if (99f32..=221f32).contains(&time) && !structures_near(cache, self.own_start, PROXY_DISTANCE_TERRAN).is_empty() {
            return Some(Bunker);
        }
        if (99f32..=101f32).contains(&time) && current != EarlyExpand {
            return Some(if main_barracks + main_factories > 1 {
                TerranOneBase
            } else if main_barracks == 0 {
                match refineries {
                    0 => ProxyMarine,
                    1 => ProxyMarauders,
                    2 => ProxyFactory,
                    _ => return None,
                }
            } else if main_barracks == 1 {
                match refineries {
                    1 => TerranMacro,
                    2 => TerranOneBase,
                    _ => ProxyMarine,
                }
            } else if refineries == 0 {
                ProxyMarine
            } else {
                TerranOneBase
            });
        }
        if (120f32..=130f32).contains(&time) {
            if current == TerranMacro && cache.enemy_ready_count(&[UnitTypeId::Marauder]) > 0 {
                return Some(TerranOneBase);
            }
            if bases < 2 && current == TerranMacro {
                return Some(TerranOneBase);
            }
        }
        if (140f32..=150f32).contains(&time) && bases >= 2 && current == TerranOneBase {
            return Some(TerranMacro);
        }
        if (230f32..=350f32).contains(&time) && cache.enemy_count(&[UnitTypeId::PlanetaryFortress]) >= 1 {
            return Some(TerranLate);
        }
        None
    }

    fn macro_build_detection(&self, cache: &UnitCache, time: f32) -> EnemyMacroBuild {
        use EnemyMacroBuild::*;
        let seen = |unit_type: UnitTypeId| time < MACRO_BUILD_DEADLINE && cache.enemy_count(&[unit_type]) > 0;
        match self.enemy_race {
            Race::Terran => {
                if seen(UnitTypeId::Battlecruiser) {
                    return BattleCruisers;
                }
                if seen(UnitTypeId::Banshee) {
                    return Banshees;
                }
                if time > MACRO_BUILD_DEADLINE && time < MACRO_BUILD_DEADLINE + 60f32 {
                    let marines = cache.enemy_count(&[UnitTypeId::Marine]);
                    let marauders = cache.enemy_count(&[UnitTypeId::Marauder]);
                    let medivacs = cache.enemy_count(&[UnitTypeId::Medivac]);
                    if marines > marauders && marauders > 15 && 15 > medivacs && medivacs > 0 {
                        return Mmm;
                    }
                }
                StandardMacro
            }
            Race::Protoss => {
                // Later sightings win.
                if seen(UnitTypeId::DarkTemplar) {
                    DarkTemplars
                } else if seen(UnitTypeId::Carrier) {
                    Carriers
                } else if seen(UnitTypeId::Tempest) {
                    Tempests
                } else {
                    StandardMacro
                }
            }
            Race::Zerg => {
                if seen(UnitTypeId::LurkerMP) || seen(UnitTypeId::LurkerMPBurrowed) {
                    Lurkers
                } else if seen(UnitTypeId::Mutalisk) {
                    Mutalisks
                } else {
                    StandardMacro
                }
            }
            _ => StandardMacro,
        }
    }
}

/// Race of a random opponent, from the first unit of theirs we remember.
pub fn revealed_race(cache: &UnitCache) -> Option<Race> {
    cache.remembered_enemies().iter().find_map(|u| match u.type_id.real_type() {
        UnitTypeId::Nexus | UnitTypeId::Probe | UnitTypeId::Pylon | UnitTypeId::Zealot => {
            Some(Race::Protoss)
        }
        UnitTypeId::Hatchery
        | UnitTypeId::Drone
        | UnitTypeId::Overlord
        | UnitTypeId::Zergling
        | UnitTypeId::SpawningPool => Some(Race::Zerg),
        UnitTypeId::CommandCenter
        | UnitTypeId::SCV
        | UnitTypeId::SupplyDepot
        | UnitTypeId::Marine
        | UnitTypeId::Barracks => Some(Race::Terran),
        _ => None,
    })
}

/// Feeds the build detector and publishes archetype changes for the strategy
/// layer.
#[derive(Default)]
pub struct BuildDetectorManager {}

impl AIComponent for BuildDetectorManager {
    fn process(&mut self, bot: &mut Bot, bot_state: &mut BotState) {
        let race = match bot.enemy_race {
            Race::Random => revealed_race(&bot_state.cache).unwrap_or(Race::Random),
            race => race,
        };
        bot_state.build_detector.set_enemy_race(race);
        if let Some(change) = bot_state.build_detector.update(&bot_state.cache, bot.time) {
            bot_state.rush_changes.push(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWN_START: Point2 = Point2 { x: 20f32, y: 20f32 };
    const ENEMY_START: Point2 = Point2 { x: 150f32, y: 150f32 };

    fn detector(race: Race) -> BuildDetector {
        let mut detector = BuildDetector::default();
        detector.start(race, OWN_START, ENEMY_START);
        detector
    }

    fn structure(tag: u64, unit_type: UnitTypeId, x: f32, y: f32) -> UnitSnapshot {
        UnitSnapshot::new(tag, unit_type, Point2::new(x, y)).structure()
    }

    fn enemy_main(tag: u64, unit_type: UnitTypeId) -> UnitSnapshot {
        structure(tag, unit_type, 145f32 + tag as f32 % 5f32, 145f32)
    }

    fn worker(tag: u64, x: f32) -> UnitSnapshot {
        UnitSnapshot::new(tag, UnitTypeId::Probe, Point2::new(x, x))
    }

    fn cache(enemy: Vec<UnitSnapshot>, time: f32) -> UnitCache {
        UnitCache::from_snapshots(vec![], enemy, time)
    }

    #[test]
    fn ten_close_workers_is_a_worker_rush() {
        let mut detector = detector(Race::Protoss);
        let nine = (0..9).map(|t| worker(100 + t, 30f32)).collect::<Vec<_>>();
        assert_eq!(detector.update(&cache(nine.clone(), 40f32), 40f32), None);
        let mut ten = nine;
        ten.push(worker(200, 35f32));
        let change = detector.update(&cache(ten, 41f32), 41f32);
        assert_eq!(
            change,
            Some(RushChange {
                previous: EnemyRushBuild::Macro,
                current: EnemyRushBuild::WorkerRush
            })
        );
    }

    #[test]
    fn worker_rush_is_permanent() {
        let mut detector = detector(Race::Protoss);
        let workers = (0..10).map(|t| worker(100 + t, 30f32)).collect::<Vec<_>>();
        detector.update(&cache(workers, 40f32), 40f32);
        let expanded = vec![
            structure(1, UnitTypeId::Nexus, ENEMY_START.x, ENEMY_START.y),
            structure(2, UnitTypeId::Nexus, 120f32, 150f32),
        ];
        assert_eq!(detector.update(&cache(expanded, 120f32), 120f32), None);
        assert_eq!(detector.rush_build(), EnemyRushBuild::WorkerRush);
    }

    #[test]
    fn first_townhall_is_not_timed() {
        let mut detector = detector(Race::Protoss);
        let nexus = structure(1, UnitTypeId::Nexus, ENEMY_START.x, ENEMY_START.y);
        let gateway = enemy_main(2, UnitTypeId::Gateway).with_progress(0.5f32, 46f32);
        detector.update(&cache(vec![nexus, gateway], 60f32), 60f32);
        assert_eq!(detector.started(UnitTypeId::Nexus, 0), 0f32);
        assert_eq!(detector.started(UnitTypeId::Nexus, 1), f32::MAX);
        assert_eq!(detector.started(UnitTypeId::Gateway, 0), 37f32);
        assert_eq!(detector.started(UnitTypeId::Forge, 0), f32::MAX);
    }

    #[test]
    fn morphed_structures_are_timed_again_as_real_type() {
        let mut detector = detector(Race::Protoss);
        let gateway = enemy_main(2, UnitTypeId::Gateway);
        detector.update(&cache(vec![gateway.clone()], 60f32), 60f32);
        detector.update(&cache(vec![gateway], 61f32), 61f32);
        let warpgate = enemy_main(2, UnitTypeId::WarpGate);
        detector.update(&cache(vec![warpgate], 200f32), 200f32);
        assert_eq!(detector.started(UnitTypeId::Gateway, 1), 200f32);
        assert_eq!(detector.started(UnitTypeId::Gateway, 2), f32::MAX);
    }

    #[test]
    fn random_seeds_every_start_townhall() {
        let detector = detector(Race::Random);
        assert_eq!(detector.started(UnitTypeId::Hatchery, 0), 0f32);
        assert_eq!(detector.started(UnitTypeId::CommandCenter, 0), 0f32);
        assert_eq!(detector.started(UnitTypeId::Nexus, 0), 0f32);
    }

    #[test]
    fn adept_rush_without_gas_holds() {
        let mut detector = detector(Race::Protoss);
        let mut enemy = vec![
            structure(1, UnitTypeId::Nexus, ENEMY_START.x, ENEMY_START.y),
            enemy_main(2, UnitTypeId::Pylon),
        ];
        enemy.extend((0..4).map(|t| UnitSnapshot::new(10 + t, UnitTypeId::Adept, Point2::new(140f32, 140f32))));
        let change = detector.update(&cache(enemy.clone(), 140f32), 140f32);
        assert_eq!(change.map(|c| c.current), Some(EnemyRushBuild::AdeptRush));
        assert_eq!(detector.update(&cache(enemy, 200f32), 200f32), None);
        assert_eq!(detector.rush_build(), EnemyRushBuild::AdeptRush);
    }

    #[test]
    fn early_expand_wins_over_later_rules() {
        let detector = detector(Race::Protoss);
        let enemy = vec![
            structure(1, UnitTypeId::Nexus, ENEMY_START.x, ENEMY_START.y),
            structure(2, UnitTypeId::Nexus, 120f32, 150f32),
            structure(3, UnitTypeId::Pylon, 40f32, 40f32),
        ];
        // A structure close to us also matches the cannon rush rule.
        assert_eq!(
            detector.rush_detection(&cache(enemy, 120f32), 120f32),
            Some(EnemyRushBuild::EarlyExpand)
        );
    }

    #[test]
    fn cannon_rush_holds_until_timeout() {
        let mut detector = detector(Race::Protoss);
        let pylon = vec![structure(3, UnitTypeId::Pylon, 40f32, 40f32)];
        detector.update(&cache(pylon, 60f32), 60f32);
        assert_eq!(detector.rush_build(), EnemyRushBuild::CannonRush);
        let workers = (0..10).map(|t| worker(100 + t, 30f32)).collect::<Vec<_>>();
        assert_eq!(detector.rush_detection(&cache(workers.clone(), 90f32), 90f32), None);
        assert_eq!(
            detector.rush_detection(&cache(workers, 100f32), 100f32),
            Some(EnemyRushBuild::WorkerRush)
        );
    }

    #[test]
    fn global_timeout_per_race() {
        let empty = cache(vec![], 496f32);
        assert_eq!(
            detector(Race::Zerg).rush_detection(&empty, 496f32),
            Some(EnemyRushBuild::EcoExpand)
        );
        assert_eq!(
            detector(Race::Protoss).rush_detection(&empty, 496f32),
            Some(EnemyRushBuild::Macro)
        );
        assert_eq!(
            detector(Race::Random).rush_detection(&empty, 496f32),
            Some(EnemyRushBuild::TerranLate)
        );
    }

    #[test]
    fn zerg_rush_turns_eco_at_timeout() {
        let mut detector = detector(Race::Zerg);
        detector.rush_build = EnemyRushBuild::AdeptRush;
        let hatchery = vec![structure(1, UnitTypeId::Hatchery, ENEMY_START.x, ENEMY_START.y)];
        assert_eq!(detector.update(&cache(hatchery.clone(), 495f32), 495f32), None);
        assert_eq!(detector.rush_build(), EnemyRushBuild::AdeptRush);
        assert_eq!(
            detector.update(&cache(hatchery, 496f32), 496f32),
            Some(RushChange {
                previous: EnemyRushBuild::AdeptRush,
                current: EnemyRushBuild::EcoExpand
            })
        );
    }

    #[test]
    fn planetary_fortress_window() {
        let mut detector = detector(Race::Terran);
        detector.rush_build = EnemyRushBuild::TerranMacro;
        let enemy = vec![
            structure(1, UnitTypeId::CommandCenter, ENEMY_START.x, ENEMY_START.y),
            structure(2, UnitTypeId::PlanetaryFortress, 120f32, 150f32),
        ];
        let at = |time: f32| detector.rush_detection(&cache(enemy.clone(), time), time);
        assert_eq!(at(229.5f32), None);
        assert_eq!(at(230f32), Some(EnemyRushBuild::TerranLate));
        assert_eq!(at(350f32), Some(EnemyRushBuild::TerranLate));
        assert_eq!(at(350.5f32), None);
    }

    #[test]
    fn zerg_without_expansion_is_a_ling_rush() {
        let mut detector = detector(Race::Zerg);
        let pool = vec![
            structure(1, UnitTypeId::Hatchery, ENEMY_START.x, ENEMY_START.y),
            enemy_main(2, UnitTypeId::SpawningPool),
        ];
        assert_eq!(detector.update(&cache(pool.clone(), 60f32), 60f32), None);
        let change = detector.update(&cache(pool, 96f32), 96f32);
        assert_eq!(change.map(|c| c.current), Some(EnemyRushBuild::LingRush));
        let expanded = vec![
            structure(1, UnitTypeId::Hatchery, ENEMY_START.x, ENEMY_START.y),
            structure(4, UnitTypeId::Hatchery, 120f32, 150f32),
        ];
        let change = detector.update(&cache(expanded, 98f32), 98f32);
        assert_eq!(change.map(|c| c.current), Some(EnemyRushBuild::EcoExpand));
    }

    #[test]
    fn terran_without_barracks_at_home_is_proxying() {
        let mut detector = detector(Race::Terran);
        let enemy = vec![
            structure(1, UnitTypeId::CommandCenter, ENEMY_START.x, ENEMY_START.y),
            enemy_main(2, UnitTypeId::SupplyDepotLowered),
        ];
        let change = detector.update(&cache(enemy, 100f32), 100f32);
        assert_eq!(change.map(|c| c.current), Some(EnemyRushBuild::ProxyMarine));
        assert!(detector.rush_detected());
    }

    #[test]
    fn terran_one_rax_one_gas_is_macro() {
        let detector = detector(Race::Terran);
        let enemy = vec![
            structure(1, UnitTypeId::CommandCenter, ENEMY_START.x, ENEMY_START.y),
            enemy_main(2, UnitTypeId::Barracks),
            enemy_main(3, UnitTypeId::Refinery),
        ];
        assert_eq!(
            detector.rush_detection(&cache(enemy, 100f32), 100f32),
            Some(EnemyRushBuild::TerranMacro)
        );
    }

    #[test]
    fn macro_build_is_set_once() {
        let mut detector = detector(Race::Protoss);
        let carrier = UnitSnapshot::new(50, UnitTypeId::Carrier, Point2::new(100f32, 100f32)).flying();
        detector.update(&cache(vec![carrier], 400f32), 400f32);
        assert_eq!(detector.macro_build(), EnemyMacroBuild::Carriers);
        let dark = UnitSnapshot::new(51, UnitTypeId::DarkTemplar, Point2::new(100f32, 100f32));
        detector.update(&cache(vec![dark], 410f32), 410f32);
        assert_eq!(detector.macro_build(), EnemyMacroBuild::Carriers);
    }

    #[test]
    fn random_race_shows_with_the_first_unit() {
        assert_eq!(revealed_race(&cache(vec![], 20f32)), None);
        let ling = UnitSnapshot::new(60, UnitTypeId::Zergling, Point2::new(100f32, 100f32));
        assert_eq!(revealed_race(&cache(vec![ling], 20f32)), Some(Race::Zerg));
        let orbital = structure(61, UnitTypeId::OrbitalCommand, 150f32, 150f32);
        assert_eq!(revealed_race(&cache(vec![orbital], 20f32)), Some(Race::Terran));
    }
}
