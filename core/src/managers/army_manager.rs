use itertools::Itertools;
use log::debug;
use rust_sc2::bot::Bot;
use rust_sc2::prelude::*;

use crate::managers::build_detector::EnemyRushBuild;
use crate::managers::cache_manager::UnitCache;
use crate::managers::squad_manager::{is_army_unit, Squad};
use crate::micro::adept::AdeptMicro;
use crate::micro::disruptor::{DisruptorMicro, PurificationNovaMicro};
use crate::micro::generic::GenericMicro;
use crate::micro::high_templar::HighTemplarMicro;
use crate::micro::immortal::ImmortalMicro;
use crate::micro::mothership::MothershipMicro;
use crate::micro::observer::ObserverMicro;
use crate::micro::phoenix::PhoenixMicro;
use crate::micro::priorities::STALKER_PRIORITY;
use crate::micro::stalker::StalkerMicro;
use crate::micro::warp_prism::WarpPrismMicro;
use crate::micro::*;
use crate::params::*;
use crate::pathing::GamePather;
use crate::snapshot::UnitSnapshot;
use crate::utils::{IsDangerous, Strength, UnitOrderCheck};
use crate::{AIComponent, BotState};

const LING_TYPES: [UnitTypeId; 2] = [UnitTypeId::Zergling, UnitTypeId::Baneling];
const ROACH_TYPES: [UnitTypeId; 2] = [UnitTypeId::Roach, UnitTypeId::Ravager];
const ENEMY_SCAN_RANGE: f32 = 20f32;
const PANIC_STRENGTH_RATIO: f32 = 2f32;
const HOLD_OFFSET: f32 = 5f32;
const RALLY_RANGE: f32 = 15f32;
const SEARCH_INTERVAL: f32 = 30f32;
const MAX_SUPPLY_ATTACK: u32 = 190;

/// Army wide decisions shared by every squad this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmyPlan {
    pub going_aggro: bool,
    pub threat: Option<Point2>,
    pub rally: Point2,
    pub enemy_main: Point2,
    pub search_points: Vec<Point2>,
    pub time: f32,
}

impl ArmyPlan {
    fn search_target(&self) -> Point2 {
        if self.search_points.is_empty() {
            return self.enemy_main;
        }
        let index = (self.time / SEARCH_INTERVAL) as usize % self.search_points.len();
        self.search_points[index]
    }
}

pub fn army_supply(units: &[UnitSnapshot], reserved: &[u64]) -> f32 {
    units
        .iter()
        .filter(|u| is_army_unit(u) && !reserved.contains(&u.tag))
        .map(|u| u.supply)
        .sum()
}

pub fn enemy_army_supply(cache: &UnitCache) -> f32 {
    cache
        .remembered_enemies()
        .iter()
        .filter(|u| !u.is_worker() && !u.is_structure)
        .map(|u| u.supply)
        .sum()
}

/// Goes aggressive once we clearly outnumber the known enemy army and backs
/// off when the advantage is gone.
pub fn should_attack(going_aggro: bool, our_supply: f32, enemy_supply: f32, supply_used: u32) -> bool {
    let should_go_aggro = our_supply >= MIN_ATTACK_SUPPLY.max(enemy_supply * ATTACK_SUPPLY_RATIO)
        || supply_used > MAX_SUPPLY_ATTACK;
    let should_keep_aggro = going_aggro
        && our_supply >= MIN_ATTACK_SUPPLY * RETREAT_SUPPLY_RATIO
        && our_supply > enemy_supply * RETREAT_SUPPLY_RATIO;
    should_go_aggro || should_keep_aggro
}

/// Closest enemy pressing one of our bases.
pub fn find_threat(cache: &UnitCache, own_main: Point2, worker_rush: bool) -> Option<Point2> {
    let townhalls = cache.own_of_type(UnitTypeId::Nexus);
    cache
        .enemy_units()
        .iter()
        .filter(|u| !u.is_snapshot && !u.is_hallucination && (worker_rush || !u.is_worker()))
        .filter(|u| townhalls.iter().any(|t| t.is_closer(DEFENSE_RANGE, u.position)))
        .closest(own_main)
        .map(|u| u.position)
}

fn combat_model(enemies: &[&UnitSnapshot]) -> CombatModel {
    if enemies.iter().any(|u| SIEGE_TYPES.contains(&u.type_id)) {
        CombatModel::StalkerToSiege
    } else if enemies.iter().any(|u| ROACH_TYPES.contains(&u.type_id)) {
        CombatModel::StalkerToRoach
    } else if enemies.iter().any(|u| LING_TYPES.contains(&u.type_id)) {
        CombatModel::StalkerToSpeedlings
    } else {
        CombatModel::Default
    }
}

fn engage_ratios(units: &[&UnitSnapshot], cache: &UnitCache) -> (f32, f32) {
    if units.is_empty() {
        return (0f32, 0f32);
    }
    let mut engaged = 0;
    let mut can_engage = 0;
    for unit in units {
        let targets = cache
            .enemy_in_range(unit.position, SEARCH_RANGE)
            .into_iter()
            .filter(|e| unit.can_attack(e) && !e.is_hidden())
            .collect::<Vec<_>>();
        if targets
            .iter()
            .any(|e| e.distance(unit.position) <= unit.real_range_vs(e))
        {
            engaged += 1;
        }
        if targets
            .iter()
            .any(|e| e.distance(unit.position) <= unit.real_range_vs(e) + unit.speed * 2f32)
        {
            can_engage += 1;
        }
    }
    (
        engaged as f32 / units.len() as f32,
        can_engage as f32 / units.len() as f32,
    )
}

pub fn tactical_state(squad: &Squad, cache: &UnitCache, plan: &ArmyPlan) -> TacticalState {
    let center = squad.center();
    let units = squad.units.iter().collect::<Vec<_>>();
    let enemies = cache
        .enemy_in_range(center, ENEMY_SCAN_RANGE)
        .into_iter()
        .filter(|u| u.is_dangerous() && !u.is_hallucination)
        .collect::<Vec<_>>();
    let own_strength = units[..].strength();
    let enemy_strength = enemies[..].strength();
    let (move_type, target) = if enemy_strength > own_strength * PANIC_STRENGTH_RATIO {
        (MoveType::PanicRetreat, plan.rally)
    } else if let Some(threat) = plan.threat {
        (MoveType::Assault, threat)
    } else if plan.going_aggro {
        let structure = cache
            .enemy_structures()
            .into_iter()
            .filter(|u| !u.is_flying)
            .closest(center)
            .map(|u| u.position);
        match structure {
            Some(structure) if enemies.is_empty() => (MoveType::Push, structure),
            Some(structure) => (MoveType::Assault, structure),
            None => (MoveType::SearchAndDestroy, plan.search_target()),
        }
    } else if center.distance(plan.rally) > RALLY_RANGE {
        if enemy_strength > own_strength {
            (MoveType::DefensiveRetreat, plan.rally)
        } else {
            (MoveType::ReGroup, plan.rally)
        }
    } else {
        (MoveType::GatherAndHold, plan.rally)
    };
    let (engage_ratio, can_engage_ratio) = engage_ratios(&units, cache);
    let mut state = TacticalState::new(move_type, center, target)
        .with_model(combat_model(&enemies))
        .with_ratios(engage_ratio, can_engage_ratio)
        .with_ground_units(units.iter().any(|u| !u.is_flying));
    state.tags = squad.tags();
    state
}

/// The command the army logic gives every unit before micro refines it.
pub fn default_action(tactics: &TacticalState) -> Action {
    if tactics.move_type.is_retreat() {
        Action::move_to(tactics.target)
    } else {
        Action::attack_move(tactics.target)
    }
}

/// One controller instance per unit type, living across ticks.
pub struct Controllers {
    adept: AdeptMicro,
    disruptor: DisruptorMicro,
    nova: PurificationNovaMicro,
    generic: GenericMicro,
    high_templar: HighTemplarMicro,
    immortal: ImmortalMicro,
    mothership: MothershipMicro,
    observer: ObserverMicro,
    phoenix: PhoenixMicro,
    stalker: StalkerMicro,
    warp_prism: WarpPrismMicro,
}

impl Default for Controllers {
    fn default() -> Self {
        Self {
            adept: AdeptMicro::default(),
            disruptor: DisruptorMicro::default(),
            nova: PurificationNovaMicro::default(),
            generic: GenericMicro::new(&STALKER_PRIORITY),
            high_templar: HighTemplarMicro::default(),
            immortal: ImmortalMicro::default(),
            mothership: MothershipMicro::default(),
            observer: ObserverMicro,
            phoenix: PhoenixMicro::default(),
            stalker: StalkerMicro::default(),
            warp_prism: WarpPrismMicro::default(),
        }
    }
}

impl Controllers {
    fn for_type(&mut self, unit_type: UnitTypeId) -> &mut dyn MicroController {
        match unit_type {
            UnitTypeId::Adept => &mut self.adept,
            UnitTypeId::Disruptor => &mut self.disruptor,
            UnitTypeId::DisruptorPhased => &mut self.nova,
            UnitTypeId::HighTemplar => &mut self.high_templar,
            UnitTypeId::Immortal => &mut self.immortal,
            UnitTypeId::Mothership => &mut self.mothership,
            UnitTypeId::Observer | UnitTypeId::ObserverSiegeMode => &mut self.observer,
            UnitTypeId::Phoenix => &mut self.phoenix,
            UnitTypeId::Stalker => &mut self.stalker,
            UnitTypeId::WarpPrism | UnitTypeId::WarpPrismPhasing => &mut self.warp_prism,
            _ => &mut self.generic,
        }
    }

    /// Runs the group pass once per unit type in the squad, then every unit
    /// through its controller.
    pub fn solve_squad(&mut self, squad: &Squad, ctx: &MicroContext) -> Vec<(u64, Action)> {
        let default = default_action(ctx.tactics);
        let units = squad
            .tags()
            .into_iter()
            .filter_map(|tag| ctx.cache.own_by_tag(tag))
            .collect::<Vec<_>>();
        let mut actions = vec![];
        for unit_type in units.iter().map(|u| u.type_id).unique() {
            let group = units
                .iter()
                .copied()
                .filter(|u| u.type_id == unit_type)
                .collect::<Vec<_>>();
            let controller = self.for_type(unit_type);
            let group_action = controller.group_solve_combat(&group, default, ctx);
            for unit in group {
                actions.push((unit.tag, controller.unit_solve_combat(unit, group_action, ctx)));
            }
            actions.extend(controller.drain_side_actions());
        }
        actions
    }
}

#[derive(Default)]
pub struct ArmyManager {
    going_aggro: bool,
    controllers: Controllers,
}

impl ArmyManager {
    fn rally_point(bot: &Bot) -> Point2 {
        bot.units
            .my
            .townhalls
            .iter()
            .closest(bot.enemy_start)
            .map_or(bot.start_location, |nexus| {
                nexus.position().towards(bot.enemy_start, HOLD_OFFSET)
            })
    }

    fn plan(&mut self, bot: &Bot, bot_state: &BotState) -> ArmyPlan {
        let our_supply = army_supply(bot_state.cache.own_units(), &bot_state.harass_tags);
        let enemy_supply = enemy_army_supply(&bot_state.cache);
        let going_aggro = should_attack(self.going_aggro, our_supply, enemy_supply, bot.supply_used);
        if going_aggro != self.going_aggro {
            debug!(
                "Army going aggro {:?} ({:.0} vs {:.0})",
                going_aggro, our_supply, enemy_supply
            );
        }
        self.going_aggro = going_aggro;
        let worker_rush = bot_state.build_detector.rush_build() == EnemyRushBuild::WorkerRush;
        ArmyPlan {
            going_aggro,
            threat: find_threat(&bot_state.cache, bot.start_location, worker_rush),
            rally: Self::rally_point(bot),
            enemy_main: bot.enemy_start,
            search_points: bot
                .expansions
                .iter()
                .filter(|e| !e.alliance.is_mine())
                .map(|e| e.loc)
                .collect(),
            time: bot.time,
        }
    }
}

impl AIComponent for ArmyManager {
    fn process(&mut self, bot: &mut Bot, bot_state: &mut BotState) {
        let plan = self.plan(bot, bot_state);
        let mut orders = vec![];
        {
            let pather = GamePather::new(bot, &bot_state.cache);
            for squad in bot_state.squads.squads.iter() {
                let tactics = tactical_state(squad, &bot_state.cache, &plan);
                let ctx = MicroContext {
                    cache: &bot_state.cache,
                    cooldowns: &bot_state.cooldowns,
                    pather: &pather,
                    tactics: &tactics,
                    time: bot.time,
                    own_main: bot.start_location,
                    enemy_main: bot.enemy_start,
                    enemy_race: bot.enemy_race,
                    supply_left: bot.supply_left,
                };
                orders.extend(self.controllers.solve_squad(squad, &ctx));
            }
        }
        for (tag, action) in orders {
            if let Some(unit) = bot.units.my.all.get(tag) {
                unit.order_action(&action);
                if let Some(ability) = action.ability {
                    bot_state.cooldowns.used_ability(tag, ability);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;

    fn zealot(tag: u64, x: f32) -> UnitSnapshot {
        UnitSnapshot::new(tag, UnitTypeId::Zealot, Point2::new(x, 0f32))
            .with_ranges(0.1f32, 0f32)
            .with_supply(2f32)
    }

    fn plan() -> ArmyPlan {
        ArmyPlan {
            going_aggro: false,
            threat: None,
            rally: Point2::new(0f32, 0f32),
            enemy_main: Point2::new(100f32, 100f32),
            search_points: vec![],
            time: 300f32,
        }
    }

    #[test]
    fn attack_needs_a_supply_lead() {
        assert!(!should_attack(false, 20f32, 0f32, 40));
        assert!(should_attack(false, 30f32, 10f32, 60));
        assert!(!should_attack(false, 30f32, 30f32, 60));
        assert!(should_attack(false, 10f32, 100f32, 195));
    }

    #[test]
    fn attack_continues_until_the_lead_is_gone() {
        assert!(should_attack(true, 25f32, 30f32, 60));
        assert!(!should_attack(true, 20f32, 30f32, 60));
        assert!(!should_attack(true, 15f32, 0f32, 60));
    }

    #[test]
    fn army_supply_skips_workers_and_reserved_units() {
        let units = vec![
            zealot(1, 0f32),
            zealot(2, 1f32),
            UnitSnapshot::new(3, UnitTypeId::Probe, Point2::new(0f32, 0f32))
                .with_ranges(0.1f32, 0f32)
                .with_supply(1f32),
        ];
        assert_eq!(army_supply(&units, &[2]), 2f32);
    }

    #[test]
    fn threats_near_nexus_are_defended() {
        let nexus = UnitSnapshot::new(1, UnitTypeId::Nexus, Point2::new(0f32, 0f32)).structure();
        let scout = UnitSnapshot::new(10, UnitTypeId::SCV, Point2::new(5f32, 0f32)).with_ranges(0.1f32, 0f32);
        let marine = UnitSnapshot::new(11, UnitTypeId::Marine, Point2::new(20f32, 0f32)).with_ranges(5f32, 5f32);
        let far = UnitSnapshot::new(12, UnitTypeId::Marine, Point2::new(60f32, 0f32)).with_ranges(5f32, 5f32);
        let cache = UnitCache::from_snapshots(vec![nexus], vec![scout, marine, far], 100f32);
        let origin = Point2::new(0f32, 0f32);
        assert_eq!(find_threat(&cache, origin, false), Some(Point2::new(20f32, 0f32)));
        assert_eq!(find_threat(&cache, origin, true), Some(Point2::new(5f32, 0f32)));
    }

    #[test]
    fn overwhelming_enemy_triggers_panic() {
        let squad = Squad {
            units: vec![zealot(1, 30f32)],
        };
        let enemies = (10..16)
            .map(|tag| {
                UnitSnapshot::new(tag, UnitTypeId::Marine, Point2::new(40f32, 0f32)).with_ranges(5f32, 5f32)
            })
            .collect();
        let cache = UnitCache::from_snapshots(squad.units.clone(), enemies, 100f32);
        let state = tactical_state(&squad, &cache, &plan());
        assert_eq!(state.move_type, MoveType::PanicRetreat);
        assert_eq!(state.target, plan().rally);
        assert_eq!(default_action(&state), Action::move_to(plan().rally));
    }

    #[test]
    fn aggression_pushes_to_closest_structure() {
        let squad = Squad {
            units: vec![zealot(1, 30f32), zealot(2, 31f32)],
        };
        let depot = UnitSnapshot::new(20, UnitTypeId::SupplyDepot, Point2::new(60f32, 0f32)).structure();
        let barracks = UnitSnapshot::new(21, UnitTypeId::Barracks, Point2::new(90f32, 0f32)).structure();
        let cache = UnitCache::from_snapshots(squad.units.clone(), vec![depot, barracks], 100f32);
        let mut aggro = plan();
        aggro.going_aggro = true;
        let state = tactical_state(&squad, &cache, &aggro);
        assert_eq!(state.move_type, MoveType::Push);
        assert_eq!(state.target, Point2::new(60f32, 0f32));
        assert_eq!(state.tags, vec![1, 2]);
        assert!(state.has_ground_units);
    }

    #[test]
    fn idle_army_far_from_rally_regroups() {
        let squad = Squad {
            units: vec![zealot(1, 30f32)],
        };
        let cache = UnitCache::from_snapshots(squad.units.clone(), vec![], 100f32);
        let state = tactical_state(&squad, &cache, &plan());
        assert_eq!(state.move_type, MoveType::ReGroup);
        assert!(!state.in_combat());
        let home = Squad {
            units: vec![zealot(1, 3f32)],
        };
        let cache = UnitCache::from_snapshots(home.units.clone(), vec![], 100f32);
        assert_eq!(tactical_state(&home, &cache, &plan()).move_type, MoveType::GatherAndHold);
    }

    #[test]
    fn model_follows_enemy_composition() {
        let roach = UnitSnapshot::new(10, UnitTypeId::Roach, Point2::new(0f32, 0f32));
        let tank = UnitSnapshot::new(11, UnitTypeId::SiegeTankSieged, Point2::new(0f32, 0f32));
        let ling = UnitSnapshot::new(12, UnitTypeId::Zergling, Point2::new(0f32, 0f32));
        assert_eq!(combat_model(&[&roach, &tank]), CombatModel::StalkerToSiege);
        assert_eq!(combat_model(&[&ling, &roach]), CombatModel::StalkerToRoach);
        assert_eq!(combat_model(&[&ling]), CombatModel::StalkerToSpeedlings);
        assert_eq!(combat_model(&[]), CombatModel::Default);
    }

    #[test]
    fn every_squad_member_gets_an_action() {
        let stalker = UnitSnapshot::new(1, UnitTypeId::Stalker, Point2::new(0f32, 0f32)).with_ranges(6f32, 6f32);
        let squad = Squad {
            units: vec![zealot(2, 1f32), stalker.clone(), zealot(3, 2f32)],
        };
        let target = Point2::new(100f32, 100f32);
        let fixture = Fixture::new(squad.units.clone(), vec![]).with_tactics(
            TacticalState::new(MoveType::Push, Point2::new(1f32, 0f32), target).with_ratios(0f32, 0f32),
        );
        let ctx = fixture.context();
        let mut actions = Controllers::default().solve_squad(&squad, &ctx);
        actions.sort_by_key(|(tag, _)| *tag);
        assert_eq!(
            actions,
            vec![
                (1, Action::attack_move(target)),
                (2, Action::attack_move(target)),
                (3, Action::attack_move(target)),
            ]
        );
    }
}
