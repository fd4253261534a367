use log::{debug, info, warn};
use rust_sc2::bot::Bot;
use rust_sc2::prelude::*;
use rust_sc2::Event::UnitDestroyed;

use crate::managers::cache_manager::UnitCache;
use crate::micro::warp_prism::prism_evasive_move_to;
use crate::micro::{Action, MicroContext, MoveType, TacticalState};
use crate::params::*;
use crate::pathing::GamePather;
use crate::snapshot::UnitSnapshot;
use crate::utils::{find_warp_spot, UnitOrderCheck};
use crate::{AIComponent, BotState};

const PHASING: AbilityId = AbilityId::MorphWarpPrismPhasingMode;
const TRANSPORT: AbilityId = AbilityId::MorphWarpPrismTransportMode;
const UNLOAD: AbilityId = AbilityId::UnloadAllAtWarpPrism;
const WARP_DT: AbilityId = AbilityId::WarpGateTrainDarkTemplar;

const WARP_SPOT_RANGE: f32 = 4f32;
const PLATFORM_OFFSET: f32 = 6f32;
const WARP_OFFSET: f32 = 7f32;
const UNLOAD_RANGE: f32 = 12f32;
const FULL_CARGO: u32 = 4;
const PRISM_LOW_HEALTH: f32 = 0.2f32;
const PRISM_SAFE_HEALTH: f32 = 0.4f32;
const NINJA_LOAD_RANGE: f32 = 5f32;
const ATTACK_LOAD_RANGE: f32 = 8f32;
const SCAN_REVEAL_RANGE: f32 = 15f32;

const ANTI_DETECTION: [UnitTypeId; 2] = [UnitTypeId::SporeCrawler, UnitTypeId::MissileTurret];
const STARPORT_ADDONS: [UnitTypeId; 1] = [UnitTypeId::StarportTechLab];
const OTHER_ADDONS: [UnitTypeId; 3] = [
    UnitTypeId::FactoryTechLab,
    UnitTypeId::BarracksTechLab,
    UnitTypeId::StarportReactor,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarassPhase {
    AwaitingShrine,
    Positioning,
    Phasing,
    WarpingDt,
    Loading,
    Harassing,
    Done,
}

/// What the harass state machine needs to know to move on.
#[derive(Debug, Clone, Default)]
pub struct HarassFacts {
    pub has_prism: bool,
    pub prism_phased: bool,
    pub shrine_planned: bool,
    pub shrine_exists: bool,
    pub shrine_ready: bool,
    pub at_warp_position: bool,
    pub elapsed: f32,
    pub dt_count: usize,
    pub placement_failed: bool,
    pub cargo: u32,
    pub air_detector_seen: bool,
}

pub fn transition(phase: HarassPhase, facts: &HarassFacts) -> HarassPhase {
    use HarassPhase::*;
    if phase != AwaitingShrine && phase != Done && !facts.has_prism {
        return Done;
    }
    match phase {
        AwaitingShrine if !facts.shrine_planned && !facts.shrine_exists => Done,
        AwaitingShrine if facts.shrine_exists && facts.has_prism => Positioning,
        Positioning if facts.at_warp_position && facts.shrine_ready => Phasing,
        Phasing if facts.prism_phased && facts.elapsed >= HARASS_PHASE_TIME => WarpingDt,
        WarpingDt if facts.placement_failed => Phasing,
        WarpingDt if facts.dt_count >= HARASS_DT_COUNT => Loading,
        Loading if facts.cargo >= FULL_CARGO && facts.elapsed >= HARASS_LOAD_TIME => Harassing,
        Harassing if facts.air_detector_seen => Done,
        _ => phase,
    }
}

/// Detector coverage with a safety margin, or a recent scan close by.
pub fn is_revealed(cache: &UnitCache, pos: Point2) -> bool {
    cache.is_detected(pos, 1f32)
        || cache
            .scans()
            .iter()
            .any(|(center, _)| center.distance(pos) < SCAN_REVEAL_RANGE)
}

fn air_detector_near(cache: &UnitCache, pos: Point2) -> bool {
    cache
        .enemy_units()
        .iter()
        .any(|u| u.is_flying && u.is_detector() && u.detect_range - 1f32 > u.distance(pos))
}

fn closest_enemy<'a>(
    cache: &'a UnitCache,
    from: Point2,
    range: f32,
    filter: impl Fn(&UnitSnapshot) -> bool,
) -> Option<&'a UnitSnapshot> {
    cache
        .enemy_in_range(from, range)
        .into_iter()
        .filter(|u| filter(u))
        .closest(from)
}

/// What a hidden dark templar goes for first.
pub fn priority_target(dt: &UnitSnapshot, prism: Option<&UnitSnapshot>, cache: &UnitCache) -> Option<u64> {
    let ground_anti_air = |u: &UnitSnapshot| u.can_attack_air() && !u.is_flying;
    closest_enemy(cache, dt.position, 15f32, |u| ANTI_DETECTION.contains(&u.type_id))
        .or_else(|| {
            prism.and_then(|prism| {
                cache
                    .enemy_in_range(prism.position, 10f32)
                    .into_iter()
                    .filter(|u| ground_anti_air(u))
                    .closest(dt.position)
            })
        })
        .or_else(|| closest_enemy(cache, dt.position, 13f32, |u| u.is_worker()))
        .or_else(|| closest_enemy(cache, dt.position, 7f32, |u| STARPORT_ADDONS.contains(&u.type_id)))
        .or_else(|| closest_enemy(cache, dt.position, 7f32, |u| OTHER_ADDONS.contains(&u.type_id)))
        .or_else(|| closest_enemy(cache, dt.position, 7f32, ground_anti_air))
        .map(|u| u.tag)
}

/// Dark templar command: hide in the prism when revealed, otherwise kill.
pub fn dt_action(dt: &UnitSnapshot, prism: Option<&UnitSnapshot>, ninja: bool, ctx: &MicroContext) -> Action {
    if is_revealed(ctx.cache, dt.position) {
        let load_range = if ninja { NINJA_LOAD_RANGE } else { ATTACK_LOAD_RANGE };
        return match prism {
            Some(prism)
                if dt.distance(prism.position) <= load_range
                    && prism.shield_health_percentage() >= PRISM_SAFE_HEALTH =>
            {
                Action::follow(prism.tag)
            }
            Some(prism) if ninja => Action::move_to(prism.position),
            _ => Action::move_to(ctx.own_main),
        };
    }
    match priority_target(dt, prism, ctx.cache) {
        Some(tag) => Action::attack(tag),
        None => Action::attack_move(ctx.enemy_main),
    }
}

/// Shuttles the ninjas up and down the enemy main.
pub fn prism_action(prism: &UnitSnapshot, ninjas: &[&UnitSnapshot], platform: Point2, ctx: &MicroContext) -> Action {
    if ctx.is_locked_on(prism) {
        return prism_evasive_move_to(prism, platform, ctx);
    }
    if prism.health_percentage() <= PRISM_LOW_HEALTH && prism.cargo_used > 0 {
        return Action::cast_at(UNLOAD, prism.position);
    }
    if prism.distance(platform) <= UNLOAD_RANGE
        && !is_revealed(ctx.cache, prism.position)
        && prism.cargo_used > 0
    {
        return Action::cast_at(UNLOAD, prism.position);
    }
    let mut target = platform;
    if !ninjas.is_empty() && prism.cargo_used < FULL_CARGO {
        if let Some(revealed) = ninjas.iter().find(|dt| is_revealed(ctx.cache, dt.position)) {
            return Action::move_to(revealed.position);
        }
        target = ninjas.iter().map(|dt| dt.position).center().unwrap_or(platform);
    }
    prism_evasive_move_to(prism, target, ctx)
}

/// Dark templar drop with a warp prism: warp three DTs at the edge of the
/// enemy base, keep one on the ground and shuttle the other two.
pub struct HarassManager {
    phase: HarassPhase,
    started: bool,
    phase_started: f32,
    prism: Option<u64>,
    attack_dt: Option<u64>,
    ninjas: Vec<u64>,
    warp_position: Point2,
    platform: Point2,
}

impl Default for HarassManager {
    fn default() -> Self {
        Self {
            phase: HarassPhase::AwaitingShrine,
            started: false,
            phase_started: 0f32,
            prism: None,
            attack_dt: None,
            ninjas: vec![],
            warp_position: Point2::new(0f32, 0f32),
            platform: Point2::new(0f32, 0f32),
        }
    }
}

impl HarassManager {
    pub fn phase(&self) -> HarassPhase {
        self.phase
    }

    fn tags(&self) -> Vec<u64> {
        if self.phase == HarassPhase::Done {
            return vec![];
        }
        self.prism
            .iter()
            .chain(self.attack_dt.iter())
            .chain(self.ninjas.iter())
            .copied()
            .collect()
    }

    fn start(&mut self, bot: &Bot) {
        let mut zones = bot.expansions.iter().map(|e| e.loc).collect::<Vec<_>>();
        zones.sort_by(|a, b| {
            a.distance(bot.enemy_start)
                .partial_cmp(&b.distance(bot.enemy_start))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let fourth = zones.get(3).copied().unwrap_or(bot.enemy_start);
        self.warp_position = fourth.towards(bot.start_location, WARP_OFFSET);
        self.platform = bot.enemy_start.towards(self.warp_position, PLATFORM_OFFSET);
        self.started = true;
        info!("Starting dark templar harass from {:?}", self.warp_position);
    }

    fn drop_stale_tags(&mut self, cache: &UnitCache) {
        let passengers = self
            .prism
            .and_then(|tag| cache.own_by_tag(tag))
            .map(|prism| prism.passengers.clone())
            .unwrap_or_default();
        let alive = |tag: &u64| cache.own_by_tag(*tag).is_some() || passengers.contains(tag);
        if !self.attack_dt.iter().all(alive) {
            self.attack_dt = None;
        }
        self.ninjas.retain(alive);
    }

    fn assign_prism(&mut self, cache: &UnitCache) {
        if self.prism.is_none() {
            self.prism = cache
                .own_of_types(&[UnitTypeId::WarpPrism, UnitTypeId::WarpPrismPhasing])
                .into_iter()
                .find(|u| u.is_ready())
                .map(|u| u.tag);
        }
    }

    fn assign_dts(&mut self, cache: &UnitCache) {
        let dts = cache
            .own_of_type(UnitTypeId::DarkTemplar)
            .into_iter()
            .filter(|u| u.is_ready())
            .map(|u| u.tag)
            .collect::<Vec<_>>();
        self.attack_dt = dts.first().copied();
        self.ninjas = dts.iter().skip(1).take(2).copied().collect();
        debug!("Harass DTs {:?} {:?}", self.attack_dt, self.ninjas);
    }

    fn facts(&self, cache: &UnitCache, time: f32, placement_failed: bool) -> HarassFacts {
        let prism = self.prism.and_then(|tag| cache.own_by_tag(tag));
        let shrines = cache.own_of_type(UnitTypeId::DarkShrine);
        let harass_units = self
            .tags()
            .into_iter()
            .filter_map(|tag| cache.own_by_tag(tag))
            .collect::<Vec<_>>();
        HarassFacts {
            has_prism: prism.is_some(),
            prism_phased: prism.map_or(false, |p| p.type_id == UnitTypeId::WarpPrismPhasing),
            shrine_planned: false,
            shrine_exists: !shrines.is_empty(),
            shrine_ready: shrines.iter().any(|s| s.is_ready()),
            at_warp_position: prism.map_or(false, |p| p.is_closer(WARP_SPOT_RANGE, self.warp_position)),
            elapsed: time - self.phase_started,
            dt_count: cache
                .own_of_type(UnitTypeId::DarkTemplar)
                .into_iter()
                .filter(|u| u.is_ready())
                .count(),
            placement_failed,
            cargo: prism.map_or(0, |p| p.cargo_used),
            air_detector_seen: harass_units
                .iter()
                .any(|u| air_detector_near(cache, u.position)),
        }
    }

    fn unit_actions(&self, bot: &Bot, bot_state: &BotState) -> Vec<(u64, Action)> {
        let cache = &bot_state.cache;
        let prism = match self.prism.and_then(|tag| cache.own_by_tag(tag)) {
            Some(prism) => prism,
            None => return vec![],
        };
        let pather = GamePather::new(bot, cache);
        let tactics = TacticalState::new(MoveType::Harass, prism.position, self.platform);
        let ctx = MicroContext {
            cache,
            cooldowns: &bot_state.cooldowns,
            pather: &pather,
            tactics: &tactics,
            time: bot.time,
            own_main: bot.start_location,
            enemy_main: bot.enemy_start,
            enemy_race: bot.enemy_race,
            supply_left: bot.supply_left,
        };
        let ninjas = self
            .ninjas
            .iter()
            .filter_map(|tag| cache.own_by_tag(*tag))
            .collect::<Vec<_>>();
        let mut actions = vec![];
        match self.phase {
            HarassPhase::Positioning => {
                actions.push((prism.tag, prism_evasive_move_to(prism, self.warp_position, &ctx)));
            }
            HarassPhase::Phasing => {
                if prism.type_id == UnitTypeId::WarpPrism {
                    actions.push((prism.tag, Action::cast(PHASING)));
                }
            }
            HarassPhase::Loading => {
                if prism.type_id == UnitTypeId::WarpPrismPhasing
                    && bot_state
                        .cooldowns
                        .is_ready_after(prism.tag, TRANSPORT, HARASS_LOAD_TIME)
                {
                    actions.push((prism.tag, Action::cast(TRANSPORT)));
                }
                for ninja in ninjas.iter() {
                    actions.push((ninja.tag, Action::follow(prism.tag)));
                }
            }
            HarassPhase::Harassing => {
                actions.push((prism.tag, prism_action(prism, &ninjas, self.platform, &ctx)));
                for ninja in ninjas.iter() {
                    actions.push((ninja.tag, dt_action(ninja, Some(prism), true, &ctx)));
                }
                if let Some(dt) = self.attack_dt.and_then(|tag| cache.own_by_tag(tag)) {
                    actions.push((dt.tag, dt_action(dt, Some(prism), false, &ctx)));
                }
            }
            _ => {}
        }
        actions
    }

    /// Warps dark templars around the prism. Returns false when no spot was
    /// found.
    fn warp_dts(&self, bot: &mut Bot, bot_state: &mut BotState) -> bool {
        let prism = match self.prism.and_then(|tag| bot_state.cache.own_by_tag(tag)) {
            Some(prism) => prism.position,
            None => return true,
        };
        let mut missing = HARASS_DT_COUNT.saturating_sub(bot_state.cache.own_of_type(UnitTypeId::DarkTemplar).len());
        let gates = bot
            .units
            .my
            .structures
            .of_type(UnitTypeId::WarpGate)
            .ready()
            .iter()
            .filter(|g| bot_state.cooldowns.is_ready(g.tag(), WARP_DT))
            .map(|g| g.tag())
            .collect::<Vec<_>>();
        let mut taken: Vec<Point2> = vec![];
        for gate in gates {
            if missing == 0 || !bot.can_afford(UnitTypeId::DarkTemplar, true) {
                break;
            }
            let spot = find_warp_spot(prism, WARP_SPOT_RANGE, |p| {
                bot.is_pathable(p)
                    && bot_state.cache.own_in_range(p, 1f32).into_iter().all(|u| u.is_flying)
                    && taken.iter().all(|t| t.distance(p) > 1.5f32)
            });
            let spot = match spot {
                Some(spot) => spot,
                None => {
                    warn!("No room to warp dark templars at {:?}", prism);
                    return false;
                }
            };
            if let Some(unit) = bot.units.my.structures.get(gate) {
                unit.warp_in(UnitTypeId::DarkTemplar, spot);
            }
            bot.subtract_resources(UnitTypeId::DarkTemplar, true);
            bot_state.cooldowns.used_ability(gate, WARP_DT);
            taken.push(spot);
            missing -= 1;
        }
        true
    }

    fn set_phase(&mut self, phase: HarassPhase, time: f32, cache: &UnitCache) {
        if phase == self.phase {
            return;
        }
        info!("Dark templar harass {:?} -> {:?}", self.phase, phase);
        if phase == HarassPhase::Loading {
            self.assign_dts(cache);
        }
        self.phase = phase;
        self.phase_started = time;
    }
}

impl AIComponent for HarassManager {
    fn process(&mut self, bot: &mut Bot, bot_state: &mut BotState) {
        if self.phase == HarassPhase::Done {
            bot_state.harass_tags.clear();
            bot_state.harass_reserve = false;
            return;
        }
        if !self.started {
            if !bot_state.dt_harass {
                return;
            }
            self.start(bot);
        }
        self.drop_stale_tags(&bot_state.cache);
        if self.phase == HarassPhase::AwaitingShrine {
            self.assign_prism(&bot_state.cache);
        }
        let mut placement_failed = false;
        if self.phase == HarassPhase::WarpingDt {
            placement_failed = !self.warp_dts(bot, bot_state);
        }
        for (tag, action) in self.unit_actions(bot, bot_state) {
            if let Some(unit) = bot.units.my.all.get(tag) {
                unit.order_action(&action);
                if let Some(ability) = action.ability {
                    bot_state.cooldowns.used_ability(tag, ability);
                }
            }
        }
        let mut facts = self.facts(&bot_state.cache, bot.time, placement_failed);
        facts.shrine_planned = bot_state.dt_harass;
        let next = transition(self.phase, &facts);
        self.set_phase(next, bot.time, &bot_state.cache);
        bot_state.harass_tags = self.tags();
        bot_state.harass_reserve = matches!(
            self.phase,
            HarassPhase::Positioning | HarassPhase::Phasing | HarassPhase::WarpingDt
        );
    }

    fn on_event(&mut self, event: &Event, _: &mut BotState) {
        if let UnitDestroyed(tag, _) = event {
            if self.prism == Some(*tag) {
                self.prism = None;
            }
            if self.attack_dt == Some(*tag) {
                self.attack_dt = None;
            }
            self.ninjas.retain(|ninja| ninja != tag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;
    use HarassPhase::*;

    fn facts() -> HarassFacts {
        HarassFacts {
            has_prism: true,
            shrine_planned: true,
            ..HarassFacts::default()
        }
    }

    #[test]
    fn waits_for_shrine_and_prism() {
        assert_eq!(transition(AwaitingShrine, &facts()), AwaitingShrine);
        let shrine = HarassFacts {
            shrine_exists: true,
            has_prism: false,
            ..facts()
        };
        assert_eq!(transition(AwaitingShrine, &shrine), AwaitingShrine);
        let both = HarassFacts {
            shrine_exists: true,
            ..facts()
        };
        assert_eq!(transition(AwaitingShrine, &both), Positioning);
        let abandoned = HarassFacts {
            shrine_planned: false,
            ..facts()
        };
        assert_eq!(transition(AwaitingShrine, &abandoned), Done);
    }

    #[test]
    fn phases_once_in_position_with_ready_shrine() {
        let arrived = HarassFacts {
            at_warp_position: true,
            ..facts()
        };
        assert_eq!(transition(Positioning, &arrived), Positioning);
        let ready = HarassFacts {
            shrine_ready: true,
            ..arrived
        };
        assert_eq!(transition(Positioning, &ready), Phasing);
    }

    #[test]
    fn warps_after_phasing_delay() {
        let early = HarassFacts {
            prism_phased: true,
            elapsed: 2f32,
            ..facts()
        };
        assert_eq!(transition(Phasing, &early), Phasing);
        let late = HarassFacts {
            elapsed: 3.5f32,
            ..early
        };
        assert_eq!(transition(Phasing, &late), WarpingDt);
    }

    #[test]
    fn failed_placement_goes_back_to_phasing() {
        let failed = HarassFacts {
            placement_failed: true,
            dt_count: 3,
            ..facts()
        };
        assert_eq!(transition(WarpingDt, &failed), Phasing);
        let warped = HarassFacts {
            dt_count: 3,
            ..facts()
        };
        assert_eq!(transition(WarpingDt, &warped), Loading);
    }

    #[test]
    fn harass_starts_with_full_cargo_after_morph() {
        let loaded = HarassFacts {
            cargo: 4,
            elapsed: 3f32,
            ..facts()
        };
        assert_eq!(transition(Loading, &loaded), Loading);
        let ready = HarassFacts {
            elapsed: 6f32,
            ..loaded
        };
        assert_eq!(transition(Loading, &ready), Harassing);
    }

    #[test]
    fn lost_prism_or_air_detection_ends_harass() {
        let lost = HarassFacts {
            has_prism: false,
            ..facts()
        };
        for phase in [Positioning, Phasing, WarpingDt, Loading, Harassing] {
            assert_eq!(transition(phase, &lost), Done);
        }
        let detected = HarassFacts {
            air_detector_seen: true,
            ..facts()
        };
        assert_eq!(transition(Harassing, &detected), Done);
        assert_eq!(transition(Done, &facts()), Done);
    }

    fn dt(tag: u64, x: f32) -> UnitSnapshot {
        UnitSnapshot::new(tag, UnitTypeId::DarkTemplar, Point2::new(x, 0f32))
            .with_ranges(0.1f32, 0f32)
            .cloaked(false)
            .with_cargo_size(2)
    }

    fn prism() -> UnitSnapshot {
        UnitSnapshot::new(1, UnitTypeId::WarpPrism, Point2::new(0f32, 2f32))
            .flying()
            .with_health(80f32, 80f32)
            .with_shield(100f32, 100f32)
            .with_cargo(0, 8)
    }

    #[test]
    fn dt_kills_detection_before_workers() {
        let turret = UnitSnapshot::new(20, UnitTypeId::MissileTurret, Point2::new(12f32, 0f32))
            .structure()
            .with_ranges(0f32, 7f32)
            .with_detect_range(11f32);
        let scv = UnitSnapshot::new(21, UnitTypeId::SCV, Point2::new(3f32, 0f32)).with_ranges(0.1f32, 0f32);
        let cache = UnitCache::from_snapshots(vec![dt(2, 0f32)], vec![turret, scv.clone()], 100f32);
        assert_eq!(priority_target(&dt(2, 0f32), None, &cache), Some(20));
        let cache = UnitCache::from_snapshots(vec![dt(2, 0f32)], vec![scv], 100f32);
        assert_eq!(priority_target(&dt(2, 0f32), None, &cache), Some(21));
    }

    #[test]
    fn dt_attacks_enemy_main_without_targets() {
        let fixture = Fixture::new(vec![dt(2, 0f32)], vec![]);
        let ctx = fixture.context();
        assert_eq!(
            dt_action(&dt(2, 0f32), None, false, &ctx),
            Action::attack_move(fixture.enemy_main)
        );
    }

    #[test]
    fn revealed_ninja_loads_into_prism() {
        let raven = UnitSnapshot::new(30, UnitTypeId::Raven, Point2::new(3f32, 3f32))
            .flying()
            .with_detect_range(11f32);
        let fixture = Fixture::new(vec![dt(2, 0f32), prism()], vec![raven]);
        let ctx = fixture.context();
        assert_eq!(dt_action(&dt(2, 0f32), Some(&prism()), true, &ctx), Action::follow(1));
        let far = dt(3, -10f32);
        assert_eq!(
            dt_action(&far, Some(&prism()), true, &ctx),
            Action::move_to(prism().position)
        );
        assert!(air_detector_near(&fixture.cache, Point2::new(0f32, 0f32)));
    }

    #[test]
    fn revealed_attack_dt_retreats_home_when_prism_is_weak() {
        let raven = UnitSnapshot::new(30, UnitTypeId::Raven, Point2::new(3f32, 3f32))
            .flying()
            .with_detect_range(11f32);
        let weak = prism().with_shield(0f32, 100f32).with_health(20f32, 80f32);
        let fixture = Fixture::new(vec![dt(2, 0f32), weak.clone()], vec![raven]);
        let ctx = fixture.context();
        assert_eq!(
            dt_action(&dt(2, 0f32), Some(&weak), false, &ctx),
            Action::move_to(fixture.own_main)
        );
    }

    #[test]
    fn prism_unloads_at_the_platform() {
        let platform = Point2::new(5f32, 2f32);
        let loaded = prism().with_cargo(4, 8).with_passenger(2, 2).with_passenger(3, 2);
        let fixture = Fixture::new(vec![loaded.clone()], vec![]);
        let ctx = fixture.context();
        assert_eq!(
            prism_action(&loaded, &[], platform, &ctx),
            Action::cast_at(UNLOAD, loaded.position)
        );
    }

    #[test]
    fn prism_follows_dropped_ninjas() {
        let platform = Point2::new(50f32, 2f32);
        let fixture = Fixture::new(vec![prism(), dt(2, 4f32), dt(3, 6f32)], vec![]);
        let ctx = fixture.context();
        let ninjas = [&dt(2, 4f32), &dt(3, 6f32)];
        assert_eq!(
            prism_action(&prism(), &ninjas, platform, &ctx),
            Action::move_to(Point2::new(5f32, 0f32))
        );
    }
}
