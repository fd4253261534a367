use std::collections::{HashMap, HashSet, VecDeque};

use itertools::Itertools;
use log::{debug, info};
use rust_sc2::bot::Bot;
use rust_sc2::prelude::*;

use crate::command_queue::Command;
use crate::params::*;
use crate::snapshot::UnitSnapshot;
use crate::*;

const BASE_DEFENSE_RANGE: f32 = 19f32;
const SURROUNDINGS_RANGE: f32 = 10f32;
const MINERAL_WORKERS: usize = 2;
const GEYSER_WORKERS: usize = 3;

#[derive(PartialEq, Debug, Clone, Copy)]
enum WorkerDecision {
    Run,
    Fight,
    Gather,
    Build,
    Scout,
}

/// Enemy pressure around our bases.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BaseThreat {
    pub attackers: usize,
    pub weak_attackers: usize,
    pub pylons: usize,
    pub cannons: usize,
}

pub fn base_threat(enemies: &[UnitSnapshot], bases: &[Point2]) -> BaseThreat {
    let near_base = |u: &UnitSnapshot| bases.iter().any(|b| u.is_closer(BASE_DEFENSE_RANGE, *b));
    let close = enemies
        .iter()
        .filter(|u| u.can_attack_ground() && near_base(*u))
        .map(|u| u.position)
        .collect::<Vec<_>>();
    let around_close = |u: &&UnitSnapshot| close.iter().any(|c| u.is_closer(SURROUNDINGS_RANGE, *c));
    let buildings = enemies
        .iter()
        .filter(|u| u.is_structure && !u.is_ready() && near_base(*u))
        .collect::<Vec<_>>();
    BaseThreat {
        attackers: enemies
            .iter()
            .filter(|u| u.can_attack_ground())
            .filter(around_close)
            .count(),
        weak_attackers: enemies.iter().filter(|u| u.is_worker()).filter(around_close).count(),
        pylons: buildings
            .iter()
            .filter(|u| u.type_id == UnitTypeId::Pylon)
            .count(),
        cannons: buildings
            .iter()
            .filter(|u| u.type_id == UnitTypeId::PhotonCannon)
            .count(),
    }
}

/// Probes pulled to fight off proxies and worker rushes, net of what the
/// army and the current fighters already cover.
pub fn needed_fighters(
    pylons_close: usize,
    cannons_close: usize,
    weak_attackers: usize,
    army_supply: usize,
    current_fighters: usize,
) -> usize {
    let needed = pylons_close * 5 + cannons_close * 4 + weak_attackers * 12 / 10;
    needed
        .saturating_sub(army_supply)
        .saturating_sub(current_fighters)
}

/// Natural first, then the main, then around the main mineral line.
pub fn scout_route(enemy_start: Point2, enemy_natural: Option<Point2>, map_center: Point2) -> Vec<Point2> {
    let mut route = Vec::new();
    if let Some(natural) = enemy_natural {
        route.push(natural);
    }
    route.push(enemy_start);
    route.push(enemy_start.towards(map_center, -8f32));
    route.push(enemy_start.towards(map_center, 8f32));
    route
}

/// Resources around one of our bases.
#[derive(Debug, Default)]
pub struct BaseResources {
    pub minerals: Vec<u64>,
    pub geysers: Vec<u64>,
}

/// Open gathering slots in base order. Every patch gets a first probe before
/// any gets its second.
pub fn mining_slots(bases: &[BaseResources], assigned: &HashMap<u64, HashSet<u64>>) -> VecDeque<u64> {
    let taken = |resource: &u64| assigned.get(resource).map_or(0, |w| w.len());
    let mut slots = VecDeque::new();
    for base in bases {
        for wanted in 1..=MINERAL_WORKERS {
            slots.extend(base.minerals.iter().filter(|m| taken(*m) < wanted));
        }
        for geyser in base.geysers.iter() {
            for _ in taken(geyser)..GEYSER_WORKERS {
                slots.push_back(*geyser);
            }
        }
    }
    slots
}

struct ProbeStatus {
    health: f32,
    threatened: bool,
    attacked: bool,
    constructing: bool,
}

fn decide(probe: &ProbeStatus, retreat_below: f32, missing_fighters: &mut usize) -> WorkerDecision {
    if probe.health < retreat_below {
        if probe.threatened {
            WorkerDecision::Run
        } else {
            WorkerDecision::Gather
        }
    } else if *missing_fighters > 0 {
        *missing_fighters -= 1;
        WorkerDecision::Fight
    } else if probe.attacked {
        WorkerDecision::Fight
    } else if probe.constructing {
        WorkerDecision::Build
    } else {
        WorkerDecision::Gather
    }
}

/// Probe jobs: mining, fighting off early aggression and the early scout.
#[derive(Default)]
pub struct WorkerManager {
    decisions: HashMap<u64, WorkerDecision>,
    // probe -> resource
    assignment: HashMap<u64, u64>,
    // resource -> probes
    resources: HashMap<u64, HashSet<u64>>,

    scout_done: bool,
    scout_sent_at: Option<f32>,
    scout_route: Vec<Point2>,
}

impl WorkerManager {
    fn forget_probe(&mut self, tag: u64) {
        self.release_probe(tag);
        self.decisions.remove(&tag);
    }

    fn release_resource(&mut self, tag: u64) {
        if let Some(probes) = self.resources.remove(&tag) {
            debug!("Resource {:?} released {} probes", tag, probes.len());
            for probe in probes {
                self.assignment.remove(&probe);
            }
        }
    }

    fn release_probe(&mut self, tag: u64) {
        if let Some(resource) = self.assignment.remove(&tag) {
            if let Some(probes) = self.resources.get_mut(&resource) {
                probes.remove(&tag);
            }
        }
    }

    fn assign(&mut self, probe: u64, resource: u64) {
        self.assignment.insert(probe, resource);
        self.resources.entry(resource).or_default().insert(probe);
    }

    fn scouting(&mut self, bot: &Bot, bot_state: &mut BotState) {
        let active = bot.time >= SCOUT_START_TIME
            && bot.time < SCOUT_END_TIME
            && !self.scout_done
            && !bot_state.build_detector.rush_detected();
        if !active {
            if let Some(tag) = bot_state.scout_tag.take() {
                debug!("Scout {:?} back to mining", tag);
                self.decisions.insert(tag, WorkerDecision::Gather);
            }
            if bot.time >= SCOUT_END_TIME {
                self.scout_done = true;
            }
            return;
        }
        if let Some(tag) = bot_state.scout_tag {
            if bot.units.my.workers.get(tag).is_none() {
                // Dead scout, that's enough information.
                bot_state.scout_tag = None;
                self.scout_done = true;
            }
            return;
        }
        let scout = bot
            .units
            .my
            .workers
            .iter()
            .filter(|w| !w.is_constructing() && !w.is_carrying_resource())
            .closest(bot.enemy_start)
            .map(|w| w.tag());
        if let Some(tag) = scout {
            let natural = bot
                .expansions
                .iter()
                .map(|e| e.loc)
                .filter(|loc| loc.distance(bot.enemy_start) > 5f32)
                .min_by(|a, b| a.distance(bot.enemy_start).total_cmp(&b.distance(bot.enemy_start)));
            self.scout_route = scout_route(bot.enemy_start, natural, bot.game_info.map_center);
            info!("Sending probe {:?} to scout", tag);
            self.release_probe(tag);
            bot_state.scout_tag = Some(tag);
        }
    }

    fn assign_jobs(&mut self, bot: &Bot, bot_state: &BotState) {
        let bases = bot
            .units
            .my
            .townhalls
            .iter()
            .map(|t| t.position())
            .collect::<Vec<_>>();
        let threat = base_threat(bot_state.cache.enemy_units(), &bases);
        let fighters = self
            .decisions
            .values()
            .filter(|d| **d == WorkerDecision::Fight)
            .count();
        let army_supply = bot_state
            .cache
            .own_units()
            .iter()
            .filter(|u| u.is_ready() && !u.is_worker() && !u.is_structure)
            .map(|u| u.supply)
            .sum::<f32>() as usize;
        debug!("{:?} fighters {}", threat, fighters);
        let mut missing_fighters =
            needed_fighters(threat.pylons, threat.cannons, threat.weak_attackers, army_supply, fighters);
        let retreat_below = if threat.attackers > threat.weak_attackers {
            0.5f32
        } else {
            0.1f32
        };

        for probe in bot
            .units
            .my
            .workers
            .iter()
            .sorted_by(|a, b| a.hits().cmp(&b.hits()).then(a.tag().cmp(&b.tag())))
        {
            let decision = if bot_state.scout_tag == Some(probe.tag()) {
                WorkerDecision::Scout
            } else {
                let status = ProbeStatus {
                    health: probe.health_percentage().unwrap_or_default(),
                    threatened: bot
                        .units
                        .enemy
                        .units
                        .iter()
                        .any(|e| e.can_attack_ground() && e.in_range(probe, 2f32 + e.speed() + probe.speed())),
                    attacked: probe.is_attacked(),
                    constructing: probe.is_constructing(),
                };
                decide(&status, retreat_below, &mut missing_fighters)
            };
            self.decisions.insert(probe.tag(), decision);
        }
    }

    fn release_stale(&mut self, bot: &Bot) {
        let off_duty = self
            .decisions
            .iter()
            .filter(|(tag, decision)| {
                **decision != WorkerDecision::Gather
                    || bot.units.my.workers.get(**tag).map_or(false, |w| w.is_idle())
            })
            .map(|(tag, _)| *tag)
            .collect::<Vec<_>>();
        for probe in off_duty {
            self.release_probe(probe);
        }
        let depleted = self
            .resources
            .keys()
            .filter(|resource| match bot.units.all.get(**resource) {
                Some(unit) => {
                    unit.mineral_contents().unwrap_or_default() + unit.vespene_contents().unwrap_or_default()
                        == 0
                }
                None => {
                    bot.units.resources.get(**resource).is_none()
                        && bot.units.my.gas_buildings.get(**resource).is_none()
                }
            })
            .copied()
            .collect::<Vec<_>>();
        for resource in depleted {
            self.release_resource(resource);
        }
    }

    fn distribute(&mut self, bot: &Bot) {
        self.release_stale(bot);
        let bases = bot
            .units
            .my
            .townhalls
            .ready()
            .iter()
            .sorted_by(|a, b| {
                a.distance(bot.start_location)
                    .total_cmp(&b.distance(bot.start_location))
            })
            .map(|townhall| BaseResources {
                minerals: bot
                    .units
                    .mineral_fields
                    .closer(9f32, townhall.position())
                    .iter()
                    .map(|m| m.tag())
                    .collect(),
                geysers: bot
                    .units
                    .my
                    .gas_buildings
                    .ready()
                    .closer(9f32, townhall.position())
                    .iter()
                    .map(|g| g.tag())
                    .collect(),
            })
            .collect::<Vec<_>>();
        let mut slots = mining_slots(&bases, &self.resources);
        let idle_gatherers = self
            .decisions
            .iter()
            .filter(|(tag, decision)| {
                **decision == WorkerDecision::Gather && !self.assignment.contains_key(*tag)
            })
            .map(|(tag, _)| *tag)
            .sorted()
            .collect::<Vec<_>>();
        for probe in idle_gatherers {
            if let Some(resource) = slots.pop_front() {
                self.assign(probe, resource);
            } else if let Some(unit) = bot.units.my.workers.get(probe) {
                // Long distance mining once every base is full.
                let far_patch = bot
                    .units
                    .mineral_fields
                    .iter()
                    .filter(|m| !self.resources.contains_key(&m.tag()))
                    .closest(unit.position())
                    .map(|m| m.tag());
                if let Some(patch) = far_patch {
                    self.assign(probe, patch);
                }
            }
        }
    }

    fn run(&self, probe: &Unit, bot: &Bot) {
        if let Some(threat) = bot.units.enemy.units.closest(probe) {
            let away = probe.position().towards(threat.position(), -probe.speed());
            probe.move_to(Target::Pos(away), false);
        }
    }

    fn fight(&self, probe: &Unit, bot: &Bot) {
        if probe.on_cooldown() {
            let threats = bot
                .units
                .enemy
                .all
                .filter(|e| e.can_attack_unit(probe) && e.in_range(probe, probe.speed() + e.speed()));
            if let Some(center) = threats.center() {
                probe.move_to(Target::Pos(probe.position().towards(center, -probe.speed())), false);
            }
            return;
        }
        let weakest = bot
            .units
            .enemy
            .all
            .iter()
            .filter(|e| probe.in_range(e, 0.1f32))
            .min_by_key(|e| e.hits());
        if let Some(target) = weakest {
            probe.attack(Target::Tag(target.tag()), false);
        } else if let Some(target) = bot.units.enemy.all.closest(probe) {
            probe.attack(Target::Pos(target.position()), false);
        }
    }

    fn gather(&self, probe: &Unit) {
        if let Some(resource) = self.assignment.get(&probe.tag()) {
            let busy = probe.is_carrying_resource() && !probe.is_idle();
            if !busy && probe.target_tag() != Some(*resource) {
                probe.gather(*resource, false);
            }
        }
    }

    fn scout(&mut self, probe: &Unit, time: f32) {
        if !probe.is_idle() {
            return;
        }
        match self.scout_sent_at {
            // Idle once the route is walked.
            Some(sent) if time > sent + 1f32 => self.scout_done = true,
            Some(_) => {}
            None => {
                for (index, point) in self.scout_route.iter().enumerate() {
                    probe.move_to(Target::Pos(*point), index > 0);
                }
                self.scout_sent_at = Some(time);
            }
        }
    }

    fn micro(&mut self, bot: &Bot) {
        for probe in bot.units.my.workers.iter() {
            let decision = self
                .decisions
                .get(&probe.tag())
                .copied()
                .unwrap_or(WorkerDecision::Gather);
            match decision {
                WorkerDecision::Run => self.run(probe, bot),
                WorkerDecision::Fight => self.fight(probe, bot),
                WorkerDecision::Gather => self.gather(probe),
                WorkerDecision::Build => {}
                WorkerDecision::Scout => self.scout(probe, bot.time),
            }
        }
    }

    fn queue_probes(&self, bot: &Bot, bot_state: &mut BotState) {
        let mining = bot
            .units
            .my
            .townhalls
            .iter()
            .map(|t| {
                if t.is_ready() {
                    t.ideal_harvesters().unwrap_or_default()
                } else {
                    12
                }
            })
            .sum::<u32>();
        let gas = bot
            .units
            .my
            .gas_buildings
            .iter()
            .map(|g| g.ideal_harvesters().unwrap_or_default())
            .sum::<u32>();
        let wanted = ((mining + gas) as usize).min(MAX_WORKERS);
        bot_state
            .build_queue
            .push(Command::new_unit(UnitTypeId::Probe, wanted, false), false, 25);
    }
}

impl AIComponent for WorkerManager {
    fn process(&mut self, bot: &mut Bot, bot_state: &mut BotState) {
        self.scouting(bot, bot_state);
        self.assign_jobs(bot, bot_state);
        self.distribute(bot);
        self.micro(bot);
        self.queue_probes(bot, bot_state);
    }

    fn on_event(&mut self, event: &Event, _: &mut BotState) {
        if let Event::UnitDestroyed(tag, alliance) = event {
            match alliance {
                Some(Alliance::Own) => self.forget_probe(*tag),
                // mined out
                Some(Alliance::Neutral) => self.release_resource(*tag),
                _ => {}
            }
        }
    }
}
