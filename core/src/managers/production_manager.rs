use log::debug;
use rust_sc2::bot::Bot;
use rust_sc2::prelude::*;
use std::collections::HashSet;

use crate::command_queue::Command;
use crate::command_queue::Command::*;
use crate::params::{HARASS_RESERVE_GAS, HARASS_RESERVE_MINERALS};
use crate::utils::*;
use crate::*;

const PYLON_POWER_RANGE: i32 = 6;
const WARP_IN_RANGE: f32 = 5f32;
const CHRONO: AbilityId = AbilityId::EffectChronoBoostEnergyCost;
const CHRONO_ENERGY: f32 = 50f32;
const CHRONO_TARGETS: [UnitTypeId; 7] = [
    UnitTypeId::Forge,
    UnitTypeId::CyberneticsCore,
    UnitTypeId::TwilightCouncil,
    UnitTypeId::RoboticsFacility,
    UnitTypeId::Stargate,
    UnitTypeId::Gateway,
    UnitTypeId::Nexus,
];

/// Drains the build queue: trains, warps, builds and researches in priority
/// order and queues whatever tech is missing.
#[derive(Default)]
pub struct ProductionManager {
    producing: HashSet<u64>,
}

impl ProductionManager {
    const REQUIREMENT_QUEUE_PRIORITY: usize = 100_000;

    fn cancel_buildings(&self, bot: &mut Bot) {
        for structure in bot
            .units
            .my
            .structures
            .filter(|u| {
                u.is_attacked() && !u.is_ready() && u.hits_percentage().unwrap_or_default() < 0.1f32
            })
            .iter()
        {
            structure.cancel_building(false);
        }
    }

    fn morph_warpgates(&self, bot: &Bot) {
        if !bot.has_upgrade(UpgradeId::WarpGateResearch) {
            return;
        }
        for gateway in bot
            .units
            .my
            .structures
            .of_type(UnitTypeId::Gateway)
            .ready()
            .idle()
            .iter()
        {
            gateway.use_ability(AbilityId::MorphWarpGate, false);
        }
    }

    fn chrono_boost(&self, bot: &Bot) {
        let busy = bot
            .units
            .my
            .structures
            .ready()
            .of_types(&CHRONO_TARGETS.to_vec())
            .filter(|u| !u.is_idle() && !u.has_buff(BuffId::ChronoBoostEnergyCost));
        let mut boosted = HashSet::new();
        for nexus in bot
            .units
            .my
            .townhalls
            .ready()
            .filter(|u| u.energy().unwrap_or_default() as f32 >= CHRONO_ENERGY && !u.is_using(CHRONO))
            .iter()
        {
            // Tech first, probes last.
            let target = CHRONO_TARGETS.iter().find_map(|unit_type| {
                busy.iter()
                    .find(|u| u.type_id() == *unit_type && !boosted.contains(&u.tag()))
            });
            if let Some(target) = target {
                debug!("Chrono boost on {:?}", target.type_id());
                nexus.command(CHRONO, Target::Tag(target.tag()), false);
                boosted.insert(target.tag());
            }
        }
    }

    fn produce_units(&mut self, bot: &mut Bot, bot_state: &mut BotState) {
        bot_state.build_queue.check_completion(bot);
        bot_state.build_queue.print_queue();
        self.producing.clear();
        for element in bot_state.build_queue.into_iter() {
            match element.command {
                UnitCommand {
                    unit_type,
                    wanted_amount,
                    save_resources,
                } => {
                    self.produce(
                        bot,
                        bot_state,
                        unit_type,
                        wanted_amount,
                        save_resources,
                        element.priority,
                    );
                }
                UpgradeCommand {
                    upgrade,
                    save_resources,
                } => {
                    self.upgrade(bot, bot_state, upgrade, save_resources, element.priority);
                }
            }
        }
    }

    /// Affordable while keeping the dark templar money aside.
    fn can_afford(&self, bot: &Bot, bot_state: &BotState, unit_type: UnitTypeId) -> bool {
        if !bot.can_afford(unit_type, true) {
            return false;
        }
        if !bot_state.harass_reserve || unit_type == UnitTypeId::DarkTemplar {
            return true;
        }
        let cost = bot.get_unit_cost(unit_type);
        bot.minerals >= cost.minerals + HARASS_RESERVE_MINERALS
            && bot.vespene >= cost.vespene + HARASS_RESERVE_GAS
    }

    fn produce(
        &mut self,
        bot: &mut Bot,
        bot_state: &mut BotState,
        unit_type: UnitTypeId,
        wanted_amount: usize,
        save_resources: bool,
        priority: usize,
    ) {
        if bot.counter().all().count(unit_type) >= wanted_amount {
            return;
        } else if !self.can_afford(bot, bot_state, unit_type) {
            self.save_unit_resources(bot, bot_state, unit_type, save_resources);
            return;
        }
        if self.missing_unit_requirements(bot, bot_state, unit_type, save_resources, priority) {
            return;
        }
        if unit_type.is_structure() {
            self.build(bot, bot_state, unit_type, wanted_amount, save_resources);
        } else {
            let current_amount = bot.counter().all().count(unit_type);
            for _ in current_amount..wanted_amount {
                if !self.can_afford(bot, bot_state, unit_type) {
                    self.save_unit_resources(bot, bot_state, unit_type, save_resources);
                    break;
                }
                if !self.produce_unit(bot, bot_state, unit_type, save_resources) {
                    break;
                }
            }
        }
    }

    /// Queues the first missing tech building on the way to `requirement`.
    /// Returns true while something is still missing.
    fn queue_requirement(
        &self,
        bot: &Bot,
        bot_state: &mut BotState,
        requirement: Option<UnitTypeId>,
        save_resources: bool,
        priority: usize,
    ) -> bool {
        let requirement = match requirement {
            Some(requirement) => requirement,
            None => return true,
        };
        let started = bot.counter().ordered().count(requirement) > 0
            || bot.counter().all().count(requirement) > 0;
        if started {
            return true;
        }
        if !self.missing_unit_requirements(bot, bot_state, requirement, save_resources, priority) {
            debug!("Missing {:?}", requirement);
            bot_state.build_queue.push(
                Command::new_unit(requirement, 1, save_resources),
                false,
                Self::REQUIREMENT_QUEUE_PRIORITY + priority,
            );
        }
        true
    }

    fn missing_unit_requirements(
        &self,
        bot: &Bot,
        bot_state: &mut BotState,
        unit_type: UnitTypeId,
        save_resources: bool,
        priority: usize,
    ) -> bool {
        !unit_type.has_requirement(bot)
            && self.queue_requirement(
                bot,
                bot_state,
                unit_type.building_requirements().first().copied(),
                save_resources,
                priority,
            )
    }

    fn missing_upgrade_requirements(
        &self,
        bot: &Bot,
        bot_state: &mut BotState,
        upgrade: UpgradeId,
        save_resources: bool,
        priority: usize,
    ) -> bool {
        !upgrade.has_requirement(bot)
            && self.queue_requirement(
                bot,
                bot_state,
                upgrade.building_requirements().first().copied(),
                save_resources,
                priority,
            )
    }

    fn push_producer(&self, bot_state: &mut BotState, produced_on: &[UnitTypeId], save_resources: bool) {
        if let Some(producer) = produced_on.first() {
            debug!("No building to create, pushing one to the queue");
            bot_state.build_queue.push(
                Command::new_unit(*producer, 1, save_resources),
                false,
                Self::REQUIREMENT_QUEUE_PRIORITY,
            );
        }
    }

    /// Warp position next to the front most power field.
    fn warp_in_position(&self, bot: &Bot) -> Option<Point2> {
        let power = bot
            .units
            .my
            .all
            .filter(|u| {
                (u.type_id() == UnitTypeId::Pylon && u.is_ready())
                    || u.type_id() == UnitTypeId::WarpPrismPhasing
            })
            .iter()
            .closest(bot.enemy_start)
            .map(|u| u.position())?;
        find_warp_spot(power, WARP_IN_RANGE, |p| {
            bot.is_pathable(p) && bot.units.my.all.closer(1f32, p).is_empty()
        })
    }

    /// Returns false when nothing could take the order.
    fn produce_unit(
        &mut self,
        bot: &mut Bot,
        bot_state: &mut BotState,
        unit_type: UnitTypeId,
        save_resources: bool,
    ) -> bool {
        let produced_on = unit_type.produced_on();
        if let Some(ability) = unit_type.warp_ability() {
            let warp_gate = bot
                .units
                .my
                .structures
                .of_type(UnitTypeId::WarpGate)
                .ready()
                .filter(|g| g.has_ability(ability) && !self.producing.contains(&g.tag()))
                .first()
                .cloned();
            if let Some(warp_gate) = warp_gate {
                if let Some(position) = self.warp_in_position(bot) {
                    debug!("warping a {:?} at {:?}", unit_type, position);
                    warp_gate.warp_in(unit_type, position);
                    self.producing.insert(warp_gate.tag());
                    bot.subtract_resources(unit_type, true);
                    return true;
                }
            }
        }
        if let Some(train_at) = bot
            .units
            .my
            .structures
            .ready()
            .of_types(&produced_on)
            .filter(|u| u.type_id() != UnitTypeId::WarpGate && !self.producing.contains(&u.tag()))
            .almost_idle()
            .first()
            .cloned()
        {
            debug!("training a {:?} at {:?}", unit_type, train_at.type_id());
            train_at.train(unit_type, false);
            self.producing.insert(train_at.tag());
            bot.subtract_resources(unit_type, true);
            true
        } else {
            if bot.units.my.structures.of_types(&produced_on).is_empty() {
                self.push_producer(bot_state, &produced_on, save_resources);
            }
            self.save_unit_resources(bot, bot_state, unit_type, save_resources);
            false
        }
    }

    fn upgrade(
        &mut self,
        bot: &mut Bot,
        bot_state: &mut BotState,
        upgrade: UpgradeId,
        save_resources: bool,
        priority: usize,
    ) {
        if bot.is_ordered_upgrade(upgrade) || !bot.can_afford_vespene_upgrade(upgrade) {
            return;
        }
        if !bot.can_afford_upgrade(upgrade) {
            if save_resources {
                bot.subtract_upgrade_cost(upgrade);
            }
            return;
        }
        if self.missing_upgrade_requirements(bot, bot_state, upgrade, save_resources, priority) {
            return;
        }
        let researchers = upgrade.produced_on();
        let researcher = bot
            .units
            .my
            .structures
            .ready()
            .of_types(&researchers)
            .almost_idle()
            .first()
            .cloned();
        match researcher {
            Some(building) => {
                if self.producing.insert(building.tag()) {
                    debug!("Researching {:?}", upgrade);
                    building.research(upgrade, false);
                }
                bot.subtract_upgrade_cost(upgrade);
            }
            None if bot.units.my.structures.of_types(&researchers).is_empty() => {
                self.push_producer(bot_state, &researchers, save_resources);
            }
            None => {}
        }
    }

    fn get_builder(&self, bot: &Bot, pos: Point2, bot_state: &BotState) -> Option<Unit> {
        let result = bot
            .units
            .my
            .workers
            .iter()
            .filter(|u| {
                !(u.is_constructing() || u.is_returning() || u.is_carrying_resource())
                    && Some(u.tag()) != bot_state.scout_tag
            })
            .closest(pos);
        result.cloned()
    }

    fn place_and_build(
        &self,
        bot: &mut Bot,
        bot_state: &BotState,
        unit_type: UnitTypeId,
        near: Point2,
        max_distance: i32,
    ) -> bool {
        let options = PlacementOptions {
            max_distance,
            step: 2,
            random: false,
            addon: false,
        };
        if let Some(location) = bot.find_placement(unit_type, near, options) {
            debug!("Placing a {:?} at {:?}", unit_type, location);
            if let Some(builder) = self.get_builder(bot, location, bot_state) {
                builder.build(unit_type, location, false);
                bot.subtract_resources(unit_type, false);
                return true;
            }
            debug!("Can't find a builder");
        }
        false
    }

    fn build(
        &self,
        bot: &mut Bot,
        bot_state: &mut BotState,
        unit_type: UnitTypeId,
        wanted_amount: usize,
        save_resources: bool,
    ) {
        debug!("Trying to build {:?} {:?}", unit_type, wanted_amount);
        if bot.race_values.gas == unit_type || bot.race_values.rich_gas == unit_type {
            self.build_gas(bot, bot_state);
        } else if bot.race_values.start_townhall == unit_type {
            self.build_expansion(bot, bot_state, unit_type);
        } else if unit_type.is_static_defense() {
            self.build_static_defense(bot, bot_state, unit_type, save_resources);
        } else if unit_type == UnitTypeId::Pylon {
            self.build_pylon(bot, bot_state);
        } else {
            self.build_powered(bot, bot_state, unit_type, save_resources);
        }
    }

    fn main_nexus(bot: &Bot) -> Point2 {
        bot.units
            .my
            .townhalls
            .closest(bot.start_location)
            .map_or(bot.start_location, |f| f.position())
    }

    fn build_pylon(&self, bot: &mut Bot, bot_state: &BotState) {
        let pylons = bot.units.my.structures.of_type(UnitTypeId::Pylon).len();
        let center = Self::main_nexus(bot);
        // Spread pylons around the main so power fields don't overlap much.
        let offset = if pylons == 0 { 6f32 } else { 8f32 + (pylons % 4) as f32 * 2f32 };
        let near = center.towards(bot.game_info.map_center, offset);
        self.place_and_build(bot, bot_state, UnitTypeId::Pylon, near, 15);
    }

    /// Structures that need a power field go next to a ready pylon in the
    /// main.
    fn build_powered(&self, bot: &mut Bot, bot_state: &mut BotState, unit_type: UnitTypeId, save_resources: bool) {
        let center = Self::main_nexus(bot);
        let mut pylons = bot
            .units
            .my
            .structures
            .of_type(UnitTypeId::Pylon)
            .ready()
            .iter()
            .map(|p| p.position())
            .collect::<Vec<_>>();
        pylons.sort_by(|a, b| a.distance(center).total_cmp(&b.distance(center)));
        for pylon in pylons {
            if self.place_and_build(bot, bot_state, unit_type, pylon, PYLON_POWER_RANGE) {
                return;
            }
        }
        if bot.counter().ordered().count(UnitTypeId::Pylon) == 0 {
            debug!("No room for {:?}, asking for a pylon", unit_type);
            bot_state.build_queue.push(
                Command::new_unit(UnitTypeId::Pylon, bot.counter().all().count(UnitTypeId::Pylon) + 1, save_resources),
                false,
                Self::REQUIREMENT_QUEUE_PRIORITY,
            );
        }
    }

    fn build_expansion(&self, bot: &mut Bot, bot_state: &BotState, unit_type: UnitTypeId) {
        if bot_state.spending_focus == SpendingFocus::Army && bot.minerals < 600 {
            return;
        }
        if !bot
            .units
            .my
            .townhalls
            .filter(|u| u.build_progress() < 0.1f32)
            .is_empty()
        {
            return;
        }
        if let Some(expansion_location) = bot
            .expansions
            .iter()
            .filter(|e| {
                e.alliance.is_neutral()
                    && bot.pathing_distance(bot.start_location, e.loc).is_some()
                    && e.geysers.len() > 1
            })
            .map(|e| e.loc)
            .next()
        {
            if let Some(builder) = self.get_builder(bot, expansion_location, bot_state) {
                builder.build(unit_type, expansion_location, false);
                bot.subtract_resources(unit_type, false);
            } else {
                debug!("No builder");
            }
        } else {
            debug!("No expansion location?");
        }
    }

    /// Static defense between the nexus and its minerals. Cannons and
    /// batteries need their own pylon first.
    fn build_static_defense(&self, bot: &mut Bot, bot_state: &mut BotState, unit_type: UnitTypeId, save_resources: bool) {
        let defenses = bot.units.my.all.filter(|unit| unit.type_id() == unit_type);
        let defenseless_halls = bot
            .units
            .my
            .townhalls
            .filter(|u| u.is_ready() && defenses.closer(11f32, u.position()).is_empty());
        let townhall = match defenseless_halls.iter().closest(bot.start_center) {
            Some(townhall) => townhall.clone(),
            None => {
                debug!("No defenseless townhall");
                return;
            }
        };
        let resources = bot.units.resources.closer(9f32, townhall.position());
        let defense_center = match resources.center() {
            Some(center) => center,
            None => {
                debug!("No defense center");
                return;
            }
        };
        let placement_position = townhall
            .position()
            .towards(defense_center, townhall.radius() + 1f32);
        let powered = !bot
            .units
            .my
            .structures
            .of_type(UnitTypeId::Pylon)
            .closer(PYLON_POWER_RANGE as f32, placement_position)
            .is_empty();
        if !powered {
            if bot.counter().ordered().count(UnitTypeId::Pylon) == 0 && bot.can_afford(UnitTypeId::Pylon, false) {
                self.place_and_build(bot, bot_state, UnitTypeId::Pylon, placement_position, 3);
            }
            self.save_unit_resources(bot, bot_state, unit_type, save_resources);
            return;
        }
        let ready = !bot
            .units
            .my
            .structures
            .of_type(UnitTypeId::Pylon)
            .ready()
            .closer(PYLON_POWER_RANGE as f32, placement_position)
            .is_empty();
        if ready {
            self.place_and_build(bot, bot_state, unit_type, placement_position, 3);
        }
    }

    fn build_gas(&self, bot: &mut Bot, bot_state: &BotState) {
        let mut geysers = Units::new();
        for owned_expansion in bot.owned_expansions() {
            if let Some(base_tag) = owned_expansion.base {
                if let Some(base) = bot.units.my.townhalls.get(base_tag) {
                    if base.is_ready() {
                        if let Some(geyser) = bot.find_gas_placement(owned_expansion.loc) {
                            geysers.push(geyser);
                        }
                    }
                }
            }
        }
        if let Some(geyser) = geysers.iter().closest(bot.start_location) {
            if let Some(builder) = self.get_builder(bot, geyser.position(), bot_state) {
                builder.build_gas(geyser.tag(), false);
                bot.subtract_resources(bot.race_values.gas, false);
            }
        }
    }

    fn save_unit_resources(
        &self,
        bot: &mut Bot,
        bot_state: &BotState,
        unit_type: UnitTypeId,
        save_resources: bool,
    ) {
        if !save_resources {
            return;
        }
        if bot_state.spending_focus == SpendingFocus::Army && unit_type.is_structure() {
            return;
        }
        bot.subtract_resources(unit_type, true);
    }
}

impl AIComponent for ProductionManager {
    fn process(&mut self, bot: &mut Bot, bot_state: &mut BotState) {
        self.produce_units(bot, bot_state);
        self.morph_warpgates(bot);
        self.chrono_boost(bot);
        self.cancel_buildings(bot);
    }
}
