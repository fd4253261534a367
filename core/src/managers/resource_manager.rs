use log::debug;
use rust_sc2::bot::Bot;
use rust_sc2::prelude::*;

use crate::command_queue::Command;
use crate::params::*;
use crate::snapshot::UnitSnapshot;
use crate::{AIComponent, BotState, SpendingFocus};

const PYLON_SUPPLY: u32 = 8;
const NEXUS_SUPPLY: u32 = 15;
const MAX_PYLONS: u32 = 25;

/// Economy when our army is the one pushing forward and holds a supply
/// lead, army otherwise.
pub fn spending_focus(
    own: &[UnitSnapshot],
    enemies: &[UnitSnapshot],
    own_start: Point2,
    enemy_start: Point2,
) -> SpendingFocus {
    let fighters = |u: &&UnitSnapshot| !u.is_structure && !u.is_worker() && (u.can_attack_ground() || u.can_attack_air());
    let advanced_units = own
        .iter()
        .filter(fighters)
        .any(|u| u.is_closer(u.distance(own_start) / 2f32, enemy_start));
    let advanced_enemy_units = enemies
        .iter()
        .filter(fighters)
        .any(|u| u.is_closer(u.distance(enemy_start) * 2f32, own_start));
    let enemy_supply = enemies.iter().filter(fighters).map(|u| u.supply).sum::<f32>();
    let our_supply = own.iter().filter(fighters).map(|u| u.supply).sum::<f32>();
    if advanced_units && !advanced_enemy_units && our_supply >= enemy_supply {
        SpendingFocus::Economy
    } else {
        SpendingFocus::Army
    }
}

/// Pylons needed to stay ahead of the supply used, counting what the nexuses
/// provide.
pub fn wanted_pylons(supply_used: u32, nexuses: u32) -> usize {
    let wanted_cap = supply_used + 4 + supply_used / 8;
    let missing = wanted_cap.saturating_sub(nexuses * NEXUS_SUPPLY);
    ((missing + PYLON_SUPPLY - 1) / PYLON_SUPPLY).min(MAX_PYLONS) as usize
}

#[derive(Default)]
pub struct ResourceManager {}

impl ResourceManager {
    fn spending_decision(&mut self, bot: &Bot, bot_state: &mut BotState) {
        bot_state.spending_focus = spending_focus(
            bot_state.cache.own_units(),
            bot_state.cache.remembered_enemies(),
            bot.start_location,
            bot.enemy_start,
        );
        debug!("Decision {:?}", bot_state.spending_focus);
    }

    fn order_supply(&self, bot: &mut Bot, bot_state: &mut BotState) {
        if bot.supply_cap >= 200 || bot.supply_used < AUTO_SUPPLY_START {
            return;
        }
        let nexuses = bot.units.my.townhalls.ready().len() as u32;
        bot_state.build_queue.push(
            Command::new_unit(UnitTypeId::Pylon, wanted_pylons(bot.supply_used, nexuses), false),
            true,
            900,
        );
    }

    fn order_expansion(&self, bot: &mut Bot, bot_state: &mut BotState) {
        if bot
            .counter()
            .ordered()
            .count(bot.race_values.start_townhall)
            != 0
        {
            return;
        }
        let bases = bot.units.my.townhalls.clone();
        let ideal_harvesters = bases.sum(|x| x.ideal_harvesters().unwrap_or_default());
        let current_harvesters = bases.sum(|x| x.assigned_harvesters().unwrap_or_default())
            + bot.units.my.workers.idle().len() as u32;
        if ideal_harvesters < 64
            && (current_harvesters >= ideal_harvesters * 15 / 16 || bot.minerals > 1_000)
        {
            bot_state.build_queue.push(
                Command::new_unit(
                    bot.race_values.start_townhall,
                    bot.counter().all().count(bot.race_values.start_townhall) + 1,
                    true,
                ),
                false,
                200,
            );
        }
    }

    fn order_geysers(&self, bot: &mut Bot, bot_state: &mut BotState) {
        let assimilator = bot.race_values.gas;
        let probes = bot.counter().all().count(UnitTypeId::Probe);
        let wanted_assimilators = if probes < 35 {
            1.max(probes / 16)
        } else {
            bot.owned_expansions().count() * 2
        };
        bot_state.build_queue.push(
            Command::new_unit(assimilator, wanted_assimilators, false),
            false,
            5,
        );
    }
}

impl AIComponent for ResourceManager {
    fn process(&mut self, bot: &mut Bot, bot_state: &mut BotState) {
        self.spending_decision(bot, bot_state);
        self.order_supply(bot, bot_state);
        // The opening handles the first bases on its own.
        if bot.time >= ECONOMY_TAKEOVER_TIME {
            self.order_expansion(bot, bot_state);
            self.order_geysers(bot, bot_state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWN_START: Point2 = Point2 { x: 20f32, y: 20f32 };
    const ENEMY_START: Point2 = Point2 { x: 120f32, y: 120f32 };

    fn zealot(tag: u64, x: f32) -> UnitSnapshot {
        UnitSnapshot::new(tag, UnitTypeId::Zealot, Point2::new(x, x))
            .with_ranges(0.1f32, 0f32)
            .with_supply(2f32)
    }

    #[test]
    fn pylons_follow_supply_used() {
        assert_eq!(wanted_pylons(14, 1), 1);
        assert_eq!(wanted_pylons(30, 1), 3);
        assert_eq!(wanted_pylons(10, 1), 0);
        assert_eq!(wanted_pylons(200, 1), MAX_PYLONS as usize);
    }

    #[test]
    fn extra_nexuses_reduce_needed_pylons() {
        assert!(wanted_pylons(60, 3) < wanted_pylons(60, 1));
    }

    #[test]
    fn pushing_army_with_a_lead_spends_on_economy() {
        let own = vec![zealot(1, 100f32), zealot(2, 100f32)];
        let enemies = vec![zealot(10, 110f32)];
        assert_eq!(spending_focus(&own, &enemies, OWN_START, ENEMY_START), SpendingFocus::Economy);
    }

    #[test]
    fn enemy_near_our_base_forces_army() {
        let own = vec![zealot(1, 100f32), zealot(2, 100f32)];
        let enemies = vec![zealot(10, 25f32)];
        assert_eq!(spending_focus(&own, &enemies, OWN_START, ENEMY_START), SpendingFocus::Army);
        assert_eq!(spending_focus(&[], &[], OWN_START, ENEMY_START), SpendingFocus::Army);
    }
}
