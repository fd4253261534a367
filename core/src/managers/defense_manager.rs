use rust_sc2::bot::Bot;
use rust_sc2::prelude::*;

use crate::command_queue::Command;
use crate::managers::cache_manager::UnitCache;
use crate::{AIComponent, BotState};

const CANNON_UNITS: [UnitTypeId; 8] = [
    UnitTypeId::Banshee,
    UnitTypeId::Battlecruiser,
    UnitTypeId::Oracle,
    UnitTypeId::VoidRay,
    UnitTypeId::Carrier,
    UnitTypeId::Mutalisk,
    UnitTypeId::DarkTemplar,
    UnitTypeId::LurkerMP,
];

const CLOAKED_UNITS: [UnitTypeId; 6] = [
    UnitTypeId::Banshee,
    UnitTypeId::DarkTemplar,
    UnitTypeId::LurkerMP,
    UnitTypeId::LurkerMPBurrowed,
    UnitTypeId::Observer,
    UnitTypeId::WidowMine,
];

/// Cannons per base against air harass and cloaked units.
pub fn wanted_cannons(cache: &UnitCache, bases: usize) -> usize {
    if cache.enemy_count(&CANNON_UNITS) > 0 {
        bases
    } else {
        0
    }
}

/// One observer per cloaked unit type seen, plus a spare.
pub fn wanted_observers(cache: &UnitCache) -> usize {
    let cloaked_types = CLOAKED_UNITS
        .iter()
        .filter(|t| cache.enemy_count(&[**t]) > 0)
        .count();
    if cloaked_types == 0 {
        0
    } else {
        cloaked_types + 1
    }
}

#[derive(Default)]
pub struct DefenseManager {}

impl DefenseManager {
    pub fn queue_defense(&self, bot: &mut Bot, bot_state: &mut BotState) {
        let cannons = wanted_cannons(&bot_state.cache, bot.units.my.townhalls.ready().len());
        if cannons > 0 {
            bot_state.build_queue.push(
                Command::new_unit(UnitTypeId::PhotonCannon, cannons, true),
                false,
                210,
            );
        }
        let observers = wanted_observers(&bot_state.cache);
        if observers > 0 {
            bot_state.build_queue.push(
                Command::new_unit(UnitTypeId::Observer, observers, true),
                false,
                500,
            );
        }
    }
}

impl AIComponent for DefenseManager {
    fn process(&mut self, bot: &mut Bot, bot_state: &mut BotState) {
        self.queue_defense(bot, bot_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::UnitSnapshot;

    fn cache(enemy: Vec<UnitSnapshot>) -> UnitCache {
        UnitCache::from_snapshots(vec![], enemy, 200f32)
    }

    #[test]
    fn air_harass_asks_for_cannons_at_every_base() {
        let oracle = UnitSnapshot::new(1, UnitTypeId::Oracle, Point2::new(50f32, 50f32)).flying();
        assert_eq!(wanted_cannons(&cache(vec![oracle]), 3), 3);
        let zealot = UnitSnapshot::new(2, UnitTypeId::Zealot, Point2::new(50f32, 50f32));
        assert_eq!(wanted_cannons(&cache(vec![zealot]), 3), 0);
    }

    #[test]
    fn cloaked_units_ask_for_observers() {
        assert_eq!(wanted_observers(&cache(vec![])), 0);
        let dt = UnitSnapshot::new(1, UnitTypeId::DarkTemplar, Point2::new(50f32, 50f32)).cloaked(false);
        assert_eq!(wanted_observers(&cache(vec![dt])), 2);
    }
}
