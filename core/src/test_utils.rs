use rust_sc2::prelude::*;

use crate::managers::cache_manager::UnitCache;
use crate::managers::cooldown_manager::CooldownTracker;
use crate::micro::{MicroContext, MoveType, TacticalState};
use crate::pathing::{InfluenceMap, Pather};
use crate::snapshot::UnitSnapshot;

/// Open map: everything is pathable and walking is a straight line.
pub struct OpenPather {
    influence: InfluenceMap,
}

impl OpenPather {
    pub fn new(cache: &UnitCache) -> Self {
        Self {
            influence: InfluenceMap::from_cache(cache),
        }
    }
}

impl Pather for OpenPather {
    fn find_weak_influence_ground(&self, target: Point2, radius: f32) -> Point2 {
        self.influence.weakest(target, radius, false, |_| true)
    }

    fn find_weak_influence_ground_blink(&self, target: Point2, radius: f32) -> Point2 {
        self.influence.weakest(target, radius, false, |_| true)
    }

    fn find_weak_influence_air(&self, target: Point2, radius: f32) -> Point2 {
        self.influence.weakest(target, radius, true, |_| true)
    }

    fn find_influence_air_path(&self, start: Point2, target: Point2) -> Point2 {
        self.influence
            .step_towards(start, target, self.influence.path_step(), true, |_| true)
    }

    fn find_path(&self, start: Point2, target: Point2, distance: f32) -> Point2 {
        self.influence
            .step_towards(start, target, distance, false, |_| true)
    }

    fn walk_distance(&self, start: Point2, target: Point2) -> f32 {
        start.distance(target)
    }

    fn is_pathable(&self, _pos: Point2) -> bool {
        true
    }
}

/// Owns everything a `MicroContext` borrows.
pub struct Fixture {
    pub cache: UnitCache,
    pub cooldowns: CooldownTracker,
    pub pather: OpenPather,
    pub tactics: TacticalState,
    pub time: f32,
    pub own_main: Point2,
    pub enemy_main: Point2,
    pub enemy_race: Race,
    pub supply_left: u32,
}

impl Fixture {
    pub fn new(own: Vec<UnitSnapshot>, enemy: Vec<UnitSnapshot>) -> Self {
        let time = 300f32;
        let cache = UnitCache::from_snapshots(own, enemy, time);
        let pather = OpenPather::new(&cache);
        let mut cooldowns = CooldownTracker::default();
        cooldowns.set_time(time);
        Self {
            cache,
            cooldowns,
            pather,
            tactics: TacticalState::new(
                MoveType::Assault,
                Point2::new(0f32, 0f32),
                Point2::new(100f32, 100f32),
            )
            .with_ground_units(true),
            time,
            own_main: Point2::new(-50f32, -50f32),
            enemy_main: Point2::new(100f32, 100f32),
            enemy_race: Race::Terran,
            supply_left: 20,
        }
    }

    pub fn with_tactics(mut self, tactics: TacticalState) -> Self {
        self.tactics = tactics;
        self
    }

    pub fn with_race(mut self, race: Race) -> Self {
        self.enemy_race = race;
        self
    }

    pub fn with_time(mut self, time: f32) -> Self {
        self.time = time;
        self.cooldowns.set_time(time);
        self
    }

    pub fn ready(mut self, tag: u64, abilities: &[AbilityId]) -> Self {
        self.cooldowns.set_available(tag, abilities);
        self
    }

    pub fn context(&self) -> MicroContext {
        MicroContext {
            cache: &self.cache,
            cooldowns: &self.cooldowns,
            pather: &self.pather,
            tactics: &self.tactics,
            time: self.time,
            own_main: self.own_main,
            enemy_main: self.enemy_main,
            enemy_race: self.enemy_race,
            supply_left: self.supply_left,
        }
    }
}
