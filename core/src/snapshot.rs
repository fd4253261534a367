use rust_sc2::bot::Bot;
use rust_sc2::prelude::*;

use crate::params::GAME_LOOPS_PER_SECOND;

/// Per tick copy of the unit attributes the decision code reads.
///
/// Everything in the knowledge and micro layers works on these instead of the
/// live game `Unit`, so the same code runs on game data and on synthetic test
/// fixtures.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSnapshot {
    pub tag: u64,
    pub type_id: UnitTypeId,
    pub position: Point2,
    pub health: f32,
    pub health_max: f32,
    pub shield: f32,
    pub shield_max: f32,
    pub energy: f32,
    pub energy_max: f32,
    pub weapon_cooldown: f32,
    pub build_progress: f32,
    /// Build time in seconds.
    pub build_time: f32,
    pub radius: f32,
    pub speed: f32,
    pub is_flying: bool,
    pub is_structure: bool,
    pub is_snapshot: bool,
    pub is_cloaked: bool,
    pub is_revealed: bool,
    pub is_light: bool,
    pub is_armored: bool,
    pub is_hallucination: bool,
    pub ground_range: f32,
    pub air_range: f32,
    pub detect_range: f32,
    pub power: f32,
    pub supply: f32,
    pub buffs: Vec<BuffId>,
    pub order: Option<AbilityId>,
    pub order_target: Target,
    pub cargo_used: u32,
    pub cargo_max: u32,
    pub cargo_size: u32,
    pub passengers: Vec<u64>,
}

impl UnitSnapshot {
    pub fn new(tag: u64, type_id: UnitTypeId, position: Point2) -> Self {
        Self {
            tag,
            type_id,
            position,
            health: 100f32,
            health_max: 100f32,
            shield: 0f32,
            shield_max: 0f32,
            energy: 0f32,
            energy_max: 0f32,
            weapon_cooldown: 0f32,
            build_progress: 1f32,
            build_time: 0f32,
            radius: 0.5f32,
            speed: 2.5f32,
            is_flying: false,
            is_structure: false,
            is_snapshot: false,
            is_cloaked: false,
            is_revealed: false,
            is_light: false,
            is_armored: false,
            is_hallucination: false,
            ground_range: 0f32,
            air_range: 0f32,
            detect_range: 0f32,
            power: 1f32,
            supply: 0f32,
            buffs: vec![],
            order: None,
            order_target: Target::None,
            cargo_used: 0,
            cargo_max: 0,
            cargo_size: 1,
            passengers: vec![],
        }
    }

    pub fn from_unit(unit: &Unit, bot: &Bot) -> Self {
        let type_data = bot.game_data.units.get(&unit.type_id());
        let cost = unit.cost();
        let hits_percentage = unit.hits_percentage().unwrap_or(1f32);
        Self {
            tag: unit.tag(),
            type_id: unit.type_id(),
            position: unit.position(),
            health: unit.health().unwrap_or_default() as f32,
            health_max: unit.health_max().unwrap_or_default() as f32,
            shield: unit.shield().unwrap_or_default() as f32,
            shield_max: unit.shield_max().unwrap_or_default() as f32,
            energy: unit.energy().unwrap_or_default() as f32,
            energy_max: unit.energy_max().unwrap_or_default() as f32,
            weapon_cooldown: unit.weapon_cooldown().unwrap_or_default(),
            build_progress: unit.build_progress(),
            build_time: type_data.map_or(0f32, |data| data.build_time / GAME_LOOPS_PER_SECOND),
            radius: unit.radius(),
            speed: unit.speed(),
            is_flying: unit.is_flying(),
            is_structure: unit.is_structure(),
            is_snapshot: unit.is_snapshot(),
            is_cloaked: unit.is_cloaked(),
            is_revealed: unit.is_revealed(),
            is_light: unit.is_light(),
            is_armored: unit.is_armored(),
            is_hallucination: unit.is_hallucination(),
            ground_range: if unit.can_attack_ground() {
                unit.ground_range()
            } else {
                0f32
            },
            air_range: if unit.can_attack_air() {
                unit.air_range()
            } else {
                0f32
            },
            detect_range: if unit.is_detector() {
                unit.detect_range()
            } else {
                0f32
            },
            power: (cost.minerals + cost.vespene) as f32 / 100f32 * hits_percentage,
            supply: unit.supply_cost(),
            buffs: unit.buffs().iter().copied().collect(),
            order: unit.ordered_ability(),
            order_target: unit.target(),
            cargo_used: unit.cargo_space_taken().unwrap_or_default(),
            cargo_max: unit.cargo_space_max().unwrap_or_default(),
            cargo_size: unit.cargo_size(),
            passengers: unit.passengers().iter().map(|p| p.tag).collect(),
        }
    }

    pub fn with_health(mut self, health: f32, health_max: f32) -> Self {
        self.health = health;
        self.health_max = health_max;
        self
    }

    pub fn with_shield(mut self, shield: f32, shield_max: f32) -> Self {
        self.shield = shield;
        self.shield_max = shield_max;
        self
    }

    pub fn with_energy(mut self, energy: f32) -> Self {
        self.energy = energy;
        self.energy_max = self.energy_max.max(200f32);
        self
    }

    pub fn with_progress(mut self, build_progress: f32, build_time: f32) -> Self {
        self.build_progress = build_progress;
        self.build_time = build_time;
        self
    }

    pub fn with_ranges(mut self, ground_range: f32, air_range: f32) -> Self {
        self.ground_range = ground_range;
        self.air_range = air_range;
        self
    }

    pub fn with_weapon_cooldown(mut self, cooldown: f32) -> Self {
        self.weapon_cooldown = cooldown;
        self
    }

    pub fn with_order(mut self, ability: AbilityId, target: Target) -> Self {
        self.order = Some(ability);
        self.order_target = target;
        self
    }

    pub fn with_cargo(mut self, used: u32, max: u32) -> Self {
        self.cargo_used = used;
        self.cargo_max = max;
        self
    }

    pub fn with_passenger(mut self, tag: u64, size: u32) -> Self {
        self.passengers.push(tag);
        self.cargo_used += size;
        self
    }

    pub fn with_cargo_size(mut self, size: u32) -> Self {
        self.cargo_size = size;
        self
    }

    pub fn with_detect_range(mut self, range: f32) -> Self {
        self.detect_range = range;
        self
    }

    pub fn with_power(mut self, power: f32) -> Self {
        self.power = power;
        self
    }

    pub fn with_supply(mut self, supply: f32) -> Self {
        self.supply = supply;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn structure(mut self) -> Self {
        self.is_structure = true;
        self.speed = 0f32;
        self
    }

    pub fn flying(mut self) -> Self {
        self.is_flying = true;
        self
    }

    pub fn light(mut self) -> Self {
        self.is_light = true;
        self
    }

    pub fn armored(mut self) -> Self {
        self.is_armored = true;
        self
    }

    pub fn cloaked(mut self, revealed: bool) -> Self {
        self.is_cloaked = true;
        self.is_revealed = revealed;
        self
    }

    pub fn snapshot(mut self) -> Self {
        self.is_snapshot = true;
        self
    }

    pub fn distance(&self, pos: Point2) -> f32 {
        self.position.distance(pos)
    }

    pub fn is_closer(&self, range: f32, pos: Point2) -> bool {
        self.distance(pos) < range
    }

    pub fn is_ready(&self) -> bool {
        self.build_progress >= 1f32
    }

    pub fn is_worker(&self) -> bool {
        self.type_id.is_worker() || self.type_id == UnitTypeId::MULE
    }

    pub fn is_detector(&self) -> bool {
        self.detect_range > 0f32
    }

    pub fn can_attack_ground(&self) -> bool {
        self.ground_range > 0f32
    }

    pub fn can_attack_air(&self) -> bool {
        self.air_range > 0f32
    }

    pub fn can_attack(&self, other: &UnitSnapshot) -> bool {
        if other.is_flying {
            self.can_attack_air()
        } else {
            self.can_attack_ground()
        }
    }

    pub fn range_vs(&self, other: &UnitSnapshot) -> f32 {
        if other.is_flying {
            self.air_range
        } else {
            self.ground_range
        }
    }

    /// Weapon range including both radii, measured center to center.
    pub fn real_range_vs(&self, other: &UnitSnapshot) -> f32 {
        let range = self.range_vs(other);
        if range <= 0f32 {
            0f32
        } else {
            range + self.radius + other.radius
        }
    }

    pub fn has_buff(&self, buff: BuffId) -> bool {
        self.buffs.contains(&buff)
    }

    pub fn is_using(&self, ability: AbilityId) -> bool {
        self.order == Some(ability)
    }

    /// Cloaked and not detected, so it can't be targeted.
    pub fn is_hidden(&self) -> bool {
        self.is_cloaked && !self.is_revealed
    }

    pub fn health_percentage(&self) -> f32 {
        if self.health_max > 0f32 {
            self.health / self.health_max
        } else {
            1f32
        }
    }

    pub fn shield_percentage(&self) -> f32 {
        if self.shield_max > 0f32 {
            self.shield / self.shield_max
        } else {
            0f32
        }
    }

    pub fn shield_health_percentage(&self) -> f32 {
        let max = self.health_max + self.shield_max;
        if max > 0f32 {
            (self.health + self.shield) / max
        } else {
            1f32
        }
    }

    pub fn energy_percentage(&self) -> f32 {
        if self.energy_max > 0f32 {
            self.energy / self.energy_max
        } else {
            0f32
        }
    }

    pub fn cargo_left(&self) -> u32 {
        self.cargo_max.saturating_sub(self.cargo_used)
    }
}

impl Distance for &UnitSnapshot {
    fn distance_squared<P: Into<Point2>>(self, other: P) -> f32 {
        self.position.distance_squared(other)
    }
}
