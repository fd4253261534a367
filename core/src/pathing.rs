use rust_sc2::bot::Bot;
use rust_sc2::prelude::*;

use crate::managers::cache_manager::UnitCache;
use crate::utils::PathingDistance;

/// Map geometry queries the micro controllers depend on.
pub trait Pather {
    /// Least threatened pathable ground point within `radius` of `target`.
    fn find_weak_influence_ground(&self, target: Point2, radius: f32) -> Point2;
    /// Same as the ground search, for a blink destination.
    fn find_weak_influence_ground_blink(&self, target: Point2, radius: f32) -> Point2;
    fn find_weak_influence_air(&self, target: Point2, radius: f32) -> Point2;
    /// Next waypoint of an air path that avoids anti air.
    fn find_influence_air_path(&self, start: Point2, target: Point2) -> Point2;
    /// Point `distance` along a ground path from `start` to `target`.
    fn find_path(&self, start: Point2, target: Point2, distance: f32) -> Point2;
    fn walk_distance(&self, start: Point2, target: Point2) -> f32;
    fn is_pathable(&self, pos: Point2) -> bool;
}

#[derive(Debug, Clone)]
struct Threat {
    position: Point2,
    ground_reach: f32,
    air_reach: f32,
    weight: f32,
}

/// Threat map built from the visible enemy army.
#[derive(Debug, Clone, Default)]
pub struct InfluenceMap {
    threats: Vec<Threat>,
}

impl InfluenceMap {
    const REACH_MARGIN: f32 = 1.5f32;
    const PATH_STEP: f32 = 3f32;

    pub fn from_cache(cache: &UnitCache) -> Self {
        let threats = cache
            .enemy_units()
            .iter()
            .filter(|u| !u.is_snapshot && (u.can_attack_ground() || u.can_attack_air()))
            .map(|u| Threat {
                position: u.position,
                ground_reach: Self::reach(u.ground_range, u.radius),
                air_reach: Self::reach(u.air_range, u.radius),
                weight: u.power.max(0.1f32),
            })
            .collect();
        Self { threats }
    }

    fn reach(range: f32, radius: f32) -> f32 {
        if range > 0f32 {
            range + radius + Self::REACH_MARGIN
        } else {
            0f32
        }
    }

    pub fn influence(&self, pos: Point2, flying: bool) -> f32 {
        self.threats
            .iter()
            .map(|t| {
                let reach = if flying { t.air_reach } else { t.ground_reach };
                let distance = t.position.distance(pos);
                if reach > 0f32 && distance < reach {
                    t.weight * (1f32 + (reach - distance) / reach)
                } else {
                    0f32
                }
            })
            .sum()
    }

    /// Searches a one unit grid around `target` for the least threatened
    /// valid point, preferring points close to `target` on ties.
    pub fn weakest<F>(&self, target: Point2, radius: f32, flying: bool, valid: F) -> Point2
    where
        F: Fn(Point2) -> bool,
    {
        let steps = radius.max(0f32).floor() as i32;
        let mut best = target;
        let mut best_score = f32::MAX;
        for dx in -steps..=steps {
            for dy in -steps..=steps {
                let candidate = Point2::new(target.x + dx as f32, target.y + dy as f32);
                let offset = candidate.distance(target);
                if offset > radius || !valid(candidate) {
                    continue;
                }
                let score = self.influence(candidate, flying) + offset * 0.01f32;
                if score < best_score {
                    best = candidate;
                    best_score = score;
                }
            }
        }
        best
    }

    /// Fans out around the straight line from `start` and picks the least
    /// threatened next step.
    pub fn step_towards<F>(
        &self,
        start: Point2,
        target: Point2,
        distance: f32,
        flying: bool,
        valid: F,
    ) -> Point2
    where
        F: Fn(Point2) -> bool,
    {
        let remaining = start.distance(target);
        if remaining <= distance || remaining < f32::EPSILON {
            return target;
        }
        let direction = (target - start) / remaining;
        let mut best = start.towards(target, distance);
        let mut best_score = f32::MAX;
        for step in -4..=4 {
            let angle = step as f32 * std::f32::consts::PI / 12f32;
            let (sin, cos) = angle.sin_cos();
            let rotated = Point2::new(
                direction.x * cos - direction.y * sin,
                direction.x * sin + direction.y * cos,
            );
            let candidate = start + rotated * distance;
            if !valid(candidate) {
                continue;
            }
            let score = self.influence(candidate, flying) + candidate.distance(target) * 0.05f32;
            if score < best_score {
                best = candidate;
                best_score = score;
            }
        }
        best
    }

    pub fn path_step(&self) -> f32 {
        Self::PATH_STEP
    }
}

/// Game backed pather.
pub struct GamePather<'a> {
    bot: &'a Bot,
    influence: InfluenceMap,
}

impl<'a> GamePather<'a> {
    pub fn new(bot: &'a Bot, cache: &UnitCache) -> Self {
        Self {
            bot,
            influence: InfluenceMap::from_cache(cache),
        }
    }
}

impl<'a> Pather for GamePather<'a> {
    fn find_weak_influence_ground(&self, target: Point2, radius: f32) -> Point2 {
        self.influence
            .weakest(target, radius, false, |p| self.is_pathable(p))
    }

    fn find_weak_influence_ground_blink(&self, target: Point2, radius: f32) -> Point2 {
        self.influence.weakest(target, radius, false, |p| {
            self.is_pathable(p) && self.bot.is_visible(p)
        })
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
            .step_towards(start, target, distance, false, |p| self.is_pathable(p))
    }

    fn walk_distance(&self, start: Point2, target: Point2) -> f32 {
        self.bot
            .pathing_distance(start, target)
            .unwrap_or_else(|| start.distance(target))
    }

    fn is_pathable(&self, pos: Point2) -> bool {
        self.bot.is_pathable(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::UnitSnapshot;

    fn cache_with_marine() -> UnitCache {
        UnitCache::from_snapshots(
            vec![],
            vec![UnitSnapshot::new(10, UnitTypeId::Marine, Point2::new(0f32, 0f32))
                .with_ranges(5f32, 5f32)],
            1f32,
        )
    }

    #[test]
    fn weakest_point_leaves_threat_range() {
        let map = InfluenceMap::from_cache(&cache_with_marine());
        assert!(map.influence(Point2::new(1f32, 0f32), false) > 0f32);
        let safe = map.weakest(Point2::new(4f32, 0f32), 6f32, false, |_| true);
        assert_eq!(map.influence(safe, false), 0f32);
    }

    #[test]
    fn weakest_point_respects_validity() {
        let map = InfluenceMap::default();
        let target = Point2::new(10f32, 10f32);
        let found = map.weakest(target, 3f32, false, |p| p.x > 11.5f32);
        assert!(found.x > 11.5f32);
        assert!(found.distance(target) <= 3f32);
    }

    #[test]
    fn step_reaches_close_target() {
        let map = InfluenceMap::default();
        let start = Point2::new(0f32, 0f32);
        let target = Point2::new(2f32, 0f32);
        assert_eq!(map.step_towards(start, target, 3f32, true, |_| true), target);
        let far = Point2::new(20f32, 0f32);
        let step = map.step_towards(start, far, 3f32, true, |_| true);
        assert!((step.distance(start) - 3f32).abs() < 0.01f32);
    }
}
