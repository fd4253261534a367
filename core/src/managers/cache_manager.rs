use std::collections::HashMap;

use log::debug;
use rust_sc2::bot::Bot;
use rust_sc2::game_state::Alliance;
use rust_sc2::prelude::*;
use rust_sc2::Event::UnitDestroyed;

use crate::params::*;
use crate::snapshot::UnitSnapshot;
use crate::{AIComponent, BotState};

/// Spatial and temporal query surface over our units and what we know about
/// the enemy.
///
/// Visible enemies are refreshed every tick. Everything ever seen stays in the
/// enemy memory until it times out: units fade out of memory after a while in
/// the fog, structures stay until we get vision of their spot without seeing
/// them.
#[derive(Default)]
pub struct UnitCache {
    own: Vec<UnitSnapshot>,
    enemy: Vec<UnitSnapshot>,
    memory: HashMap<u64, CacheEntry>,
    remembered: Vec<UnitSnapshot>,
    scans: Vec<(Point2, f32)>,
    time: f32,
}

#[derive(Clone)]
struct CacheEntry {
    unit: UnitSnapshot,
    last_seen: f32,
}

impl UnitCache {
    pub fn from_snapshots(own: Vec<UnitSnapshot>, enemy: Vec<UnitSnapshot>, time: f32) -> Self {
        let mut cache = Self::default();
        cache.store(own, enemy, vec![], time, |_| true);
        cache
    }

    /// Replaces the current view and ages the enemy memory.
    pub fn store<F>(
        &mut self,
        mut own: Vec<UnitSnapshot>,
        mut enemy: Vec<UnitSnapshot>,
        scans: Vec<(Point2, f32)>,
        time: f32,
        is_visible: F,
    ) where
        F: Fn(Point2) -> bool,
    {
        own.sort_by_key(|u| u.tag);
        enemy.sort_by_key(|u| u.tag);
        for unit in enemy.iter().filter(|u| !u.is_hallucination) {
            if !self.memory.contains_key(&unit.tag) {
                debug!(
                    "Found a new enemy {:?} {:?} ({:?})",
                    unit.type_id, unit.tag, unit.position
                );
            }
            self.memory.insert(
                unit.tag,
                CacheEntry {
                    unit: unit.clone(),
                    last_seen: time,
                },
            );
        }
        self.memory.retain(|_, entry| {
            let retention = if entry.unit.is_using(AbilityId::EffectTacticalJump) {
                TACTICAL_JUMP_CACHE_TIME
            } else if own
                .iter()
                .any(|d| d.is_detector() && d.distance(entry.unit.position) < d.detect_range)
            {
                ON_DETECTION_CACHE_TIME
            } else if is_visible(entry.unit.position) {
                VISIBLE_AREA_CACHE_TIME
            } else if entry.unit.is_structure {
                f32::MAX
            } else {
                FOG_AREA_CACHE_TIME
            };
            entry.last_seen + retention > time || entry.last_seen == time
        });
        self.remembered = self.memory.values().map(|e| e.unit.clone()).collect();
        self.remembered.sort_by_key(|u| u.tag);
        self.own = own;
        self.enemy = enemy;
        self.scans = scans;
        self.time = time;
    }

    pub fn destroy_unit(&mut self, tag: u64) {
        if self.memory.remove(&tag).is_some() {
            debug!("Unit [{tag:?}] destroyed");
        }
        self.remembered.retain(|u| u.tag != tag);
        self.enemy.retain(|u| u.tag != tag);
        self.own.retain(|u| u.tag != tag);
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn own_units(&self) -> &[UnitSnapshot] {
        &self.own
    }

    /// Enemies visible this tick, sorted by tag.
    pub fn enemy_units(&self) -> &[UnitSnapshot] {
        &self.enemy
    }

    /// Enemies seen recently, including the ones currently in the fog.
    pub fn remembered_enemies(&self) -> &[UnitSnapshot] {
        &self.remembered
    }

    pub fn scans(&self) -> &[(Point2, f32)] {
        &self.scans
    }

    pub fn by_tag(&self, tag: u64) -> Option<&UnitSnapshot> {
        self.own_by_tag(tag).or_else(|| self.enemy_by_tag(tag))
    }

    pub fn own_by_tag(&self, tag: u64) -> Option<&UnitSnapshot> {
        self.own
            .binary_search_by_key(&tag, |u| u.tag)
            .ok()
            .map(|index| &self.own[index])
    }

    pub fn enemy_by_tag(&self, tag: u64) -> Option<&UnitSnapshot> {
        self.enemy
            .binary_search_by_key(&tag, |u| u.tag)
            .ok()
            .map(|index| &self.enemy[index])
    }

    pub fn own_in_range(&self, pos: Point2, range: f32) -> Vec<&UnitSnapshot> {
        self.own.iter().filter(|u| u.is_closer(range, pos)).collect()
    }

    /// Visible enemies within range, snapshots excluded.
    pub fn enemy_in_range(&self, pos: Point2, range: f32) -> Vec<&UnitSnapshot> {
        self.enemy
            .iter()
            .filter(|u| !u.is_snapshot && u.is_closer(range, pos))
            .collect()
    }

    pub fn own_of_type(&self, unit_type: UnitTypeId) -> Vec<&UnitSnapshot> {
        self.own.iter().filter(|u| u.type_id == unit_type).collect()
    }

    pub fn own_of_types(&self, unit_types: &[UnitTypeId]) -> Vec<&UnitSnapshot> {
        self.own
            .iter()
            .filter(|u| unit_types.contains(&u.type_id))
            .collect()
    }

    pub fn enemy_of_types(&self, unit_types: &[UnitTypeId]) -> Vec<&UnitSnapshot> {
        self.remembered
            .iter()
            .filter(|u| unit_types.contains(&u.type_id))
            .collect()
    }

    pub fn enemy_count(&self, unit_types: &[UnitTypeId]) -> usize {
        self.enemy_of_types(unit_types).len()
    }

    pub fn enemy_ready_count(&self, unit_types: &[UnitTypeId]) -> usize {
        self.remembered
            .iter()
            .filter(|u| u.is_ready() && unit_types.contains(&u.type_id))
            .count()
    }

    pub fn known_enemy_workers(&self) -> Vec<&UnitSnapshot> {
        self.remembered.iter().filter(|u| u.is_worker()).collect()
    }

    pub fn enemy_structures(&self) -> Vec<&UnitSnapshot> {
        self.remembered.iter().filter(|u| u.is_structure).collect()
    }

    /// Checks whether `pos` is covered by enemy detection, shrinking every
    /// detector's radius by `margin`.
    pub fn is_detected(&self, pos: Point2, margin: f32) -> bool {
        self.enemy
            .iter()
            .any(|u| u.is_detector() && u.detect_range - margin > u.distance(pos))
            || self
                .scans
                .iter()
                .any(|(center, radius)| center.distance(pos) < *radius)
    }

    /// Summed power of visible enemies that can hit a ground or air unit at
    /// `pos`.
    pub fn danger_at(&self, pos: Point2, flying: bool) -> f32 {
        self.enemy
            .iter()
            .filter(|u| !u.is_snapshot)
            .map(|u| {
                let range = if flying { u.air_range } else { u.ground_range };
                if range > 0f32 && u.distance(pos) < range + u.radius + 2f32 {
                    u.power
                } else {
                    0f32
                }
            })
            .sum()
    }
}

/// Refreshes the unit cache from the game and tracks ability availability.
#[derive(Default)]
pub struct CacheManager {}

impl CacheManager {
    fn refresh(&self, bot: &Bot, bot_state: &mut BotState) {
        let own = bot
            .units
            .my
            .all
            .iter()
            .map(|u| UnitSnapshot::from_unit(u, bot))
            .collect::<Vec<_>>();
        let enemy = bot
            .units
            .enemy
            .all
            .iter()
            .map(|u| UnitSnapshot::from_unit(u, bot))
            .collect::<Vec<_>>();
        let scans = bot
            .state
            .observation
            .raw
            .effects
            .iter()
            .filter(|e| e.id == EffectId::ScannerSweep && e.alliance == Alliance::Enemy)
            .flat_map(|e| e.positions.iter().map(move |p| (*p, e.radius)))
            .collect::<Vec<_>>();
        bot_state
            .cache
            .store(own, enemy, scans, bot.time, |p| bot.is_visible(p));
        bot_state.cooldowns.refresh(bot);
    }
}

impl AIComponent for CacheManager {
    fn process(&mut self, bot: &mut Bot, bot_state: &mut BotState) {
        self.refresh(bot, bot_state);
    }

    fn on_event(&mut self, event: &Event, bot_state: &mut BotState) {
        if let UnitDestroyed(tag, _) = event {
            bot_state.cache.destroy_unit(*tag);
            bot_state.cooldowns.forget(*tag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f32, y: f32) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn range_queries_filter_snapshots() {
        let cache = UnitCache::from_snapshots(
            vec![UnitSnapshot::new(1, UnitTypeId::Stalker, point(0f32, 0f32))],
            vec![
                UnitSnapshot::new(10, UnitTypeId::Marine, point(3f32, 0f32)),
                UnitSnapshot::new(11, UnitTypeId::Marine, point(4f32, 0f32)).snapshot(),
                UnitSnapshot::new(12, UnitTypeId::Marine, point(30f32, 0f32)),
            ],
            10f32,
        );
        let in_range = cache.enemy_in_range(point(0f32, 0f32), 10f32);
        assert_eq!(in_range.len(), 1);
        assert_eq!(in_range[0].tag, 10);
        assert_eq!(cache.own_in_range(point(1f32, 0f32), 2f32).len(), 1);
        assert_eq!(cache.by_tag(12).map(|u| u.type_id), Some(UnitTypeId::Marine));
    }

    #[test]
    fn units_fade_from_memory() {
        let mut cache = UnitCache::default();
        let marine = UnitSnapshot::new(10, UnitTypeId::Marine, point(3f32, 0f32));
        let barracks = UnitSnapshot::new(11, UnitTypeId::Barracks, point(20f32, 0f32)).structure();
        cache.store(vec![], vec![marine, barracks], vec![], 10f32, |_| false);
        cache.store(vec![], vec![], vec![], 50f32, |_| false);
        assert_eq!(cache.remembered_enemies().len(), 2);
        assert!(cache.enemy_units().is_empty());
        cache.store(vec![], vec![], vec![], 80f32, |_| false);
        assert_eq!(cache.remembered_enemies().len(), 1);
        assert_eq!(cache.enemy_count(&[UnitTypeId::Barracks]), 1);
        cache.store(vec![], vec![], vec![], 81f32, |_| true);
        assert!(cache.remembered_enemies().is_empty());
    }

    #[test]
    fn detection_checks_detectors_and_scans() {
        let mut cache = UnitCache::default();
        let turret = UnitSnapshot::new(20, UnitTypeId::MissileTurret, point(0f32, 0f32))
            .structure()
            .with_detect_range(11f32);
        cache.store(
            vec![],
            vec![turret],
            vec![(point(50f32, 50f32), 13f32)],
            10f32,
            |_| true,
        );
        assert!(cache.is_detected(point(9f32, 0f32), 1f32));
        assert!(!cache.is_detected(point(10.5f32, 0f32), 1f32));
        assert!(cache.is_detected(point(55f32, 50f32), 0f32));
    }

    #[test]
    fn units_under_our_detection_fade_quickly() {
        let mut cache = UnitCache::default();
        let observer = || {
            UnitSnapshot::new(1, UnitTypeId::Observer, point(0f32, 0f32)).with_detect_range(11f32)
        };
        let dark_templar = UnitSnapshot::new(20, UnitTypeId::DarkTemplar, point(3f32, 0f32));
        cache.store(vec![observer()], vec![dark_templar], vec![], 10f32, |_| false);
        cache.store(vec![observer()], vec![], vec![], 10.5f32, |_| false);
        assert_eq!(cache.remembered_enemies().len(), 1);
        cache.store(vec![observer()], vec![], vec![], 11.5f32, |_| false);
        assert!(cache.remembered_enemies().is_empty());
    }

    #[test]
    fn destroyed_units_are_forgotten() {
        let mut cache = UnitCache::from_snapshots(
            vec![],
            vec![UnitSnapshot::new(10, UnitTypeId::Probe, point(3f32, 0f32))],
            10f32,
        );
        assert_eq!(cache.known_enemy_workers().len(), 1);
        cache.destroy_unit(10);
        assert!(cache.known_enemy_workers().is_empty());
        assert!(cache.enemy_by_tag(10).is_none());
    }
}
