use std::collections::{HashMap, HashSet};

use log::debug;
use rust_sc2::bot::Bot;
use rust_sc2::prelude::*;

const TRACKED_ABILITIES: [AbilityId; 11] = [
    AbilityId::EffectBlinkStalker,
    AbilityId::GravitonBeamGravitonBeam,
    AbilityId::FeedbackFeedback,
    AbilityId::PsiStormPsiStorm,
    AbilityId::EffectPurificationNova,
    AbilityId::EffectTimeWarp,
    AbilityId::AdeptPhaseShiftAdeptPhaseShift,
    AbilityId::MorphWarpPrismPhasingMode,
    AbilityId::MorphWarpPrismTransportMode,
    AbilityId::WarpGateTrainDarkTemplar,
    AbilityId::WarpGateTrainZealot,
];

const SHADE_LINK_DISTANCE: f32 = 2f32;

/// Readiness and last use of abilities per unit, plus which shade belongs to
/// which adept.
#[derive(Default)]
pub struct CooldownTracker {
    available: HashMap<u64, HashSet<AbilityId>>,
    last_used: HashMap<(u64, AbilityId), f32>,
    last_used_any: HashMap<u64, f32>,
    shades: HashMap<u64, u64>,
    time: f32,
}

impl CooldownTracker {
    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    pub fn set_available(&mut self, tag: u64, abilities: &[AbilityId]) {
        self.available
            .insert(tag, abilities.iter().copied().collect::<HashSet<_>>());
    }

    /// The game reports the ability as castable right now.
    pub fn is_ready(&self, tag: u64, ability: AbilityId) -> bool {
        self.available
            .get(&tag)
            .map_or(false, |abilities| abilities.contains(&ability))
    }

    /// At least `seconds` passed since we last issued `ability` for this unit.
    pub fn is_ready_after(&self, tag: u64, ability: AbilityId, seconds: f32) -> bool {
        self.last_used
            .get(&(tag, ability))
            .map_or(true, |used| self.time - used >= seconds)
    }

    pub fn used_ability(&mut self, tag: u64, ability: AbilityId) {
        debug!("[{tag:?}] used {ability:?} at {:.1}", self.time);
        self.last_used.insert((tag, ability), self.time);
        self.last_used_any.insert(tag, self.time);
        if let Some(abilities) = self.available.get_mut(&tag) {
            abilities.remove(&ability);
        }
    }

    pub fn last_used(&self, tag: u64, ability: AbilityId) -> Option<f32> {
        self.last_used.get(&(tag, ability)).copied()
    }

    pub fn last_used_any(&self, tag: u64) -> Option<f32> {
        self.last_used_any.get(&tag).copied()
    }

    pub fn link_shade(&mut self, adept: u64, shade: u64) {
        self.shades.insert(adept, shade);
    }

    pub fn shade_of(&self, adept: u64) -> Option<u64> {
        self.shades.get(&adept).copied()
    }

    pub fn forget(&mut self, tag: u64) {
        self.available.remove(&tag);
        self.last_used_any.remove(&tag);
        self.last_used.retain(|(unit, _), _| *unit != tag);
        self.shades.retain(|adept, shade| *adept != tag && *shade != tag);
    }

    /// Links fresh shades to the adept they spawned from, dropping links to
    /// shades that expired.
    pub fn link_shades(&mut self, adepts: &[(u64, Point2)], shades: &[(u64, Point2)]) {
        self.shades
            .retain(|_, shade| shades.iter().any(|(tag, _)| tag == shade));
        for (shade, shade_pos) in shades {
            if self.shades.values().any(|linked| linked == shade) {
                continue;
            }
            let owner = adepts
                .iter()
                .filter(|(adept, pos)| {
                    !self.shades.contains_key(adept) && pos.distance(*shade_pos) < SHADE_LINK_DISTANCE
                })
                .min_by(|(_, a), (_, b)| {
                    a.distance(*shade_pos)
                        .partial_cmp(&b.distance(*shade_pos))
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            if let Some((adept, _)) = owner {
                self.shades.insert(*adept, *shade);
            }
        }
    }

    pub fn refresh(&mut self, bot: &Bot) {
        self.time = bot.time;
        self.available.clear();
        for unit in bot.units.my.units.iter() {
            let abilities = TRACKED_ABILITIES
                .iter()
                .filter(|a| unit.has_ability(**a))
                .copied()
                .collect::<HashSet<_>>();
            if !abilities.is_empty() {
                self.available.insert(unit.tag(), abilities);
            }
        }
        let adepts = bot
            .units
            .my
            .units
            .of_type(UnitTypeId::Adept)
            .iter()
            .map(|u| (u.tag(), u.position()))
            .collect::<Vec<_>>();
        let shades = bot
            .units
            .my
            .units
            .of_type(UnitTypeId::AdeptPhaseShift)
            .iter()
            .map(|u| (u.tag(), u.position()))
            .collect::<Vec<_>>();
        self.link_shades(&adepts, &shades);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_ready_after_interval() {
        let mut tracker = CooldownTracker::default();
        tracker.set_time(10f32);
        tracker.set_available(1, &[AbilityId::EffectPurificationNova]);
        assert!(tracker.is_ready(1, AbilityId::EffectPurificationNova));
        tracker.used_ability(1, AbilityId::EffectPurificationNova);
        assert!(!tracker.is_ready(1, AbilityId::EffectPurificationNova));
        tracker.set_time(11f32);
        assert!(!tracker.is_ready_after(1, AbilityId::EffectPurificationNova, 2.2f32));
        tracker.set_time(12.5f32);
        assert!(tracker.is_ready_after(1, AbilityId::EffectPurificationNova, 2.2f32));
        assert_eq!(tracker.last_used_any(1), Some(10f32));
    }

    #[test]
    fn shades_link_to_closest_adept() {
        let mut tracker = CooldownTracker::default();
        let adepts = vec![(1, Point2::new(0f32, 0f32)), (2, Point2::new(1f32, 0f32))];
        tracker.link_shades(&adepts, &[(50, Point2::new(1.2f32, 0f32))]);
        assert_eq!(tracker.shade_of(2), Some(50));
        assert_eq!(tracker.shade_of(1), None);
        tracker.link_shades(&adepts, &[]);
        assert_eq!(tracker.shade_of(2), None);
    }
}
