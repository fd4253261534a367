//! Scoring of enemy candidates.
//!
//! Selection is a pure function of its inputs: the same candidates and the
//! same context always produce the same choice. Ties keep the candidate that
//! was encountered first.

use rust_sc2::prelude::*;

use crate::micro::priorities::{PriorityTable, PHOENIX_LIFT_PRIORITY};
use crate::snapshot::UnitSnapshot;

const EXECUTION_BONUS: f32 = 1f32;
const WORKER_BONUS: f32 = 0.5f32;
const STRUCTURE_PENALTY: f32 = 2f32;
const LIGHT_BONUS: f32 = 0.25f32;

const ADEPT_SCAN_RANGE: f32 = 12f32;
const LIFT_RANGE: f32 = 10f32;

/// Picks the candidate with the highest score strictly above `floor`.
pub fn select_best<'a, I, F>(candidates: I, floor: f32, mut score: F) -> Option<(&'a UnitSnapshot, f32)>
where
    I: IntoIterator<Item = &'a UnitSnapshot>,
    F: FnMut(&UnitSnapshot) -> Option<f32>,
{
    let mut best: Option<(&'a UnitSnapshot, f32)> = None;
    for candidate in candidates {
        if let Some(value) = score(candidate) {
            let to_beat = best.map_or(floor, |(_, s)| s);
            if value > to_beat {
                best = Some((candidate, value));
            }
        }
    }
    best
}

/// Visible, not hidden and on a layer the attacker can hit.
pub fn is_valid_target(attacker: &UnitSnapshot, target: &UnitSnapshot) -> bool {
    !target.is_snapshot && !target.is_hidden() && attacker.can_attack(target)
}

/// Table weight plus bonuses for proximity, low health, workers and light
/// armor. Types weighted zero or below are never picked.
pub fn priority_score(
    table: &PriorityTable,
    attacker: &UnitSnapshot,
    target: &UnitSnapshot,
    range: f32,
) -> Option<f32> {
    if !is_valid_target(attacker, target) {
        return None;
    }
    let weight = table.weight(target.type_id);
    if weight <= 0 {
        return None;
    }
    let distance = attacker.distance(target.position);
    let mut score = weight as f32;
    if range > 0f32 {
        score += 1f32 - (distance / range).min(2f32);
    }
    score += EXECUTION_BONUS * (1f32 - target.shield_health_percentage());
    if target.is_worker() {
        score += WORKER_BONUS;
    }
    if target.is_structure {
        score -= STRUCTURE_PENALTY;
    }
    if target.is_light {
        score += LIGHT_BONUS;
    }
    Some(score)
}

/// Harass score used by adepts and their shades. Low power light units and
/// wounded workers come first. `shuffler` spreads adepts over different
/// targets.
pub fn adept_score(from: Point2, enemy: &UnitSnapshot, shuffler: u64) -> Option<f32> {
    if enemy.is_flying || enemy.is_snapshot || enemy.is_hidden() {
        return None;
    }
    let distance = enemy.distance(from);
    if distance >= ADEPT_SCAN_RANGE {
        return None;
    }
    let mut score = 0.2f32 * distance - enemy.power;
    if enemy.is_structure {
        score -= 15f32;
    }
    if enemy.is_light {
        score += 5f32;
    }
    if enemy.is_worker() {
        score += 4f32;
        if enemy.shield_health_percentage() <= 0.5f32 {
            score += 4f32;
        }
    }
    score += 0.1f32 * (enemy.tag % (shuffler + 2)) as f32;
    Some(score)
}

/// Graviton beam target score, unweighted types are never lifted.
pub fn lift_score(from: Point2, enemy: &UnitSnapshot) -> Option<f32> {
    if enemy.is_flying || enemy.is_structure || enemy.is_snapshot || enemy.is_hidden() {
        return None;
    }
    let weight = PHOENIX_LIFT_PRIORITY.weight(enemy.type_id);
    if weight < 0 {
        return None;
    }
    Some(weight as f32 + 1f32 - enemy.distance(from) / LIFT_RANGE)
}
