use log::{debug, info};
use rust_sc2::bot::Bot;
use rust_sc2::prelude::*;

use zealous_core::command_queue::CommandQueue;
use zealous_core::managers::build_detector::EnemyRushBuild;
use zealous_core::managers::cache_manager::UnitCache;
use zealous_core::{AIComponent, BotState, Opening};

use crate::plan::{GameFacts, Goal};
use crate::protoss::{select_response, ResponseBuild};
use crate::BuildFamily;

struct BotFacts<'a> {
    bot: &'a Bot,
    cache: &'a UnitCache,
}

impl GameFacts for BotFacts<'_> {
    fn time(&self) -> f32 {
        self.bot.time
    }

    fn supply_used(&self) -> u32 {
        self.bot.supply_used
    }

    fn minerals(&self) -> u32 {
        self.bot.minerals
    }

    fn vespene(&self) -> u32 {
        self.bot.vespene
    }

    fn own_count(&self, unit_type: UnitTypeId) -> usize {
        self.bot.counter().all().count(unit_type)
    }

    fn enemy_count(&self, unit_type: UnitTypeId) -> usize {
        self.cache.enemy_count(&[unit_type])
    }

    fn has_upgrade(&self, upgrade: UpgradeId) -> bool {
        self.bot.has_upgrade(upgrade) || self.bot.is_ordered_upgrade(upgrade)
    }
}

/// Current response and how far its sequence went.
#[derive(Default)]
pub struct Strategy {
    race: Option<Race>,
    response: Option<ResponseBuild>,
    goals: Vec<Goal>,
    finished: Vec<bool>,
}

impl Strategy {
    pub fn response(&self) -> Option<ResponseBuild> {
        self.response
    }

    /// Picks the response for `race` and `rush`. Returns true when it changed.
    pub fn select(&mut self, race: Race, rush: EnemyRushBuild) -> bool {
        self.race = Some(race);
        match select_response(race, rush) {
            Some(response) if Some(response) != self.response => {
                self.set_response(response);
                true
            }
            _ => false,
        }
    }

    /// Reselects when a random opponent reveals its race.
    pub fn race_update(&mut self, race: Race, rush: EnemyRushBuild) -> bool {
        if self.race == Some(race) {
            return false;
        }
        self.select(race, rush)
    }

    fn set_response(&mut self, response: ResponseBuild) {
        info!("Switching to {:?}", response);
        self.response = Some(response);
        self.goals = response.goals();
        self.finished = vec![false; self.goals.len()];
    }

    /// Goals to push this tick. Sequence steps stop being pushed once done,
    /// side goals are pushed while their condition holds.
    pub fn active_goals(&mut self, facts: &dyn GameFacts) -> Vec<Goal> {
        for (index, goal) in self.goals.iter().enumerate() {
            if goal.blocking && !self.finished[index] && goal.is_done(facts) {
                debug!("Step done {:?}", goal.command);
                self.finished[index] = true;
            }
        }
        if self.sequence_done() {
            if let Some(follow_up) = self.response.and_then(|r| r.follow_up()) {
                self.set_response(follow_up);
            }
        }
        self.goals
            .iter()
            .zip(self.finished.iter())
            .filter(|(goal, finished)| !**finished && goal.condition.holds(facts))
            .map(|(goal, _)| *goal)
            .collect()
    }

    fn sequence_done(&self) -> bool {
        self.goals
            .iter()
            .zip(self.finished.iter())
            .all(|(goal, finished)| !goal.blocking || *finished)
    }
}

/// Turns archetype changes into production plans.
#[derive(Default)]
pub struct StrategyManager {
    forced: Option<BuildFamily>,
    strategy: Strategy,
}

impl StrategyManager {
    pub fn new(forced: Option<BuildFamily>) -> Self {
        Self {
            forced,
            strategy: Strategy::default(),
        }
    }

    fn race(&self, bot_state: &BotState) -> Race {
        self.forced
            .map(|family| family.race())
            .unwrap_or_else(|| bot_state.build_detector.enemy_race())
    }

    fn switched(&self, bot_state: &mut BotState) {
        bot_state.build_queue.clear();
        bot_state.dt_harass = self
            .strategy
            .response()
            .map_or(false, |response| response.dt_harass());
    }

    fn push_goals(&mut self, bot: &Bot, bot_state: &mut BotState) {
        let previous = self.strategy.response();
        let goals = self.strategy.active_goals(&BotFacts {
            bot,
            cache: &bot_state.cache,
        });
        if self.strategy.response() != previous {
            self.switched(bot_state);
        }
        push_all(&mut bot_state.build_queue, &goals);
    }
}

fn push_all(queue: &mut CommandQueue, goals: &[Goal]) {
    for goal in goals {
        queue.push(goal.command, goal.blocking, goal.priority);
    }
}

impl Opening for StrategyManager {
    fn opening(&mut self, bot: &Bot, bot_state: &mut BotState) {
        let race = self
            .forced
            .map(|family| family.race())
            .unwrap_or(bot.enemy_race);
        if self.strategy.select(race, bot_state.build_detector.rush_build()) {
            self.switched(bot_state);
        }
        self.push_goals(bot, bot_state);
    }
}

impl AIComponent for StrategyManager {
    fn process(&mut self, bot: &mut Bot, bot_state: &mut BotState) {
        let race = self.race(bot_state);
        let changes = std::mem::take(&mut bot_state.rush_changes);
        for change in changes {
            info!("Looks like you wanna {:?}", change.current);
            bot.chat_ally(format!("Looks like you wanna {:?}", change.current).as_str());
            if self.strategy.select(race, change.current) {
                self.switched(bot_state);
            }
        }
        if self
            .strategy
            .race_update(race, bot_state.build_detector.rush_build())
        {
            self.switched(bot_state);
        }
        self.push_goals(bot, bot_state);
    }
}
