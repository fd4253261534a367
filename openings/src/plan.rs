use rust_sc2::prelude::*;

use zealous_core::command_queue::Command;

/// When a goal is worth pushing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    Always,
    Supply(u32),
    Time(f32),
    Minerals(u32),
    Gas(u32),
    OwnCount(UnitTypeId, usize),
    EnemyCount(UnitTypeId, usize),
}

/// What the plan needs to know about the game.
pub trait GameFacts {
    fn time(&self) -> f32;
    fn supply_used(&self) -> u32;
    fn minerals(&self) -> u32;
    fn vespene(&self) -> u32;
    fn own_count(&self, unit_type: UnitTypeId) -> usize;
    fn enemy_count(&self, unit_type: UnitTypeId) -> usize;
    fn has_upgrade(&self, upgrade: UpgradeId) -> bool;
}

impl Condition {
    pub fn holds(&self, facts: &dyn GameFacts) -> bool {
        match *self {
            Condition::Always => true,
            Condition::Supply(supply) => facts.supply_used() >= supply,
            Condition::Time(time) => facts.time() >= time,
            Condition::Minerals(minerals) => facts.minerals() >= minerals,
            Condition::Gas(gas) => facts.vespene() >= gas,
            Condition::OwnCount(unit_type, count) => facts.own_count(unit_type) >= count,
            Condition::EnemyCount(unit_type, count) => facts.enemy_count(unit_type) >= count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goal {
    pub command: Command,
    pub blocking: bool,
    pub priority: usize,
    pub condition: Condition,
}

impl Goal {
    pub fn is_done(&self, facts: &dyn GameFacts) -> bool {
        match self.command {
            Command::UnitCommand {
                unit_type,
                wanted_amount,
                ..
            } => facts.own_count(unit_type) >= wanted_amount,
            Command::UpgradeCommand { upgrade, .. } => facts.has_upgrade(upgrade),
        }
    }
}

/// Builds the goal list of a response.
///
/// Steps are sequential: each one blocks everything after it until done.
/// Side goals run next to the sequence at their own priority.
pub struct Plan {
    goals: Vec<Goal>,
    next_priority: usize,
}

impl Plan {
    const STEP: usize = 10;
    const SIDE_PRIORITY: usize = 400;

    pub fn sequence() -> Self {
        Self {
            goals: Vec::new(),
            next_priority: 1_000,
        }
    }

    fn push_step(mut self, command: Command, condition: Condition) -> Self {
        self.goals.push(Goal {
            command,
            blocking: true,
            priority: self.next_priority,
            condition,
        });
        self.next_priority = self.next_priority.saturating_sub(Self::STEP);
        self
    }

    pub fn unit(self, unit_type: UnitTypeId, count: usize) -> Self {
        self.push_step(Command::new_unit(unit_type, count, true), Condition::Always)
    }

    pub fn unit_when(self, condition: Condition, unit_type: UnitTypeId, count: usize) -> Self {
        self.push_step(Command::new_unit(unit_type, count, true), condition)
    }

    pub fn upgrade(self, upgrade: UpgradeId) -> Self {
        self.push_step(Command::new_upgrade(upgrade, true), Condition::Always)
    }

    fn push_side(mut self, command: Command, condition: Condition, offset: usize) -> Self {
        self.goals.push(Goal {
            command,
            blocking: false,
            priority: Self::SIDE_PRIORITY.saturating_sub(offset),
            condition,
        });
        self
    }

    /// Keeps `count` units around, refilling losses.
    pub fn keep(self, unit_type: UnitTypeId, count: usize) -> Self {
        let offset = self.side_offset();
        self.push_side(Command::new_unit(unit_type, count, true), Condition::Always, offset)
    }

    pub fn keep_when(self, condition: Condition, unit_type: UnitTypeId, count: usize) -> Self {
        let offset = self.side_offset();
        self.push_side(Command::new_unit(unit_type, count, true), condition, offset)
    }

    pub fn research_when(self, condition: Condition, upgrade: UpgradeId) -> Self {
        let offset = self.side_offset();
        self.push_side(Command::new_upgrade(upgrade, true), condition, offset)
    }

    /// Spends whatever is left on this unit.
    pub fn fill(mut self, unit_type: UnitTypeId) -> Self {
        self.goals.push(Goal {
            command: Command::new_unit(unit_type, 200, false),
            blocking: false,
            priority: 1,
            condition: Condition::Always,
        });
        self
    }

    fn side_offset(&self) -> usize {
        self.goals.iter().filter(|g| !g.blocking).count()
    }

    pub fn build(self) -> Vec<Goal> {
        self.goals
    }
}
