use log::debug;
use rust_sc2::bot::Bot;
use rust_sc2::prelude::*;

/// A production goal with its ordering information.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueItem {
    pub command: Command,
    pub blocking: bool,
    pub priority: usize,
}

impl QueueItem {
    fn new(command: Command, blocking: bool, priority: usize) -> Self {
        Self {
            command,
            blocking,
            priority,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Command {
    UnitCommand {
        unit_type: UnitTypeId,
        wanted_amount: usize,
        save_resources: bool,
    },
    UpgradeCommand {
        upgrade: UpgradeId,
        save_resources: bool,
    },
}

impl Command {
    pub fn new_unit(unit_type: UnitTypeId, wanted_amount: usize, save_resources: bool) -> Self {
        Command::UnitCommand {
            unit_type,
            wanted_amount,
            save_resources,
        }
    }

    pub fn new_upgrade(upgrade: UpgradeId, save_resources: bool) -> Self {
        Command::UpgradeCommand {
            upgrade,
            save_resources,
        }
    }

    fn replaces(&self, other: &Command, priority: usize, other_priority: usize) -> bool {
        match (self, other) {
            (
                Command::UnitCommand {
                    unit_type,
                    wanted_amount,
                    ..
                },
                Command::UnitCommand {
                    unit_type: new_type,
                    wanted_amount: new_amount,
                    ..
                },
            ) => {
                unit_type == new_type
                    && ((wanted_amount <= new_amount && priority <= other_priority)
                        || (wanted_amount >= new_amount && priority >= other_priority))
            }
            (
                Command::UpgradeCommand { upgrade, .. },
                Command::UpgradeCommand {
                    upgrade: new_upgrade,
                    ..
                },
            ) => upgrade == new_upgrade,
            _ => false,
        }
    }
}

pub struct CommandQueueIter {
    queue: Vec<QueueItem>,
    index: usize,
}

/// Production goals sorted by descending priority.
///
/// Iteration stops right after the first blocking goal, so nothing behind it
/// spends resources until it is done.
#[derive(Debug, Default)]
pub struct CommandQueue {
    queue: Vec<QueueItem>,
}

impl CommandQueue {
    pub fn print_queue(&self) {
        for item in self.queue.iter() {
            debug!("Pending command {:?}", item);
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn check_completion(&mut self, bot: &Bot) {
        self.retain_pending(|command| match *command {
            Command::UnitCommand {
                unit_type,
                wanted_amount,
                ..
            } => bot.counter().all().count(unit_type) < wanted_amount,
            Command::UpgradeCommand { upgrade, .. } => {
                !bot.has_upgrade(upgrade) && !bot.is_ordered_upgrade(upgrade)
            }
        });
    }

    /// Drops every goal `pending` reports as done.
    pub fn retain_pending<F>(&mut self, pending: F)
    where
        F: Fn(&Command) -> bool,
    {
        self.queue.retain(|item| pending(&item.command));
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn push(&mut self, command: Command, blocking: bool, priority: usize) {
        let replace_previous_command = self
            .queue
            .iter()
            .position(|i| i.command.replaces(&command, i.priority, priority));
        if let Some(previous_command_index) = replace_previous_command {
            if self.queue[previous_command_index].priority >= priority {
                return;
            }
            self.queue.remove(previous_command_index);
        }
        let index = self.queue.iter().position(|i| i.priority < priority);
        let item = QueueItem::new(command, blocking, priority);
        if let Some(found_index) = index {
            self.queue.insert(found_index, item);
        } else {
            self.queue.push(item);
        }
    }
}

impl IntoIterator for &CommandQueue {
    type Item = QueueItem;
    type IntoIter = CommandQueueIter;

    fn into_iter(self) -> Self::IntoIter {
        CommandQueueIter {
            index: 0,
            queue: self.queue.clone(),
        }
    }
}

impl Iterator for CommandQueueIter {
    type Item = QueueItem;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.queue.len() {
            if self.index > 0 && self.queue[self.index - 1].blocking {
                return None;
            }
            let item = self.queue[self.index].clone();
            self.index += 1;
            return Some(item);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use rust_sc2::prelude::*;

    use crate::command_queue::{Command, CommandQueue};

    fn commands(queue: &CommandQueue) -> Vec<Command> {
        queue.into_iter().map(|item| item.command).collect()
    }

    #[test]
    fn same_command_ignored() {
        let mut queue = CommandQueue::default();
        let command = Command::new_unit(UnitTypeId::Zealot, 10, false);
        queue.push(command, false, 0);
        queue.push(command, false, 0);
        assert_eq!(commands(&queue), vec![command]);
    }

    #[test]
    fn more_units_with_higher_priority_replaced() {
        let mut queue = CommandQueue::default();
        let few = Command::new_unit(UnitTypeId::Stalker, 10, false);
        let many = Command::new_unit(UnitTypeId::Stalker, 20, false);
        queue.push(few, false, 0);
        queue.push(many, false, 5);
        assert_eq!(commands(&queue), vec![many]);
    }

    #[test]
    fn smaller_earlier_goal_kept_beside_bigger_later_one() {
        let mut queue = CommandQueue::default();
        let early = Command::new_unit(UnitTypeId::Stalker, 3, true);
        let late = Command::new_unit(UnitTypeId::Stalker, 8, true);
        queue.push(early, false, 900);
        queue.push(late, false, 800);
        assert_eq!(commands(&queue), vec![early, late]);
    }

    #[test]
    fn higher_priority_first() {
        let mut queue = CommandQueue::default();
        let gateway = Command::new_unit(UnitTypeId::Gateway, 2, false);
        let forge = Command::new_unit(UnitTypeId::Forge, 1, false);
        queue.push(gateway, false, 1);
        queue.push(forge, false, 10);
        assert_eq!(commands(&queue), vec![forge, gateway]);
    }

    #[test]
    fn blocking_stops_iteration() {
        let mut queue = CommandQueue::default();
        let pylon = Command::new_unit(UnitTypeId::Pylon, 1, true);
        let gateway = Command::new_unit(UnitTypeId::Gateway, 1, true);
        queue.push(pylon, true, 1000);
        queue.push(gateway, true, 990);
        queue.push(Command::new_unit(UnitTypeId::Probe, 20, false), false, 25);
        assert_eq!(commands(&queue), vec![pylon]);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn upgrades_are_unique() {
        let mut queue = CommandQueue::default();
        let blink = Command::new_upgrade(UpgradeId::BlinkTech, true);
        queue.push(blink, false, 10);
        queue.push(Command::new_upgrade(UpgradeId::BlinkTech, false), false, 5);
        assert_eq!(commands(&queue), vec![blink]);
    }

    #[test]
    fn completed_goals_are_removed() {
        let mut queue = CommandQueue::default();
        let pylon = Command::new_unit(UnitTypeId::Pylon, 1, true);
        let gateway = Command::new_unit(UnitTypeId::Gateway, 1, true);
        queue.push(pylon, true, 1000);
        queue.push(gateway, true, 990);
        queue.retain_pending(|command| {
            !matches!(command, Command::UnitCommand { unit_type: UnitTypeId::Pylon, .. })
        });
        assert_eq!(commands(&queue), vec![gateway]);
        queue.clear();
        assert!(queue.is_empty());
    }
}
