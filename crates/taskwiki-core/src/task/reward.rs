//! Reward points for completed tasks.
//!
//! The formula is a policy hook: the engine only ever calls through the
//! trait, so alternate scoring schemes can be swapped in without touching
//! selection or accounting.

use super::Task;

/// Computes the reward points granted for completing a task.
pub trait RewardPolicy {
    fn reward(&self, task: &Task) -> u32;
}

/// Default scoring: priority (floored at 1) times ten, with a flat 100
/// points for recurring tasks regardless of priority.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRewardPolicy;

impl RewardPolicy for DefaultRewardPolicy {
    fn reward(&self, task: &Task) -> u32 {
        let mut points = task.priority.max(1);
        if task.is_recurring() {
            points = 10;
        }
        points * 10
    }
}

/// Convenience wrapper over [`DefaultRewardPolicy`].
pub fn compute_task_reward(task: &Task) -> u32 {
    DefaultRewardPolicy.reward(task)
}
