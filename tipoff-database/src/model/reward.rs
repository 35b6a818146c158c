use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::leveling::LevelCurve;

/// What a level grants: coins, an avatar unlock, or both. At least one field
/// is populated in any table entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub coins: Option<u64>,
    pub avatar: Option<String>,
}

impl Reward {
    pub const fn coins(amount: u64) -> Self {
        Self {
            coins: Some(amount),
            avatar: None,
        }
    }

    pub fn avatar(id: impl Into<String>) -> Self {
        Self {
            coins: None,
            avatar: Some(id.into()),
        }
    }
}

/// Immutable sparse mapping from level to reward. Most levels have none;
/// a miss is a normal outcome, not an error.
#[derive(Clone, Debug)]
pub struct RewardTable {
    entries: BTreeMap<u32, Reward>,
}

impl RewardTable {
    pub fn new(entries: impl IntoIterator<Item = (u32, Reward)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// The production reward schedule.
    pub fn standard() -> Self {
        Self::new([
            (2, Reward::coins(20)),
            (3, Reward::coins(30)),
            (5, Reward::avatar("rare1")),
            (10, Reward::coins(100)),
            (15, Reward::avatar("epic1")),
            (20, Reward::avatar("legendary1")),
        ])
    }

    pub fn lookup(&self, level: u32) -> Option<&Reward> {
        self.entries.get(&level)
    }
}

/// A reward the evaluator found owed but not yet written back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingReward {
    pub level: u32,
    pub reward: Reward,
}

/// Decide whether an unclaimed reward is owed for the profile's current level.
/// Pure: no reads or writes happen here. Only the current `level` field is
/// consulted; thresholds passed before `level` caught up are not replayed.
pub fn pending_reward(
    curve: &LevelCurve,
    table: &RewardTable,
    level: u32,
    xp: u64,
    claimed: &BTreeSet<u32>,
) -> Option<PendingReward> {
    if xp < curve.xp_needed(level) {
        return None;
    }
    let reward = table.lookup(level)?;
    if claimed.contains(&level) {
        return None;
    }
    Some(PendingReward {
        level,
        reward: reward.clone(),
    })
}
