use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One finished quiz, appended to the profile history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub topic: String,
    pub score: u64,
    pub date: String,
}

/// Fully loaded user document, assembled from the profile hash plus its
/// companion sets and history list.
#[derive(Clone, Debug)]
pub struct UserProfile {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub coins: u64,
    pub points: u64,
    /// Starts at 1; advancement is driven outside this crate.
    pub level: u32,
    pub xp: u64,
    /// Unique uppercase code other players use to find this user.
    pub friend_code: String,
    pub avatar_id: Option<String>,
    pub owned_avatars: BTreeSet<String>,
    /// Levels whose rewards were already granted. Grows, never shrinks.
    pub reward_claimed: BTreeSet<u32>,
    pub friends: BTreeSet<String>,
    pub requests_in: BTreeSet<String>,
    pub requests_out: BTreeSet<String>,
    pub history: Vec<GameRecord>,
}

impl UserProfile {
    /// Display name with the same fallback chain the profile screen uses.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}
