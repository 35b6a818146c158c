use anyhow::Context as _;
use tracing::debug;

use crate::backend::PatchOp;
use crate::model::profile::UserProfile;
use crate::model::reward::PendingReward;
use crate::store::Store;

/// Write a pending reward into the user document as one additive merge patch:
/// coin increment, avatar unlock, and the claimed-level marker land together
/// or not at all. Returns `false` (touching nothing) if the level was already
/// claimed, so a double claim can never grant twice.
pub async fn claim_reward(
    store: &Store,
    profile: &UserProfile,
    pending: &PendingReward,
) -> anyhow::Result<bool> {
    if profile.reward_claimed.contains(&pending.level) {
        return Ok(false);
    }

    let mut ops = Vec::with_capacity(3);
    if let Some(coins) = pending.reward.coins {
        let delta = i64::try_from(coins).context("reward coin amount out of i64 range")?;
        ops.push(PatchOp::HashIncr {
            key: store.user_key(&profile.id),
            field: "coins".to_owned(),
            delta,
        });
    }
    if let Some(avatar) = &pending.reward.avatar {
        ops.push(PatchOp::SetAdd {
            key: store.avatars_key(&profile.id),
            member: avatar.clone(),
        });
    }
    ops.push(PatchOp::SetAdd {
        key: store.claimed_key(&profile.id),
        member: pending.level.to_string(),
    });

    debug!(user_id = %profile.id, level = pending.level, "applying reward claim patch");
    store.docs().apply(&ops).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::claim_reward;
    use crate::impls::profiles::{NewProfile, create_profile, get_profile};
    use crate::model::leveling::LevelCurve;
    use crate::model::reward::{PendingReward, Reward, RewardTable, pending_reward};
    use crate::store::Store;

    async fn seed_level_five(store: &Store) {
        create_profile(
            store,
            &NewProfile {
                id: "u1".to_owned(),
                name: None,
                email: None,
                friend_code: "AAAAA1".to_owned(),
            },
        )
        .await
        .unwrap();
        store
            .docs()
            .apply(&[
                crate::backend::PatchOp::HashSet {
                    key: store.user_key("u1"),
                    field: "level".to_owned(),
                    value: "5".to_owned(),
                },
                crate::backend::PatchOp::HashIncr {
                    key: store.user_key("u1"),
                    field: "xp".to_owned(),
                    delta: 500,
                },
            ])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn claim_applies_avatar_and_claimed_marker() {
        let store = Store::memory();
        seed_level_five(&store).await;

        let profile = get_profile(&store, "u1").await.unwrap().unwrap();
        let pending = pending_reward(
            &LevelCurve::standard(),
            &RewardTable::standard(),
            profile.level,
            profile.xp,
            &profile.reward_claimed,
        )
        .unwrap();
        assert_eq!(pending.reward, Reward::avatar("rare1"));

        assert!(claim_reward(&store, &profile, &pending).await.unwrap());

        let reloaded = get_profile(&store, "u1").await.unwrap().unwrap();
        assert!(reloaded.owned_avatars.contains("rare1"));
        assert!(reloaded.reward_claimed.contains(&5));
        // no further reward is owed after the reload
        assert_eq!(
            pending_reward(
                &LevelCurve::standard(),
                &RewardTable::standard(),
                reloaded.level,
                reloaded.xp,
                &reloaded.reward_claimed,
            ),
            None
        );
    }

    #[tokio::test]
    async fn claiming_twice_grants_nothing_extra() {
        let store = Store::memory();
        seed_level_five(&store).await;

        let pending = PendingReward {
            level: 2,
            reward: Reward::coins(20),
        };
        let profile = get_profile(&store, "u1").await.unwrap().unwrap();
        assert!(claim_reward(&store, &profile, &pending).await.unwrap());

        let after_first = get_profile(&store, "u1").await.unwrap().unwrap();
        assert_eq!(after_first.coins, 20);

        // claim again against the reloaded snapshot: the claimed marker wins
        assert!(!claim_reward(&store, &after_first, &pending).await.unwrap());
        let after_second = get_profile(&store, "u1").await.unwrap().unwrap();
        assert_eq!(after_second.coins, 20);
        assert_eq!(after_second.reward_claimed, BTreeSet::from([2]));
    }
}
