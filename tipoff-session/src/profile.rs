use anyhow::Context as _;
use tracing::info;

use tipoff_core::SessionContext;
use tipoff_database::impls::{profiles, rewards};
use tipoff_database::model::leveling::{LevelCurve, LevelProgress};
use tipoff_database::model::profile::UserProfile;
use tipoff_database::model::reward::{PendingReward, RewardTable, pending_reward};

/// Progression knobs for the profile screen. Injectable so tests can run a
/// custom curve or reward schedule against the same flow.
#[derive(Clone, Debug)]
pub struct ProgressionConfig {
    pub curve: LevelCurve,
    pub rewards: RewardTable,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            curve: LevelCurve::standard(),
            rewards: RewardTable::standard(),
        }
    }
}

/// Everything the profile screen renders: the loaded profile, XP bar state,
/// and the reward popup to show (if one is owed).
#[derive(Clone, Debug)]
pub struct ProfileView {
    pub profile: UserProfile,
    pub progress: LevelProgress,
    pub pending: Option<PendingReward>,
}

/// Load the profile and evaluate reward eligibility, exactly once per screen
/// load. Returns `None` when no profile document exists for the session user.
pub async fn load_profile_view(
    ctx: &SessionContext,
    config: &ProgressionConfig,
) -> anyhow::Result<Option<ProfileView>> {
    let Some(profile) = profiles::get_profile(&ctx.store, &ctx.user_id).await? else {
        return Ok(None);
    };

    let progress = config.curve.progress(profile.xp, profile.level);
    let pending = pending_reward(
        &config.curve,
        &config.rewards,
        profile.level,
        profile.xp,
        &profile.reward_claimed,
    );

    Ok(Some(ProfileView {
        profile,
        progress,
        pending,
    }))
}

/// Claim the view's pending reward. On success the pending state is cleared
/// and the view is replaced with a fresh authoritative load; the optimistic
/// local copy is never trusted for further eligibility checks. On store
/// failure the pending reward stays put so the user can retry.
pub async fn claim_pending_reward(
    ctx: &SessionContext,
    config: &ProgressionConfig,
    view: &mut ProfileView,
) -> anyhow::Result<bool> {
    let Some(pending) = view.pending.clone() else {
        return Ok(false);
    };

    let applied = rewards::claim_reward(&ctx.store, &view.profile, &pending).await?;
    if applied {
        info!(
            user_id = %ctx.user_id,
            level = pending.level,
            "level reward claimed"
        );
    }

    *view = load_profile_view(ctx, config)
        .await?
        .context("profile disappeared during reward claim")?;

    Ok(applied)
}
