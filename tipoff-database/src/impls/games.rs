use anyhow::Context as _;

use crate::backend::PatchOp;
use crate::model::profile::GameRecord;
use crate::store::Store;

/// Stat deltas earned from one finished quiz.
#[derive(Clone, Copy, Debug, Default)]
pub struct GameOutcome {
    pub xp: u64,
    pub points: u64,
    pub coins: u64,
}

/// Append a history entry and bump the earned counters in one additive patch.
/// History is append-only; nothing here ever rewrites existing entries.
pub async fn record_game(
    store: &Store,
    user_id: &str,
    record: &GameRecord,
    outcome: &GameOutcome,
) -> anyhow::Result<()> {
    let entry = serde_json::to_string(record).context("failed to serialize history entry")?;

    let user_key = store.user_key(user_id);
    let mut ops = vec![PatchOp::ListPush {
        key: store.history_key(user_id),
        value: entry,
    }];
    for (field, amount) in [
        ("xp", outcome.xp),
        ("points", outcome.points),
        ("coins", outcome.coins),
    ] {
        if amount == 0 {
            continue;
        }
        let delta = i64::try_from(amount).with_context(|| format!("{field} out of i64 range"))?;
        ops.push(PatchOp::HashIncr {
            key: user_key.clone(),
            field: field.to_owned(),
            delta,
        });
    }

    store.docs().apply(&ops).await
}

#[cfg(test)]
mod tests {
    use super::{GameOutcome, record_game};
    use crate::impls::profiles::{NewProfile, create_profile, get_profile};
    use crate::model::profile::GameRecord;
    use crate::store::Store;

    #[tokio::test]
    async fn finished_game_appends_history_and_bumps_stats() {
        let store = Store::memory();
        create_profile(
            &store,
            &NewProfile {
                id: "u1".to_owned(),
                name: None,
                email: None,
                friend_code: "AAAAA1".to_owned(),
            },
        )
        .await
        .unwrap();

        let record = GameRecord {
            topic: "90s Bulls".to_owned(),
            score: 800,
            date: "2026-08-29".to_owned(),
        };
        let outcome = GameOutcome {
            xp: 80,
            points: 800,
            coins: 10,
        };
        record_game(&store, "u1", &record, &outcome).await.unwrap();
        record_game(&store, "u1", &record, &outcome).await.unwrap();

        let profile = get_profile(&store, "u1").await.unwrap().unwrap();
        assert_eq!(profile.history.len(), 2);
        assert_eq!(profile.history[0], record);
        assert_eq!(profile.xp, 160);
        assert_eq!(profile.points, 1600);
        assert_eq!(profile.coins, 20);
    }
}
