use std::collections::BTreeSet;
use std::str::FromStr;

use anyhow::Context as _;

use crate::backend::PatchOp;
use crate::model::profile::{GameRecord, UserProfile};
use crate::store::Store;
use tipoff_utils::friend_code::{is_valid_friend_code, normalize_friend_code};

/// Fields needed to bootstrap a user document. Production accounts are created
/// by the auth/signup service; this path exists for the memory backend, local
/// runs, and tests.
#[derive(Clone, Debug)]
pub struct NewProfile {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub friend_code: String,
}

pub async fn create_profile(store: &Store, new: &NewProfile) -> anyhow::Result<()> {
    let code = normalize_friend_code(&new.friend_code);
    if !is_valid_friend_code(&code) {
        anyhow::bail!("invalid friend code `{}`", new.friend_code);
    }

    let code_key = store.code_key(&code);
    if let Some(taken_by) = store.docs().get(&code_key).await? {
        if taken_by != new.id {
            anyhow::bail!("friend code `{code}` is already taken");
        }
    }

    let user_key = store.user_key(&new.id);
    let mut ops = vec![
        PatchOp::HashSet {
            key: user_key.clone(),
            field: "friendCode".to_owned(),
            value: code.clone(),
        },
        PatchOp::HashSet {
            key: user_key.clone(),
            field: "level".to_owned(),
            value: "1".to_owned(),
        },
        PatchOp::Put {
            key: code_key,
            value: new.id.clone(),
        },
    ];
    if let Some(name) = &new.name {
        ops.push(PatchOp::HashSet {
            key: user_key.clone(),
            field: "name".to_owned(),
            value: name.clone(),
        });
    }
    if let Some(email) = &new.email {
        ops.push(PatchOp::HashSet {
            key: user_key,
            field: "email".to_owned(),
            value: email.clone(),
        });
    }

    store.docs().apply(&ops).await
}

/// Load the full user document, or `None` if no profile exists for the id.
pub async fn get_profile(store: &Store, user_id: &str) -> anyhow::Result<Option<UserProfile>> {
    let fields = store.docs().hash_all(&store.user_key(user_id)).await?;
    if fields.is_empty() {
        return Ok(None);
    }

    let docs = store.docs();
    let owned_avatars = docs.set_members(&store.avatars_key(user_id)).await?;
    let friends = docs.set_members(&store.friends_key(user_id)).await?;
    let requests_in = docs.set_members(&store.requests_in_key(user_id)).await?;
    let requests_out = docs.set_members(&store.requests_out_key(user_id)).await?;

    let mut reward_claimed = BTreeSet::new();
    for raw in docs.set_members(&store.claimed_key(user_id)).await? {
        let level: u32 = raw
            .parse()
            .with_context(|| format!("bad claimed level `{raw}` for user `{user_id}`"))?;
        reward_claimed.insert(level);
    }

    let mut history = Vec::new();
    for raw in docs.list_all(&store.history_key(user_id)).await? {
        let record: GameRecord = serde_json::from_str(&raw)
            .with_context(|| format!("bad history entry for user `{user_id}`"))?;
        history.push(record);
    }

    Ok(Some(UserProfile {
        id: user_id.to_owned(),
        name: fields.get("name").cloned(),
        email: fields.get("email").cloned(),
        coins: num_field(&fields, "coins", 0, user_id)?,
        points: num_field(&fields, "points", 0, user_id)?,
        level: num_field(&fields, "level", 1, user_id)?,
        xp: num_field(&fields, "xp", 0, user_id)?,
        friend_code: fields.get("friendCode").cloned().unwrap_or_default(),
        avatar_id: fields.get("avatarId").cloned(),
        owned_avatars,
        reward_claimed,
        friends,
        requests_in,
        requests_out,
        history,
    }))
}

/// Resolve a friend code (case-insensitive) to a user id via the code index.
pub async fn resolve_friend_code(store: &Store, raw_code: &str) -> anyhow::Result<Option<String>> {
    let code = normalize_friend_code(raw_code);
    if code.is_empty() {
        return Ok(None);
    }
    store.docs().get(&store.code_key(&code)).await
}

/// Missing numeric fields fall back to their defaults; malformed ones are
/// document corruption and surface as errors.
fn num_field<T>(
    fields: &std::collections::HashMap<String, String>,
    name: &str,
    default: T,
    user_id: &str,
) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match fields.get(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .with_context(|| format!("bad `{name}` field `{raw}` for user `{user_id}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::{NewProfile, create_profile, get_profile, resolve_friend_code};
    use crate::store::Store;

    fn new_profile(id: &str, code: &str) -> NewProfile {
        NewProfile {
            id: id.to_owned(),
            name: Some(format!("Player {id}")),
            email: None,
            friend_code: code.to_owned(),
        }
    }

    #[tokio::test]
    async fn fresh_profile_starts_at_level_one() {
        let store = Store::memory();
        create_profile(&store, &new_profile("u1", "ABC123"))
            .await
            .unwrap();

        let profile = get_profile(&store, "u1").await.unwrap().unwrap();
        assert_eq!(profile.level, 1);
        assert_eq!(profile.xp, 0);
        assert_eq!(profile.coins, 0);
        assert_eq!(profile.friend_code, "ABC123");
        assert!(profile.friends.is_empty());
        assert!(profile.history.is_empty());
    }

    #[tokio::test]
    async fn missing_profile_loads_as_none() {
        let store = Store::memory();
        assert!(get_profile(&store, "ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn friend_code_lookup_is_case_insensitive() {
        let store = Store::memory();
        create_profile(&store, &new_profile("u1", "abc123"))
            .await
            .unwrap();

        let resolved = resolve_friend_code(&store, "  abc123 ").await.unwrap();
        assert_eq!(resolved.as_deref(), Some("u1"));
        let resolved = resolve_friend_code(&store, "ABC123").await.unwrap();
        assert_eq!(resolved.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn duplicate_friend_code_is_rejected() {
        let store = Store::memory();
        create_profile(&store, &new_profile("u1", "ABC123"))
            .await
            .unwrap();

        let err = create_profile(&store, &new_profile("u2", "abc123")).await;
        assert!(err.is_err());
    }
}
