use tracing::{error, info, warn};

use tipoff_core::SessionContext;
use tipoff_database::impls::{friends, profiles};
use tipoff_database::model::profile::UserProfile;
use tipoff_utils::stats::best_score;

use crate::messages;

/// One row in a friends/requests list: the fields the screen actually shows.
#[derive(Clone, Debug)]
pub struct FriendEntry {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub best_score: u64,
}

impl FriendEntry {
    fn from_profile(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.display_name().to_owned(),
            level: profile.level,
            best_score: best_score(profile.history.iter().map(|game| game.score)),
        }
    }
}

/// Everything the friends screen renders.
#[derive(Clone, Debug)]
pub struct FriendsView {
    pub me: UserProfile,
    pub friends: Vec<FriendEntry>,
    pub incoming: Vec<FriendEntry>,
    pub outgoing: Vec<FriendEntry>,
}

/// Outcome of submitting the add-friend form, ready to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeSubmitFeedback {
    pub ok: bool,
    pub message: &'static str,
}

/// Load the directory for the session user, resolving every referenced id to
/// a profile. Ids whose documents are gone are skipped, same as the UI does.
pub async fn load_friends_view(ctx: &SessionContext) -> anyhow::Result<Option<FriendsView>> {
    let Some(me) = profiles::get_profile(&ctx.store, &ctx.user_id).await? else {
        return Ok(None);
    };

    let friends = resolve_entries(ctx, &me.friends).await?;
    let incoming = resolve_entries(ctx, &me.requests_in).await?;
    let outgoing = resolve_entries(ctx, &me.requests_out).await?;

    Ok(Some(FriendsView {
        me,
        friends,
        incoming,
        outgoing,
    }))
}

async fn resolve_entries(
    ctx: &SessionContext,
    ids: &std::collections::BTreeSet<String>,
) -> anyhow::Result<Vec<FriendEntry>> {
    let mut entries = Vec::with_capacity(ids.len());
    for id in ids {
        match profiles::get_profile(&ctx.store, id).await? {
            Some(profile) => entries.push(FriendEntry::from_profile(&profile)),
            None => warn!(user_id = %id, "referenced profile missing; skipping row"),
        }
    }
    Ok(entries)
}

/// Handle the add-friend form. Validation misses come back as specific
/// messages; store failures are logged and come back as the generic line.
/// The in-memory view is never touched on failure.
pub async fn submit_friend_code(ctx: &SessionContext, input: &str) -> CodeSubmitFeedback {
    if input.trim().is_empty() {
        return CodeSubmitFeedback {
            ok: false,
            message: messages::EMPTY_CODE_MESSAGE,
        };
    }

    match friends::send_request(&ctx.store, &ctx.user_id, input).await {
        Ok(target_id) => {
            info!(from = %ctx.user_id, to = %target_id, "friend request sent");
            CodeSubmitFeedback {
                ok: true,
                message: messages::REQUEST_SENT_MESSAGE,
            }
        }
        Err(err) => {
            if !err.is_validation() {
                error!(?err, "friend request failed");
            }
            CodeSubmitFeedback {
                ok: false,
                message: messages::friend_error_message(&err),
            }
        }
    }
}

/// Accept an incoming request, then reload the directory from the store
/// rather than patching the local view.
pub async fn accept_request(
    ctx: &SessionContext,
    requester_id: &str,
) -> anyhow::Result<Option<FriendsView>> {
    friends::accept_request(&ctx.store, &ctx.user_id, requester_id).await?;
    info!(user_id = %ctx.user_id, requester = %requester_id, "friend request accepted");
    load_friends_view(ctx).await
}

pub async fn decline_request(
    ctx: &SessionContext,
    requester_id: &str,
) -> anyhow::Result<Option<FriendsView>> {
    friends::decline_request(&ctx.store, &ctx.user_id, requester_id).await?;
    info!(user_id = %ctx.user_id, requester = %requester_id, "friend request declined");
    load_friends_view(ctx).await
}

pub async fn remove_friend(
    ctx: &SessionContext,
    other_id: &str,
) -> anyhow::Result<Option<FriendsView>> {
    friends::remove_friend(&ctx.store, &ctx.user_id, other_id).await?;
    info!(user_id = %ctx.user_id, removed = %other_id, "friend removed");
    load_friends_view(ctx).await
}

#[cfg(test)]
mod tests {
    use super::{accept_request, load_friends_view, submit_friend_code};
    use crate::messages;
    use tipoff_core::SessionContext;
    use tipoff_database::impls::games::{GameOutcome, record_game};
    use tipoff_database::impls::profiles::{NewProfile, create_profile};
    use tipoff_database::model::profile::GameRecord;
    use tipoff_database::store::Store;

    async fn seeded_store() -> Store {
        let store = Store::memory();
        for (id, name, code) in [("u1", "Ace", "AAAAA1"), ("u2", "Bo", "BBBBB2")] {
            create_profile(
                &store,
                &NewProfile {
                    id: id.to_owned(),
                    name: Some(name.to_owned()),
                    email: None,
                    friend_code: code.to_owned(),
                },
            )
            .await
            .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn empty_input_is_rejected_before_any_store_call() {
        let ctx = SessionContext::new("u1", seeded_store().await);
        let feedback = submit_friend_code(&ctx, "   ").await;
        assert!(!feedback.ok);
        assert_eq!(feedback.message, messages::EMPTY_CODE_MESSAGE);
    }

    #[tokio::test]
    async fn directory_reflects_request_and_acceptance() {
        let store = seeded_store().await;
        let u1 = SessionContext::new("u1", store.clone());
        let u2 = SessionContext::new("u2", store);

        let feedback = submit_friend_code(&u1, "bbbbb2").await;
        assert!(feedback.ok);

        let view = load_friends_view(&u1).await.unwrap().unwrap();
        assert_eq!(view.outgoing.len(), 1);
        assert_eq!(view.outgoing[0].name, "Bo");

        let view = accept_request(&u2, "u1").await.unwrap().unwrap();
        assert_eq!(view.friends.len(), 1);
        assert_eq!(view.friends[0].id, "u1");
        assert!(view.incoming.is_empty());

        let view = load_friends_view(&u1).await.unwrap().unwrap();
        assert_eq!(view.friends.len(), 1);
        assert!(view.outgoing.is_empty());
    }

    #[tokio::test]
    async fn friend_rows_carry_level_and_best_score() {
        let store = seeded_store().await;
        record_game(
            &store,
            "u2",
            &GameRecord {
                topic: "Finals MVPs".to_owned(),
                score: 940,
                date: "2026-08-01".to_owned(),
            },
            &GameOutcome::default(),
        )
        .await
        .unwrap();

        let u1 = SessionContext::new("u1", store.clone());
        let u2 = SessionContext::new("u2", store);
        submit_friend_code(&u1, "BBBBB2").await;
        accept_request(&u2, "u1").await.unwrap();

        let view = load_friends_view(&u1).await.unwrap().unwrap();
        assert_eq!(view.friends[0].level, 1);
        assert_eq!(view.friends[0].best_score, 940);
    }

    #[tokio::test]
    async fn duplicate_submission_surfaces_already_sent_text() {
        let ctx = SessionContext::new("u1", seeded_store().await);
        submit_friend_code(&ctx, "BBBBB2").await;
        let feedback = submit_friend_code(&ctx, "BBBBB2").await;
        assert!(!feedback.ok);
        assert_eq!(feedback.message, "Request already sent.");
    }
}
