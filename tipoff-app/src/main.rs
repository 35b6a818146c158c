use std::env;

use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tipoff_core::SessionContext;
use tipoff_core::auth::{AuthService, AuthState};
use tipoff_database::{DocumentService, Store};
use tipoff_database::impls::games::{GameOutcome, record_game};
use tipoff_database::impls::profiles::{NewProfile, create_profile, get_profile};
use tipoff_database::model::profile::GameRecord;
use tipoff_session::friends::load_friends_view;
use tipoff_session::messages::reward_popup_text;
use tipoff_session::profile::{ProgressionConfig, claim_pending_reward, load_profile_view};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_filter(filter_fn(|metadata| {
            *metadata.level() <= tracing::Level::INFO
        }));

    tracing_subscriber::registry().with(fmt_layer).init();

    // Load the .env file
    dotenvy::dotenv().ok();

    let key_prefix = env::var("TIPOFF_KEY_PREFIX").unwrap_or_else(|_| "tipoff:prod".to_string());
    let backend = env::var("STORE_BACKEND").unwrap_or_else(|_| "memory".to_string());

    let docs = if backend.eq_ignore_ascii_case("redis") {
        match env::var("REDIS_URL") {
            Ok(redis_url) => match DocumentService::redis(&redis_url, key_prefix.clone()) {
                Ok(docs) => {
                    info!(key_prefix = %key_prefix, "Redis document store enabled.");
                    docs
                }
                Err(err) => {
                    warn!(?err, "Failed to initialize Redis store; continuing with the in-memory backend.");
                    DocumentService::memory(key_prefix.clone())
                }
            },
            Err(_) => {
                warn!("STORE_BACKEND=redis but REDIS_URL is missing; continuing with the in-memory backend.");
                DocumentService::memory(key_prefix.clone())
            }
        }
    } else {
        info!("In-memory document store (set STORE_BACKEND=redis to use Redis).");
        DocumentService::memory(key_prefix.clone())
    };

    if docs.is_redis() {
        if let Err(err) = docs.ping().await {
            warn!(?err, "Document store ping failed; operations will surface errors as they occur.");
        } else {
            info!("Document store health check passed.");
        }
    }

    let store = Store::new(docs);
    let user_id = env::var("TIPOFF_USER_ID").unwrap_or_else(|_| "demo-user".to_string());
    let auto_claim = env_bool("TIPOFF_AUTO_CLAIM", false);

    // The memory backend starts empty; give the shell a profile to drive.
    if !store.docs().is_redis() && get_profile(&store, &user_id).await?.is_none() {
        seed_demo_profile(&store, &user_id).await?;
        info!(user_id = %user_id, "Seeded demo profile.");
    }

    let auth = AuthService::new();
    let rx = auth.subscribe();
    let config = ProgressionConfig::default();

    let mut watcher = tokio::spawn(run_session_loop(rx, store, config, auto_claim));

    info!(user_id = %user_id, "Signing in.");
    auth.sign_in(user_id);

    tokio::select! {
        res = &mut watcher => {
            res??;
            return Ok(());
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down.");
            auth.sign_out();
            drop(auth);
        }
    }

    watcher.await??;
    Ok(())
}

/// React to every auth-state change for the lifetime of the process: build a
/// session context on sign-in, drop it on sign-out. Exits when the auth
/// service goes away.
async fn run_session_loop(
    mut rx: watch::Receiver<AuthState>,
    store: Store,
    config: ProgressionConfig,
    auto_claim: bool,
) -> anyhow::Result<()> {
    loop {
        let state = rx.borrow_and_update().clone();
        match state {
            AuthState::SignedIn { user_id } => {
                let ctx = SessionContext::new(user_id, store.clone());
                if let Err(err) = show_session(&ctx, &config, auto_claim).await {
                    error!(?err, "session flow failed");
                }
            }
            AuthState::SignedOut => {
                info!("Signed out; session context dropped.");
            }
        }

        if rx.changed().await.is_err() {
            return Ok(());
        }
    }
}

async fn show_session(
    ctx: &SessionContext,
    config: &ProgressionConfig,
    auto_claim: bool,
) -> anyhow::Result<()> {
    let Some(mut view) = load_profile_view(ctx, config).await? else {
        warn!(user_id = %ctx.user_id, "No profile document for signed-in user.");
        return Ok(());
    };

    info!(
        name = %view.profile.display_name(),
        level = view.profile.level,
        xp = view.profile.xp,
        points = view.profile.points,
        coins = view.profile.coins,
        "Profile loaded."
    );
    info!(
        current = view.progress.current,
        needed = view.progress.needed,
        percent = view.progress.percent,
        "XP progress."
    );

    if let Some(pending) = &view.pending {
        info!("\n{}", reward_popup_text(pending));
        if auto_claim {
            claim_pending_reward(ctx, config, &mut view).await?;
            info!(coins = view.profile.coins, "Reward claimed and profile reloaded.");
        }
    }

    if let Some(friends) = load_friends_view(ctx).await? {
        info!(
            friend_code = %friends.me.friend_code,
            friends = friends.friends.len(),
            incoming = friends.incoming.len(),
            outgoing = friends.outgoing.len(),
            "Friend directory loaded."
        );
        for entry in &friends.friends {
            info!(name = %entry.name, level = entry.level, best = entry.best_score, "Friend.");
        }
    }

    Ok(())
}

/// Demo fixture: a level-5 player sitting exactly on the reward threshold.
async fn seed_demo_profile(store: &Store, user_id: &str) -> anyhow::Result<()> {
    create_profile(
        store,
        &NewProfile {
            id: user_id.to_owned(),
            name: Some("Demo Player".to_owned()),
            email: None,
            friend_code: "DEMO01".to_owned(),
        },
    )
    .await?;

    store
        .docs()
        .apply(&[tipoff_database::PatchOp::HashSet {
            key: store.user_key(user_id),
            field: "level".to_owned(),
            value: "5".to_owned(),
        }])
        .await?;

    record_game(
        store,
        user_id,
        &GameRecord {
            topic: "NBA Legends".to_owned(),
            score: 500,
            date: "2026-08-29".to_owned(),
        },
        &GameOutcome {
            xp: 500,
            points: 500,
            coins: 25,
        },
    )
    .await
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}
