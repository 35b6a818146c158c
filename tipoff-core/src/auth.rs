use tokio::sync::watch;

/// Current authentication state as reported by the external auth provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthState {
    SignedOut,
    SignedIn { user_id: String },
}

/// Watchable auth state. Subscribers see the current value immediately and
/// every change after it, which is the contract UIs rely on to decide between
/// the signed-in screen and the login prompt.
#[derive(Clone, Debug)]
pub struct AuthService {
    tx: watch::Sender<AuthState>,
}

impl AuthService {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::SignedOut);
        Self { tx }
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        self.tx.send_replace(AuthState::SignedIn {
            user_id: user_id.into(),
        });
    }

    pub fn sign_out(&self) {
        self.tx.send_replace(AuthState::SignedOut);
    }

    pub fn current(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }
}

impl Default for AuthService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthService, AuthState};

    #[tokio::test]
    async fn subscribers_see_initial_state_immediately() {
        let auth = AuthService::new();
        let rx = auth.subscribe();
        assert_eq!(*rx.borrow(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn state_changes_reach_existing_subscribers() {
        let auth = AuthService::new();
        let mut rx = auth.subscribe();

        auth.sign_in("u1");
        rx.changed().await.unwrap();
        assert_eq!(
            *rx.borrow(),
            AuthState::SignedIn {
                user_id: "u1".to_owned()
            }
        );

        auth.sign_out();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), AuthState::SignedOut);
    }
}
