pub mod auth;

use tipoff_database::Store;

pub type Error = anyhow::Error;

/// Per-sign-in context handed to every user-initiated operation. Built when
/// the auth service reports a signed-in user and dropped on sign-out; nothing
/// in the app holds the current user as ambient global state.
#[derive(Clone, Debug)]
pub struct SessionContext {
    pub user_id: String,
    pub store: Store,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>, store: Store) -> Self {
        Self {
            user_id: user_id.into(),
            store,
        }
    }
}
