/// Outcomes of friend-directory operations. The first four variants are
/// expected validation results surfaced straight to the initiating user;
/// `Store` is a transient backend failure and the only variant worth logging.
#[derive(Debug, thiserror::Error)]
pub enum FriendError {
    #[error("friend code not found")]
    NotFound,
    #[error("cannot send a friend request to yourself")]
    SelfRequest,
    #[error("already friends with this user")]
    AlreadyFriends,
    #[error("friend request already sent")]
    AlreadySent,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl FriendError {
    /// Validation failures are recoverable user mistakes, not faults.
    pub fn is_validation(&self) -> bool {
        !matches!(self, FriendError::Store(_))
    }
}
