use tipoff_database::FriendError;
use tipoff_database::model::reward::PendingReward;

/// Text shown next to the friend-code input. Validation outcomes get specific
/// wording; transient store failures collapse into one generic line.
pub fn friend_error_message(err: &FriendError) -> &'static str {
    match err {
        FriendError::NotFound => "No player with that friend code was found.",
        FriendError::SelfRequest => "You cannot add yourself.",
        FriendError::AlreadyFriends => "You are already friends.",
        FriendError::AlreadySent => "Request already sent.",
        FriendError::Store(_) => "Could not send the request. Please try again.",
    }
}

pub const EMPTY_CODE_MESSAGE: &str = "Enter a friend code.";
pub const REQUEST_SENT_MESSAGE: &str = "Friend request sent!";

/// Body text for the level-up popup: the level line plus a line per granted
/// reward component.
pub fn reward_popup_text(pending: &PendingReward) -> String {
    let mut lines = vec![format!("You reached level {}!", pending.level)];
    if let Some(coins) = pending.reward.coins {
        lines.push(format!("+{coins} coins"));
    }
    if let Some(avatar) = &pending.reward.avatar {
        lines.push(format!("New avatar: {avatar}"));
    }
    lines.join("\n")
}
