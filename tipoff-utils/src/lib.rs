/// Friend-code normalization and validation helpers.
pub mod friend_code;
/// Pure statistics helpers over game-history scores.
pub mod stats;
