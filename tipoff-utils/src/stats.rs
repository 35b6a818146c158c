/// Best score across a player's game history; 0 for an empty history,
/// matching how friend rows render players who have not played yet.
pub fn best_score(scores: impl IntoIterator<Item = u64>) -> u64 {
    scores.into_iter().max().unwrap_or(0)
}
