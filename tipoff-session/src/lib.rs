/// Friends screen: directory loading and the four friend operations.
pub mod friends;
/// User-facing message text for expected outcomes.
pub mod messages;
/// Profile screen: stats, XP progress, and the reward claim flow.
pub mod profile;
