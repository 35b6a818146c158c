pub mod friends;
pub mod games;
pub mod profiles;
pub mod rewards;
