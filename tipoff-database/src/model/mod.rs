pub mod leveling;
pub mod profile;
pub mod reward;
