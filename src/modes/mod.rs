pub mod human;

pub use human::{GameSummary, HumanMode, join_update_engine};
