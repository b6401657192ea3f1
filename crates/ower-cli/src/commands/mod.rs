//! Command implementations for the ower CLI

mod cache;
mod catalog;
mod player;

pub use cache::{list as list_cache, run_loop as run_cleanup_loop, sweep as sweep_cache};
pub use catalog::{list_heroes, list_types};
pub use player::{hero as show_hero, profile as show_profile, rankings as show_rankings};
