//! Scrape panel front-end: composes the core state machine with the engine.
pub mod config;
mod dashboard;
mod effects;
pub mod ui;

pub use dashboard::Dashboard;
pub use effects::{map_event, EffectRunner};
