//! Round engine, strategies, Monte-Carlo batches and reports for the card and
//! dice games defined in `wagerlab-core`.

mod batch;
mod config;
mod dice_game;
mod engine;
mod error;
mod report;
mod stats;
mod strategy;

pub use batch::*;
pub use config::*;
pub use dice_game::*;
pub use engine::*;
pub use error::*;
pub use report::*;
pub use stats::*;
pub use strategy::*;
