//! Cards, dice, payout tables and game rules. No IO in this crate.

pub mod cards;
pub mod config;
pub mod deck;
pub mod dice;
pub mod error;
pub mod outcome;
pub mod payout;
pub mod pool;
pub mod rng;
pub mod source;

pub use cards::*;
pub use config::*;
pub use deck::*;
pub use dice::*;
pub use error::*;
pub use outcome::*;
pub use payout::*;
pub use pool::*;
pub use rng::*;
pub use source::*;
