//! # sz-wheel — Wheel Engine
//!
//! Single-zero roulette. Bets cover fixed number sets on the board and pay
//! `stake × (multiplier + 1)`; straight bets are limited to zero and an
//! allow-list of numbers. The physical pocket order is presentation only.

pub mod bet;
pub mod config;
pub mod engine;
pub mod pockets;
pub mod session;

pub use bet::*;
pub use config::*;
pub use engine::*;
pub use pockets::*;
pub use session::*;
