//! # sz-cases — Ticket Engine
//!
//! Case opening. Every box splits the tickets `1..=100000` between its
//! items; a draw picks one ticket uniformly and the owning item is won.
//!
//! ```text
//! open(box, n) ──► n × draw_ticket ──► resolve_ticket ──► inventory
//! battle(box)  ──► 3 × (player, bot) ──► compare sums ──► award
//! ```
//!
//! Rarity is display only and never takes part in resolution.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod inventory;
pub mod item;
pub mod session;
pub mod ticket;

pub use catalog::*;
pub use config::*;
pub use engine::*;
pub use inventory::*;
pub use item::*;
pub use session::*;
pub use ticket::*;
