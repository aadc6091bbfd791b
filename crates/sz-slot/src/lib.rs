//! # sz-slot — Reel Engine
//!
//! 6×3, ten-payline slot with a BOOK wild/scatter, expanding-symbol free
//! spins and a red/black gamble on the last win.
//!
//! ## Architecture
//!
//! ```text
//! SlotSession
//!     │  (busy while a reveal runs; spin = fast-forward)
//!     v
//! SlotMachine ── SlotConfig (weights, paytable, paylines, bets, bonus, timing)
//!     │
//!     ├── grid::generate / force_books / inject_books / expand
//!     ├── paytable::evaluate
//!     ├── BonusState (start / retrigger / consume / finish)
//!     └── GambleState (open / play / collect)
//!           │
//!           v
//!     SpinOutcome { SlotState, SpinSettlement, Reveal }
//! ```

pub mod bonus;
pub mod config;
pub mod engine;
pub mod gamble;
pub mod grid;
pub mod paytable;
pub mod session;
pub mod symbols;

pub use bonus::*;
pub use config::*;
pub use engine::*;
pub use gamble::*;
pub use grid::{Cell, Grid};
pub use paytable::*;
pub use session::*;
pub use symbols::*;
