//! # sz-stage — Reveal stages
//!
//! Engines settle instantly; the caller sees the result through a staged
//! reveal. This crate defines the stages every game emits, the timing that
//! spaces them out, and the [`Reveal`] timeline that replays them in order.
//!
//! ## Contract
//!
//! - The ORDER of stages is fixed by the engine that produced them
//! - Delays are presentation hints; fast-forward shortens reel stops only
//! - Committed state never depends on how the reveal is consumed

pub mod event;
pub mod reveal;
pub mod stage;
pub mod timing;
pub mod trace;

pub use event::*;
pub use reveal::*;
pub use stage::*;
pub use timing::*;
pub use trace::*;
