//! # sz-core — Shared outcome primitives
//!
//! Everything the three outcome engines have in common:
//!
//! - [`Credits`]: exact money in minor units
//! - [`Declined`]: refused gameplay commands (normal outcomes, not failures)
//! - [`SzError`]: configuration and IO failures
//! - [`GameRng`]: seedable ChaCha RNG so every settlement can be replayed
//! - [`WeightedSampler`]: weighted draw with a per-draw exclusion set
//! - [`config`]: JSON/YAML config file loading

pub mod config;
pub mod credits;
pub mod error;
pub mod rng;
pub mod sampler;

pub use config::{ConfigFormat, load_config, parse_config};
pub use credits::Credits;
pub use error::{Declined, Outcome, SzError, SzResult};
pub use rng::GameRng;
pub use sampler::WeightedSampler;
