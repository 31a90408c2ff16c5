//! Markov-chain name generation library.
//!
//! Learns character-transition statistics from example names and samples new
//! names from them. A model holds three levels of statistics:
//! - Word count per name
//! - Character count per word
//! - Character to character transitions
//!
//! Raw counts are rescaled by `floor(count ^ 1.3)` once learning is over, so
//! common patterns dominate while rare ones stay possible.
//!
//! The [`Registry`] keeps one model per labeled variant (e.g. `elf-male`).

/// Statistical model: weighted bags, transition chain and sampler.
pub mod model;

/// Variant registry and corpus loading.
pub mod registry;

/// Error type shared by the crate.
pub mod error;

/// Corpus file reading, label validation and cache freshness checks.
pub(crate) mod io;

pub use error::{NameGenError, Result};
pub use model::chain::{Chain, ChainBuilder};
pub use model::options::{GenerateOptions, MissingContext};
pub use model::sampler::NameSampler;
pub use registry::{Registry, Variant};
