//! First-order Markov chain text generation.
//!
//! This crate builds a word-level Markov chain from a line-oriented corpus
//! (one utterance per line) and samples short sequences from it:
//! - Tokenization into words and punctuation
//! - Parallel chain construction with bounded concurrency
//! - Length-bounded random walks with frequency-weighted sampling
//! - Rendering of token sequences into display text
//!
//! ```no_run
//! use rs_markov_core::{render, ChainBuilder, BuildConfig};
//!
//! # fn main() -> rs_markov_core::Result<()> {
//! let chain = ChainBuilder::new(BuildConfig::default()).build_from_path("data/chat.txt")?;
//! let tokens = chain.generate_sequence()?;
//! println!("{}", render(tokens.as_slice()));
//! # Ok(())
//! # }
//! ```

/// Build and generation parameters.
pub mod config;

/// Error type and result alias.
pub mod error;

/// Chain model, builder and generator.
pub mod model;

/// Corpus file helpers (opening, listing, naming).
pub mod io;

pub use config::{BuildConfig, GenerationConfig};
pub use error::{ChainError, Result};
pub use model::builder::{build_chain, ChainBuilder};
pub use model::chain::{Chain, ChainStats, ChainStore};
pub use model::generator::SequenceGenerator;
pub use model::render::render;
pub use model::tokenizer::Tokenizer;
