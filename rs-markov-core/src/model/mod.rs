//! Markov chain construction and sampling.
//!
//! - `Tokenizer`: splits a line into word and punctuation tokens
//! - `ChainStore` / `Chain`: the model, mutable while building, frozen afterwards
//! - `ChainBuilder`: parallel corpus ingestion
//! - `SequenceGenerator`: bounded-length random walks over a `Chain`
//! - `render`: turns a token sequence into display text

/// Line tokenizer (letter runs, then other non-whitespace runs).
pub mod tokenizer;

/// Starter pool and successor lists.
///
/// Sampling weight is carried by duplicates, there is no probability field.
pub mod chain;

/// Parallel corpus-to-chain builder.
///
/// A bounded worker pool tokenizes lines and two single-writer aggregator
/// threads collect the results.
pub mod builder;

/// Retry-on-violation random walk.
pub mod generator;

pub mod render;
