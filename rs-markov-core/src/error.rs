//! Error type shared by the chain builder and the sequence generator.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type used throughout the crate.
pub type Result<T, E = ChainError> = std::result::Result<T, E>;

/// Failures surfaced while building a chain or sampling from it.
#[derive(Debug, Error)]
pub enum ChainError {
	/// The corpus could not be opened or streamed. The build is aborted and
	/// no chain is returned.
	#[error("failed to read corpus {path:?}: {source}")]
	CorpusRead {
		/// Underlying I/O error.
		source: io::Error,
		/// Corpus path, when the corpus came from a file.
		path: Option<PathBuf>,
	},

	/// Generation was requested on a chain without starters, or a build
	/// produced none.
	#[error("the model is empty: no starter tokens available")]
	EmptyModel,

	/// The retry loop did not produce a sequence within bounds.
	#[error("no sequence within length bounds after {attempts} attempts")]
	GenerationExhausted {
		/// Number of walks started before giving up.
		attempts: usize,
	},

	/// A configuration value failed validation.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}

impl ChainError {
	/// Wraps an I/O error raised while reading a corpus.
	pub fn corpus_read(source: io::Error, path: Option<PathBuf>) -> Self {
		Self::CorpusRead { source, path }
	}
}
