use std::collections::{HashMap, HashSet};

use serde::Serialize;

/// Mutable side of the chain, filled while the corpus is being read.
///
/// A `ChainStore` holds:
/// - `starters`: the first token of every non-empty line, duplicates kept
/// - `successors`: for each token, every token observed right after it
///
/// Duplicates are the weighting: a successor seen five times after a token
/// is five times more likely to be drawn than one seen once.
///
/// ## Invariants
/// - Every list in `successors` is non-empty (entries are only created by appending)
#[derive(Clone, Debug, Default)]
pub struct ChainStore {
	starters: Vec<String>,
	successors: HashMap<String, Vec<String>>,
}

impl ChainStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records the first token of a line.
	pub fn add_starter(&mut self, token: String) {
		self.starters.push(token);
	}

	/// Records one occurrence of `next` directly following `curr`.
	pub fn add_successor(&mut self, curr: String, next: String) {
		self.successors.entry(curr).or_default().push(next);
	}

	pub fn starter_count(&self) -> usize {
		self.starters.len()
	}

	/// Successors recorded so far for `token` (empty if unknown).
	pub fn successors_of(&self, token: &str) -> &[String] {
		self.successors.get(token).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Merges another store into this one.
	///
	/// Starters are appended; successor lists for the same key are
	/// concatenated, so multiplicities add up.
	///
	/// The builder uses this to join the starter half and the successor
	/// half, each produced by its own aggregator.
	pub fn merge(&mut self, other: Self) {
		self.starters.extend(other.starters);

		for (key, nexts) in other.successors {
			self.successors.entry(key).or_default().extend(nexts);
		}
	}

	/// Freezes the store into a read-only [`Chain`].
	pub fn freeze(self) -> Chain {
		Chain {
			starters: self.starters,
			successors: self.successors,
		}
	}
}

/// A first-order Markov chain over word and punctuation tokens.
///
/// Built once by [`ChainBuilder`](super::builder::ChainBuilder), immutable
/// afterwards. It has no mutators, so it can be shared behind an `Arc`
/// between any number of readers.
#[derive(Clone, Debug)]
pub struct Chain {
	starters: Vec<String>,
	successors: HashMap<String, Vec<String>>,
}

impl Chain {
	pub fn starter_count(&self) -> usize {
		self.starters.len()
	}

	/// All starters, with duplicates, in no particular order.
	pub fn starters(&self) -> &[String] {
		&self.starters
	}

	/// Every token observed after `token`, with duplicates.
	///
	/// Returns an empty slice if `token` was never followed by anything.
	pub fn successors_of(&self, token: &str) -> &[String] {
		self.successors.get(token).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Tokens that have at least one successor.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.successors.keys().map(String::as_str)
	}

	/// `true` when no line contributed a starter.
	pub fn is_empty(&self) -> bool {
		self.starters.is_empty()
	}

	/// Counts describing the chain.
	pub fn stats(&self) -> ChainStats {
		ChainStats {
			starters: self.starters.len(),
			distinct_starters: self.starters.iter().collect::<HashSet<_>>().len(),
			keys: self.successors.len(),
			transitions: self.successors.values().map(Vec::len).sum(),
		}
	}
}

/// Size summary of a [`Chain`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ChainStats {
	/// Starter entries, duplicates included.
	pub starters: usize,
	pub distinct_starters: usize,
	/// Tokens with at least one successor.
	pub keys: usize,
	/// Successor entries over all keys, duplicates included.
	pub transitions: usize,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unknown_token_has_no_successors() {
		let chain = ChainStore::new().freeze();
		assert!(chain.successors_of("nope").is_empty());
		assert!(chain.is_empty());
	}

	#[test]
	fn duplicates_are_kept() {
		let mut store = ChainStore::new();
		store.add_starter("a".into());
		store.add_starter("a".into());
		store.add_successor("a".into(), "b".into());
		store.add_successor("a".into(), "b".into());
		store.add_successor("a".into(), "c".into());

		assert_eq!(store.starter_count(), 2);
		assert_eq!(store.successors_of("a"), ["b", "b", "c"]);
	}

	#[test]
	fn merge_adds_multiplicities() {
		let mut left = ChainStore::new();
		left.add_starter("x".into());
		left.add_successor("x".into(), "y".into());

		let mut right = ChainStore::new();
		right.add_starter("x".into());
		right.add_successor("x".into(), "z".into());
		right.add_successor("y".into(), "x".into());

		left.merge(right);
		let chain = left.freeze();

		assert_eq!(chain.starters(), ["x", "x"]);
		assert_eq!(chain.successors_of("x"), ["y", "z"]);
		assert_eq!(chain.successors_of("y"), ["x"]);
		assert_eq!(
			chain.stats(),
			ChainStats { starters: 2, distinct_starters: 1, keys: 2, transitions: 3 }
		);
	}
}
