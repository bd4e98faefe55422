use log::{trace, warn};
use rand::Rng;
use rand::seq::IndexedRandom;

use super::chain::Chain;
use crate::config::GenerationConfig;
use crate::error::{ChainError, Result};

/// Samples bounded-length token sequences from a [`Chain`].
///
/// # Responsibilities
/// - Pick a uniformly random starter (duplicates weight the draw)
/// - Walk successors, each step a uniform draw over the successor list
/// - Stop at low-branching tokens, throw away walks that are too short or too long
///
/// A thrown-away walk restarts from a fresh starter. After `max_attempts`
/// walks without a result, generation fails with `GenerationExhausted`.
#[derive(Clone, Debug)]
pub struct SequenceGenerator<'a> {
	chain: &'a Chain,
	cfg: GenerationConfig,
}

impl<'a> SequenceGenerator<'a> {
	/// Creates a generator over `chain`.
	///
	/// # Errors
	/// Returns `InvalidConfig` if `cfg` does not validate.
	pub fn new(chain: &'a Chain, cfg: GenerationConfig) -> Result<Self> {
		cfg.validate()?;
		Ok(Self { chain, cfg })
	}

	pub fn config(&self) -> &GenerationConfig {
		&self.cfg
	}

	/// Generates one sequence using the thread-local RNG.
	pub fn generate(&self) -> Result<Vec<String>> {
		self.generate_with(&mut rand::rng())
	}

	/// Generates one sequence using `rng`.
	///
	/// # Returns
	/// - `Ok(tokens)` with `min_len <= tokens.len() <= max_len`
	/// - `Err(EmptyModel)` if the chain has no starters
	/// - `Err(GenerationExhausted)` if no walk fit the bounds within `max_attempts`
	pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<String>> {
		if self.chain.is_empty() {
			return Err(ChainError::EmptyModel);
		}

		for attempt in 1..=self.cfg.max_attempts {
			if let Some(sequence) = self.walk(rng) {
				return Ok(sequence);
			}
			trace!("walk {attempt} out of bounds, restarting");
		}

		warn!("gave up generating after {} walks", self.cfg.max_attempts);
		Err(ChainError::GenerationExhausted { attempts: self.cfg.max_attempts })
	}

	/// One walk from a random starter. `None` means the walk must be discarded.
	fn walk<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Vec<String>> {
		let mut curr = self.chain.starters().choose(rng)?.as_str();
		let mut sequence = vec![curr.to_owned()];

		loop {
			// Overshooting walks are discarded, never truncated
			if sequence.len() > self.cfg.max_len {
				return None;
			}

			let choices = self.chain.successors_of(curr);
			if choices.len() <= self.cfg.branch_cutoff {
				break;
			}

			curr = choices.choose(rng)?.as_str();
			sequence.push(curr.to_owned());
		}

		(sequence.len() >= self.cfg.min_len).then_some(sequence)
	}
}

impl Chain {
	/// Generates one sequence with the default [`GenerationConfig`].
	pub fn generate_sequence(&self) -> Result<Vec<String>> {
		SequenceGenerator::new(self, GenerationConfig::default())?.generate()
	}
}
