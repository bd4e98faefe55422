//! Build and generation parameters.

use serde::{Deserialize, Serialize};

use crate::error::{ChainError, Result};

/// Parameters of the parallel chain build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct BuildConfig {
	/// Number of tokenization workers. `None` uses the number of logical CPUs.
	pub concurrency: Option<usize>,
}

impl BuildConfig {
	/// Returns a builder initialised with [`BuildConfig::default`].
	pub fn builder() -> BuildConfigBuilder {
		BuildConfigBuilder::default()
	}

	/// Resolved worker count (always >= 1).
	pub fn workers(&self) -> usize {
		self.concurrency.unwrap_or_else(num_cpus::get).max(1)
	}

	/// Validates the configuration.
	///
	/// # Errors
	/// Returns [`ChainError::InvalidConfig`] if an explicit concurrency of zero is set.
	pub fn validate(&self) -> Result<()> {
		if self.concurrency == Some(0) {
			return Err(ChainError::InvalidConfig("concurrency must be greater than zero".into()));
		}
		Ok(())
	}
}

/// Builder for [`BuildConfig`].
#[derive(Debug, Clone, Default)]
pub struct BuildConfigBuilder {
	cfg: BuildConfig,
}

impl BuildConfigBuilder {
	/// Fixes the number of tokenization workers.
	pub fn concurrency(mut self, workers: usize) -> Self {
		self.cfg.concurrency = Some(workers);
		self
	}

	/// Validates and returns the configuration.
	pub fn build(self) -> Result<BuildConfig> {
		self.cfg.validate()?;
		Ok(self.cfg)
	}
}

/// Parameters of the retry-on-violation random walk.
///
/// # Invariants
/// - `1 <= min_len <= max_len`
/// - `max_attempts >= 1`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GenerationConfig {
	/// Shortest accepted sequence (inclusive).
	pub min_len: usize,
	/// Longest accepted sequence (inclusive). A walk that grows past it is thrown away.
	pub max_len: usize,
	/// A token with this many successors or fewer ends the walk.
	pub branch_cutoff: usize,
	/// Number of walks started before giving up with `GenerationExhausted`.
	pub max_attempts: usize,
}

impl Default for GenerationConfig {
	fn default() -> Self {
		Self {
			min_len: 4,
			max_len: 10,
			branch_cutoff: 2,
			max_attempts: 10_000,
		}
	}
}

impl GenerationConfig {
	/// Returns a builder initialised with [`GenerationConfig::default`].
	pub fn builder() -> GenerationConfigBuilder {
		GenerationConfigBuilder::default()
	}

	/// Validates the invariants required by the generator.
	pub fn validate(&self) -> Result<()> {
		if self.min_len == 0 {
			return Err(ChainError::InvalidConfig("min_len must be greater than zero".into()));
		}
		if self.min_len > self.max_len {
			return Err(ChainError::InvalidConfig(format!(
				"min_len ({}) must not exceed max_len ({})",
				self.min_len, self.max_len
			)));
		}
		if self.max_attempts == 0 {
			return Err(ChainError::InvalidConfig("max_attempts must be greater than zero".into()));
		}
		Ok(())
	}
}

/// Builder for [`GenerationConfig`].
#[derive(Debug, Clone, Default)]
pub struct GenerationConfigBuilder {
	cfg: GenerationConfig,
}

impl GenerationConfigBuilder {
	pub fn min_len(mut self, value: usize) -> Self {
		self.cfg.min_len = value;
		self
	}

	pub fn max_len(mut self, value: usize) -> Self {
		self.cfg.max_len = value;
		self
	}

	pub fn branch_cutoff(mut self, value: usize) -> Self {
		self.cfg.branch_cutoff = value;
		self
	}

	pub fn max_attempts(mut self, value: usize) -> Self {
		self.cfg.max_attempts = value;
		self
	}

	/// Validates and returns the configuration.
	pub fn build(self) -> Result<GenerationConfig> {
		self.cfg.validate()?;
		Ok(self.cfg)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_walk_bounds() {
		let cfg = GenerationConfig::default();
		assert_eq!(cfg.min_len, 4);
		assert_eq!(cfg.max_len, 10);
		assert_eq!(cfg.branch_cutoff, 2);
		assert!(cfg.validate().is_ok());
	}

	#[test]
	fn validate_rejects_inverted_bounds() {
		let err = GenerationConfig::builder()
			.min_len(8)
			.max_len(3)
			.build()
			.expect_err("validation should fail");
		assert!(matches!(err, ChainError::InvalidConfig(message) if message.contains("must not exceed")));
	}

	#[test]
	fn validate_rejects_zero_attempts() {
		let err = GenerationConfig::builder().max_attempts(0).build().expect_err("validation should fail");
		assert!(matches!(err, ChainError::InvalidConfig(_)));
	}

	#[test]
	fn build_config_resolves_workers() {
		let cfg = BuildConfig::builder().concurrency(3).build().expect("valid config");
		assert_eq!(cfg.workers(), 3);
		assert!(BuildConfig::default().workers() >= 1);
		assert!(BuildConfig::builder().concurrency(0).build().is_err());
	}

	#[test]
	fn partial_config_deserializes_with_defaults() {
		let cfg: GenerationConfig = serde_json::from_str(r#"{"max_attempts": 5}"#).expect("valid json");
		assert_eq!(cfg.max_attempts, 5);
		assert_eq!(cfg.max_len, 10);
	}
}
