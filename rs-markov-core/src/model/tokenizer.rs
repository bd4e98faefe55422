use std::sync::OnceLock;

use regex::{Matches, Regex};

/// Letter runs first, then any other non-whitespace run.
const TOKEN_PATTERN: &str = r"(\p{L}+)|(\S+)";

static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

fn token_regex() -> &'static Regex {
	// Should not panic, the pattern is a compile-time constant
	TOKEN_RE.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern is valid"))
}

/// Splits a line into word and punctuation tokens.
///
/// Matching is leftmost-first over two alternatives:
/// 1. a maximal run of Unicode letters
/// 2. otherwise, a maximal run of non-whitespace characters
///
/// Whitespace is never part of a token. Since a letter run stops at the first
/// non-letter, `"world."` yields `"world"` then `"."`, while a run starting with
/// a non-letter such as `"42abc"` stays whole.
///
/// Cloning is cheap, the compiled pattern is shared.
#[derive(Clone, Debug)]
pub struct Tokenizer {
	re: Regex,
}

impl Default for Tokenizer {
	fn default() -> Self {
		Self { re: token_regex().clone() }
	}
}

impl Tokenizer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a lazy iterator over the tokens of `line`, in order.
	///
	/// Calling it again on the same line restarts from the beginning and
	/// yields the same tokens.
	pub fn tokens<'r, 'h>(&'r self, line: &'h str) -> Tokens<'r, 'h> {
		Tokens { matches: self.re.find_iter(line) }
	}
}

/// Iterator returned by [`Tokenizer::tokens`].
#[derive(Debug)]
pub struct Tokens<'r, 'h> {
	matches: Matches<'r, 'h>,
}

impl<'r, 'h> Iterator for Tokens<'r, 'h> {
	type Item = &'h str;

	fn next(&mut self) -> Option<Self::Item> {
		self.matches.next().map(|m| m.as_str())
	}
}
