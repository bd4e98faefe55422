/// Joins tokens into display text.
///
/// Tokens are separated by a single space, except single-character
/// punctuation (neither a letter nor a digit), which sticks to the text
/// before it: `["hello", ",", "world", "!"]` → `"hello, world!"`.
pub fn render<S: AsRef<str>>(tokens: &[S]) -> String {
	let mut text = String::new();

	for token in tokens {
		let token = token.as_ref();
		if !text.is_empty() && !is_punctuation(token) {
			text.push(' ');
		}
		text.push_str(token);
	}

	text
}

fn is_punctuation(token: &str) -> bool {
	let mut chars = token.chars();
	match (chars.next(), chars.next()) {
		(Some(c), None) => !c.is_alphabetic() && !c.is_numeric(),
		_ => false,
	}
}
