use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn temp_workspace() -> TempDir {
	tempfile::tempdir().expect("create tempdir")
}

/// Every word has several successors; `end` has none.
fn branching_corpus() -> String {
	(0..6)
		.flat_map(|i| (0..6).map(move |j| format!("w{i} w{j} w{} end\n", (i + j) % 6)))
		.collect()
}

#[test]
fn prints_requested_number_of_json_sequences() {
	let workspace = temp_workspace();
	let corpus = workspace.path().join("corpus.txt");
	fs::write(&corpus, branching_corpus()).expect("write corpus");

	let output = Command::cargo_bin("rs-markov-cli")
		.expect("binary exists")
		.arg(&corpus)
		.args(["-n", "5", "--seed", "9", "--jobs", "2", "--json"])
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let parsed: Value = serde_json::from_slice(&output).expect("valid JSON");
	let sequences = parsed.as_array().expect("array of sequences");
	assert_eq!(sequences.len(), 5);
	for sequence in sequences {
		let len = sequence.as_array().expect("token array").len();
		assert!((4..=10).contains(&len), "bad length {len}");
	}
}

#[test]
fn same_seed_prints_same_text() {
	let workspace = temp_workspace();
	let corpus = workspace.path().join("corpus.txt");
	fs::write(&corpus, branching_corpus()).expect("write corpus");

	let run = || {
		Command::cargo_bin("rs-markov-cli")
			.expect("binary exists")
			.arg(&corpus)
			.args(["-n", "3", "--seed", "123"])
			.assert()
			.success()
			.get_output()
			.stdout
			.clone()
	};
	assert_eq!(run(), run());
}

#[test]
fn stats_reports_counts() {
	let workspace = temp_workspace();
	let corpus = workspace.path().join("corpus.txt");
	fs::write(&corpus, "hello world .\nhello there !\n").expect("write corpus");

	let output = Command::cargo_bin("rs-markov-cli")
		.expect("binary exists")
		.arg(&corpus)
		.arg("--stats")
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let stats: Value = serde_json::from_slice(&output).expect("valid JSON");
	assert_eq!(stats["starters"], 2);
	assert_eq!(stats["keys"], 3);
}

#[test]
fn missing_corpus_fails() {
	let workspace = temp_workspace();
	Command::cargo_bin("rs-markov-cli")
		.expect("binary exists")
		.arg(workspace.path().join("absent.txt"))
		.assert()
		.failure()
		.stderr(predicate::str::contains("failed to read corpus"));
}

#[test]
fn degenerate_corpus_reports_exhaustion() {
	let workspace = temp_workspace();
	let corpus = workspace.path().join("corpus.txt");
	fs::write(&corpus, "alpha beta gamma\n").expect("write corpus");

	Command::cargo_bin("rs-markov-cli")
		.expect("binary exists")
		.arg(&corpus)
		.args(["--max-attempts", "25", "-q"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("after 25 attempts"));
}
