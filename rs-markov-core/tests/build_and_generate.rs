use std::fs;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rs_markov_core::{
	BuildConfig, ChainBuilder, ChainError, GenerationConfig, SequenceGenerator, render,
};

const CORPUS: &str = "\
o gato subiu no telhado .
o gato desceu do muro !
o cachorro subiu no sofá .
o cachorro latiu para o gato ?
a menina viu o gato no telhado .
a menina viu o cachorro no muro !
o muro caiu no chão .
o sofá é do cachorro , não do gato .
";

fn write_corpus(contents: &str) -> (tempfile::TempDir, PathBuf) {
	let dir = tempfile::tempdir().expect("create tempdir");
	let path = dir.path().join("chat.txt");
	fs::write(&path, contents).expect("write corpus");
	(dir, path)
}

#[test]
fn builds_from_file_and_generates_valid_walks() {
	let (_dir, path) = write_corpus(CORPUS);
	let cfg = BuildConfig::builder().concurrency(3).build().expect("valid config");
	let chain = ChainBuilder::new(cfg).build_from_path(&path).expect("build");

	assert_eq!(chain.starter_count(), 8);
	assert!(chain.successors_of("o").len() > 2);

	let generator = SequenceGenerator::new(&chain, GenerationConfig::default()).expect("generator");
	let mut rng = StdRng::seed_from_u64(2024);
	for _ in 0..100 {
		match generator.generate_with(&mut rng) {
			Ok(tokens) => {
				assert!((4..=10).contains(&tokens.len()));
				for pair in tokens.windows(2) {
					assert!(chain.successors_of(&pair[0]).contains(&pair[1]));
				}
				assert!(!render(tokens.as_slice()).starts_with(' '));
			}
			Err(ChainError::GenerationExhausted { .. }) => {}
			Err(other) => panic!("unexpected error: {other}"),
		}
	}
}

#[test]
fn missing_file_is_a_corpus_read_error() {
	let dir = tempfile::tempdir().expect("create tempdir");
	let path = dir.path().join("absent.txt");

	let err = ChainBuilder::default().build_from_path(&path).expect_err("file is missing");
	match err {
		ChainError::CorpusRead { path: Some(reported), .. } => assert_eq!(reported, path),
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn blank_file_is_an_empty_model() {
	let (_dir, path) = write_corpus("\n\n   \n");
	let err = ChainBuilder::default().build_from_path(&path).expect_err("no starters");
	assert!(matches!(err, ChainError::EmptyModel));
}

#[test]
fn stats_count_duplicates() {
	let (_dir, path) = write_corpus("hello world .\nhello there !\n");
	let stats = ChainBuilder::default().build_from_path(&path).expect("build").stats();

	assert_eq!(stats.starters, 2);
	assert_eq!(stats.distinct_starters, 1);
	assert_eq!(stats.keys, 3);
	assert_eq!(stats.transitions, 4);
}
