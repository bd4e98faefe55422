use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use env_logger::Env;
use log::LevelFilter;
use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_markov_core::{BuildConfig, ChainBuilder, GenerationConfig, SequenceGenerator, render};

/// Builds a Markov chain from a corpus and prints generated sequences.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
	/// Corpus file, one utterance per line
	corpus: PathBuf,

	/// Number of sequences to print
	#[arg(short = 'n', long, default_value_t = 1)]
	count: usize,

	/// Seed for reproducible output
	#[arg(long, value_name = "U64")]
	seed: Option<u64>,

	/// Tokenization workers (defaults to the number of CPUs)
	#[arg(short, long)]
	jobs: Option<usize>,

	/// Walks attempted per sequence before giving up
	#[arg(long)]
	max_attempts: Option<usize>,

	/// Shortest accepted sequence
	#[arg(long)]
	min_len: Option<usize>,

	/// Longest accepted sequence
	#[arg(long)]
	max_len: Option<usize>,

	/// Print token arrays as JSON instead of rendered text
	#[arg(long)]
	json: bool,

	/// Print chain statistics as JSON and exit
	#[arg(long)]
	stats: bool,

	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, action = ArgAction::Count)]
	verbose: u8,

	/// Decrease verbosity (-q, -qq)
	#[arg(short = 'q', long, action = ArgAction::Count)]
	quiet: u8,
}

impl Cli {
	fn generation_config(&self) -> Result<GenerationConfig> {
		let defaults = GenerationConfig::default();
		let cfg = GenerationConfig::builder()
			.min_len(self.min_len.unwrap_or(defaults.min_len))
			.max_len(self.max_len.unwrap_or(defaults.max_len))
			.max_attempts(self.max_attempts.unwrap_or(defaults.max_attempts))
			.build()?;
		Ok(cfg)
	}
}

fn init_logging(verbose: u8, quiet: u8) {
	let level = match (quiet, verbose) {
		(0, 0) => LevelFilter::Warn,
		(0, 1) => LevelFilter::Info,
		(0, 2) => LevelFilter::Debug,
		(0, _) => LevelFilter::Trace,
		_ => LevelFilter::Error,
	};

	let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
	builder.format_timestamp_millis();
	builder.filter_level(level);
	let _ = builder.try_init();
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);

	let build = BuildConfig { concurrency: cli.jobs };
	let generation = cli.generation_config()?;

	let chain = ChainBuilder::new(build)
		.build_from_path(&cli.corpus)
		.with_context(|| format!("building chain from {}", cli.corpus.display()))?;

	if cli.stats {
		println!("{}", serde_json::to_string_pretty(&chain.stats())?);
		return Ok(());
	}

	let generator = SequenceGenerator::new(&chain, generation)?;
	let mut rng = match cli.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};

	let mut sequences = Vec::with_capacity(cli.count);
	for _ in 0..cli.count {
		sequences.push(generator.generate_with(&mut rng)?);
	}

	if cli.json {
		println!("{}", serde_json::to_string(&sequences)?);
	} else {
		for tokens in &sequences {
			println!("{}", render(tokens.as_slice()));
		}
	}

	Ok(())
}
