use std::io::BufRead;
use std::path::Path;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;
use std::time::Instant;

use log::{debug, info};

use super::chain::{Chain, ChainStore};
use super::tokenizer::Tokenizer;
use crate::config::BuildConfig;
use crate::error::{ChainError, Result};
use crate::io::open_corpus;

/// Builds a [`Chain`] from a line-oriented corpus using bounded parallelism.
///
/// # Behavior
/// - The calling thread reads lines, trims them and skips empty ones.
/// - Lines go through a bounded queue (capacity = worker count) to a fixed
///   pool of tokenization workers. A full queue blocks the reader.
/// - Each worker emits one starter event per line and one bigram event per
///   adjacent token pair, in line order.
/// - Two aggregator threads own the starter list and the successor map
///   respectively. They are the only writers, so nothing is locked.
/// - The chain is returned once every worker and both aggregators have
///   terminated. A read error returns `CorpusRead` and no chain.
#[derive(Clone, Debug, Default)]
pub struct ChainBuilder {
	cfg: BuildConfig,
	tokenizer: Tokenizer,
}

impl ChainBuilder {
	pub fn new(cfg: BuildConfig) -> Self {
		Self { cfg, tokenizer: Tokenizer::new() }
	}

	pub fn config(&self) -> &BuildConfig {
		&self.cfg
	}

	/// Opens `path` and builds a chain from it.
	///
	/// Read errors carry the corpus path.
	pub fn build_from_path<P: AsRef<Path>>(&self, path: P) -> Result<Chain> {
		let path = path.as_ref();
		let reader = open_corpus(path)?;
		self.build(reader).map_err(|err| match err {
			ChainError::CorpusRead { source, path: None } => ChainError::corpus_read(source, Some(path.to_path_buf())),
			other => other,
		})
	}

	/// Reads `reader` to the end and builds the chain.
	///
	/// # Errors
	/// - `InvalidConfig` if the build configuration is invalid
	/// - `CorpusRead` on the first I/O error from `reader`
	/// - `EmptyModel` if no line produced a token
	pub fn build<R: BufRead>(&self, reader: R) -> Result<Chain> {
		self.cfg.validate()?;
		let workers = self.cfg.workers();
		let started = Instant::now();
		debug!("building chain with {workers} tokenization workers");

		let (line_tx, line_rx) = mpsc::sync_channel::<String>(workers);
		let (starter_tx, starter_rx) = mpsc::sync_channel::<String>(workers);
		let (bigram_tx, bigram_rx) = mpsc::sync_channel::<(String, String)>(workers);
		let line_rx = Mutex::new(line_rx);

		let (read_result, starters, successors) = thread::scope(|scope| {
			let starters = scope.spawn(move || {
				let mut store = ChainStore::new();
				for token in starter_rx {
					store.add_starter(token);
				}
				store
			});

			let successors = scope.spawn(move || {
				let mut store = ChainStore::new();
				for (curr, next) in bigram_rx {
					store.add_successor(curr, next);
				}
				store
			});

			for _ in 0..workers {
				let starter_tx = starter_tx.clone();
				let bigram_tx = bigram_tx.clone();
				let line_rx = &line_rx;
				let tokenizer = &self.tokenizer;
				scope.spawn(move || worker(tokenizer, line_rx, &starter_tx, &bigram_tx));
			}
			// Only workers hold event senders now, so the aggregators stop when the last worker exits
			drop(starter_tx);
			drop(bigram_tx);

			// Dropping the line sender on return lets the workers drain and exit
			let read_result = submit_lines(reader, line_tx);

			let starters = starters.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic));
			let successors = successors.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic));
			(read_result, starters, successors)
		});

		read_result?;

		let mut store = starters;
		store.merge(successors);
		let chain = store.freeze();
		if chain.is_empty() {
			return Err(ChainError::EmptyModel);
		}

		let stats = chain.stats();
		info!(
			"took {} ms to build markov chain ({} starters, {} keys, {} transitions)",
			started.elapsed().as_millis(),
			stats.starters,
			stats.keys,
			stats.transitions
		);
		Ok(chain)
	}
}

/// Builds a chain from `reader` with the default configuration.
pub fn build_chain<R: BufRead>(reader: R) -> Result<Chain> {
	ChainBuilder::default().build(reader)
}

/// Streams trimmed, non-empty lines into the worker queue.
///
/// Invalid UTF-8 is replaced rather than rejected. Stops at the first I/O error.
fn submit_lines<R: BufRead>(mut reader: R, lines: SyncSender<String>) -> Result<()> {
	let mut buf = Vec::new();
	loop {
		buf.clear();
		let read = reader.read_until(b'\n', &mut buf).map_err(|err| ChainError::corpus_read(err, None))?;
		if read == 0 {
			return Ok(());
		}

		let line = String::from_utf8_lossy(&buf);
		let line = line.trim();
		if line.is_empty() {
			continue;
		}
		if lines.send(line.to_owned()).is_err() {
			// Every worker is gone, nothing left to feed
			return Ok(());
		}
	}
}

fn worker(
	tokenizer: &Tokenizer,
	lines: &Mutex<Receiver<String>>,
	starters: &SyncSender<String>,
	bigrams: &SyncSender<(String, String)>,
) {
	loop {
		let line = match lines.lock() {
			Ok(rx) => rx.recv(),
			Err(_) => return,
		};
		let Ok(line) = line else { return };

		if !process_line(tokenizer, &line, starters, bigrams) {
			return;
		}
	}
}

/// Emits the events of one line. Returns `false` once an aggregator is gone.
fn process_line(
	tokenizer: &Tokenizer,
	line: &str,
	starters: &SyncSender<String>,
	bigrams: &SyncSender<(String, String)>,
) -> bool {
	let mut tokens = tokenizer.tokens(line);
	let Some(first) = tokens.next() else {
		return true;
	};
	if starters.send(first.to_owned()).is_err() {
		return false;
	}

	let mut curr = first;
	for next in tokens {
		if bigrams.send((curr.to_owned(), next.to_owned())).is_err() {
			return false;
		}
		curr = next;
	}
	true
}
