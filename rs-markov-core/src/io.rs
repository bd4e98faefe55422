use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::{env, io};

use crate::error::{ChainError, Result};

/// Extension of corpus files (one utterance per line).
pub const CORPUS_EXTENSION: &str = "txt";

/// Opens a corpus file for streaming.
///
/// The file is not read into memory; lines are pulled by the builder.
pub fn open_corpus<P: AsRef<Path>>(path: P) -> Result<BufReader<File>> {
	let path = path.as_ref();
	let file = File::open(path).map_err(|err| ChainError::corpus_read(err, Some(path.to_path_buf())))?;
	Ok(BufReader::new(file))
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/chat.txt"` → `"chat"`
/// - `"chat.txt"` → `"chat"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists the stems of all files with a given extension in a directory, sorted.
pub fn list_corpora<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut names = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			names.push(get_filename(&path)?);
		}
	}

	names.sort();
	Ok(names)
}
