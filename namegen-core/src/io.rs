use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{self, Component, Path, PathBuf};
use std::time::SystemTime;

/// Extension of corpus files (one name per line).
pub(crate) const CORPUS_EXTENSION: &str = "dat";
/// Extension of cached, already built variants.
pub(crate) const CACHE_EXTENSION: &str = "bin";

/// Reads a corpus file and returns its non-blank lines, trimmed.
pub(crate) fn read_corpus<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let contents = fs::read_to_string(filename)?;
	Ok(contents
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(str::to_owned)
		.collect())
}

/// Path of the cache file sitting next to a corpus file.
///
/// Example:
/// `data/elf-male.dat` → `data/elf-male.bin`
pub(crate) fn cache_path<P: AsRef<Path>>(corpus_path: P) -> io::Result<PathBuf> {
	let corpus_path = corpus_path.as_ref();
	if corpus_path.file_stem().is_none() {
		return Err(io::Error::new(io::ErrorKind::InvalidInput, "Corpus path has no filename"));
	}
	Ok(corpus_path.with_extension(CACHE_EXTENSION))
}

/// Path of the corpus file for `label` inside `dir`.
///
/// Returns `None` unless `label` is one plain file name component, so a
/// label never resolves outside `dir`.
pub(crate) fn corpus_path(dir: &Path, label: &str) -> Option<PathBuf> {
	if label.contains(path::is_separator) {
		return None;
	}
	let mut components = Path::new(label).components();
	match (components.next(), components.next()) {
		(Some(Component::Normal(_)), None) => Some(dir.join(format!("{label}.{CORPUS_EXTENSION}"))),
		_ => None,
	}
}

/// True when `cache` is a file at least as recent as `corpus`.
///
/// A cache without its corpus is still usable.
pub(crate) fn is_fresh_cache(cache: &Path, corpus: &Path) -> bool {
	fn modified(p: &Path) -> Option<SystemTime> {
		fs::metadata(p).and_then(|m| m.modified()).ok()
	}

	if !cache.is_file() {
		return false;
	}
	match (modified(cache), modified(corpus)) {
		(Some(cache_time), Some(corpus_time)) => cache_time >= corpus_time,
		(Some(_), None) => !corpus.exists(),
		_ => false,
	}
}

/// Variant label of a corpus file: its name without extension.
///
/// Examples:
/// - `"./data/elf-male.dat"` → `"elf-male"`
/// - `"dwarf.dat"` → `"dwarf"`
pub(crate) fn label_of<P: AsRef<Path>>(corpus_path: P) -> io::Result<String> {
	let stem = corpus_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().into_owned())
}

/// Lists the files of `dir` (not recursive) having the given extension.
///
/// Returns full paths, sorted.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(OsStr::new(extension)) {
			files.push(path);
		}
	}

	files.sort();
	Ok(files)
}
