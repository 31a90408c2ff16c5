use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rand::Rng;

use serde::{Deserialize, Serialize};

use crate::error::{NameGenError, Result};
use crate::io;
use crate::model::chain::{Chain, ChainBuilder};
use crate::model::options::GenerateOptions;
use crate::model::sampler::NameSampler;

/// A learned variant: its frozen chain and the corpus it was built from.
///
/// The corpus is kept normalised (words joined by one space, lowercase) so
/// generated names can be checked for novelty.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Variant {
	chain: Chain,
	corpus: HashSet<String>,
}

impl Variant {
	/// Builds a variant from names, counting sequentially.
	pub fn from_names<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut builder = ChainBuilder::new();
		let mut corpus = HashSet::new();
		for name in names {
			if builder.add_name(name.as_ref()) {
				corpus.insert(Self::normalize(name.as_ref()));
			}
		}
		Self { chain: builder.build(), corpus }
	}

	/// Builds a variant from names, counting in parallel.
	pub fn from_names_parallel<S: AsRef<str> + Sync>(names: &[S]) -> Self {
		let chain = ChainBuilder::from_names_parallel(names).build();
		let corpus = names
			.iter()
			.map(|name| Self::normalize(name.as_ref()))
			.filter(|name| !name.is_empty())
			.collect();
		Self { chain, corpus }
	}

	pub fn chain(&self) -> &Chain {
		&self.chain
	}

	/// True if `name` belongs to the seed corpus (case-insensitive).
	pub fn contains(&self, name: &str) -> bool {
		self.corpus.contains(&Self::normalize(name))
	}

	/// Number of distinct seed names.
	pub fn corpus_len(&self) -> usize {
		self.corpus.len()
	}

	fn normalize(name: &str) -> String {
		name.split_ascii_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
	}

	/// Draws a name, retrying up to `options.nb_try` times while the result
	/// already belongs to the corpus. The last attempt is returned once the
	/// budget is spent.
	fn generate<R: Rng>(&self, options: &GenerateOptions, rng: &mut R) -> Result<String> {
		let sampler = NameSampler::with_policy(&self.chain, options.missing_context());
		let mut name = sampler.generate(rng)?;

		let mut nb_try = options.nb_try;
		while nb_try > 0 && self.contains(&name) {
			name = sampler.generate(rng)?;
			nb_try -= 1;
		}
		Ok(name)
	}
}

/// Registry of variants, one learned model per label.
///
/// # Responsibilities
/// - Build and store (or replace) a variant from seed names
/// - Generate names for a variant
/// - Load corpus files from disk, with a binary cache of built variants
///
/// Not synchronised: share it behind a `RwLock` (`seed` exclusive,
/// `generate` / `variants` shared).
#[derive(Debug, Default)]
pub struct Registry {
	variants: HashMap<String, Variant>,
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a registry by loading every `.dat` corpus of a directory.
	///
	/// # Behavior
	/// - Lists the `.dat` files directly contained in `dir`.
	/// - Loads each one with [`Registry::load_file`]; the label is the file stem.
	///
	/// # Errors
	/// - Returns an error if `dir` is not a directory.
	/// - Returns an error if a corpus or its cache fails to load.
	pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
		let dir = dir.as_ref();
		if !dir.is_dir() {
			return Err(std::io::Error::new(
				std::io::ErrorKind::InvalidInput,
				format!("expected a directory, got: {}", dir.display()),
			)
			.into());
		}

		let mut registry = Self::new();
		for file in io::list_files(dir, io::CORPUS_EXTENSION)? {
			registry.load_file(&file)?;
		}
		Ok(registry)
	}

	/// Lists the labels of the corpus files available in `dir`, without loading them.
	pub fn list_corpora<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
		let files = io::list_files(dir, io::CORPUS_EXTENSION)?;
		Ok(files.iter().map(io::label_of).collect::<std::io::Result<_>>()?)
	}

	/// Loads one corpus file and registers it under its file stem.
	///
	/// Returns the label.
	///
	/// # Errors
	/// Returns an error if the label is already registered or if file I/O or
	/// decoding fails.
	pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<String> {
		let path = path.as_ref();
		let label = io::label_of(path)?;
		if self.variants.contains_key(&label) {
			return Err(NameGenError::AlreadyLoaded(label));
		}

		let variant = Self::read_variant(path, &label)?;
		self.variants.insert(label.clone(), variant);
		Ok(label)
	}

	/// Loads the corpora of `dir` named by `labels`, all or nothing.
	///
	/// Every variant is read before any is registered, so a failing label
	/// leaves the registry unchanged.
	///
	/// # Errors
	/// - [`NameGenError::InvalidLabel`] if a label is not a plain file name
	/// - [`NameGenError::AlreadyLoaded`] if a label is registered or repeated
	/// - I/O or decoding errors of any corpus
	pub fn load_corpora<P, S>(&mut self, dir: P, labels: &[S]) -> Result<Vec<String>>
	where
		P: AsRef<Path>,
		S: AsRef<str>,
	{
		let dir = dir.as_ref();

		let mut paths: Vec<(String, PathBuf)> = Vec::with_capacity(labels.len());
		for label in labels {
			let label: &str = label.as_ref();
			let path = io::corpus_path(dir, label).ok_or_else(|| NameGenError::InvalidLabel(label.to_owned()))?;
			if self.variants.contains_key(label) || paths.iter().any(|(l, _)| l == label) {
				return Err(NameGenError::AlreadyLoaded(label.to_owned()));
			}
			paths.push((label.to_owned(), path));
		}

		let mut pending = Vec::with_capacity(paths.len());
		for (label, path) in paths {
			let variant = Self::read_variant(&path, &label)?;
			pending.push((label, variant));
		}

		let loaded = pending.iter().map(|(label, _)| label.clone()).collect();
		self.variants.extend(pending);
		Ok(loaded)
	}

	/// Reads a variant from its `.bin` cache when the cache is at least as
	/// recent as the corpus. Otherwise the corpus is learned in parallel and
	/// the cache rewritten; a failed cache write is only logged.
	fn read_variant(path: &Path, label: &str) -> Result<Variant> {
		let cache = io::cache_path(path)?;
		if io::is_fresh_cache(&cache, path) {
			info!("loading variant {label} from {}", cache.display());
			return Ok(postcard::from_bytes(&fs::read(&cache)?)?);
		}

		info!("learning variant {label} from {}", path.display());
		let names = io::read_corpus(path)?;
		let variant = Variant::from_names_parallel(&names);

		let written = postcard::to_stdvec(&variant)
			.map_err(NameGenError::from)
			.and_then(|bytes| fs::write(&cache, bytes).map_err(NameGenError::from));
		if let Err(e) = written {
			warn!("unable to write cache {}: {e}", cache.display());
		}
		Ok(variant)
	}

	/// Builds a model from `names` and stores it under `label`.
	///
	/// Re-seeding a label replaces its previous model entirely.
	pub fn seed<I, S>(&mut self, label: &str, names: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let variant = Variant::from_names(names);
		debug!(
			"seeded variant {label}: {} names, {} character contexts",
			variant.corpus_len(),
			variant.chain.context_count()
		);
		self.variants.insert(label.to_owned(), variant);
	}

	/// Generates a name for `label` with default options and the thread-local RNG.
	///
	/// # Errors
	/// - [`NameGenError::UnknownVariant`] if `label` was never seeded
	/// - [`NameGenError::NoData`] if the variant learned nothing
	pub fn generate(&self, label: &str) -> Result<String> {
		self.generate_with(label, &GenerateOptions::default(), &mut rand::rng())
	}

	/// Generates a name for `label` with explicit options and random source.
	pub fn generate_with<R: Rng>(&self, label: &str, options: &GenerateOptions, rng: &mut R) -> Result<String> {
		let variant = self
			.variants
			.get(label)
			.ok_or_else(|| NameGenError::UnknownVariant(label.to_owned()))?;
		variant.generate(options, rng)
	}

	/// Returns the registered labels, in no particular order.
	pub fn variants(&self) -> Vec<String> {
		self.variants.keys().cloned().collect()
	}

	pub fn variant(&self, label: &str) -> Option<&Variant> {
		self.variants.get(label)
	}

	pub fn len(&self) -> usize {
		self.variants.len()
	}

	pub fn is_empty(&self) -> bool {
		self.variants.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn corpus_membership_ignores_case_and_spacing() {
		let variant = Variant::from_names(["Bilbo  Baggins", "Frodo", "  "]);
		assert!(variant.contains("bilbo baggins"));
		assert!(variant.contains("FRODO"));
		assert!(!variant.contains("Sam"));
		assert_eq!(variant.corpus_len(), 2);
	}

	#[test]
	fn retries_until_name_is_new() {
		let corpus = ["ab", "ba", "aab"];
		let mut registry = Registry::new();
		registry.seed("pair", corpus);

		let mut options = GenerateOptions::new();
		options.nb_try = 50;

		let mut rng = StdRng::seed_from_u64(17);
		for _ in 0..50 {
			let name = registry.generate_with("pair", &options, &mut rng).unwrap();
			assert!(!corpus.contains(&name.as_str()), "{name}");
		}
	}

	#[test]
	fn without_retries_corpus_names_are_returned() {
		let mut registry = Registry::new();
		registry.seed("solo", ["Xi"]);
		let mut rng = StdRng::seed_from_u64(2);
		// Single-path chain: the only possible output is the seed itself
		let name = registry.generate_with("solo", &GenerateOptions::new(), &mut rng).unwrap();
		assert_eq!(name, "Xi");
	}
}
