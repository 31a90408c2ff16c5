use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc;
use std::thread;

use log::warn;

use serde::{Deserialize, Serialize};
use super::bag::{BagCounter, WeightedBag};

/// Context holding the number of words per name.
pub const PARTS: &str = "parts";
/// Context holding the character length of a word.
pub const NAME_LEN: &str = "name_len";
/// Context holding the first character of a word.
pub const INITIAL: &str = "initial";

/// Learning phase of a [`Chain`].
///
/// Accumulates raw occurrence counts for the three structural contexts and
/// for every character-to-character transition. Consumed by [`ChainBuilder::build`].
///
/// # Responsibilities
/// - Split names into words and count them
/// - Merge with another builder (parallel learning support)
#[derive(Clone, Debug, Default)]
pub struct ChainBuilder {
	parts: BagCounter<usize>,
	name_len: BagCounter<usize>,
	initial: BagCounter<char>,
	transitions: HashMap<char, BagCounter<char>>,
}

impl ChainBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Counts every name of `names` sequentially.
	pub fn from_names<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut builder = Self::new();
		for name in names {
			builder.add_name(name.as_ref());
		}
		builder
	}

	/// Counts `names` in parallel and merges the partial builders.
	///
	/// # Behavior
	/// - Splits the names into chunks (based on CPU cores * factor).
	/// - Spawns a scoped thread per chunk building a partial builder.
	/// - Merges all partial builders by addition.
	///
	/// The result is identical to [`ChainBuilder::from_names`].
	pub fn from_names_parallel<S: AsRef<str> + Sync>(names: &[S]) -> Self {
		if names.is_empty() {
			return Self::new();
		}

		let chunks = num_cpus::get() * 8;
		let chunk_size = names.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for chunk in names.chunks(chunk_size) {
				let tx = tx.clone();
				scope.spawn(move || {
					let partial = Self::from_names(chunk);
					// The receiver outlives the scope
					let _ = tx.send(partial);
				});
			}
		});
		drop(tx);

		let mut builder = Self::new();
		for partial in rx.iter() {
			builder.merge(&partial);
		}
		builder
	}

	/// Records one name.
	///
	/// The name is split on runs of ASCII whitespace. Its word count goes to
	/// `parts`; each word records its character length, its initial and
	/// every adjacent `(previous, next)` character pair.
	///
	/// Returns `false` (and records nothing) when the name holds no word.
	pub fn add_name(&mut self, name: &str) -> bool {
		let words: Vec<&str> = name.split_ascii_whitespace().collect();
		if words.is_empty() {
			warn!("skipping corpus entry without any word: {name:?}");
			return false;
		}

		self.parts.add(words.len());
		for word in words {
			let mut chars = word.chars();
			// Non-empty by construction of split_ascii_whitespace
			let Some(mut last_char) = chars.next() else { continue };

			self.name_len.add(word.chars().count());
			self.initial.add(last_char);

			for c in chars {
				self.transitions.entry(last_char).or_default().add(c);
				last_char = c;
			}
		}
		true
	}

	/// Merges another builder into this one by adding every count.
	pub fn merge(&mut self, other: &Self) {
		self.parts.merge(&other.parts);
		self.name_len.merge(&other.name_len);
		self.initial.merge(&other.initial);
		for (key, counter) in &other.transitions {
			self.transitions.entry(*key).or_default().merge(counter);
		}
	}

	pub fn is_empty(&self) -> bool {
		self.parts.is_empty()
	}

	/// Applies the scaling transform to every bag and freezes the model.
	pub fn build(self) -> Chain {
		Chain {
			parts: self.parts.freeze(),
			name_len: self.name_len.freeze(),
			initial: self.initial.freeze(),
			transitions: self
				.transitions
				.into_iter()
				.map(|(key, counter)| (key, counter.freeze()))
				.collect(),
		}
	}
}

/// Frozen transition model of one variant.
///
/// # Invariants
/// - Every bag is scaled and its total matches its weights
/// - A character absent from `transitions` was never seen before another character
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Chain {
	parts: WeightedBag<usize>,
	name_len: WeightedBag<usize>,
	initial: WeightedBag<char>,
	transitions: BTreeMap<char, WeightedBag<char>>,
}

impl Chain {
	pub fn parts(&self) -> &WeightedBag<usize> {
		&self.parts
	}

	pub fn name_len(&self) -> &WeightedBag<usize> {
		&self.name_len
	}

	pub fn initial(&self) -> &WeightedBag<char> {
		&self.initial
	}

	/// Successor bag of `c`, `None` if `c` never preceded another character.
	pub fn successors(&self, c: char) -> Option<&WeightedBag<char>> {
		self.transitions.get(&c)
	}

	/// Number of character contexts.
	pub fn context_count(&self) -> usize {
		self.transitions.len()
	}

	/// True when nothing was learned.
	pub fn is_empty(&self) -> bool {
		self.parts.is_empty()
	}
}
