use std::collections::HashMap;
use std::hash::Hash;

use rand::Rng;

use serde::{Deserialize, Serialize};

/// Exponent of the scaling transform applied to raw counts when a bag is frozen.
pub const SCALE_EXPONENT: f64 = 1.3;

/// Rescales a raw occurrence count: `floor(count ^ 1.3)`.
///
/// Superlinear, so frequent transitions become disproportionately more likely
/// while a count of 1 keeps a weight of 1.
pub fn scale_weight(count: u64) -> u64 {
	(count as f64).powf(SCALE_EXPONENT).floor() as u64
}

/// Raw occurrence counts for one context, filled during the learning phase.
///
/// Conceptually the outgoing edges of a node in the chain, weighted by their
/// number of observations. Once learning is over the counter is consumed by
/// [`BagCounter::freeze`], which produces the read-only [`WeightedBag`].
///
/// ## Invariants
/// - Each recorded count is strictly positive
#[derive(Clone, Debug)]
pub struct BagCounter<T> {
	/// Example: { 'e' => 42, 'a' => 3 }
	counts: HashMap<T, u64>,
}

impl<T> Default for BagCounter<T> {
	fn default() -> Self {
		Self { counts: HashMap::new() }
	}
}

impl<T: Copy + Eq + Hash + Ord> BagCounter<T> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `token`.
	pub fn add(&mut self, token: T) {
		*self.counts.entry(token).or_insert(0) += 1;
	}

	/// Raw count of `token`, 0 when never observed.
	pub fn count(&self, token: &T) -> u64 {
		self.counts.get(token).copied().unwrap_or(0)
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Adds the counts of `other` into this counter.
	///
	/// Counting is commutative, so partial counters built from disjoint
	/// chunks of a corpus merge into the same result as a sequential pass.
	pub fn merge(&mut self, other: &Self) {
		for (token, count) in &other.counts {
			*self.counts.entry(*token).or_insert(0) += *count;
		}
	}

	/// Applies the scaling transform to every count and freezes the result.
	///
	/// Entries are sorted by token so sampling walks them in a fixed order,
	/// independent of hashing.
	pub fn freeze(self) -> WeightedBag<T> {
		let mut entries: Vec<(T, u64)> = self
			.counts
			.into_iter()
			.map(|(token, count)| (token, scale_weight(count)))
			.collect();
		entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));

		let total = entries.iter().map(|(_, weight)| weight).sum();
		WeightedBag { entries, total }
	}
}

/// Frozen weighted multiset of tokens.
///
/// ## Invariants
/// - `total` is the sum of every entry weight
/// - Entries are sorted by token and unique
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WeightedBag<T> {
	entries: Vec<(T, u64)>,
	total: u64,
}

impl<T> Default for WeightedBag<T> {
	fn default() -> Self {
		Self { entries: Vec::new(), total: 0 }
	}
}

impl<T: Copy + Ord> WeightedBag<T> {
	/// Sum of all weights.
	pub fn total(&self) -> u64 {
		self.total
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Scaled weight of `token`, 0 when absent.
	pub fn weight(&self, token: &T) -> u64 {
		self.entries
			.binary_search_by(|(t, _)| t.cmp(token))
			.map(|idx| self.entries[idx].1)
			.unwrap_or(0)
	}

	/// Iterates over `(token, weight)` in token order.
	pub fn iter(&self) -> impl Iterator<Item = (T, u64)> + '_ {
		self.entries.iter().copied()
	}

	/// Draws a token with probability proportional to its weight.
	///
	/// A uniform value is drawn in `[0, total)` and the entries are walked,
	/// accumulating weights, until the running sum exceeds it.
	///
	/// Returns `None` if the bag is empty.
	pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<T> {
		if self.total == 0 {
			return None;
		}

		let r = rng.random_range(0..self.total);
		let mut cumulative = 0u64;
		for (token, weight) in &self.entries {
			cumulative += weight;
			if r < cumulative {
				return Some(*token);
			}
		}

		// Unreachable while `total` matches the entries.
		None
	}
}
