use rand::Rng;

use super::chain::{Chain, INITIAL, NAME_LEN, PARTS};
use super::options::MissingContext;
use crate::error::{NameGenError, Result};

/// Draws names from a frozen [`Chain`].
///
/// A name is composed of three nested weighted draws:
/// 1. a word count from `parts`
/// 2. per word, a target length from `name_len` and a first character from `initial`
/// 3. successor characters keyed by the last character until the target length is met
///
/// The sampler only borrows the chain; the random source is passed to every call.
#[derive(Clone, Copy, Debug)]
pub struct NameSampler<'a> {
	chain: &'a Chain,
	missing_context: MissingContext,
}

impl<'a> NameSampler<'a> {
	/// Creates a sampler using the default missing-context policy.
	pub fn new(chain: &'a Chain) -> Self {
		Self::with_policy(chain, MissingContext::default())
	}

	pub fn with_policy(chain: &'a Chain, missing_context: MissingContext) -> Self {
		Self { chain, missing_context }
	}

	/// Generates one name: words joined by a single space.
	///
	/// # Errors
	/// - [`NameGenError::NoData`] if `parts`, `name_len` or `initial` is empty
	/// - [`NameGenError::MissingContext`] under [`MissingContext::Fail`] when a
	///   character has no successor bag
	pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<String> {
		let parts = self.chain.parts().pick(rng).ok_or(NameGenError::NoData(PARTS))?;

		let mut words = Vec::with_capacity(parts);
		for _ in 0..parts {
			words.push(self.generate_word(rng)?);
		}
		Ok(words.join(" "))
	}

	/// Generates one word whose character count equals the drawn length.
	///
	/// The initial character alone satisfies any target below 2, so a word
	/// is never shorter than one character.
	fn generate_word<R: Rng>(&self, rng: &mut R) -> Result<String> {
		let target_len = self.chain.name_len().pick(rng).ok_or(NameGenError::NoData(NAME_LEN))?;
		let mut last_char = self.chain.initial().pick(rng).ok_or(NameGenError::NoData(INITIAL))?;

		let mut word = String::new();
		word.push(last_char);
		let mut len = 1;

		while len < target_len {
			last_char = self.next_char(last_char, rng)?;
			word.push(last_char);
			len += 1;
		}
		Ok(word)
	}

	/// Draws the successor of `last_char`, applying the missing-context policy
	/// when `last_char` has no successor bag.
	fn next_char<R: Rng>(&self, last_char: char, rng: &mut R) -> Result<char> {
		if let Some(c) = self.chain.successors(last_char).and_then(|bag| bag.pick(rng)) {
			return Ok(c);
		}

		match self.missing_context {
			MissingContext::Placeholder(placeholder) => Ok(placeholder),
			MissingContext::Fail => Err(NameGenError::MissingContext(last_char)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::chain::ChainBuilder;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn empty_chain_reports_no_data() {
		let chain = Chain::default();
		let mut rng = StdRng::seed_from_u64(3);
		let err = NameSampler::new(&chain).generate(&mut rng).unwrap_err();
		assert!(matches!(err, NameGenError::NoData("parts")));
	}

	#[test]
	fn word_length_matches_drawn_length() {
		let chain = ChainBuilder::from_names(["Tarabas", "Miridon", "Elessar"]).build();
		let sampler = NameSampler::new(&chain);
		let mut rng = StdRng::seed_from_u64(11);
		for _ in 0..200 {
			let name = sampler.generate(&mut rng).unwrap();
			assert_eq!(name.chars().count(), 7, "{name}");
		}
	}

	#[test]
	fn one_letter_words_stay_single_character() {
		let chain = ChainBuilder::from_names(["A B", "C"]).build();
		let sampler = NameSampler::new(&chain);
		let mut rng = StdRng::seed_from_u64(5);
		for _ in 0..100 {
			let name = sampler.generate(&mut rng).unwrap();
			assert!(name.split(' ').all(|w| w.chars().count() == 1), "{name}");
		}
	}

	#[test]
	fn dead_end_inserts_placeholder() {
		// 'b' never precedes anything, a 4-letter word starting with 'a' walks past it
		let chain = ChainBuilder::from_names(["ab", "xyzw"]).build();
		let sampler = NameSampler::with_policy(&chain, MissingContext::Placeholder('#'));
		let mut rng = StdRng::seed_from_u64(9);

		let mut saw_placeholder = false;
		for _ in 0..500 {
			let name = sampler.generate(&mut rng).unwrap();
			if name.contains('#') {
				saw_placeholder = true;
			}
		}
		assert!(saw_placeholder);
	}

	#[test]
	fn placeholder_becomes_the_next_context() {
		// 'b' and 'x' are dead ends, '-' is only ever followed by 'x'
		let chain = ChainBuilder::from_names(["ab", "c-x", "aaaaa"]).build();
		let sampler = NameSampler::new(&chain);
		let mut rng = StdRng::seed_from_u64(3);

		let mut saw_bridge = false;
		for _ in 0..1000 {
			let name: Vec<char> = sampler.generate(&mut rng).unwrap().chars().collect();
			for pair in name.windows(2) {
				if pair[0] == '-' {
					assert_eq!(pair[1], 'x', "{}", name.iter().collect::<String>());
				}
			}
			saw_bridge |= name.windows(3).any(|w| w == ['b', '-', 'x']);
		}
		assert!(saw_bridge);
	}

	#[test]
	fn dead_end_fails_in_strict_mode() {
		// 'z' never precedes anything
		let chain = ChainBuilder::from_names(["az", "aaz"]).build();
		let sampler = NameSampler::with_policy(&chain, MissingContext::Fail);
		let mut rng = StdRng::seed_from_u64(21);

		let mut failures = 0;
		for _ in 0..500 {
			match sampler.generate(&mut rng) {
				Ok(name) => assert!(!name.contains('-')),
				Err(NameGenError::MissingContext(c)) => {
					assert_eq!(c, 'z');
					failures += 1;
				}
				Err(e) => panic!("unexpected error {e}"),
			}
		}
		assert!(failures > 0);
	}

	#[test]
	fn identical_seed_gives_identical_names() {
		let chain = ChainBuilder::from_names(["Aragorn", "Arwen", "Boromir Faramir", "Eowyn"]).build();
		let sampler = NameSampler::new(&chain);

		let mut left = StdRng::seed_from_u64(1234);
		let mut right = StdRng::seed_from_u64(1234);
		for _ in 0..50 {
			assert_eq!(sampler.generate(&mut left).unwrap(), sampler.generate(&mut right).unwrap());
		}
	}
}
