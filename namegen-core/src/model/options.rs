use serde::{Deserialize, Serialize};

use crate::error::{NameGenError, Result};

/// Character appended when a word reaches a character without known successors.
pub const DEFAULT_PLACEHOLDER: char = '-';

/// What the sampler does when the last character of a word was never observed
/// before another character.
///
/// # Variants
/// - `Placeholder(char)`: append the placeholder, use it as the next context, and continue.
/// - `Fail`: stop and return [`NameGenError::MissingContext`].
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingContext {
	Placeholder(char),
	Fail,
}

impl Default for MissingContext {
	fn default() -> Self {
		MissingContext::Placeholder(DEFAULT_PLACEHOLDER)
	}
}

/// Per-call generation settings.
///
/// # Invariants
/// - A placeholder is never a whitespace character (it would split the word)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateOptions {
	/// Extra attempts when the generated name already belongs to the seed corpus.
	/// 0 disables the check.
	pub nb_try: usize,

	missing_context: MissingContext,
}

impl GenerateOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the current missing-context policy.
	pub fn missing_context(&self) -> MissingContext {
		self.missing_context
	}

	/// Sets the missing-context policy.
	///
	/// # Errors
	/// Returns an error if the placeholder is whitespace.
	pub fn set_missing_context(&mut self, policy: MissingContext) -> Result<()> {
		if let MissingContext::Placeholder(c) = policy {
			if c.is_whitespace() {
				return Err(NameGenError::InvalidOption(format!(
					"placeholder must not be whitespace, got {c:?}"
				)));
			}
		}
		self.missing_context = policy;
		Ok(())
	}

	/// Shorthand for `set_missing_context(MissingContext::Placeholder(c))`.
	pub fn set_placeholder(&mut self, c: char) -> Result<()> {
		self.set_missing_context(MissingContext::Placeholder(c))
	}

	/// Switches to [`MissingContext::Fail`].
	pub fn strict(mut self) -> Self {
		self.missing_context = MissingContext::Fail;
		self
	}
}
