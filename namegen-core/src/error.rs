use thiserror::Error;

/// Errors returned by the name generator.
#[derive(Debug, Error)]
pub enum NameGenError {
	/// `generate` was called for a label that was never seeded.
	#[error("unable to generate name of type {0}: no sample data exists")]
	UnknownVariant(String),

	/// A foundational context (`parts`, `name_len` or `initial`) has no statistics.
	#[error("no data available for context '{0}'")]
	NoData(&'static str),

	/// A character was never observed as a predecessor and the sampler runs in strict mode.
	#[error("no transition data for character '{0}'")]
	MissingContext(char),

	#[error("invalid option: {0}")]
	InvalidOption(String),

	/// A corpus label that is not a single plain file name.
	#[error("invalid corpus label: {0:?}")]
	InvalidLabel(String),

	#[error("variant {0} already loaded")]
	AlreadyLoaded(String),

	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	#[error("serialization error: {0}")]
	Serialization(#[from] postcard::Error),
}

pub type Result<T> = std::result::Result<T, NameGenError>;
