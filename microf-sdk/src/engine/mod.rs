pub mod job;
pub mod pipeline;

pub use job::{CommandSet, Job, Tally};
pub use pipeline::{Pipeline, Verdict};

use crate::error::Error;

/// The per-run choices that decide which steps a pipeline is made of.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
	pub convert: bool,
	pub rename: bool,
	pub from_pattern: Option<String>,
	pub to_pattern: Option<String>,
	pub check: bool,
	pub keep: bool,
}

impl Options {
	pub fn has_patterns(&self) -> bool {
		self.from_pattern.is_some() || self.to_pattern.is_some()
	}

	pub fn validate(&self) -> Result<(), Error> {
		if !(self.convert || self.rename || self.has_patterns()) {
			return Err(Error::Config(
				"at least one of `--convert`, `--rename` or `--from-pattern`/`--to-pattern` should be given".into(),
			));
		}
		Ok(())
	}
}
