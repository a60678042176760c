use crate::{error::Error, pattern::PatternTranslator};

use super::{Accepted, Action};

/// Renames files according to the user's `--from-pattern`/`--to-pattern` pair.
#[derive(Debug, Clone)]
pub struct PatternRename {
	translator: PatternTranslator,
}

impl PatternRename {
	pub fn new(translator: PatternTranslator) -> Self {
		Self { translator }
	}
}

impl Action for PatternRename {
	fn accept(&self, filename: &str) -> Result<Accepted, Error> {
		let (name, params) = self.translator.accept(filename)?;
		Ok(Accepted { name, params })
	}
}
