use crate::{
	error::Error,
	state::Params,
	vendor::{self, GRAMMAR_VERSION},
};

use super::{Accepted, Action};

/// Renames IC6000 file names to the CV7000 convention.
#[derive(Debug, Clone, Default)]
pub struct VendorRename;

impl Action for VendorRename {
	#[tracing::instrument(level = "debug", skip(self))]
	fn accept(&self, filename: &str) -> Result<Accepted, Error> {
		let extracted = vendor::extract(filename)?.ok_or_else(|| {
			Error::reject(format!(
				"file name does not match the IC6000 pattern (grammar v{GRAMMAR_VERSION})"
			))
		})?;
		Ok(Accepted {
			name: extracted.cv7000_name(),
			params: Params::Vendor(extracted.fields),
		})
	}
}
