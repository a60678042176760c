use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the pipeline, the batch generator and the dispatcher.
#[derive(Error, Debug)]
pub enum Error {
	/// A file does not satisfy the precondition of some action.
	/// Not fatal: the pipeline counts it and moves on to the next file.
	#[error("{0}")]
	Reject(String),

	#[error("Error in configuration: {0}")]
	Config(String),

	#[error("Cannot parse file name `{file}`: {reason}")]
	Parse { file: String, reason: String },

	#[error("Cannot render command template `{template}`: {reason}")]
	Template { template: String, reason: String },

	#[error("State key `{0}` was already set by a previous action")]
	StateConflict(String),

	#[error("Could not submit array job with `{program}`: {reason}")]
	Submission { program: String, reason: String },

	#[error("Could not write batch script {path:?}")]
	Script {
		#[source]
		source: std::io::Error,
		path: PathBuf,
	},

	#[error(transparent)]
	Settings(#[from] config::ConfigError),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl Error {
	pub fn reject<T: Into<String>>(reason: T) -> Self {
		Self::Reject(reason.into())
	}

	pub fn is_reject(&self) -> bool {
		matches!(self, Self::Reject(_))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn only_rejects_are_rejects() {
		assert!(Error::reject("not a TIFF file").is_reject());
		assert!(!Error::Config("bad".into()).is_reject());
		assert!(!Error::Parse {
			file: "a.tif".into(),
			reason: "x".into()
		}
		.is_reject());
	}

	#[test]
	fn parse_error_names_file_and_reason() {
		let err = Error::Parse {
			file: "20180328_TestAbs_G - 8(fld 4 wv Red - Foo).tif".into(),
			reason: "unknown channel tag `Foo`".into(),
		};
		assert_eq!(
			err.to_string(),
			"Cannot parse file name `20180328_TestAbs_G - 8(fld 4 wv Red - Foo).tif`: unknown channel tag `Foo`"
		);
	}
}
