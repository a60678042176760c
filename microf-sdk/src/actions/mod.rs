use std::fmt::Debug;

use strum::Display;

use crate::{
	error::Error,
	state::{Params, State},
	templates::CommandTemplate,
};

pub mod annotate;
pub mod convert;
pub mod delete;
pub mod hardlink;
pub mod pattern_rename;
pub mod vendor_rename;

pub use annotate::Annotate;
pub use convert::FormatConvert;
pub use delete::RemoveOriginal;
pub use hardlink::LinkOrMove;
pub use pattern_rename::PatternRename;
pub use vendor_rename::VendorRename;

/// What an action makes of a file name it accepts: the name handed to the
/// next action, and the parameters merged into the file's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
	pub name: String,
	pub params: Params,
}

impl Accepted {
	pub fn unchanged<T: Into<String>>(name: T) -> Self {
		Self {
			name: name.into(),
			params: Params::None,
		}
	}
}

/// One step of the file transformation pipeline.
///
/// Both methods default to doing nothing, so a step only overrides the half
/// it cares about.
pub trait Action: Debug {
	/// Decides whether `filename` can be handled, and under which new name.
	/// Returning [`Error::Reject`] skips the file; any other error is fatal.
	fn accept(&self, filename: &str) -> Result<Accepted, Error> {
		Ok(Accepted::unchanged(filename))
	}

	/// Appends command templates for a file whose final state is `state`.
	fn process(&self, _commands: &mut Vec<CommandTemplate>, _state: &mut State) -> Result<(), Error> {
		Ok(())
	}
}

/// The closed set of steps a pipeline can be assembled from.
#[derive(Debug, Clone, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Step {
	Annotate(Annotate),
	VendorRename(VendorRename),
	PatternRename(PatternRename),
	FormatConvert(FormatConvert),
	LinkOrMove(LinkOrMove),
	RemoveOriginal(RemoveOriginal),
}

impl Step {
	fn action(&self) -> &dyn Action {
		match self {
			Step::Annotate(a) => a,
			Step::VendorRename(a) => a,
			Step::PatternRename(a) => a,
			Step::FormatConvert(a) => a,
			Step::LinkOrMove(a) => a,
			Step::RemoveOriginal(a) => a,
		}
	}
}

impl Action for Step {
	fn accept(&self, filename: &str) -> Result<Accepted, Error> {
		self.action().accept(filename)
	}

	fn process(&self, commands: &mut Vec<CommandTemplate>, state: &mut State) -> Result<(), Error> {
		self.action().process(commands, state)
	}
}
