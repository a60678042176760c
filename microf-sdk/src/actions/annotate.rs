use crate::{error::Error, state::State, templates::CommandTemplate};

use super::Action;

/// Prefixes every command sequence with a comment naming source and destination.
#[derive(Debug, Clone)]
pub struct Annotate {
	comment: CommandTemplate,
}

impl Annotate {
	pub fn new() -> Result<Self, Error> {
		Ok(Self {
			comment: CommandTemplate::parse("# {old} -> {new}")?,
		})
	}
}

impl Action for Annotate {
	fn process(&self, commands: &mut Vec<CommandTemplate>, _state: &mut State) -> Result<(), Error> {
		commands.push(self.comment.clone());
		Ok(())
	}
}
