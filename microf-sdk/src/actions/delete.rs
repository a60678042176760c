use crate::{error::Error, state::State, templates::CommandTemplate};

use super::Action;

/// Removes the source file once the other steps are done with it.
#[derive(Debug, Clone)]
pub struct RemoveOriginal {
	remove: CommandTemplate,
}

impl RemoveOriginal {
	pub fn new() -> Result<Self, Error> {
		Ok(Self {
			remove: CommandTemplate::parse("rm -f {old}")?,
		})
	}
}

impl Action for RemoveOriginal {
	fn process(&self, commands: &mut Vec<CommandTemplate>, state: &mut State) -> Result<(), Error> {
		// an unchanged name means the original is the result
		if !state.keep && state.old != state.new {
			commands.push(self.remove.clone());
		}
		Ok(())
	}
}
