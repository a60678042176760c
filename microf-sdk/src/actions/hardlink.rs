use crate::{error::Error, state::State, templates::CommandTemplate};

use super::Action;

/// Makes the renamed file available under its new name.
///
/// Combined with [`RemoveOriginal`](super::RemoveOriginal) this amounts to a move.
#[derive(Debug, Clone)]
pub struct LinkOrMove {
	link: CommandTemplate,
}

impl LinkOrMove {
	pub fn new() -> Result<Self, Error> {
		Ok(Self {
			link: CommandTemplate::parse("ln -f {old} {new}")?,
		})
	}
}

impl Action for LinkOrMove {
	fn process(&self, commands: &mut Vec<CommandTemplate>, state: &mut State) -> Result<(), Error> {
		if state.old != state.new {
			commands.push(self.link.clone());
		}
		Ok(())
	}
}
