use std::path::Path;

use crate::{
	error::Error,
	settings::ConvertSettings,
	state::State,
	templates::CommandTemplate,
};

use super::{Accepted, Action};

const SOURCE_EXTENSIONS: [&str; 2] = ["tif", "tiff"];
const TARGET_EXTENSION: &str = "png";

/// Converts TIFF images to PNG with an external program.
#[derive(Debug, Clone)]
pub struct FormatConvert {
	command: CommandTemplate,
}

impl FormatConvert {
	pub fn new(settings: &ConvertSettings) -> Result<Self, Error> {
		let words = std::iter::once(settings.program.as_str()).chain(settings.flags.iter().map(String::as_str));
		let prefix = shlex::try_join(words).map_err(|e| Error::Config(format!("invalid convert command: {e}")))?;
		let prefix = prefix.replace('{', "{{").replace('}', "}}");
		Ok(Self {
			command: CommandTemplate::parse(format!("{prefix} {{old}} {{new}}"))?,
		})
	}
}

impl Action for FormatConvert {
	fn accept(&self, filename: &str) -> Result<Accepted, Error> {
		let path = Path::new(filename);
		let is_tiff = path
			.extension()
			.map(|ext| ext.to_string_lossy())
			.is_some_and(|ext| SOURCE_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(&ext)));
		if !is_tiff {
			return Err(Error::reject("not a TIFF file"));
		}
		let name = path.with_extension(TARGET_EXTENSION);
		Ok(Accepted::unchanged(name.to_string_lossy()))
	}

	fn process(&self, commands: &mut Vec<CommandTemplate>, _state: &mut State) -> Result<(), Error> {
		commands.push(self.command.clone());
		Ok(())
	}
}
