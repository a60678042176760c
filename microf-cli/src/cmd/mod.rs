use crate::cmd::{config::ShowConfig, run::Run};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use run::Verb;

mod config;
mod logs;
mod run;

#[derive(Subcommand)]
enum Command {
	/// Rename and/or convert image files, as selected by the flags.
	Run(Run),
	/// Convert TIFF images to 16-bit grayscale PNG (same as `run --convert`).
	Convert(Run),
	/// Rename files from the IC6000 naming convention to the CV7000 one (same as `run --rename`).
	Rename(Run),
	/// Print the effective settings.
	Config(ShowConfig),
}

#[derive(Parser)]
#[command(about, author, version)]
pub struct App {
	#[command(subcommand)]
	command: Command,
}

#[async_trait]
pub trait Cmd {
	async fn run(self) -> anyhow::Result<()>;
}

#[async_trait]
impl Cmd for App {
	async fn run(self) -> anyhow::Result<()> {
		match self.command {
			Command::Run(cmd) => cmd.run().await,
			Command::Convert(cmd) => cmd.with_verb(Verb::Convert).run().await,
			Command::Rename(cmd) => cmd.with_verb(Verb::Rename).run().await,
			Command::Config(cmd) => cmd.run().await,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn cli_is_well_formed() {
		App::command().debug_assert();
	}

	#[test]
	fn patterns_come_in_pairs() {
		assert!(App::try_parse_from(["microf", "run", "--convert", "-f", "img_*", "a.tif"]).is_err());
		assert!(App::try_parse_from(["microf", "run", "--convert", "-f", "img_*", "-t", "s_*", "a.tif"]).is_ok());
	}

	#[test]
	fn paths_are_required() {
		assert!(App::try_parse_from(["microf", "convert"]).is_err());
	}
}
