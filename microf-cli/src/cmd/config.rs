use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Parser, ValueHint};
use microf_sdk::settings::Settings;

use crate::cmd::Cmd;

#[derive(Parser, Debug)]
pub struct ShowConfig {
	/// Settings file to read instead of the default one.
	#[arg(long, short = 'c', value_hint = ValueHint::FilePath)]
	config: Option<PathBuf>,
	/// Only print where the default settings file is looked up.
	#[arg(long, exclusive = true)]
	show_path: bool,
}

#[async_trait]
impl Cmd for ShowConfig {
	async fn run(self) -> Result<()> {
		if self.show_path {
			match Settings::default_path() {
				Some(path) => println!("{}", path.display()),
				None => println!("no settings file found, using built-in defaults"),
			}
			return Ok(());
		}
		let settings = Settings::load(self.config)?;
		print!("{}", settings.to_toml()?);
		Ok(())
	}
}
