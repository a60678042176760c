use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, ValueHint};
use colored::Colorize;
use microf_sdk::{
	batch::BatchScriptGenerator,
	dispatch::{CommandSubmitter, Dispatcher, Mode, ShellExecutor},
	engine::{Options, Pipeline},
	location,
	settings::Settings,
};
use strum::Display;
use tracing_subscriber::filter::LevelFilter;

use crate::cmd::{logs, Cmd};

/// Names a run in summaries and in the names of batch scripts and logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Verb {
	#[default]
	Process,
	Convert,
	Rename,
}

#[derive(Parser, Default, Debug)]
pub struct Run {
	/// Convert TIFF images to 16-bit grayscale PNG.
	#[arg(long)]
	convert: bool,
	/// Rename IC6000 file names to the CV7000 convention.
	#[arg(long)]
	rename: bool,
	/// Shell-like pattern the file names must match, `*` captures any text.
	#[arg(long, short = 'f', requires = "to_pattern")]
	from_pattern: Option<String>,
	/// Pattern to build the new names from, filled with the captures of `--from-pattern`.
	#[arg(long, short = 't', requires = "from_pattern")]
	to_pattern: Option<String>,
	/// Print the commands instead of running them.
	#[arg(long, short = 'n', visible_aliases = ["dry-run", "just-print"])]
	check: bool,
	/// Keep the original files.
	#[arg(long)]
	keep: bool,
	/// Submit the commands as an array job instead of running them here.
	#[arg(long, short = 'b')]
	batch: bool,
	/// Number of files handled by one array task.
	#[arg(long)]
	batch_size: Option<usize>,
	#[arg(long, short = 'c', value_hint = ValueHint::FilePath)]
	config: Option<PathBuf>,
	/// Also print debug messages.
	#[arg(long, short = 'v', conflicts_with = "quiet")]
	verbose: bool,
	/// Only print warnings and errors.
	#[arg(long, short = 'q')]
	quiet: bool,
	/// Files or directories to process. Directories are walked recursively.
	#[arg(required = true, value_hint = ValueHint::AnyPath)]
	paths: Vec<PathBuf>,
	#[arg(skip)]
	verb: Verb,
}

impl Run {
	/// Turns on the step the shortcut subcommand is named after.
	pub fn with_verb(mut self, verb: Verb) -> Self {
		match verb {
			Verb::Convert => self.convert = true,
			Verb::Rename => self.rename = true,
			Verb::Process => {}
		}
		self.verb = verb;
		self
	}

	fn level(&self) -> LevelFilter {
		match (self.verbose, self.quiet) {
			(true, _) => LevelFilter::DEBUG,
			(_, true) => LevelFilter::WARN,
			_ => LevelFilter::INFO,
		}
	}

	fn options(&self) -> Options {
		Options {
			convert: self.convert,
			rename: self.rename,
			from_pattern: self.from_pattern.clone(),
			to_pattern: self.to_pattern.clone(),
			check: self.check,
			keep: self.keep,
		}
	}
}

#[async_trait]
impl Cmd for Run {
	async fn run(self) -> Result<()> {
		let mut settings = Settings::load(self.config.clone())?;
		let _guard = logs::init(&settings.logging.dir(), self.level());
		match Settings::source(self.config.clone())? {
			Some(path) => tracing::debug!("Read settings from {}", path.display()),
			None => tracing::debug!("No settings file found, using built-in defaults"),
		}
		if let Some(size) = self.batch_size {
			settings.batch.size = size;
			settings.validate()?;
		}

		let pipeline = Pipeline::build(&self.options(), &settings.convert)?;
		let cwd = std::env::current_dir().context("cannot determine the current directory")?;
		let files = location::discover(&self.paths, &cwd);
		let (job, tally) = pipeline.run(files)?;
		println!("{}", tally.to_string().bold());
		if job.is_empty() {
			return Ok(());
		}

		let verb = self.verb.to_string();
		let workdir = settings.batch.workdir.clone().unwrap_or(cwd);
		let generator = BatchScriptGenerator::new(&settings.batch, &verb, workdir)?;
		let mode = Mode::select(self.check, self.batch);
		let dispatcher = Dispatcher::new(
			mode,
			verb,
			generator,
			ShellExecutor::default(),
			CommandSubmitter::default(),
		);
		let interrupt = async {
			if tokio::signal::ctrl_c().await.is_err() {
				std::future::pending::<()>().await;
			}
		};
		let report = dispatcher.dispatch(&job, interrupt).await?;
		println!("{}", report.to_string().green());
		Ok(())
	}
}
