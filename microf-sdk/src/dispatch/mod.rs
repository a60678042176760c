pub mod executor;
pub mod scheduler;

use std::{fmt, future::Future, io};

use strum::Display;

pub use executor::{Executor, Outcome, ShellExecutor};
pub use scheduler::{CommandSubmitter, Submitter};

use crate::{
	batch::{ArrayRange, BatchScriptGenerator},
	engine::Job,
	error::Error,
};

/// How the commands of a run are carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Mode {
	DryRun,
	Immediate,
	Batched,
}

impl Mode {
	/// A dry run always wins: nothing is submitted while being printed.
	pub fn select(check: bool, batch: bool) -> Self {
		match (check, batch) {
			(true, true) => {
				tracing::warn!("Both a dry run and batch submission were requested; only printing the commands.");
				Mode::DryRun
			}
			(true, false) => Mode::DryRun,
			(false, true) => Mode::Batched,
			(false, false) => Mode::Immediate,
		}
	}
}

/// What a dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
	DryRun {
		verb: String,
		printed: usize,
	},
	Immediate {
		verb: String,
		done: usize,
		errored: usize,
		interrupted: bool,
	},
	Batched {
		verb: String,
		sets: usize,
		sizes: Vec<usize>,
		range: Option<ArrayRange>,
		receipt: Option<String>,
	},
}

impl fmt::Display for Report {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Report::DryRun { verb, printed } => {
				write!(f, "Dry run: printed the commands to {verb} {printed} files, nothing was executed.")
			}
			Report::Immediate {
				verb,
				done,
				errored,
				interrupted,
			} => {
				write!(f, "Successfully applied {verb} to {done} files, {errored} errors.")?;
				if *interrupted {
					write!(f, " Interrupted before all files were processed.")?;
				}
				Ok(())
			}
			Report::Batched {
				verb, sets, range: None, ..
			} => write!(f, "Nothing to submit for {verb} ({sets} files)."),
			Report::Batched {
				verb,
				sets,
				sizes,
				range: Some(range),
				receipt,
			} => {
				write!(f, "Submitted {verb} of {sets} files as {} array tasks ({range})", sizes.len())?;
				match receipt {
					Some(receipt) if !receipt.is_empty() => write!(f, ": {receipt}"),
					_ => write!(f, "."),
				}
			}
		}
	}
}

/// Carries out a [`Job`] according to the run's [`Mode`].
#[derive(Debug)]
pub struct Dispatcher<E = ShellExecutor, S = CommandSubmitter> {
	mode: Mode,
	verb: String,
	generator: BatchScriptGenerator,
	executor: E,
	submitter: S,
}

impl<E: Executor, S: Submitter> Dispatcher<E, S> {
	/// `verb` labels the run in summaries and in the names of batch scripts.
	pub fn new<T: Into<String>>(mode: Mode, verb: T, generator: BatchScriptGenerator, executor: E, submitter: S) -> Self {
		Self {
			mode,
			verb: verb.into(),
			generator,
			executor,
			submitter,
		}
	}

	pub fn mode(&self) -> Mode {
		self.mode
	}

	/// Dispatches `job`. `interrupt` resolving stops an immediate run
	/// before its next command set; other modes ignore it.
	pub async fn dispatch<F>(&self, job: &Job, interrupt: F) -> Result<Report, Error>
	where
		F: Future<Output = ()>,
	{
		match self.mode {
			Mode::DryRun => self.dry_run(job, &mut io::stdout().lock()),
			Mode::Immediate => Ok(self.immediate(job, interrupt).await),
			Mode::Batched => self.batched(job).await,
		}
	}

	/// Prints every command set without running anything.
	pub fn dry_run<W: io::Write>(&self, job: &Job, out: &mut W) -> Result<Report, Error> {
		for set in job.sets() {
			writeln!(out, "{}", set.subshell()?)?;
		}
		out.flush()?;
		Ok(Report::DryRun {
			verb: self.verb.clone(),
			printed: job.len(),
		})
	}

	/// Runs the command sets one after the other. A failing set is counted
	/// and the run goes on with the next one. A set cut short by `interrupt`
	/// counts as errored.
	pub async fn immediate<F>(&self, job: &Job, interrupt: F) -> Report
	where
		F: Future<Output = ()>,
	{
		tokio::pin!(interrupt);
		let mut done = 0;
		let mut errored = 0;
		let mut interrupted = false;
		for set in job.sets() {
			tokio::select! {
				biased;
				_ = &mut interrupt => {
					tracing::warn!("Interrupted, not issuing any further commands.");
					interrupted = true;
					break;
				}
				_ = std::future::ready(()) => {}
			}
			let outcome = tokio::select! {
				biased;
				_ = &mut interrupt => {
					tracing::warn!("Interrupted while running the commands for `{}`, stopping.", set.path.display());
					errored += 1;
					interrupted = true;
					break;
				}
				outcome = self.executor.execute(set) => outcome,
			};
			match outcome {
				Ok(Outcome::Succeeded) => done += 1,
				Ok(Outcome::Failed(code)) => {
					tracing::error!("Commands for `{}` failed with exit code {:?}", set.path.display(), code);
					errored += 1;
				}
				Err(e) => {
					tracing::error!("Could not run commands for `{}`: {}", set.path.display(), e);
					errored += 1;
				}
			}
		}
		Report::Immediate {
			verb: self.verb.clone(),
			done,
			errored,
			interrupted,
		}
	}

	/// Writes the array-job script and submits it. Does not wait for the
	/// tasks to run.
	pub async fn batched(&self, job: &Job) -> Result<Report, Error> {
		let Some(script) = self.generator.render(job)? else {
			return Ok(Report::Batched {
				verb: self.verb.clone(),
				sets: 0,
				sizes: vec![],
				range: None,
				receipt: None,
			});
		};
		let file = self.generator.write(&script)?;
		let submission = self.generator.submission(&file);
		tracing::info!("Submitting array job: {}", submission);
		let receipt = self.submitter.submit(&submission).await?;
		// the scheduler keeps its own copy of the script from here on
		drop(file);
		Ok(Report::Batched {
			verb: self.verb.clone(),
			sets: job.len(),
			sizes: script.sizes,
			range: Some(script.range),
			receipt: Some(receipt),
		})
	}
}
