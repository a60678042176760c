use std::{fmt, path::PathBuf};

use itertools::Itertools;

use crate::error::Error;

/// The materialized commands for one accepted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSet {
	pub path: PathBuf,
	/// Directory the commands must run in; `{old}` and `{new}` are relative to it.
	pub workdir: PathBuf,
	pub commands: Vec<String>,
}

impl CommandSet {
	/// The commands as one shell script body, one command per line.
	pub fn script(&self) -> String {
		self.commands.join("\n")
	}

	/// A subshell that enters `workdir` and runs the commands.
	/// Used wherever several sets share one shell.
	pub fn subshell(&self) -> Result<String, Error> {
		let workdir = self.workdir.to_string_lossy();
		let cd = shlex::try_quote(&workdir).map_err(|e| Error::Template {
			template: format!("cd {workdir}"),
			reason: e.to_string(),
		})?;
		let body = self.commands.iter().map(|command| format!("  {command}")).join("\n");
		Ok(format!("(\n  cd {cd}\n{body}\n)"))
	}
}

/// Every command set produced by one invocation, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Job {
	sets: Vec<CommandSet>,
}

impl Job {
	pub fn push(&mut self, set: CommandSet) {
		self.sets.push(set);
	}

	pub fn sets(&self) -> &[CommandSet] {
		&self.sets
	}

	pub fn len(&self) -> usize {
		self.sets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sets.is_empty()
	}
}

impl From<Vec<CommandSet>> for Job {
	fn from(sets: Vec<CommandSet>) -> Self {
		Self { sets }
	}
}

impl IntoIterator for Job {
	type IntoIter = std::vec::IntoIter<CommandSet>;
	type Item = CommandSet;

	fn into_iter(self) -> Self::IntoIter {
		self.sets.into_iter()
	}
}

/// Per-run counters of the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
	pub examined: usize,
	pub accepted: usize,
	pub rejected: usize,
}

impl fmt::Display for Tally {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Examined {} files: {} accepted, {} rejected.",
			self.examined, self.accepted, self.rejected
		)
	}
}
