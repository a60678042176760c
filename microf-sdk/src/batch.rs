//! Partitioning of a [`Job`] into array-job batches and generation of the
//! self-dispatching script that runs one batch per array task.

use std::{
	ffi::OsString,
	fmt,
	fmt::Write as _,
	io::Write as _,
	path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::{
	engine::{CommandSet, Job},
	error::Error,
	settings::BatchSettings,
};

/// Exit status of the script when the task index matches no batch (EX_SOFTWARE).
pub const UNMATCHED_INDEX_STATUS: i32 = 70;

/// An inclusive range of array task indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayRange {
	pub first: usize,
	pub last: usize,
}

impl fmt::Display for ArrayRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}-{}", self.first, self.last)
	}
}

/// A group of command sets run by one array task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch<'a> {
	pub index: usize,
	pub sets: &'a [CommandSet],
}

pub fn batch_count(total: usize, size: usize) -> usize {
	total.div_ceil(size)
}

/// Splits `sets` into consecutive groups of at most `size`, keeping their order.
pub fn partition(sets: &[CommandSet], size: usize) -> Result<Vec<Batch<'_>>, Error> {
	if size == 0 {
		return Err(Error::Config("batch size must be at least 1".into()));
	}
	Ok(sets
		.chunks(size)
		.enumerate()
		.map(|(index, sets)| Batch { index, sets })
		.collect())
}

/// The scheduler call that submits a generated script as an array job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
	pub program: String,
	pub range: ArrayRange,
	pub script: PathBuf,
}

impl Submission {
	pub fn args(&self) -> Vec<OsString> {
		vec![format!("--array={}", self.range).into(), self.script.clone().into_os_string()]
	}
}

impl fmt::Display for Submission {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} --array={} {}", self.program, self.range, self.script.display())
	}
}

/// A rendered array-job script, not yet on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchScript {
	pub text: String,
	pub range: ArrayRange,
	pub sizes: Vec<usize>,
}

/// A script written to a temporary file. The file is removed when this is dropped.
#[derive(Debug)]
pub struct ScriptFile {
	file: NamedTempFile,
	pub range: ArrayRange,
}

impl ScriptFile {
	pub fn path(&self) -> &Path {
		self.file.path()
	}
}

#[derive(Debug, Clone)]
pub struct BatchScriptGenerator {
	settings: BatchSettings,
	prefix: String,
	workdir: PathBuf,
}

impl BatchScriptGenerator {
	/// `verb` names the run and prefixes the script and the task log files.
	pub fn new(settings: &BatchSettings, verb: &str, workdir: PathBuf) -> Result<Self, Error> {
		if settings.size == 0 {
			return Err(Error::Config("batch size must be at least 1".into()));
		}
		let mut prefix = verb.to_string();
		if !prefix.ends_with('.') {
			prefix.push('.');
		}
		Ok(Self {
			settings: settings.clone(),
			prefix,
			workdir,
		})
	}

	pub fn size(&self) -> usize {
		self.settings.size
	}

	pub fn workdir(&self) -> &Path {
		&self.workdir
	}

	/// Declared wall-clock limit of one task, in minutes. Only informs the
	/// scheduler; nothing enforces it on our side.
	pub fn time_limit_minutes(&self) -> u64 {
		let seconds = self.settings.seconds_per_command * self.settings.size as f64;
		1 + (seconds / 60.0).floor() as u64
	}

	/// Renders the script for `job`, or `None` if there is nothing to run.
	pub fn render(&self, job: &Job) -> Result<Option<BatchScript>, Error> {
		let batches = partition(job.sets(), self.settings.size)?;
		let Some(last) = batches.last().map(|batch| batch.index) else {
			return Ok(None);
		};

		let task = &self.settings.task_id_var;
		let log = self.workdir.join(format!("{}%A_%a.log", self.prefix));
		let mut text = String::new();
		// writing into a String cannot fail
		let _ = write!(
			text,
			"#!/bin/sh\n\
			#SBATCH -c {cpus}\n\
			#SBATCH --mem-per-cpu={mem}\n\
			#SBATCH --time={minutes}\n\
			#SBATCH --output={log}\n\
			#SBATCH --error={log}\n\
			\n\
			case \"${task}\" in\n",
			cpus = self.settings.cpus_per_task,
			mem = self.settings.mem_per_cpu,
			minutes = self.time_limit_minutes(),
			log = log.display(),
		);
		for batch in &batches {
			let _ = writeln!(text, "  {})", batch.index);
			text.push_str("    set -e -x\n");
			for set in batch.sets {
				for line in set.subshell()?.lines() {
					let _ = writeln!(text, "    {line}");
				}
			}
			text.push_str("    exit 0;;\n");
		}
		let _ = write!(
			text,
			"esac\n\
			\n\
			echo 1>&2 \"Array job ID ${task} not matched in script\"\n\
			exit {UNMATCHED_INDEX_STATUS}  # EX_SOFTWARE\n"
		);

		Ok(Some(BatchScript {
			text,
			range: ArrayRange { first: 0, last },
			sizes: batches.iter().map(|batch| batch.sets.len()).collect(),
		}))
	}

	/// Writes `script` to a temporary file in the work directory and syncs
	/// it to disk, so it is complete before anything refers to it.
	pub fn write(&self, script: &BatchScript) -> Result<ScriptFile, Error> {
		let to_error = |source: std::io::Error| Error::Script {
			source,
			path: self.workdir.clone(),
		};
		let mut file = tempfile::Builder::new()
			.prefix(&self.prefix)
			.suffix(".sh")
			.tempfile_in(&self.workdir)
			.map_err(to_error)?;
		file.write_all(script.text.as_bytes()).map_err(to_error)?;
		file.flush().map_err(to_error)?;
		file.as_file().sync_all().map_err(to_error)?;
		Ok(ScriptFile { file, range: script.range })
	}

	pub fn submission(&self, script: &ScriptFile) -> Submission {
		Submission {
			program: self.settings.submit_program.clone(),
			range: script.range,
			script: script.path().to_path_buf(),
		}
	}
}
