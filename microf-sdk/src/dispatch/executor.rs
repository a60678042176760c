use async_trait::async_trait;
use tokio::process::Command;

use crate::{engine::CommandSet, error::Error};

/// How one command set ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	Succeeded,
	/// Non-zero exit, with the code if the process was not killed by a signal.
	Failed(Option<i32>),
}

impl Outcome {
	pub fn is_success(&self) -> bool {
		matches!(self, Outcome::Succeeded)
	}
}

/// Runs the commands of one file to completion.
#[async_trait]
pub trait Executor: Send + Sync {
	async fn execute(&self, set: &CommandSet) -> Result<Outcome, Error>;
}

/// Runs each command set through `sh -e -c` inside its working directory,
/// so a failing step stops the rest of that file's chain. Dropping the
/// returned future kills the shell.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
	shell: String,
}

impl Default for ShellExecutor {
	fn default() -> Self {
		Self { shell: "/bin/sh".into() }
	}
}

#[async_trait]
impl Executor for ShellExecutor {
	#[tracing::instrument(level = "debug", skip_all, fields(path = %set.path.display()))]
	async fn execute(&self, set: &CommandSet) -> Result<Outcome, Error> {
		let status = Command::new(&self.shell)
			.arg("-e")
			.arg("-c")
			.arg(set.script())
			.current_dir(&set.workdir)
			.kill_on_drop(true)
			.status()
			.await?;
		if status.success() {
			Ok(Outcome::Succeeded)
		} else {
			Ok(Outcome::Failed(status.code()))
		}
	}
}
