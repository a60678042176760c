use async_trait::async_trait;
use tokio::process::Command;

use crate::{batch::Submission, error::Error};

/// Hands a generated array-job script to the cluster scheduler.
#[async_trait]
pub trait Submitter: Send + Sync {
	/// Returns whatever the scheduler printed to acknowledge the job.
	async fn submit(&self, submission: &Submission) -> Result<String, Error>;
}

/// Submits by running the configured program, e.g. `sbatch --array=0-2 script.sh`.
#[derive(Debug, Clone, Default)]
pub struct CommandSubmitter;

#[async_trait]
impl Submitter for CommandSubmitter {
	async fn submit(&self, submission: &Submission) -> Result<String, Error> {
		let output = Command::new(&submission.program)
			.args(submission.args())
			.output()
			.await
			.map_err(|e| Error::Submission {
				program: submission.program.clone(),
				reason: e.to_string(),
			})?;
		if !output.status.success() {
			let stderr = String::from_utf8_lossy(&output.stderr);
			return Err(Error::Submission {
				program: submission.program.clone(),
				reason: format!("{} {}", output.status, stderr.trim()),
			});
		}
		Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::batch::ArrayRange;
	use pretty_assertions::assert_eq;
	use std::path::PathBuf;

	fn submission(program: &str) -> Submission {
		Submission {
			program: program.into(),
			range: ArrayRange { first: 0, last: 2 },
			script: PathBuf::from("job.sh"),
		}
	}

	#[tokio::test]
	async fn echoes_acknowledgement() {
		let receipt = CommandSubmitter.submit(&submission("echo")).await.unwrap();
		assert_eq!(receipt, "--array=0-2 job.sh");
	}

	#[tokio::test]
	async fn non_zero_exit_is_submission_error() {
		let err = CommandSubmitter.submit(&submission("false")).await.unwrap_err();
		assert!(matches!(err, Error::Submission { .. }));
	}

	#[tokio::test]
	async fn missing_program_is_submission_error() {
		let err = CommandSubmitter
			.submit(&submission("microf-no-such-scheduler"))
			.await
			.unwrap_err();
		assert!(matches!(err, Error::Submission { ref program, .. } if program == "microf-no-such-scheduler"));
	}
}
