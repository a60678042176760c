use std::path::PathBuf;

use config::{Config as LayeredConfig, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{error::Error, PROJECT_NAME};

/// Settings for the external image conversion program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertSettings {
	pub program: String,
	pub flags: Vec<String>,
}

impl Default for ConvertSettings {
	fn default() -> Self {
		Self {
			program: "convert".into(),
			flags: ["-depth", "16", "-colorspace", "gray"].map(String::from).to_vec(),
		}
	}
}

/// Settings for array-job submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
	/// Number of per-file command sets in one array task.
	pub size: usize,
	pub submit_program: String,
	/// Environment variable carrying the array task index on the worker.
	pub task_id_var: String,
	/// Estimated cost of one command set, used for the declared time limit.
	pub seconds_per_command: f64,
	pub cpus_per_task: u32,
	pub mem_per_cpu: String,
	/// Where the job script and the task logs go. It must be visible under
	/// the same path from the submission host and the workers.
	/// Defaults to the current directory.
	pub workdir: Option<PathBuf>,
}

impl Default for BatchSettings {
	fn default() -> Self {
		Self {
			size: 200,
			submit_program: "sbatch".into(),
			task_id_var: "SLURM_ARRAY_TASK_ID".into(),
			seconds_per_command: 0.5,
			cpus_per_task: 1,
			mem_per_cpu: "256m".into(),
			workdir: None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
	pub dir: Option<PathBuf>,
}

impl LogSettings {
	pub fn dir(&self) -> PathBuf {
		self.dir.clone().unwrap_or_else(|| {
			dirs::data_local_dir()
				.map(|dir| dir.join(PROJECT_NAME))
				.unwrap_or_else(|| PathBuf::from(".").join(format!(".{PROJECT_NAME}")))
				.join("logs")
		})
	}
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub convert: ConvertSettings,
	pub batch: BatchSettings,
	pub logging: LogSettings,
}

impl Settings {
	/// Layers built-in defaults, an optional TOML file and `MICROF_*`
	/// environment overrides (`MICROF_BATCH__SIZE=500`).
	pub fn load(path: Option<PathBuf>) -> Result<Self, Error> {
		let mut builder = LayeredConfig::builder();
		if let Some(path) = Self::source(path)? {
			builder = builder.add_source(File::from(path));
		}
		let settings = builder
			.add_source(
				Environment::with_prefix(&PROJECT_NAME.to_uppercase())
					.prefix_separator("_")
					.separator("__")
					.try_parsing(true),
			)
			.build()?
			.try_deserialize::<Settings>()?;
		settings.validate()?;
		Ok(settings)
	}

	/// The settings file [`Settings::load`] reads: `path` if given, which
	/// must exist, else [`Settings::default_path`].
	pub fn source(path: Option<PathBuf>) -> Result<Option<PathBuf>, Error> {
		match path {
			Some(path) if !path.exists() => Err(Error::Config(format!(
				"configuration file not found at {}",
				path.display()
			))),
			Some(path) => Ok(Some(path)),
			None => Ok(Self::default_path()),
		}
	}

	/// `$MICROF_CONFIG`, else `<config dir>/microf/config.toml`, if that file exists.
	pub fn default_path() -> Option<PathBuf> {
		let var = format!("{}_CONFIG", PROJECT_NAME.to_uppercase());
		let path = match std::env::var_os(&var) {
			Some(path) => PathBuf::from(path),
			None => dirs::config_dir()?.join(PROJECT_NAME).join("config.toml"),
		};
		path.exists().then_some(path)
	}

	pub fn validate(&self) -> Result<(), Error> {
		if self.batch.size == 0 {
			return Err(Error::Config("batch size must be at least 1".into()));
		}
		if !self.batch.seconds_per_command.is_finite() || self.batch.seconds_per_command < 0.0 {
			return Err(Error::Config("batch.seconds_per_command must be a non-negative number".into()));
		}
		if self.convert.program.is_empty() {
			return Err(Error::Config("convert.program must not be empty".into()));
		}
		Ok(())
	}

	pub fn to_toml(&self) -> Result<String, Error> {
		toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[test]
	fn defaults() {
		let settings = Settings::default();
		assert_eq!(settings.batch.size, 200);
		assert_eq!(settings.batch.submit_program, "sbatch");
		assert_eq!(settings.convert.program, "convert");
		assert!(settings.validate().is_ok());
	}

	#[test]
	fn file_overrides_defaults() {
		let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
		writeln!(file, "[batch]\nsize = 1000\nmem_per_cpu = \"1g\"\n\n[convert]\nprogram = \"magick\"").unwrap();
		let settings = Settings::load(Some(file.path().to_path_buf())).unwrap();
		assert_eq!(settings.batch.size, 1000);
		assert_eq!(settings.batch.mem_per_cpu, "1g");
		assert_eq!(settings.batch.submit_program, "sbatch");
		assert_eq!(settings.convert.program, "magick");
		assert_eq!(settings.convert.flags, ConvertSettings::default().flags);
	}

	#[test]
	fn missing_explicit_file_is_config_error() {
		let file = NamedTempFile::new().unwrap();
		let path = file.path().with_extension("missing.toml");
		assert!(matches!(Settings::load(Some(path)), Err(Error::Config(_))));
	}

	#[test]
	fn explicit_source_wins() {
		let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
		let path = file.path().to_path_buf();
		assert_eq!(Settings::source(Some(path.clone())).unwrap(), Some(path.clone()));
		assert!(matches!(
			Settings::source(Some(path.with_extension("missing"))),
			Err(Error::Config(_))
		));
	}

	#[test]
	fn zero_batch_size_is_invalid() {
		let mut settings = Settings::default();
		settings.batch.size = 0;
		assert!(matches!(settings.validate(), Err(Error::Config(_))));
	}

	#[test]
	fn toml_round_trip_keeps_values() {
		let settings = Settings::default();
		let text = settings.to_toml().unwrap();
		let parsed: Settings = toml::from_str(&text).unwrap();
		assert_eq!(parsed, settings);
	}
}
