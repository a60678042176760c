use std::path::{Path, PathBuf};

use crate::{
	actions::{Action, Annotate, FormatConvert, LinkOrMove, PatternRename, RemoveOriginal, Step, VendorRename},
	engine::{
		job::{CommandSet, Job, Tally},
		Options,
	},
	error::Error,
	pattern::PatternTranslator,
	settings::ConvertSettings,
	state::State,
};

/// Outcome of running every action's `accept` over one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
	Accepted(State),
	Rejected(String),
}

/// An ordered list of steps, applied to one file name at a time.
#[derive(Debug, Clone)]
pub struct Pipeline {
	steps: Vec<Step>,
	check: bool,
	keep: bool,
}

impl Pipeline {
	pub fn new(steps: Vec<Step>, check: bool, keep: bool) -> Self {
		Self { steps, check, keep }
	}

	/// Assembles the steps enabled by `options`.
	///
	/// The order matters: vendor names are normalized before the user's
	/// pattern sees them, and the original is removed only after every
	/// other step had a chance to read it.
	pub fn build(options: &Options, convert: &ConvertSettings) -> Result<Self, Error> {
		options.validate()?;
		let translator = PatternTranslator::from_options(options.from_pattern.as_deref(), options.to_pattern.as_deref())?;

		let mut steps = vec![Step::Annotate(Annotate::new()?)];
		if options.rename {
			steps.push(Step::VendorRename(VendorRename));
		}
		if !translator.is_passthrough() {
			steps.push(Step::PatternRename(PatternRename::new(translator)));
		}
		if options.convert {
			steps.push(Step::FormatConvert(FormatConvert::new(convert)?));
		} else {
			steps.push(Step::LinkOrMove(LinkOrMove::new()?));
		}
		if !options.keep {
			steps.push(Step::RemoveOriginal(RemoveOriginal::new()?));
		}
		Ok(Self::new(steps, options.check, options.keep))
	}

	pub fn steps(&self) -> &[Step] {
		&self.steps
	}

	/// Feeds the base name of `path` through every step's `accept`.
	/// The first rejection stops the chain.
	pub fn accept(&self, path: &Path) -> Result<Verdict, Error> {
		let Some(filename) = path.file_name() else {
			return Ok(Verdict::Rejected("not a file name".into()));
		};
		let Some(filename) = filename.to_str() else {
			return Ok(Verdict::Rejected("file name is not valid UTF-8".into()));
		};
		let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

		let mut state = State::new(filename, dir, self.check, self.keep);
		let mut current = filename.to_string();
		for step in &self.steps {
			match step.accept(&current) {
				Ok(accepted) => {
					tracing::trace!(step = %step, from = %current, to = %accepted.name, "accepted");
					state.merge(accepted.params)?;
					current = accepted.name;
				}
				Err(Error::Reject(reason)) => return Ok(Verdict::Rejected(reason)),
				Err(e) => return Err(e),
			}
		}
		state.new = current;
		Ok(Verdict::Accepted(state))
	}

	/// Collects the commands of every step for an accepted file and
	/// materializes them against its final state.
	pub fn process(&self, path: &Path, mut state: State) -> Result<CommandSet, Error> {
		let mut templates = Vec::new();
		for step in &self.steps {
			step.process(&mut templates, &mut state)?;
		}
		let commands = templates
			.iter()
			.map(|template| template.render(&state))
			.collect::<Result<Vec<_>, _>>()?;
		Ok(CommandSet {
			path: path.to_path_buf(),
			workdir: state.dir.clone(),
			commands,
		})
	}

	/// Runs every path through the pipeline, in order.
	///
	/// Rejected files are counted and logged; any other error aborts the
	/// whole run before a single command is issued.
	pub fn run<I>(&self, paths: I) -> Result<(Job, Tally), Error>
	where
		I: IntoIterator<Item = PathBuf>,
	{
		let mut tally = Tally::default();
		let mut job = Job::default();
		for path in paths {
			tally.examined += 1;
			match self.accept(&path)? {
				Verdict::Rejected(reason) => {
					tracing::info!("Ignoring file `{}`: {}", path.display(), reason);
					tally.rejected += 1;
				}
				Verdict::Accepted(state) => {
					tracing::debug!("Queueing `{}` as `{}`", path.display(), state.new);
					tally.accepted += 1;
					job.push(self.process(&path, state)?);
				}
			}
		}
		Ok((job, tally))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn pipeline(options: Options) -> Pipeline {
		Pipeline::build(&options, &ConvertSettings::default()).unwrap()
	}

	fn convert_only() -> Options {
		Options {
			convert: true,
			..Options::default()
		}
	}

	fn names(pipeline: &Pipeline) -> Vec<String> {
		pipeline.steps().iter().map(ToString::to_string).collect()
	}

	#[test]
	fn step_order_follows_options() {
		let all = pipeline(Options {
			convert: true,
			rename: true,
			from_pattern: Some("*_G*".into()),
			to_pattern: Some("*_well*".into()),
			..Options::default()
		});
		assert_eq!(
			names(&all),
			vec!["annotate", "vendor-rename", "pattern-rename", "format-convert", "remove-original"]
		);

		let rename_keep = pipeline(Options {
			rename: true,
			keep: true,
			..Options::default()
		});
		assert_eq!(names(&rename_keep), vec!["annotate", "vendor-rename", "link-or-move"]);
	}

	#[test]
	fn requires_convert_or_rename() {
		let err = Pipeline::build(&Options::default(), &ConvertSettings::default()).unwrap_err();
		assert!(matches!(err, Error::Config(_)));
	}

	#[test]
	fn mismatched_patterns_fail_before_any_file() {
		let options = Options {
			convert: true,
			from_pattern: Some("a*b*".into()),
			to_pattern: Some("c*".into()),
			..Options::default()
		};
		assert!(matches!(Pipeline::build(&options, &ConvertSettings::default()), Err(Error::Config(_))));
	}

	#[test]
	fn convert_scenario() {
		let pipeline = pipeline(convert_only());
		let (job, tally) = pipeline
			.run(vec![PathBuf::from("/data/a.tif"), PathBuf::from("/data/b.txt")])
			.unwrap();
		assert_eq!(tally, Tally {
			examined: 2,
			accepted: 1,
			rejected: 1
		});
		assert_eq!(job.len(), 1);
		let set = &job.sets()[0];
		assert_eq!(set.workdir, PathBuf::from("/data"));
		assert_eq!(set.commands, vec![
			"# a.tif -> a.png".to_string(),
			"convert -depth 16 -colorspace gray a.tif a.png".into(),
			"rm -f a.tif".into(),
		]);
	}

	#[test]
	fn rejection_reason_is_reported() {
		let pipeline = pipeline(convert_only());
		assert_eq!(
			pipeline.accept(Path::new("/data/b.txt")).unwrap(),
			Verdict::Rejected("not a TIFF file".into())
		);
	}

	#[test]
	fn pattern_scenario() {
		let pipeline = pipeline(Options {
			convert: true,
			keep: true,
			from_pattern: Some("img_*_ch*".into()),
			to_pattern: Some("sample_*_channel*".into()),
			..Options::default()
		});
		let Verdict::Accepted(state) = pipeline.accept(Path::new("/data/img_42_ch3.tif")).unwrap() else {
			panic!("file should be accepted");
		};
		assert_eq!(state.wildcards(), ["42".to_string(), "3".to_string()]);
		assert_eq!(state.new, "sample_42_channel3.png");
	}

	#[test]
	fn pattern_alone_renames() {
		let pipeline = pipeline(Options {
			keep: true,
			from_pattern: Some("img_*_ch*".into()),
			to_pattern: Some("sample_*_channel*".into()),
			..Options::default()
		});
		assert_eq!(names(&pipeline), vec!["annotate", "pattern-rename", "link-or-move"]);
		let (job, _) = pipeline.run(vec![PathBuf::from("/data/img_42_ch3.tif")]).unwrap();
		assert_eq!(job.sets()[0].commands, vec![
			"# img_42_ch3.tif -> sample_42_channel3.tif".to_string(),
			"ln -f img_42_ch3.tif sample_42_channel3.tif".into(),
		]);
	}

	#[test]
	fn vendor_then_pattern() {
		let pipeline = pipeline(Options {
			rename: true,
			from_pattern: Some("20180328_*_T0001*".into()),
			to_pattern: Some("exp_*_*".into()),
			..Options::default()
		});
		let (job, _) = pipeline
			.run(vec![PathBuf::from("/d/20180328_TestAbs_G - 8(fld 4 wv Red - Cy5).tif")])
			.unwrap();
		assert_eq!(&job.sets()[0].commands[1..], &[
			"ln -f '20180328_TestAbs_G - 8(fld 4 wv Red - Cy5).tif' exp_TestAbs_G08_F004L01A01Z01C04.tif".to_string(),
			"rm -f '20180328_TestAbs_G - 8(fld 4 wv Red - Cy5).tif'".to_string(),
		]);
	}

	#[test]
	fn unknown_channel_aborts_run() {
		let pipeline = pipeline(Options {
			rename: true,
			..Options::default()
		});
		let err = pipeline
			.run(vec![
				PathBuf::from("/d/20180328_TestAbs_G - 8(fld 4 wv Red - Cy5).tif"),
				PathBuf::from("/d/20180328_TestAbs_G - 8(fld 4 wv Red - Foo).tif"),
				PathBuf::from("/d/20180328_TestAbs_G - 9(fld 4 wv Red - Cy5).tif"),
			])
			.unwrap_err();
		match err {
			Error::Parse { file, reason } => {
				assert!(file.contains("Foo"));
				assert!(reason.contains("`Foo`"));
			}
			other => panic!("unexpected error {other:?}"),
		}
	}

	#[test]
	fn counts_always_add_up() {
		let pipeline = pipeline(convert_only());
		let paths: Vec<PathBuf> = ["a.tif", "b.png", "c.TIFF", "d", "e.tiff.bak", "f.tif"]
			.iter()
			.map(|name| PathBuf::from("/x").join(name))
			.collect();
		let (job, tally) = pipeline.run(paths).unwrap();
		assert_eq!(tally.examined, 6);
		assert_eq!(tally.accepted + tally.rejected, tally.examined);
		assert_eq!(job.len(), tally.accepted);
	}

	#[test]
	fn runs_are_deterministic() {
		let options = Options {
			convert: true,
			from_pattern: Some("img_*_ch*".into()),
			to_pattern: Some("s_*_c*".into()),
			..Options::default()
		};
		let paths = vec![PathBuf::from("/x/img_1_ch2.tif"), PathBuf::from("/x/img_3_ch4.tif")];
		let first = pipeline(options.clone()).run(paths.clone()).unwrap();
		let second = pipeline(options).run(paths).unwrap();
		assert_eq!(first, second);
	}
}
