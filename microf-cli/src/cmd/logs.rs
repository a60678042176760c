use chrono::Local;
use std::path::Path;
use tracing_appender::{
	non_blocking::WorkerGuard,
	rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
	Layer,
	filter::LevelFilter,
	fmt::{self},
	layer::SubscriberExt,
	util::SubscriberInitExt,
};

/// Installs a terminal layer at `level` and, if `logs_dir` is usable, a file
/// layer that records everything for the current run.
///
/// The returned guard must be held until the program exits.
pub fn init(logs_dir: &Path, level: LevelFilter) -> Option<WorkerGuard> {
	let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S%.3f");
	let appender = std::fs::create_dir_all(logs_dir)
		.map_err(|e| e.to_string())
		.and_then(|_| {
			RollingFileAppender::builder()
				.rotation(Rotation::NEVER)
				.filename_prefix(timestamp.to_string())
				.filename_suffix("log")
				.build(logs_dir)
				.map_err(|e| e.to_string())
		});

	let (file_layer, guard, failure) = match appender {
		Ok(appender) => {
			let (writer, guard) = tracing_appender::non_blocking(appender);
			let layer = fmt::layer()
				.with_writer(writer)
				.with_ansi(false)
				.pretty()
				.with_filter(LevelFilter::TRACE);
			(Some(layer), Some(guard), None)
		}
		Err(e) => (None, None, Some(e)),
	};

	let terminal_layer = fmt::layer()
		.with_writer(std::io::stderr)
		.with_target(false)
		.without_time()
		.with_filter(level);

	tracing_subscriber::registry().with(terminal_layer).with(file_layer).init();

	match failure {
		None => tracing::debug!("Logging initialized. Log file in: {}", logs_dir.display()),
		Some(e) => tracing::warn!("Cannot write log files to {}: {}", logs_dir.display(), e),
	}
	guard
}
