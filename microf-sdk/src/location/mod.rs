//! Expansion of the input paths of a run into a flat list of files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::stdx::path::PathExt;

/// Expands `paths` into the files they name, in a stable order: inputs in
/// the order given, directory contents recursively sorted by file name.
///
/// Paths that do not exist are skipped with a warning. Relative paths are
/// resolved against `cwd`.
pub fn discover<I, P>(paths: I, cwd: &Path) -> Vec<PathBuf>
where
	I: IntoIterator<Item = P>,
	P: AsRef<Path>,
{
	let mut files = Vec::new();
	for path in paths {
		let path = path.as_ref().expand_user().absolutize(cwd);
		if !path.exists() {
			tracing::warn!("Path `{}` does not exist, ignoring.", path.display());
			continue;
		}
		if !path.is_dir() {
			files.push(path);
			continue;
		}
		for entry in WalkDir::new(&path).sort_by_file_name() {
			match entry {
				Ok(entry) if !entry.file_type().is_dir() => files.push(entry.into_path()),
				Ok(_) => {}
				Err(e) => tracing::warn!("Cannot read an entry under `{}`: {}", path.display(), e),
			}
		}
	}
	files
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use std::fs;

	#[test]
	fn walks_directories_in_stable_order() {
		let dir = tempfile::tempdir().unwrap();
		let root = dir.path();
		fs::create_dir_all(root.join("plate/b")).unwrap();
		for name in ["plate/c.tif", "plate/a.tif", "plate/b/z.tif", "single.tif"] {
			fs::write(root.join(name), "").unwrap();
		}

		let files = discover(["single.tif", "missing.tif", "plate"], root);
		assert_eq!(files, vec![
			root.join("single.tif"),
			root.join("plate/a.tif"),
			root.join("plate/b/z.tif"),
			root.join("plate/c.tif"),
		]);
	}

	#[test]
	fn nothing_exists() {
		let dir = tempfile::tempdir().unwrap();
		assert!(discover(["nope"], dir.path()).is_empty());
	}
}
