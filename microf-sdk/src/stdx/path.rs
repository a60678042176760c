use std::{
	ffi::OsStr,
	path::{Path, PathBuf},
};

pub trait PathExt {
	/// Replaces a leading `~` component with the user's home directory.
	fn expand_user(&self) -> PathBuf;
	/// Joins a relative path onto `base`; absolute paths are returned as they are.
	fn absolutize(&self, base: &Path) -> PathBuf;
}

impl<T: AsRef<Path>> PathExt for T {
	fn expand_user(&self) -> PathBuf {
		let path = self.as_ref();
		let mut components = path.components();
		if let Some(component) = components.next() {
			if component.as_os_str() == OsStr::new("~") {
				if let Some(mut home) = dirs::home_dir() {
					home.extend(components);
					return home;
				}
			}
		}
		path.to_path_buf()
	}

	fn absolutize(&self, base: &Path) -> PathBuf {
		let path = self.as_ref();
		if path.is_absolute() {
			path.to_path_buf()
		} else {
			base.join(path)
		}
	}
}
