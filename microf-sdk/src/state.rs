use std::{fmt, path::PathBuf};

use crate::error::Error;

/// A value stored in the per-file pipeline state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
	Str(String),
	Int(u64),
	Bool(bool),
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Str(s) => f.write_str(s),
			Value::Int(n) => write!(f, "{n}"),
			Value::Bool(b) => write!(f, "{b}"),
		}
	}
}

/// Fields extracted from a vendor file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorFields {
	pub experiment_name: String,
	pub well_letter: String,
	pub well_nr: u32,
	pub site: u32,
	pub channel: u8,
}

/// Parameters an action contributes to the state when it accepts a file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Params {
	#[default]
	None,
	/// Substrings captured by `*` wildcards, in pattern order.
	Wildcards(Vec<String>),
	Vendor(VendorFields),
}

/// The state accumulated by one file on its way through the pipeline.
///
/// Every key has exactly one owner: `old`, `dir`, `check` and `keep` are set
/// at creation, `new` by the pipeline once all actions accepted, and the
/// optional groups by the single action that produces them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
	pub old: String,
	pub new: String,
	pub dir: PathBuf,
	pub check: bool,
	pub keep: bool,
	wildcards: Option<Vec<String>>,
	vendor: Option<VendorFields>,
}

impl State {
	pub fn new<T: Into<String>, D: Into<PathBuf>>(old: T, dir: D, check: bool, keep: bool) -> Self {
		let old = old.into();
		Self {
			new: old.clone(),
			old,
			dir: dir.into(),
			check,
			keep,
			wildcards: None,
			vendor: None,
		}
	}

	/// Merges the parameters returned by an action's `accept`.
	/// A group of keys can only be defined once per file.
	pub fn merge(&mut self, params: Params) -> Result<(), Error> {
		match params {
			Params::None => Ok(()),
			Params::Wildcards(captures) => {
				if self.wildcards.is_some() {
					return Err(Error::StateConflict("wildcard0".into()));
				}
				self.wildcards = Some(captures);
				Ok(())
			}
			Params::Vendor(fields) => {
				if self.vendor.is_some() {
					return Err(Error::StateConflict("experiment_name".into()));
				}
				self.vendor = Some(fields);
				Ok(())
			}
		}
	}

	pub fn wildcards(&self) -> &[String] {
		self.wildcards.as_deref().unwrap_or_default()
	}

	pub fn vendor(&self) -> Option<&VendorFields> {
		self.vendor.as_ref()
	}

	/// Looks up a placeholder key, as used in command templates.
	pub fn get(&self, key: &str) -> Option<Value> {
		match key {
			"old" => Some(Value::Str(self.old.clone())),
			"new" => Some(Value::Str(self.new.clone())),
			"dir" => Some(Value::Str(self.dir.to_string_lossy().into_owned())),
			"check" => Some(Value::Bool(self.check)),
			"keep" => Some(Value::Bool(self.keep)),
			"experiment_name" => self.vendor.as_ref().map(|v| Value::Str(v.experiment_name.clone())),
			"well_letter" => self.vendor.as_ref().map(|v| Value::Str(v.well_letter.clone())),
			"well_nr" => self.vendor.as_ref().map(|v| Value::Int(v.well_nr.into())),
			"site" => self.vendor.as_ref().map(|v| Value::Int(v.site.into())),
			"channel" => self.vendor.as_ref().map(|v| Value::Int(v.channel.into())),
			_ => {
				let index: usize = key.strip_prefix("wildcard")?.parse().ok()?;
				self.wildcards().get(index).cloned().map(Value::Str)
			}
		}
	}
}
