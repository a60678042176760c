//! File name grammar of the IC6000 microscope and its translation into the
//! naming convention of Yokogawa's CV7000.
//!
//! Grammar version 1. Example source name:
//!
//! ```text
//! 20180328_TestAbs_G - 8(fld 4 wv Red - Cy5).tif
//! ```
//!
//! which becomes `20180328_TestAbs_G08_T0001F004L01A01Z01C04.tif`.

use std::{str::FromStr, sync::LazyLock};

use regex::Regex;
use strum::{Display, EnumIter, EnumString};

use crate::{error::Error, state::VendorFields};

pub const GRAMMAR_VERSION: u32 = 1;

static IC6000_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(concat!(
		r"(?i)^(?P<date>[0-9]{8})_",
		r"(?P<name>[^_]+)_",
		r"(?P<well_letter>[A-Z]+) - (?P<well_nr>[0-9]+)",
		r"\(",
		r"fld (?P<site>[0-9]+)",
		r" wv (?P<channel_color>[A-Za-z]+) - (?P<channel_tag>.+)",
		r"\)",
		r"\.[A-Za-z0-9]+$",
	))
	.expect("IC6000 grammar is a valid regular expression")
});

/// Channel tags known to the IC6000 configuration, with their CV7000 codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter)]
pub enum Channel {
	#[strum(serialize = "DAPI")]
	Dapi = 1,
	#[strum(serialize = "FITC")]
	Fitc = 2,
	#[strum(serialize = "dsRed")]
	DsRed = 3,
	#[strum(serialize = "Cy5")]
	Cy5 = 4,
}

impl Channel {
	pub fn code(self) -> u8 {
		self as u8
	}
}

/// Result of parsing one IC6000 file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
	pub fields: VendorFields,
	pub channel_color: String,
}

impl Extracted {
	pub fn cv7000_name(&self) -> String {
		let f = &self.fields;
		format!(
			"{}_{}{:02}_T0001F{:03}L01A01Z01C{:02}.tif",
			f.experiment_name, f.well_letter, f.well_nr, f.site, f.channel
		)
	}
}

/// Parses `filename` with the IC6000 grammar.
///
/// Returns `Ok(None)` if the name does not have the IC6000 shape at all.
/// A name that has the shape but carries an unknown channel tag or an
/// out-of-range number is a [`Error::Parse`].
pub fn extract(filename: &str) -> Result<Option<Extracted>, Error> {
	let Some(captures) = IC6000_PATTERN.captures(filename) else {
		return Ok(None);
	};
	let parse_error = |reason: String| Error::Parse {
		file: filename.to_string(),
		reason,
	};

	let number = |group: &str| -> Result<u32, Error> {
		let text = &captures[group];
		text.parse::<u32>()
			.map_err(|e| parse_error(format!("invalid {} `{text}`: {e}", group.replace('_', " "))))
	};

	let tag = &captures["channel_tag"];
	let channel = Channel::from_str(tag).map_err(|_| parse_error(format!("unknown channel tag `{tag}`")))?;

	Ok(Some(Extracted {
		fields: VendorFields {
			experiment_name: format!("{}_{}", &captures["date"], &captures["name"]),
			well_letter: captures["well_letter"].to_string(),
			well_nr: number("well_nr")?,
			site: number("site")?,
			channel: channel.code(),
		},
		channel_color: captures["channel_color"].to_string(),
	}))
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use strum::IntoEnumIterator;

	#[test]
	fn parses_reference_name() {
		let extracted = extract("20180328_TestAbs_G - 8(fld 4 wv Red - Cy5).tif").unwrap().unwrap();
		assert_eq!(
			extracted.fields,
			VendorFields {
				experiment_name: "20180328_TestAbs".into(),
				well_letter: "G".into(),
				well_nr: 8,
				site: 4,
				channel: 4,
			}
		);
		assert_eq!(extracted.channel_color, "Red");
		assert_eq!(extracted.cv7000_name(), "20180328_TestAbs_G08_T0001F004L01A01Z01C04.tif");
	}

	#[test]
	fn pads_numbers_to_fixed_width() {
		let extracted = extract("20190101_Plate1_AB - 12(fld 123 wv UV - DAPI).png").unwrap().unwrap();
		assert_eq!(extracted.cv7000_name(), "20190101_Plate1_AB12_T0001F123L01A01Z01C01.tif");
	}

	#[test]
	fn other_shapes_do_not_match() {
		assert_eq!(extract("img_42_ch3.tif").unwrap(), None);
		assert_eq!(extract("C_13_fld_2_wv_405_Blue.tif").unwrap(), None);
	}

	#[test]
	fn unknown_channel_is_parse_error() {
		let err = extract("20180328_TestAbs_G - 8(fld 4 wv Red - TxRed).tif").unwrap_err();
		match err {
			Error::Parse { file, reason } => {
				assert_eq!(file, "20180328_TestAbs_G - 8(fld 4 wv Red - TxRed).tif");
				assert!(reason.contains("TxRed"));
			}
			other => panic!("unexpected error {other:?}"),
		}
	}

	#[test]
	fn channel_lookup_is_exact() {
		assert!(extract("20180328_TestAbs_G - 8(fld 4 wv Red - cy5).tif").is_err());
	}

	#[test]
	fn overflowing_site_is_parse_error() {
		let err = extract("20180328_TestAbs_G - 8(fld 99999999999 wv Red - Cy5).tif").unwrap_err();
		assert!(matches!(err, Error::Parse { .. }));
	}

	#[test]
	fn channel_codes_are_distinct() {
		let codes: Vec<u8> = Channel::iter().map(Channel::code).collect();
		assert_eq!(codes, vec![1, 2, 3, 4]);
	}
}
