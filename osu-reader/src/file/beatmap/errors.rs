use std::ffi::OsString;
use std::io;

/// Reasons for which no beatmap at all could be produced.
#[derive(Debug, thiserror::Error)]
pub enum BeatmapParseError {
	#[error(transparent)]
	Io(#[from] io::Error),

	#[error("No \"osu file format v\" line found")]
	MissingVersion,

	#[error("Invalid osu file format version in line {line:?}")]
	InvalidVersion { line: String },
}

#[derive(Debug, thiserror::Error)]
#[error("Couldn't parse beatmap file {filename:?}")]
pub struct BeatmapFileParseError {
	pub filename: OsString,
	#[source]
	pub kind: BeatmapParseError,
}

/// Reasons for skipping a line of the `[TimingPoints]` section.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimingPointParseError {
	#[error("Expected at least 8 comma-separated values, got {0}")]
	NotEnoughValues(usize),
}

/// Reasons for skipping a line of the `[HitObjects]` section.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HitObjectParseError {
	#[error("Expected at least {expected} comma-separated arguments for the hit object, got {got}")]
	NotEnoughArguments { expected: usize, got: usize },

	#[error("Hit object type {0} is neither a circle, a slider nor a spinner")]
	UnsupportedType(i32),

	#[error("Couldn't parse curve points")]
	CurvePointsParse(
		#[from]
		#[source]
		CurvePointsParseError,
	),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CurvePointsParseError {
	#[error("Expected a curve type and at least one point, got {0} tokens")]
	NotEnoughTokens(usize),

	#[error("Unknown curve type: {0:?}")]
	UnknownCurveType(String),

	#[error("Invalid slider point {0:?}")]
	InvalidSliderPoint(String),
}
