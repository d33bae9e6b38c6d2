use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

pub mod errors;
pub mod hit_objects;
pub mod iters;
pub mod lines;
pub mod parsing;
pub mod timing;
pub mod values;

use crate::point::Point;
use crate::{Timestamped, TimestampedSlice};
pub use errors::*;
pub use iters::{HitObjectIterator, HitObjectRef};
pub use parsing::BeatmapParser;

/// Milliseconds from the beginning of the beatmap's audio.
pub type Timestamp = i32;

/// Game mode the beatmap was made for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Gamemode {
	#[default]
	Osu = 0,
	Taiko = 1,
	Catch = 2,
	Mania = 3,
}

impl Gamemode {
	#[must_use]
	pub const fn from_raw(raw: i32) -> Option<Self> {
		match raw {
			0 => Some(Self::Osu),
			1 => Some(Self::Taiko),
			2 => Some(Self::Catch),
			3 => Some(Self::Mania),
			_ => None,
		}
	}
}

/// Text encoding detected on the first line of the input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextEncoding {
	#[default]
	Utf8,
	/// UTF-8 preceded by a byte-order mark.
	Utf8Bom,
	Utf16Le,
	Utf16Be,
	Utf32Le,
	Utf32Be,
}

impl TextEncoding {
	/// Whether characters take more than one byte, padding ASCII text with null bytes.
	#[must_use]
	pub const fn is_wide(self) -> bool {
		!matches!(self, Self::Utf8 | Self::Utf8Bom)
	}
}

/// General information about the beatmap
#[derive(Clone, Debug, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct GeneralSection {
	/// Location of the audio file relative to the current folder
	pub audio_filename: String,
	/// Milliseconds of silence before the audio starts playing
	pub audio_lead_in: Timestamp,
	/// Time in milliseconds when the audio preview should start
	pub preview_time: Timestamp,
	/// Speed of the countdown before the first hit object
	/// - 0 = no countdown
	/// - 1 = normal
	/// - 2 = half
	/// - 3 = double
	pub countdown: u8,
	/// Sample set that will be used if timing points do not override it (Normal, Soft, Drum)
	pub sample_set: String,
	/// Multiplier for the threshold in time where hit objects placed close together stack (0–1)
	pub stack_leniency: f32,
	pub mode: Gamemode,
	/// Whether or not breaks have a letterboxing effect
	pub letterbox_in_breaks: bool,
	/// Deprecated
	pub story_fire_in_front: bool,
	/// Preferred skin to use during gameplay
	pub skin_preference: String,
	/// Whether or not a warning about flashing colours should be shown at the beginning of the map
	pub epilepsy_warning: bool,
	/// Time in beats that the countdown starts before the first hit object
	pub countdown_offset: i32,
	/// Whether or not the storyboard allows widescreen viewing
	pub widescreen_storyboard: bool,
	/// Whether or not the "N+1" style key layout is used for osu!mania
	pub special_style: bool,
	/// Whether or not the storyboard can use the user's skin images
	pub use_skin_sprites: bool,
}

impl Default for GeneralSection {
	fn default() -> Self {
		Self {
			audio_filename: String::new(),
			audio_lead_in: 0,
			preview_time: -1,
			countdown: 1,
			sample_set: "Normal".to_owned(),
			stack_leniency: 0.7,
			mode: Gamemode::Osu,
			letterbox_in_breaks: false,
			story_fire_in_front: true,
			skin_preference: String::new(),
			epilepsy_warning: false,
			countdown_offset: 0,
			widescreen_storyboard: false,
			special_style: false,
			use_skin_sprites: false,
		}
	}
}

/// Saved settings for the beatmap editor
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorSection {
	/// Time in milliseconds of bookmarks, in file order
	pub bookmarks: Vec<Timestamp>,
	/// Distance snap multiplier
	pub distance_spacing: f32,
	/// Beat snap divisor
	pub beat_divisor: i32,
	/// Grid size
	pub grid_size: i32,
	/// Scale factor for the object timeline
	pub timeline_zoom: f32,
}

/// Information used to identify the beatmap
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataSection {
	/// Romanised song title
	pub title: String,
	/// Song title
	pub title_unicode: String,
	/// Romanised song artist
	pub artist: String,
	/// Song artist
	pub artist_unicode: String,
	/// Beatmap creator
	pub creator: String,
	/// Difficulty name
	pub version: String,
	/// Original media the song was produced for
	pub source: String,
	/// Search terms
	pub tags: Vec<String>,
	/// Difficulty ID
	pub beatmap_id: i32,
	/// Beatmap ID
	pub beatmap_set_id: i32,
}

/// Difficulty settings
#[derive(Clone, Debug, PartialEq)]
pub struct DifficultySection {
	/// HP setting (0–10)
	pub hp_drain_rate: f32,
	/// CS setting (0–10)
	pub circle_size: f32,
	/// OD setting (0–10)
	pub overall_difficulty: f32,
	/// AR setting (0–10)
	pub approach_rate: f32,
	/// Base slider velocity in hundreds of osu! pixels per beat
	pub slider_multiplier: f32,
	/// Amount of slider ticks per beat
	pub slider_tick_rate: f32,
}

impl Default for DifficultySection {
	fn default() -> Self {
		Self {
			hp_drain_rate: 0.,
			circle_size: 0.,
			overall_difficulty: 0.,
			approach_rate: 0.,
			slider_multiplier: 1.4,
			slider_tick_rate: 1.,
		}
	}
}

/// Period of the map where no hit objects need to be played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Break {
	pub start: Timestamp,
	pub end: Timestamp,
}

/// The parts of the `[Events]` section that concern gameplay.
/// Storyboard commands are skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventsSection {
	/// Location of the background image relative to the beatmap directory, without quotes.
	pub background: String,
	pub breaks: Vec<Break>,
}

/// A bank of samples for normal, whistle, finish and clap hitsounds.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[repr(u8)]
pub enum SampleBank {
	#[default]
	Auto = 0,
	Normal = 1,
	Soft = 2,
	Drum = 3,
}

impl SampleBank {
	#[must_use]
	pub const fn from_raw(raw: i32) -> Option<Self> {
		match raw {
			0 => Some(Self::Auto),
			1 => Some(Self::Normal),
			2 => Some(Self::Soft),
			3 => Some(Self::Drum),
			_ => None,
		}
	}
}

/// Timing and control points
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimingPoint {
	/// Start time of the timing section.
	/// The end of the timing section is the next timing point's time (or never, if this is the last timing point).
	pub time: Timestamp,
	/// Duration of a beat in milliseconds.
	///
	/// Inherited points store a percentage of the last uninherited point's beat instead of a duration
	/// in the file. It is resolved here, so this is always an actual duration. An inherited point with no
	/// uninherited point before it has a duration of `0`.
	pub beat_duration: f64,
	/// Amount of beats in a measure. Inherited timing points ignore this property.
	pub meter: i32,
	/// Default sample set for hit objects.
	pub sample_set: SampleBank,
	/// Custom sample index for hit objects. `0` indicates osu!'s default hitsounds.
	pub sample_index: u32,
	/// Volume percentage for hit objects.
	pub volume: u8,
	/// Whether the beat duration was given directly rather than relative to a previous point.
	pub uninherited: bool,
	/// Whether kiai time is enabled.
	pub kiai: bool,
}

impl Timestamped for TimingPoint {
	fn timestamp(&self) -> Timestamp {
		self.time
	}
}

/// Type of curve used to construct a slider segment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CurveType {
	/// linear
	Linear,
	/// bézier curve
	Bezier,
	/// centripetal catmull-rom
	Catmull,
	/// perfect circle
	Perfect,
}

impl CurveType {
	#[must_use]
	pub const fn from_letter(letter: char) -> Option<Self> {
		match letter {
			'L' => Some(Self::Linear),
			'B' => Some(Self::Bezier),
			'C' => Some(Self::Catmull),
			'P' => Some(Self::Perfect),
			_ => None,
		}
	}

	#[must_use]
	pub const fn letter(self) -> char {
		match self {
			Self::Linear => 'L',
			Self::Bezier => 'B',
			Self::Catmull => 'C',
			Self::Perfect => 'P',
		}
	}
}

/// Contiguous piece of a slider curve of a single type.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
	pub curve_type: CurveType,
	/// Never empty.
	pub points: Vec<Point>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
	/// Position in osu! pixels.
	pub position: Point,
	pub time: Timestamp,
}

impl Timestamped for Circle {
	fn timestamp(&self) -> Timestamp {
		self.time
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Slider {
	pub time: Timestamp,
	/// Time in milliseconds it takes to slide once along the path.
	/// `0` if no timing point precedes the slider.
	pub duration: Timestamp,
	/// Curve type as written in the file for the first segment, before any reclassification.
	pub curve_type: CurveType,
	/// Curve pieces, the first one starting at the slider's head.
	pub segments: Vec<Segment>,
	/// Amount of times the player has to follow the slider's curve back-and-forth before
	/// the slider is complete.
	pub repeat: i32,
	/// Visual length in osu! pixels of the slider.
	pub length: f64,
	/// Approximated path of the slider, corrected to `length`.
	/// Empty unless slider paths were requested from the parser.
	pub approximated_path: Vec<Point>,
	/// Distance along the path of every point in `approximated_path`.
	pub cumulative_distances: Vec<f64>,
}

impl Slider {
	/// Position of the slider's head.
	#[must_use]
	pub fn position(&self) -> Option<Point> {
		self.segments.first()?.points.first().copied()
	}
}

impl Timestamped for Slider {
	fn timestamp(&self) -> Timestamp {
		self.time
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spinner {
	pub start: Timestamp,
	pub end: Timestamp,
}

impl Timestamped for Spinner {
	fn timestamp(&self) -> Timestamp {
		self.start
	}
}

/// `.osu` is a human-readable file format containing information about a beatmap.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Beatmap {
	/// The number in the `osu file format v14` line.
	pub version: u32,
	/// Encoding detected on the first line of the file.
	pub encoding: TextEncoding,
	/// General information about the beatmap
	pub general: GeneralSection,
	/// Saved settings for the beatmap editor
	pub editor: EditorSection,
	/// Information used to identify the beatmap
	pub metadata: MetadataSection,
	/// Difficulty settings
	pub difficulty: DifficultySection,
	/// Background and breaks
	pub events: EventsSection,
	/// Timing and control points, in file order
	pub timing_points: Vec<TimingPoint>,
	/// Hit circles, in file order
	pub circles: Vec<Circle>,
	/// Sliders, in file order
	pub sliders: Vec<Slider>,
	/// Spinners, in file order
	pub spinners: Vec<Spinner>,
}

impl Beatmap {
	/// Parses an osu! beatmap file, without computing slider paths.
	///
	/// Use [`BeatmapParser`] to get slider paths as well.
	///
	/// # Errors
	///
	/// This function will return an error if the file can't be read or doesn't declare its format version.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BeatmapFileParseError> {
		BeatmapParser::new().parse_file(path)
	}

	/// Parses an osu! beatmap held in memory, without computing slider paths.
	///
	/// # Errors
	///
	/// This function will return an error if the content doesn't declare its format version.
	pub fn from_bytes(content: &[u8]) -> Result<Self, BeatmapParseError> {
		BeatmapParser::new().parse_reader(Cursor::new(content))
	}

	/// Timing point in effect at `time`, or `None` if `time` is before the first one.
	#[must_use]
	pub fn timing_point_at(&self, time: Timestamp) -> Option<&TimingPoint> {
		self.timing_points.as_slice().between(..=time).last()
	}
}

impl FromStr for Beatmap {
	type Err = BeatmapParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_bytes(s.as_bytes())
	}
}
