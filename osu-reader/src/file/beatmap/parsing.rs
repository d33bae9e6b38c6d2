use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::utils::{is_comment, parse_field_value_pair, section_name, split_tokens};

use super::hit_objects::{parse_hit_object, HitObject};
use super::lines::Lines;
use super::timing::TimingResolver;
use super::values::{coerce_into, coerce_or_default, FieldValue};
use super::{Beatmap, BeatmapFileParseError, BeatmapParseError, Break, EventsSection, HitObjectParseError};

const VERSION_TAG: &str = "osu file format v";

const EVENT_BACKGROUND: &str = "0,0,\"";
const EVENT_BREAKS: [&str; 2] = ["2,", "Break,"];

/// Writes the value of a `Key:Value` line into the beatmap.
type FieldSetter = fn(&mut Beatmap, &str);
type FieldTable = HashMap<&'static str, FieldSetter>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
	General,
	Editor,
	Metadata,
	Difficulty,
	Events,
	TimingPoints,
	HitObjects,
}

impl Section {
	fn from_header(line: &str) -> Option<Self> {
		match section_name(line)? {
			"General" => Some(Self::General),
			"Editor" => Some(Self::Editor),
			"Metadata" => Some(Self::Metadata),
			"Difficulty" => Some(Self::Difficulty),
			"Events" => Some(Self::Events),
			"TimingPoints" => Some(Self::TimingPoints),
			"HitObjects" => Some(Self::HitObjects),
			_ => None,
		}
	}
}

fn general_fields() -> FieldTable {
	let fields: [(&'static str, FieldSetter); 15] = [
		("AudioFilename", |b, v| coerce_into(v, &mut b.general.audio_filename)),
		("AudioLeadIn", |b, v| coerce_into(v, &mut b.general.audio_lead_in)),
		("PreviewTime", |b, v| coerce_into(v, &mut b.general.preview_time)),
		("Countdown", |b, v| coerce_into(v, &mut b.general.countdown)),
		("SampleSet", |b, v| coerce_into(v, &mut b.general.sample_set)),
		("StackLeniency", |b, v| coerce_into(v, &mut b.general.stack_leniency)),
		("Mode", |b, v| coerce_into(v, &mut b.general.mode)),
		("LetterboxInBreaks", |b, v| coerce_into(v, &mut b.general.letterbox_in_breaks)),
		("StoryFireInFront", |b, v| coerce_into(v, &mut b.general.story_fire_in_front)),
		("SkinPreference", |b, v| coerce_into(v, &mut b.general.skin_preference)),
		("EpilepsyWarning", |b, v| coerce_into(v, &mut b.general.epilepsy_warning)),
		("CountdownOffset", |b, v| coerce_into(v, &mut b.general.countdown_offset)),
		("WidescreenStoryboard", |b, v| coerce_into(v, &mut b.general.widescreen_storyboard)),
		("SpecialStyle", |b, v| coerce_into(v, &mut b.general.special_style)),
		("UseSkinSprites", |b, v| coerce_into(v, &mut b.general.use_skin_sprites)),
	];

	HashMap::from(fields)
}

fn editor_fields() -> FieldTable {
	let fields: [(&'static str, FieldSetter); 5] = [
		("Bookmarks", |b, v| coerce_into(v, &mut b.editor.bookmarks)),
		("DistanceSpacing", |b, v| coerce_into(v, &mut b.editor.distance_spacing)),
		("BeatDivisor", |b, v| coerce_into(v, &mut b.editor.beat_divisor)),
		("GridSize", |b, v| coerce_into(v, &mut b.editor.grid_size)),
		("TimelineZoom", |b, v| coerce_into(v, &mut b.editor.timeline_zoom)),
	];

	HashMap::from(fields)
}

fn metadata_fields() -> FieldTable {
	let fields: [(&'static str, FieldSetter); 10] = [
		("Title", |b, v| coerce_into(v, &mut b.metadata.title)),
		("TitleUnicode", |b, v| coerce_into(v, &mut b.metadata.title_unicode)),
		("Artist", |b, v| coerce_into(v, &mut b.metadata.artist)),
		("ArtistUnicode", |b, v| coerce_into(v, &mut b.metadata.artist_unicode)),
		("Creator", |b, v| coerce_into(v, &mut b.metadata.creator)),
		("Version", |b, v| coerce_into(v, &mut b.metadata.version)),
		("Source", |b, v| coerce_into(v, &mut b.metadata.source)),
		("Tags", |b, v| coerce_into(v, &mut b.metadata.tags)),
		("BeatmapID", |b, v| coerce_into(v, &mut b.metadata.beatmap_id)),
		("BeatmapSetID", |b, v| coerce_into(v, &mut b.metadata.beatmap_set_id)),
	];

	HashMap::from(fields)
}

fn difficulty_fields() -> FieldTable {
	let fields: [(&'static str, FieldSetter); 6] = [
		("HPDrainRate", |b, v| coerce_into(v, &mut b.difficulty.hp_drain_rate)),
		("CircleSize", |b, v| coerce_into(v, &mut b.difficulty.circle_size)),
		("OverallDifficulty", |b, v| coerce_into(v, &mut b.difficulty.overall_difficulty)),
		("ApproachRate", |b, v| coerce_into(v, &mut b.difficulty.approach_rate)),
		("SliderMultiplier", |b, v| coerce_into(v, &mut b.difficulty.slider_multiplier)),
		("SliderTickRate", |b, v| coerce_into(v, &mut b.difficulty.slider_tick_rate)),
	];

	HashMap::from(fields)
}

/// Parses `.osu` beatmaps.
///
/// The parser holds no state between two parses, so a single instance can be reused,
/// or cloned and sent to other threads.
///
/// ```no_run
/// use osu_reader::file::beatmap::BeatmapParser;
///
/// let parser = BeatmapParser::new().slider_paths(true);
/// let beatmap = parser.parse_file("map.osu")?;
/// # Ok::<(), osu_reader::file::beatmap::BeatmapFileParseError>(())
/// ```
#[derive(Clone)]
pub struct BeatmapParser {
	slider_paths: bool,
	general: FieldTable,
	editor: FieldTable,
	metadata: FieldTable,
	difficulty: FieldTable,
}

impl fmt::Debug for BeatmapParser {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BeatmapParser")
			.field("slider_paths", &self.slider_paths)
			.finish_non_exhaustive()
	}
}

impl Default for BeatmapParser {
	fn default() -> Self {
		Self::new()
	}
}

impl BeatmapParser {
	#[must_use]
	pub fn new() -> Self {
		Self {
			slider_paths: false,
			general: general_fields(),
			editor: editor_fields(),
			metadata: metadata_fields(),
			difficulty: difficulty_fields(),
		}
	}

	/// Whether to approximate the path of every slider and correct it to the slider's length.
	///
	/// This is by far the most expensive part of parsing, so it is off by default.
	#[must_use]
	pub fn slider_paths(mut self, slider_paths: bool) -> Self {
		self.slider_paths = slider_paths;
		self
	}

	/// Parses an osu! beatmap file.
	///
	/// # Errors
	///
	/// This function will return an error if the file can't be read or doesn't declare its format version.
	pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Beatmap, BeatmapFileParseError> {
		let path = path.as_ref();
		let file_err = |kind: BeatmapParseError| BeatmapFileParseError {
			filename: path.file_name().unwrap_or(path.as_os_str()).to_os_string(),
			kind,
		};

		let file = File::open(path).map_err(|e| file_err(e.into()))?;
		self.parse_reader(BufReader::new(file)).map_err(file_err)
	}

	/// Parses an osu! beatmap from any buffered source.
	///
	/// Reading from a file or from the same bytes in memory gives the same beatmap.
	///
	/// # Errors
	///
	/// This function will return an error if reading fails or if no `osu file format v` line is found.
	pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<Beatmap, BeatmapParseError> {
		let mut lines = Lines::new(reader);
		let mut beatmap = Beatmap {
			version: find_version(&mut lines)?,
			..Beatmap::default()
		};

		let mut section = None;
		let mut timing = TimingResolver::new();

		for line in &mut lines {
			let line = line?;
			let line = line.trim();
			if line.is_empty() || is_comment(line) {
				continue;
			}

			if line.starts_with('[') {
				section = Section::from_header(line);
				if section.is_none() {
					tracing::debug!("Ignoring section {line:?}");
				}
				continue;
			}

			match section {
				Some(Section::General) => set_field(&self.general, &mut beatmap, "[General]", line),
				Some(Section::Editor) => set_field(&self.editor, &mut beatmap, "[Editor]", line),
				Some(Section::Metadata) => set_field(&self.metadata, &mut beatmap, "[Metadata]", line),
				Some(Section::Difficulty) => set_field(&self.difficulty, &mut beatmap, "[Difficulty]", line),
				Some(Section::Events) => parse_event(&mut beatmap.events, line),
				Some(Section::TimingPoints) => {
					if let Err(e) = timing.ingest(line) {
						tracing::warn!("Skipping timing point {line:?}: {e}");
					}
				}
				Some(Section::HitObjects) => self.push_hit_object(&mut beatmap, &mut timing, line),
				None => {}
			}
		}

		beatmap.encoding = lines.encoding();
		beatmap.timing_points = timing.into_timing_points();
		Ok(beatmap)
	}

	fn push_hit_object(&self, beatmap: &mut Beatmap, timing: &mut TimingResolver, line: &str) {
		match parse_hit_object(line) {
			Ok(HitObject::Circle(circle)) => beatmap.circles.push(circle),
			Ok(HitObject::Slider(mut slider)) => {
				if let Some(timing_point) = timing.point_at(slider.time) {
					slider.compute_duration(timing_point.beat_duration, beatmap.difficulty.slider_multiplier);
				}

				if self.slider_paths {
					slider.compute_path();
				}

				beatmap.sliders.push(slider);
			}
			Ok(HitObject::Spinner(spinner)) => beatmap.spinners.push(spinner),
			Err(HitObjectParseError::UnsupportedType(object_type)) => {
				tracing::debug!("Ignoring hit object of type {object_type}: {line:?}");
			}
			Err(e) => tracing::warn!("Skipping hit object {line:?}: {e}"),
		}
	}
}

/// Skips lines until the one declaring the format version.
fn find_version<R: BufRead>(lines: &mut Lines<R>) -> Result<u32, BeatmapParseError> {
	for line in lines {
		let line = line?;
		let Some(index) = line.find(VERSION_TAG) else {
			continue;
		};

		return u32::coerce(&line[index + VERSION_TAG.len()..]).ok_or_else(|| BeatmapParseError::InvalidVersion {
			line: line.trim().to_owned(),
		});
	}

	Err(BeatmapParseError::MissingVersion)
}

fn set_field(fields: &FieldTable, beatmap: &mut Beatmap, section: &str, line: &str) {
	let Ok((key, value)) = parse_field_value_pair(line) else {
		tracing::debug!("{section} section: ignoring line {line:?}");
		return;
	};

	match fields.get(key) {
		Some(setter) => setter(beatmap, value),
		None => tracing::debug!("{section} section: unknown field {key:?}"),
	}
}

/// Reads the background and the breaks out of an `[Events]` line.
fn parse_event(events: &mut EventsSection, line: &str) {
	// 0,0,"bg.jpg",0,0
	if let Some(rest) = line.strip_prefix(EVENT_BACKGROUND) {
		if let Some((background, _)) = rest.split_once('"') {
			events.background = background.to_owned();
		}
		return;
	}

	// 2,start,end
	if let Some(rest) = EVENT_BREAKS.iter().find_map(|&prefix| line.strip_prefix(prefix)) {
		match split_tokens(rest, ',')[..] {
			[start, end] => events.breaks.push(Break {
				start: coerce_or_default(start),
				end: coerce_or_default(end),
			}),
			_ => tracing::warn!("Skipping break {line:?}"),
		}
		return;
	}

	tracing::trace!("Ignoring storyboard event {line:?}");
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
	use std::io::Cursor;

	use super::*;
	use crate::file::beatmap::{CurveType, Gamemode, TextEncoding};
	use crate::point::Point;

	fn parse(content: &str) -> Result<Beatmap, BeatmapParseError> {
		BeatmapParser::new().parse_reader(Cursor::new(content.as_bytes()))
	}

	const SAMPLE: &str = "osu file format v14

[General]
AudioFilename: audio.mp3
AudioLeadIn: 0
PreviewTime: 52132
Countdown: 0
SampleSet: Soft
StackLeniency: 0.5
Mode: 0
LetterboxInBreaks: 1
WidescreenStoryboard: 1
SomethingNew: 3

[Editor]
Bookmarks: 1000,2000,3500
DistanceSpacing: 1.2
BeatDivisor: 4
GridSize: 8
TimelineZoom: 2.1

[Metadata]
Title:Mou Ii Kai?
TitleUnicode:もういいかい？
Artist:Yuuna Sasara feat. Tai no Kobone
ArtistUnicode:佐咲紗花 feat. タイのコボネ
Creator:Speykious
Version:Insane
Source:
Tags:japanese j-pop vocaloid
BeatmapID:1234567
BeatmapSetID:-1

[Difficulty]
HPDrainRate:5
CircleSize:4
OverallDifficulty:8
ApproachRate:9.2
SliderMultiplier:1.4
SliderTickRate:1

[Events]
//Background and Video events
0,0,\"bg.jpg\",0,0
//Break Periods
2,10000,15000
//Storyboard Layer 0 (Background)
Sprite,Background,TopCentre,\"sb/star.png\",320,240

[TimingPoints]
0,500,4,2,0,60,1,0
1000,-50,4,2,0,60,0,1

[Colours]
Combo1 : 255,128,64

[HitObjects]
256,192,500,1,0,0:0:0:0:
100,100,1000,2,0,L|200:100,1,140
256,192,2000,12,0,3000,0:0:0:0:
64,192,2500,128,0,3000:0:0:0:0:
";

	#[test]
	fn full_beatmap() {
		let beatmap = parse(SAMPLE).unwrap();

		assert_eq!(beatmap.version, 14);
		assert_eq!(beatmap.encoding, TextEncoding::Utf8);

		assert_eq!(beatmap.general.audio_filename, "audio.mp3");
		assert_eq!(beatmap.general.preview_time, 52132);
		assert_eq!(beatmap.general.countdown, 0);
		assert_eq!(beatmap.general.sample_set, "Soft");
		assert_eq!(beatmap.general.stack_leniency, 0.5);
		assert_eq!(beatmap.general.mode, Gamemode::Osu);
		assert!(beatmap.general.letterbox_in_breaks);
		assert!(beatmap.general.widescreen_storyboard);
		assert!(beatmap.general.story_fire_in_front);

		assert_eq!(beatmap.editor.bookmarks, vec![1000, 2000, 3500]);
		assert_eq!(beatmap.editor.beat_divisor, 4);
		assert_eq!(beatmap.editor.timeline_zoom, 2.1);

		assert_eq!(beatmap.metadata.title, "Mou Ii Kai?");
		assert_eq!(beatmap.metadata.title_unicode, "もういいかい？");
		assert_eq!(beatmap.metadata.version, "Insane");
		assert_eq!(beatmap.metadata.source, "");
		assert_eq!(beatmap.metadata.tags, vec!["japanese", "j-pop", "vocaloid"]);
		assert_eq!(beatmap.metadata.beatmap_id, 1_234_567);
		assert_eq!(beatmap.metadata.beatmap_set_id, -1);

		assert_eq!(beatmap.difficulty.approach_rate, 9.2);
		assert_eq!(beatmap.difficulty.slider_multiplier, 1.4);

		assert_eq!(beatmap.events.background, "bg.jpg");
		assert_eq!(beatmap.events.breaks, vec![Break { start: 10000, end: 15000 }]);

		assert_eq!(beatmap.timing_points.len(), 2);
		assert_eq!(beatmap.timing_points[1].beat_duration, 250.);
		assert!(beatmap.timing_points[1].kiai);

		assert_eq!(beatmap.circles.len(), 1);
		assert_eq!(beatmap.circles[0].position, Point::new(256., 192.));
		assert_eq!(beatmap.sliders.len(), 1);
		assert_eq!(beatmap.sliders[0].curve_type, CurveType::Linear);
		assert_eq!(beatmap.spinners.len(), 1);
		assert_eq!(beatmap.spinners[0].end, 3000);
	}

	#[test]
	fn version_gate() {
		assert!(matches!(
			parse("[General]\nMode: 1\n"),
			Err(BeatmapParseError::MissingVersion)
		));
		assert!(matches!(parse(""), Err(BeatmapParseError::MissingVersion)));
		assert!(matches!(
			parse("osu file format vX\n"),
			Err(BeatmapParseError::InvalidVersion { .. })
		));

		let beatmap = parse("\n\n  osu file format v14  \n").unwrap();
		assert_eq!(beatmap.version, 14);

		let beatmap = parse("\u{feff}osu file format v128\r\n").unwrap();
		assert_eq!(beatmap.version, 128);
	}

	#[test]
	fn lines_before_the_version_are_not_parsed() {
		let beatmap = parse("[General]\nMode: 1\nosu file format v9\nMode: 2\n").unwrap();
		assert_eq!(beatmap.version, 9);
		assert_eq!(beatmap.general.mode, Gamemode::Osu);
	}

	#[test]
	fn unknown_sections_are_absorbed() {
		let beatmap = parse(
			"osu file format v14\n[General]\nMode: 1\n[Mystery]\nMode: 2\n200,-100,4,2,0,60,0,0\n[General]\nCountdown: 3\n",
		)
		.unwrap();

		assert_eq!(beatmap.general.mode, Gamemode::Taiko);
		assert_eq!(beatmap.general.countdown, 3);
		assert!(beatmap.timing_points.is_empty());
	}

	#[test]
	fn section_headers_match_exactly() {
		let beatmap = parse("osu file format v14\n[general]\nMode: 1\n[General\nMode: 2\n").unwrap();
		assert_eq!(beatmap.general.mode, Gamemode::Osu);
	}

	#[test]
	fn junk_values_leave_defaults() {
		let beatmap = parse(
			"osu file format v14\n[General]\nStackLeniency: abc\nMode: 9\nLetterboxInBreaks: yes\nno colon here\n[Difficulty]\nSliderMultiplier:\n",
		)
		.unwrap();

		assert_eq!(beatmap.general.stack_leniency, 0.7);
		assert_eq!(beatmap.general.mode, Gamemode::Osu);
		assert!(!beatmap.general.letterbox_in_breaks);
		assert_eq!(beatmap.difficulty.slider_multiplier, 1.4);
	}

	#[test]
	fn malformed_records_are_skipped() {
		let beatmap = parse(
			"osu file format v14\n[Events]\n0,0,\"unterminated\n2,100\n[TimingPoints]\n0,500,4\n[HitObjects]\n1,1\n1,1,100,2,0,X|5:1,1,4\n1,1,200,1,0\n",
		)
		.unwrap();

		assert_eq!(beatmap.events.background, "");
		assert!(beatmap.events.breaks.is_empty());
		assert!(beatmap.timing_points.is_empty());
		assert!(beatmap.sliders.is_empty());
		assert_eq!(beatmap.circles.len(), 1);
	}

	#[test]
	fn slider_duration() {
		let beatmap = parse(
			"osu file format v14\n[Difficulty]\nSliderMultiplier:1.4\n[TimingPoints]\n1000,500,4,2,0,60,1,0\n2000,-50,4,2,0,60,0,0\n[HitObjects]\n1,1,500,2,0,L|5:1,1,140\n1,1,1500,2,0,L|5:1,1,140\n1,1,2500,2,0,L|5:1,1,140\n",
		)
		.unwrap();

		let durations: Vec<_> = beatmap.sliders.iter().map(|slider| slider.duration).collect();
		assert_eq!(durations, vec![0, 500, 250]);
	}

	#[test]
	fn slider_paths_on_request() {
		let content = "osu file format v14\n[HitObjects]\n1,1,50000,2,0,L|5:1,7,19\n";

		let beatmap = parse(content).unwrap();
		assert!(beatmap.sliders[0].approximated_path.is_empty());
		assert!(beatmap.sliders[0].cumulative_distances.is_empty());

		let beatmap = BeatmapParser::new()
			.slider_paths(true)
			.parse_reader(Cursor::new(content.as_bytes()))
			.unwrap();
		let slider = &beatmap.sliders[0];
		assert_eq!(slider.approximated_path.last(), Some(&Point::new(20., 1.)));
		assert_eq!(slider.cumulative_distances.last(), Some(&19.));
	}

	#[test]
	fn events() {
		let mut events = EventsSection::default();
		parse_event(&mut events, "0,0,\"my bg.png\",0,0");
		parse_event(&mut events, "Break,100,200");
		parse_event(&mut events, "2, 300, 400");
		parse_event(&mut events, "2,1,2,3");
		parse_event(&mut events, "3,100,163,162,255");

		assert_eq!(events.background, "my bg.png");
		assert_eq!(events.breaks, vec![Break { start: 100, end: 200 }, Break { start: 300, end: 400 }]);
	}
}
