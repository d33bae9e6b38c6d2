use std::fs;
use std::io::{Cursor, ErrorKind};
use std::path::PathBuf;

use osu_reader::file::beatmap::{
	Beatmap, BeatmapParseError, BeatmapParser, Break, CurveType, Gamemode, HitObjectRef, TextEncoding,
};

fn res(name: &str) -> PathBuf {
	[env!("CARGO_MANIFEST_DIR"), "tests", "res", name].iter().collect()
}

/// Parses the fixture both from its path and from its bytes, which must give the same beatmap.
fn parse_both(name: &str, parser: &BeatmapParser) -> Beatmap {
	let path = res(name);
	let from_file = parser.parse_file(&path).unwrap();
	let from_bytes = parser.parse_reader(Cursor::new(fs::read(&path).unwrap())).unwrap();

	assert_eq!(from_file, from_bytes);
	from_file
}

#[allow(clippy::float_cmp)]
fn check_common(beatmap: &Beatmap) {
	assert_eq!(beatmap.version, 14);

	assert_eq!(beatmap.general.audio_filename, "audio.mp3");
	assert_eq!(beatmap.general.preview_time, 41238);
	assert_eq!(beatmap.general.countdown, 0);
	assert_eq!(beatmap.general.sample_set, "Soft");
	assert_eq!(beatmap.general.mode, Gamemode::Osu);
	assert!(!beatmap.general.letterbox_in_breaks);
	assert!(beatmap.general.widescreen_storyboard);

	assert_eq!(beatmap.editor.bookmarks, vec![1432, 17432, 33432]);
	assert_eq!(beatmap.editor.grid_size, 8);

	assert_eq!(beatmap.metadata.title, "Koi no Program Hatsudou");
	assert_eq!(beatmap.metadata.creator, "Sonnyc");
	assert_eq!(beatmap.metadata.version, "Euny's Hard");
	assert_eq!(beatmap.metadata.tags, vec!["vocaloid", "hatsune", "miku"]);
	assert_eq!(beatmap.metadata.beatmap_set_id, 543_210);

	assert_eq!(beatmap.difficulty.overall_difficulty, 7.);
	assert_eq!(beatmap.difficulty.slider_multiplier, 1.8);

	assert_eq!(beatmap.events.background, "bg.jpg");
	assert_eq!(beatmap.events.breaks, vec![Break { start: 20000, end: 24000 }]);

	let beats: Vec<_> = beatmap.timing_points.iter().map(|tp| tp.beat_duration).collect();
	assert_eq!(beats, vec![375., 300., 375.]);
	let kiai: Vec<_> = beatmap.timing_points.iter().map(|tp| tp.kiai).collect();
	assert_eq!(kiai, vec![false, true, false]);

	assert_eq!(beatmap.circles.len(), 2);
	assert_eq!(beatmap.spinners.len(), 1);
	assert_eq!(beatmap.spinners[0].end, 6000);

	let durations: Vec<_> = beatmap.sliders.iter().map(|slider| slider.duration).collect();
	assert_eq!(durations, vec![375, 188, 150, 240]);

	let bezier = &beatmap.sliders[0];
	assert_eq!(bezier.curve_type, CurveType::Bezier);
	assert_eq!(bezier.segments.len(), 2);
	assert_eq!(bezier.segments[1].points.len(), 2);

	let perfect = &beatmap.sliders[1];
	assert_eq!(perfect.segments[0].curve_type, CurveType::Perfect);
	assert_eq!(perfect.repeat, 2);

	assert_eq!(beatmap.sliders[2].curve_type, CurveType::Catmull);
	assert_eq!(beatmap.sliders[3].curve_type, CurveType::Linear);
}

#[test]
fn utf8() {
	let beatmap = parse_both("utf8.osu", &BeatmapParser::new());

	check_common(&beatmap);
	assert_eq!(beatmap.encoding, TextEncoding::Utf8);
	assert_eq!(beatmap.metadata.title_unicode, "恋のプログラム発動");
}

#[test]
fn utf8_with_bom() {
	let parser = BeatmapParser::new();
	let beatmap = parse_both("utf8_bom.osu", &parser);

	check_common(&beatmap);
	assert_eq!(beatmap.encoding, TextEncoding::Utf8Bom);

	// Only the line endings and the BOM differ between the two files
	let without_bom = parse_both("utf8.osu", &parser);
	assert_eq!(
		Beatmap {
			encoding: TextEncoding::Utf8,
			..beatmap
		},
		without_bom
	);
}

#[test]
fn utf16() {
	let beatmap = parse_both("utf16le.osu", &BeatmapParser::new());

	check_common(&beatmap);
	assert_eq!(beatmap.encoding, TextEncoding::Utf16Le);
	assert_eq!(beatmap.metadata.title_unicode, "Koi no Program Hatsudou");
}

#[test]
fn empty_lines_at_the_beginning() {
	let beatmap = parse_both("leading_blank_lines.osu", &BeatmapParser::new());
	check_common(&beatmap);
}

#[test]
fn no_version() {
	let path = res("no_version.osu");

	let err = BeatmapParser::new().parse_file(&path).unwrap_err();
	assert_eq!(err.filename, "no_version.osu");
	assert!(matches!(err.kind, BeatmapParseError::MissingVersion));

	let bytes = fs::read(&path).unwrap();
	assert!(matches!(
		Beatmap::from_bytes(&bytes),
		Err(BeatmapParseError::MissingVersion)
	));
}

#[test]
fn no_beatmap() {
	let err = Beatmap::from_file(res("not a file.osu")).unwrap_err();
	assert_eq!(err.filename, "not a file.osu");
	assert!(matches!(err.kind, BeatmapParseError::Io(e) if e.kind() == ErrorKind::NotFound));
}

#[test]
fn slider_paths() {
	let beatmap = parse_both("utf8.osu", &BeatmapParser::new().slider_paths(true));

	for slider in &beatmap.sliders {
		assert!(slider.approximated_path.len() >= 2);
		assert_eq!(slider.approximated_path.len(), slider.cumulative_distances.len());
		assert_eq!(slider.cumulative_distances.last(), Some(&slider.length));
	}
}

#[test]
fn hit_object_timeline() {
	let beatmap = Beatmap::from_file(res("utf8.osu")).unwrap();

	let timeline: Vec<_> = beatmap
		.hit_objects()
		.map(|object| match object {
			HitObjectRef::Circle(circle) => ('c', circle.time),
			HitObjectRef::Slider(slider) => ('s', slider.time),
			HitObjectRef::Spinner(spinner) => ('p', spinner.start),
		})
		.collect();

	assert_eq!(timeline, vec![
		('c', 1432),
		('s', 1807),
		('s', 2557),
		('s', 3307),
		('c', 4057),
		('p', 4432),
		('s', 18000),
	]);
}

#[test]
fn timing_point_lookup() {
	let beatmap = Beatmap::from_file(res("utf16le.osu")).unwrap();

	assert_eq!(beatmap.timing_point_at(0), None);
	assert_eq!(beatmap.timing_point_at(1432).map(|tp| tp.time), Some(1432));
	assert_eq!(beatmap.timing_point_at(20000).map(|tp| tp.time), Some(17432));
	assert_eq!(beatmap.timing_point_at(i32::MAX).map(|tp| tp.time), Some(33432));
}
