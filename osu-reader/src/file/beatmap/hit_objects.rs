use std::mem;

use crate::algos::circle::is_degenerate;
use crate::algos::length::{fix_slider_length, path_lengths};
use crate::algos::slider_path;
use crate::point::Point;
use crate::utils::split_tokens;

use super::values::{coerce_into, coerce_or_default, FieldValue};
use super::{Circle, CurvePointsParseError, CurveType, HitObjectParseError, Segment, Slider, Spinner, Timestamp};

/// Position of the bit that signifies whether a hit object is a hit circle in its `type` bit flags.
pub const RAW_TYPE_HIT_CIRCLE: u8 = 0;
/// Position of the bit that signifies whether a hit object is a slider in its `type` bit flags.
pub const RAW_TYPE_SLIDER: u8 = 1;
/// Position of the bit that signifies whether a hit object is a spinner in its `type` bit flags.
pub const RAW_TYPE_SPINNER: u8 = 3;

const fn raw_is_base_type(raw_object_type: i32, base_type: u8) -> bool {
	raw_object_type & (1 << base_type) != 0
}

/// A single decoded line of the `[HitObjects]` section.
#[derive(Clone, Debug, PartialEq)]
pub enum HitObject {
	Circle(Circle),
	Slider(Slider),
	Spinner(Spinner),
}

fn not_enough_arguments(expected: usize, tokens: &[&str]) -> Result<(), HitObjectParseError> {
	if tokens.len() < expected {
		return Err(HitObjectParseError::NotEnoughArguments {
			expected,
			got: tokens.len(),
		});
	}

	Ok(())
}

/// Parse a hit object line.
///
/// The type bit flags are checked in order circle, slider, spinner, so a line flagged
/// as both a circle and a slider is a circle. Slider durations and paths are left empty,
/// as they depend on the rest of the beatmap.
///
/// # Errors
///
/// Fails if the line has too few values for its type, if its type is none of the above,
/// or if the curve of a slider can't be read.
pub fn parse_hit_object(line: &str) -> Result<HitObject, HitObjectParseError> {
	let tokens = split_tokens(line, ',');
	not_enough_arguments(4, &tokens)?;

	let object_type: i32 = coerce_or_default(tokens[3]);

	if raw_is_base_type(object_type, RAW_TYPE_HIT_CIRCLE) {
		Ok(HitObject::Circle(Circle {
			position: parse_position(tokens[0], tokens[1]),
			time: coerce_or_default(tokens[2]),
		}))
	} else if raw_is_base_type(object_type, RAW_TYPE_SLIDER) {
		not_enough_arguments(8, &tokens)?;
		Ok(HitObject::Slider(parse_slider(&tokens)?))
	} else if raw_is_base_type(object_type, RAW_TYPE_SPINNER) {
		not_enough_arguments(6, &tokens)?;
		Ok(HitObject::Spinner(Spinner {
			start: coerce_or_default(tokens[2]),
			end: coerce_or_default(tokens[5]),
		}))
	} else {
		Err(HitObjectParseError::UnsupportedType(object_type))
	}
}

fn parse_position(x: &str, y: &str) -> Point {
	Point::new(coerce_or_default(x), coerce_or_default(y))
}

/// `x,y,time,type,hitSound,curveData,slides,length,...`
fn parse_slider(tokens: &[&str]) -> Result<Slider, HitObjectParseError> {
	let head = parse_position(tokens[0], tokens[1]);
	let (curve_type, segments) = parse_curve_segments(head, tokens[5])?;

	let mut slider = Slider {
		time: coerce_or_default(tokens[2]),
		duration: 0,
		curve_type,
		segments,
		repeat: 0,
		length: 0.,
		approximated_path: Vec::new(),
		cumulative_distances: Vec::new(),
	};

	coerce_into(tokens[6], &mut slider.repeat);
	coerce_into(tokens[7], &mut slider.length);

	Ok(slider)
}

fn parse_curve_point(token: &str) -> Result<Point, CurvePointsParseError> {
	let invalid = || CurvePointsParseError::InvalidSliderPoint(token.to_owned());

	let (x, y) = token.split_once(':').ok_or_else(invalid)?;
	let x = f64::coerce(x).ok_or_else(invalid)?;
	let y = f64::coerce(y).ok_or_else(invalid)?;

	Ok(Point::new(x, y))
}

fn single_letter(token: &str) -> Option<char> {
	let mut chars = token.chars();
	let letter = chars.next()?;
	chars.next().is_none().then_some(letter)
}

/// Splits the `curveData` of a slider into segments.
///
/// ```text
/// B|380:120|332:96|332:96|304:124
/// ```
///
/// The head of the slider comes from its `x,y` values and starts the first segment.
/// A curve type letter in the middle of the points starts a new segment of that type.
/// A point repeated twice in a row also starts a new segment of the same type: the first
/// occurence ends the current segment and the second one starts the next.
///
/// Returns the curve type as written for the first segment, along with the segments.
///
/// # Errors
///
/// Fails if the curve type is unknown, if there are no points or if a point can't be read.
pub fn parse_curve_segments(head: Point, curve_data: &str) -> Result<(CurveType, Vec<Segment>), CurvePointsParseError> {
	let tokens = split_tokens(curve_data, '|');
	let [first_token, point_tokens @ ..] = &tokens[..] else {
		return Err(CurvePointsParseError::NotEnoughTokens(0));
	};

	if point_tokens.is_empty() {
		return Err(CurvePointsParseError::NotEnoughTokens(tokens.len()));
	}

	let curve_type = first_token
		.chars()
		.next()
		.and_then(CurveType::from_letter)
		.ok_or_else(|| CurvePointsParseError::UnknownCurveType((*first_token).to_owned()))?;

	let mut segments = Vec::new();
	let mut current = Segment {
		curve_type,
		points: vec![head],
	};

	for &token in point_tokens {
		if let Some(next_type) = single_letter(token).and_then(CurveType::from_letter) {
			if current.points.is_empty() {
				current.curve_type = next_type;
			} else {
				let next = Segment {
					curve_type: next_type,
					points: Vec::new(),
				};
				segments.push(mem::replace(&mut current, next));
			}
			continue;
		}

		let point = parse_curve_point(token)?;
		if current.points.last() == Some(&point) {
			let next = Segment {
				curve_type: current.curve_type,
				points: vec![point],
			};
			segments.push(mem::replace(&mut current, next));
		} else {
			current.points.push(point);
		}
	}

	segments.push(current);
	segments.retain(|segment| !segment.points.is_empty());
	for segment in &mut segments {
		reclassify(segment);
	}

	Ok((curve_type, segments))
}

/// Perfect curves only make sense with 3 points that aren't on a line.
fn reclassify(segment: &mut Segment) {
	if segment.curve_type != CurveType::Perfect {
		return;
	}

	match segment.points[..] {
		[a, b, c] if is_degenerate(a, b, c) => segment.curve_type = CurveType::Linear,
		[_, _, _] => {}
		_ => segment.curve_type = CurveType::Bezier,
	}
}

impl Slider {
	/// Sets the duration from the beat duration in effect at the slider's start.
	#[allow(clippy::cast_possible_truncation)]
	pub fn compute_duration(&mut self, beat_duration: f64, slider_multiplier: f32) {
		let duration = self.length / (f64::from(slider_multiplier) * 100.) * beat_duration;
		self.duration = duration.round() as Timestamp;
	}

	/// Approximates the slider's path and corrects it to the slider's length.
	pub fn compute_path(&mut self) {
		self.approximated_path = slider_path(&self.segments);
		self.cumulative_distances = path_lengths(&self.approximated_path);
		fix_slider_length(&mut self.approximated_path, &mut self.cumulative_distances, self.length);
	}
}
