use crate::utils::split_tokens;

use super::values::{coerce_into, coerce_or_default};
use super::{Timestamp, TimingPoint, TimingPointParseError};

/// Collects the timing points of a beatmap as they are parsed.
///
/// Inherited points get their beat duration resolved against the last uninherited point
/// ingested before them. Lookups by time go through a forward-only cursor, which makes
/// querying every hit object of a map in order linear overall.
#[derive(Debug, Default)]
pub struct TimingResolver {
	timing_points: Vec<TimingPoint>,
	last_uninherited: Option<usize>,
	cursor: usize,
}

impl TimingResolver {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a `time,beatLength,meter,sampleSet,sampleIndex,volume,uninherited,effects` line
	/// and appends the resulting timing point.
	///
	/// A negative beat length marks an inherited point. Values that can't be read are left at zero.
	///
	/// # Errors
	///
	/// Fails if the line has less than 8 values.
	pub fn ingest(&mut self, line: &str) -> Result<&TimingPoint, TimingPointParseError> {
		let tokens = split_tokens(line, ',');
		let [time, beat_length, meter, sample_set, sample_index, volume, _uninherited, effects, ..] = tokens[..] else {
			return Err(TimingPointParseError::NotEnoughValues(tokens.len()));
		};

		let mut timing_point = TimingPoint {
			time: coerce_or_default(time),
			..TimingPoint::default()
		};

		let beat_length: f64 = coerce_or_default(beat_length);
		if beat_length < 0. {
			timing_point.uninherited = false;
			timing_point.beat_duration = self
				.last_uninherited
				.map_or(0., |i| -beat_length / 100. * self.timing_points[i].beat_duration);
		} else {
			timing_point.uninherited = true;
			timing_point.beat_duration = beat_length;
			self.last_uninherited = Some(self.timing_points.len());
		}

		coerce_into(meter, &mut timing_point.meter);
		coerce_into(sample_set, &mut timing_point.sample_set);
		coerce_into(sample_index, &mut timing_point.sample_index);
		coerce_into(volume, &mut timing_point.volume);
		timing_point.kiai = coerce_or_default::<u32>(effects) & 1 != 0;

		self.timing_points.push(timing_point);
		self.cursor = 0;
		Ok(&self.timing_points[self.timing_points.len() - 1])
	}

	/// Timing point in effect at `time`, or `None` if `time` precedes every timing point.
	///
	/// The cursor only moves forward, so successive queries must not go back in time.
	pub fn point_at(&mut self, time: Timestamp) -> Option<&TimingPoint> {
		if time < self.timing_points.first()?.time {
			return None;
		}

		while self.timing_points.get(self.cursor + 1).is_some_and(|next| next.time <= time) {
			self.cursor += 1;
		}

		self.timing_points.get(self.cursor)
	}

	#[must_use]
	pub fn into_timing_points(self) -> Vec<TimingPoint> {
		self.timing_points
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::beatmap::SampleBank;

	#[test]
	fn inherited_points_scale_the_last_uninherited_one() {
		let mut resolver = TimingResolver::new();
		resolver.ingest("0,500,4,2,1,60,1,0").unwrap();
		resolver.ingest("100,-50,4,2,1,60,0,1").unwrap();
		resolver.ingest("200,-200,4,2,1,60,0,0").unwrap();

		let points = &resolver.timing_points;
		assert_eq!(points[0].beat_duration, 500.);
		assert!(points[0].uninherited);
		assert_eq!(points[1].beat_duration, 250.);
		assert!(!points[1].uninherited);
		assert!(points[1].kiai);
		assert_eq!(points[2].beat_duration, 1000.);
		assert_eq!(points[2].sample_set, SampleBank::Soft);
		assert_eq!(points[2].volume, 60);
	}

	#[test]
	fn inherited_point_without_base_is_zero() {
		let mut resolver = TimingResolver::new();
		let point = resolver.ingest("0,-100,4,1,0,100,0,0").unwrap();
		assert_eq!(point.beat_duration, 0.);
		assert!(!point.uninherited);
	}

	#[test]
	fn short_lines_are_rejected() {
		let mut resolver = TimingResolver::new();
		assert_eq!(resolver.ingest("0,500,4,1,0,100,1"), Err(TimingPointParseError::NotEnoughValues(7)));
		assert!(resolver.ingest("0,500,4,1,0,100,1,0,extra").is_ok());
		assert_eq!(resolver.timing_points.len(), 1);
	}

	#[test]
	fn kiai_is_the_first_effect_bit() {
		let mut resolver = TimingResolver::new();
		assert!(resolver.ingest("0,500,4,1,0,100,1,9").unwrap().kiai);
		assert!(!resolver.ingest("0,500,4,1,0,100,1,8").unwrap().kiai);
	}

	#[test]
	fn cursor_lookup() {
		let mut resolver = TimingResolver::new();
		resolver.ingest("100,500,4,1,0,100,1,0").unwrap();
		resolver.ingest("200,-50,4,1,0,100,0,0").unwrap();
		resolver.ingest("200,-25,4,1,0,100,0,0").unwrap();
		resolver.ingest("400,300,4,1,0,100,1,0").unwrap();

		assert_eq!(resolver.point_at(50), None);
		assert_eq!(resolver.point_at(100).map(|tp| tp.beat_duration), Some(500.));
		assert_eq!(resolver.point_at(199).map(|tp| tp.beat_duration), Some(500.));
		assert_eq!(resolver.point_at(200).map(|tp| tp.beat_duration), Some(125.));
		assert_eq!(resolver.point_at(10_000).map(|tp| tp.beat_duration), Some(300.));
	}

	#[test]
	fn empty_resolver_has_no_points() {
		assert_eq!(TimingResolver::new().point_at(0), None);
	}
}
