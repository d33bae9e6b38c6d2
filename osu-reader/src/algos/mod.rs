//! Slider path approximation.
//!
//! Heavily inspired by <https://github.com/ppy/osu-framework/blob/master/osu.Framework/Utils/PathApproximator.cs>

pub mod bezier;
pub mod catmull;
pub mod circle;
pub mod conversions;
pub mod length;

use crate::file::beatmap::{CurveType, Segment};
use crate::point::Point;

use self::bezier::approximate_bezier;
use self::catmull::approximate_catmull;
use self::circle::approximate_perfect;

/// Polyline of a single segment, according to its curve type.
#[must_use]
pub fn approximate_segment(segment: &Segment) -> Vec<Point> {
	match segment.curve_type {
		CurveType::Linear => segment.points.clone(),
		CurveType::Bezier => approximate_bezier(&segment.points),
		CurveType::Catmull => approximate_catmull(&segment.points),
		CurveType::Perfect => approximate_perfect(&segment.points),
	}
}

/// Polylines of all segments, one after the other, with nothing removed.
///
/// Segment joins show up as repeated points. See [`slider_path`] for a cleaned up path.
#[must_use]
pub fn concatenated_path(segments: &[Segment]) -> Vec<Point> {
	segments.iter().flat_map(approximate_segment).collect()
}

/// Path of a slider, as used when parsing beatmaps.
///
/// Unlike [`concatenated_path`], consecutive duplicate points are dropped, and so are
/// points in the middle of a straight run (where the direction from the previous point
/// is exactly the direction to the next one).
#[must_use]
pub fn slider_path(segments: &[Segment]) -> Vec<Point> {
	let mut path: Vec<Point> = Vec::new();

	for point in segments.iter().flat_map(approximate_segment) {
		if path.last() == Some(&point) {
			continue;
		}

		if let [.., before, last] = path[..] {
			if (before - last).normalized() == (last - point).normalized() {
				path.pop();
			}
		}

		path.push(point);
	}

	path
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	fn segment(curve_type: CurveType, points: &[(i32, i32)]) -> Segment {
		Segment {
			curve_type,
			points: points.iter().copied().map(Point::from).collect(),
		}
	}

	#[test]
	fn linear_segments_are_kept_as_is() {
		let segments = [segment(CurveType::Linear, &[(1, 1), (5, 1), (5, 9)])];
		assert_eq!(approximate_segment(&segments[0]), segments[0].points);
		assert_eq!(slider_path(&segments), segments[0].points);
	}

	#[test]
	fn entry_points_differ_on_redundant_points() {
		let segments = [
			segment(CurveType::Linear, &[(1, 1), (5, 1), (3, 1)]),
			segment(CurveType::Linear, &[(3, 1), (6, 1), (6, 5)]),
		];

		assert_eq!(
			concatenated_path(&segments),
			[(1, 1), (5, 1), (3, 1), (3, 1), (6, 1), (6, 5)].map(Point::from)
		);
		// (3, 1) turns back, (6, 1) is a corner
		assert_eq!(slider_path(&segments), [(1, 1), (5, 1), (3, 1), (6, 1), (6, 5)].map(Point::from));
	}

	#[test]
	fn straight_runs_are_collapsed() {
		let segments = [segment(CurveType::Linear, &[(0, 0), (1, 0), (2, 0), (2, 0), (3, 0), (3, 3)])];
		assert_eq!(slider_path(&segments), [(0, 0), (3, 0), (3, 3)].map(Point::from));
	}

	#[test]
	fn dispatch_by_curve_type() {
		let points = [(0, 0), (50, 50), (100, 0)];
		let perfect = approximate_segment(&segment(CurveType::Perfect, &points));
		let bezier = approximate_segment(&segment(CurveType::Bezier, &points));
		let catmull = approximate_segment(&segment(CurveType::Catmull, &points));

		assert_ne!(perfect, bezier);
		assert_eq!(catmull.len(), 2 * 2 * catmull::CATMULL_DETAIL);
	}

	const CURVE_TYPES: [CurveType; 4] = [CurveType::Linear, CurveType::Bezier, CurveType::Catmull, CurveType::Perfect];

	proptest! {
		#[test]
		fn approximation_is_total(
			points in prop::collection::vec((-100i32..100, -100i32..100), 1..8),
			curve_type in prop::sample::select(CURVE_TYPES.to_vec()),
		) {
			let segment = Segment {
				curve_type,
				points: points.into_iter().map(Point::from).collect(),
			};

			let path = approximate_segment(&segment);
			prop_assert!(path.iter().all(|point| point.is_finite()));
			if curve_type != CurveType::Catmull {
				prop_assert!(!path.is_empty());
			}

			let path = slider_path(std::slice::from_ref(&segment));
			prop_assert!(path.iter().all(|point| point.is_finite()));
		}

		#[test]
		fn approximation_is_bounded_far_from_the_playfield(
			points in prop::collection::vec((-1e15f64..1e15, -1e15f64..1e15), 1..6),
			curve_type in prop::sample::select(CURVE_TYPES.to_vec()),
		) {
			let segment = Segment {
				curve_type,
				points: points.into_iter().map(|(x, y)| Point::new(x, y)).collect(),
			};

			let path = approximate_segment(&segment);
			prop_assert!(path.len() <= 5 * (1 << bezier::MAX_SUBDIVISION_DEPTH) + 1);
			if curve_type != CurveType::Catmull {
				prop_assert!(!path.is_empty());
			}
		}
	}
}
