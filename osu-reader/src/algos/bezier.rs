//! Adaptive flattening of bézier curves of any degree.
//!
//! Heavily inspired by osu!framework's `PathApproximator`.

use crate::point::Point;

/// Maximum squared second difference between consecutive control points of a flat curve.
pub const BEZIER_TOLERANCE: f64 = 0.25;

/// Number of halvings after which a curve is used as is, flat enough or not.
///
/// Each halving divides the squared second differences by 16, so this only kicks in
/// for control points thousands of screens away from the playfield.
pub const MAX_SUBDIVISION_DEPTH: u32 = 12;

/// Whether the control polygon is close enough to a straight line to be used as is.
#[must_use]
pub fn is_flat_enough(control_points: &[Point]) -> bool {
	control_points
		.windows(3)
		.all(|w| (w[0] - w[1] * 2.0 + w[2]).len_squared() <= BEZIER_TOLERANCE)
}

/// Splits a bézier curve at its middle into two curves of the same degree with de Casteljau's algorithm.
/// Pieced together, they give back the original curve.
#[must_use]
pub fn subdivide(control_points: &[Point]) -> (Vec<Point>, Vec<Point>) {
	let count = control_points.len();
	let mut midpoints = control_points.to_vec();
	let mut left = vec![Point::default(); count];
	let mut right = vec![Point::default(); count];

	for i in 0..count {
		left[i] = midpoints[0];
		right[count - i - 1] = midpoints[count - i - 1];

		for j in 0..count - i - 1 {
			midpoints[j] = midpoints[j].midpoint(midpoints[j + 1]);
		}
	}

	(left, right)
}

/// Pushes the polyline of a flat-enough curve to `output`, except for its last point.
fn approximate_flat(control_points: &[Point], output: &mut Vec<Point>) {
	let count = control_points.len();
	let (mut left, right) = subdivide(control_points);
	left.extend_from_slice(&right[1..]);

	output.push(control_points[0]);
	for i in 1..count - 1 {
		let index = 2 * i;
		output.push((left[index - 1] + left[index] * 2.0 + left[index + 1]) * 0.25);
	}
}

/// Flattens a bézier curve into a polyline.
///
/// Subdivision uses an explicit work stack and stops after [`MAX_SUBDIVISION_DEPTH`] halvings,
/// so huge control polygons can't blow up the call stack or the output.
/// Control points that aren't finite are returned as a polyline.
#[must_use]
pub fn approximate_bezier(control_points: &[Point]) -> Vec<Point> {
	let Some(&last) = control_points.last() else {
		return Vec::new();
	};

	if !control_points.iter().all(|point| point.is_finite()) {
		return control_points.to_vec();
	}

	let mut output = Vec::new();
	let mut to_flatten = vec![(control_points.to_vec(), 0)];

	while let Some((parent, depth)) = to_flatten.pop() {
		if depth >= MAX_SUBDIVISION_DEPTH || is_flat_enough(&parent) {
			approximate_flat(&parent, &mut output);
			continue;
		}

		let (left, right) = subdivide(&parent);
		// left half must come out first
		to_flatten.push((right, depth + 1));
		to_flatten.push((left, depth + 1));
	}

	output.push(last);
	output
}
