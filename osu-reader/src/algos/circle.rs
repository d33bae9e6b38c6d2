use std::f64::consts::TAU;

use crate::point::Point;

use super::bezier::approximate_bezier;

/// Maximum distance between the sampled chords and the actual arc.
pub const CIRCULAR_ARC_TOLERANCE: f64 = 0.1;

/// Below this magnitude of cross product, three points are considered to be on the same line.
pub const COLLINEAR_THRESHOLD: f64 = 1e-3;

/// Arcs needing more samples than this are flattened as bézier curves instead.
pub const MAX_ARC_POINTS: f64 = 10_000.0;

/// Twice the signed area of the triangle `abc`.
#[must_use]
pub fn cross(a: Point, b: Point, c: Point) -> f64 {
	(b.y - a.y).mul_add(c.x - a.x, -(b.x - a.x) * (c.y - a.y))
}

#[must_use]
pub fn is_degenerate(a: Point, b: Point, c: Point) -> bool {
	cross(a, b, c).abs() <= COLLINEAR_THRESHOLD
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CircleArcProperties {
	pub theta_start: f64,
	pub theta_range: f64,
	/// `1` for counter-clockwise arcs and `-1` for clockwise ones (in a y-down space, the other way around).
	pub direction: f64,
	pub radius: f64,
	pub center: Point,
}

/// Circle going through the three points, with the arc from `a` to `c` passing by `b`.
///
/// Returns `None` for degenerate triangles.
#[must_use]
pub fn circle_arc_properties(a: Point, b: Point, c: Point) -> Option<CircleArcProperties> {
	if is_degenerate(a, b, c) {
		return None;
	}

	let d = 2.0 * c.x.mul_add((a - b).y, a.x.mul_add((b - c).y, b.x * (c - a).y));

	let a_sq = a.len_squared();
	let b_sq = b.len_squared();
	let c_sq = c.len_squared();

	let center = Point {
		x: c_sq.mul_add((a - b).y, a_sq.mul_add((b - c).y, b_sq * (c - a).y)),
		y: c_sq.mul_add((b - a).x, a_sq.mul_add((c - b).x, b_sq * (a - c).x)),
	} / d;

	if !center.is_finite() {
		return None;
	}

	let da = a - center;
	let dc = c - center;

	let radius = da.len();

	let theta_start = da.y.atan2(da.x);
	let mut theta_end = dc.y.atan2(dc.x);
	while theta_end < theta_start {
		theta_end += TAU;
	}

	let mut theta_range = theta_end - theta_start;
	let mut direction = 1.0;

	// B must lie on the drawn side of AC
	let ortho_a_to_c = c - a;
	let ortho_a_to_c = Point {
		x: ortho_a_to_c.y,
		y: -ortho_a_to_c.x,
	};

	if ortho_a_to_c.dot(b - a) < 0.0 {
		direction = -direction;
		theta_range = TAU - theta_range;
	}

	Some(CircleArcProperties {
		theta_start,
		theta_range,
		direction,
		radius,
		center,
	})
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn approximate_arc(arc: &CircleArcProperties) -> Vec<Point> {
	// Enough points for every chord to stay within tolerance of the arc.
	// Tiny circles would make acos blow up, two points are plenty for them.
	let point_count = if 2.0 * arc.radius <= CIRCULAR_ARC_TOLERANCE {
		2.0
	} else {
		(arc.theta_range / (2.0 * (1.0 - CIRCULAR_ARC_TOLERANCE / arc.radius).acos()))
			.ceil()
			.max(2.0)
	};

	if !point_count.is_finite() || point_count > MAX_ARC_POINTS {
		return Vec::new();
	}

	let point_count = point_count as usize;
	(0..point_count)
		.map(|i| {
			let fract = i as f64 / (point_count - 1) as f64;
			let theta = (arc.direction * fract).mul_add(arc.theta_range, arc.theta_start);
			arc.center + Point::new(theta.cos(), theta.sin()) * arc.radius
		})
		.collect()
}

/// Samples the circular arc going through three control points.
///
/// Anything that isn't a proper arc of exactly three points is flattened as a bézier curve instead.
#[must_use]
pub fn approximate_perfect(control_points: &[Point]) -> Vec<Point> {
	let &[a, b, c] = control_points else {
		return approximate_bezier(control_points);
	};

	let Some(arc) = circle_arc_properties(a, b, c) else {
		tracing::trace!("Degenerate perfect curve {control_points:?}, falling back to bezier");
		return approximate_bezier(control_points);
	};

	let points = approximate_arc(&arc);
	if points.is_empty() {
		tracing::trace!("No points on perfect curve {control_points:?}, falling back to bezier");
		return approximate_bezier(control_points);
	}

	points
}
