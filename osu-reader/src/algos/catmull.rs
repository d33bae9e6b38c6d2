use crate::point::Point;

/// Amount of samples taken on every span between two control points.
pub const CATMULL_DETAIL: usize = 50;

fn catmull_find_point(v1: Point, v2: Point, v3: Point, v4: Point, t: f64) -> Point {
	let t2 = t * t;
	let t3 = t * t2;

	let blend = |v1: f64, v2: f64, v3: f64, v4: f64| {
		0.5 * (2.0 * v2
			+ (-v1 + v3) * t
			+ (2.0 * v1 - 5.0 * v2 + 4.0 * v3 - v4) * t2
			+ (-v1 + 3.0 * v2 - 3.0 * v3 + v4) * t3)
	};

	Point {
		x: blend(v1.x, v2.x, v3.x, v4.x),
		y: blend(v1.y, v2.y, v3.y, v4.y),
	}
}

/// Samples a Catmull-Rom spline going through every control point.
///
/// Each span is sampled as consecutive `(start, end)` pairs of sub-steps, so inner samples appear
/// twice in a row. Points missing around the ends of the spline are mirrored from their neighbours.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn approximate_catmull(control_points: &[Point]) -> Vec<Point> {
	let n = control_points.len();
	let mut points = Vec::with_capacity(n.saturating_sub(1) * CATMULL_DETAIL * 2);

	for i in 0..n.saturating_sub(1) {
		let v1 = control_points[if i > 0 { i - 1 } else { i }];
		let v2 = control_points[i];
		let v3 = control_points[i + 1];
		let v4 = if i + 2 < n { control_points[i + 2] } else { v3 * 2.0 - v2 };

		for c in 0..CATMULL_DETAIL {
			points.push(catmull_find_point(v1, v2, v3, v4, c as f64 / CATMULL_DETAIL as f64));
			points.push(catmull_find_point(v1, v2, v3, v4, (c + 1) as f64 / CATMULL_DETAIL as f64));
		}
	}

	points
}
