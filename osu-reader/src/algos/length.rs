use crate::point::Point;

/// Distance along the path of every point, starting at `0`.
#[must_use]
pub fn path_lengths(points: &[Point]) -> Vec<f64> {
	let mut distance = 0.;
	let mut distances = Vec::with_capacity(points.len());

	if !points.is_empty() {
		distances.push(0.);
	}

	for w in points.windows(2) {
		distance += w[0].distance(w[1]);
		distances.push(distance);
	}

	distances
}

fn last_direction(points: &[Point]) -> Point {
	let [.., prev, last] = points else {
		return Point::default();
	};

	let direction = (*last - *prev).normalized();
	if direction.is_finite() {
		direction
	} else {
		Point::default()
	}
}

/// Trims or extends the path so that it is exactly `length` long.
///
/// When the path is too long, points past `length` are dropped and the last remaining segment is
/// shortened. When it is too short, a point is added in the direction of the last segment.
/// Afterwards, the last distance is exactly `length`.
///
/// Nothing happens if the path has less than two points or if `distances` doesn't match `points`.
pub fn fix_slider_length(points: &mut Vec<Point>, distances: &mut Vec<f64>, length: f64) {
	if points.len() < 2 || points.len() != distances.len() {
		return;
	}

	let mut last_distance = distances[distances.len() - 1];

	if last_distance > length {
		while distances.len() >= 2 && distances[distances.len() - 2] >= length {
			distances.pop();
			points.pop();
		}

		if points.len() >= 2 && distances[distances.len() - 1] > length {
			// interpolate within the last segment
			let direction = last_direction(points);
			distances.pop();
			points.pop();

			let prev_distance = distances[distances.len() - 1];
			let prev = points[points.len() - 1];
			points.push(prev + direction * (length - prev_distance));
			distances.push(length);
		}

		last_distance = distances[distances.len() - 1];
	}

	if last_distance < length && points.len() >= 2 {
		let direction = last_direction(points);
		let last = points[points.len() - 1];
		points.push(last + direction * (length - last_distance));
		distances.push(length);
	}
}
