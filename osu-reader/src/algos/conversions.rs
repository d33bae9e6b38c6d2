//! Conversions from difficulty settings to gameplay units.

/// Time in milliseconds between the appearance of a hit object and the moment it has to be hit.
#[must_use]
pub fn ar_to_ms(ar: f32) -> f32 {
	if ar >= 5. {
		1950. - ar * 150.
	} else {
		1800. - ar * 120.
	}
}

/// Radius of a hit circle in osu! pixels.
#[must_use]
pub fn cs_to_osu_pixels(cs: f32) -> f32 {
	(512. / 16.) * (1. - 0.7 * (cs - 5.) / 5.)
}

/// Half-width in milliseconds of the window to get a 300.
#[must_use]
pub fn od_to_ms300(od: f32) -> f32 {
	(159. - 12. * od) / 2.
}

/// Half-width in milliseconds of the window to get a 100.
#[must_use]
pub fn od_to_ms100(od: f32) -> f32 {
	(279. - 16. * od) / 2.
}

/// Half-width in milliseconds of the window to get a 50.
#[must_use]
pub fn od_to_ms50(od: f32) -> f32 {
	(399. - 20. * od) / 2.
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	#[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
	fn approach_rate() {
		assert_eq!(ar_to_ms(0.), 1800.);
		assert_eq!(ar_to_ms(1.), 1680.);
		assert_eq!(ar_to_ms(4.5), 1260.);
		assert_eq!(ar_to_ms(5.), 1200.);
		assert_eq!(ar_to_ms(6.), 1050.);
		assert_eq!(ar_to_ms(10.), 450.);
		assert_eq!(ar_to_ms(10.33) as i32, 400);
		assert_eq!(ar_to_ms(11.), 300.);
	}

	#[test]
	#[allow(clippy::float_cmp)]
	fn overall_difficulty() {
		assert_eq!(od_to_ms300(0.), 79.5);
		assert_eq!(od_to_ms100(0.), 139.5);
		assert_eq!(od_to_ms50(0.), 199.5);

		assert_eq!(od_to_ms300(5.), 49.5);
		assert_eq!(od_to_ms100(5.), 99.5);
		assert_eq!(od_to_ms50(5.), 149.5);

		assert_eq!(od_to_ms300(10.), 19.5);
		assert_eq!(od_to_ms100(10.), 59.5);
		assert_eq!(od_to_ms50(10.), 99.5);
	}

	#[test]
	#[allow(clippy::float_cmp)]
	fn circle_size() {
		assert_eq!(cs_to_osu_pixels(5.), 32.);
		assert!(cs_to_osu_pixels(4.) > cs_to_osu_pixels(5.));
	}
}
