use crate::Timestamped;

use super::{Beatmap, Circle, Slider, Spinner, Timestamp};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitObjectRef<'a> {
	Circle(&'a Circle),
	Slider(&'a Slider),
	Spinner(&'a Spinner),
}

impl Timestamped for HitObjectRef<'_> {
	fn timestamp(&self) -> Timestamp {
		match self {
			Self::Circle(circle) => circle.timestamp(),
			Self::Slider(slider) => slider.timestamp(),
			Self::Spinner(spinner) => spinner.timestamp(),
		}
	}
}

impl Beatmap {
	/// Iterates over all hit objects in time order.
	///
	/// Objects starting at the same time come out as circles first, then sliders, then spinners.
	#[must_use]
	pub fn hit_objects(&self) -> HitObjectIterator<'_> {
		HitObjectIterator {
			circles: &self.circles,
			sliders: &self.sliders,
			spinners: &self.spinners,
		}
	}
}

/// Merges the three hit object lists of a beatmap, which are each sorted by time.
#[derive(Clone, Debug)]
pub struct HitObjectIterator<'a> {
	circles: &'a [Circle],
	sliders: &'a [Slider],
	spinners: &'a [Spinner],
}

fn not_after<T: Timestamped, U: Timestamped>(fst: &T, snd: &[U]) -> bool {
	snd.first().map_or(true, |snd| fst.timestamp() <= snd.timestamp())
}

impl<'a> Iterator for HitObjectIterator<'a> {
	type Item = HitObjectRef<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		if let [circle, remaining @ ..] = self.circles {
			if not_after(circle, self.sliders) && not_after(circle, self.spinners) {
				self.circles = remaining;
				return Some(HitObjectRef::Circle(circle));
			}
		}

		if let [slider, remaining @ ..] = self.sliders {
			if not_after(slider, self.spinners) {
				self.sliders = remaining;
				return Some(HitObjectRef::Slider(slider));
			}
		}

		let [spinner, remaining @ ..] = self.spinners else {
			return None;
		};
		self.spinners = remaining;
		Some(HitObjectRef::Spinner(spinner))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let len = self.circles.len() + self.sliders.len() + self.spinners.len();
		(len, Some(len))
	}
}

impl ExactSizeIterator for HitObjectIterator<'_> {}
