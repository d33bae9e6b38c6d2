use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};

/// Mods enabled during a play, as a bitmask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Mods(pub u32);

impl fmt::Display for Mods {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let names: Vec<_> = Self::NAMED
			.iter()
			.filter(|&&(_, mods)| self.contains(mods))
			.map(|&(name, _)| name)
			.collect();

		if names.is_empty() {
			f.write_str("NM")
		} else {
			f.write_str(&names.join(""))
		}
	}
}

impl Mods {
	pub const NONE: Self = Self(0);
	pub const NO_FAIL: Self = Self(1 << 0);
	pub const EASY: Self = Self(1 << 1);
	/// Replaces the unused NoVideo mod.
	pub const TOUCH_DEVICE: Self = Self(1 << 2);
	pub const HIDDEN: Self = Self(1 << 3);
	pub const HARD_ROCK: Self = Self(1 << 4);
	pub const SUDDEN_DEATH: Self = Self(1 << 5);
	pub const DOUBLE_TIME: Self = Self(1 << 6);
	pub const RELAX: Self = Self(1 << 7);
	pub const HALF_TIME: Self = Self(1 << 8);
	/// Always set along with [`Mods::DOUBLE_TIME`].
	pub const NIGHTCORE: Self = Self(1 << 9);
	pub const FLASHLIGHT: Self = Self(1 << 10);
	pub const AUTOPLAY: Self = Self(1 << 11);
	pub const SPUN_OUT: Self = Self(1 << 12);
	/// Autopilot
	pub const RELAX2: Self = Self(1 << 13);
	/// Always set along with [`Mods::SUDDEN_DEATH`].
	pub const PERFECT: Self = Self(1 << 14);
	pub const KEY4: Self = Self(1 << 15);
	pub const KEY5: Self = Self(1 << 16);
	pub const KEY6: Self = Self(1 << 17);
	pub const KEY7: Self = Self(1 << 18);
	pub const KEY8: Self = Self(1 << 19);
	pub const FADE_IN: Self = Self(1 << 20);
	pub const RANDOM: Self = Self(1 << 21);
	/// Cinema
	pub const LAST_MOD: Self = Self(1 << 22);
	/// osu!cuttingedge only
	pub const TARGET_PRACTICE: Self = Self(1 << 23);
	pub const KEY9: Self = Self(1 << 24);
	pub const COOP: Self = Self(1 << 25);
	pub const KEY1: Self = Self(1 << 26);
	pub const KEY3: Self = Self(1 << 27);
	pub const KEY2: Self = Self(1 << 28);
	pub const SCORE_V2: Self = Self(1 << 29);
	pub const MIRROR: Self = Self(1 << 30);

	/// osu!mania key count mods from 4K to 8K.
	pub const KEY_MOD: Self = Self(Self::KEY4.0 | Self::KEY5.0 | Self::KEY6.0 | Self::KEY7.0 | Self::KEY8.0);

	const NAMED: [(&'static str, Self); 14] = [
		("NF", Self::NO_FAIL),
		("EZ", Self::EASY),
		("TD", Self::TOUCH_DEVICE),
		("HD", Self::HIDDEN),
		("HR", Self::HARD_ROCK),
		("SD", Self::SUDDEN_DEATH),
		("DT", Self::DOUBLE_TIME),
		("RX", Self::RELAX),
		("HT", Self::HALF_TIME),
		("NC", Self::NIGHTCORE),
		("FL", Self::FLASHLIGHT),
		("SO", Self::SPUN_OUT),
		("AP", Self::RELAX2),
		("PF", Self::PERFECT),
	];

	/// Whether every mod of `other` is enabled. Always true for [`Mods::NONE`].
	#[must_use]
	pub const fn contains(self, other: Self) -> bool {
		self.0 & other.0 == other.0
	}

	#[must_use]
	pub const fn is_empty(self) -> bool {
		self.0 == 0
	}
}

impl BitAnd for Mods {
	type Output = Self;

	fn bitand(self, rhs: Self) -> Self::Output {
		Self(self.0 & rhs.0)
	}
}

impl BitAndAssign for Mods {
	fn bitand_assign(&mut self, rhs: Self) {
		self.0 &= rhs.0;
	}
}

impl BitOr for Mods {
	type Output = Self;

	fn bitor(self, rhs: Self) -> Self::Output {
		Self(self.0 | rhs.0)
	}
}

impl BitOrAssign for Mods {
	fn bitor_assign(&mut self, rhs: Self) {
		self.0 |= rhs.0;
	}
}
