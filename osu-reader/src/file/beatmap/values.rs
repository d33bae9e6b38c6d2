//! Lenient conversion of text tokens into field values.
//!
//! Beatmaps in the wild carry all sorts of junk in their values, so nothing here
//! fails loudly: a token that cannot be read leaves its destination untouched.
//! Numbers are read from the longest numeric prefix of the token, so `"1234.5"`
//! is a valid integer (`1234`) and `"0.5abc"` a valid float.

use super::{Gamemode, SampleBank, Timestamp};

/// A value that can be read out of a beatmap token.
pub trait FieldValue: Sized {
	/// Reads the value, or `None` if the token holds nothing usable.
	fn coerce(token: &str) -> Option<Self>;
}

/// Overwrites `dest` with the value read from `token`, if any.
pub fn coerce_into<T: FieldValue>(token: &str, dest: &mut T) {
	if let Some(value) = T::coerce(token) {
		*dest = value;
	}
}

/// Reads a value from `token`, falling back to the type's default.
#[must_use]
pub fn coerce_or_default<T: FieldValue + Default>(token: &str) -> T {
	T::coerce(token).unwrap_or_default()
}

fn count_digits(bytes: &[u8]) -> usize {
	bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Longest `-?[0-9]+` prefix of the token, or an empty string.
fn int_prefix(token: &str, signed: bool) -> &str {
	let bytes = token.as_bytes();
	let sign = usize::from(signed && bytes.first() == Some(&b'-'));
	match count_digits(&bytes[sign..]) {
		0 => "",
		digits => &token[..sign + digits],
	}
}

/// Longest decimal number prefix of the token (with optional fraction and exponent), or an empty string.
fn float_prefix(token: &str) -> &str {
	let bytes = token.as_bytes();
	let mut end = usize::from(bytes.first() == Some(&b'-'));

	let int_digits = count_digits(&bytes[end..]);
	end += int_digits;

	let mut frac_digits = 0;
	if bytes.get(end) == Some(&b'.') {
		frac_digits = count_digits(&bytes[end + 1..]);
		if int_digits + frac_digits > 0 {
			end += 1 + frac_digits;
		}
	}

	if int_digits + frac_digits == 0 {
		return "";
	}

	if matches!(bytes.get(end), Some(b'e' | b'E')) {
		let mut exp_start = end + 1;
		if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
			exp_start += 1;
		}

		let exp_digits = count_digits(&bytes[exp_start.min(bytes.len())..]);
		if exp_digits > 0 {
			end = exp_start + exp_digits;
		}
	}

	&token[..end]
}

macro_rules! impl_int_field_value {
	($($int:ty),*) => {
		$(
			impl FieldValue for $int {
				#[allow(unused_comparisons)]
				fn coerce(token: &str) -> Option<Self> {
					int_prefix(token, <$int>::MIN < 0).parse().ok()
				}
			}
		)*
	};
}

impl_int_field_value!(u8, u16, u32, i32, i64);

impl FieldValue for f32 {
	fn coerce(token: &str) -> Option<Self> {
		float_prefix(token).parse().ok().filter(|value: &Self| value.is_finite())
	}
}

impl FieldValue for f64 {
	fn coerce(token: &str) -> Option<Self> {
		float_prefix(token).parse().ok().filter(|value: &Self| value.is_finite())
	}
}

/// `1` and `0` are the only booleans, judged by the first character alone.
impl FieldValue for bool {
	fn coerce(token: &str) -> Option<Self> {
		match token.as_bytes().first() {
			Some(b'1') => Some(true),
			Some(b'0') => Some(false),
			_ => None,
		}
	}
}

impl FieldValue for String {
	fn coerce(token: &str) -> Option<Self> {
		Some(token.to_owned())
	}
}

/// Space separated words, as found in the `Tags` field.
impl FieldValue for Vec<String> {
	fn coerce(token: &str) -> Option<Self> {
		Some(token.split(' ').filter(|tag| !tag.is_empty()).map(str::to_owned).collect())
	}
}

/// Millisecond list, as found in the `Bookmarks` field.
///
/// Commas and whitespace both separate entries. Entries that aren't numbers are skipped.
impl FieldValue for Vec<Timestamp> {
	fn coerce(token: &str) -> Option<Self> {
		Some(
			token
				.split(|c: char| c == ',' || c.is_whitespace())
				.filter_map(Timestamp::coerce)
				.collect(),
		)
	}
}

impl FieldValue for Gamemode {
	fn coerce(token: &str) -> Option<Self> {
		i32::coerce(token).and_then(Self::from_raw)
	}
}

impl FieldValue for SampleBank {
	fn coerce(token: &str) -> Option<Self> {
		i32::coerce(token).and_then(Self::from_raw)
	}
}
