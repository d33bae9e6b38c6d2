//! Small text helpers shared by the section parsers.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Could not split line with {split_char:?}")]
pub struct InvalidKeyValuePairError {
	pub split_char: char,
}

/// Parse a `field:value` pair.
///
/// Only the first `:` splits, so values may themselves contain colons.
/// The field is trimmed on both sides and the value on its left side.
pub fn parse_field_value_pair(line: &str) -> Result<(&str, &str), InvalidKeyValuePairError> {
	let (field, value) = line.split_once(':').ok_or(InvalidKeyValuePairError { split_char: ':' })?;
	Ok((field.trim(), value.trim_start()))
}

/// Split `line` on `delim`, dropping empty tokens and left-trimming the others.
#[must_use]
pub fn split_tokens(line: &str, delim: char) -> Vec<&str> {
	line.split(delim).filter(|token| !token.is_empty()).map(str::trim_start).collect()
}

/// Name between the brackets of a `[Section]` header line.
#[must_use]
pub fn section_name(line: &str) -> Option<&str> {
	line.strip_prefix('[')?.strip_suffix(']')
}

#[must_use]
pub fn is_comment(line: &str) -> bool {
	line.starts_with("//")
}
