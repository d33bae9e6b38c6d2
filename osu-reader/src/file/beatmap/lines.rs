//! Line source shared by file and in-memory parsing.
//!
//! Beatmaps are mostly UTF-8, but some old ones were saved as UTF-16 or even UTF-32.
//! The encoding is only sniffed from the first bytes of the first line. For wide
//! encodings every null byte is dropped, which is enough to recover ASCII text.

use std::io::{self, BufRead};

use super::TextEncoding;

const BYTE_ORDER_MARKS: [(&[u8], TextEncoding); 5] = [
	(&[0x00, 0x00, 0xFE, 0xFF], TextEncoding::Utf32Be),
	(&[0xFF, 0xFE, 0x00, 0x00], TextEncoding::Utf32Le),
	(&[0xFE, 0xFF], TextEncoding::Utf16Be),
	(&[0xFF, 0xFE], TextEncoding::Utf16Le),
	(&[0xEF, 0xBB, 0xBF], TextEncoding::Utf8Bom),
];

/// Detects the encoding from the leading bytes of the first line.
#[must_use]
pub fn sniff_encoding(first_line: &[u8]) -> TextEncoding {
	BYTE_ORDER_MARKS
		.iter()
		.find(|(bom, _)| first_line.starts_with(bom))
		.map_or(TextEncoding::Utf8, |&(_, encoding)| encoding)
}

/// Reads `\n`-terminated lines of raw bytes and decodes them.
///
/// Lines are returned without their `\n` but are otherwise untouched.
#[derive(Debug)]
pub struct Lines<R> {
	reader: R,
	buf: Vec<u8>,
	encoding: Option<TextEncoding>,
}

impl<R: BufRead> Lines<R> {
	pub fn new(reader: R) -> Self {
		Self {
			reader,
			buf: Vec::new(),
			encoding: None,
		}
	}

	/// Encoding sniffed from the first line, or UTF-8 if nothing was read yet.
	#[must_use]
	pub fn encoding(&self) -> TextEncoding {
		self.encoding.unwrap_or_default()
	}

	fn read_line(&mut self) -> io::Result<Option<String>> {
		self.buf.clear();
		if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
			return Ok(None);
		}

		let encoding = *self.encoding.get_or_insert_with(|| {
			let encoding = sniff_encoding(&self.buf);
			tracing::debug!("Detected {encoding:?} encoding");
			encoding
		});

		if encoding.is_wide() {
			self.buf.retain(|&b| b != 0);
		}

		if self.buf.last() == Some(&b'\n') {
			self.buf.pop();
		}

		Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
	}
}

impl<R: BufRead> Iterator for Lines<R> {
	type Item = io::Result<String>;

	fn next(&mut self) -> Option<Self::Item> {
		self.read_line().transpose()
	}
}
