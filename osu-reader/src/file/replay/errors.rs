use std::ffi::OsString;
use std::io;
use std::string::FromUtf8Error;

#[derive(Debug, thiserror::Error)]
pub enum ReplayParseError {
	#[error(transparent)]
	Io(#[from] io::Error),

	#[error("Invalid string flag {0:#04x}, expected 0x00 or 0x0b")]
	InvalidStringFlag(u8),

	#[error("ULEB128 value doesn't fit in 64 bits")]
	Uleb128Overflow,

	#[error("Invalid game mode {0}")]
	InvalidGamemode(u8),

	#[error("Invalid length {0} for the compressed replay data")]
	InvalidLength(i32),

	#[error("Couldn't decompress replay data")]
	Lzma(
		#[from]
		#[source]
		lzma_rs::error::Error,
	),

	#[error("Invalid UTF-8 string")]
	Utf8(
		#[from]
		#[source]
		FromUtf8Error,
	),

	#[error("Invalid replay frame {0:?}, expected 4 values separated by '|'")]
	InvalidFrame(String),
}

#[derive(Debug, thiserror::Error)]
#[error("Couldn't parse replay file {filename:?}")]
pub struct ReplayFileParseError {
	pub filename: OsString,
	#[source]
	pub kind: ReplayParseError,
}
