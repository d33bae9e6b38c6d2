//! `.osr` replay files.
//!
//! A replay is a little-endian binary record of the score followed by an LZMA stream
//! of cursor and key frames.

use std::io::Cursor;
use std::path::Path;

pub mod errors;
pub mod mods;
pub mod parsing;

use crate::file::beatmap::{Gamemode, Timestamp};
pub use errors::*;
pub use mods::Mods;
pub use parsing::ReplayParser;

/// Windows ticks (100 ns) between 0001-01-01 and the unix epoch.
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;
const TICKS_PER_MILLISECOND: i64 = 10_000;

/// Cursor position and pressed keys at a point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReplayFrame {
	/// Time in milliseconds from the beginning of the beatmap's audio.
	pub time: Timestamp,
	/// Horizontal cursor position in osu! pixels.
	pub x: f32,
	/// Vertical cursor position in osu! pixels.
	pub y: f32,
	/// Bitwise combination of the pressed keys and buttons.
	pub state: i32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Replay {
	pub mode: Gamemode,
	/// Version of the game when the replay was created, e.g. `20150414`.
	pub game_version: i32,
	/// MD5 hash of the beatmap.
	pub map_hash: String,
	pub player_name: String,
	/// MD5 hash of the replay.
	pub replay_hash: String,
	pub count_300: u16,
	pub count_100: u16,
	pub count_50: u16,
	pub count_geki: u16,
	pub count_katu: u16,
	pub count_miss: u16,
	pub score: i32,
	pub max_combo: u16,
	/// Perfect combo: no misses, no slider breaks and no early finished sliders.
	pub full_combo: bool,
	pub mods: Mods,
	/// Comma separated `time|hp` pairs, as written in the file.
	pub life_bar: String,
	/// Windows ticks (100 ns) since 0001-01-01.
	pub timestamp: i64,
	/// LZMA compressed frame data.
	pub replay_compressed: Vec<u8>,
	/// Decoded frames, if requested from the parser.
	pub frames: Option<Vec<ReplayFrame>>,
	pub score_id: i64,
}

impl Replay {
	/// Parses a replay file, without decoding its frames.
	///
	/// # Errors
	///
	/// This function will return an error if the file can't be read or is malformed.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReplayFileParseError> {
		ReplayParser::new().parse_file(path)
	}

	/// Parses a replay held in memory, without decoding its frames.
	///
	/// # Errors
	///
	/// This function will return an error if the content is malformed or too short.
	pub fn from_bytes(content: &[u8]) -> Result<Self, ReplayParseError> {
		ReplayParser::new().parse_reader(Cursor::new(content))
	}

	/// Milliseconds since the unix epoch at which the play was made.
	#[must_use]
	pub const fn unix_timestamp_ms(&self) -> i64 {
		(self.timestamp - UNIX_EPOCH_TICKS) / TICKS_PER_MILLISECOND
	}

	/// Decompresses and decodes the frames of the replay.
	///
	/// # Errors
	///
	/// This function will return an error if the data can't be decompressed or contains a malformed frame.
	pub fn decode_frames(&self) -> Result<Vec<ReplayFrame>, ReplayParseError> {
		parsing::decode_frames(&self.replay_compressed)
	}
}
