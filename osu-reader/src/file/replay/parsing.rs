use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::file::beatmap::values::coerce_or_default;
use crate::file::beatmap::{Gamemode, Timestamp};
use crate::utils::split_tokens;

use super::{Mods, Replay, ReplayFileParseError, ReplayFrame, ReplayParseError};

const STRING_ABSENT: u8 = 0x00;
const STRING_PRESENT: u8 = 0x0b;

/// Parses `.osr` replays.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReplayParser {
	frames: bool,
}

impl ReplayParser {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether to decompress and decode the frames while parsing.
	#[must_use]
	pub fn frames(mut self, frames: bool) -> Self {
		self.frames = frames;
		self
	}

	/// Parses an osu! replay file.
	///
	/// # Errors
	///
	/// This function will return an error if the file can't be read or is malformed.
	pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Replay, ReplayFileParseError> {
		let path = path.as_ref();
		let file_err = |kind: ReplayParseError| ReplayFileParseError {
			filename: path.file_name().unwrap_or(path.as_os_str()).to_os_string(),
			kind,
		};

		let file = File::open(path).map_err(|e| file_err(e.into()))?;
		self.parse_reader(BufReader::new(file)).map_err(file_err)
	}

	/// Parses an osu! replay from any source.
	///
	/// # Errors
	///
	/// This function will return an error if the content is malformed or too short,
	/// or if frames were requested and can't be decoded.
	pub fn parse_reader<R: Read>(&self, mut reader: R) -> Result<Replay, ReplayParseError> {
		let raw_mode = reader.read_u8()?;
		let mode = Gamemode::from_raw(i32::from(raw_mode)).ok_or(ReplayParseError::InvalidGamemode(raw_mode))?;

		let mut replay = Replay {
			mode,
			game_version: reader.read_i32::<LittleEndian>()?,
			map_hash: read_string(&mut reader)?,
			player_name: read_string(&mut reader)?,
			replay_hash: read_string(&mut reader)?,
			count_300: reader.read_u16::<LittleEndian>()?,
			count_100: reader.read_u16::<LittleEndian>()?,
			count_50: reader.read_u16::<LittleEndian>()?,
			count_geki: reader.read_u16::<LittleEndian>()?,
			count_katu: reader.read_u16::<LittleEndian>()?,
			count_miss: reader.read_u16::<LittleEndian>()?,
			score: reader.read_i32::<LittleEndian>()?,
			max_combo: reader.read_u16::<LittleEndian>()?,
			full_combo: reader.read_u8()? != 0,
			mods: Mods(reader.read_u32::<LittleEndian>()?),
			life_bar: read_string(&mut reader)?,
			timestamp: reader.read_i64::<LittleEndian>()?,
			replay_compressed: read_compressed(&mut reader)?,
			frames: None,
			score_id: reader.read_i64::<LittleEndian>()?,
		};

		if self.frames {
			replay.frames = Some(replay.decode_frames()?);
		}

		Ok(replay)
	}
}

/// Reads an unsigned LEB128 integer.
fn read_uleb128<R: Read>(reader: &mut R) -> Result<u64, ReplayParseError> {
	let mut value = 0u64;
	let mut shift = 0u32;

	loop {
		let byte = reader.read_u8()?;
		let bits = u64::from(byte & 0x7f);

		if shift >= u64::BITS || (shift > 0 && bits >> (u64::BITS - shift) != 0) {
			return Err(ReplayParseError::Uleb128Overflow);
		}

		value |= bits << shift;
		if byte & 0x80 == 0 {
			return Ok(value);
		}

		shift += 7;
	}
}

fn read_bytes<R: Read>(reader: &mut R, len: u64) -> Result<Vec<u8>, ReplayParseError> {
	let mut bytes = Vec::new();
	reader.take(len).read_to_end(&mut bytes)?;

	if bytes.len() as u64 == len {
		Ok(bytes)
	} else {
		Err(io::Error::from(io::ErrorKind::UnexpectedEof).into())
	}
}

/// `0x00` for an empty string, or `0x0b` followed by the ULEB128 length and the UTF-8 bytes.
fn read_string<R: Read>(reader: &mut R) -> Result<String, ReplayParseError> {
	match reader.read_u8()? {
		STRING_ABSENT => Ok(String::new()),
		STRING_PRESENT => {
			let len = read_uleb128(reader)?;
			Ok(String::from_utf8(read_bytes(reader, len)?)?)
		}
		flag => Err(ReplayParseError::InvalidStringFlag(flag)),
	}
}

fn read_compressed<R: Read>(reader: &mut R) -> Result<Vec<u8>, ReplayParseError> {
	let len = reader.read_i32::<LittleEndian>()?;
	let len = u64::try_from(len).map_err(|_| ReplayParseError::InvalidLength(len))?;
	read_bytes(reader, len)
}

/// Decompresses the frame data and decodes its `w|x|y|z` records, where `w` is the time
/// since the previous frame.
///
/// # Errors
///
/// Fails if the data isn't a valid LZMA stream of UTF-8 text, or if a record doesn't have 4 values.
pub fn decode_frames(compressed: &[u8]) -> Result<Vec<ReplayFrame>, ReplayParseError> {
	let mut data = Vec::new();
	lzma_rs::lzma_decompress(&mut &compressed[..], &mut data)?;
	let data = String::from_utf8(data)?;

	let mut time: Timestamp = 0;
	let frames = split_tokens(&data, ',')
		.into_iter()
		.map(|record| {
			let [delta, x, y, state] = record.split('|').collect::<Vec<_>>()[..] else {
				return Err(ReplayParseError::InvalidFrame(record.to_owned()));
			};

			time = time.saturating_add(coerce_or_default(delta));
			Ok(ReplayFrame {
				time,
				x: coerce_or_default(x),
				y: coerce_or_default(y),
				state: coerce_or_default(state),
			})
		})
		.collect::<Result<Vec<_>, _>>()?;

	tracing::debug!("Decoded {} replay frames", frames.len());
	Ok(frames)
}
