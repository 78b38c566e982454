use crate::codec::{BlockReader, StreamStats};
use crate::config::DecodeMode;
use crate::error::RleError;
use byteorder::{ReadBytesExt, WriteBytesExt};
use log::warn;
use std::io::{Read, Write};

/// Size of the `[width][height]` header in front of a map stream.
pub const HEADER_SIZE: u64 = 2;

/// A compressed map as it sits in the target binary: two dimension bytes,
/// then the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMap {
	pub width: u8,
	pub height: u8,
	pub stream: Vec<u8>,
}

impl EncodedMap {
	pub fn stats(&self) -> Result<StreamStats, RleError> {
		StreamStats::from_stream(&self.stream)
	}
}

pub fn write_map<W: Write>(writer: &mut W, map: &EncodedMap) -> Result<u64, RleError> {
	writer.write_u8(map.width)?;
	writer.write_u8(map.height)?;
	writer.write_all(&map.stream)?;
	Ok(HEADER_SIZE + map.stream.len() as u64)
}

pub fn read_map<R: Read>(reader: &mut R, mode: DecodeMode) -> Result<EncodedMap, RleError> {
	let width = reader.read_u8()?;
	let height = reader.read_u8()?;
	let stream = read_stream(reader, mode)?;
	Ok(EncodedMap { width, height, stream })
}

/// Read a bare stream, checking its block structure. Bytes after the
/// terminator are an error in strict mode and dropped in lenient mode.
pub fn read_stream<R: Read>(reader: &mut R, mode: DecodeMode) -> Result<Vec<u8>, RleError> {
	let mut stream = Vec::new();
	reader.read_to_end(&mut stream)?;

	let mut blocks = BlockReader::new(&stream);
	for block in &mut blocks {
		block?;
	}
	let end = blocks.offset();
	let trailing = stream.len() - end;

	if trailing > 0 {
		match mode {
			DecodeMode::Strict => return Err(RleError::TrailingDataAfterTerminator { offset: end, trailing }),
			DecodeMode::Lenient => {
				warn!("Dropping {} bytes after terminator at offset {}", trailing, end);
				stream.truncate(end);
			}
		}
	}
	Ok(stream)
}
