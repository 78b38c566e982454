//! Block format shared by the encoder and decoder.
//!
//! A compressed stream is a sequence of blocks, each introduced by a signed
//! one-byte marker:
//!
//! ```text
//!  marker  1..=127   copy block, followed by `marker` literal bytes
//!  marker -128..=-1  repeat block, followed by one byte repeated `-marker` times
//!  marker  0         terminator, nothing follows
//! ```
//!
//! Markers are stored as the two's-complement byte of the `i8` value.

use crate::error::RleError;

/// Longest copy block a single length marker can describe.
pub const MAX_COPY_LEN: usize = 127;

/// Shortest run the encoder stores as a repeat block.
pub const MIN_REPEAT: usize = 3;

/// Longest run a single repeat marker can describe.
pub const MAX_REPEAT: usize = 128;

pub const TERMINATOR: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block<'a> {
	Copy(&'a [u8]),
	Repeat { count: usize, value: u8 },
	Terminator,
}

impl Block<'_> {
	/// Signed marker byte. A copy block must hold `1..=MAX_COPY_LEN` bytes.
	pub fn marker(&self) -> i8 {
		match self {
			Block::Copy(bytes) => copy_marker(bytes.len()) as i8,
			Block::Repeat { count, .. } => repeat_marker(*count),
			Block::Terminator => 0,
		}
	}

	/// Number of source bytes this block expands to.
	pub fn decoded_len(&self) -> usize {
		match self {
			Block::Copy(bytes) => bytes.len(),
			Block::Repeat { count, .. } => *count,
			Block::Terminator => 0,
		}
	}

	/// Number of stream bytes this block occupies, marker included.
	pub fn encoded_len(&self) -> usize {
		match self {
			Block::Copy(bytes) => 1 + bytes.len(),
			Block::Repeat { .. } => 2,
			Block::Terminator => 1,
		}
	}
}

pub(crate) fn copy_marker(len: usize) -> u8 {
	debug_assert!((1..=MAX_COPY_LEN).contains(&len));
	len as u8
}

pub(crate) fn repeat_marker(count: usize) -> i8 {
	debug_assert!((1..=MAX_REPEAT).contains(&count));
	-(count as i16) as i8
}

/// Walks a compressed stream block by block.
///
/// Yields the terminator as its last item and stops there; anything after it
/// is left in [`BlockReader::remaining`].
pub struct BlockReader<'a> {
	stream: &'a [u8],
	offset: usize,
	finished: bool,
}

impl<'a> BlockReader<'a> {
	pub fn new(stream: &'a [u8]) -> Self {
		Self { stream, offset: 0, finished: false }
	}

	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn is_finished(&self) -> bool {
		self.finished
	}

	/// Bytes not yet consumed by the reader.
	pub fn remaining(&self) -> &'a [u8] {
		&self.stream[self.offset..]
	}

	fn read_block(&mut self) -> Result<Block<'a>, RleError> {
		let start = self.offset;
		let rest = self.remaining();
		let marker = match rest.first() {
			Some(&byte) => byte as i8,
			None => return Err(RleError::TruncatedStream { offset: start, needed: 1, available: 0 }),
		};
		let payload = &rest[1..];

		let (block, payload_len) = match marker {
			0 => (Block::Terminator, 0),
			m if m > 0 => {
				let len = m as usize;
				if payload.len() < len {
					return Err(RleError::TruncatedStream { offset: start, needed: len, available: payload.len() });
				}
				(Block::Copy(&payload[..len]), len)
			}
			m => {
				let value = *payload
					.first()
					.ok_or(RleError::TruncatedStream { offset: start, needed: 1, available: 0 })?;
				(Block::Repeat { count: -(m as i16) as usize, value }, 1)
			}
		};

		self.offset += 1 + payload_len;
		Ok(block)
	}
}

impl<'a> Iterator for BlockReader<'a> {
	type Item = Result<Block<'a>, RleError>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}
		let block = self.read_block();
		// Stop after the terminator or the first error.
		self.finished = !matches!(block, Ok(Block::Copy(_)) | Ok(Block::Repeat { .. }));
		Some(block)
	}
}

/// Block statistics for a compressed stream
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamStats {
	pub copy_blocks: usize,
	pub repeat_blocks: usize,
	pub literal_bytes: usize,
	pub repeated_bytes: usize,
	pub encoded_size: usize,
}

impl StreamStats {
	/// Walks `stream` up to and including its terminator.
	pub fn from_stream(stream: &[u8]) -> Result<Self, RleError> {
		let mut stats = StreamStats::default();
		for block in BlockReader::new(stream) {
			let block = block?;
			match block {
				Block::Copy(bytes) => {
					stats.copy_blocks += 1;
					stats.literal_bytes += bytes.len();
				}
				Block::Repeat { count, .. } => {
					stats.repeat_blocks += 1;
					stats.repeated_bytes += count;
				}
				Block::Terminator => {}
			}
			stats.encoded_size += block.encoded_len();
		}
		Ok(stats)
	}

	pub fn decoded_size(&self) -> usize {
		self.literal_bytes + self.repeated_bytes
	}

	pub fn ratio(&self) -> f64 {
		if self.encoded_size > 0 { self.decoded_size() as f64 / self.encoded_size as f64 } else { 0.0 }
	}
}

/// Renders a stream as integers the way an assembler listing shows them:
/// markers signed, payload bytes unsigned.
pub fn signed_values(stream: &[u8]) -> Result<Vec<i16>, RleError> {
	let mut values = Vec::with_capacity(stream.len());
	for block in BlockReader::new(stream) {
		let block = block?;
		values.push(block.marker() as i16);
		match block {
			Block::Copy(bytes) => values.extend(bytes.iter().map(|&b| b as i16)),
			Block::Repeat { value, .. } => values.push(value as i16),
			Block::Terminator => {}
		}
	}
	Ok(values)
}
