//! # tilerle
//!
//! Run-length encoding for 8-bit tilemaps, producing a compact byte stream
//! that can be embedded in a program and expanded by a small decoder on the
//! target machine.
//!
//! ## Stream Format
//!
//! - **Copy block**: a length `1..=127`, then that many literal bytes
//! - **Repeat block**: a negative count `-128..=-3`, then the byte to repeat
//! - **Terminator**: a single `0`
//!
//! Runs shorter than three bytes are never worth a repeat block and are kept
//! as literals.
//!
//! ## Quick Start
//!
//! ### Encoding and Decoding
//!
//! ```rust
//! use tilerle::{decode, encode};
//!
//! let tiles = [7, 7, 7, 1, 2];
//! let stream = encode(&tiles);
//! assert_eq!(stream, vec![(-3i8) as u8, 7, 2, 1, 2, 0]);
//!
//! let restored = decode(&stream).unwrap();
//! assert_eq!(restored, tiles.to_vec());
//! ```
//!
//! ### Converting a Tiled Map
//!
//! ```rust
//! use tilerle::{convert_tilemap, RleConfig};
//!
//! let json = r#"{"layers": [{"width": 4, "height": 1, "data": [1, 1, 1, 2]}]}"#;
//! let asm = convert_tilemap(json, "title", &RleConfig::default()).unwrap();
//! assert_eq!(asm, "title_map:\n\tdb 4,1\n\tdb -3,0,1,1,0\n");
//! ```
//!
//! ### Working with Files
//!
//! ```rust
//! use tilerle::pipeline;
//! use tilerle::RleConfig;
//! use std::fs::File;
//! use std::io::{BufReader, BufWriter};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RleConfig::default();
//!
//! let input = File::open("level1.json")?;
//! let output = File::create("level1.s")?;
//! let mut reader = BufReader::new(input);
//! let mut writer = BufWriter::new(output);
//!
//! let stats = pipeline::convert(&mut reader, &mut writer, "level1", &config)?;
//! println!("Compression ratio: {:.2}x", stats.ratio);
//! # Ok(())
//! # }
//! ```

pub mod asm;
pub mod cli;
pub mod codec;
pub mod config;
pub mod container;
pub mod error;
pub mod pipeline;
pub mod tilemap;

// Re-export commonly used types for convenience
pub use asm::{AsmSections, AsmWriter};
pub use codec::{decode, decode_with, encode, encode_values, Block, BlockReader, StreamStats};
pub use config::{DecodeMode, LineEnding, OutputFormat, RleConfig};
pub use container::EncodedMap;
pub use error::{Result, RleError};
pub use pipeline::ConversionStats;
pub use tilemap::Tilemap;

use std::io::Cursor;

/// Convert a Tiled JSON document held in memory to assembly source
///
/// Output format settings in `config` other than the assembly layout are
/// ignored; use [`pipeline::convert`] for binary output.
///
/// # Example
///
/// ```rust
/// use tilerle::{convert_tilemap, RleConfig};
///
/// let json = r#"{"layers": [{"width": 2, "height": 1, "data": [0, 0]}]}"#;
/// let asm = convert_tilemap(json, "empty", &RleConfig::default()).unwrap();
/// assert!(asm.starts_with("empty_map:"));
/// ```
pub fn convert_tilemap(json: &str, label: &str, config: &RleConfig) -> Result<String> {
    let config = config.clone().with_format(OutputFormat::Asm);
    let mut output = Vec::new();
    pipeline::convert(&mut Cursor::new(json), &mut output, label, &config)?;
    String::from_utf8(output).map_err(|e| RleError::InvalidTilemap(e.to_string()))
}

/// Encode a tilemap into the binary layout used on the target: two
/// dimension bytes followed by the stream
///
/// # Example
///
/// ```rust
/// use tilerle::{encode_tilemap, Tilemap};
///
/// let map = Tilemap { width: 3, height: 1, tiles: vec![4, 4, 4] };
/// assert_eq!(encode_tilemap(&map), vec![3, 1, (-3i8) as u8, 4, 0]);
/// ```
pub fn encode_tilemap(map: &Tilemap) -> Vec<u8> {
    let mut out = Vec::with_capacity(map.tiles.len() + 3);
    out.push(map.width);
    out.push(map.height);
    out.extend(encode(&map.tiles));
    out
}

/// tilerle library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get library version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: VERSION,
        authors: AUTHORS,
        description: DESCRIPTION,
    }
}

#[derive(Debug, Clone)]
pub struct VersionInfo {
    pub version: &'static str,
    pub authors: &'static str,
    pub description: &'static str,
}
