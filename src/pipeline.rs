use crate::asm::{AsmSections, AsmWriter};
use crate::codec::{decode, decode_with, encode, StreamStats};
use crate::config::{OutputFormat, RleConfig};
use crate::container::{read_map, read_stream, write_map, EncodedMap};
use crate::error::RleError;
use crate::tilemap::Tilemap;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ConversionStats {
	pub original_size: u64,
	pub compressed_size: u64,
	/// Bytes written to the output, framing included.
	pub output_size: u64,
	pub ratio: f64,
	pub stream: StreamStats,
}

impl ConversionStats {
	fn new(original_size: usize, stream: &[u8], output_size: u64) -> Result<Self, RleError> {
		let compressed_size = stream.len() as u64;
		let ratio = if compressed_size > 0 { original_size as f64 / compressed_size as f64 } else { 0.0 };
		Ok(Self {
			original_size: original_size as u64,
			compressed_size,
			output_size,
			ratio,
			stream: StreamStats::from_stream(stream)?,
		})
	}
}

/// Convert a Tiled JSON document into an assembly or binary artifact.
pub fn convert<R: Read, W: Write>(
	reader: &mut R,
	writer: &mut W,
	label: &str,
	config: &RleConfig,
) -> Result<ConversionStats, RleError> {
	config.validate()?;
	let map = Tilemap::from_json(reader, config.layer)?;
	let encoded = EncodedMap { width: map.width, height: map.height, stream: encode_stream(&map.tiles, config)? };

	let output_size = match config.format {
		OutputFormat::Binary => write_map(writer, &encoded)?,
		OutputFormat::Asm => {
			let text = AsmWriter::new(config).render(label, Some((encoded.width, encoded.height)), &encoded.stream)?;
			writer.write_all(text.as_bytes())?;
			text.len() as u64
		}
	};

	info!("Converted {} ({}x{}): {} tiles -> {} bytes", label, map.width, map.height, map.tiles.len(), encoded.stream.len());
	ConversionStats::new(map.tiles.len(), &encoded.stream, output_size)
}

/// Compress arbitrary bytes. Binary output is the bare stream; assembly
/// output carries the label but no dimension line.
pub fn pack<R: Read, W: Write>(
	reader: &mut R,
	writer: &mut W,
	label: &str,
	config: &RleConfig,
) -> Result<ConversionStats, RleError> {
	config.validate()?;
	let mut source = Vec::new();
	reader.read_to_end(&mut source)?;
	let stream = encode_stream(&source, config)?;

	let output_size = match config.format {
		OutputFormat::Binary => {
			writer.write_all(&stream)?;
			stream.len() as u64
		}
		OutputFormat::Asm => {
			let text = AsmWriter::new(config)
				.with_sections(config.asm_sections - AsmSections::DIMENSIONS)
				.render(label, None, &stream)?;
			writer.write_all(text.as_bytes())?;
			text.len() as u64
		}
	};

	ConversionStats::new(source.len(), &stream, output_size)
}

/// Decode a binary stream back into raw bytes. With `header` the stream is
/// expected to follow a `[width][height]` pair, which is skipped.
pub fn unpack<R: Read, W: Write>(
	reader: &mut R,
	writer: &mut W,
	header: bool,
	config: &RleConfig,
) -> Result<u64, RleError> {
	let stream = if header {
		let map = read_map(reader, config.decode_mode)?;
		debug!("Map header: {}x{}", map.width, map.height);
		map.stream
	} else {
		read_stream(reader, config.decode_mode)?
	};

	let decoded = decode_with(&stream, config.decode_mode)?;
	writer.write_all(&decoded)?;
	Ok(decoded.len() as u64)
}

/// Block statistics for a binary stream, optionally behind a map header.
pub fn inspect<R: Read>(reader: &mut R, header: bool, config: &RleConfig) -> Result<StreamStats, RleError> {
	let stream = if header { read_map(reader, config.decode_mode)?.stream } else { read_stream(reader, config.decode_mode)? };
	StreamStats::from_stream(&stream)
}

/// Convert several tilemap files in parallel. Each output is written next to
/// its input, or into `out_dir` when given, named after the input's label.
pub fn convert_files(
	inputs: &[PathBuf],
	out_dir: Option<&Path>,
	config: &RleConfig,
) -> Result<Vec<(PathBuf, ConversionStats)>, RleError> {
	config.validate()?;

	let pool = rayon::ThreadPoolBuilder::new()
		.num_threads(config.threads)
		.build()
		.map_err(|e| RleError::ConfigError(e.to_string()))?;

	let pb = ProgressBar::new(inputs.len() as u64);
	pb.set_style(ProgressStyle::default_bar()
		.template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] Maps {pos}/{len} ({eta})")
		.map_err(|e| RleError::ConfigError(e.to_string()))?
		.progress_chars("#>-")
	);

	let results = pool.install(|| {
		inputs
			.par_iter()
			.map(|input| {
				let output = output_path_for(input, out_dir, config.format);
				let stats = convert_file(input, &output, config)?;
				pb.inc(1);
				Ok::<_, RleError>((output, stats))
			})
			.collect::<Result<Vec<_>, RleError>>()
	})?;

	pb.finish_with_message("Conversion finished");
	Ok(results)
}

/// Convert one file. The output is only created once conversion succeeded.
pub fn convert_file(input: &Path, output: &Path, config: &RleConfig) -> Result<ConversionStats, RleError> {
	let mut reader = BufReader::new(File::open(input)?);
	let mut rendered = Vec::new();
	let stats = convert(&mut reader, &mut rendered, &label_for(input), config)?;
	fs::write(output, &rendered)?;
	Ok(stats)
}

pub fn pack_file(input: &Path, output: &Path, label: &str, config: &RleConfig) -> Result<ConversionStats, RleError> {
	let mut reader = BufReader::new(File::open(input)?);
	let mut rendered = Vec::new();
	let stats = pack(&mut reader, &mut rendered, label, config)?;
	fs::write(output, &rendered)?;
	Ok(stats)
}

pub fn unpack_file(input: &Path, output: &Path, header: bool, config: &RleConfig) -> Result<u64, RleError> {
	let mut reader = BufReader::new(File::open(input)?);
	let mut decoded = Vec::new();
	let size = unpack(&mut reader, &mut decoded, header, config)?;
	fs::write(output, &decoded)?;
	Ok(size)
}

/// Label for an input file: its file name up to the first `.`.
pub fn label_for(path: &Path) -> String {
	path.file_name()
		.and_then(|name| name.to_str())
		.and_then(|name| name.split('.').next())
		.filter(|stem| !stem.is_empty())
		.unwrap_or("tiles")
		.to_string()
}

pub fn output_path_for(input: &Path, out_dir: Option<&Path>, format: OutputFormat) -> PathBuf {
	let dir = out_dir
		.map(Path::to_path_buf)
		.or_else(|| input.parent().map(Path::to_path_buf))
		.unwrap_or_default();
	dir.join(format!("{}.{}", label_for(input), format.extension()))
}

fn encode_stream(source: &[u8], config: &RleConfig) -> Result<Vec<u8>, RleError> {
	let stream = encode(source);
	if config.verify {
		let decoded = decode(&stream)?;
		if decoded != source {
			return Err(RleError::VerificationFailed(format!(
				"{} bytes encoded, {} bytes decoded",
				source.len(),
				decoded.len()
			)));
		}
	}
	debug!("Encoded {} bytes into {} stream bytes", source.len(), stream.len());
	Ok(stream)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::DecodeMode;
	use std::io::Cursor;

	const MAP: &str = r#"{"layers": [{"name": "ground", "width": 4, "height": 2, "data": [1, 1, 1, 1, 2, 3, 0, 0]}]}"#;

	#[test]
	fn test_convert_asm() {
		let mut output = Vec::<u8>::new();
		let stats = convert(&mut Cursor::new(MAP), &mut output, "level", &RleConfig::default()).unwrap();
		let text = String::from_utf8(output).unwrap();
		// tiles: 0 0 0 0 1 2 0 0
		assert_eq!(text, "level_map:\n\tdb 4,2\n\tdb -4,0,4,1,2,0,0,0\n");
		assert_eq!(stats.original_size, 8);
		assert_eq!(stats.compressed_size, 8);
		assert_eq!(stats.output_size, text.len() as u64);
		assert_eq!(stats.stream.repeat_blocks, 1);
	}

	#[test]
	fn test_convert_binary() {
		let config = RleConfig::default().with_format(OutputFormat::Binary);
		let mut output = Vec::<u8>::new();
		let stats = convert(&mut Cursor::new(MAP), &mut output, "level", &config).unwrap();
		assert_eq!(output, vec![4, 2, 0xFC, 0, 4, 1, 2, 0, 0, 0]);
		assert_eq!(stats.output_size, 10);

		let mut restored = Vec::<u8>::new();
		unpack(&mut Cursor::new(output), &mut restored, true, &config).unwrap();
		assert_eq!(restored, vec![0, 0, 0, 0, 1, 2, 0, 0]);
	}

	#[test]
	fn test_pack_unpack() {
		let data: Vec<u8> = (0..600u32).map(|i| if i % 100 < 60 { 0 } else { (i % 7) as u8 }).collect();
		let config = RleConfig::default().with_format(OutputFormat::Binary);

		let mut packed = Vec::<u8>::new();
		let stats = pack(&mut Cursor::new(data.clone()), &mut packed, "raw", &config).unwrap();
		assert!(stats.ratio > 1.0);
		assert_eq!(stats.stream.decoded_size(), data.len());

		let mut restored = Vec::<u8>::new();
		let written = unpack(&mut Cursor::new(packed), &mut restored, false, &config).unwrap();
		assert_eq!(written, data.len() as u64);
		assert_eq!(restored, data);
	}

	#[test]
	fn test_pack_asm_has_no_dimensions() {
		let mut output = Vec::<u8>::new();
		pack(&mut Cursor::new(vec![5u8; 3]), &mut output, "raw", &RleConfig::default()).unwrap();
		assert_eq!(String::from_utf8(output).unwrap(), "raw_map:\n\tdb -3,5,0\n");
	}

	#[test]
	fn test_unpack_trailing_data() {
		let stream = vec![1, 7, 0, 9];
		let strict = RleConfig::default();
		assert!(unpack(&mut Cursor::new(stream.clone()), &mut Vec::<u8>::new(), false, &strict).is_err());

		let lenient = RleConfig::default().with_decode_mode(DecodeMode::Lenient);
		let mut restored = Vec::<u8>::new();
		unpack(&mut Cursor::new(stream), &mut restored, false, &lenient).unwrap();
		assert_eq!(restored, vec![7]);
	}

	#[test]
	fn test_inspect() {
		let stream = encode(&[1, 2, 3, 3, 3, 3]);
		let stats = inspect(&mut Cursor::new(stream), false, &RleConfig::default()).unwrap();
		assert_eq!(stats.copy_blocks, 1);
		assert_eq!(stats.repeat_blocks, 1);
		assert_eq!(stats.decoded_size(), 6);
	}

	#[test]
	fn test_invalid_config() {
		let config = RleConfig::default().with_values_per_line(0);
		let err = convert(&mut Cursor::new(MAP), &mut Vec::<u8>::new(), "level", &config).unwrap_err();
		assert!(matches!(err, RleError::ConfigError(_)));
	}

	#[test]
	fn test_label_for() {
		assert_eq!(label_for(Path::new("maps/level1.json")), "level1");
		assert_eq!(label_for(Path::new("world.tmx.json")), "world");
		assert_eq!(label_for(Path::new(".json")), "tiles");
	}

	#[test]
	fn test_output_path_for() {
		let input = Path::new("maps/level1.json");
		assert_eq!(output_path_for(input, None, OutputFormat::Asm), PathBuf::from("maps/level1.s"));
		assert_eq!(
			output_path_for(input, Some(Path::new("out")), OutputFormat::Binary),
			PathBuf::from("out/level1.rle")
		);
	}
}
