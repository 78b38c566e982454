use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;
use tilerle::config::{OutputFormat, RleConfig};
use tilerle::{decode, encode, pipeline, Block, BlockReader};

fn tiled_json(width: u32, height: u32, data: &[u32]) -> String {
	let data = data.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",");
	format!(
		r#"{{"width":{w},"height":{h},"layers":[{{"name":"Tile Layer 1","type":"tilelayer","width":{w},"height":{h},"data":[{d}]}}]}}"#,
		w = width,
		h = height,
		d = data
	)
}

fn assert_well_formed(stream: &[u8]) {
	let blocks = BlockReader::new(stream).collect::<Result<Vec<_>, _>>().unwrap();
	let (last, body) = blocks.split_last().unwrap();
	assert_eq!(*last, Block::Terminator);
	for block in body {
		match block {
			Block::Copy(bytes) => assert!((1..=127).contains(&bytes.len())),
			Block::Repeat { count, .. } => assert!((3..=128).contains(count)),
			Block::Terminator => panic!("terminator before end of stream"),
		}
	}
	assert_eq!(blocks.iter().map(|b| b.encoded_len()).sum::<usize>(), stream.len());
}

#[test]
fn round_trip_random_sequences() {
	let mut rng = StdRng::seed_from_u64(0x71_1e);
	for _ in 0..200 {
		let len = rng.gen_range(0..2000);
		// A small alphabet makes runs of every length likely
		let alphabet = rng.gen_range(1..=8u8);
		let data: Vec<u8> = (0..len).map(|_| rng.gen_range(0..alphabet)).collect();
		let stream = encode(&data);
		assert_well_formed(&stream);
		assert_eq!(decode(&stream).unwrap(), data);
	}
}

#[test]
fn round_trip_random_runs() {
	let mut rng = StdRng::seed_from_u64(42);
	for _ in 0..50 {
		let mut data = Vec::new();
		while data.len() < 4000 {
			let value: u8 = rng.gen();
			let run = rng.gen_range(1..300);
			data.extend(std::iter::repeat(value).take(run));
		}
		let stream = encode(&data);
		assert_well_formed(&stream);
		assert_eq!(decode(&stream).unwrap(), data);
	}
}

#[test]
fn repetitive_map_compresses() {
	let mut gids = vec![1u32; 32 * 24];
	for x in 0..32 {
		gids[23 * 32 + x] = 5;
	}
	let json = tiled_json(32, 24, &gids);

	let mut output = Vec::<u8>::new();
	let cfg = RleConfig { format: OutputFormat::Binary, ..Default::default() };
	let stats = pipeline::convert(&mut Cursor::new(json), &mut output, "level", &cfg).unwrap();
	assert!(stats.ratio > 10.0);
	assert_eq!(&output[..2], &[32, 24]);

	let mut restored = Vec::<u8>::new();
	pipeline::unpack(&mut Cursor::new(output), &mut restored, true, &cfg).unwrap();
	let expected: Vec<u8> = gids.iter().map(|&g| (g - 1) as u8).collect();
	assert_eq!(restored, expected);
}

#[test]
fn asm_output_layout() {
	let gids: Vec<u32> = (1..=100).collect();
	let json = tiled_json(10, 10, &gids);

	let mut output = Vec::<u8>::new();
	pipeline::convert(&mut Cursor::new(json), &mut output, "grid", &RleConfig::default()).unwrap();
	let text = String::from_utf8(output).unwrap();
	let lines: Vec<&str> = text.lines().collect();

	assert_eq!(lines[0], "grid_map:");
	assert_eq!(lines[1], "\tdb 10,10");
	// 100 distinct tiles: copy blocks of 100 plus marker and terminator = 102 values
	assert_eq!(lines.len(), 2 + 4);
	for line in &lines[2..5] {
		assert_eq!(line.trim_start_matches("\tdb ").split(',').count(), 32);
	}
	assert_eq!(lines[2].split(',').next(), Some("\tdb 100"));
	assert!(lines[5].ends_with(",99,0"));
}

#[test]
fn batch_convert_files() {
	let dir = TempDir::new().unwrap();
	let out_dir = dir.path().join("out");
	fs::create_dir(&out_dir).unwrap();

	let first = dir.path().join("title.json");
	let second = dir.path().join("stage.tmj.json");
	fs::write(&first, tiled_json(4, 1, &[1, 1, 1, 1])).unwrap();
	fs::write(&second, tiled_json(2, 2, &[0, 3, 3, 0])).unwrap();

	let inputs = vec![first, second];
	let cfg = RleConfig { threads: 2, ..Default::default() };
	let results = pipeline::convert_files(&inputs, Some(&out_dir), &cfg).unwrap();

	assert_eq!(results.len(), 2);
	assert_eq!(results[0].0, out_dir.join("title.s"));
	assert_eq!(results[1].0, out_dir.join("stage.s"));

	let title = fs::read_to_string(out_dir.join("title.s")).unwrap();
	assert_eq!(title, "title_map:\n\tdb 4,1\n\tdb -4,0,0\n");
	let stage = fs::read_to_string(out_dir.join("stage.s")).unwrap();
	assert_eq!(stage, "stage_map:\n\tdb 2,2\n\tdb 4,0,2,2,0,0\n");
}

#[test]
fn batch_convert_reports_bad_input() {
	let dir = TempDir::new().unwrap();
	let bad = dir.path().join("bad.json");
	fs::write(&bad, tiled_json(2, 1, &[1, 300])).unwrap();

	let cfg = RleConfig { threads: 1, ..Default::default() };
	assert!(pipeline::convert_files(&[bad], None, &cfg).is_err());
	assert!(!dir.path().join("bad.s").exists());
}

#[test]
fn failed_pack_and_unpack_leave_no_output() {
	let dir = TempDir::new().unwrap();
	let truncated = dir.path().join("truncated.rle");
	fs::write(&truncated, [4u8, 1, 2]).unwrap();

	let restored = dir.path().join("restored.bin");
	let cfg = RleConfig::default();
	assert!(pipeline::unpack_file(&truncated, &restored, false, &cfg).is_err());
	assert!(!restored.exists());

	let missing = dir.path().join("missing.bin");
	let packed = dir.path().join("packed.rle");
	let cfg = cfg.with_format(OutputFormat::Binary);
	assert!(pipeline::pack_file(&missing, &packed, "missing", &cfg).is_err());
	assert!(!packed.exists());
}

#[test]
fn pack_and_unpack_files() {
	let dir = TempDir::new().unwrap();
	let raw = dir.path().join("raw.bin");
	let data: Vec<u8> = (0..300u32).map(|i| if i < 150 { 9 } else { (i % 5) as u8 }).collect();
	fs::write(&raw, &data).unwrap();

	let packed = dir.path().join("raw.rle");
	let restored = dir.path().join("restored.bin");
	let cfg = RleConfig::default().with_format(OutputFormat::Binary);
	let stats = pipeline::pack_file(&raw, &packed, "raw", &cfg).unwrap();
	assert_eq!(fs::metadata(&packed).unwrap().len(), stats.output_size);

	let size = pipeline::unpack_file(&packed, &restored, false, &cfg).unwrap();
	assert_eq!(size, data.len() as u64);
	assert_eq!(fs::read(&restored).unwrap(), data);
}
