use tilerle::config::{OutputFormat, RleConfig};
use tilerle::pipeline;

fn main() {
	let json = r#"{"layers": [{"width": 8, "height": 2, "data": [1,1,1,1,1,1,1,1, 2,3,4,4,5,5,5,5]}]}"#;

	let mut asm = Vec::<u8>::new();
	let cfg = RleConfig::default();
	let stats = pipeline::convert(&mut std::io::Cursor::new(json), &mut asm, "demo", &cfg).unwrap();
	println!("compressed {} -> {}", stats.original_size, stats.compressed_size);
	print!("{}", String::from_utf8_lossy(&asm));

	let cfg = RleConfig { format: OutputFormat::Binary, ..Default::default() };
	let mut binary = Vec::<u8>::new();
	pipeline::convert(&mut std::io::Cursor::new(json), &mut binary, "demo", &cfg).unwrap();

	let mut restored = Vec::<u8>::new();
	pipeline::unpack(&mut std::io::Cursor::new(binary), &mut restored, true, &cfg).unwrap();
	println!("restored {} tiles: {:?}", restored.len(), restored);
}
