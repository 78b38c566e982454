use tilerle::cli;

fn main() {
	// Lenient decoding reports ignored trailing data as a warning.
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
	if let Err(e) = cli::run() {
		eprintln!("Error: {}", e);
		std::process::exit(1);
	}
}
