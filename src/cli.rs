use crate::asm::AsmSections;
use crate::config::{DecodeMode, LineEnding, OutputFormat, RleConfig, DEFAULT_VALUES_PER_LINE};
use crate::error::RleError;
use crate::pipeline;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about, long_about = "Run-length encoder for 8-bit tilemaps")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Converts Tiled JSON maps to assembly or binary
    Convert {
        /// Tiled JSON files to convert
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<PathBuf>,

        /// Directory for the outputs (default: next to each input)
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Output format [asm, binary]
        #[arg(short, long, default_value = "asm")]
        format: OutputFormat,

        /// Index of the tile layer to convert
        #[arg(short, long, default_value_t = 0)]
        layer: usize,

        /// Values per db line
        #[arg(long, default_value_t = DEFAULT_VALUES_PER_LINE)]
        per_line: usize,

        /// Line ending for assembly output [lf, crlf, cr]
        #[arg(long, default_value = "lf")]
        line_ending: LineEnding,

        /// Omit the `<name>_map:` label line
        #[arg(long)]
        no_label: bool,

        /// Omit the width/height line
        #[arg(long)]
        no_dimensions: bool,

        /// Skip decoding each stream again to check it
        #[arg(long)]
        no_verify: bool,

        /// Number of threads to use (default: all available cores)
        #[arg(short, long)]
        threads: Option<usize>,
    },
    /// Compresses a raw byte file
    Pack {
        /// Input file to compress
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output file name
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Output format [asm, binary]
        #[arg(short, long, default_value = "binary")]
        format: OutputFormat,

        /// Label for assembly output (default: input file name)
        #[arg(long)]
        label: Option<String>,

        /// Values per db line
        #[arg(long, default_value_t = DEFAULT_VALUES_PER_LINE)]
        per_line: usize,
    },
    /// Decompresses a binary stream
    Unpack {
        /// Input stream
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output file name
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Input starts with a width/height header
        #[arg(long)]
        header: bool,

        /// Trailing data handling [strict, lenient]
        #[arg(short, long, default_value = "strict")]
        mode: DecodeMode,
    },
    /// Prints block statistics of a binary stream
    Inspect {
        /// Input stream
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Input starts with a width/height header
        #[arg(long)]
        header: bool,

        /// Trailing data handling [strict, lenient]
        #[arg(short, long, default_value = "strict")]
        mode: DecodeMode,
    },
}

pub fn run() -> Result<(), RleError> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Convert {
            inputs,
            out_dir,
            format,
            layer,
            per_line,
            line_ending,
            no_label,
            no_dimensions,
            no_verify,
            threads,
        } => {
            let mut sections = AsmSections::all();
            sections.set(AsmSections::LABEL, !*no_label);
            sections.set(AsmSections::DIMENSIONS, !*no_dimensions);

            let config = RleConfig {
                format: *format,
                layer: *layer,
                values_per_line: *per_line,
                line_ending: *line_ending,
                asm_sections: sections,
                verify: !*no_verify,
                threads: threads.unwrap_or_else(num_cpus::get),
                ..Default::default()
            };

            println!("Converting {} map(s)...", inputs.len());
            let start = Instant::now();
            let results = pipeline::convert_files(inputs, out_dir.as_deref(), &config)?;
            let duration = start.elapsed();

            for (output, stats) in &results {
                println!(
                    "  {}: {} tiles -> {} bytes ({:.2}x, {} copy / {} repeat blocks)",
                    output.display(),
                    stats.original_size,
                    stats.compressed_size,
                    stats.ratio,
                    stats.stream.copy_blocks,
                    stats.stream.repeat_blocks
                );
            }
            println!("Conversion successful!");
            println!("  Elapsed Time: {:.2?}", duration);
        }
        Commands::Pack { input, output, format, label, per_line } => {
            println!("Packing {} to {}...", input.display(), output.display());
            let config = RleConfig { format: *format, values_per_line: *per_line, ..Default::default() };
            let label = label.clone().unwrap_or_else(|| pipeline::label_for(input));

            let start = Instant::now();
            let stats = pipeline::pack_file(input, output, &label, &config)?;
            let duration = start.elapsed();

            println!("Packing successful!");
            println!("  Original Size:    {} bytes", stats.original_size);
            println!("  Compressed Size:  {} bytes", stats.compressed_size);
            println!("  Ratio:            {:.2}x", stats.ratio);
            println!("  Elapsed Time:     {:.2?}", duration);
        }
        Commands::Unpack { input, output, header, mode } => {
            println!("Unpacking {} to {}...", input.display(), output.display());
            let config = RleConfig::default().with_decode_mode(*mode);

            let start = Instant::now();
            let size = pipeline::unpack_file(input, output, *header, &config)?;
            let duration = start.elapsed();

            println!("Unpacking successful!");
            println!("  Restored Size: {} bytes", size);
            println!("  Elapsed Time:  {:.2?}", duration);
        }
        Commands::Inspect { input, header, mode } => {
            let config = RleConfig::default().with_decode_mode(*mode);
            let mut in_file = BufReader::new(File::open(input)?);
            let stats = pipeline::inspect(&mut in_file, *header, &config)?;

            println!("{}", input.display());
            println!("  Copy Blocks:      {} ({} bytes)", stats.copy_blocks, stats.literal_bytes);
            println!("  Repeat Blocks:    {} ({} bytes)", stats.repeat_blocks, stats.repeated_bytes);
            println!("  Stream Size:      {} bytes", stats.encoded_size);
            println!("  Decoded Size:     {} bytes", stats.decoded_size());
            println!("  Ratio:            {:.2}x", stats.ratio());
        }
    }

    Ok(())
}
