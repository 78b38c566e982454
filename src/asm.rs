//! Assembly source output.
//!
//! A converted map is written as a label, a `db` line holding its width and
//! height, then the compressed stream as `db` lines of comma separated
//! decimal values:
//!
//! ```text
//! level1_map:
//! 	db 32,24
//! 	db -128,0,-128,0,3,1,2,3,...
//! ```

use crate::codec::signed_values;
use crate::config::{LineEnding, RleConfig};
use crate::error::RleError;
use std::fmt::Write as _;

const DIRECTIVE: &str = "db";
const LABEL_SUFFIX: &str = "_map";

bitflags::bitflags! {
	/// Optional lines emitted ahead of the stream.
	#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
	pub struct AsmSections: u8 {
		const LABEL      = 0b00000001;
		const DIMENSIONS = 0b00000010;
	}
}

impl Default for AsmSections {
	fn default() -> Self {
		AsmSections::all()
	}
}

#[derive(Debug, Clone)]
pub struct AsmWriter {
	sections: AsmSections,
	values_per_line: usize,
	line_ending: LineEnding,
}

impl AsmWriter {
	pub fn new(config: &RleConfig) -> Self {
		Self {
			sections: config.asm_sections,
			values_per_line: config.values_per_line.max(1),
			line_ending: config.line_ending,
		}
	}

	pub fn with_sections(mut self, sections: AsmSections) -> Self {
		self.sections = sections;
		self
	}

	/// Render `stream` as assembly source. The dimension line is only written
	/// when `dimensions` is given and enabled in the sections.
	pub fn render(&self, label: &str, dimensions: Option<(u8, u8)>, stream: &[u8]) -> Result<String, RleError> {
		let values = signed_values(stream)?;
		let eol = self.line_ending.as_str();
		let mut out = String::with_capacity(values.len() * 4 + label.len() + 32);

		if self.sections.contains(AsmSections::LABEL) {
			write!(out, "{}{}:{}", label, LABEL_SUFFIX, eol)?;
		}
		if let (true, Some((width, height))) = (self.sections.contains(AsmSections::DIMENSIONS), dimensions) {
			write!(out, "\t{} {},{}{}", DIRECTIVE, width, height, eol)?;
		}

		for line in values.chunks(self.values_per_line) {
			let joined = line.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",");
			write!(out, "\t{} {}{}", DIRECTIVE, joined, eol)?;
		}

		Ok(out)
	}
}
