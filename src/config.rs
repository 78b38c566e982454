use crate::asm::AsmSections;
use crate::error::RleError;
use std::str::FromStr;

/// Default number of values per `db` line.
pub const DEFAULT_VALUES_PER_LINE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Asm,
    Binary,
}

/// How the decoder treats bytes that follow the terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    Strict,
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }
}

impl OutputFormat {
    /// File extension used for artifacts written in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Asm => "s",
            OutputFormat::Binary => "rle",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RleConfig {
    pub format: OutputFormat,
    pub decode_mode: DecodeMode,
    pub values_per_line: usize,
    pub line_ending: LineEnding,
    pub asm_sections: AsmSections,
    /// Index of the Tiled layer to convert.
    pub layer: usize,
    pub threads: usize,
    /// Decode every encoded stream again and compare it with its source.
    pub verify: bool,
}

impl Default for RleConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Asm,
            decode_mode: DecodeMode::Strict,
            values_per_line: DEFAULT_VALUES_PER_LINE,
            line_ending: LineEnding::Lf,
            asm_sections: AsmSections::all(),
            layer: 0,
            threads: num_cpus::get(),
            verify: true,
        }
    }
}

impl RleConfig {
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_decode_mode(mut self, decode_mode: DecodeMode) -> Self {
        self.decode_mode = decode_mode;
        self
    }

    pub fn with_values_per_line(mut self, values_per_line: usize) -> Self {
        self.values_per_line = values_per_line;
        self
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn with_asm_sections(mut self, asm_sections: AsmSections) -> Self {
        self.asm_sections = asm_sections;
        self
    }

    pub fn with_layer(mut self, layer: usize) -> Self {
        self.layer = layer;
        self
    }

    pub fn validate(&self) -> Result<(), RleError> {
        if self.values_per_line == 0 {
            return Err(RleError::ConfigError("values per line must be at least 1".to_string()));
        }
        if self.threads == 0 {
            return Err(RleError::ConfigError("thread count must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl FromStr for OutputFormat {
    type Err = RleError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asm" | "s" => Ok(OutputFormat::Asm),
            "binary" | "bin" | "rle" => Ok(OutputFormat::Binary),
            _ => Err(RleError::ConfigError(format!("Invalid output format: {}", s))),
        }
    }
}

impl FromStr for DecodeMode {
    type Err = RleError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(DecodeMode::Strict),
            "lenient" => Ok(DecodeMode::Lenient),
            _ => Err(RleError::ConfigError(format!("Invalid decode mode: {}", s))),
        }
    }
}

impl FromStr for LineEnding {
    type Err = RleError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lf" => Ok(LineEnding::Lf),
            "crlf" => Ok(LineEnding::CrLf),
            "cr" => Ok(LineEnding::Cr),
            _ => Err(RleError::ConfigError(format!("Invalid line ending: {}", s))),
        }
    }
}
