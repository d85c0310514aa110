use crate::config::{IndentStyle, LineEnding, PrinterConfiguration};

/// Prefix of the optional first output line
pub const HEADER_PREFIX: &str = "// Generated by jgraft at ";

/// Layout settings for [`super::Printer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterOptions {
    /// One level of indentation
    pub indent: String,

    /// Written at every line break the printer makes; comment text keeps its own
    pub line_separator: String,

    /// Write a timestamped header line first
    pub header: bool,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
            line_separator: native_line_separator().to_string(),
            header: false,
        }
    }
}

impl PrinterOptions {
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_line_separator(mut self, separator: impl Into<String>) -> Self {
        self.line_separator = separator.into();
        self
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// The header line, without a line separator
    pub fn header_line(&self) -> String {
        format!(
            "{HEADER_PREFIX}{}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )
    }
}

impl From<&PrinterConfiguration> for PrinterOptions {
    fn from(config: &PrinterConfiguration) -> Self {
        let defaults = PrinterOptions::default();
        let indent = match config.indent_style.unwrap_or_default() {
            IndentStyle::Tab => "\t".to_string(),
            IndentStyle::Space => " ".repeat(usize::from(config.indent_width.unwrap_or(4))),
        };
        let line_separator = match config.line_ending.unwrap_or_default() {
            LineEnding::Native => defaults.line_separator,
            LineEnding::Lf => "\n".to_string(),
            LineEnding::Crlf => "\r\n".to_string(),
        };
        Self {
            indent,
            line_separator,
            header: config.header.unwrap_or(false),
        }
    }
}

fn native_line_separator() -> &'static str {
    if cfg!(windows) { "\r\n" } else { "\n" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_configuration() {
        let config = PrinterConfiguration {
            indent_style: Some(IndentStyle::Space),
            indent_width: Some(2),
            line_ending: Some(LineEnding::Crlf),
            header: Some(true),
        };
        let options = PrinterOptions::from(&config);
        assert_eq!(options.indent, "  ");
        assert_eq!(options.line_separator, "\r\n");
        assert!(options.header);
    }

    #[test]
    fn test_header_line() {
        let line = PrinterOptions::default().header_line();
        assert!(line.starts_with(HEADER_PREFIX));
        assert!(!line.contains('\n'));
    }
}
