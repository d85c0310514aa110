//! Configuration types for jgraft

use crate::comments::CaptureStrategy;
use serde::{Deserialize, Serialize};

/// Root of `jgraft.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JGraftConfiguration {
    /// Output layout
    pub printer: Option<PrinterConfiguration>,

    /// Comment capture
    pub comments: Option<CommentsConfiguration>,

    /// Tree rewriting options handed to code generators
    pub transform: Option<TransformConfiguration>,
}

impl JGraftConfiguration {
    pub fn printer(&self) -> PrinterConfiguration {
        self.printer.clone().unwrap_or_default()
    }

    pub fn capture_strategy(&self) -> CaptureStrategy {
        self.comments
            .as_ref()
            .and_then(|comments| comments.strategy)
            .unwrap_or_default()
    }

    pub fn delete_annotations(&self) -> bool {
        self.transform
            .as_ref()
            .and_then(|transform| transform.delete_annotations)
            .unwrap_or(true)
    }
}

/// Indent style for printed source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    #[default]
    Tab,
    Space,
}

/// Line separator written by the printer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Platform default
    #[default]
    Native,
    Lf,
    Crlf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrinterConfiguration {
    /// `tab` or `space`
    pub indent_style: Option<IndentStyle>,

    /// Spaces per level when indenting with spaces
    pub indent_width: Option<u8>,

    /// `native`, `lf` or `crlf`
    pub line_ending: Option<LineEnding>,

    /// Start output with a timestamped `// Generated by jgraft` line
    pub header: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentsConfiguration {
    /// `treeExtras` or `lexicalScan`
    pub strategy: Option<CaptureStrategy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransformConfiguration {
    /// Remove annotations a code generator has consumed
    pub delete_annotations: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = JGraftConfiguration::default();
        assert_eq!(config.capture_strategy(), CaptureStrategy::TreeExtras);
        assert!(config.delete_annotations());
        assert_eq!(config.printer(), PrinterConfiguration::default());
    }

    #[test]
    fn test_parse_toml() {
        let config: JGraftConfiguration = toml::from_str(
            r#"
            [printer]
            indentStyle = "space"
            indentWidth = 2
            lineEnding = "lf"

            [comments]
            strategy = "lexicalScan"

            [transform]
            deleteAnnotations = false
            "#,
        )
        .unwrap();

        let printer = config.printer();
        assert_eq!(printer.indent_style, Some(IndentStyle::Space));
        assert_eq!(printer.indent_width, Some(2));
        assert_eq!(printer.line_ending, Some(LineEnding::Lf));
        assert_eq!(config.capture_strategy(), CaptureStrategy::LexicalScan);
        assert!(!config.delete_annotations());
    }

    #[test]
    fn test_unknown_enum_value_is_rejected() {
        let result: Result<JGraftConfiguration, _> =
            toml::from_str("[printer]\nindentStyle = \"mixed\"\n");
        assert!(result.is_err());
    }
}
