//! Configuration for jgraft
//!
//! Settings live in a TOML file, `jgraft.toml` or `.jgraft.toml`, found by
//! walking up from the working directory. Every key is optional.
//!
//! ```toml
//! [printer]
//! indentStyle = "tab"      # or "space"
//! indentWidth = 4          # spaces per level with indentStyle = "space"
//! lineEnding = "native"    # "lf" or "crlf"
//! header = false
//!
//! [comments]
//! strategy = "treeExtras"  # or "lexicalScan"
//!
//! [transform]
//! deleteAnnotations = true
//! ```

mod jgraft_config;
mod loader;

pub use jgraft_config::{
    CommentsConfiguration, IndentStyle, JGraftConfiguration, LineEnding, PrinterConfiguration,
    TransformConfiguration,
};
pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
